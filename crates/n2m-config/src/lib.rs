//! Configuration management for n2m.
//!
//! Parses `n2m.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `notion.token`
//! - `notion.base_url`
//! - `notion.api_version`
//! - `output.dir`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "n2m.toml";

/// Notion API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// `Notion-Version` header sent with every request.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Upper bound for `conversion.max_concurrent_requests`.
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Notion integration token.
    pub token: Option<String>,
    /// Override split vs inline child pages.
    pub separate_child_page: Option<bool>,
    /// Override base64 image embedding.
    pub convert_images_to_base64: Option<bool>,
    /// Override child page traversal.
    pub parse_child_pages: Option<bool>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notion API access.
    pub notion: NotionConfig,
    /// Block tree conversion behaviour.
    pub conversion: ConversionConfig,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Notion API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// API base URL.
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Total attempts per request, including the first one.
    pub retry_attempts: u32,
    /// Delay in seconds between paginated requests and base for retry back-off.
    pub rate_limit_delay: f64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            retry_attempts: 3,
            rate_limit_delay: 0.5,
        }
    }
}

impl NotionConfig {
    /// Rate limit delay as a [`Duration`].
    #[must_use]
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_secs_f64(self.rate_limit_delay)
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.token, "notion.token")?;
        self.validate_transport()
    }

    /// Validate everything except the token.
    fn validate_transport(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "notion.base_url")?;
        require_http_url(&self.base_url, "notion.base_url")?;
        require_non_empty(&self.api_version, "notion.api_version")?;

        if self.retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "notion.retry_attempts must be at least 1".to_owned(),
            ));
        }
        if !self.rate_limit_delay.is_finite() || self.rate_limit_delay < 0.0 {
            return Err(ConfigError::Validation(
                "notion.rate_limit_delay must be a non-negative number of seconds".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Block tree conversion configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Split child pages into their own documents instead of inlining them.
    pub separate_child_page: bool,
    /// Embed images as base64 data URIs.
    pub convert_images_to_base64: bool,
    /// Traverse child pages and databases.
    pub parse_child_pages: bool,
    /// Maximum number of block fetches in flight at once.
    pub max_concurrent_requests: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            separate_child_page: false,
            convert_images_to_base64: false,
            parse_child_pages: true,
            max_concurrent_requests: 5,
        }
    }
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory that receives one `.md` file per document.
    /// `None` writes to stdout.
    pub dir: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`notion.token`").
        field: String,
        /// Error message (e.g., "${`NOTION_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `n2m.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(token) = &settings.token {
            self.notion.token.clone_from(token);
        }
        if let Some(separate) = settings.separate_child_page {
            self.conversion.separate_child_page = separate;
        }
        if let Some(base64) = settings.convert_images_to_base64 {
            self.conversion.convert_images_to_base64 = base64;
        }
        if let Some(parse) = settings.parse_child_pages {
            self.conversion.parse_child_pages = parse;
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir = Some(dir.clone());
        }
    }

    /// Get validated Notion configuration.
    ///
    /// Unlike [`Config::validate`], this also requires a token, so use it
    /// right before talking to the API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the token is missing or any field is invalid.
    pub fn require_notion(&self) -> Result<&NotionConfig, ConfigError> {
        self.notion.validate()?;
        Ok(&self.notion)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The token is not checked here so that a config file can leave it to
    /// the command line. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notion.validate_transport()?;
        self.validate_conversion()
    }

    fn validate_conversion(&self) -> Result<(), ConfigError> {
        let limit = self.conversion.max_concurrent_requests;
        if limit == 0 {
            return Err(ConfigError::Validation(
                "conversion.max_concurrent_requests must be greater than 0".to_owned(),
            ));
        }
        if limit > MAX_CONCURRENT_REQUESTS {
            return Err(ConfigError::Validation(format!(
                "conversion.max_concurrent_requests cannot exceed {MAX_CONCURRENT_REQUESTS}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.notion.token = expand::expand_env(&self.notion.token, "notion.token")?;
        self.notion.base_url = expand::expand_env(&self.notion.base_url, "notion.base_url")?;
        self.notion.api_version =
            expand::expand_env(&self.notion.api_version, "notion.api_version")?;

        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }

        Ok(())
    }

    /// Resolve the output directory relative to the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            dir: self.output.dir.as_deref().map(|d| config_dir.join(d)),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion.api_version, "2022-06-28");
        assert_eq!(config.notion.retry_attempts, 3);
        assert_eq!(config.notion.rate_limit_delay(), Duration::from_millis(500));
        assert!(!config.conversion.separate_child_page);
        assert!(!config.conversion.convert_images_to_base64);
        assert!(config.conversion.parse_child_pages);
        assert_eq!(config.conversion.max_concurrent_requests, 5);
        assert!(config.output_resolved.dir.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.notion.base_url, DEFAULT_BASE_URL);
        assert!(config.notion.token.is_empty());
    }

    #[test]
    fn test_parse_notion_config() {
        let toml = r#"
[notion]
token = "secret_123"
retry_attempts = 5
rate_limit_delay = 1.5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.notion.token, "secret_123");
        assert_eq!(config.notion.retry_attempts, 5);
        assert_eq!(config.notion.rate_limit_delay(), Duration::from_millis(1500));
        assert_eq!(config.notion.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_parse_conversion_config() {
        let toml = r"
[conversion]
separate_child_page = true
convert_images_to_base64 = true
parse_child_pages = false
max_concurrent_requests = 2
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.conversion.separate_child_page);
        assert!(config.conversion.convert_images_to_base64);
        assert!(!config.conversion.parse_child_pages);
        assert_eq!(config.conversion.max_concurrent_requests, 2);
    }

    #[test]
    fn test_resolve_output_dir() {
        let toml = r#"
[output]
dir = "exported"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.output_resolved.dir,
            Some(PathBuf::from("/project/exported"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n2m.toml");
        std::fs::write(
            &path,
            "[notion]\ntoken = \"secret\"\n\n[output]\ndir = \"md\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.notion.token, "secret");
        assert_eq!(config.output_resolved.dir, Some(dir.path().join("md")));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/n2m.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n2m.toml");
        std::fs::write(&path, "[conversion]\nmax_concurrent_requests = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("max_concurrent_requests"));
    }

    #[test]
    fn test_apply_cli_settings_token() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            token: Some("secret_cli".to_owned()),
            ..Default::default()
        });
        assert_eq!(config.notion.token, "secret_cli");
        assert_eq!(config.notion.base_url, DEFAULT_BASE_URL); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_conversion_flags() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            separate_child_page: Some(true),
            convert_images_to_base64: Some(true),
            parse_child_pages: Some(false),
            ..Default::default()
        });
        assert!(config.conversion.separate_child_page);
        assert!(config.conversion.convert_images_to_base64);
        assert!(!config.conversion.parse_child_pages);
        assert_eq!(config.conversion.max_concurrent_requests, 5); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_output_dir() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        });
        assert_eq!(config.output_resolved.dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.notion.token.is_empty());
        assert!(config.conversion.parse_child_pages);
        assert!(config.output_resolved.dir.is_none());
    }

    #[test]
    fn test_expand_env_vars_token() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("N2M_CONFIG_TEST_TOKEN", "secret_env");
        }

        let toml = r#"
[notion]
token = "${N2M_CONFIG_TEST_TOKEN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.notion.token, "secret_env");

        unsafe {
            std::env::remove_var("N2M_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("N2M_CONFIG_TEST_MISSING");
        }

        let toml = r#"
[notion]
token = "${N2M_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("notion.token"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(result: Result<(), ConfigError>, expected_substrings: &[&str]) {
        let err = result.expect_err("Expected validation to fail");
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default();
        config.notion.base_url = "api.notion.com".to_owned();
        assert_validation_error(config.validate(), &["notion.base_url", "http"]);
    }

    #[test]
    fn test_validate_retry_attempts_zero() {
        let mut config = Config::default();
        config.notion.retry_attempts = 0;
        assert_validation_error(config.validate(), &["retry_attempts"]);
    }

    #[test]
    fn test_validate_negative_delay() {
        let mut config = Config::default();
        config.notion.rate_limit_delay = -1.0;
        assert_validation_error(config.validate(), &["rate_limit_delay"]);
    }

    #[test]
    fn test_validate_concurrency_too_high() {
        let mut config = Config::default();
        config.conversion.max_concurrent_requests = 100;
        assert_validation_error(config.validate(), &["max_concurrent_requests", "64"]);
    }

    #[test]
    fn test_require_notion_rejects_empty_token() {
        let config = Config::default();
        let err = config.require_notion().unwrap_err();
        assert!(err.to_string().contains("notion.token"));
    }

    #[test]
    fn test_require_notion_returns_validated() {
        let mut config = Config::default();
        config.notion.token = "secret".to_owned();
        assert_eq!(config.require_notion().unwrap().token, "secret");
    }
}
