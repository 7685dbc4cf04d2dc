//! Notion REST API client.
//!
//! Provides a sync HTTP client for the Notion block API with bearer token
//! authentication, bounded retries and a fixed delay between paginated calls.

mod blocks;

use std::time::Duration;

use n2m_config::NotionConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use ureq::Agent;

use crate::error::NotionError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    api_version: String,
    retry_attempts: u32,
    rate_limit_delay: Duration,
}

/// Error object returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl NotionClient {
    /// Create client from config values.
    #[must_use]
    pub fn from_config(config: &NotionConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
            api_version: config.api_version.clone(),
            retry_attempts: config.retry_attempts.max(1),
            rate_limit_delay: config.rate_limit_delay(),
        }
    }

    /// GET a JSON resource, retrying transient failures.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NotionError> {
        let mut attempt = 1;
        loop {
            match self.get_json_once(url) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retry_attempts && err.is_retryable() => {
                    let delay = self.backoff(&err, attempt);
                    warn!(
                        url,
                        attempt,
                        delay = ?delay,
                        error = %err,
                        "Retrying Notion request"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn get_json_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, NotionError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Notion-Version", &self.api_version)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(NotionError::RateLimited { retry_after });
        }

        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(match serde_json::from_str::<ApiErrorBody>(&error_body) {
                Ok(api) => NotionError::Api {
                    status,
                    code: api.code,
                    message: api.message,
                },
                Err(_) => NotionError::HttpResponse {
                    status,
                    body: error_body,
                },
            });
        }

        Ok(body_reader.read_json()?)
    }

    /// Delay before retry number `attempt + 1`.
    fn backoff(&self, err: &NotionError, attempt: u32) -> Duration {
        match err {
            NotionError::RateLimited {
                retry_after: Some(after),
            } => *after,
            _ => self.rate_limit_delay * attempt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(delay: f64) -> NotionClient {
        NotionClient::from_config(&NotionConfig {
            token: "secret".to_owned(),
            base_url: "https://api.notion.com/v1/".to_owned(),
            rate_limit_delay: delay,
            ..NotionConfig::default()
        })
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client(0.5).base_url, "https://api.notion.com/v1");
    }

    #[test]
    fn test_backoff_is_linear() {
        let client = client(0.5);
        let err = NotionError::HttpResponse {
            status: 503,
            body: String::new(),
        };
        assert_eq!(client.backoff(&err, 1), Duration::from_millis(500));
        assert_eq!(client.backoff(&err, 3), Duration::from_millis(1500));
    }

    #[test]
    fn test_backoff_honours_retry_after() {
        let err = NotionError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(client(0.5).backoff(&err, 1), Duration::from_secs(7));
    }
}
