//! `n2m convert` command implementation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Args;
use n2m_config::{CliSettings, Config, NotionConfig};
use n2m_core::{DocumentMap, NotionToMarkdown, PARENT_DOCUMENT};
use n2m_notion::NotionClient;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Notion page ID to convert.
    page_id: String,

    /// Maximum number of result pages fetched per block (default: all).
    #[arg(long)]
    page_limit: Option<usize>,

    /// Directory to write documents to (default: print to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Notion integration token (overrides config).
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write child pages to their own documents instead of inlining them.
    #[arg(long)]
    separate_child_pages: bool,

    /// Embed images as base64 data URIs.
    #[arg(long)]
    base64_images: bool,

    /// Do not convert child pages and databases.
    #[arg(long)]
    no_child_pages: bool,

    /// Path to configuration file (default: auto-discover n2m.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, conversion fails or
    /// documents cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.page_limit == Some(0) {
            return Err(CliError::Validation(
                "--page-limit must be at least 1".to_owned(),
            ));
        }

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        debug!(config_path = ?config.config_path, "Loaded configuration");
        let notion = require_notion_config(&config, &output)?;

        let client = NotionClient::from_config(notion);
        let converter = NotionToMarkdown::new(client, config.conversion.clone())?;

        output.info(&format!("Converting page {}...", self.page_id));
        let documents = converter.page_to_markdown(&self.page_id, self.page_limit)?;

        match &config.output_resolved.dir {
            Some(dir) => {
                let written = write_documents(dir, &self.page_id, &documents)?;
                if written.is_empty() {
                    output.warning("Page has no content, nothing written");
                }
                for path in written {
                    output.success(&format!("Wrote {}", path.display()));
                }
            }
            None => print_documents(&output, &documents)?,
        }

        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            token: self.token.clone(),
            separate_child_page: self.separate_child_pages.then_some(true),
            convert_images_to_base64: self.base64_images.then_some(true),
            parse_child_pages: self.no_child_pages.then_some(false),
            output_dir: self.output.clone(),
        }
    }
}

fn require_notion_config<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a NotionConfig, CliError> {
    config.require_notion().map_err(|err| {
        if config.notion.token.is_empty() {
            output.info("\nPass --token, set NOTION_TOKEN, or add to your n2m.toml:");
            output.info("\n[notion]");
            output.info(r#"token = "${NOTION_TOKEN}""#);
        }
        CliError::from(err)
    })
}

/// Print the root document, then every split document under a marker comment.
fn print_documents(output: &Output, documents: &DocumentMap) -> Result<(), CliError> {
    output.document(documents.parent())?;

    for (id, markdown) in documents.iter().filter(|(id, _)| *id != PARENT_DOCUMENT) {
        output.document(&format!("\n<!-- {id} -->\n"))?;
        output.document(markdown)?;
    }

    Ok(())
}

/// Write one `.md` file per document into `dir`, returning the written paths.
///
/// The root document is named after the page ID, split documents after
/// their slugified title.
fn write_documents(
    dir: &Path,
    page_id: &str,
    documents: &DocumentMap,
) -> Result<Vec<PathBuf>, CliError> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(dir)?;

    let mut used = HashSet::new();
    let mut written = Vec::with_capacity(documents.len());

    // Root first so it keeps its name
    let ordered = documents
        .get(PARENT_DOCUMENT)
        .map(|markdown| (PARENT_DOCUMENT, markdown))
        .into_iter()
        .chain(documents.iter().filter(|(id, _)| *id != PARENT_DOCUMENT));

    for (id, markdown) in ordered {
        let stem = if id == PARENT_DOCUMENT {
            page_id.to_owned()
        } else {
            slugify(id)
        };
        let file_name = unique_file_name(&stem, &mut used);
        let path = dir.join(file_name);
        std::fs::write(&path, markdown)?;
        written.push(path);
    }

    Ok(written)
}

/// `<stem>.md`, suffixed with `-2`, `-3`, ... if already taken.
fn unique_file_name(stem: &str, used: &mut HashSet<String>) -> String {
    let stem = if stem.is_empty() { "untitled" } else { stem };
    let mut candidate = format!("{stem}.md");
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{stem}-{n}.md");
        n += 1;
    }
    candidate
}

/// Lowercase ASCII slug with words joined by hyphens.
fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
