//! Type-specific block payloads.
//!
//! Only includes fields that are actually rendered. Serde ignores unknown
//! fields from the API response, and every field has a default so that
//! [`Block::payload`](super::Block::payload) only fails on shape mismatches.

use serde::Deserialize;

use super::RichText;

/// Payload of text-bearing blocks (paragraph, headings, list items, quote,
/// to-do, toggle, callout).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextPayload {
    pub rich_text: Vec<RichText>,
}

/// Payload of `code` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodePayload {
    pub rich_text: Vec<RichText>,
    pub language: String,
}

/// Payload of `equation` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EquationPayload {
    pub expression: String,
}

/// Payload of media-like blocks (image, audio, video, file, pdf, embed,
/// link preview, bookmark).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaPayload {
    /// `"file"` for Notion-hosted files, `"external"` for linked ones.
    #[serde(rename = "type")]
    pub source: String,
    pub file: Option<FileRef>,
    pub external: Option<FileRef>,
    /// Direct URL (embed, link preview, bookmark).
    pub url: Option<String>,
    pub caption: Vec<RichText>,
}

impl MediaPayload {
    /// URL of the hosted or external file, chosen by the declared source.
    #[must_use]
    pub fn hosted_url(&self) -> Option<&str> {
        let file_ref = if self.source == "file" {
            self.file.as_ref()
        } else {
            self.external.as_ref().or(self.file.as_ref())
        };
        file_ref.map(|f| f.url.as_str())
    }
}

/// Reference to a file by URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileRef {
    pub url: String,
}

/// Payload of `table` blocks.
///
/// The API does not return `rows`; they arrive as `table_row` children and
/// are folded in before rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TablePayload {
    pub rows: Vec<TableRowPayload>,
}

/// Payload of `table_row` blocks: one rich text run per cell.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableRowPayload {
    pub cells: Vec<Vec<RichText>>,
}

/// Payload of `child_page` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChildPagePayload {
    pub title: String,
}

/// Payload of `child_database` blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChildDatabasePayload {
    pub title: String,
}

impl Default for ChildDatabasePayload {
    fn default() -> Self {
        Self {
            title: "Child Database".to_owned(),
        }
    }
}

/// Payload of `synced_block` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncedBlockPayload {
    /// Source reference; `None` on the original block.
    pub synced_from: Option<SyncedFrom>,
}

impl SyncedBlockPayload {
    /// ID of the block this one mirrors.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.synced_from
            .as_ref()
            .and_then(|s| s.block_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Reference from a synced copy to its source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncedFrom {
    pub block_id: Option<String>,
}
