//! Per-block rendering of a block's own fragment.

use n2m_markdown::{format, image_markdown};
use n2m_notion::types::{
    ChildDatabasePayload, ChildPagePayload, CodePayload, EquationPayload, MediaPayload,
    SyncedBlockPayload, TablePayload, TextPayload, plain_text,
};
use n2m_notion::{Block, BlockSource, BlockType};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::converter::NotionToMarkdown;
use crate::document::PARENT_DOCUMENT;
use crate::error::ConvertError;
use crate::inline::rich_text_to_markdown;

/// Deepest synced block nesting that is still resolved.
///
/// Synced blocks may reference each other in a cycle; past this depth a
/// synced block renders as empty.
pub const MAX_SYNCED_DEPTH: usize = 3;

impl<S: BlockSource> NotionToMarkdown<S> {
    /// Own fragment of `block`, without its children.
    ///
    /// `synced_depth` is the number of synced blocks already resolved on the
    /// path to this block.
    pub(crate) fn render_own(
        &self,
        block: &Block,
        synced_depth: usize,
    ) -> Result<String, ConvertError> {
        let kind = block
            .kind()
            .map_err(|e| ConvertError::InvalidBlockType(e.0))?;

        if let Some(transformer) = self.transformers.get(kind) {
            let output = transformer(block).map_err(|source| ConvertError::Transformer {
                block_id: block.id.clone(),
                block_type: kind,
                source,
            })?;
            return Ok(output.unwrap_or_default());
        }

        let markdown = match kind {
            BlockType::Paragraph
            | BlockType::Heading1
            | BlockType::Heading2
            | BlockType::Heading3
            | BlockType::BulletedListItem
            | BlockType::NumberedListItem
            | BlockType::Quote
            | BlockType::ToDo
            | BlockType::Toggle
            | BlockType::Callout => {
                let text: TextPayload = payload(block, kind)?;
                rich_text_to_markdown(&text.rich_text)
            }
            BlockType::Code => {
                let code: CodePayload = payload(block, kind)?;
                format::code_block(&rich_text_to_markdown(&code.rich_text), &code.language)
            }
            BlockType::Equation => {
                let equation: EquationPayload = payload(block, kind)?;
                format::equation(&equation.expression)
            }
            BlockType::Divider | BlockType::TableOfContents | BlockType::Breadcrumb => {
                format::divider()
            }
            BlockType::Image => self.render_image(block)?,
            BlockType::Table => {
                let table: TablePayload = payload(block, kind)?;
                let rows: Vec<Vec<String>> = table
                    .rows
                    .iter()
                    .map(|row| row.cells.iter().map(|cell| plain_text(cell)).collect())
                    .collect();
                format::table(&rows)
            }
            BlockType::ChildPage => {
                if !self.config.parse_child_pages {
                    return Ok(String::new());
                }
                let page: ChildPagePayload = payload(block, kind)?;
                // A split child page is keyed by its bare title
                if self.config.separate_child_page {
                    page.title
                } else {
                    format::heading2(&page.title)
                }
            }
            BlockType::ChildDatabase => {
                if !self.config.parse_child_pages {
                    return Ok(String::new());
                }
                let database: ChildDatabasePayload = payload(block, kind)?;
                format::heading3(&database.title)
            }
            BlockType::SyncedBlock => self.resolve_synced(block, synced_depth)?,
            BlockType::Audio => {
                let media: MediaPayload = payload(block, kind)?;
                let caption = caption_or(&media, "audio");
                let url = media.file.as_ref().map_or("", |f| f.url.as_str());
                format::link(&caption, url)
            }
            BlockType::Embed => {
                let media: MediaPayload = payload(block, kind)?;
                let caption = caption_or(&media, "embed");
                format::link(&caption, media.url.as_deref().unwrap_or_default())
            }
            BlockType::LinkPreview => {
                let media: MediaPayload = payload(block, kind)?;
                format::link("link_preview", media.url.as_deref().unwrap_or_default())
            }
            BlockType::Video
            | BlockType::File
            | BlockType::Pdf
            | BlockType::Bookmark
            | BlockType::ColumnList
            | BlockType::Column
            | BlockType::LinkToPage
            | BlockType::Template
            | BlockType::Unsupported => String::new(),
        };

        Ok(markdown)
    }

    fn render_image(&self, block: &Block) -> Result<String, ConvertError> {
        let media: MediaPayload = payload(block, BlockType::Image)?;
        let alt = caption_or(&media, "image");
        let url = media.hosted_url().unwrap_or_default();

        let encoder = self
            .config
            .convert_images_to_base64
            .then_some(self.images.as_ref());
        Ok(image_markdown(&alt, url, encoder))
    }

    /// Markdown of the content a synced block mirrors, for standalone rendering.
    ///
    /// Inside a page the tree builder expands synced blocks as containers, so
    /// this path only serves [`NotionToMarkdown::block_to_markdown`]. An
    /// original synced block has no fragment of its own.
    fn resolve_synced(&self, block: &Block, synced_depth: usize) -> Result<String, ConvertError> {
        if synced_depth > MAX_SYNCED_DEPTH {
            warn!(block_id = %block.id, synced_depth, "Synced block nesting too deep, skipping");
            return Ok(String::new());
        }

        let synced: SyncedBlockPayload = payload(block, BlockType::SyncedBlock)?;
        let Some(source_id) = synced.source_id() else {
            if !block.has_children {
                warn!(block_id = %block.id, "Synced block has no source reference");
            }
            return Ok(String::new());
        };

        let blocks = self.fetch_children(source_id, None)?;
        let nodes = self.build_nodes(&blocks, None, synced_depth + 1)?;
        let mut documents = self.to_markdown_string(&nodes);
        Ok(documents.take(PARENT_DOCUMENT).unwrap_or_default())
    }
}

/// Deserialize the payload of `block`, tagging failures with the block.
pub(crate) fn payload<T: DeserializeOwned>(
    block: &Block,
    block_type: BlockType,
) -> Result<T, ConvertError> {
    block.payload().map_err(|source| ConvertError::Payload {
        block_id: block.id.clone(),
        block_type,
        source,
    })
}

fn caption_or(media: &MediaPayload, fallback: &str) -> String {
    let caption = plain_text(&media.caption);
    if caption.is_empty() {
        fallback.to_owned()
    } else {
        caption
    }
}
