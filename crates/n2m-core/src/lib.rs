//! Notion block tree to Markdown conversion.
//!
//! This crate provides:
//! - [`NotionToMarkdown`]: fetches a page's block tree and converts it
//! - [`RenderedNode`]: a block reduced to its own Markdown fragment
//! - [`DocumentMap`]: the output, one Markdown document per page
//! - [`Assembler`]: joins rendered trees into documents
//!
//! Conversion happens in two phases. The tree builder fetches children and
//! renders every block's own fragment; the assembler then joins fragments
//! with type-specific layout (indentation, quotes, toggles, child pages).
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use n2m_config::{ConversionConfig, NotionConfig};
//! use n2m_core::NotionToMarkdown;
//! use n2m_notion::{BlockType, NotionClient};
//!
//! let notion = NotionConfig {
//!     token: "secret_...".to_owned(),
//!     ..NotionConfig::default()
//! };
//! let client = NotionClient::from_config(&notion);
//! let mut n2m = NotionToMarkdown::new(client, ConversionConfig::default())?;
//!
//! // Render bookmarks, which have no default rendering
//! n2m.set_transformer(BlockType::Bookmark, |block| {
//!     let url = block.fields["bookmark"]["url"].as_str().unwrap_or_default();
//!     Ok(Some(format!("<{url}>")))
//! });
//!
//! let documents = n2m.page_to_markdown("page-id", None)?;
//! println!("{}", documents.parent());
//! # Ok(())
//! # }
//! ```

mod assemble;
mod build;
mod converter;
mod document;
mod error;
mod inline;
mod registry;
mod render;

#[cfg(test)]
mod test_support;

pub use assemble::Assembler;
pub use converter::NotionToMarkdown;
pub use document::{DocumentMap, PARENT_DOCUMENT, RenderedNode};
pub use error::{BoxError, ConvertError};
pub use inline::rich_text_to_markdown;
pub use registry::{TransformResult, Transformer, TransformerRegistry};
pub use render::MAX_SYNCED_DEPTH;
