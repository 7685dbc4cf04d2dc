//! Notion integration for n2m.
//!
//! This crate provides the block-fetching side of the converter:
//! - [`NotionClient`]: REST API client with bearer token authentication
//! - [`BlockSource`]: the trait converters fetch children through
//! - [`types`]: blocks, rich text and type-specific payloads
//!
//! # API Client
//!
//! ```no_run
//! use n2m_config::NotionConfig;
//! use n2m_notion::{BlockSource, NotionClient};
//!
//! let config = NotionConfig {
//!     token: "secret_...".to_owned(),
//!     ..NotionConfig::default()
//! };
//! let client = NotionClient::from_config(&config);
//!
//! let blocks = client.get_children("page-id", None)?;
//! println!("{} top-level blocks", blocks.len());
//! # Ok::<(), n2m_notion::NotionError>(())
//! ```

// API client
mod client;
pub use client::NotionClient;

// Fetch abstraction
mod source;
pub use source::BlockSource;

// Types
pub mod types;
pub use types::{Block, BlockType};

// Errors
pub mod error;
pub use error::NotionError;
