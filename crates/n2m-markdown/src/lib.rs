//! Markdown formatting primitives for n2m.
//!
//! Everything in [`format`] is a pure function from plain values to a
//! Markdown fragment; the block converter composes them. Embedding images as
//! data URIs needs network access and lives behind the [`ImageEncoder`] trait.
//!
//! # Example
//!
//! ```
//! use n2m_markdown::format;
//!
//! assert_eq!(format::heading2("Notes"), "## Notes");
//! assert_eq!(format::link("docs", "https://example.com"), "[docs](https://example.com)");
//! ```

pub mod format;
mod image;

pub use image::{EmbedError, HttpImageEncoder, ImageEncoder, image_markdown};
