//! Error types for block tree conversion.

use n2m_notion::{BlockType, NotionError};

/// Boxed error returned by custom transformers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal conversion error. Any of these aborts the whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Block type outside the known enumeration.
    #[error("invalid block type: {0}")]
    InvalidBlockType(String),

    /// Fetching children failed.
    #[error("failed to fetch children of block {block_id}")]
    Fetch {
        /// Block whose children were requested.
        block_id: String,
        #[source]
        source: NotionError,
    },

    /// Type-specific payload does not have the expected shape.
    #[error("malformed {block_type} payload in block {block_id}")]
    Payload {
        /// Offending block.
        block_id: String,
        /// Declared block type.
        block_type: BlockType,
        #[source]
        source: serde_json::Error,
    },

    /// A custom transformer returned an error.
    #[error("custom transformer for {block_type} failed on block {block_id}")]
    Transformer {
        /// Block being transformed.
        block_id: String,
        /// Type the transformer is registered for.
        block_type: BlockType,
        #[source]
        source: BoxError,
    },

    /// The fetch worker pool could not be created.
    #[error("failed to create worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
