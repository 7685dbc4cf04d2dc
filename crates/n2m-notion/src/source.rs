//! Block source abstraction.

use crate::error::NotionError;
use crate::types::Block;

/// Something that can list the direct children of a block.
///
/// [`NotionClient`](crate::NotionClient) is the production implementation;
/// converters only depend on this trait so tests can supply blocks from memory.
/// Implementations are shared across worker threads, hence `Send + Sync`.
pub trait BlockSource: Send + Sync {
    /// Return the children of `block_id` in sibling order.
    ///
    /// `page_limit` bounds the number of API pages (100 blocks each) requested.
    fn get_children(
        &self,
        block_id: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<Block>, NotionError>;
}
