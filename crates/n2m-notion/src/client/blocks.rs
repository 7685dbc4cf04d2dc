//! Block children operations for the Notion API.

use tracing::{debug, info};

use super::NotionClient;
use crate::error::NotionError;
use crate::source::BlockSource;
use crate::types::{Block, BlockChildrenResponse};

/// Maximum page size accepted by the API.
const PAGE_SIZE: usize = 100;

impl NotionClient {
    /// Get the direct children of a block, following pagination.
    ///
    /// At most `page_limit` pages of [`PAGE_SIZE`] blocks are requested; the
    /// first page is always requested, even for a limit of zero.
    pub fn get_block_children(
        &self,
        block_id: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<Block>, NotionError> {
        info!("Getting children of block {}", block_id);

        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            if pages > 0 && !self.rate_limit_delay.is_zero() {
                std::thread::sleep(self.rate_limit_delay);
            }

            let url = self.children_url(block_id, cursor.as_deref());
            let response: BlockChildrenResponse = self.get_json(&url)?;
            pages += 1;
            blocks.extend(response.results);

            let limit_reached = page_limit.is_some_and(|limit| pages >= limit);
            match response.next_cursor {
                Some(next) if response.has_more && !limit_reached => cursor = Some(next),
                _ => break,
            }
        }

        debug!(block_id, pages, count = blocks.len(), "Fetched block children");
        Ok(blocks)
    }

    fn children_url(&self, block_id: &str, cursor: Option<&str>) -> String {
        let mut url = format!(
            "{}/blocks/{}/children?page_size={}",
            self.base_url, block_id, PAGE_SIZE
        );
        if let Some(cursor) = cursor {
            url.push_str("&start_cursor=");
            url.push_str(cursor);
        }
        url
    }
}

impl BlockSource for NotionClient {
    fn get_children(
        &self,
        block_id: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<Block>, NotionError> {
        self.get_block_children(block_id, page_limit)
    }
}
