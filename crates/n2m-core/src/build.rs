//! Block tree construction: fetching children and rendering every node.

use n2m_notion::types::SyncedBlockPayload;
use n2m_notion::{Block, BlockSource, BlockType};
use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::converter::NotionToMarkdown;
use crate::document::RenderedNode;
use crate::error::ConvertError;
use crate::render::{MAX_SYNCED_DEPTH, payload};

/// Type of the children that carry a table's cells.
const TABLE_ROW: &str = "table_row";

impl<S: BlockSource> NotionToMarkdown<S> {
    /// Build rendered nodes for sibling `blocks`, preserving their order.
    ///
    /// Siblings are processed in parallel on the converter's pool. The first
    /// error aborts the whole level.
    pub(crate) fn build_nodes(
        &self,
        blocks: &[Block],
        page_limit: Option<usize>,
        synced_depth: usize,
    ) -> Result<Vec<RenderedNode>, ConvertError> {
        let nodes = blocks
            .par_iter()
            .map(|block| self.build_node(block, page_limit, synced_depth))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nodes.into_iter().flatten().collect())
    }

    /// Build one node, or `None` if the block is skipped.
    fn build_node(
        &self,
        block: &Block,
        page_limit: Option<usize>,
        synced_depth: usize,
    ) -> Result<Option<RenderedNode>, ConvertError> {
        let kind = block
            .kind()
            .map_err(|e| ConvertError::InvalidBlockType(e.0))?;

        if kind == BlockType::Unsupported
            || (kind == BlockType::ChildPage && !self.config.parse_child_pages)
        {
            debug!(block_id = %block.id, block_type = %kind, "Skipping block");
            return Ok(None);
        }

        if kind == BlockType::SyncedBlock && synced_depth > MAX_SYNCED_DEPTH {
            warn!(block_id = %block.id, synced_depth, "Synced block nesting too deep, skipping");
            return Ok(Some(RenderedNode::leaf(kind, &block.id, "")));
        }

        // A custom transformer owns the whole subtree, children included
        if self.transformers.contains(kind) {
            let own = self.render_own(block, synced_depth)?;
            return Ok(Some(RenderedNode::leaf(kind, &block.id, &own)));
        }

        if kind == BlockType::SyncedBlock {
            return self.build_synced(block, page_limit, synced_depth).map(Some);
        }

        // Callout children never reach the output, so they are not fetched
        if !block.has_children || kind == BlockType::Callout {
            let own = self.render_own(block, synced_depth)?;
            return Ok(Some(RenderedNode::leaf(kind, &block.id, &own)));
        }

        let children = self.fetch_children(&block.id, page_limit)?;

        if kind == BlockType::Table {
            let table = fold_table_rows(block, &children);
            let own = self.render_own(&table, synced_depth)?;
            return Ok(Some(RenderedNode::leaf(kind, &block.id, &own)));
        }

        let own = self.render_own(block, synced_depth)?;
        let children = self.build_nodes(&children, page_limit, synced_depth)?;

        Ok(Some(
            RenderedNode::leaf(kind, &block.id, &own).with_children(children),
        ))
    }

    /// Synced block as a transparent container of its source's children.
    ///
    /// A copy is built from the children of the block it mirrors, whether or
    /// not the API reports children on the copy itself. The original block
    /// (no source reference) uses its own children.
    fn build_synced(
        &self,
        block: &Block,
        page_limit: Option<usize>,
        synced_depth: usize,
    ) -> Result<RenderedNode, ConvertError> {
        let synced: SyncedBlockPayload = payload(block, BlockType::SyncedBlock)?;
        let container = RenderedNode::leaf(BlockType::SyncedBlock, &block.id, "");

        let target = match synced.source_id() {
            Some(source_id) => source_id,
            None if block.has_children => block.id.as_str(),
            None => {
                warn!(block_id = %block.id, "Synced block has no source reference");
                return Ok(container);
            }
        };

        let children = self.fetch_children(target, page_limit)?;
        let children = self.build_nodes(&children, page_limit, synced_depth + 1)?;
        Ok(container.with_children(children))
    }
}

/// Copy of `table` with its `table_row` children inlined as `rows`.
fn fold_table_rows(table: &Block, rows: &[Block]) -> Block {
    let cells: Vec<Value> = rows
        .iter()
        .filter(|row| row.block_type == TABLE_ROW)
        .map(|row| {
            row.fields
                .get(TABLE_ROW)
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()))
        })
        .collect();

    let mut table = table.clone();
    if let Some(payload) = table.payload_mut() {
        payload.insert("rows".to_owned(), Value::Array(cells));
    }
    table
}
