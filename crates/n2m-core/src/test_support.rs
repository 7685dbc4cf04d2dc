//! In-memory block source and fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use n2m_config::ConversionConfig;
use n2m_markdown::{EmbedError, ImageEncoder};
use n2m_notion::{Block, BlockSource, NotionError};
use serde_json::{Value, json};

use crate::converter::NotionToMarkdown;

/// [`BlockSource`] serving children from a map and recording every fetch.
///
/// Fetching an ID with no registered children fails with a 404 API error.
#[derive(Default)]
pub(crate) struct FakeSource {
    children: HashMap<String, Vec<Block>>,
    fetched: Mutex<Vec<(String, Option<usize>)>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_children(mut self, block_id: &str, blocks: Vec<Block>) -> Self {
        self.children.insert(block_id.to_owned(), blocks);
        self
    }

    /// IDs fetched so far, sorted.
    pub(crate) fn fetched(&self) -> Vec<String> {
        let mut fetched: Vec<String> = self
            .fetched
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        fetched.sort();
        fetched
    }

    /// Page limit passed with each fetch of `block_id`.
    pub(crate) fn page_limits(&self, block_id: &str) -> Vec<Option<usize>> {
        self.fetched
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == block_id)
            .map(|(_, limit)| *limit)
            .collect()
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

impl BlockSource for FakeSource {
    fn get_children(
        &self,
        block_id: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<Block>, NotionError> {
        self.fetched
            .lock()
            .unwrap()
            .push((block_id.to_owned(), page_limit));
        self.children
            .get(block_id)
            .cloned()
            .ok_or_else(|| NotionError::Api {
                status: 404,
                code: "object_not_found".to_owned(),
                message: format!("Could not find block with ID: {block_id}"),
            })
    }
}

/// [`ImageEncoder`] returning a fixed data URI.
pub(crate) struct FixedEncoder(pub(crate) &'static str);

impl ImageEncoder for FixedEncoder {
    fn data_uri(&self, _url: &str) -> Result<String, EmbedError> {
        Ok(self.0.to_owned())
    }
}

/// [`ImageEncoder`] that must never be reached.
struct UnreachableEncoder;

impl ImageEncoder for UnreachableEncoder {
    fn data_uri(&self, url: &str) -> Result<String, EmbedError> {
        panic!("unexpected image download: {url}");
    }
}

/// Converter over `source` that never touches the network.
pub(crate) fn converter(
    source: FakeSource,
    config: ConversionConfig,
) -> NotionToMarkdown<FakeSource> {
    NotionToMarkdown::new(source, config)
        .unwrap()
        .with_image_encoder(UnreachableEncoder)
}

pub(crate) fn block(id: &str, block_type: &str, payload: Value, has_children: bool) -> Block {
    let mut value = json!({
        "object": "block",
        "id": id,
        "type": block_type,
        "has_children": has_children,
    });
    value[block_type] = payload;
    serde_json::from_value(value).unwrap()
}

/// Text-bearing block with one plain span.
pub(crate) fn text_block(id: &str, block_type: &str, text: &str) -> Block {
    block(
        id,
        block_type,
        json!({"rich_text": [{"type": "text", "plain_text": text}]}),
        false,
    )
}

pub(crate) fn paragraph(id: &str, text: &str) -> Block {
    text_block(id, "paragraph", text)
}
