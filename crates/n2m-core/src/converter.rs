//! Conversion entry point.

use n2m_config::ConversionConfig;
use n2m_markdown::{HttpImageEncoder, ImageEncoder};
use n2m_notion::{Block, BlockSource, BlockType};
use tracing::info;

use crate::assemble::Assembler;
use crate::document::{DocumentMap, PARENT_DOCUMENT, RenderedNode};
use crate::error::ConvertError;
use crate::registry::{TransformResult, TransformerRegistry};

/// Converts Notion pages into Markdown documents.
///
/// Children are fetched through a [`BlockSource`]. Sibling fetches run on a
/// dedicated worker pool sized by `max_concurrent_requests`, which bounds the
/// number of requests in flight.
pub struct NotionToMarkdown<S> {
    pub(crate) source: S,
    pub(crate) config: ConversionConfig,
    pub(crate) transformers: TransformerRegistry,
    pub(crate) images: Box<dyn ImageEncoder>,
    pool: rayon::ThreadPool,
}

impl<S: BlockSource> NotionToMarkdown<S> {
    /// Create a converter reading blocks from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ThreadPool`] if the worker pool cannot be created.
    pub fn new(source: S, config: ConversionConfig) -> Result<Self, ConvertError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_requests.max(1))
            .thread_name(|i| format!("n2m-fetch-{i}"))
            .build()?;

        Ok(Self {
            source,
            config,
            transformers: TransformerRegistry::new(),
            images: Box::new(HttpImageEncoder::new()),
            pool,
        })
    }

    /// Replace the encoder used when `convert_images_to_base64` is set.
    #[must_use]
    pub fn with_image_encoder(mut self, encoder: impl ImageEncoder + 'static) -> Self {
        self.images = Box::new(encoder);
        self
    }

    /// Register a custom transformer for `block_type`.
    ///
    /// The transformer replaces default rendering for that type entirely,
    /// including conversion of the block's children. Registering twice for
    /// the same type keeps the later transformer.
    pub fn set_transformer<F>(&mut self, block_type: BlockType, transformer: F) -> &mut Self
    where
        F: Fn(&Block) -> TransformResult + Send + Sync + 'static,
    {
        self.transformers.set(block_type, transformer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a page into its documents.
    ///
    /// The result always maps `"parent"` to the page itself when it produced
    /// any content; with `separate_child_page` each child page adds an entry
    /// keyed by its title. `page_limit` bounds the API pages fetched per block.
    ///
    /// # Errors
    ///
    /// Fails on the first fetch error, unknown block type, malformed payload or
    /// failing transformer. No partial result is returned.
    pub fn page_to_markdown(
        &self,
        page_id: &str,
        page_limit: Option<usize>,
    ) -> Result<DocumentMap, ConvertError> {
        info!(page_id, "Converting page");

        let nodes = self.pool.install(|| {
            let blocks = self.fetch_children(page_id, page_limit)?;
            self.build_nodes(&blocks, page_limit, 0)
        })?;

        let documents = self.to_markdown_string(&nodes);
        info!(page_id, documents = documents.len(), "Converted page");
        Ok(documents)
    }

    /// Build the rendered tree for already fetched top-level blocks.
    ///
    /// # Errors
    ///
    /// Same as [`NotionToMarkdown::page_to_markdown`].
    pub fn blocks_to_markdown(
        &self,
        blocks: &[Block],
        page_limit: Option<usize>,
    ) -> Result<Vec<RenderedNode>, ConvertError> {
        self.pool.install(|| self.build_nodes(blocks, page_limit, 0))
    }

    /// Render a single block's own fragment, ignoring its children.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidBlockType`] for unknown types, or the
    /// errors of a failing transformer or synced block resolution.
    pub fn block_to_markdown(&self, block: &Block) -> Result<String, ConvertError> {
        self.pool.install(|| self.render_own(block, 0))
    }

    /// Assemble a rendered tree into documents.
    #[must_use]
    pub fn to_markdown_string(&self, nodes: &[RenderedNode]) -> DocumentMap {
        Assembler::new(self.config.separate_child_page).assemble(nodes, PARENT_DOCUMENT, 0)
    }

    /// Fetch children of `block_id`, tagging failures with the block.
    pub(crate) fn fetch_children(
        &self,
        block_id: &str,
        page_limit: Option<usize>,
    ) -> Result<Vec<Block>, ConvertError> {
        self.source
            .get_children(block_id, page_limit)
            .map_err(|source| ConvertError::Fetch {
                block_id: block_id.to_owned(),
                source,
            })
    }
}
