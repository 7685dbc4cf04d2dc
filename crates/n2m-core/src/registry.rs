//! Custom transformer registry.

use std::collections::HashMap;
use std::fmt;

use n2m_notion::{Block, BlockType};

use crate::error::BoxError;

/// Result of a custom transformer.
///
/// `Ok(Some(markdown))` replaces the block's fragment, `Ok(None)` renders
/// nothing, and `Err` aborts the conversion.
pub type TransformResult = Result<Option<String>, BoxError>;

/// Caller-supplied replacement for the default rendering of one block type.
pub type Transformer = Box<dyn Fn(&Block) -> TransformResult + Send + Sync>;

/// At most one [`Transformer`] per [`BlockType`].
///
/// A registered transformer fully owns its block: the default rendering is
/// skipped and the block's children are not converted.
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: HashMap<BlockType, Transformer>,
}

impl TransformerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transformer` for `block_type`, replacing any previous one.
    pub fn set<F>(&mut self, block_type: BlockType, transformer: F) -> &mut Self
    where
        F: Fn(&Block) -> TransformResult + Send + Sync + 'static,
    {
        self.transformers.insert(block_type, Box::new(transformer));
        self
    }

    #[must_use]
    pub fn get(&self, block_type: BlockType) -> Option<&Transformer> {
        self.transformers.get(&block_type)
    }

    #[must_use]
    pub fn contains(&self, block_type: BlockType) -> bool {
        self.transformers.contains_key(&block_type)
    }

}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.transformers.keys().collect();
        types.sort();
        f.debug_struct("TransformerRegistry")
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paragraph() -> Block {
        serde_json::from_value(json!({"id": "p1", "type": "paragraph"})).unwrap()
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = TransformerRegistry::new();
        registry
            .set(BlockType::Paragraph, |_| Ok(Some("first".to_owned())))
            .set(BlockType::Paragraph, |_| Ok(Some("second".to_owned())));

        let transformer = registry.get(BlockType::Paragraph).unwrap();
        assert_eq!(transformer(&paragraph()).unwrap(), Some("second".to_owned()));
    }

    #[test]
    fn test_lookup_by_type() {
        let mut registry = TransformerRegistry::new();
        registry.set(BlockType::Image, |_| Ok(None));

        assert!(registry.contains(BlockType::Image));
        assert!(!registry.contains(BlockType::Paragraph));
        assert!(registry.get(BlockType::Paragraph).is_none());
    }

    #[test]
    fn test_debug_lists_types() {
        let mut registry = TransformerRegistry::new();
        registry.set(BlockType::Code, |_| Ok(None));
        assert_eq!(
            format!("{registry:?}"),
            "TransformerRegistry { types: [Code] }"
        );
    }
}
