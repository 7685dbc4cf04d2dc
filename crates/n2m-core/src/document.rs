//! Rendered block tree and the per-document output buffers.

use std::collections::BTreeMap;

use n2m_notion::BlockType;

/// Identifier of the root document in a [`DocumentMap`].
pub const PARENT_DOCUMENT: &str = "parent";

/// A block reduced to its own Markdown fragment, plus its rendered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    /// Declared block type.
    pub block_type: BlockType,
    /// Source block ID.
    pub block_id: String,
    /// Markdown for the block itself, excluding children. May be empty.
    pub own_fragment: String,
    /// Children in source sibling order.
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// Node without children.
    #[must_use]
    pub fn leaf(block_type: BlockType, block_id: &str, own_fragment: &str) -> Self {
        Self {
            block_type,
            block_id: block_id.to_owned(),
            own_fragment: own_fragment.to_owned(),
            children: Vec::new(),
        }
    }

    /// Builder-style child list.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RenderedNode>) -> Self {
        self.children = children;
        self
    }
}

/// Markdown text per document identifier.
///
/// `"parent"` is the root page; split-off child pages are keyed by title.
/// Text is only ever appended during a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMap {
    documents: BTreeMap<String, String>,
}

impl DocumentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` to document `id`, creating it if needed.
    pub fn append(&mut self, id: &str, text: &str) {
        self.entry(id).push_str(text);
    }

    /// Make sure document `id` exists, possibly empty.
    pub fn ensure(&mut self, id: &str) {
        self.entry(id);
    }

    /// Union with `other`; text for keys present in both is appended.
    pub fn merge(&mut self, other: DocumentMap) {
        for (id, text) in other.documents {
            self.entry(&id).push_str(&text);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    /// Remove and return document `id`.
    pub fn take(&mut self, id: &str) -> Option<String> {
        self.documents.remove(id)
    }

    /// The root document, or an empty string if nothing was emitted.
    #[must_use]
    pub fn parent(&self) -> &str {
        self.get(PARENT_DOCUMENT).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn entry(&mut self, id: &str) -> &mut String {
        self.documents.entry(id.to_owned()).or_default()
    }
}

impl<'a> IntoIterator for &'a DocumentMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
