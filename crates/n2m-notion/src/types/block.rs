//! Notion block types.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Notion block as returned by the block children endpoint.
///
/// The declared type is kept as a raw string so blocks of types this crate
/// does not know about still deserialize. Use [`Block::kind`] to map it onto
/// [`BlockType`].
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    /// Block ID.
    pub id: String,
    /// Declared block type (e.g. `"paragraph"`).
    #[serde(rename = "type")]
    pub block_type: String,
    /// Whether the block has children that must be fetched separately.
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the type-specific payload keyed by `block_type`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Block {
    /// Map the declared type onto the closed [`BlockType`] enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownBlockType`] if the declared type is not recognized.
    pub fn kind(&self) -> Result<BlockType, UnknownBlockType> {
        self.block_type.parse()
    }

    /// Deserialize the type-specific payload (the field named after the block type).
    ///
    /// A block without a payload deserializes from an empty object, so payload
    /// structs with defaulted fields always succeed on well-formed blocks.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self.fields.get(&self.block_type) {
            Some(value) => T::deserialize(value),
            None => T::deserialize(&Value::Object(Map::new())),
        }
    }

    /// Mutable access to the payload object, creating it if absent.
    ///
    /// Returns `None` if the payload exists but is not a JSON object.
    pub fn payload_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.fields
            .entry(self.block_type.clone())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
    }
}

/// Closed enumeration of block types the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Quote,
    ToDo,
    Toggle,
    Code,
    Image,
    Video,
    File,
    Pdf,
    Bookmark,
    Callout,
    SyncedBlock,
    Table,
    ColumnList,
    Column,
    LinkPreview,
    LinkToPage,
    Equation,
    Divider,
    TableOfContents,
    ChildPage,
    ChildDatabase,
    Breadcrumb,
    Template,
    Unsupported,
    Audio,
    Embed,
}

impl BlockType {
    /// Every variant, in declaration order.
    pub const ALL: [BlockType; 32] = [
        Self::Paragraph,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletedListItem,
        Self::NumberedListItem,
        Self::Quote,
        Self::ToDo,
        Self::Toggle,
        Self::Code,
        Self::Image,
        Self::Video,
        Self::File,
        Self::Pdf,
        Self::Bookmark,
        Self::Callout,
        Self::SyncedBlock,
        Self::Table,
        Self::ColumnList,
        Self::Column,
        Self::LinkPreview,
        Self::LinkToPage,
        Self::Equation,
        Self::Divider,
        Self::TableOfContents,
        Self::ChildPage,
        Self::ChildDatabase,
        Self::Breadcrumb,
        Self::Template,
        Self::Unsupported,
        Self::Audio,
        Self::Embed,
    ];

    /// API name of the block type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::Quote => "quote",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::Code => "code",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Pdf => "pdf",
            Self::Bookmark => "bookmark",
            Self::Callout => "callout",
            Self::SyncedBlock => "synced_block",
            Self::Table => "table",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::LinkPreview => "link_preview",
            Self::LinkToPage => "link_to_page",
            Self::Equation => "equation",
            Self::Divider => "divider",
            Self::TableOfContents => "table_of_contents",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::Breadcrumb => "breadcrumb",
            Self::Template => "template",
            Self::Unsupported => "unsupported",
            Self::Audio => "audio",
            Self::Embed => "embed",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_owned()))
    }
}

/// Block type outside the [`BlockType`] enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

/// Block children API response (one page of results).
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildrenResponse {
    /// Blocks on this page, in sibling order.
    pub results: Vec<Block>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether more pages follow.
    #[serde(default)]
    pub has_more: bool,
}
