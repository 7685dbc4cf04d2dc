//! Notion API types.

mod block;
mod payload;
mod rich_text;

pub use block::{Block, BlockChildrenResponse, BlockType, UnknownBlockType};
pub use payload::{
    ChildDatabasePayload, ChildPagePayload, CodePayload, EquationPayload, FileRef, MediaPayload,
    SyncedBlockPayload, SyncedFrom, TablePayload, TableRowPayload, TextPayload,
};
pub use rich_text::{Annotations, Expression, RichText, plain_text};
