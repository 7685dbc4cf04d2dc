//! Assembly of a rendered tree into Markdown documents.
//!
//! Each node contributes its own fragment to the current document, then its
//! children according to the node type:
//!
//! - synced blocks and columns are transparent containers;
//! - child pages open a new document keyed by their title, which is either
//!   kept separate or inlined back under the title;
//! - toggles wrap their children in a collapsible section;
//! - quotes prefix their children's lines with `>`;
//! - callouts drop their children;
//! - everything else nests its children one indentation level deeper.

use n2m_markdown::format;
use n2m_notion::BlockType;

use crate::document::{DocumentMap, PARENT_DOCUMENT, RenderedNode};

/// Turns [`RenderedNode`] trees into a [`DocumentMap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    separate_child_pages: bool,
}

impl Assembler {
    #[must_use]
    pub fn new(separate_child_pages: bool) -> Self {
        Self {
            separate_child_pages,
        }
    }

    /// Assemble `nodes` into document `document_id` at `nesting_level` tabs.
    ///
    /// Documents produced by nested child pages are returned alongside.
    #[must_use]
    pub fn assemble(
        &self,
        nodes: &[RenderedNode],
        document_id: &str,
        nesting_level: usize,
    ) -> DocumentMap {
        let mut output = DocumentMap::new();

        for node in nodes {
            Self::append_own_fragment(&mut output, node, document_id, nesting_level);

            if !node.children.is_empty() {
                self.append_children(&mut output, node, document_id, nesting_level);
            }
        }

        output
    }

    fn append_own_fragment(
        output: &mut DocumentMap,
        node: &RenderedNode,
        document_id: &str,
        nesting_level: usize,
    ) {
        // Toggles and child pages place their fragment with their children
        if node.own_fragment.is_empty()
            || matches!(node.block_type, BlockType::Toggle | BlockType::ChildPage)
        {
            return;
        }

        let indented = format::add_tab_space(&node.own_fragment, nesting_level);
        if is_list_like(node.block_type) {
            output.append(document_id, &format!("{indented}\n"));
        } else {
            output.append(document_id, &format!("\n{indented}\n\n"));
        }
    }

    fn append_children(
        &self,
        output: &mut DocumentMap,
        node: &RenderedNode,
        document_id: &str,
        nesting_level: usize,
    ) {
        match node.block_type {
            BlockType::SyncedBlock | BlockType::ColumnList | BlockType::Column => {
                let nested = self.assemble(&node.children, document_id, nesting_level);
                output.ensure(document_id);
                output.merge(nested);
            }
            BlockType::ChildPage => {
                let title = node.own_fragment.as_str();
                let mut nested = self.assemble(&node.children, title, 0);

                if self.separate_child_pages {
                    output.merge(nested);
                } else {
                    output.ensure(document_id);
                    if let Some(content) = nested.take(title) {
                        output.append(document_id, &format!("\n{title}\n{content}"));
                    }
                    output.merge(nested);
                }
            }
            BlockType::Toggle => {
                let mut nested = self.assemble(&node.children, PARENT_DOCUMENT, 0);
                let body = nested.take(PARENT_DOCUMENT).unwrap_or_default();

                output.ensure(document_id);
                output.append(document_id, &format::toggle(&node.own_fragment, &body));
                output.merge(nested);
            }
            BlockType::Quote => {
                let mut nested = self.assemble(&node.children, document_id, nesting_level);

                output.ensure(document_id);
                if let Some(content) = nested.take(document_id) {
                    output.append(document_id, &quote_lines(&content));
                }
                output.append(document_id, "\n");
                output.merge(nested);
            }
            // Callouts contribute nothing past their own fragment
            BlockType::Callout => {}
            _ => {
                let mut nested = self.assemble(&node.children, document_id, nesting_level + 1);

                output.ensure(document_id);
                if let Some(content) = nested.take(document_id) {
                    output.append(document_id, &content);
                }
                output.merge(nested);
            }
        }
    }
}

/// Types whose fragment is followed by a single newline.
fn is_list_like(block_type: BlockType) -> bool {
    matches!(
        block_type,
        BlockType::ToDo
            | BlockType::BulletedListItem
            | BlockType::NumberedListItem
            | BlockType::Quote
    )
}

/// Prefix every line with `> `; blank lines become a bare `>`.
fn quote_lines(text: &str) -> String {
    let quoted: Vec<String> = text
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_owned()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    quoted.join("\n").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn leaf(block_type: BlockType, id: &str, text: &str) -> RenderedNode {
        RenderedNode::leaf(block_type, id, text)
    }

    fn assemble(nodes: &[RenderedNode]) -> DocumentMap {
        Assembler::new(false).assemble(nodes, PARENT_DOCUMENT, 0)
    }

    #[test]
    fn test_block_and_list_whitespace() {
        let nodes = vec![
            leaf(BlockType::Heading1, "h1", "# Title"),
            leaf(BlockType::BulletedListItem, "b1", "- one"),
            leaf(BlockType::BulletedListItem, "b2", "- two"),
        ];
        assert_eq!(assemble(&nodes).parent(), "\n# Title\n\n- one\n- two\n");
    }

    #[test]
    fn test_empty_fragment_emits_nothing() {
        let documents = assemble(&[leaf(BlockType::Paragraph, "p1", "")]);
        assert!(documents.is_empty());
    }

    #[test]
    fn test_nested_list_indentation() {
        let nodes = vec![
            leaf(BlockType::BulletedListItem, "b1", "- outer").with_children(vec![
                leaf(BlockType::BulletedListItem, "b2", "- inner").with_children(vec![leaf(
                    BlockType::BulletedListItem,
                    "b3",
                    "- deepest",
                )]),
            ]),
        ];
        assert_eq!(
            assemble(&nodes).parent(),
            "- outer\n\t- inner\n\t\t- deepest\n"
        );
    }

    #[test]
    fn test_quote_children_prefixed() {
        let nodes = vec![
            leaf(BlockType::Quote, "q1", "Said").with_children(vec![
                leaf(BlockType::BulletedListItem, "b1", "- first"),
                leaf(BlockType::BulletedListItem, "b2", "- second"),
            ]),
        ];
        assert_eq!(
            assemble(&nodes).parent(),
            "Said\n> - first\n> - second\n>\n"
        );
    }

    #[test]
    fn test_quote_lines_blank_lines() {
        assert_eq!(quote_lines("\nchild\n\n"), ">\n> child\n>\n>");
        assert_eq!(quote_lines("a\n  \nb"), "> a\n>\n> b");
    }

    #[test]
    fn test_toggle_wraps_children() {
        let nodes = vec![
            leaf(BlockType::Toggle, "t1", "More").with_children(vec![leaf(
                BlockType::Paragraph,
                "p1",
                "hidden",
            )]),
        ];
        assert_eq!(
            assemble(&nodes).parent(),
            "<details><summary>More</summary>\nhidden\n\n</details>\n\n"
        );
    }

    #[test]
    fn test_toggle_without_children_is_dropped() {
        let documents = assemble(&[leaf(BlockType::Toggle, "t1", "Lonely")]);
        assert!(documents.is_empty());
    }

    #[test]
    fn test_toggle_inside_list_ignores_nesting() {
        let nodes = vec![
            leaf(BlockType::BulletedListItem, "b1", "- item").with_children(vec![
                leaf(BlockType::Toggle, "t1", "Open").with_children(vec![leaf(
                    BlockType::Paragraph,
                    "p1",
                    "x",
                )]),
            ]),
        ];
        assert_eq!(
            assemble(&nodes).parent(),
            "- item\n<details><summary>Open</summary>\nx\n\n</details>\n\n"
        );
    }

    #[test]
    fn test_columns_are_transparent() {
        let nodes = vec![
            leaf(BlockType::ColumnList, "cl", "").with_children(vec![
                leaf(BlockType::Column, "c1", "")
                    .with_children(vec![leaf(BlockType::Paragraph, "p1", "left")]),
                leaf(BlockType::Column, "c2", "")
                    .with_children(vec![leaf(BlockType::Paragraph, "p2", "right")]),
            ]),
        ];
        assert_eq!(assemble(&nodes).parent(), "\nleft\n\n\nright\n\n");
    }

    #[test]
    fn test_callout_children_dropped() {
        let nodes = vec![
            leaf(BlockType::Callout, "c1", "Note").with_children(vec![leaf(
                BlockType::Paragraph,
                "p1",
                "dropped",
            )]),
        ];
        assert_eq!(assemble(&nodes).parent(), "\nNote\n\n");
    }

    #[test]
    fn test_child_page_inlined_under_title() {
        let nodes = vec![
            leaf(BlockType::Paragraph, "p0", "Intro"),
            leaf(BlockType::ChildPage, "cp1", "## Sub").with_children(vec![leaf(
                BlockType::Paragraph,
                "p1",
                "Inside",
            )]),
        ];
        let documents = assemble(&nodes);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents.parent(), "\nIntro\n\n\n## Sub\n\nInside\n\n");
    }

    #[test]
    fn test_child_page_split_into_own_document() {
        let nodes = vec![
            leaf(BlockType::Paragraph, "p0", "Intro"),
            leaf(BlockType::ChildPage, "cp1", "Sub").with_children(vec![leaf(
                BlockType::Paragraph,
                "p1",
                "Inside",
            )]),
        ];
        let documents = Assembler::new(true).assemble(&nodes, PARENT_DOCUMENT, 0);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents.parent(), "\nIntro\n\n");
        assert_eq!(documents.get("Sub"), Some("\nInside\n\n"));
    }

    #[test]
    fn test_nested_child_pages_propagate() {
        let grandchild = leaf(BlockType::ChildPage, "cp2", "Deep")
            .with_children(vec![leaf(BlockType::Paragraph, "p2", "bottom")]);
        let nodes = vec![
            leaf(BlockType::BulletedListItem, "b1", "- list").with_children(vec![
                leaf(BlockType::ChildPage, "cp1", "Mid").with_children(vec![
                    leaf(BlockType::Paragraph, "p1", "middle"),
                    grandchild,
                ]),
            ]),
        ];
        let documents = Assembler::new(true).assemble(&nodes, PARENT_DOCUMENT, 0);

        assert_eq!(documents.parent(), "- list\n");
        assert_eq!(documents.get("Mid"), Some("\nmiddle\n\n"));
        assert_eq!(documents.get("Deep"), Some("\nbottom\n\n"));
    }

    #[test]
    fn test_split_child_page_inside_toggle_propagates() {
        let nodes = vec![
            leaf(BlockType::Toggle, "t1", "Pages").with_children(vec![
                leaf(BlockType::ChildPage, "cp1", "Hidden")
                    .with_children(vec![leaf(BlockType::Paragraph, "p1", "body")]),
            ]),
        ];
        let documents = Assembler::new(true).assemble(&nodes, PARENT_DOCUMENT, 0);

        assert_eq!(documents.get("Hidden"), Some("\nbody\n\n"));
        assert_eq!(
            documents.parent(),
            "<details><summary>Pages</summary></details>\n\n"
        );
    }

    #[test]
    fn test_indentation_applies_to_every_line() {
        let nodes = vec![
            leaf(BlockType::NumberedListItem, "n1", "1. code").with_children(vec![leaf(
                BlockType::Code,
                "c1",
                "```\nx\n```",
            )]),
        ];
        assert_eq!(
            assemble(&nodes).parent(),
            "1. code\n\n\t```\n\tx\n\t```\n\n"
        );
    }
}
