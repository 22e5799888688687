//! Block-level types.

use super::{Paragraph, Table};

/// A content block in the document body.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph of text, or a heading
    Paragraph(Paragraph),

    /// The header band at the top of the document
    Banner(Paragraph),

    /// A table
    Table(Table),

    /// Preformatted text, whitespace preserved
    CodeBlock {
        /// Raw code text
        text: String,
        /// Language from the fence info string
        language: Option<String>,
    },

    /// A block quote
    Quote(Vec<Block>),

    /// An ordered or unordered list
    List(List),

    /// A horizontal rule
    Rule,
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) | Block::Banner(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
            Block::CodeBlock { text, .. } => text.clone(),
            Block::Quote(blocks) => blocks_plain_text(blocks),
            Block::List(list) => list
                .items
                .iter()
                .map(|item| blocks_plain_text(&item.blocks))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Rule => String::new(),
        }
    }
}

/// Join the plain text of several blocks with blank lines.
pub(crate) fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A list of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    /// Numbered list
    pub ordered: bool,

    /// First number of an ordered list
    pub start: u32,

    /// List items
    pub items: Vec<ListItem>,
}

impl List {
    /// Create a bulleted list.
    pub fn bullet() -> Self {
        Self {
            ordered: false,
            start: 1,
            items: Vec::new(),
        }
    }

    /// Create a numbered list.
    pub fn numbered(start: u32) -> Self {
        Self {
            ordered: true,
            start,
            items: Vec::new(),
        }
    }

    /// Marker text for the item at `index` (0-based).
    ///
    /// Bullets vary with nesting depth.
    pub fn marker(&self, index: usize, depth: usize) -> String {
        if self.ordered {
            let number = u64::from(self.start) + index as u64;
            format!("{number}.")
        } else {
            const BULLETS: [&str; 3] = ["\u{2022}", "\u{2013}", "\u{00B7}"];
            BULLETS[depth % BULLETS.len()].to_string()
        }
    }
}

/// A single list item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    /// Content blocks
    pub blocks: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_markers() {
        let list = List::numbered(3);
        assert_eq!(list.marker(0, 0), "3.");
        assert_eq!(list.marker(2, 0), "5.");

        let bullets = List::bullet();
        assert_eq!(bullets.marker(0, 0), "•");
        assert_eq!(bullets.marker(0, 1), "–");
        assert_eq!(bullets.marker(5, 3), "•");
    }

    #[test]
    fn test_block_plain_text() {
        let quote = Block::Quote(vec![
            Block::Paragraph(Paragraph::with_text("one")),
            Block::Rule,
            Block::Paragraph(Paragraph::with_text("two")),
        ]);
        assert_eq!(quote.plain_text(), "one\n\ntwo");

        let code = Block::CodeBlock {
            text: "let x = 1;\n".into(),
            language: Some("rust".into()),
        };
        assert_eq!(code.plain_text(), "let x = 1;\n");
    }
}
