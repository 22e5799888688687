//! Document-level types.

use super::block::blocks_plain_text;
use super::{Block, Paragraph};

/// A styled document ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Document title, written to the PDF metadata
    pub title: Option<String>,

    /// Body content in reading order
    pub body: Vec<Block>,

    /// Footer frame content, drawn on every page
    pub footer: Option<Paragraph>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the body.
    pub fn add_block(&mut self, block: Block) {
        self.body.push(block);
    }

    /// Add a paragraph to the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Get the number of top-level blocks.
    pub fn block_count(&self) -> usize {
        self.body.len()
    }

    /// Check if the body has no blocks.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Get the header band, if present.
    pub fn banner(&self) -> Option<&Paragraph> {
        self.body.iter().find_map(|block| match block {
            Block::Banner(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over headings as `(level, text)`.
    pub fn headings(&self) -> impl Iterator<Item = (u8, String)> + '_ {
        self.body.iter().filter_map(|block| match block {
            Block::Paragraph(p) => p.heading_level().map(|level| (level, p.plain_text())),
            _ => None,
        })
    }

    /// Get plain text content of the body.
    pub fn plain_text(&self) -> String {
        blocks_plain_text(&self.body)
    }
}
