//! Document model types.
//!
//! This module defines the intermediate representation (IR) between the
//! styled hypertext document and the PDF renderer.

mod block;
mod document;
mod paragraph;
mod table;

pub use block::{Block, List, ListItem};
pub use document::Document;
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use table::{Table, TableCell, TableRow};
