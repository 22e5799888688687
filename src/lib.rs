//! # mdpdf
//!
//! Batch conversion of Markdown documents into styled, paginated PDF.
//!
//! Every Markdown file under a root directory is rendered with a fixed
//! presentation: a dark header band naming the project, the document title
//! and its confidentiality marking, and a footer carrying the page number.
//! PDFs are written into a `pdf_documents/` tree that mirrors the sources.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdpdf::convert_file;
//!
//! fn main() -> mdpdf::Result<()> {
//!     let result = convert_file("notes.md", "pdf_documents/notes.pdf")?;
//!     println!("{} pages", result.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **markup**: Markdown to hypertext, table of contents, checkbox glyphs
//! - **template**: header band, footer and embedded style sheet
//! - **parser**: styled hypertext to the block model
//! - **render**: layout, pagination and PDF output
//! - **batch**: discovery, exclusion and the run report

pub mod batch;
pub mod convert;
pub mod detect;
pub mod error;
pub mod markup;
pub mod model;
pub mod parser;
pub mod render;
pub mod style;
pub mod template;

// Re-export commonly used types
pub use batch::{BatchEvent, RunReport};
pub use convert::{ConvertOptions, ConvertResult, DocumentConverter, MarkdownConverter};
pub use error::{Error, Result};
pub use model::{Block, Document, InlineContent, Paragraph, Table, TableCell, TableRow};
pub use parser::ParseOptions;
pub use render::RenderedPdf;
pub use style::StyleTemplate;

use std::path::Path;

/// Convert one Markdown file to PDF with the default presentation.
///
/// # Example
///
/// ```no_run
/// use mdpdf::convert_file;
///
/// convert_file("docs/plan.md", "pdf_documents/docs/plan.pdf").unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertResult> {
    convert_file_with_options(input, output, &ConvertOptions::default())
}

/// Convert one Markdown file to PDF with custom options.
pub fn convert_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    MarkdownConverter::new().convert(input.as_ref(), output.as_ref(), options)
}

/// Render Markdown source to PDF bytes in memory.
///
/// `title` is shown in the header band and stored as document metadata.
///
/// # Example
///
/// ```
/// let pdf = mdpdf::render_markdown("# Hello\n\n- [x] done\n", "hello").unwrap();
/// assert!(pdf.bytes.starts_with(b"%PDF-"));
/// assert_eq!(pdf.page_count, 1);
/// ```
pub fn render_markdown(source: &str, title: &str) -> Result<RenderedPdf> {
    MarkdownConverter::new().render(source, title, &ConvertOptions::default())
}

/// Convert every Markdown file under `root` into `root/pdf_documents/`.
///
/// Failures are counted in the returned report and never abort the run.
pub fn convert_tree<P: AsRef<Path>>(root: P) -> RunReport {
    batch::run(
        root.as_ref(),
        &MarkdownConverter::new(),
        &ConvertOptions::default(),
        |_| {},
    )
}

/// Builder for converting Markdown documents.
///
/// # Example
///
/// ```no_run
/// use mdpdf::Mdpdf;
///
/// let report = Mdpdf::new()
///     .with_max_depth(64)
///     .convert_tree(".");
/// println!("{} converted, {} failed", report.succeeded, report.failed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mdpdf {
    options: ConvertOptions,
}

impl Mdpdf {
    /// Create a builder with the default presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style template.
    pub fn with_template(mut self, template: StyleTemplate) -> Self {
        self.options = self.options.with_template(template);
        self
    }

    /// Set the maximum element nesting accepted while parsing.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        let parse = self.options.parse.clone().with_max_depth(depth);
        self.options = self.options.with_parse_options(parse);
        self
    }

    /// Conversion options assembled so far.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one file.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<ConvertResult> {
        convert_file_with_options(input, output, &self.options)
    }

    /// Render Markdown source in memory.
    pub fn render(&self, source: &str, title: &str) -> Result<RenderedPdf> {
        MarkdownConverter::new().render(source, title, &self.options)
    }

    /// Convert a whole tree, reporting progress through `on_event`.
    pub fn run<P, F>(&self, root: P, on_event: F) -> RunReport
    where
        P: AsRef<Path>,
        F: FnMut(BatchEvent<'_>),
    {
        batch::run(root.as_ref(), &MarkdownConverter::new(), &self.options, on_event)
    }

    /// Convert a whole tree without progress reporting.
    pub fn convert_tree<P: AsRef<Path>>(&self, root: P) -> RunReport {
        self.run(root, |_| {})
    }
}
