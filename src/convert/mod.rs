//! Document converter module.
//!
//! A [`DocumentConverter`] turns one source file into one PDF. The batch
//! runner only talks to this trait, so alternative converters (or test
//! doubles) can be plugged in without touching discovery or reporting.
//!
//! # Example
//!
//! ```no_run
//! use mdpdf::convert::{ConvertOptions, DocumentConverter, MarkdownConverter};
//! use std::path::Path;
//!
//! fn main() -> mdpdf::Result<()> {
//!     let converter = MarkdownConverter::new();
//!     let result = converter.convert(
//!         Path::new("notes.md"),
//!         Path::new("pdf_documents/notes.pdf"),
//!         &ConvertOptions::default(),
//!     )?;
//!     println!("{} pages", result.page_count);
//!     Ok(())
//! }
//! ```

mod markdown;

pub use markdown::MarkdownConverter;

use crate::error::Result;
use crate::parser::ParseOptions;
use crate::style::StyleTemplate;
use std::path::{Path, PathBuf};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Visual presentation shared by every document of a run
    pub template: StyleTemplate,

    /// Limits applied while reading the styled document
    pub parse: ParseOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style template.
    pub fn with_template(mut self, template: StyleTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    /// Path of the written PDF
    pub output: PathBuf,

    /// Title shown in the header band and document metadata
    pub title: String,

    /// Number of pages in the PDF
    pub page_count: usize,

    /// Size of the PDF in bytes
    pub bytes_written: usize,
}

/// Trait for document converters.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["md"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert the file at `input`, writing the PDF to `output`.
    ///
    /// Parent directories of `output` are created as needed and an existing
    /// file is overwritten. On failure nothing is written to `output`.
    fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions)
        -> Result<ConvertResult>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let mut template = StyleTemplate::default();
        template.font_size = 12.0;
        let options = ConvertOptions::new()
            .with_template(template)
            .with_parse_options(ParseOptions::new().with_max_depth(16));

        assert_eq!(options.template.font_size, 12.0);
        assert_eq!(options.parse.max_depth, 16);
    }

    #[test]
    fn test_supports_extension_is_case_insensitive() {
        let converter = MarkdownConverter::new();
        assert!(converter.supports_extension("md"));
        assert!(converter.supports_extension("MD"));
        assert!(!converter.supports_extension("pdf"));
    }
}
