//! Markdown to PDF converter implementation.

use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use super::{ConvertOptions, ConvertResult, DocumentConverter};
use crate::detect;
use crate::error::Result;
use crate::markup;
use crate::parser;
use crate::render::{self, RenderedPdf};
use crate::template;

/// Markdown document converter.
///
/// Renders Markdown to hypertext, applies the glyph substitutions, wraps the
/// result in the styled document template and lays it out as PDF.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    _private: (),
}

impl MarkdownConverter {
    /// Create a new Markdown converter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build the complete styled hypertext document for `source`.
    pub fn to_styled_document(&self, source: &str, title: &str, options: &ConvertOptions) -> Result<String> {
        let normalized: String = source.nfc().collect();
        let body = markup::to_hypertext(&normalized)?;
        let body = markup::substitute_glyphs(&body);
        Ok(template::wrap_document(&body, title, &options.template))
    }

    /// Render Markdown source to PDF bytes without touching the filesystem.
    pub fn render(&self, source: &str, title: &str, options: &ConvertOptions) -> Result<RenderedPdf> {
        let html = self.to_styled_document(source, title, options)?;
        let mut document = parser::parse_document_with_options(&html, &options.parse)?;
        document.title = Some(title.to_string());
        render::render_pdf(&document, &options.template)
    }

    fn convert_file(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let source = detect::read_text(input)?;
        let title = detect::display_title(input);
        let rendered = self.render(&source, &title, options)?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &rendered.bytes)?;
        log::debug!(
            "{} -> {} ({} pages)",
            input.display(),
            output.display(),
            rendered.page_count
        );

        Ok(ConvertResult {
            output: output.to_path_buf(),
            title,
            page_count: rendered.page_count,
            bytes_written: rendered.bytes.len(),
        })
    }
}

impl DocumentConverter for MarkdownConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["md"]
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let result = self.convert_file(input, output, options);
        if let Err(err) = &result {
            log::error!("error converting {}: {}", input.display(), err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_converter_name() {
        let converter = MarkdownConverter::new();
        assert_eq!(converter.name(), "markdown");
        assert_eq!(converter.supported_extensions(), &["md"]);
    }

    #[test]
    fn test_styled_document_regions() {
        let converter = MarkdownConverter::new();
        let html = converter
            .to_styled_document("# Plan\n\n- [x] done\n- [ ] todo\n", "plan", &ConvertOptions::default())
            .unwrap();

        assert!(html.contains("<strong>OITH</strong> | plan | Confidential"));
        assert!(html.contains("<h1 id=\"plan\">Plan</h1>"));
        assert!(html.contains("\u{2713} done"));
        assert!(html.contains("\u{2610} todo"));
        assert!(html.contains("OITH Confidential - <pdf:pagenumber>"));
    }

    #[test]
    fn test_input_is_normalized() {
        let converter = MarkdownConverter::new();
        let html = converter
            .to_styled_document("Cafe\u{0301}\n", "t", &ConvertOptions::default())
            .unwrap();
        assert!(html.contains("Caf\u{00E9}"));
    }

    #[test]
    fn test_convert_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n\nHello.\n").unwrap();
        let output = dir.path().join("pdf_documents/deep/notes.pdf");

        let result = MarkdownConverter::new()
            .convert(&input, &output, &ConvertOptions::default())
            .unwrap();

        assert_eq!(result.output, output);
        assert_eq!(result.title, "notes");
        assert_eq!(result.page_count, 1);
        let bytes = fs::read(&output).unwrap();
        assert_eq!(bytes.len(), result.bytes_written);
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_invalid_utf8_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.md");
        fs::write(&input, [0x23, 0x20, 0xFF, 0xFE, 0x0A]).unwrap();
        let output = dir.path().join("out/bad.pdf");

        let err = MarkdownConverter::new()
            .convert(&input, &output, &ConvertOptions::default())
            .unwrap_err();

        assert!(matches!(err, Error::Encoding(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = MarkdownConverter::new()
            .convert(
                &dir.path().join("missing.md"),
                &dir.path().join("missing.pdf"),
                &ConvertOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
