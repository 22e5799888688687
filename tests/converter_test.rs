//! Integration tests for the converter module.

use std::fs;
use std::path::Path;

use lopdf::Document as PdfDocument;
use mdpdf::convert::{ConvertOptions, ConvertResult, DocumentConverter, MarkdownConverter};
use mdpdf::error::{Error, Result};
use tempfile::TempDir;

/// Mock converter for testing.
struct MockConverter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockConverter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl DocumentConverter for MockConverter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn convert(&self, _input: &Path, output: &Path, _options: &ConvertOptions) -> Result<ConvertResult> {
        Ok(ConvertResult {
            output: output.to_path_buf(),
            title: format!("Converted by {}", self.name),
            page_count: 0,
            bytes_written: 0,
        })
    }
}

/// Collect every text-showing operand of one page.
fn page_text(doc: &PdfDocument, page: u32) -> Vec<Vec<u8>> {
    let pages = doc.get_pages();
    let content = doc.get_and_decode_page_content(pages[&page]).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(<[u8]>::to_vec)
        .collect()
}

fn contains_run(runs: &[Vec<u8>], needle: &[u8]) -> bool {
    runs.iter().any(|run| run.windows(needle.len()).any(|w| w == needle))
}

#[test]
fn test_mock_converter_through_trait_object() {
    let converter: Box<dyn DocumentConverter> = Box::new(MockConverter::new(vec!["md", "markdown"], "mock"));
    assert_eq!(converter.name(), "mock");
    assert!(converter.supports_extension("MARKDOWN"));
    assert!(!converter.supports_extension("txt"));

    let result = converter
        .convert(Path::new("a.md"), Path::new("a.pdf"), &ConvertOptions::default())
        .unwrap();
    assert_eq!(result.title, "Converted by mock");
}

#[test]
fn test_rendered_pdf_has_header_and_footer_on_every_page() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("handbook.md");
    let mut source = String::from("# Handbook\n\n");
    for i in 0..200 {
        source.push_str(&format!("Paragraph {i} with enough words to take up a line or two of space.\n\n"));
    }
    fs::write(&input, source).unwrap();
    let output = dir.path().join("out/handbook.pdf");

    let result = MarkdownConverter::new()
        .convert(&input, &output, &ConvertOptions::default())
        .unwrap();
    assert!(result.page_count > 1);

    let doc = PdfDocument::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), result.page_count);

    for page in 1..=result.page_count as u32 {
        let runs = page_text(&doc, page);
        let footer = format!("OITH Confidential - {page}");
        assert!(contains_run(&runs, footer.as_bytes()), "page {page} lacks its footer");
    }
    assert!(contains_run(&page_text(&doc, 1), b"OITH"));
    assert!(contains_run(&page_text(&doc, 1), b"handbook | Confidential"));
}

#[test]
fn test_checkbox_glyphs_use_dingbats() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tasks.md");
    fs::write(&input, "- [ ] task\n- [x] done\n\nkeep [a] and [b]\n").unwrap();
    let output = dir.path().join("tasks.pdf");

    MarkdownConverter::new()
        .convert(&input, &output, &ConvertOptions::default())
        .unwrap();

    let doc = PdfDocument::load(&output).unwrap();
    let runs = page_text(&doc, 1);
    // ZapfDingbats: 0x6F is the open box, 0x33 the check mark.
    assert!(runs.iter().any(|run| run == b"\x6F"));
    assert!(runs.iter().any(|run| run == b"\x33"));
    assert!(contains_run(&runs, b"[a]"));
    assert!(!contains_run(&runs, b"[ ]"));
}

#[test]
fn test_overwrites_existing_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "# Doc\n").unwrap();
    let output = dir.path().join("doc.pdf");
    fs::write(&output, b"stale").unwrap();

    let result = MarkdownConverter::new()
        .convert(&input, &output, &ConvertOptions::default())
        .unwrap();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(bytes.len(), result.bytes_written);
}

#[test]
fn test_invalid_utf8_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("latin1.md");
    fs::write(&input, b"caf\xE9\n").unwrap();

    let err = MarkdownConverter::new()
        .convert(&input, &dir.path().join("latin1.pdf"), &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
}

#[test]
fn test_title_metadata() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("release-notes.md");
    fs::write(&input, "Text\n").unwrap();
    let output = dir.path().join("release-notes.pdf");

    MarkdownConverter::new()
        .convert(&input, &output, &ConvertOptions::default())
        .unwrap();

    let doc = PdfDocument::load(&output).unwrap();
    let info = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info).unwrap();
    assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"release-notes");
}
