//! Markdown input detection and text decoding.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// File name suffix identifying Markdown inputs.
pub const MARKDOWN_SUFFIX: &str = ".md";

/// Extension given to rendered outputs.
pub const PDF_EXTENSION: &str = "pdf";

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// UTF-16 byte order marks (little and big endian).
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Check whether a path names a Markdown file.
///
/// Matching is on the file name suffix, exactly like a `*.md` glob, so
/// `README.MD` and `notes.markdown` are not selected.
///
/// # Example
/// ```
/// use mdpdf::detect::is_markdown_path;
///
/// assert!(is_markdown_path("docs/guide.md"));
/// assert!(!is_markdown_path("docs/guide.txt"));
/// ```
pub fn is_markdown_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(MARKDOWN_SUFFIX))
}

/// Read a file and decode it as UTF-8 text.
///
/// # Returns
/// * `Err(Error::Io)` if the file cannot be read
/// * `Err(Error::Encoding)` if the content is not UTF-8
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = fs::read(path)?;
    decode_text(bytes)
}

/// Decode raw bytes as UTF-8 text, dropping a leading byte order mark.
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(UTF16_LE_BOM) || bytes.starts_with(UTF16_BE_BOM) {
        return Err(Error::Encoding(
            "UTF-16 input is not supported, expected UTF-8".into(),
        ));
    }

    let mut text = String::from_utf8(bytes)?;
    if text.as_bytes().starts_with(UTF8_BOM) {
        text.drain(..UTF8_BOM.len());
    }
    Ok(text)
}

/// Derive the display title of a document from its file stem.
pub fn display_title<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
