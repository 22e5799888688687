//! Error types for mdpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for mdpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Markdown could not be turned into hypertext.
    #[error("Markdown conversion error: {0}")]
    Markdown(String),

    /// The styled hypertext document could not be parsed.
    #[error("Document parsing error: {0}")]
    Parse(String),

    /// Error during layout or pagination.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error raised by the PDF writer.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Markdown(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encoding("invalid utf-8 sequence of 1 bytes from index 0".into());
        assert_eq!(
            err.to_string(),
            "Encoding error: invalid utf-8 sequence of 1 bytes from index 0"
        );

        let err = Error::Render("table has no columns".into());
        assert_eq!(err.to_string(), "Rendering error: table has no columns");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_utf8_error_conversion() {
        let utf8_err = String::from_utf8(vec![0xFF, 0xFE, 0x00]).unwrap_err();
        let err: Error = utf8_err.into();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
