//! Rendering of styled documents into paginated PDF.
//!
//! Layout happens in memory: [`render_pdf`] returns the complete file, so a
//! failure never leaves a partial document behind.

mod fonts;
mod layout;
mod pdf;

pub use fonts::{encode, text_width, EncodedRun, FontFace};
pub use layout::{layout, DrawOp, PageContent};
pub use pdf::{write_pdf, PRODUCER};

use crate::error::{Error, Result};
use crate::model::Document;
use crate::style::StyleTemplate;

/// A rendered PDF file.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    /// The complete file
    pub bytes: Vec<u8>,

    /// Number of pages
    pub page_count: usize,
}

/// Lay out and serialize a document.
pub fn render_pdf(document: &Document, template: &StyleTemplate) -> Result<RenderedPdf> {
    let page = &template.page;
    if page.content_width() <= 0.0 || page.body_top() <= page.body_bottom() {
        return Err(Error::Render(format!(
            "page geometry {}x{} with margin {} leaves no room for content",
            page.width, page.height, page.margin
        )));
    }

    let pages = layout(document, template);
    let bytes = write_pdf(&pages, page, document.title.as_deref())?;
    log::debug!("rendered {} pages ({} bytes)", pages.len(), bytes.len());

    Ok(RenderedPdf {
        bytes,
        page_count: pages.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Paragraph};

    fn footer_strings(bytes: &[u8]) -> Vec<String> {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = doc.get_and_decode_page_content(page_id).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| op.operands.first()?.as_str().ok())
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    .filter(|text| text.starts_with("Footer"))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect()
    }

    #[test]
    fn test_render_numbers_every_page() {
        let mut document = Document::new();
        for i in 0..150 {
            document.add_paragraph(Paragraph::with_text(format!("Line {i}")));
        }
        let mut footer = Paragraph::with_text("Footer ");
        footer.add_page_number();
        document.footer = Some(footer);

        let rendered = render_pdf(&document, &StyleTemplate::default()).unwrap();
        assert!(rendered.page_count > 1);

        let footers = footer_strings(&rendered.bytes);
        assert_eq!(footers.len(), rendered.page_count);
        for (index, footer) in footers.iter().enumerate() {
            assert_eq!(footer, &format!("Footer {}", index + 1));
        }
    }

    #[test]
    fn test_render_rejects_degenerate_geometry() {
        let mut template = StyleTemplate::default();
        template.page.margin = 400.0;
        let document = Document {
            body: vec![Block::Rule],
            ..Document::default()
        };
        let err = render_pdf(&document, &template).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
