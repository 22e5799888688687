//! PDF serialization of laid-out pages.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::fonts::FontFace;
use super::layout::{DrawOp, PageContent};
use crate::error::Result;
use crate::style::{Color, PageGeometry};

/// Producer string written to the document information dictionary.
pub const PRODUCER: &str = concat!("mdpdf ", env!("CARGO_PKG_VERSION"));

const PDF_VERSION: &str = "1.5";

/// Serialize pages into a complete PDF file.
///
/// Output depends only on the inputs: no timestamps or random identifiers
/// are written.
pub fn write_pdf(pages: &[PageContent], page: &PageGeometry, title: Option<&str>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
        };
        if face.is_text_face() {
            font.set("Encoding", "WinAnsiEncoding");
        }
        let font_id = doc.add_object(font);
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let media_box: Vec<Object> = vec![0.into(), 0.into(), page.width.into(), page.height.into()];
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for content in pages {
        let stream = content_stream(content)?;
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = info_dictionary(&mut doc, title);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn info_dictionary(doc: &mut Document, title: Option<&str>) -> ObjectId {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    };
    if let Some(title) = title {
        info.set("Title", text_string(title));
    }
    doc.add_object(info)
}

/// A PDF text string: literal when ASCII, UTF-16BE with a byte order mark
/// otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn content_stream(page: &PageContent) -> Result<Stream> {
    let content = Content {
        operations: page_operations(page),
    };
    let raw = content.encode()?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    Ok(Stream::new(
        dictionary! {
            "Filter" => "FlateDecode",
        },
        compressed,
    ))
}

fn page_operations(page: &PageContent) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ops.push(fill_color(*color));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let [r, g, b] = color.components();
                ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
                ops.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                bytes,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(face.resource_name().as_bytes().to_vec()), (*size).into()],
                ));
                ops.push(fill_color(*color));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(bytes.clone(), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

fn fill_color(color: Color) -> Operation {
    let [r, g, b] = color.components();
    Operation::new("rg", vec![r.into(), g.into(), b.into()])
}
