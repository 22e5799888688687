//! Markdown to hypertext conversion.
//!
//! The conversion uses a fixed extension set: tables, fenced code blocks,
//! raw HTML pass-through, a `[TOC]` table-of-contents marker and hard line
//! breaks for every soft break. Lists follow CommonMark rules, so switching
//! between bullets and numbers always starts a new list.
//!
//! # Example
//!
//! ```
//! use mdpdf::markup::{substitute_glyphs, to_hypertext};
//!
//! let html = to_hypertext("- [ ] write docs\n- [x] ship")?;
//! let html = substitute_glyphs(&html);
//! assert!(html.contains("☐ write docs"));
//! assert!(html.contains("✓ ship"));
//! # Ok::<(), mdpdf::Error>(())
//! ```

mod glyphs;
mod toc;

pub use glyphs::{substitute_glyphs, CHECK_MARK, OPEN_BOX, PENDING, SUBSTITUTIONS};
pub use toc::{build_toc_html, HeadingEntry, TOC_MARKER};

use comrak::options::Options;
use comrak::{format_html, parse_document, Arena};

use crate::error::Result;

/// Build the comrak options for the fixed extension set.
pub fn markdown_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.table = true;
    ext.tagfilter = false;

    let render = &mut options.render;
    render.hardbreaks = true;
    render.r#unsafe = true;
    // Marks Markdown output apart from raw HTML; stripped after rendering.
    render.sourcepos = true;

    options
}

/// Convert Markdown text to a hypertext fragment.
///
/// Headings receive unique `id` attributes and `[TOC]` paragraphs are
/// expanded. Glyph substitutions are not applied here, see
/// [`substitute_glyphs`].
pub fn to_hypertext(markdown: &str) -> Result<String> {
    let options = markdown_options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    let headings = toc::expand_toc(root);

    let mut html = String::new();
    format_html(root, &options, &mut html)?;

    log::trace!("rendered {} headings into {} bytes of html", headings.len(), html.len());
    toc::attach_heading_ids(&html, &headings)
}
