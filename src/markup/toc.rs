//! Table-of-contents marker expansion and heading anchors.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use slug::slugify;

use crate::error::{Error, Result};

/// Paragraph text that is replaced by the generated table of contents.
pub const TOC_MARKER: &str = "[TOC]";

/// Attribute comrak writes on the elements it renders itself.
pub(crate) const SOURCEPOS_ATTR: &str = "data-sourcepos";

/// A heading discovered while walking the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// Heading level (1-6)
    pub level: u8,
    /// Anchor slug, unique within the document
    pub slug: String,
    /// Plain heading text
    pub text: String,
}

/// Deterministically generate unique anchor slugs within a single document.
///
/// Duplicates receive monotonic suffixes (`setup`, `setup-2`, `setup-3`).
#[derive(Debug, Default)]
pub(crate) struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
}

impl AnchorSlugger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn anchor_for(&mut self, heading: &str) -> String {
        let mut base = slugify(heading);
        if base.is_empty() {
            base = "section".to_string();
        }

        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{}", *count)
        }
    }
}

/// Collect headings and replace `[TOC]` paragraphs with a nested link list.
///
/// Returns the headings in document order; their slugs are later attached to
/// the rendered `<hN>` tags by [`attach_heading_ids`].
pub(crate) fn expand_toc<'a>(root: &'a AstNode<'a>) -> Vec<HeadingEntry> {
    let mut slugger = AnchorSlugger::new();
    let mut headings = Vec::new();
    let mut markers = Vec::new();

    for node in root.descendants() {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Heading(heading) => {
                let text = collect_inline_text(node);
                let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
                headings.push(HeadingEntry {
                    level: heading.level,
                    slug: slugger.anchor_for(&normalized),
                    text: normalized,
                });
            }
            NodeValue::Paragraph if collect_inline_text(node).trim() == TOC_MARKER => {
                markers.push(node);
            }
            _ => {}
        }
    }

    if !markers.is_empty() {
        let toc = build_toc_html(&headings);
        for node in markers {
            {
                let mut data = node.data.borrow_mut();
                data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal: toc.clone(),
                });
            }
            while let Some(child) = node.first_child() {
                child.detach();
            }
        }
    }

    headings
}

/// Render the nested `<ul>` list for the given headings.
pub fn build_toc_html(headings: &[HeadingEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut open_levels: Vec<u8> = Vec::new();

    for heading in headings {
        match open_levels.last().copied() {
            None => {
                html.push_str("<ul>\n");
                open_levels.push(heading.level);
            }
            Some(current) if heading.level > current => {
                html.push_str("\n<ul>\n");
                open_levels.push(heading.level);
            }
            Some(_) => {
                html.push_str("</li>\n");
                while open_levels.len() > 1
                    && open_levels.last().is_some_and(|&level| heading.level < level)
                {
                    open_levels.pop();
                    html.push_str("</ul>\n</li>\n");
                }
            }
        }

        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            heading.slug,
            html_escape::encode_text(&heading.text)
        ));
    }

    if !open_levels.is_empty() {
        html.push_str("</li>\n");
        while open_levels.pop().is_some() {
            html.push_str("</ul>\n");
            if !open_levels.is_empty() {
                html.push_str("</li>\n");
            }
        }
    }

    html.push_str("</div>\n");
    html
}

/// Attach `id` attributes to the headings rendered from Markdown, in
/// document order, and strip the source position markers.
///
/// Only elements carrying a source position are Markdown output, so headings
/// written as raw HTML keep their markup and do not consume an id.
pub(crate) fn attach_heading_ids(html: &str, headings: &[HeadingEntry]) -> Result<String> {
    let headings_shared = Rc::new(headings.to_vec());
    let index = Rc::new(Cell::new(0usize));
    let error_slot: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[data-sourcepos]", {
                let headings_shared = Rc::clone(&headings_shared);
                let index = Rc::clone(&index);
                let error_slot = Rc::clone(&error_slot);
                move |el| {
                    el.remove_attribute(SOURCEPOS_ATTR);

                    let tag_name = el.tag_name();
                    let Some(level) = heading_level(&tag_name) else {
                        return Ok(());
                    };
                    let position = index.get();
                    let Some(info) = headings_shared.get(position) else {
                        *error_slot.borrow_mut() = Some("unexpected extra heading".to_string());
                        return Ok(());
                    };
                    index.set(position + 1);

                    if level != info.level {
                        *error_slot.borrow_mut() = Some(format!(
                            "heading level mismatch: expected h{}, found {}",
                            info.level, tag_name
                        ));
                        return Ok(());
                    }

                    el.set_attribute("id", &info.slug)?;
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| Error::Markdown(err.to_string()))?;

    if let Some(message) = error_slot.borrow_mut().take() {
        return Err(Error::Markdown(message));
    }

    Ok(rewritten)
}

fn heading_level(tag_name: &str) -> Option<u8> {
    tag_name
        .strip_prefix('h')
        .and_then(|value| value.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}
