//! Hypertext parsing module.
//!
//! Reads the styled document produced by [`crate::template::wrap_document`]
//! into the [`Document`] model consumed by the renderer. The markup is parsed
//! with an HTML5 parser; the resulting element tree is then walked in
//! document order. Only the subset of HTML that the markup stage and the
//! template emit is understood; unknown elements are transparent and their
//! text is kept.

mod builder;
mod options;

pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};

use scraper::{Html, Node};

use crate::error::Result;
use crate::model::Document;
use builder::DocumentBuilder;

/// Parse a hypertext document with default options.
pub fn parse_document(html: &str) -> Result<Document> {
    parse_document_with_options(html, &ParseOptions::default())
}

/// Parse a hypertext document.
///
/// The `<title>` element, if any, becomes the document title.
pub fn parse_document_with_options(html: &str, options: &ParseOptions) -> Result<Document> {
    let parsed = Html::parse_document(html);
    for error in &parsed.errors {
        log::trace!("html parse error: {error}");
    }

    let mut builder = DocumentBuilder::new(options.clone());
    let mut title: Option<String> = None;
    let mut in_title = false;

    // Explicit stack so deeply nested markup cannot exhaust the call stack.
    let mut stack = vec![(parsed.tree.root(), false)];
    while let Some((node, closing)) = stack.pop() {
        match node.value() {
            Node::Element(element) if closing => {
                if element.name() == "title" {
                    in_title = false;
                }
                builder.end_element(element.name());
            }
            Node::Element(element) => {
                if element.name() == "title" {
                    in_title = true;
                }
                builder.start_element(element)?;
                stack.push((node, true));
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            Node::Text(text) => {
                if in_title {
                    title.get_or_insert_with(String::new).push_str(text.trim());
                }
                builder.text(text);
            }
            Node::Document | Node::Fragment => {
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            _ => {}
        }
    }

    let mut document = builder.finish();
    document.title = title.filter(|t| !t.is_empty());
    log::debug!(
        "parsed {} blocks (footer: {})",
        document.block_count(),
        document.footer.is_some()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Block, InlineContent};

    fn parse(html: &str) -> Document {
        parse_document(html).unwrap()
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let doc = parse("<h1 id=\"intro\">Intro</h1>\n<p>Hello <strong>bold</strong> <em>it</em></p>\n");
        assert_eq!(doc.block_count(), 2);
        assert_eq!(
            doc.headings().collect::<Vec<_>>(),
            vec![(1, "Intro".to_string())]
        );

        let Block::Paragraph(p) = &doc.body[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.plain_text(), "Hello bold it");
        let styles: Vec<_> = p
            .content
            .iter()
            .filter_map(|c| match c {
                InlineContent::Text(run) => Some((run.text.as_str(), run.style.bold)),
                _ => None,
            })
            .collect();
        assert_eq!(styles[1], ("bold", true));
    }

    #[test]
    fn test_line_breaks() {
        let doc = parse("<p>one<br />\ntwo</p>");
        let Block::Paragraph(p) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.plain_text(), "one\ntwo");
    }

    #[test]
    fn test_nested_lists() {
        let html = "<ol start=\"3\">\n<li>first\n<ul>\n<li>inner</li>\n</ul>\n</li>\n<li>second</li>\n</ol>\n";
        let doc = parse(html);
        assert_eq!(doc.block_count(), 1);

        let Block::List(list) = &doc.body[0] else {
            panic!("expected list");
        };
        assert!(list.ordered);
        assert_eq!(list.start, 3);
        assert_eq!(list.items.len(), 2);
        assert!(matches!(list.items[0].blocks[1], Block::List(ref inner) if !inner.ordered));
        assert_eq!(list.items[1].blocks[0].plain_text(), "second");
    }

    #[test]
    fn test_table() {
        let html = "<table>\n<thead>\n<tr>\n<th>Task</th>\n<th align=\"right\">Hours</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>Docs</td>\n<td align=\"right\">3</td>\n</tr>\n</tbody>\n</table>\n";
        let doc = parse(html);
        let Block::Table(table) = &doc.body[0] else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.header_rows(), 1);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[1].cells[1].alignment, Alignment::Right);
        assert_eq!(table.plain_text(), "Task\tHours\nDocs\t3");
    }

    #[test]
    fn test_code_block_preserves_whitespace() {
        let html = "<pre><code class=\"language-rust\">fn main() {\n    let x = 1 &lt; 2;\n}\n</code></pre>\n";
        let doc = parse(html);
        assert_eq!(
            doc.body[0],
            Block::CodeBlock {
                text: "fn main() {\n    let x = 1 < 2;\n}\n".into(),
                language: Some("rust".into()),
            }
        );
    }

    #[test]
    fn test_quote_and_rule() {
        let doc = parse("<blockquote>\n<p>quoted</p>\n</blockquote>\n<hr />\n<p>after</p>");
        assert_eq!(doc.block_count(), 3);
        assert!(matches!(&doc.body[0], Block::Quote(inner) if inner.len() == 1));
        assert_eq!(doc.body[1], Block::Rule);
    }

    #[test]
    fn test_banner_and_footer() {
        let html = "<html><head><title>notes</title><style>p { color: red; }</style></head><body>\n\
            <div class=\"header-info\">\n<strong>OITH</strong> | notes | Confidential\n</div>\n\
            <p>Body</p>\n\
            <div id=\"footerContent\" class=\"footer\">\nOITH Confidential - <pdf:pagenumber>\n</div>\n\
            </body></html>";
        let doc = parse(html);

        assert_eq!(doc.title.as_deref(), Some("notes"));
        assert_eq!(doc.banner().unwrap().plain_text(), "OITH | notes | Confidential");
        assert_eq!(doc.block_count(), 2);

        let footer = doc.footer.unwrap();
        assert_eq!(footer.plain_text(), "OITH Confidential - #");
        assert_eq!(footer.content.last(), Some(&InlineContent::PageNumber));
    }

    #[test]
    fn test_checkbox_input() {
        let doc = parse("<ul>\n<li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>\n</ul>");
        assert_eq!(doc.plain_text(), "\u{2713} done");
    }

    #[test]
    fn test_unknown_elements_are_transparent() {
        let doc = parse("<section><span>kept</span></section>");
        assert_eq!(doc.plain_text(), "kept");
    }

    #[test]
    fn test_nesting_limit() {
        let html = "<blockquote>".repeat(20);
        let options = ParseOptions::new().with_max_depth(10);
        let err = parse_document_with_options(&html, &options).unwrap_err();
        assert!(err.to_string().contains("nesting"));

        assert!(parse_document(&html).is_ok());
    }

    #[test]
    fn test_list_items_share_their_list_level() {
        let html = format!(
            "{}deep{}",
            "<ul><li>".repeat(60),
            "</li></ul>".repeat(60)
        );
        let doc = parse(&html);
        assert_eq!(doc.plain_text(), "deep");

        let options = ParseOptions::new().with_max_depth(59);
        let err = parse_document_with_options(&html, &options).unwrap_err();
        assert!(err.to_string().contains("nesting"));
    }

    #[test]
    fn test_entities_and_comments() {
        let doc = parse("<!DOCTYPE html><!-- note --><p>a &lt; b &amp;&amp; c&#39;s&nbsp;d</p>");
        assert_eq!(doc.plain_text(), "a < b && c's\u{00A0}d");
    }

    #[test]
    fn test_style_content_is_not_text() {
        let doc = parse("<style>a > b { color: red; }</style><p>x</p>");
        assert_eq!(doc.plain_text(), "x");
    }

    #[test]
    fn test_literal_angle_bracket() {
        let doc = parse("<p>1 < 2 <em>x</em></p>");
        assert_eq!(doc.plain_text(), "1 < 2 x");
    }

    #[test]
    fn test_deep_transparent_nesting() {
        let html = format!("{}deep{}", "<span>".repeat(5000), "</span>".repeat(5000));
        let doc = parse(&html);
        assert_eq!(doc.plain_text(), "deep");
    }

    #[test]
    fn test_unclosed_elements_are_closed_at_end() {
        let doc = parse("<ul><li>open item");
        assert_eq!(doc.plain_text(), "open item");
    }
}
