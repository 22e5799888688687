//! CSS emission for the embedded style sheet.

use std::fmt::Write;

use super::{HeadingStyle, StyleTemplate};

impl StyleTemplate {
    /// Render the template as the `<style>` element embedded in documents.
    pub fn to_css(&self) -> String {
        let mut css = String::from("<style>\n");
        let page = &self.page;

        // Writing into a String cannot fail.
        let _ = write!(
            css,
            "@page {{\n    size: {}pt {}pt;\n    margin: {}pt;\n    @frame footer {{\n        \
             -pdf-frame-content: footerContent;\n        bottom: {}pt;\n        \
             margin-left: {}pt;\n        margin-right: {}pt;\n        height: {}pt;\n    }}\n}}\n\n",
            page.width,
            page.height,
            page.margin,
            page.footer_bottom,
            page.margin,
            page.margin,
            page.footer_height,
        );

        let _ = write!(
            css,
            "body {{\n    font-family: Helvetica, Arial, sans-serif;\n    font-size: {}pt;\n    \
             line-height: {};\n    color: {};\n}}\n\n",
            self.font_size, self.line_height, self.text_color,
        );

        for level in 1..=6u8 {
            push_heading(&mut css, level, self.heading(level));
        }

        let table = &self.table;
        let _ = write!(
            css,
            "table {{\n    border-collapse: collapse;\n    width: 100%;\n    margin: {}pt 0;\n    \
             font-size: {}pt;\n}}\n\nth, td {{\n    border: {}pt solid {};\n    \
             padding: {}pt {}pt;\n    text-align: left;\n}}\n\nth {{\n    \
             background-color: {};\n    color: {};\n    font-weight: bold;\n}}\n\n\
             tr:nth-child(even) {{\n    background-color: {};\n}}\n\n",
            table.margin,
            table.font_size,
            table.border.width,
            table.border.color,
            table.cell_padding_y,
            table.cell_padding_x,
            table.header_background,
            table.header_color,
            table.stripe_background,
        );

        let _ = write!(
            css,
            "code {{\n    background-color: {};\n    padding: 1px {}pt;\n    \
             font-family: Courier, monospace;\n    font-size: {}pt;\n}}\n\n\
             pre {{\n    background-color: {};\n    color: {};\n    padding: {}pt;\n    \
             font-size: {}pt;\n    white-space: pre-wrap;\n    word-wrap: break-word;\n}}\n\n",
            self.inline_code.background,
            self.inline_code.padding,
            self.inline_code.font_size,
            self.code_block.background,
            self.code_block.color,
            self.code_block.padding,
            self.code_block.font_size,
        );

        let quote = &self.quote;
        let _ = write!(
            css,
            "blockquote {{\n    border-left: {}pt solid {};\n    margin: {}pt 0;\n    \
             padding: {}pt {}pt;\n    background-color: {};\n    font-style: {};\n}}\n\n",
            quote.border.width,
            quote.border.color,
            quote.margin,
            quote.padding_y,
            quote.padding_x,
            quote.background,
            if quote.italic { "italic" } else { "normal" },
        );

        let _ = write!(
            css,
            "ul, ol {{\n    margin: {}pt 0;\n    padding-left: {}pt;\n}}\n\n\
             li {{\n    margin: {}pt 0;\n}}\n\na {{\n    color: {};\n}}\n\n\
             hr {{\n    border: none;\n    border-top: {}pt solid {};\n    margin: {}pt 0;\n}}\n\n",
            self.list.margin,
            self.list.indent,
            self.list.item_spacing,
            self.link_color,
            self.rule.border.width,
            self.rule.border.color,
            self.rule.margin,
        );

        let banner = &self.banner;
        let _ = write!(
            css,
            ".footer {{\n    font-size: {}pt;\n    color: {};\n    text-align: center;\n}}\n\n\
             .header-info {{\n    background-color: {};\n    color: {};\n    \
             padding: {}pt {}pt;\n    margin-bottom: {}pt;\n    font-size: {}pt;\n}}\n\n\
             .checkmark {{\n    color: {};\n}}\n\n.pending {{\n    color: {};\n}}\n",
            self.footer.font_size,
            self.footer.color,
            banner.background,
            banner.color,
            banner.padding_y,
            banner.padding_x,
            banner.margin_bottom,
            banner.font_size,
            self.checkmark_color,
            self.pending_color,
        );

        css.push_str("</style>");
        css
    }
}

fn push_heading(css: &mut String, level: u8, style: &HeadingStyle) {
    let _ = write!(
        css,
        "h{level} {{\n    color: {};\n    margin-top: {}pt;\n    font-size: {}pt;\n",
        style.color, style.margin_top, style.font_size,
    );
    if let Some(border) = &style.border_bottom {
        let _ = write!(
            css,
            "    border-bottom: {}pt solid {};\n    padding-bottom: {}pt;\n",
            border.width, border.color, style.padding_bottom,
        );
    }
    css.push_str("}\n\n");
}

#[cfg(test)]
mod tests {
    use crate::style::StyleTemplate;

    #[test]
    fn test_css_wraps_style_element() {
        let css = StyleTemplate::default().to_css();
        assert!(css.starts_with("<style>\n@page {"));
        assert!(css.ends_with("</style>"));
    }

    #[test]
    fn test_css_reserves_footer_frame() {
        let css = StyleTemplate::default().to_css();
        assert!(css.contains("size: 612pt 792pt;"));
        assert!(css.contains("margin: 54pt;"));
        assert!(css.contains("-pdf-frame-content: footerContent;"));
        assert!(css.contains("bottom: 36pt;"));
    }

    #[test]
    fn test_css_colors() {
        let css = StyleTemplate::default().to_css();
        assert!(css.contains("color: #333333;"));
        assert!(css.contains("border-bottom: 1.5pt solid #e94560;"));
        assert!(css.contains("background-color: #1a1a2e;"));
        assert!(css.contains(".checkmark {\n    color: #10b981;\n}"));
    }
}
