//! The style template applied to every converted document.
//!
//! A [`StyleTemplate`] is built once per run and passed by reference into
//! each conversion. It drives both the CSS embedded in the hypertext document
//! ([`StyleTemplate::to_css`]) and the layout performed by the renderer, so
//! the two never disagree. All lengths are in PDF points (1/72 inch).

mod color;
mod css;

pub use color::Color;

/// Page size, margins and the footer frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Margin on all four sides
    pub margin: f32,
    /// Distance from the bottom edge to the footer frame
    pub footer_bottom: f32,
    /// Height of the footer frame
    pub footer_height: f32,
}

impl PageGeometry {
    /// US Letter with 0.75in margins and a 0.5in footer frame 0.5in above the edge.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 54.0,
            footer_bottom: 36.0,
            footer_height: 36.0,
        }
    }

    /// Width available to body content.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Y coordinate where body content starts.
    pub fn body_top(&self) -> f32 {
        self.height - self.margin
    }

    /// Lowest Y coordinate body content may reach; the footer frame is reserved.
    pub fn body_bottom(&self) -> f32 {
        self.margin.max(self.footer_bottom + self.footer_height)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// A horizontal rule drawn under a heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

/// Heading presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingStyle {
    pub font_size: f32,
    pub color: Color,
    pub margin_top: f32,
    pub padding_bottom: f32,
    pub border_bottom: Option<Border>,
}

/// Presentation of `<pre>` blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockStyle {
    pub font_size: f32,
    pub color: Color,
    pub background: Color,
    pub padding: f32,
}

/// Presentation of inline `<code>`.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineCodeStyle {
    pub font_size: f32,
    pub background: Color,
    pub padding: f32,
}

/// Table presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub border: Border,
    pub header_background: Color,
    pub header_color: Color,
    pub stripe_background: Color,
    pub cell_padding_x: f32,
    pub cell_padding_y: f32,
    pub margin: f32,
}

/// Block quote presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteStyle {
    pub border: Border,
    pub background: Color,
    pub padding_x: f32,
    pub padding_y: f32,
    pub margin: f32,
    pub italic: bool,
}

/// List presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStyle {
    pub indent: f32,
    pub item_spacing: f32,
    pub margin: f32,
}

/// Horizontal rule presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleStyle {
    pub border: Border,
    pub margin: f32,
}

/// The header band shown at the top of the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerStyle {
    pub font_size: f32,
    pub color: Color,
    pub background: Color,
    pub padding_x: f32,
    pub padding_y: f32,
    pub margin_bottom: f32,
}

/// The running footer.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterStyle {
    pub font_size: f32,
    pub color: Color,
}

/// Fixed strings printed in the header band and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Project label shown in bold at the start of the header band
    pub project: String,
    /// Confidentiality marker shown at the end of the header band
    pub confidential: String,
    /// Footer text; the page number is appended after " - "
    pub footer: String,
}

/// Visual presentation shared by all conversions of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTemplate {
    pub page: PageGeometry,
    pub font_size: f32,
    pub line_height: f32,
    pub text_color: Color,
    pub paragraph_spacing: f32,
    pub link_color: Color,
    /// Styles for h1 through h6
    pub headings: [HeadingStyle; 6],
    pub heading_spacing: f32,
    pub inline_code: InlineCodeStyle,
    pub code_block: CodeBlockStyle,
    pub table: TableStyle,
    pub quote: QuoteStyle,
    pub list: ListStyle,
    pub rule: RuleStyle,
    pub banner: BannerStyle,
    pub footer: FooterStyle,
    pub checkmark_color: Color,
    pub pending_color: Color,
    pub labels: Labels,
}

impl StyleTemplate {
    /// Create the default template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for a heading level, clamped to 1-6.
    pub fn heading(&self, level: u8) -> &HeadingStyle {
        let index = usize::from(level.clamp(1, 6)) - 1;
        &self.headings[index]
    }

    /// Height of one line of body text.
    pub fn leading(&self, font_size: f32) -> f32 {
        font_size * self.line_height
    }
}

impl Default for StyleTemplate {
    fn default() -> Self {
        let heading = |font_size: f32, color: u32, margin_top: f32| HeadingStyle {
            font_size,
            color: Color::from_hex(color),
            margin_top,
            padding_bottom: 0.0,
            border_bottom: None,
        };

        Self {
            page: PageGeometry::letter(),
            font_size: 10.0,
            line_height: 1.5,
            text_color: Color::from_hex(0x333333),
            paragraph_spacing: 7.5,
            link_color: Color::from_hex(0xe94560),
            headings: [
                HeadingStyle {
                    padding_bottom: 6.0,
                    border_bottom: Some(Border {
                        width: 1.5,
                        color: Color::from_hex(0xe94560),
                    }),
                    ..heading(20.0, 0x1a1a2e, 0.0)
                },
                HeadingStyle {
                    padding_bottom: 3.0,
                    border_bottom: Some(Border {
                        width: 0.75,
                        color: Color::from_hex(0xcccccc),
                    }),
                    ..heading(14.0, 0x16213e, 15.0)
                },
                heading(12.0, 0x0f3460, 11.25),
                heading(11.0, 0x333333, 9.0),
                heading(10.0, 0x333333, 9.0),
                heading(10.0, 0x666666, 9.0),
            ],
            heading_spacing: 6.0,
            inline_code: InlineCodeStyle {
                font_size: 9.0,
                background: Color::from_hex(0xf0f0f0),
                padding: 3.0,
            },
            code_block: CodeBlockStyle {
                font_size: 8.0,
                color: Color::from_hex(0xf8f8f2),
                background: Color::from_hex(0x2d2d2d),
                padding: 9.0,
            },
            table: TableStyle {
                font_size: 9.0,
                border: Border {
                    width: 0.75,
                    color: Color::from_hex(0xcccccc),
                },
                header_background: Color::from_hex(0x1a1a2e),
                header_color: Color::WHITE,
                stripe_background: Color::from_hex(0xf5f5f5),
                cell_padding_x: 7.5,
                cell_padding_y: 4.5,
                margin: 9.0,
            },
            quote: QuoteStyle {
                border: Border {
                    width: 2.25,
                    color: Color::from_hex(0xe94560),
                },
                background: Color::from_hex(0xf9f9f9),
                padding_x: 11.25,
                padding_y: 6.0,
                margin: 9.0,
                italic: true,
            },
            list: ListStyle {
                indent: 15.0,
                item_spacing: 3.0,
                margin: 6.0,
            },
            rule: RuleStyle {
                border: Border {
                    width: 0.75,
                    color: Color::from_hex(0xdddddd),
                },
                margin: 15.0,
            },
            banner: BannerStyle {
                font_size: 8.0,
                color: Color::WHITE,
                background: Color::from_hex(0x1a1a2e),
                padding_x: 11.25,
                padding_y: 7.5,
                margin_bottom: 15.0,
            },
            footer: FooterStyle {
                font_size: 8.0,
                color: Color::from_hex(0x666666),
            },
            checkmark_color: Color::from_hex(0x10b981),
            pending_color: Color::from_hex(0xf59e0b),
            labels: Labels {
                project: "OITH".to_string(),
                confidential: "Confidential".to_string(),
                footer: "OITH Confidential".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_geometry() {
        let page = PageGeometry::letter();
        assert_eq!(page.content_width(), 504.0);
        assert_eq!(page.body_top(), 738.0);
        assert_eq!(page.body_bottom(), 72.0);
    }

    #[test]
    fn test_heading_lookup_clamps() {
        let template = StyleTemplate::default();
        assert_eq!(template.heading(1).font_size, 20.0);
        assert_eq!(template.heading(0).font_size, 20.0);
        assert_eq!(template.heading(9).font_size, 10.0);
        assert!(template.heading(2).border_bottom.is_some());
        assert!(template.heading(3).border_bottom.is_none());
    }

    #[test]
    fn test_leading() {
        let template = StyleTemplate::default();
        assert_eq!(template.leading(10.0), 15.0);
    }
}
