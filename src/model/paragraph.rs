//! Paragraph and text-level types.

/// A paragraph of text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Inline content in reading order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a heading paragraph.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut p = Self::with_text(text);
        p.style.heading_level = Some(level.clamp(1, 6));
        p
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_run(TextRun::new(text));
    }

    /// Add a styled text run, merging it into the previous run when the
    /// styles match.
    pub fn add_run(&mut self, run: TextRun) {
        if run.is_empty() {
            return;
        }
        if let Some(InlineContent::Text(last)) = self.content.last_mut() {
            if last.style == run.style {
                last.text.push_str(&run.text);
                return;
            }
        }
        self.content.push(InlineContent::Text(run));
    }

    /// Add a line break.
    pub fn add_line_break(&mut self) {
        self.content.push(InlineContent::LineBreak);
    }

    /// Add the page number placeholder.
    pub fn add_page_number(&mut self) {
        self.content.push(InlineContent::PageNumber);
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.as_str(),
                InlineContent::LineBreak => "\n",
                InlineContent::PageNumber => "#",
            })
            .collect()
    }

    /// Check if the paragraph has no visible content.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|c| match c {
            InlineContent::Text(run) => run.text.trim().is_empty(),
            InlineContent::LineBreak => true,
            InlineContent::PageNumber => false,
        })
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.style.heading_level.is_some()
    }

    /// Get the heading level (1-6) or None.
    pub fn heading_level(&self) -> Option<u8> {
        self.style.heading_level
    }

    /// Drop whitespace at the start and end of the paragraph and around
    /// line breaks, as HTML layout does.
    pub fn trim(&mut self) {
        let mut at_line_start = true;
        for item in &mut self.content {
            match item {
                InlineContent::Text(run) if at_line_start => {
                    let trimmed = run.text.trim_start();
                    if trimmed.len() != run.text.len() {
                        run.text = trimmed.to_string();
                    }
                    at_line_start = run.text.is_empty();
                }
                InlineContent::LineBreak => at_line_start = true,
                _ => at_line_start = false,
            }
        }

        let mut at_line_end = true;
        for item in self.content.iter_mut().rev() {
            match item {
                InlineContent::Text(run) if at_line_end => {
                    let trimmed = run.text.trim_end();
                    if trimmed.len() != run.text.len() {
                        run.text = trimmed.to_string();
                    }
                    at_line_end = run.text.is_empty();
                }
                InlineContent::LineBreak => at_line_end = true,
                _ => at_line_end = false,
            }
        }

        self.content
            .retain(|c| !matches!(c, InlineContent::Text(run) if run.text.is_empty()));
        while matches!(self.content.last(), Some(InlineContent::LineBreak)) {
            self.content.pop();
        }
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A forced line break
    LineBreak,

    /// Replaced with the current page number when drawn
    PageNumber,
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::default())
    }

    /// Create a text run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Monospaced inline code
    pub code: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Part of a hyperlink
    pub link: bool,
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Heading level (1-6) or None for normal paragraph
    pub heading_level: Option<u8>,

    /// Text alignment
    pub alignment: Alignment,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

impl Alignment {
    /// Parse an HTML `align` attribute or CSS `text-align` value.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}
