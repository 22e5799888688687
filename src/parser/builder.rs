//! Tree builder turning the parsed element tree into the document model.

use scraper::node::Element;

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, Document, List, ListItem, Paragraph, Table, TableCell, TableRow, TextRun,
    TextStyle,
};
use crate::template::{FOOTER_ID, HEADER_CLASS};

use super::ParseOptions;

/// Elements whose content never reaches the page.
const IGNORED_ELEMENTS: [&str; 4] = ["head", "style", "script", "title"];

/// A container of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Banner,
    Footer,
    Quote,
    Item,
    Cell { alignment: Alignment },
}

#[derive(Debug)]
enum Frame {
    Flow {
        kind: FlowKind,
        blocks: Vec<Block>,
    },
    List(List),
    Table {
        table: Table,
        in_head: bool,
        row: Option<OpenRow>,
    },
}

#[derive(Debug, Default)]
struct OpenRow {
    cells: Vec<TableCell>,
    all_th: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct InlineState {
    bold: u32,
    italic: u32,
    code: u32,
    strike: u32,
    link: u32,
}

impl InlineState {
    fn style(&self) -> TextStyle {
        TextStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code: self.code > 0,
            strikethrough: self.strike > 0,
            link: self.link > 0,
        }
    }
}

#[derive(Debug)]
struct Preformatted {
    text: String,
    language: Option<String>,
}

/// Builds a [`Document`] from element open/close and text events.
pub(crate) struct DocumentBuilder {
    options: ParseOptions,
    body: Vec<Block>,
    frames: Vec<Frame>,
    paragraph: Option<Paragraph>,
    heading: Option<u8>,
    inline: InlineState,
    pre: Option<Preformatted>,
    ignore_depth: usize,
    /// Whether each open `<div>` pushed a frame.
    divs: Vec<bool>,
    footer: Option<Paragraph>,
}

impl DocumentBuilder {
    pub(crate) fn new(options: ParseOptions) -> Self {
        Self {
            options,
            body: Vec::new(),
            frames: Vec::new(),
            paragraph: None,
            heading: None,
            inline: InlineState::default(),
            pre: None,
            ignore_depth: 0,
            divs: Vec::new(),
            footer: None,
        }
    }

    pub(crate) fn finish(mut self) -> Document {
        if self.pre.is_some() {
            self.finish_pre();
        }
        self.flush_paragraph();
        while !self.frames.is_empty() {
            self.pop_frame();
        }

        Document {
            title: None,
            body: self.body,
            footer: self.footer,
        }
    }

    /// An element opens. Fails when container nesting exceeds the limit.
    pub(crate) fn start_element(&mut self, element: &Element) -> Result<()> {
        let name = element.name();

        if IGNORED_ELEMENTS.contains(&name) {
            self.ignore_depth += 1;
            return Ok(());
        }
        if self.ignore_depth > 0 {
            return Ok(());
        }

        if let Some(pre) = self.pre.as_mut() {
            match name {
                "code" if pre.language.is_none() => {
                    pre.language = element
                        .attr("class")
                        .and_then(|class| {
                            class
                                .split_whitespace()
                                .find_map(|c| c.strip_prefix("language-"))
                        })
                        .map(str::to_string);
                }
                "br" => pre.text.push('\n'),
                _ => {}
            }
            return Ok(());
        }

        match name {
            "p" => {
                self.flush_paragraph();
                self.paragraph = Some(Paragraph::new());
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_paragraph();
                let level = name[1..].parse::<u8>().unwrap_or(1);
                self.heading = Some(level);
                self.paragraph = Some(Paragraph::heading("", level));
            }
            "br" => self.current_paragraph().add_line_break(),
            "strong" | "b" => self.inline.bold += 1,
            "em" | "i" => self.inline.italic += 1,
            "code" | "kbd" | "samp" | "tt" => self.inline.code += 1,
            "del" | "s" | "strike" => self.inline.strike += 1,
            "a" => self.inline.link += 1,
            "img" => {
                if let Some(alt) = element.attr("alt").filter(|alt| !alt.is_empty()) {
                    let run = TextRun::styled(alt, self.inline.style());
                    self.current_paragraph().add_run(run);
                }
            }
            "input" if element.attr("type") == Some("checkbox") => {
                let glyph = if element.attr("checked").is_some() {
                    "\u{2713}"
                } else {
                    "\u{2610}"
                };
                let run = TextRun::styled(glyph, self.inline.style());
                self.current_paragraph().add_run(run);
            }
            "pdf:pagenumber" => self.current_paragraph().add_page_number(),
            "div" => {
                let class = element.attr("class").unwrap_or_default();
                let kind = if class.split_whitespace().any(|c| c == HEADER_CLASS) {
                    Some(FlowKind::Banner)
                } else if element.attr("id") == Some(FOOTER_ID) {
                    Some(FlowKind::Footer)
                } else {
                    None
                };
                self.flush_paragraph();
                if let Some(kind) = kind {
                    self.push_frame(Frame::Flow {
                        kind,
                        blocks: Vec::new(),
                    })?;
                }
                self.divs.push(kind.is_some());
            }
            "ul" => {
                self.flush_paragraph();
                self.push_frame(Frame::List(List::bullet()))?;
            }
            "ol" => {
                self.flush_paragraph();
                let start = element
                    .attr("start")
                    .and_then(|s| s.trim().parse::<u32>().ok())
                    .unwrap_or(1);
                self.push_frame(Frame::List(List::numbered(start)))?;
            }
            "li" => {
                self.flush_paragraph();
                if !matches!(self.frames.last(), Some(Frame::List(_))) {
                    self.push_frame(Frame::List(List::bullet()))?;
                }
                self.push_frame(Frame::Flow {
                    kind: FlowKind::Item,
                    blocks: Vec::new(),
                })?;
            }
            "blockquote" => {
                self.flush_paragraph();
                self.push_frame(Frame::Flow {
                    kind: FlowKind::Quote,
                    blocks: Vec::new(),
                })?;
            }
            "pre" => {
                self.flush_paragraph();
                self.pre = Some(Preformatted {
                    text: String::new(),
                    language: None,
                });
            }
            "hr" => {
                self.flush_paragraph();
                self.current_blocks().push(Block::Rule);
            }
            "table" => {
                self.flush_paragraph();
                self.push_frame(Frame::Table {
                    table: Table::new(),
                    in_head: false,
                    row: None,
                })?;
            }
            "thead" => self.set_table_head(true),
            "tbody" | "tfoot" => self.set_table_head(false),
            "tr" => {
                self.close_cells();
                if let Some(Frame::Table { table, row, .. }) = self.frames.last_mut() {
                    if let Some(open) = row.take() {
                        table.add_row(finish_row(open, false));
                    }
                    *row = Some(OpenRow {
                        cells: Vec::new(),
                        all_th: true,
                    });
                }
            }
            "th" | "td" => {
                self.flush_paragraph();
                self.close_cells();
                let alignment = cell_alignment(element);
                match self.frames.last_mut() {
                    Some(Frame::Table { row, .. }) => {
                        let open = row.get_or_insert_with(|| OpenRow {
                            cells: Vec::new(),
                            all_th: true,
                        });
                        open.all_th &= name == "th";
                    }
                    _ => return Ok(()),
                }
                self.push_frame(Frame::Flow {
                    kind: FlowKind::Cell { alignment },
                    blocks: Vec::new(),
                })?;
            }
            _ => {}
        }
        Ok(())
    }

    /// An element closes.
    pub(crate) fn end_element(&mut self, name: &str) {
        if IGNORED_ELEMENTS.contains(&name) {
            self.ignore_depth = self.ignore_depth.saturating_sub(1);
            return;
        }
        if self.ignore_depth > 0 {
            return;
        }

        if self.pre.is_some() {
            if name == "pre" {
                self.finish_pre();
            }
            return;
        }

        match name {
            "p" => self.flush_paragraph(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_paragraph();
                self.heading = None;
            }
            "strong" | "b" => self.inline.bold = self.inline.bold.saturating_sub(1),
            "em" | "i" => self.inline.italic = self.inline.italic.saturating_sub(1),
            "code" | "kbd" | "samp" | "tt" => {
                self.inline.code = self.inline.code.saturating_sub(1);
            }
            "del" | "s" | "strike" => self.inline.strike = self.inline.strike.saturating_sub(1),
            "a" => self.inline.link = self.inline.link.saturating_sub(1),
            "div" => {
                self.flush_paragraph();
                if self.divs.pop() == Some(true) {
                    self.close_until(|frame| {
                        matches!(
                            frame,
                            Frame::Flow {
                                kind: FlowKind::Banner | FlowKind::Footer,
                                ..
                            }
                        )
                    });
                }
            }
            "ul" | "ol" => self.close_until(|frame| matches!(frame, Frame::List(_))),
            "li" => self.close_until(|frame| {
                matches!(
                    frame,
                    Frame::Flow {
                        kind: FlowKind::Item,
                        ..
                    }
                )
            }),
            "blockquote" => self.close_until(|frame| {
                matches!(
                    frame,
                    Frame::Flow {
                        kind: FlowKind::Quote,
                        ..
                    }
                )
            }),
            "th" | "td" => self.close_cells(),
            "tr" => {
                self.close_cells();
                if let Some(Frame::Table {
                    table,
                    in_head,
                    row,
                }) = self.frames.last_mut()
                {
                    if let Some(open) = row.take() {
                        table.add_row(finish_row(open, *in_head));
                    }
                }
            }
            "thead" => self.set_table_head(false),
            "table" => self.close_until(|frame| matches!(frame, Frame::Table { .. })),
            _ => {}
        }
    }

    /// Character data, entities already decoded.
    pub(crate) fn text(&mut self, text: &str) {
        if self.ignore_depth > 0 {
            return;
        }
        if let Some(pre) = self.pre.as_mut() {
            pre.text.push_str(text);
            return;
        }

        let collapsed = collapse_whitespace(text);
        if self.paragraph.is_none() && collapsed.trim().is_empty() {
            return;
        }
        let run = TextRun::styled(collapsed, self.inline.style());
        self.current_paragraph().add_run(run);
    }

    fn current_paragraph(&mut self) -> &mut Paragraph {
        let heading = self.heading;
        self.paragraph.get_or_insert_with(|| {
            let mut paragraph = Paragraph::new();
            paragraph.style.heading_level = heading;
            paragraph
        })
    }

    fn flush_paragraph(&mut self) {
        if let Some(mut paragraph) = self.paragraph.take() {
            paragraph.trim();
            if !paragraph.is_empty() {
                self.current_blocks().push(Block::Paragraph(paragraph));
            }
        }
    }

    fn finish_pre(&mut self) {
        if let Some(pre) = self.pre.take() {
            self.current_blocks().push(Block::CodeBlock {
                text: pre.text,
                language: pre.language,
            });
        }
    }

    /// Blocks of the innermost flow container.
    fn current_blocks(&mut self) -> &mut Vec<Block> {
        for frame in self.frames.iter_mut().rev() {
            if let Frame::Flow { blocks, .. } = frame {
                return blocks;
            }
        }
        &mut self.body
    }

    /// Nesting level of the open containers. A list item shares its list's level.
    fn nesting_level(&self) -> usize {
        self.frames
            .iter()
            .filter(|frame| {
                !matches!(
                    frame,
                    Frame::Flow {
                        kind: FlowKind::Item,
                        ..
                    }
                )
            })
            .count()
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        let item = matches!(
            frame,
            Frame::Flow {
                kind: FlowKind::Item,
                ..
            }
        );
        if !item && self.nesting_level() >= self.options.max_depth {
            return Err(Error::Parse(format!(
                "document nesting exceeds {} levels",
                self.options.max_depth
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn set_table_head(&mut self, head: bool) {
        if let Some(Frame::Table { in_head, .. }) = self.frames.last_mut() {
            *in_head = head;
        }
    }

    fn close_cells(&mut self) {
        self.flush_paragraph();
        if matches!(
            self.frames.last(),
            Some(Frame::Flow {
                kind: FlowKind::Cell { .. },
                ..
            })
        ) {
            self.pop_frame();
        }
    }

    /// Pop frames until one matching `is_target` has been closed. End tags
    /// without a matching open frame are ignored.
    fn close_until(&mut self, is_target: impl Fn(&Frame) -> bool) {
        let Some(position) = self.frames.iter().rposition(is_target) else {
            return;
        };
        self.flush_paragraph();
        while self.frames.len() > position {
            self.pop_frame();
        }
    }

    /// Close the innermost frame, attaching its content to its parent.
    fn pop_frame(&mut self) {
        self.flush_paragraph();
        let Some(frame) = self.frames.pop() else {
            return;
        };

        match frame {
            Frame::Flow { kind, blocks } => match kind {
                FlowKind::Banner => {
                    let banner = merge_paragraphs(blocks);
                    self.current_blocks().push(Block::Banner(banner));
                }
                FlowKind::Footer => self.footer = Some(merge_paragraphs(blocks)),
                FlowKind::Quote => self.current_blocks().push(Block::Quote(blocks)),
                FlowKind::Item => match self.frames.last_mut() {
                    Some(Frame::List(list)) => list.items.push(ListItem { blocks }),
                    _ => self.current_blocks().extend(blocks),
                },
                FlowKind::Cell { alignment } => {
                    let cell = TableCell {
                        content: merge_paragraphs(blocks),
                        alignment,
                    };
                    if let Some(Frame::Table { row, .. }) = self.frames.last_mut() {
                        row.get_or_insert_with(OpenRow::default).cells.push(cell);
                    }
                }
            },
            Frame::List(list) => self.current_blocks().push(Block::List(list)),
            Frame::Table {
                mut table,
                in_head,
                row,
            } => {
                if let Some(open) = row {
                    table.add_row(finish_row(open, in_head));
                }
                if !table.is_empty() {
                    self.current_blocks().push(Block::Table(table));
                }
            }
        }
    }
}

fn finish_row(open: OpenRow, in_head: bool) -> TableRow {
    let is_header = in_head || (open.all_th && !open.cells.is_empty());
    TableRow {
        cells: open.cells,
        is_header,
    }
}

fn cell_alignment(element: &Element) -> Alignment {
    if let Some(align) = element.attr("align").and_then(Alignment::from_attr) {
        return align;
    }
    element
        .attr("style")
        .and_then(|style| {
            style.split(';').find_map(|decl| {
                let (key, value) = decl.split_once(':')?;
                (key.trim().eq_ignore_ascii_case("text-align"))
                    .then(|| Alignment::from_attr(value))
                    .flatten()
            })
        })
        .unwrap_or_default()
}

/// Flatten blocks into one paragraph, separating them with line breaks.
fn merge_paragraphs(blocks: Vec<Block>) -> Paragraph {
    let mut merged = Paragraph::new();
    for block in blocks {
        if !merged.content.is_empty() {
            merged.add_line_break();
        }
        match block {
            Block::Paragraph(p) | Block::Banner(p) => merged.content.extend(p.content),
            other => merged.add_text(other.plain_text()),
        }
    }
    merged.trim();
    merged
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() && c != '\u{00A0}' {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n"), " ");
        assert_eq!(collapse_whitespace("a\u{00A0}\u{00A0}b"), "a\u{00A0}\u{00A0}b");
    }

    #[test]
    fn test_merge_paragraphs() {
        let merged = merge_paragraphs(vec![
            Block::Paragraph(Paragraph::with_text("one")),
            Block::Paragraph(Paragraph::with_text("two")),
        ]);
        assert_eq!(merged.plain_text(), "one\ntwo");
    }

    #[test]
    fn test_finish_row_header_detection() {
        let open = OpenRow {
            cells: vec![TableCell::text("a")],
            all_th: true,
        };
        assert!(finish_row(open, false).is_header);

        let open = OpenRow {
            cells: vec![TableCell::text("a")],
            all_th: false,
        };
        assert!(!finish_row(open, false).is_header);
    }
}
