//! Page layout.
//!
//! Turns the block model into positioned drawing operations, one list per
//! page. Coordinates are PDF user space: points, origin at the bottom-left
//! corner of the page. The cursor `y` moves down the page as blocks are
//! placed; vertical margins between blocks collapse the way CSS margins do.

use std::mem;

use super::fonts::{self, FontFace};
use crate::model::{Alignment, Block, Document, InlineContent, List, Paragraph, Table, TextStyle};
use crate::style::{Color, StyleTemplate};

/// Distance from the top of the glyph box to the baseline, as a fraction of
/// the font size.
const ASCENT: f32 = 0.78;

/// Space between a list marker and the item text.
const MARKER_GAP: f32 = 4.0;

/// Narrowest text column a nested list may indent down to.
const MIN_LIST_WIDTH: f32 = 120.0;

/// Columns occupied by a tab inside preformatted text.
const TAB_WIDTH: usize = 4;

/// A positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Encoded text with its baseline origin at `(x, y)`
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Color,
        bytes: Vec<u8>,
    },

    /// A filled rectangle with its lower-left corner at `(x, y)`
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },

    /// A stroked line segment
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
}

/// Drawing operations of one page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub ops: Vec<DrawOp>,
}

impl PageContent {
    /// Decoded text of every text operation, in painting order.
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { face, bytes, .. } if face.is_text_face() => {
                    Some(bytes.iter().map(|&b| char::from(b)).collect())
                }
                _ => None,
            })
            .collect()
    }
}

/// Lay out a document into pages.
pub fn layout(document: &Document, template: &StyleTemplate) -> Vec<PageContent> {
    let layouter = Layouter::new(template);
    layouter.run(document)
}

/// Horizontal extent and inherited presentation of a container.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f32,
    width: f32,
    italic: bool,
    list_depth: usize,
    paragraph_spacing: f32,
}

/// Resolved presentation of a run of lines.
#[derive(Debug, Clone, Copy)]
struct TextFormat {
    size: f32,
    leading: f32,
    color: Color,
    bold: bool,
    italic: bool,
    alignment: Alignment,
}

/// A word or a space with its measured width.
#[derive(Debug, Clone)]
struct Piece {
    text: String,
    style: TextStyle,
    width: f32,
    space: bool,
}

#[derive(Debug, Clone, Default)]
struct Line {
    pieces: Vec<Piece>,
    width: f32,
}

impl Line {
    fn push(&mut self, piece: Piece) {
        self.width += piece.width;
        self.pieces.push(piece);
    }

    fn finish(mut self) -> Line {
        while self.pieces.last().is_some_and(|p| p.space) {
            if let Some(piece) = self.pieces.pop() {
                self.width -= piece.width;
            }
        }
        self
    }

    /// Adjacent pieces with the same style joined into one.
    fn fragments(&self) -> Vec<Piece> {
        let mut out: Vec<Piece> = Vec::new();
        for piece in &self.pieces {
            match out.last_mut() {
                Some(last) if last.style == piece.style => {
                    last.text.push_str(&piece.text);
                    last.width += piece.width;
                    last.space &= piece.space;
                }
                _ => out.push(piece.clone()),
            }
        }
        out
    }
}

/// A list marker waiting for the first line of its item.
#[derive(Debug, Clone)]
struct Marker {
    text: String,
    right: f32,
}

/// A table row with its cells broken into lines.
struct PreparedRow {
    cells: Vec<(Vec<Line>, Alignment)>,
    height: f32,
    format: TextFormat,
    padding_y: f32,
}

impl PreparedRow {
    fn new(cells: Vec<(Vec<Line>, Alignment)>, format: TextFormat, padding_y: f32) -> Self {
        let lines = cells.iter().map(|(lines, _)| lines.len()).max().unwrap_or(0).max(1);
        Self {
            cells,
            height: lines as f32 * format.leading + 2.0 * padding_y,
            format,
            padding_y,
        }
    }

    /// Keep the first `lines` lines of every cell and return the rest.
    fn split_off(&mut self, lines: usize) -> PreparedRow {
        let rest = self
            .cells
            .iter_mut()
            .map(|(cell, alignment)| (cell.split_off(lines.min(cell.len())), *alignment))
            .collect();
        let head = mem::take(&mut self.cells);
        *self = PreparedRow::new(head, self.format, self.padding_y);
        PreparedRow::new(rest, self.format, self.padding_y)
    }

    fn is_empty(&self) -> bool {
        self.cells.iter().all(|(lines, _)| lines.is_empty())
    }
}

struct Layouter<'t> {
    template: &'t StyleTemplate,
    pages: Vec<PageContent>,
    /// Page receiving drawing operations
    page: usize,
    y: f32,
    pending_space: f32,
    /// Nothing has been placed on the current page yet
    fresh_page: bool,
    marker: Option<Marker>,
}

impl<'t> Layouter<'t> {
    fn new(template: &'t StyleTemplate) -> Self {
        Self {
            template,
            pages: vec![PageContent::default()],
            page: 0,
            y: template.page.body_top(),
            pending_space: 0.0,
            fresh_page: true,
            marker: None,
        }
    }

    fn run(mut self, document: &Document) -> Vec<PageContent> {
        let t = self.template;
        let frame = Frame {
            left: t.page.margin,
            width: t.page.content_width(),
            italic: false,
            list_depth: 0,
            paragraph_spacing: t.paragraph_spacing,
        };
        self.layout_blocks(&document.body, frame);
        if let Some(footer) = &document.footer {
            self.draw_footers(footer);
        }
        log::trace!("laid out {} pages", self.pages.len());
        self.pages
    }

    fn page_number(&self) -> usize {
        self.page + 1
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.get_mut(self.page) {
            page.ops.push(op);
        }
    }

    /// Request vertical space before the next block; adjacent requests collapse.
    fn space(&mut self, amount: f32) {
        self.pending_space = self.pending_space.max(amount);
    }

    fn needs_break(&self, height: f32) -> bool {
        !self.fresh_page && self.y - self.pending_space - height < self.template.page.body_bottom()
    }

    /// Reserve `height` below the cursor, moving to a new page when it does
    /// not fit. Spacing requested at the top of a page is dropped.
    fn ensure(&mut self, height: f32) {
        if self.needs_break(height) {
            self.new_page();
        }
        if !self.fresh_page {
            self.y -= self.pending_space;
        }
        self.pending_space = 0.0;
        self.fresh_page = false;
    }

    fn new_page(&mut self) {
        self.pages.push(PageContent::default());
        self.page = self.pages.len() - 1;
        self.y = self.template.page.body_top();
        self.pending_space = 0.0;
        self.fresh_page = true;
    }

    fn body_format(&self, frame: Frame, alignment: Alignment) -> TextFormat {
        let t = self.template;
        TextFormat {
            size: t.font_size,
            leading: t.leading(t.font_size),
            color: t.text_color,
            bold: false,
            italic: frame.italic,
            alignment,
        }
    }

    fn layout_blocks(&mut self, blocks: &[Block], frame: Frame) {
        for block in blocks {
            self.layout_block(block, frame);
        }
    }

    fn layout_block(&mut self, block: &Block, frame: Frame) {
        match block {
            Block::Paragraph(p) => match p.heading_level() {
                Some(level) => self.layout_heading(p, level, frame),
                None => {
                    self.space(frame.paragraph_spacing);
                    let format = self.body_format(frame, p.style.alignment);
                    let lines = self.break_lines(&p.content, frame.width, &format);
                    for line in &lines {
                        self.draw_line(line, frame, &format);
                    }
                    self.space(frame.paragraph_spacing);
                }
            },
            Block::Banner(p) => self.layout_banner(p, frame),
            Block::Table(table) => self.layout_table(table, frame),
            Block::CodeBlock { text, .. } => self.layout_code(text, frame),
            Block::Quote(blocks) => self.layout_quote(blocks, frame),
            Block::List(list) => self.layout_list(list, frame),
            Block::Rule => self.layout_rule(frame),
        }
    }

    fn layout_heading(&mut self, p: &Paragraph, level: u8, frame: Frame) {
        let t = self.template;
        let style = t.heading(level);
        let format = TextFormat {
            size: style.font_size,
            leading: t.leading(style.font_size),
            color: style.color,
            bold: true,
            italic: frame.italic,
            alignment: p.style.alignment,
        };

        self.space(style.margin_top.max(t.heading_spacing));
        let lines = self.break_lines(&p.content, frame.width, &format);

        // Keep the heading on the page of the line that follows it.
        let block_height = lines.len() as f32 * format.leading + t.leading(t.font_size);
        if block_height < t.page.body_top() - t.page.body_bottom() {
            self.ensure(block_height);
        }
        for line in &lines {
            self.draw_line(line, frame, &format);
        }

        if let Some(border) = &style.border_bottom {
            self.y -= style.padding_bottom;
            let y = self.y - border.width / 2.0;
            self.push(DrawOp::Line {
                from: (frame.left, y),
                to: (frame.left + frame.width, y),
                width: border.width,
                color: border.color,
            });
            self.y -= border.width;
        }
        self.space(t.heading_spacing);
    }

    fn layout_banner(&mut self, p: &Paragraph, frame: Frame) {
        let t = self.template;
        let banner = &t.banner;
        let format = TextFormat {
            size: banner.font_size,
            leading: t.leading(banner.font_size),
            color: banner.color,
            bold: false,
            italic: false,
            alignment: Alignment::Left,
        };
        let inner = Frame {
            left: frame.left + banner.padding_x,
            width: frame.width - 2.0 * banner.padding_x,
            ..frame
        };

        let lines = self.break_lines(&p.content, inner.width, &format);
        let height = lines.len() as f32 * format.leading + 2.0 * banner.padding_y;
        self.ensure(height);
        self.push(DrawOp::Rect {
            x: frame.left,
            y: self.y - height,
            width: frame.width,
            height,
            color: banner.background,
        });

        self.y -= banner.padding_y;
        for line in &lines {
            self.draw_line_at_cursor(line, inner, &format);
        }
        self.y -= banner.padding_y;
        self.space(banner.margin_bottom);
    }

    fn layout_code(&mut self, text: &str, frame: Frame) {
        let t = self.template;
        let code = &t.code_block;
        let size = code.font_size;
        let leading = t.leading(size);
        let face = FontFace::Courier;
        let glyph = f32::from(face.glyph_width(b' ')) * size / 1000.0;
        let columns = ((frame.width - 2.0 * code.padding) / glyph).floor().max(1.0) as usize;
        let lines = wrap_preformatted(text, columns);

        self.space(frame.paragraph_spacing);
        self.ensure(code.padding + leading);
        self.push(DrawOp::Rect {
            x: frame.left,
            y: self.y - code.padding,
            width: frame.width,
            height: code.padding,
            color: code.background,
        });
        self.y -= code.padding;

        for line in lines {
            self.ensure(leading);
            self.push(DrawOp::Rect {
                x: frame.left,
                y: self.y - leading,
                width: frame.width,
                height: leading,
                color: code.background,
            });
            let baseline = self.baseline(size, leading);
            let mut x = frame.left + code.padding;
            for run in fonts::encode(&line, face) {
                let width = run.width(size);
                self.push(DrawOp::Text {
                    x,
                    y: baseline,
                    face: run.face,
                    size,
                    color: code.color,
                    bytes: run.bytes,
                });
                x += width;
            }
            self.y -= leading;
        }

        let padding = code
            .padding
            .min(self.y - t.page.body_bottom())
            .max(0.0);
        self.push(DrawOp::Rect {
            x: frame.left,
            y: self.y - padding,
            width: frame.width,
            height: padding,
            color: code.background,
        });
        self.y -= padding;
        self.space(frame.paragraph_spacing);
    }

    fn layout_quote(&mut self, blocks: &[Block], frame: Frame) {
        let t = self.template;
        let quote = &t.quote;

        self.space(quote.margin);
        self.ensure(quote.padding_y + t.leading(t.font_size));
        let start_page = self.page;
        let start_index = self.pages[start_page].ops.len();
        let start_y = self.y;

        self.y -= quote.padding_y;
        let inner = Frame {
            left: frame.left + quote.border.width + quote.padding_x,
            width: frame.width - quote.border.width - 2.0 * quote.padding_x,
            italic: frame.italic || quote.italic,
            paragraph_spacing: t.paragraph_spacing,
            ..frame
        };
        self.layout_blocks(blocks, inner);
        self.pending_space = 0.0;
        self.y = (self.y - quote.padding_y).max(t.page.body_bottom());

        self.decorate_quote(start_page, start_index, start_y, frame);
        self.space(quote.margin);
    }

    /// Paint the background and left border of a finished quote beneath
    /// its content on every page it spans.
    fn decorate_quote(&mut self, start_page: usize, start_index: usize, start_y: f32, frame: Frame) {
        let t = self.template;
        let quote = &t.quote;
        let end_page = self.page;

        for index in start_page..=end_page {
            let top = if index == start_page {
                start_y
            } else {
                t.page.body_top()
            };
            let bottom = if index == end_page {
                self.y
            } else {
                t.page.body_bottom()
            };
            if top <= bottom {
                continue;
            }

            let at = if index == start_page { start_index } else { 0 };
            let ops = &mut self.pages[index].ops;
            ops.insert(
                at,
                DrawOp::Rect {
                    x: frame.left,
                    y: bottom,
                    width: frame.width,
                    height: top - bottom,
                    color: quote.background,
                },
            );
            ops.insert(
                at + 1,
                DrawOp::Rect {
                    x: frame.left,
                    y: bottom,
                    width: quote.border.width,
                    height: top - bottom,
                    color: quote.border.color,
                },
            );
        }
    }

    fn layout_list(&mut self, list: &List, frame: Frame) {
        let t = self.template;
        let list_style = &t.list;
        let indent = if frame.width - list_style.indent >= MIN_LIST_WIDTH {
            list_style.indent
        } else {
            0.0
        };
        let inner = Frame {
            left: frame.left + indent,
            width: frame.width - indent,
            list_depth: frame.list_depth + 1,
            paragraph_spacing: list_style.item_spacing,
            ..frame
        };

        self.space(list_style.margin);
        for (index, item) in list.items.iter().enumerate() {
            self.space(list_style.item_spacing);
            let marker = Marker {
                text: list.marker(index, frame.list_depth),
                right: inner.left - MARKER_GAP,
            };

            match item.blocks.first() {
                Some(Block::Paragraph(p)) if !p.is_heading() => {
                    self.marker = Some(marker);
                    self.layout_blocks(&item.blocks, inner);
                }
                first => {
                    let format = self.body_format(inner, Alignment::Left);
                    self.ensure(format.leading);
                    let baseline = self.baseline(format.size, format.leading);
                    self.draw_marker(marker, baseline, &format);
                    if first.is_none() {
                        self.y -= format.leading;
                    }
                    self.layout_blocks(&item.blocks, inner);
                }
            }
            self.marker = None;
        }
        self.space(list_style.margin);
    }

    fn layout_rule(&mut self, frame: Frame) {
        let t = self.template;
        let rule = &t.rule;
        self.space(rule.margin);
        self.ensure(rule.border.width);
        let y = self.y - rule.border.width / 2.0;
        self.push(DrawOp::Line {
            from: (frame.left, y),
            to: (frame.left + frame.width, y),
            width: rule.border.width,
            color: rule.border.color,
        });
        self.y -= rule.border.width;
        self.space(rule.margin);
    }

    fn layout_table(&mut self, table: &Table, frame: Frame) {
        let t = self.template;
        let style = &t.table;
        let columns = table.column_count();
        if columns == 0 {
            return;
        }

        let format = TextFormat {
            size: style.font_size,
            leading: t.leading(style.font_size),
            color: t.text_color,
            bold: false,
            italic: frame.italic,
            alignment: Alignment::Left,
        };
        let header_format = TextFormat {
            bold: true,
            color: style.header_color,
            ..format
        };
        let widths = self.column_widths(table, columns, frame.width, &format);
        let header = table.header();
        let repeated: Vec<PreparedRow> = header
            .iter()
            .map(|row| {
                let cells: Vec<_> = row
                    .cells
                    .iter()
                    .map(|cell| (&cell.content, cell.alignment))
                    .collect();
                self.prepare_row(&cells, &widths, header_format)
            })
            .collect();
        let header_height: f32 = repeated.iter().map(|row| row.height).sum();
        let page_height = t.page.body_top() - t.page.body_bottom();

        self.space(style.margin);
        let mut body_index = 0;
        for (row_index, row) in table.rows.iter().enumerate() {
            let is_header = row_index < header.len();
            let row_format = if is_header { header_format } else { format };
            let cells: Vec<_> = row
                .cells
                .iter()
                .map(|cell| (&cell.content, cell.alignment))
                .collect();
            let mut prepared = self.prepare_row(&cells, &widths, row_format);

            let background = if is_header {
                Some(style.header_background)
            } else if body_index % 2 == 1 {
                Some(style.stripe_background)
            } else {
                None
            };
            let continued_header: &[PreparedRow] = if is_header { &[] } else { &repeated };
            let capacity = if is_header {
                page_height
            } else {
                page_height - header_height
            };

            // Rows taller than the space left are moved to the next page when
            // they fit there, and split line by line otherwise.
            let mut at_page_start = false;
            loop {
                let room = self.room();
                if prepared.height <= room {
                    self.draw_row(&prepared, &widths, frame.left, background);
                    break;
                }
                let fitting = self.fitting_lines(room, &prepared);
                if !at_page_start && !self.fresh_page && (prepared.height <= capacity || fitting == 0) {
                    self.table_page_break(continued_header, &widths, frame.left);
                    at_page_start = true;
                    continue;
                }

                let rest = prepared.split_off(fitting.max(1));
                self.draw_row(&prepared, &widths, frame.left, background);
                if rest.is_empty() {
                    break;
                }
                self.table_page_break(continued_header, &widths, frame.left);
                at_page_start = true;
                prepared = rest;
            }

            if !is_header {
                body_index += 1;
            }
        }
        self.space(style.margin);
    }

    /// Height available below the cursor once pending spacing is applied.
    fn room(&self) -> f32 {
        let spacing = if self.fresh_page { 0.0 } else { self.pending_space };
        self.y - spacing - self.template.page.body_bottom()
    }

    /// Cell lines of `row` that fit into `room`.
    fn fitting_lines(&self, room: f32, row: &PreparedRow) -> usize {
        let usable = room - 2.0 * row.padding_y;
        if usable < row.format.leading {
            0
        } else {
            (usable / row.format.leading).floor() as usize
        }
    }

    /// Continue a table on a new page, repeating its header rows.
    fn table_page_break(&mut self, header: &[PreparedRow], widths: &[f32], left: f32) {
        self.new_page();
        let background = Some(self.template.table.header_background);
        for row in header {
            self.draw_row(row, widths, left, background);
        }
    }

    /// Column widths filling `available`: proportional to content when it
    /// fits, otherwise shrinking columns toward their longest word.
    fn column_widths(
        &self,
        table: &Table,
        columns: usize,
        available: f32,
        format: &TextFormat,
    ) -> Vec<f32> {
        let padding = 2.0 * self.template.table.cell_padding_x;
        let mut natural = vec![padding; columns];
        let mut minimum = vec![padding; columns];

        for row in &table.rows {
            let format = TextFormat {
                bold: row.is_header,
                ..*format
            };
            for (index, cell) in row.cells.iter().enumerate() {
                let (line, word) = self.measure_paragraph(&cell.content, &format);
                natural[index] = natural[index].max(line + padding);
                minimum[index] = minimum[index].max(word + padding);
            }
        }

        let total_natural: f32 = natural.iter().sum();
        if total_natural <= 0.0 {
            return vec![available / columns as f32; columns];
        }
        if total_natural <= available {
            return natural
                .iter()
                .map(|w| w * available / total_natural)
                .collect();
        }
        let total_minimum: f32 = minimum.iter().sum();
        if total_minimum >= available {
            return minimum
                .iter()
                .map(|w| w * available / total_minimum)
                .collect();
        }
        let slack = available - total_minimum;
        let flex = total_natural - total_minimum;
        minimum
            .iter()
            .zip(&natural)
            .map(|(min, nat)| min + (nat - min) * slack / flex)
            .collect()
    }

    /// Widest unbroken line and widest word of a paragraph.
    fn measure_paragraph(&self, p: &Paragraph, format: &TextFormat) -> (f32, f32) {
        let mut widest_line: f32 = 0.0;
        let mut widest_word: f32 = 0.0;
        let mut line = 0.0;
        for item in &p.content {
            match item {
                InlineContent::LineBreak => {
                    widest_line = widest_line.max(line);
                    line = 0.0;
                }
                InlineContent::PageNumber => {
                    let width = self.measure("00", TextStyle::default(), format);
                    widest_word = widest_word.max(width);
                    line += width;
                }
                InlineContent::Text(run) => {
                    for (piece, space) in split_words(&run.text) {
                        let width = self.measure(piece, run.style, format);
                        if !space {
                            widest_word = widest_word.max(width);
                        }
                        line += width;
                    }
                }
            }
        }
        (widest_line.max(line), widest_word)
    }

    fn prepare_row(
        &self,
        cells: &[(&Paragraph, Alignment)],
        widths: &[f32],
        format: TextFormat,
    ) -> PreparedRow {
        let style = &self.template.table;
        let mut prepared = Vec::with_capacity(cells.len());
        for (&(content, alignment), width) in cells.iter().zip(widths) {
            let cell_format = TextFormat { alignment, ..format };
            let lines = self.break_lines(
                &content.content,
                width - 2.0 * style.cell_padding_x,
                &cell_format,
            );
            prepared.push((lines, alignment));
        }
        PreparedRow::new(prepared, format, style.cell_padding_y)
    }

    fn draw_row(
        &mut self,
        row: &PreparedRow,
        widths: &[f32],
        left: f32,
        background: Option<Color>,
    ) {
        let t = self.template;
        let style = &t.table;
        let total: f32 = widths.iter().sum();
        self.ensure(row.height);
        let top = self.y;
        let bottom = top - row.height;

        if let Some(color) = background {
            self.push(DrawOp::Rect {
                x: left,
                y: bottom,
                width: total,
                height: row.height,
                color,
            });
        }

        let mut x = left;
        for (index, width) in widths.iter().enumerate() {
            if let Some((lines, alignment)) = row.cells.get(index) {
                let frame = Frame {
                    left: x + style.cell_padding_x,
                    width: width - 2.0 * style.cell_padding_x,
                    italic: row.format.italic,
                    list_depth: 0,
                    paragraph_spacing: 0.0,
                };
                let format = TextFormat {
                    alignment: *alignment,
                    ..row.format
                };
                self.y = top - style.cell_padding_y;
                for line in lines {
                    self.draw_line_at_cursor(line, frame, &format);
                }
            }
            x += width;
        }

        let border = &style.border;
        let mut edges = vec![
            ((left, top), (left + total, top)),
            ((left, bottom), (left + total, bottom)),
        ];
        let mut x = left;
        edges.push(((x, top), (x, bottom)));
        for width in widths {
            x += width;
            edges.push(((x, top), (x, bottom)));
        }
        for (from, to) in edges {
            self.push(DrawOp::Line {
                from,
                to,
                width: border.width,
                color: border.color,
            });
        }

        self.y = bottom;
    }

    fn draw_footers(&mut self, footer: &Paragraph) {
        let t = self.template;
        let page = &t.page;
        let format = TextFormat {
            size: t.footer.font_size,
            leading: t.leading(t.footer.font_size),
            color: t.footer.color,
            bold: false,
            italic: false,
            alignment: Alignment::Center,
        };
        let frame = Frame {
            left: page.margin,
            width: page.content_width(),
            italic: false,
            list_depth: 0,
            paragraph_spacing: 0.0,
        };

        for index in 0..self.pages.len() {
            self.page = index;
            self.y = page.footer_bottom + page.footer_height;
            let lines = self.break_lines(&footer.content, frame.width, &format);
            for line in &lines {
                self.draw_line_at_cursor(line, frame, &format);
            }
        }
    }

    fn face(&self, style: TextStyle, format: &TextFormat) -> FontFace {
        FontFace::select(style.bold || format.bold, style.italic || format.italic, style.code)
    }

    fn font_size(&self, style: TextStyle, format: &TextFormat) -> f32 {
        let t = self.template;
        if style.code {
            format.size * t.inline_code.font_size / t.font_size
        } else {
            format.size
        }
    }

    fn measure(&self, text: &str, style: TextStyle, format: &TextFormat) -> f32 {
        fonts::text_width(
            text,
            self.face(style, format),
            self.font_size(style, format),
        )
    }

    /// Greedy line breaking. Words wider than the line are split between
    /// characters.
    fn break_lines(&self, content: &[InlineContent], width: f32, format: &TextFormat) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut line = Line::default();
        let page_number = self.page_number().to_string();

        for item in content {
            match item {
                InlineContent::LineBreak => lines.push(mem::take(&mut line).finish()),
                InlineContent::PageNumber => self.place_word(
                    &mut lines,
                    &mut line,
                    &page_number,
                    TextStyle::default(),
                    width,
                    format,
                ),
                InlineContent::Text(run) => {
                    for (piece, space) in split_words(&run.text) {
                        if !space {
                            self.place_word(&mut lines, &mut line, piece, run.style, width, format);
                        } else if !line.pieces.is_empty() {
                            line.push(Piece {
                                text: piece.to_string(),
                                style: run.style,
                                width: self.measure(piece, run.style, format),
                                space: true,
                            });
                        }
                    }
                }
            }
        }
        if !line.pieces.is_empty() {
            lines.push(line.finish());
        }
        lines
    }

    fn place_word(
        &self,
        lines: &mut Vec<Line>,
        line: &mut Line,
        word: &str,
        style: TextStyle,
        max_width: f32,
        format: &TextFormat,
    ) {
        let width = self.measure(word, style, format);
        if line.width + width > max_width && !line.pieces.is_empty() {
            lines.push(mem::take(line).finish());
        }
        if width <= max_width {
            line.push(Piece {
                text: word.to_string(),
                style,
                width,
                space: false,
            });
            return;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0.0;
        let mut buf = [0u8; 4];
        for c in word.chars() {
            let char_width = self.measure(c.encode_utf8(&mut buf), style, format);
            if line.width + chunk_width + char_width > max_width && !chunk.is_empty() {
                line.push(Piece {
                    text: mem::take(&mut chunk),
                    style,
                    width: chunk_width,
                    space: false,
                });
                lines.push(mem::take(line).finish());
                chunk_width = 0.0;
            }
            chunk.push(c);
            chunk_width += char_width;
        }
        if !chunk.is_empty() {
            line.push(Piece {
                text: chunk,
                style,
                width: chunk_width,
                space: false,
            });
        }
    }

    fn baseline(&self, size: f32, leading: f32) -> f32 {
        self.y - (leading - size) / 2.0 - size * ASCENT
    }

    fn draw_line(&mut self, line: &Line, frame: Frame, format: &TextFormat) {
        self.ensure(format.leading);
        self.draw_line_at_cursor(line, frame, format);
    }

    fn draw_line_at_cursor(&mut self, line: &Line, frame: Frame, format: &TextFormat) {
        let baseline = self.baseline(format.size, format.leading);
        if let Some(marker) = self.marker.take() {
            self.draw_marker(marker, baseline, format);
        }

        let free = (frame.width - line.width).max(0.0);
        let mut x = match format.alignment {
            Alignment::Left => frame.left,
            Alignment::Center => frame.left + free / 2.0,
            Alignment::Right => frame.left + free,
        };
        for fragment in line.fragments() {
            x = self.draw_fragment(&fragment, x, baseline, format);
        }
        self.y -= format.leading;
    }

    fn draw_fragment(&mut self, piece: &Piece, x: f32, baseline: f32, format: &TextFormat) -> f32 {
        let t = self.template;
        let face = self.face(piece.style, format);
        let size = self.font_size(piece.style, format);
        let color = if piece.style.link {
            t.link_color
        } else {
            format.color
        };

        if piece.style.code && !piece.space {
            let padding = t.inline_code.padding / 2.0;
            self.push(DrawOp::Rect {
                x: x - padding,
                y: baseline - size * 0.3,
                width: piece.width + 2.0 * padding,
                height: size * 1.25,
                color: t.inline_code.background,
            });
        }

        let mut cursor = x;
        for run in fonts::encode(&piece.text, face) {
            let width = run.width(size);
            self.push(DrawOp::Text {
                x: cursor,
                y: baseline,
                face: run.face,
                size,
                color,
                bytes: run.bytes,
            });
            cursor += width;
        }

        if piece.style.strikethrough {
            let y = baseline + size * 0.3;
            self.push(DrawOp::Line {
                from: (x, y),
                to: (x + piece.width, y),
                width: size / 15.0,
                color,
            });
        }
        x + piece.width
    }

    fn draw_marker(&mut self, marker: Marker, baseline: f32, format: &TextFormat) {
        let face = FontFace::select(false, format.italic, false);
        let width = fonts::text_width(&marker.text, face, format.size);
        let mut x = marker.right - width;
        for run in fonts::encode(&marker.text, face) {
            let run_width = run.width(format.size);
            self.push(DrawOp::Text {
                x,
                y: baseline,
                face: run.face,
                size: format.size,
                color: format.color,
                bytes: run.bytes,
            });
            x += run_width;
        }
    }
}

fn is_break(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Split text into alternating words and runs of breakable whitespace.
fn split_words(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = is_break(first);
        let end = rest
            .find(|c: char| is_break(c) != space)
            .unwrap_or(rest.len());
        let (piece, tail) = rest.split_at(end);
        rest = tail;
        Some((piece, space))
    })
}

/// Split preformatted text into display lines of at most `columns`
/// characters, expanding tabs.
fn wrap_preformatted(text: &str, columns: usize) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let mut line = String::new();
        let mut count = 0;
        for c in raw.chars() {
            if c == '\t' {
                let fill = TAB_WIDTH - count % TAB_WIDTH;
                for _ in 0..fill {
                    if count == columns {
                        out.push(mem::take(&mut line));
                        count = 0;
                    }
                    line.push(' ');
                    count += 1;
                }
                continue;
            }
            if count == columns {
                out.push(mem::take(&mut line));
                count = 0;
            }
            line.push(c);
            count += 1;
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, TableCell, TableRow, TextRun};

    fn template() -> StyleTemplate {
        StyleTemplate::default()
    }

    fn document(blocks: Vec<Block>) -> Document {
        let mut footer = Paragraph::with_text("OITH Confidential - ");
        footer.add_page_number();
        Document {
            title: None,
            body: blocks,
            footer: Some(footer),
        }
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(Paragraph::with_text(text))
    }

    #[test]
    fn test_split_words() {
        let pieces: Vec<_> = split_words("a  bc d").collect();
        assert_eq!(
            pieces,
            vec![("a", false), ("  ", true), ("bc", false), (" ", true), ("d", false)]
        );
        assert_eq!(split_words("").count(), 0);
    }

    #[test]
    fn test_wrap_preformatted() {
        assert_eq!(wrap_preformatted("abcdef\n", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_preformatted("\tx", 80), vec!["    x"]);
        assert_eq!(wrap_preformatted("a\n\nb\n", 80), vec!["a", "", "b"]);
        assert_eq!(wrap_preformatted("", 80), vec![""]);
    }

    #[test]
    fn test_single_paragraph_single_page() {
        let pages = layout(&document(vec![paragraph("Hello world")]), &template());
        assert_eq!(pages.len(), 1);
        let texts = pages[0].texts();
        assert_eq!(texts[0], "Hello world");
        assert_eq!(texts.last().map(String::as_str), Some("OITH Confidential - 1"));
    }

    #[test]
    fn test_long_document_paginates_with_footers() {
        let blocks = (0..120).map(|i| paragraph(&format!("Paragraph {i}"))).collect();
        let t = template();
        let pages = layout(&document(blocks), &t);
        assert!(pages.len() > 1);

        for (index, page) in pages.iter().enumerate() {
            let footer = format!("OITH Confidential - {}", index + 1);
            assert!(page.texts().contains(&footer), "missing footer on page {}", index + 1);

            for op in &page.ops {
                if let DrawOp::Text { y, bytes, .. } = op {
                    if !bytes.starts_with(b"OITH") {
                        assert!(*y >= t.page.body_bottom() - 1.0);
                        assert!(*y <= t.page.body_top());
                    }
                }
            }
        }
    }

    #[test]
    fn test_lines_wrap_inside_content_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let t = template();
        let pages = layout(&document(vec![paragraph(&text)]), &t);
        let right = t.page.margin + t.page.content_width();

        let body: Vec<_> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    x, face, size, bytes, ..
                } if !bytes.starts_with(b"OITH") => {
                    let width: u32 = bytes.iter().map(|&b| u32::from(face.glyph_width(b))).sum();
                    Some(x + width as f32 * size / 1000.0)
                }
                _ => None,
            })
            .collect();
        assert!(body.len() > 5);
        assert!(body.iter().all(|&end| end <= right + 0.01));
    }

    #[test]
    fn test_unbreakable_word_is_split() {
        let word = "x".repeat(400);
        let pages = layout(&document(vec![paragraph(&word)]), &template());
        let texts = pages[0].texts();
        assert!(texts.len() > 2);
        assert_eq!(texts[..texts.len() - 1].concat(), word);
    }

    #[test]
    fn test_styled_runs_use_matching_faces() {
        let mut p = Paragraph::new();
        p.add_text("plain ");
        p.add_run(TextRun::bold("bold"));
        p.add_run(TextRun::styled(
            "code",
            TextStyle {
                code: true,
                ..Default::default()
            },
        ));
        let pages = layout(&document(vec![Block::Paragraph(p)]), &template());

        let faces: Vec<_> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { face, .. } => Some(*face),
                _ => None,
            })
            .collect();
        assert_eq!(
            &faces[..3],
            &[FontFace::Helvetica, FontFace::HelveticaBold, FontFace::Courier]
        );
        assert!(pages[0].ops.iter().any(|op| matches!(op, DrawOp::Rect { .. })));
    }

    #[test]
    fn test_checkbox_glyphs_use_dingbats() {
        let pages = layout(
            &document(vec![paragraph("\u{2610} todo \u{2713} done")]),
            &template(),
        );
        let dingbats: Vec<_> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    face: FontFace::ZapfDingbats,
                    bytes,
                    ..
                } => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(dingbats, vec![vec![0x6F], vec![0x33]]);
    }

    #[test]
    fn test_heading_has_rule() {
        let pages = layout(
            &document(vec![Block::Paragraph(Paragraph::heading("Title", 1))]),
            &template(),
        );
        let ops = &pages[0].ops;
        assert!(matches!(ops[0], DrawOp::Text { face: FontFace::HelveticaBold, .. }));
        assert!(matches!(ops[1], DrawOp::Line { .. }));
    }

    #[test]
    fn test_banner_background_precedes_text() {
        let mut banner = Paragraph::new();
        banner.add_run(TextRun::bold("OITH"));
        banner.add_text(" | notes | Confidential");
        let t = template();
        let pages = layout(&document(vec![Block::Banner(banner)]), &t);

        assert!(matches!(
            pages[0].ops[0],
            DrawOp::Rect { color, .. } if color == t.banner.background
        ));
        assert_eq!(
            pages[0].texts(),
            vec!["OITH", " | notes | Confidential", "OITH Confidential - 1"]
        );
    }

    #[test]
    fn test_list_markers() {
        let mut list = List::numbered(1);
        for text in ["first", "second"] {
            list.items.push(ListItem {
                blocks: vec![paragraph(text)],
            });
        }
        let pages = layout(&document(vec![Block::List(list)]), &template());
        assert_eq!(&pages[0].texts()[..4], &["1.", "first", "2.", "second"]);
    }

    #[test]
    fn test_deep_list_indent_stops_at_minimum_width() {
        let mut list = List::bullet();
        list.items.push(ListItem {
            blocks: vec![paragraph("innermost")],
        });
        for _ in 0..60 {
            let mut outer = List::bullet();
            outer.items.push(ListItem {
                blocks: vec![Block::List(list)],
            });
            list = outer;
        }
        let t = template();
        let pages = layout(&document(vec![Block::List(list)]), &t);
        let right = t.page.width - t.page.margin;
        let innermost: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, bytes, .. } if bytes == b"innermost" => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(innermost.len(), 1);
        assert!(innermost[0] + MIN_LIST_WIDTH <= right + 0.01);
    }

    #[test]
    fn test_quote_background_under_content() {
        let t = template();
        let pages = layout(
            &document(vec![paragraph("before"), Block::Quote(vec![paragraph("quoted")])]),
            &t,
        );
        let ops = &pages[0].ops;
        let background = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Rect { color, .. } if *color == t.quote.background))
            .unwrap();
        let quoted = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { bytes, .. } if bytes == b"quoted"))
            .unwrap();
        let before = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { bytes, .. } if bytes == b"before"))
            .unwrap();
        assert!(before < background);
        assert!(background < quoted);
    }

    #[test]
    fn test_table_header_repeats_after_page_break() {
        let mut table = Table::new();
        table.add_row(TableRow::header(vec![
            TableCell::text("Task"),
            TableCell::text("Status"),
        ]));
        for i in 0..80 {
            table.add_row(TableRow::new(vec![
                TableCell::text(format!("Item {i}")),
                TableCell::text("open"),
            ]));
        }
        let pages = layout(&document(vec![Block::Table(table)]), &template());
        assert!(pages.len() > 1);
        for page in &pages {
            let texts = page.texts();
            assert_eq!(&texts[..2], &["Task", "Status"]);
        }
    }

    #[test]
    fn test_row_taller_than_page_is_split() {
        let mut table = Table::new();
        table.add_row(TableRow::header(vec![TableCell::text("Notes")]));
        table.add_row(TableRow::new(vec![TableCell::text(vec!["word"; 3000].join(" "))]));
        let document = Document {
            title: None,
            body: vec![Block::Table(table), paragraph("AFTER")],
            footer: None,
        };
        let t = template();
        let pages = layout(&document, &t);
        assert!(pages.len() > 2);

        let bottom = t.page.body_bottom();
        let mut words = 0;
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= bottom, "text at {y} below the body frame");
                }
            }
            let texts = page.texts();
            assert_ne!(texts, vec!["Notes".to_string()], "page holds only the repeated header");
            if texts.iter().any(|text| text.starts_with("word")) {
                assert_eq!(texts[0], "Notes");
            }
            words += texts
                .iter()
                .flat_map(|text| text.split_whitespace())
                .filter(|word| *word == "word")
                .count();
        }
        assert_eq!(words, 3000);
        assert!(pages.last().unwrap().texts().contains(&"AFTER".to_string()));
    }

    #[test]
    fn test_column_widths_fill_available_space() {
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![
            TableCell::text("short"),
            TableCell::text("a much longer cell of text"),
        ]));
        let t = template();
        let layouter = Layouter::new(&t);
        let format = layouter.body_format(
            Frame {
                left: 0.0,
                width: 500.0,
                italic: false,
                list_depth: 0,
                paragraph_spacing: 0.0,
            },
            Alignment::Left,
        );
        let widths = layouter.column_widths(&table, 2, 500.0, &format);
        assert!((widths.iter().sum::<f32>() - 500.0).abs() < 0.01);
        assert!(widths[1] > widths[0]);
    }

    #[test]
    fn test_code_block_lines() {
        let t = template();
        let pages = layout(
            &document(vec![Block::CodeBlock {
                text: "fn main() {\n    run();\n}\n".into(),
                language: Some("rust".into()),
            }]),
            &t,
        );
        let texts = pages[0].texts();
        assert_eq!(&texts[..3], &["fn main() {", "    run();", "}"]);
        assert!(matches!(
            pages[0].ops[0],
            DrawOp::Rect { color, .. } if color == t.code_block.background
        ));
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let pages = layout(&document(Vec::new()), &template());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].texts(), vec!["OITH Confidential - 1"]);
    }
}
