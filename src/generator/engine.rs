//! PDF rendering engine.
//!
//! Rendering happens in two passes. [`PdfRenderEngine::layout`] paginates a
//! list of [`Block`]s into per-page [`DrawOp`] lists, in points measured from
//! the top-left corner of the page. [`PdfRenderEngine::render`] replays those
//! ops onto a `printpdf` document and serialises it in memory.
//!
//! Text is reduced to the base-font repertoire before it is measured, then
//! wrapped with the Helvetica metrics from [`super::fonts`]. Tables are
//! centred on the content frame and break between rows; a row taller than the
//! space left on a page is split line by line and continues on the next page.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Rect, Rgb,
};

use super::fonts::{text_width, to_win_ansi, wrap_text};
use super::layout::{Align, Block, CellStyle, Color, FontWeight, PageSetup, Paragraph, Stroke, Table};
use super::GeneratorError;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

/// One positioned drawing operation. Coordinates are points from the
/// top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        weight: FontWeight,
        size: f32,
        color: Color,
        x: f32,
        baseline: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

impl DrawOp {
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Rendered PDF bytes plus the number of pages used.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Stateless engine for rendering block lists to PDF.
pub struct PdfRenderEngine;

impl PdfRenderEngine {
    /// Paginate `blocks`, returning the drawing ops of each page in order.
    pub fn layout(page: PageSetup, blocks: &[Block]) -> Result<Vec<Vec<DrawOp>>, GeneratorError> {
        let mut cursor = PageCursor::new(page);

        for block in blocks {
            match block {
                Block::Spacer(height) => cursor.advance(*height),
                Block::Paragraph(paragraph) => cursor.draw_paragraph(paragraph),
                Block::Table(table) => cursor.draw_table(table)?,
            }
        }

        Ok(cursor.finish())
    }

    /// Render `blocks` into a single PDF document titled `title`.
    pub fn render(title: &str, page: PageSetup, blocks: &[Block]) -> Result<RenderedPdf, GeneratorError> {
        let pages = Self::layout(page, blocks)?;

        let (doc, first_page, first_layer) =
            PdfDocument::new(title, mm(page.width), mm(page.height), "Layer 1");

        let fonts = BaseFonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| GeneratorError::Font(format!("{:?}", e)))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| GeneratorError::Font(format!("{:?}", e)))?,
        };

        for (index, ops) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = doc.add_page(mm(page.width), mm(page.height), "Layer 1");
                doc.get_page(page_index).get_layer(layer_index)
            };

            let writer = PageWriter {
                layer,
                fonts: &fonts,
                height: page.height,
            };
            for op in ops {
                writer.emit(op);
            }
        }

        let page_count = pages.len();
        let bytes = doc
            .save_to_bytes()
            .map_err(|e| GeneratorError::Serialize(format!("{:?}", e)))?;

        Ok(RenderedPdf { bytes, page_count })
    }
}

struct BaseFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Replays [`DrawOp`]s onto one printpdf layer, flipping to PDF's
/// bottom-left origin.
struct PageWriter<'a> {
    layer: PdfLayerReference,
    fonts: &'a BaseFonts,
    height: f32,
}

impl PageWriter<'_> {
    fn emit(&self, op: &DrawOp) {
        match op {
            DrawOp::Text {
                text,
                weight,
                size,
                color,
                x,
                baseline,
            } => {
                let font = match weight {
                    FontWeight::Regular => &self.fonts.regular,
                    FontWeight::Bold => &self.fonts.bold,
                };
                self.layer.set_fill_color(pdf_color(*color));
                self.layer
                    .use_text(text.as_str(), *size, mm(*x), mm(self.height - baseline), font);
            }
            DrawOp::Line { from, to, stroke } => {
                self.layer.set_outline_color(pdf_color(stroke.color));
                self.layer.set_outline_thickness(stroke.width);
                self.layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(from.0), mm(self.height - from.1)), false),
                        (Point::new(mm(to.0), mm(self.height - to.1)), false),
                    ],
                    is_closed: false,
                });
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.layer.set_fill_color(pdf_color(*color));
                let rect = Rect::new(
                    mm(*x),
                    mm(self.height - y - height),
                    mm(x + width),
                    mm(self.height - y),
                )
                .with_mode(PaintMode::Fill);
                self.layer.add_rect(rect);
            }
        }
    }
}

/// Wrapped content of one table cell.
struct CellLines {
    style: CellStyle,
    width: f32,
    lines: Vec<String>,
}

impl CellLines {
    fn leading(&self) -> f32 {
        self.style.size * 1.2
    }

    fn height(&self, line_count: usize) -> f32 {
        self.style.padding.top + self.style.padding.bottom + line_count as f32 * self.leading()
    }

    /// How many lines fit in a fragment `height` points tall.
    fn capacity(&self, height: f32) -> usize {
        let room = height - self.style.padding.top - self.style.padding.bottom;
        if room <= 0.0 {
            0
        } else {
            (room / self.leading()).floor() as usize
        }
    }
}

/// Drawing position. `y` is measured from the top edge of the page, in points.
struct PageCursor {
    page: PageSetup,
    finished: Vec<Vec<DrawOp>>,
    current: Vec<DrawOp>,
    y: f32,
}

impl PageCursor {
    fn new(page: PageSetup) -> Self {
        Self {
            page,
            finished: Vec::new(),
            current: Vec::new(),
            y: page.margin_top,
        }
    }

    fn finish(mut self) -> Vec<Vec<DrawOp>> {
        self.finished.push(self.current);
        self.finished
    }

    fn bottom_limit(&self) -> f32 {
        self.page.height - self.page.margin_bottom
    }

    fn at_top(&self) -> bool {
        self.y <= self.page.margin_top
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = self.page.margin_top;
    }

    /// Start a new page unless `height` still fits.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > self.bottom_limit() && !self.at_top() {
            self.new_page();
        }
    }

    /// Spacers never start a new page; excess is absorbed at the bottom.
    fn advance(&mut self, height: f32) {
        self.y = (self.y + height).min(self.bottom_limit());
    }

    fn text(&mut self, text: &str, weight: FontWeight, size: f32, color: Color, x: f32, baseline: f32) {
        if text.is_empty() {
            return;
        }
        self.current.push(DrawOp::Text {
            text: text.to_string(),
            weight,
            size,
            color,
            x,
            baseline,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.current.push(DrawOp::Line { from, to, stroke });
    }

    fn aligned_x(align: Align, left: f32, width: f32, text_w: f32) -> f32 {
        match align {
            Align::Left => left,
            Align::Center => left + (width - text_w) / 2.0,
            Align::Right => left + width - text_w,
        }
    }

    fn draw_paragraph(&mut self, paragraph: &Paragraph) {
        let style = paragraph.style;
        let width = self.page.content_width();
        let text = to_win_ansi(&paragraph.text);
        let lines = wrap_text(&text, style.weight, style.size, width);
        let leading = style.leading();

        if !self.at_top() {
            self.y += style.space_before;
        }

        for line in &lines {
            self.ensure_room(leading);
            let line_w = text_width(line, style.weight, style.size);
            let x = Self::aligned_x(style.align, self.page.margin_left, width, line_w);
            // baseline sits one font size below the top of the line box
            self.text(line, style.weight, style.size, style.color, x, self.y + style.size);
            self.y += leading;
        }

        self.advance(style.space_after);
    }

    fn draw_table(&mut self, table: &Table) -> Result<(), GeneratorError> {
        let row_count = table.rows.len();
        let left = self.page.margin_left + (self.page.content_width() - table.width()) / 2.0;

        for (row_index, row) in table.rows.iter().enumerate() {
            let cells: Vec<CellLines> = table
                .column_widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    let style = table.style.cell_style(row_index, col, row_count);
                    let text = row.get(col).map(String::as_str).unwrap_or("");
                    let inner = (width - style.padding.left - style.padding.right).max(1.0);
                    CellLines {
                        style,
                        width: *width,
                        lines: wrap_text(&to_win_ansi(text), style.weight, style.size, inner),
                    }
                })
                .collect();

            let rule = table
                .style
                .rule_above_last_row
                .filter(|_| row_index + 1 == row_count);
            self.draw_row(left, &cells, rule, table.style.grid)?;
        }

        Ok(())
    }

    fn draw_row(
        &mut self,
        left: f32,
        cells: &[CellLines],
        rule: Option<Stroke>,
        grid: Option<Stroke>,
    ) -> Result<(), GeneratorError> {
        let row_height = cells
            .iter()
            .map(|cell| cell.height(cell.lines.len()))
            .fold(0.0_f32, f32::max);

        // rows taller than a whole frame start splitting where they are
        let frame = self.bottom_limit() - self.page.margin_top;
        if row_height <= frame {
            self.ensure_room(row_height);
        }
        if self.y + row_height <= self.bottom_limit() {
            let ranges: Vec<(usize, usize)> = cells.iter().map(|cell| (0, cell.lines.len())).collect();
            self.draw_fragment(left, cells, &ranges, row_height, true, rule, grid);
            return Ok(());
        }

        let mut next = vec![0_usize; cells.len()];
        let mut first = true;
        while cells.iter().zip(&next).any(|(cell, n)| *n < cell.lines.len()) {
            let available = self.bottom_limit() - self.y;
            let ranges: Vec<(usize, usize)> = cells
                .iter()
                .zip(&next)
                .map(|(cell, start)| {
                    let end = (start + cell.capacity(available)).min(cell.lines.len());
                    (*start, end)
                })
                .collect();

            if ranges.iter().all(|(start, end)| start == end) {
                if self.at_top() {
                    return Err(GeneratorError::Layout(
                        "table row does not fit on an empty page".to_string(),
                    ));
                }
                self.new_page();
                continue;
            }

            let done = cells
                .iter()
                .zip(&ranges)
                .all(|(cell, (_, end))| *end == cell.lines.len());
            let height = if done {
                cells
                    .iter()
                    .zip(&ranges)
                    .map(|(cell, (start, end))| cell.height(end - start))
                    .fold(0.0_f32, f32::max)
            } else {
                available
            };

            self.draw_fragment(left, cells, &ranges, height, false, rule.filter(|_| first), grid);
            first = false;
            for (slot, (_, end)) in next.iter_mut().zip(&ranges) {
                *slot = *end;
            }
            if !done {
                self.new_page();
            }
        }

        Ok(())
    }

    /// Draw lines `ranges[col]` of each cell in a band `height` points tall
    /// starting at the cursor. Text is vertically centred only for whole rows.
    #[allow(clippy::too_many_arguments)]
    fn draw_fragment(
        &mut self,
        left: f32,
        cells: &[CellLines],
        ranges: &[(usize, usize)],
        height: f32,
        centre: bool,
        rule: Option<Stroke>,
        grid: Option<Stroke>,
    ) {
        let top = self.y;
        let width: f32 = cells.iter().map(|cell| cell.width).sum();

        let mut x = left;
        for (cell, (start, end)) in cells.iter().zip(ranges) {
            let style = &cell.style;
            if let Some(background) = style.background {
                self.current.push(DrawOp::FillRect {
                    x,
                    y: top,
                    width: cell.width,
                    height,
                    color: background,
                });
            }

            let leading = cell.leading();
            let mut line_top = top + style.padding.top;
            if centre {
                let available = height - style.padding.top - style.padding.bottom;
                line_top += (available - (end - start) as f32 * leading) / 2.0;
            }

            let inner_left = x + style.padding.left;
            let inner_width = cell.width - style.padding.left - style.padding.right;
            for line in &cell.lines[*start..*end] {
                let line_w = text_width(line, style.weight, style.size);
                let tx = Self::aligned_x(style.align, inner_left, inner_width, line_w);
                self.text(line, style.weight, style.size, style.color, tx, line_top + style.size);
                line_top += leading;
            }

            x += cell.width;
        }

        if let Some(rule) = rule {
            self.line((left, top), (left + width, top), rule);
        }

        if let Some(grid) = grid {
            let right = left + width;
            let bottom = top + height;
            self.line((left, top), (right, top), grid);
            self.line((left, bottom), (right, bottom), grid);
            let mut gx = left;
            self.line((gx, top), (gx, bottom), grid);
            for cell in cells {
                gx += cell.width;
                self.line((gx, top), (gx, bottom), grid);
            }
        }

        self.y = top + height;
    }
}
