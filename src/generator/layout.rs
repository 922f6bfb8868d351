//! Document content model.
//!
//! A document is an ordered list of [`Block`]s. Lengths are in PDF points
//! (1/72 inch); [`inch`] converts from inches.

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

pub fn inch(value: f32) -> f32 {
    value * POINTS_PER_INCH
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::hex(0x000000);
    pub const GREY: Color = Color::hex(0x808080);
    pub const WHITE_SMOKE: Color = Color::hex(0xf5f5f5);

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Paragraph style: font, colour, alignment and vertical spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub color: Color,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
}

impl TextStyle {
    /// Line height used for wrapped lines.
    pub fn leading(&self) -> f32 {
        self.size * 1.2
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            weight: FontWeight::Regular,
            size: 10.0,
            color: Color::BLACK,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
}

/// Cell padding in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 3.0,
            bottom: 3.0,
            left: 6.0,
            right: 6.0,
        }
    }
}

/// A stroked line: width in points and colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// Styling of the first row when a table has a header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderStyle {
    pub background: Color,
    pub text_color: Color,
    pub padding: Padding,
}

/// Table-wide style rules, resolved per cell by [`TableStyle::cell_style`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub column_align: Vec<Align>,
    pub bold_columns: Vec<usize>,
    pub bold_last_row: bool,
    pub header: Option<HeaderStyle>,
    pub padding: Padding,
    pub grid: Option<Stroke>,
    pub rule_above_last_row: Option<Stroke>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            column_align: Vec::new(),
            bold_columns: Vec::new(),
            bold_last_row: false,
            header: None,
            padding: Padding::default(),
            grid: None,
            rule_above_last_row: None,
        }
    }
}

/// Fully resolved style of one table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub align: Align,
    pub color: Color,
    pub background: Option<Color>,
    pub padding: Padding,
}

impl TableStyle {
    pub fn cell_style(&self, row: usize, col: usize, row_count: usize) -> CellStyle {
        let header = if row == 0 { self.header } else { None };
        let bold = header.is_some()
            || self.bold_columns.contains(&col)
            || (self.bold_last_row && row + 1 == row_count);

        CellStyle {
            weight: if bold { FontWeight::Bold } else { FontWeight::Regular },
            size: self.font_size,
            align: self.column_align.get(col).copied().unwrap_or_default(),
            color: header.map(|h| h.text_color).unwrap_or(Color::BLACK),
            background: header.map(|h| h.background),
            padding: header.map(|h| h.padding).unwrap_or(self.padding),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl Table {
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Text of the cell at `(row, col)`, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Vertical gap in points.
    Spacer(f32),
}

impl Block {
    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Paragraph(Paragraph {
            text: text.into(),
            style,
        })
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageSetup {
    /// US Letter with a 0.5in top and 0.75in bottom margin.
    pub fn us_letter() -> Self {
        Self {
            width: inch(8.5),
            height: inch(11.0),
            margin_top: inch(0.5),
            margin_bottom: inch(0.75),
            margin_left: inch(1.0),
            margin_right: inch(1.0),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}
