//! Quotation document layout.
//!
//! [`build_blocks`] arranges a quotation into the fixed section order: title,
//! heading, header grid, bill-to block, line items, totals, optional notes and
//! the footer. [`QuotationGenerator`] renders those blocks to PDF.

use uuid::Uuid;

use super::common::{download_filename, trace_id, validity_label};
use super::engine::PdfRenderEngine;
use super::layout::{
    inch, Align, Block, Color, FontWeight, HeaderStyle, Padding, PageSetup, Stroke, Table, TableStyle,
    TextStyle,
};
use super::traits::{Generator, Validator};
use super::{GeneratedDocument, GeneratorError};
use crate::quotation::models::Quotation;
use crate::quotation::money::{format_money, format_rate};

pub const THANK_YOU_LINE: &str = "Thank you for your Business!";
pub const SUPPORT_EMAIL: &str = "connect@openappservices.com";

const BRAND_BLUE: Color = Color::hex(0x1a5490);
const DARK_GREY: Color = Color::hex(0x333333);
const MID_GREY: Color = Color::hex(0x666666);

pub const ITEM_HEADERS: [&str; 5] = ["Sl No", "Service Description", "Qty", "Rate", "Amount"];

fn title_style() -> TextStyle {
    TextStyle {
        weight: FontWeight::Bold,
        size: 24.0,
        color: BRAND_BLUE,
        align: Align::Center,
        space_before: 0.0,
        space_after: 30.0,
    }
}

fn heading_style() -> TextStyle {
    TextStyle {
        weight: FontWeight::Bold,
        size: 12.0,
        color: DARK_GREY,
        align: Align::Left,
        space_before: 12.0,
        space_after: 12.0,
    }
}

fn note_style() -> TextStyle {
    TextStyle {
        size: 9.0,
        color: MID_GREY,
        ..TextStyle::default()
    }
}

fn footer_style() -> TextStyle {
    TextStyle {
        weight: FontWeight::Bold,
        size: 10.0,
        color: DARK_GREY,
        align: Align::Center,
        space_before: 0.0,
        space_after: 5.0,
    }
}

fn footer_small_style() -> TextStyle {
    TextStyle {
        size: 8.0,
        color: MID_GREY,
        align: Align::Center,
        ..TextStyle::default()
    }
}

fn label_table_style(bold_columns: Vec<usize>) -> TableStyle {
    TableStyle {
        font_size: 10.0,
        bold_columns,
        ..TableStyle::default()
    }
}

fn header_grid(quotation: &Quotation) -> Table {
    let valid_until = validity_label(quotation.valid_until());
    Table {
        column_widths: vec![inch(1.5), inch(2.5), inch(1.0), inch(2.0)],
        rows: vec![
            vec![
                "Quotation No:".to_string(),
                quotation.quotation_number.clone(),
                "Date:".to_string(),
                quotation.date.format("%Y-%m-%d").to_string(),
            ],
            vec![
                "Generated By:".to_string(),
                quotation.generated_by.clone(),
                "Valid Until:".to_string(),
                valid_until,
            ],
        ],
        style: label_table_style(vec![0, 2]),
    }
}

fn customer_table(quotation: &Quotation) -> Table {
    Table {
        column_widths: vec![inch(1.5), inch(5.0)],
        rows: vec![
            vec!["Customer Name:".to_string(), quotation.customer_name.clone()],
            vec!["Contact:".to_string(), quotation.customer_contact.clone()],
        ],
        style: label_table_style(vec![0]),
    }
}

fn items_table(quotation: &Quotation) -> Result<Table, GeneratorError> {
    let mut rows = vec![ITEM_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()];

    for item in &quotation.line_items {
        let amount = item.amount().ok_or(GeneratorError::AmountOverflow)?;
        rows.push(vec![
            item.serial.to_string(),
            item.description.clone(),
            item.quantity.to_string(),
            format_money(quotation.currency, item.unit_cost),
            format_money(quotation.currency, amount),
        ]);
    }

    Ok(Table {
        column_widths: vec![inch(0.6), inch(3.2), inch(0.6), inch(1.3), inch(1.3)],
        rows,
        style: TableStyle {
            font_size: 9.0,
            column_align: vec![Align::Center, Align::Left, Align::Center, Align::Right, Align::Right],
            header: Some(HeaderStyle {
                background: BRAND_BLUE,
                text_color: Color::WHITE_SMOKE,
                padding: Padding {
                    top: 12.0,
                    bottom: 12.0,
                    ..Padding::default()
                },
            }),
            grid: Some(Stroke {
                width: 1.0,
                color: Color::GREY,
            }),
            ..TableStyle::default()
        },
    })
}

fn totals_table(quotation: &Quotation) -> Result<Table, GeneratorError> {
    let totals = quotation.totals().ok_or(GeneratorError::AmountOverflow)?;
    let currency = quotation.currency;

    let mut rows = vec![vec!["Subtotal:".to_string(), format_money(currency, totals.subtotal)]];
    if let Some(tax) = totals.tax {
        rows.push(vec![
            format!("Tax (GST {}%):", format_rate(quotation.tax_rate_percent)),
            format_money(currency, tax),
        ]);
    }
    rows.push(vec!["Total:".to_string(), format_money(currency, totals.total)]);

    Ok(Table {
        column_widths: vec![inch(5.7), inch(1.3)],
        rows,
        style: TableStyle {
            font_size: 11.0,
            column_align: vec![Align::Left, Align::Right],
            bold_last_row: true,
            padding: Padding {
                top: 8.0,
                ..Padding::default()
            },
            rule_above_last_row: Some(Stroke {
                width: 2.0,
                color: Color::BLACK,
            }),
            ..TableStyle::default()
        },
    })
}

/// Lay out a quotation as an ordered list of blocks.
pub fn build_blocks(quotation: &Quotation) -> Result<Vec<Block>, GeneratorError> {
    let mut blocks = vec![
        Block::paragraph(quotation.company_name.clone(), title_style()),
        Block::Spacer(inch(0.2)),
        Block::paragraph("QUOTATION", heading_style()),
        Block::Table(header_grid(quotation)),
        Block::Spacer(inch(0.3)),
        Block::paragraph("Bill To:", heading_style()),
        Block::Table(customer_table(quotation)),
        Block::Spacer(inch(0.3)),
        Block::Table(items_table(quotation)?),
        Block::Spacer(inch(0.2)),
        Block::Table(totals_table(quotation)?),
    ];

    let note_lines = quotation.note_lines();
    if !note_lines.is_empty() {
        blocks.push(Block::Spacer(inch(0.3)));
        blocks.push(Block::paragraph("Notes:", heading_style()));
        blocks.extend(
            note_lines
                .into_iter()
                .map(|line| Block::paragraph(line, note_style())),
        );
    }

    blocks.push(Block::Spacer(inch(0.4)));
    blocks.push(Block::paragraph(THANK_YOU_LINE, footer_style()));
    blocks.push(Block::paragraph(
        format!(
            "If you have any questions on this quote, please reach out to {}",
            SUPPORT_EMAIL
        ),
        footer_small_style(),
    ));

    Ok(blocks)
}

/// Generator for quotation PDFs.
#[derive(Debug, Clone, Copy)]
pub struct QuotationGenerator {
    page: PageSetup,
}

impl QuotationGenerator {
    pub fn new() -> Self {
        Self {
            page: PageSetup::us_letter(),
        }
    }

}

impl Default for QuotationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Generator<&'a Quotation> for QuotationGenerator {
    fn generate(&self, quotation: &'a Quotation) -> Result<GeneratedDocument, GeneratorError> {
        quotation.validate()?;

        let request_id = Uuid::new_v4();
        let trace_id = trace_id(&quotation.quotation_number, request_id);
        let blocks = build_blocks(quotation)?;
        let title = format!("Quotation {}", quotation.quotation_number);
        let rendered = PdfRenderEngine::render(&title, self.page, &blocks)?;

        log::debug!(
            "Rendered quotation {} into {} blocks over {} page(s)",
            trace_id,
            blocks.len(),
            rendered.page_count
        );

        Ok(GeneratedDocument {
            filename: download_filename(&quotation.quotation_number),
            trace_id,
            pdf: rendered.bytes,
            page_count: rendered.page_count,
        })
    }
}
