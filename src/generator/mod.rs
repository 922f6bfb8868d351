//! Generator module - turns a typed quotation into a PDF document.
//!
//! Generation happens in two steps:
//! - [`quotation_pdf::build_blocks`] lays the quotation out as an ordered list
//!   of [`layout::Block`]s (paragraphs, styled tables, spacers). This step is
//!   pure and is what most tests inspect.
//! - [`engine::PdfRenderEngine`] paginates those blocks onto US Letter pages
//!   and serialises the document to bytes in memory.

pub mod common;
pub mod engine;
pub mod fonts;
pub mod layout;
pub mod quotation_pdf;
pub mod traits;

pub use engine::PdfRenderEngine;
pub use quotation_pdf::QuotationGenerator;
pub use traits::{Generator, Validator};

use thiserror::Error;

use crate::quotation::validation::ValidationErrors;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid quotation: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("quotation amounts are out of range")]
    AmountOverflow,
    #[error("failed to lay out document: {0}")]
    Layout(String),
    #[error("failed to register font: {0}")]
    Font(String),
    #[error("failed to serialise PDF: {0}")]
    Serialize(String),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    /// Download name, e.g. `quotation_QT-1.pdf`.
    pub filename: String,
    /// Per-request identifier, unique even for identical quotation numbers.
    pub trace_id: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
}
