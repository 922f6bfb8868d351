//! Quotation domain: typed model, money formatting, form validation and the
//! HTTP handlers that tie them to the PDF generator.

pub mod handlers;
pub mod models;
pub mod money;
pub mod parser;
pub mod validation;


pub use models::{Currency, LineItem, Quotation, Totals};
pub use parser::parse_quotation;
