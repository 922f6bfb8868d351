//! Common utilities for document generation.
//!
//! Date labels, download names and per-request identifiers.

use chrono::NaiveDate;
use sanitize_filename::{sanitize_with_options, Options};
use uuid::Uuid;

/// Printed when the validity date cannot be computed.
pub const VALIDITY_FALLBACK: &str = "20 days from quotation date";

/// Long English date, e.g. "January 30, 2025".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Validity label for the header grid, falling back to a fixed phrase.
pub fn validity_label(valid_until: Option<NaiveDate>) -> String {
    valid_until
        .map(format_long_date)
        .unwrap_or_else(|| VALIDITY_FALLBACK.to_string())
}

/// Replace path-unsafe characters (`/`, `\`, `:`, quotes, control chars...) with `_`.
/// Names that are only reserved on Windows (`CON`, `COM1`) are kept as typed.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let options = Options {
        truncate: true,
        windows: false,
        replacement: "_",
    };
    let cleaned = sanitize_with_options(name.trim(), options);

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Attachment name: `quotation_<number>.pdf`.
pub fn download_filename(quotation_number: &str) -> String {
    format!("quotation_{}.pdf", sanitize_filename(quotation_number, "document"))
}

/// Identifier scoped to one request: sanitized number plus a fresh UUID.
pub fn trace_id(quotation_number: &str, request_id: Uuid) -> String {
    format!("{}-{}", sanitize_filename(quotation_number, "document"), request_id)
}
