//! Input validation for quotation forms.
//!
//! Every check pushes into a shared [`ValidationErrors`] collection instead of
//! returning early, so a single response can list all problems with a
//! submission.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::models::Quotation;
use crate::generator::Validator;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required value is absent or blank.
    MissingField,
    /// A value is present but does not parse or is out of range.
    MalformedValue,
    /// Repeated field groups have different lengths.
    ShapeMismatch,
}

/// A single validation failure tied to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::MissingField,
            format!("missing required field '{}'", field),
        )
    }

    pub fn malformed(field: &str, value: &str, expected: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::MalformedValue,
            format!("invalid value '{}' for '{}': expected {}", value, field, expected),
        )
    }

    pub fn shape_mismatch(lengths: &[(&str, usize)]) -> Self {
        let detail = lengths
            .iter()
            .map(|(name, len)| format!("{} has {}", name, len))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            "services",
            ValidationErrorKind::ShapeMismatch,
            format!("line item fields have mismatched lengths ({})", detail),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors, reported together.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn has_kind(&self, kind: ValidationErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Ok if nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Required text: present and non-blank. Returns the trimmed value.
pub fn validate_required(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.add(ValidationError::missing_field(field));
            None
        }
    }
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn validate_date(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let raw = validate_required(value, field, errors)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(ValidationError::malformed(field, &raw, "a date in YYYY-MM-DD format"));
            None
        }
    }
}

/// Integer >= 1.
pub fn validate_positive_int(value: &str, field: &str, errors: &mut ValidationErrors) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::missing_field(field));
        return None;
    }

    match trimmed.parse::<u32>() {
        Ok(n) if n >= 1 => Some(n),
        _ => {
            errors.add(ValidationError::malformed(field, trimmed, "a positive whole number"));
            None
        }
    }
}

/// Decimal >= 0.
pub fn validate_non_negative_decimal(value: &str, field: &str, errors: &mut ValidationErrors) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::missing_field(field));
        return None;
    }

    match Decimal::from_str(trimmed) {
        Ok(d) if !d.is_sign_negative() || d.is_zero() => Some(d),
        _ => {
            errors.add(ValidationError::malformed(field, trimmed, "a non-negative number"));
            None
        }
    }
}

/// Optional non-negative decimal, blank or absent meaning zero.
pub fn validate_optional_rate(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<Decimal> {
    match value.map(str::trim) {
        None | Some("") => Some(Decimal::ZERO),
        Some(v) => validate_non_negative_decimal(v, field, errors),
    }
}

impl Validator for Quotation {
    /// Check the invariants of an already-typed quotation. Forms go through
    /// the parser first; this also guards quotations built in code.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [
            ("company_name", &self.company_name),
            ("quotation_number", &self.quotation_number),
            ("generated_by", &self.generated_by),
            ("customer_name", &self.customer_name),
            ("customer_contact", &self.customer_contact),
        ] {
            validate_required(Some(value.as_str()), field, &mut errors);
        }

        if self.tax_rate_percent.is_sign_negative() && !self.tax_rate_percent.is_zero() {
            errors.add(ValidationError::malformed(
                "tax_rate",
                &self.tax_rate_percent.to_string(),
                "a non-negative number",
            ));
        }

        if self.line_items.is_empty() {
            errors.add(ValidationError::new(
                "services",
                ValidationErrorKind::MissingField,
                "at least one line item is required",
            ));
        }

        for (row, item) in self.line_items.iter().enumerate() {
            if item.serial == 0 {
                errors.add(ValidationError::malformed(
                    &format!("service_sl[] (row {})", row + 1),
                    "0",
                    "a positive whole number",
                ));
            }
            if item.quantity == 0 {
                errors.add(ValidationError::malformed(
                    &format!("service_qty[] (row {})", row + 1),
                    "0",
                    "a positive whole number",
                ));
            }
            if item.description.trim().is_empty() {
                errors.add(ValidationError::missing_field(&format!("service_desc[] (row {})", row + 1)));
            }
            if item.unit_cost.is_sign_negative() && !item.unit_cost.is_zero() {
                errors.add(ValidationError::malformed(
                    &format!("service_cost[] (row {})", row + 1),
                    &item.unit_cost.to_string(),
                    "a non-negative number",
                ));
            }
        }

        if errors.is_empty() && self.totals().is_none() {
            errors.add(ValidationError::new(
                "services",
                ValidationErrorKind::MalformedValue,
                "line item amounts are too large to total",
            ));
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_blank() {
        let mut errors = ValidationErrors::new();
        assert!(validate_required(Some("   "), "company_name", &mut errors).is_none());
        assert!(validate_required(None, "generated_by", &mut errors).is_none());
        assert_eq!(errors.len(), 2);
        assert!(errors.has_kind(ValidationErrorKind::MissingField));
    }

    #[test]
    fn test_validate_required_trims() {
        let mut errors = ValidationErrors::new();
        let value = validate_required(Some("  Acme "), "company_name", &mut errors);
        assert_eq!(value.as_deref(), Some("Acme"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_date() {
        let mut errors = ValidationErrors::new();
        let date = validate_date(Some("2025-01-10"), "date", &mut errors);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 10));

        assert!(validate_date(Some("10/01/2025"), "date", &mut errors).is_none());
        assert!(validate_date(Some("2025-02-30"), "date", &mut errors).is_none());
        assert_eq!(errors.len(), 2);
        assert!(errors.has_kind(ValidationErrorKind::MalformedValue));
    }

    #[test]
    fn test_validate_positive_int() {
        let mut errors = ValidationErrors::new();
        assert_eq!(validate_positive_int("3", "service_qty[]", &mut errors), Some(3));
        assert!(validate_positive_int("0", "service_qty[]", &mut errors).is_none());
        assert!(validate_positive_int("-2", "service_qty[]", &mut errors).is_none());
        assert!(validate_positive_int("1.5", "service_qty[]", &mut errors).is_none());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_non_negative_decimal() {
        let mut errors = ValidationErrors::new();
        assert!(validate_non_negative_decimal("0", "service_cost[]", &mut errors).is_some());
        assert!(validate_non_negative_decimal("12.50", "service_cost[]", &mut errors).is_some());
        assert!(validate_non_negative_decimal("-0.01", "service_cost[]", &mut errors).is_none());
        assert!(validate_non_negative_decimal("ten", "service_cost[]", &mut errors).is_none());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_optional_rate_defaults_to_zero() {
        let mut errors = ValidationErrors::new();
        assert_eq!(validate_optional_rate(None, "tax_rate", &mut errors), Some(Decimal::ZERO));
        assert_eq!(validate_optional_rate(Some(" "), "tax_rate", &mut errors), Some(Decimal::ZERO));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_errors_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::missing_field("company_name"));
        errors.add(ValidationError::shape_mismatch(&[("service_desc[]", 2), ("service_qty[]", 1)]));
        let msg = errors.to_string();
        assert!(msg.contains("missing required field 'company_name'"));
        assert!(msg.contains("; line item fields have mismatched lengths"));
        assert!(msg.contains("service_desc[] has 2"));
    }
}
