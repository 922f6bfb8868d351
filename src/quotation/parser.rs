//! Turns raw [`FormFields`] into a typed [`Quotation`].

use crate::form::FormFields;

use super::models::{Currency, LineItem, Quotation};
use super::validation::{
    validate_date, validate_non_negative_decimal, validate_optional_rate, validate_positive_int,
    validate_required, ValidationError, ValidationErrorKind, ValidationErrors,
};
use crate::generator::Validator;

pub const FIELD_COMPANY_NAME: &str = "company_name";
pub const FIELD_QUOTATION_NUMBER: &str = "quotation_number";
pub const FIELD_DATE: &str = "date";
pub const FIELD_GENERATED_BY: &str = "generated_by";
pub const FIELD_CUSTOMER_NAME: &str = "customer_name";
pub const FIELD_CUSTOMER_CONTACT: &str = "customer_contact";
pub const FIELD_CURRENCY: &str = "currency";
pub const FIELD_TAX_RATE: &str = "tax_rate";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_SERVICE_SL: &str = "service_sl[]";
pub const FIELD_SERVICE_DESC: &str = "service_desc[]";
pub const FIELD_SERVICE_QTY: &str = "service_qty[]";
pub const FIELD_SERVICE_COST: &str = "service_cost[]";

/// Parse and validate a submission, collecting every failure.
pub fn parse_quotation(fields: &FormFields) -> Result<Quotation, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let company_name = validate_required(fields.first(FIELD_COMPANY_NAME), FIELD_COMPANY_NAME, &mut errors);
    let quotation_number =
        validate_required(fields.first(FIELD_QUOTATION_NUMBER), FIELD_QUOTATION_NUMBER, &mut errors);
    let date = validate_date(fields.first(FIELD_DATE), FIELD_DATE, &mut errors);
    let generated_by = validate_required(fields.first(FIELD_GENERATED_BY), FIELD_GENERATED_BY, &mut errors);
    let customer_name = validate_required(fields.first(FIELD_CUSTOMER_NAME), FIELD_CUSTOMER_NAME, &mut errors);
    let customer_contact =
        validate_required(fields.first(FIELD_CUSTOMER_CONTACT), FIELD_CUSTOMER_CONTACT, &mut errors);
    let currency = parse_currency(fields.first(FIELD_CURRENCY), &mut errors);
    let tax_rate_percent = validate_optional_rate(fields.first(FIELD_TAX_RATE), FIELD_TAX_RATE, &mut errors);
    let notes = fields.first(FIELD_NOTES).unwrap_or_default().to_string();
    let line_items = parse_line_items(fields, &mut errors);

    let (
        Some(company_name),
        Some(quotation_number),
        Some(date),
        Some(generated_by),
        Some(customer_name),
        Some(customer_contact),
        Some(currency),
        Some(tax_rate_percent),
        Some(line_items),
    ) = (
        company_name,
        quotation_number,
        date,
        generated_by,
        customer_name,
        customer_contact,
        currency,
        tax_rate_percent,
        line_items,
    )
    else {
        return Err(errors);
    };

    errors.into_result()?;

    let quotation = Quotation {
        company_name,
        quotation_number,
        date,
        generated_by,
        customer_name,
        customer_contact,
        currency,
        tax_rate_percent,
        notes,
        line_items,
    };

    quotation.validate()?;
    Ok(quotation)
}

fn parse_currency(value: Option<&str>, errors: &mut ValidationErrors) -> Option<Currency> {
    match value.map(str::trim) {
        None | Some("") => Some(Currency::default()),
        Some(v) => match v.parse::<Currency>() {
            Ok(currency) => Some(currency),
            Err(_) => {
                errors.add(ValidationError::malformed(FIELD_CURRENCY, v, "USD or INR"));
                None
            }
        },
    }
}

/// Zip the four repeated groups into rows. Unequal group lengths are reported
/// once as a shape mismatch and no rows are parsed.
fn parse_line_items(fields: &FormFields, errors: &mut ValidationErrors) -> Option<Vec<LineItem>> {
    let serials = fields.all(FIELD_SERVICE_SL);
    let descriptions = fields.all(FIELD_SERVICE_DESC);
    let quantities = fields.all(FIELD_SERVICE_QTY);
    let costs = fields.all(FIELD_SERVICE_COST);

    let lengths = [
        (FIELD_SERVICE_SL, serials.len()),
        (FIELD_SERVICE_DESC, descriptions.len()),
        (FIELD_SERVICE_QTY, quantities.len()),
        (FIELD_SERVICE_COST, costs.len()),
    ];

    if lengths.iter().any(|(_, len)| *len != serials.len()) {
        errors.add(ValidationError::shape_mismatch(&lengths));
        return None;
    }

    if serials.is_empty() {
        errors.add(ValidationError::new(
            "services",
            ValidationErrorKind::MissingField,
            "at least one line item is required",
        ));
        return None;
    }

    let before = errors.len();
    let mut items = Vec::with_capacity(lengths[0].1);

    for (row, (((sl, desc), qty), cost)) in serials
        .into_iter()
        .zip(descriptions)
        .zip(quantities)
        .zip(costs)
        .enumerate()
    {
        let row_field = |name: &str| format!("{} (row {})", name, row + 1);

        let serial = validate_positive_int(sl, &row_field(FIELD_SERVICE_SL), errors);
        let description = validate_required(Some(desc), &row_field(FIELD_SERVICE_DESC), errors);
        let quantity = validate_positive_int(qty, &row_field(FIELD_SERVICE_QTY), errors);
        let unit_cost = validate_non_negative_decimal(cost, &row_field(FIELD_SERVICE_COST), errors);

        if let (Some(serial), Some(description), Some(quantity), Some(unit_cost)) =
            (serial, description, quantity, unit_cost)
        {
            items.push(LineItem::new(serial, description, quantity, unit_cost));
        }
    }

    if errors.len() > before {
        None
    } else {
        Some(items)
    }
}
