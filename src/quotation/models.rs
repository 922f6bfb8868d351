use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Days a quotation stays valid after its issue date.
pub const VALIDITY_DAYS: u64 = 20;

/// Maximum number of note lines considered for rendering.
pub const MAX_NOTE_LINES: usize = 50;

/// Supported quotation currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    USD,
    INR,
}

impl Currency {
    /// Prefix printed in front of every monetary cell.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::INR => "INR ",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::USD => write!(f, "USD"),
            Currency::INR => write!(f, "INR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "INR" => Ok(Currency::INR),
            _ => Err(format!("Unsupported currency '{}' (expected USD or INR)", s.trim())),
        }
    }
}

/// A single quoted service row.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub serial: u32,
    pub description: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
}

impl LineItem {
    pub fn new(serial: u32, description: impl Into<String>, quantity: u32, unit_cost: Decimal) -> Self {
        Self {
            serial,
            description: description.into(),
            quantity,
            unit_cost,
        }
    }

    /// `quantity * unit_cost`, or `None` when the product leaves decimal range.
    pub fn amount(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_cost)
    }
}

/// Derived money figures of a quotation. `tax` is only present for a positive rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Option<Decimal>,
    pub total: Decimal,
}

impl Totals {
    /// Sum the line amounts in input order and apply the tax rate.
    pub fn compute(items: &[LineItem], tax_rate_percent: Decimal) -> Option<Self> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.amount().and_then(|amount| acc.checked_add(amount))
        })?;

        if tax_rate_percent > Decimal::ZERO {
            let tax = subtotal
                .checked_mul(tax_rate_percent)?
                .checked_div(Decimal::ONE_HUNDRED)?;
            let total = subtotal.checked_add(tax)?;
            Some(Self {
                subtotal,
                tax: Some(tax),
                total,
            })
        } else {
            Some(Self {
                subtotal,
                tax: None,
                total: subtotal,
            })
        }
    }
}

/// Typed quotation, built once per request and consumed by the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    pub company_name: String,
    pub quotation_number: String,
    pub date: NaiveDate,
    pub generated_by: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub currency: Currency,
    pub tax_rate_percent: Decimal,
    pub notes: String,
    pub line_items: Vec<LineItem>,
}

impl Quotation {
    pub fn totals(&self) -> Option<Totals> {
        Totals::compute(&self.line_items, self.tax_rate_percent)
    }

    /// Issue date plus the validity window; `None` past the end of the calendar.
    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.date.checked_add_days(chrono::Days::new(VALIDITY_DAYS))
    }

    /// Lines of the notes section: the first 50 lines of the trimmed text, blanks dropped.
    pub fn note_lines(&self) -> Vec<&str> {
        let trimmed = self.notes.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        trimmed
            .split('\n')
            .take(MAX_NOTE_LINES)
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}
