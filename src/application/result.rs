use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{format_cents, Cents};

/// One typed table cell. Money stays in cents until [`Cell::render`], which
/// is the only place a cent value becomes a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Money(Cents),
    Count(i64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => Cell::Text(v.into()),
            None => Cell::Empty,
        }
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        match value {
            Some(d) => Cell::Date(d),
            None => Cell::Empty,
        }
    }

    /// Whether renderers should right-align this cell.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Money(_) | Cell::Count(_))
    }

    /// The cell's display string, shared by every output format.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(value) => value.clone(),
            Cell::Money(cents) => format_cents(*cents),
            Cell::Count(value) => value.to_string(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// A single report row. `value_cents` is the row's contribution to its
/// group subtotal, kept separately so renderers never re-derive totals
/// from cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub cells: Vec<Cell>,
    pub value_cents: Cents,
}

/// Rows sharing one grouping key. `key` is the canonical identifier the
/// rows were grouped on; `label` is what renderers print.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    pub key: String,
    pub label: String,
    pub rows: Vec<ReportRow>,
    pub subtotal_cents: Cents,
}

/// Structured data-quality findings. Warnings ride on the report result
/// instead of aborting assembly; renderers decide how loudly to show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// A referenced entity could not be resolved. Rows missing their value
    /// are skipped; rows missing only display data keep a blank cell.
    Resolution {
        entity: &'static str,
        key: String,
        invoice: Option<String>,
    },
    /// An installment number outside the plan's declared range.
    InstallmentOutOfRange {
        invoice: String,
        installment: u32,
        limit: Option<u32>,
    },
    /// A payment's explicit breakdown disagrees with its recorded amount.
    BreakdownMismatch {
        invoice: String,
        recorded_cents: Cents,
        share_cents: Cents,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Resolution { entity, key, invoice: Some(invoice) } => {
                write!(f, "unresolved {} '{}' (invoice {})", entity, key, invoice)
            }
            Warning::Resolution { entity, key, invoice: None } => {
                write!(f, "unresolved {} '{}'", entity, key)
            }
            Warning::InstallmentOutOfRange { invoice, installment, limit: Some(limit) } => {
                write!(
                    f,
                    "invoice {}: installment {} outside plan range of {}",
                    invoice, installment, limit
                )
            }
            Warning::InstallmentOutOfRange { invoice, installment, limit: None } => {
                write!(f, "invoice {}: installment {} invalid", invoice, installment)
            }
            Warning::BreakdownMismatch { invoice, recorded_cents, share_cents } => {
                write!(
                    f,
                    "invoice {}: payment breakdown sums to {} but {} was recorded",
                    invoice,
                    format_cents(*share_cents),
                    format_cents(*recorded_cents)
                )
            }
        }
    }
}

/// A fully assembled report. Subtotals and the grand total are exact cent
/// sums computed during assembly; pagination and rendering only read them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub report: &'static str,
    pub title: String,
    pub columns: Vec<&'static str>,
    pub period: Option<(NaiveDate, NaiveDate)>,
    pub groups: Vec<ReportGroup>,
    pub grand_total_cents: Cents,
    pub warnings: Vec<Warning>,
    pub generated_at: DateTime<Utc>,
}

impl ReportResult {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}
