use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::{serde_cents, Cents};

/// One account handed to an executive for collection in a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedAccount {
    pub invoice_number: String,
    #[serde(with = "serde_cents")]
    pub value: Cents,
}

/// A monthly portfolio assignment: the set of accounts an executive is
/// responsible for collecting between `date_from` and `date_to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub executive_id: String,
    pub year: i32,
    pub month: u32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub accounts: Vec<AssignedAccount>,
}

impl Assignment {
    /// Period heading, e.g. "2026-03".
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Whether this assignment's period intersects the query range.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.date_from <= to && self.date_to >= from
    }

    /// Total value of the assigned accounts.
    pub fn assigned_total(&self) -> Cents {
        self.accounts.iter().map(|a| a.value).sum()
    }
}
