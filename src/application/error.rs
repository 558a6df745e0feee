use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("The {report} report requires {field}")]
    MissingField {
        report: &'static str,
        field: &'static str,
    },

    #[error("Empty date range: {from} is after {to}")]
    EmptyDateRange { from: NaiveDate, to: NaiveDate },

    #[error("The {report} report cannot be grouped by {group_by}")]
    UnsupportedGrouping {
        report: &'static str,
        group_by: &'static str,
    },

    #[error("Store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}
