use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::{serde_cents_opt, Cents};

/// An issued invoice. `total_value` is optional in legacy data; when absent
/// the value comes from the contract's plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub contract_number: String,
    pub city_code: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default, with = "serde_cents_opt")]
    pub total_value: Option<Cents>,
    #[serde(default)]
    pub executive_id: Option<String>,
}
