use serde::{Deserialize, Serialize};

/// A branch city. City codes double as the suffix of scoped collection
/// names (`holders:051`, `payments-cash:051`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub code: String,
    pub name: String,
}
