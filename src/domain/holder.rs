use serde::{Deserialize, Serialize};

/// An account holder (debtor). Holders live both in the flat `holders`
/// collection and in per-city `holders:<code>` collections; the city-scoped
/// copy is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub id: String,
    pub first_name1: String,
    #[serde(default)]
    pub first_name2: Option<String>,
    pub last_name1: String,
    #[serde(default)]
    pub last_name2: Option<String>,
    pub city_code: String,
}

impl Holder {
    /// Full display name, surnames first. Display convention, not
    /// alphabetical ordering.
    pub fn display_name(&self) -> String {
        compose_name(
            &self.last_name1,
            self.last_name2.as_deref(),
            &self.first_name1,
            self.first_name2.as_deref(),
        )
    }
}

/// Join name parts with single spaces, skipping blank components.
/// Shared by holders and employees.
pub fn compose_name(
    last_name1: &str,
    last_name2: Option<&str>,
    first_name1: &str,
    first_name2: Option<&str>,
) -> String {
    [Some(last_name1), last_name2, Some(first_name1), first_name2]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
