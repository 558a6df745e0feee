mod store;

pub use store::*;

/// SQL migration for the document table
pub const MIGRATION_001_DOCUMENTS: &str = include_str!("migrations/001_documents.sql");

/// Well-known collection names. City-scoped collections append the city code
/// to a fixed prefix, e.g. `holders:051`.
pub mod collections {
    pub const INVOICES: &str = "invoices";
    pub const CONTRACTS: &str = "contracts";
    pub const PLANS: &str = "plans";
    pub const HOLDERS: &str = "holders";
    pub const ASSIGNMENTS: &str = "assignments";
    pub const DEBIT_NOTES: &str = "debit-notes";
    pub const CREDIT_NOTES: &str = "credit-notes";
    pub const CITIES: &str = "cities";

    pub const HOLDERS_PREFIX: &str = "holders:";
    pub const EMPLOYEES_PREFIX: &str = "employees:";
    pub const PAYMENTS_CASH_PREFIX: &str = "payments-cash:";
    pub const PAYMENTS_BANK_PREFIX: &str = "payments-bank:";

    pub fn holders_for(city_code: &str) -> String {
        format!("{HOLDERS_PREFIX}{city_code}")
    }

    pub fn employees_for(city_code: &str) -> String {
        format!("{EMPLOYEES_PREFIX}{city_code}")
    }

    pub fn payments_cash_for(city_code: &str) -> String {
        format!("{PAYMENTS_CASH_PREFIX}{city_code}")
    }

    pub fn payments_bank_for(city_code: &str) -> String {
        format!("{PAYMENTS_BANK_PREFIX}{city_code}")
    }

    /// The city code carried by a scoped collection name, if `name` uses
    /// the given prefix.
    pub fn city_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
        name.strip_prefix(prefix)
    }
}
