use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;

use crate::domain::{Assignment, City, Contract, Employee, Holder, Invoice, Note, Payment, Plan};
use crate::storage::{collections, DocumentStore};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate and count without writing anything.
    pub dry_run: bool,
    /// Clear each collection before loading its documents.
    pub replace: bool,
}

#[derive(Debug, Clone)]
pub struct ImportError {
    pub collection: String,
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub collections: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Which document family a collection holds. City-scoped collections such as
/// "holders:051" share the family of their prefix.
enum Family {
    Invoices,
    Contracts,
    Plans,
    Holders,
    Employees,
    Payments,
    Assignments,
    Notes,
    Cities,
    Unknown,
}

pub struct Importer<'a> {
    store: &'a DocumentStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Import a storage snapshot: a single JSON object keyed by collection
    /// name, each value an array of documents. Documents of known families
    /// are validated before writing; ones that fail are skipped and
    /// reported, never aborting the run.
    pub async fn import_snapshot<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let snapshot: serde_json::Map<String, Value> =
            serde_json::from_reader(reader).context("Snapshot is not a JSON object")?;

        let mut result = ImportResult::default();

        for (collection, value) in &snapshot {
            let Some(documents) = value.as_array() else {
                result.errors.push(ImportError {
                    collection: collection.clone(),
                    index: 0,
                    error: "collection value is not an array".to_string(),
                });
                continue;
            };
            result.collections += 1;

            if options.replace && !options.dry_run {
                self.store.delete_collection(collection).await?;
            }

            for (index, document) in documents.iter().enumerate() {
                match prepare_document(collection, index, document) {
                    Ok((key, body)) => {
                        if !options.dry_run {
                            self.store.put(collection, &key, &body).await?;
                        }
                        result.imported += 1;
                    }
                    Err(error) => {
                        result.skipped += 1;
                        result.errors.push(ImportError {
                            collection: collection.clone(),
                            index,
                            error,
                        });
                    }
                }
            }
        }

        Ok(result)
    }
}

/// Validate a document against its collection's family and derive its
/// storage key. Documents without a natural key get a positional one.
fn prepare_document(
    collection: &str,
    index: usize,
    document: &Value,
) -> Result<(String, String), String> {
    if !document.is_object() {
        return Err("document is not a JSON object".to_string());
    }
    validate_shape(collection, document)?;

    let key = document_key(collection, document).unwrap_or_else(|| format!("{index:06}"));
    Ok((key, document.to_string()))
}

fn validate_shape(collection: &str, document: &Value) -> Result<(), String> {
    fn decode<T: DeserializeOwned>(document: &Value) -> Result<(), String> {
        serde_json::from_value::<T>(document.clone())
            .map(|_| ())
            .map_err(|error| error.to_string())
    }

    match family(collection) {
        Family::Invoices => decode::<Invoice>(document),
        Family::Contracts => decode::<Contract>(document),
        Family::Plans => decode::<Plan>(document),
        Family::Holders => decode::<Holder>(document),
        Family::Employees => decode::<Employee>(document),
        Family::Payments => decode::<Payment>(document),
        Family::Assignments => decode::<Assignment>(document),
        Family::Notes => decode::<Note>(document),
        Family::Cities => decode::<City>(document),
        // Unknown collections are carried over untouched.
        Family::Unknown => Ok(()),
    }
}

fn family(collection: &str) -> Family {
    match collection {
        collections::INVOICES => Family::Invoices,
        collections::CONTRACTS => Family::Contracts,
        collections::PLANS => Family::Plans,
        collections::HOLDERS => Family::Holders,
        collections::ASSIGNMENTS => Family::Assignments,
        collections::DEBIT_NOTES | collections::CREDIT_NOTES => Family::Notes,
        collections::CITIES => Family::Cities,
        name if name.starts_with(collections::HOLDERS_PREFIX) => Family::Holders,
        name if name.starts_with(collections::EMPLOYEES_PREFIX) => Family::Employees,
        name if name.starts_with(collections::PAYMENTS_CASH_PREFIX) => Family::Payments,
        name if name.starts_with(collections::PAYMENTS_BANK_PREFIX) => Family::Payments,
        _ => Family::Unknown,
    }
}

fn document_key(collection: &str, document: &Value) -> Option<String> {
    let field = match family(collection) {
        Family::Invoices => "invoiceNumber",
        Family::Contracts => "contractNumber",
        Family::Plans | Family::Cities => "code",
        Family::Holders | Family::Employees => "id",
        Family::Notes => "noteNumber",
        Family::Assignments => {
            let executive = document.get("executiveId")?.as_str()?;
            let year = document.get("year")?.as_i64()?;
            let month = document.get("month")?.as_i64()?;
            return Some(format!("{executive}-{year:04}-{month:02}"));
        }
        // Payments have no natural key in the wire format.
        Family::Payments | Family::Unknown => return None,
    };
    document.get(field).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_key_by_family() {
        let invoice = json!({"invoiceNumber": "INV-001"});
        assert_eq!(
            document_key(collections::INVOICES, &invoice),
            Some("INV-001".to_string())
        );

        let holder = json!({"id": "000123"});
        assert_eq!(
            document_key("holders:051", &holder),
            Some("000123".to_string())
        );

        let assignment = json!({"executiveId": "7", "year": 2024, "month": 3});
        assert_eq!(
            document_key(collections::ASSIGNMENTS, &assignment),
            Some("7-2024-03".to_string())
        );

        let payment = json!({"invoiceNumber": "INV-001"});
        assert_eq!(document_key("payments-cash:051", &payment), None);
    }

    #[test]
    fn test_prepare_document_rejects_bad_shapes() {
        let bad = json!({"code": "P1", "name": "Oro", "installmentCount": "twelve", "totalValue": "1200000"});
        assert!(prepare_document(collections::PLANS, 0, &bad).is_err());

        let not_object = json!("just a string");
        assert!(prepare_document(collections::PLANS, 0, &not_object).is_err());
    }

    #[test]
    fn test_prepare_document_positional_fallback() {
        let payment = json!({
            "invoiceNumber": "INV-001",
            "amount": "10000.00",
            "date": "2024-03-05"
        });
        let (key, _) = prepare_document("payments-bank:051", 4, &payment).unwrap();
        assert_eq!(key, "000004");
    }
}
