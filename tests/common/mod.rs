// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use cobranza::storage::DocumentStore;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Helper to create a test store with a temporary database
pub async fn test_store() -> Result<(DocumentStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = DocumentStore::init(db_path.to_str().unwrap()).await?;
    Ok((store, temp_dir))
}

/// Helper to parse a date string
pub fn date(date_str: &str) -> NaiveDate {
    date_str.parse().unwrap()
}

/// Store one JSON document under a collection
pub async fn put_json(
    store: &DocumentStore,
    collection: &str,
    key: &str,
    value: Value,
) -> Result<()> {
    store.put(collection, key, &value.to_string()).await?;
    Ok(())
}

/// Test fixture: a small two-city book with the identifier padding found in
/// real dumps ("000123" vs "123", executive "007" vs employee "7"). Amounts
/// are wire units; a plan totalValue of "1200.00" is 120_000 cents.
pub struct NorteBook;

impl NorteBook {
    /// Cities and plans shared by every scenario
    pub async fn seed_catalog(store: &DocumentStore) -> Result<()> {
        put_json(
            store,
            "cities",
            "051",
            json!({"code": "051", "name": "Norte"}),
        )
        .await?;
        put_json(
            store,
            "cities",
            "052",
            json!({"code": "052", "name": "Centro"}),
        )
        .await?;
        put_json(
            store,
            "plans",
            "P12",
            json!({
                "code": "P12",
                "name": "Oro 12",
                "installmentCount": 12,
                "installmentAmount": "100.00",
                "totalValue": "1200.00"
            }),
        )
        .await?;
        Ok(())
    }

    /// Holders, contracts and invoices for Norte (city 051).
    ///
    /// Invoice 1001 prices through plan P12 (120_000 cents) and belongs to
    /// executive 007; invoice 1002 carries its own total (45_000 cents), an
    /// embedded plan snapshot and no executive.
    pub async fn seed_invoices(store: &DocumentStore) -> Result<()> {
        put_json(
            store,
            "holders:051",
            "000123",
            json!({
                "id": "000123",
                "firstName1": "Maria",
                "lastName1": "Rojas",
                "cityCode": "051"
            }),
        )
        .await?;
        put_json(
            store,
            "holders:051",
            "124",
            json!({
                "id": "124",
                "firstName1": "Jorge",
                "firstName2": "Luis",
                "lastName1": "Alvarez",
                "lastName2": "Paz",
                "cityCode": "051"
            }),
        )
        .await?;

        put_json(
            store,
            "contracts",
            "C-100",
            json!({
                "contractNumber": "C-100",
                "holderId": "123",
                "planCode": "P12",
                "executiveId": "007",
                "cityCode": "051"
            }),
        )
        .await?;
        put_json(
            store,
            "contracts",
            "C-200",
            json!({
                "contractNumber": "C-200",
                "holderId": "124",
                "planData": {
                    "code": "X6",
                    "name": "Plata 6",
                    "installmentCount": 6,
                    "totalValue": "600.00"
                },
                "cityCode": "051"
            }),
        )
        .await?;

        put_json(
            store,
            "invoices",
            "1001",
            json!({
                "invoiceNumber": "1001",
                "contractNumber": "C-100",
                "cityCode": "051",
                "date": "2026-03-05",
                "executiveId": "007"
            }),
        )
        .await?;
        put_json(
            store,
            "invoices",
            "1002",
            json!({
                "invoiceNumber": "1002",
                "contractNumber": "C-200",
                "cityCode": "051",
                "date": "2026-03-10",
                "totalValue": "450.00"
            }),
        )
        .await?;
        Ok(())
    }

    /// City rosters: an account executive and a sales advisor in Norte, a
    /// technician in Centro.
    pub async fn seed_employees(store: &DocumentStore) -> Result<()> {
        put_json(
            store,
            "employees:051",
            "7",
            json!({
                "id": "7",
                "cityCode": "051",
                "firstName1": "Carlos",
                "lastName1": "Mendez",
                "role": "EC",
                "area": "administrative"
            }),
        )
        .await?;
        put_json(
            store,
            "employees:051",
            "8",
            json!({
                "id": "8",
                "cityCode": "051",
                "firstName1": "Lucia",
                "lastName1": "Guzman",
                "role": "AS",
                "area": "pyf"
            }),
        )
        .await?;
        put_json(
            store,
            "employees:052",
            "9",
            json!({
                "id": "9",
                "cityCode": "052",
                "firstName1": "Pedro",
                "lastName1": "Ibarra",
                "role": "TEC",
                "area": "service"
            }),
        )
        .await?;
        Ok(())
    }

    /// Payments for March 2026: 10_000 cents cash on installment 1 of
    /// invoice 1001 (padded reference), 20_000 cents by bank split across
    /// installments 2 and 3, a reversed payment that must never count, and
    /// 5_000 cents cash on invoice 1002.
    pub async fn seed_payments(store: &DocumentStore) -> Result<()> {
        put_json(
            store,
            "payments-cash:051",
            "000000",
            json!({
                "invoiceNumber": "0001001",
                "amount": 100,
                "date": "2026-03-06",
                "receiptLetter": "A",
                "receiptNumber": "501"
            }),
        )
        .await?;
        put_json(
            store,
            "payments-cash:051",
            "000001",
            json!({
                "invoiceNumber": "1001",
                "amount": 999,
                "date": "2026-03-21",
                "status": "reversed"
            }),
        )
        .await?;
        put_json(
            store,
            "payments-cash:051",
            "000002",
            json!({
                "invoiceNumber": "1002",
                "amount": 50,
                "date": "2026-03-15"
            }),
        )
        .await?;
        put_json(
            store,
            "payments-bank:051",
            "000000",
            json!({
                "invoiceNumber": "1001",
                "amount": 200,
                "date": "2026-03-20",
                "installmentSpec": "2,3",
                "receiptNumber": "777"
            }),
        )
        .await?;
        Ok(())
    }

    /// The whole book
    pub async fn seed_all(store: &DocumentStore) -> Result<()> {
        Self::seed_catalog(store).await?;
        Self::seed_invoices(store).await?;
        Self::seed_employees(store).await?;
        Self::seed_payments(store).await?;
        Ok(())
    }
}
