mod common;

use anyhow::Result;
use cobranza::application::{assemble, Cell, ReportQuery, ReportType, Warning};
use common::{date, put_json, test_store, NorteBook};
use serde_json::json;

#[tokio::test]
async fn test_statement_reconciles_installments() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;

    // The padded invoice filter still matches invoice 1001
    let query = ReportQuery::new(ReportType::AccountStatement)
        .with_city("051")
        .with_invoice("0001001");
    let result = assemble(&store, &query).await?;

    assert_eq!(result.title, "Account Statement: Norte");
    assert_eq!(result.columns, vec!["Installment", "Paid", "Date", "Balance"]);

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.label, "1001 / Rojas Maria");

    // 120_000 plan total; 10_000 went to installment 1, the bank payment
    // split over installments 2 and 3; the reversed payment never counts
    assert_eq!(group.rows.len(), 3);
    assert_eq!(
        group.rows[0].cells,
        vec![
            Cell::Count(1),
            Cell::Money(10_000),
            Cell::Date(date("2026-03-06")),
            Cell::Money(110_000),
        ]
    );
    assert_eq!(
        group.rows[1].cells,
        vec![
            Cell::Count(2),
            Cell::Money(10_000),
            Cell::Date(date("2026-03-20")),
            Cell::Money(100_000),
        ]
    );
    assert_eq!(
        group.rows[2].cells,
        vec![
            Cell::Count(3),
            Cell::Money(10_000),
            Cell::Date(date("2026-03-20")),
            Cell::Money(90_000),
        ]
    );

    assert_eq!(group.subtotal_cents, 30_000);
    assert_eq!(result.grand_total_cents, 30_000);
    assert!(result.warnings.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_statement_covers_every_invoice_without_filter() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;

    let query = ReportQuery::new(ReportType::AccountStatement).with_city("051");
    let result = assemble(&store, &query).await?;

    assert_eq!(result.groups.len(), 2);
    assert_eq!(result.groups[0].label, "1001 / Rojas Maria");
    // 1002 reconciles against its embedded plan (60_000 cents over 6)
    let second = &result.groups[1];
    assert_eq!(second.label, "1002 / Alvarez Paz Jorge Luis");
    assert_eq!(
        second.rows[0].cells,
        vec![
            Cell::Count(1),
            Cell::Money(5_000),
            Cell::Date(date("2026-03-15")),
            Cell::Money(55_000),
        ]
    );
    assert_eq!(result.grand_total_cents, 35_000);
    Ok(())
}

#[tokio::test]
async fn test_statement_range_narrows_activity() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;

    let query = ReportQuery::new(ReportType::AccountStatement)
        .with_city("051")
        .with_invoice("1001")
        .with_range(date("2026-03-01"), date("2026-03-10"));
    let result = assemble(&store, &query).await?;

    // Only the March 6th payment is inside the window
    let group = &result.groups[0];
    assert_eq!(group.rows.len(), 1);
    assert_eq!(group.rows[0].cells[0], Cell::Count(1));
    assert_eq!(group.rows[0].cells[3], Cell::Money(110_000));
    Ok(())
}

#[tokio::test]
async fn test_statement_synthetic_row_for_untouched_invoice() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;
    put_json(
        &store,
        "invoices",
        "1003",
        json!({
            "invoiceNumber": "1003",
            "contractNumber": "C-200",
            "cityCode": "051",
            "date": "2026-03-28"
        }),
    )
    .await?;

    let query = ReportQuery::new(ReportType::AccountStatement)
        .with_city("051")
        .with_invoice("1003");
    let result = assemble(&store, &query).await?;

    // No payments: one row showing the full balance outstanding
    assert_eq!(result.row_count(), 1);
    let group = &result.groups[0];
    assert_eq!(group.label, "1003 / Alvarez Paz Jorge Luis");
    assert_eq!(
        group.rows[0].cells,
        vec![Cell::Count(1), Cell::Money(0), Cell::Empty, Cell::Money(60_000)]
    );
    assert_eq!(group.subtotal_cents, 0);
    Ok(())
}

#[tokio::test]
async fn test_statement_flags_out_of_range_installment() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;
    put_json(
        &store,
        "payments-cash:051",
        "000010",
        json!({
            "invoiceNumber": "1001",
            "amount": 10,
            "date": "2026-03-25",
            "installmentSpec": 13
        }),
    )
    .await?;

    let query = ReportQuery::new(ReportType::AccountStatement)
        .with_city("051")
        .with_invoice("1001");
    let result = assemble(&store, &query).await?;

    // The row is flagged but still reduces the balance
    assert!(result.warnings.contains(&Warning::InstallmentOutOfRange {
        invoice: "1001".to_string(),
        installment: 13,
        limit: Some(12),
    }));
    let group = &result.groups[0];
    assert_eq!(group.rows.len(), 4);
    assert_eq!(
        group.rows[3].cells,
        vec![
            Cell::Count(13),
            Cell::Money(1_000),
            Cell::Date(date("2026-03-25")),
            Cell::Money(89_000),
        ]
    );
    assert_eq!(group.subtotal_cents, 31_000);
    Ok(())
}

#[tokio::test]
async fn test_statement_unknown_city_is_empty() -> Result<()> {
    let (store, _temp) = test_store().await?;
    NorteBook::seed_all(&store).await?;

    let query = ReportQuery::new(ReportType::AccountStatement).with_city("999");
    let result = assemble(&store, &query).await?;

    assert!(result.is_empty());
    assert!(result.warnings.is_empty());
    Ok(())
}
