use std::collections::{BTreeSet, HashMap};

use chrono::Utc;

use super::dataset::Dataset;
use super::error::ReportError;
use super::query::{GroupBy, GroupOrder, ReportQuery, ReportType};
use super::result::{Cell, ReportGroup, ReportResult, ReportRow, Warning};
use crate::domain::{canonical, identifiers_match, reconcile, Assignment, Cents, ScheduleIssue};
use crate::storage::DocumentStore;

const INVOICE_REGISTER_COLUMNS: &[&str] = &["Invoice", "Date", "Holder", "Plan", "City", "Total"];
const NOTE_REGISTER_COLUMNS: &[&str] = &["Note", "Date", "Invoice", "Concept", "Value"];
const COLLECTIONS_CITY_COLUMNS: &[&str] =
    &["Date", "Receipt", "Invoice", "Holder", "Source", "Amount"];
const COLLECTIONS_EXEC_COLUMNS: &[&str] = &["Date", "Receipt", "Invoice", "City", "Amount"];
const STATEMENT_COLUMNS: &[&str] = &["Installment", "Paid", "Date", "Balance"];
const PAYROLL_COLUMNS: &[&str] = &["Employee", "Name", "Role", "City", "Collected"];
const VOUCHER_COLUMNS: &[&str] = &["Invoice", "Holder", "Assigned", "Collected"];

/// Run a report end to end: validate the query, load its dataset, assemble.
pub async fn assemble(
    store: &DocumentStore,
    query: &ReportQuery,
) -> Result<ReportResult, ReportError> {
    query.validate()?;
    let data = Dataset::load(store, query).await?;
    assemble_from(&data, query)
}

/// Assemble a report from an already loaded dataset. Synchronous: all I/O
/// happened in the load pass, so the same dataset and query always produce
/// the same rows, totals and warnings.
pub fn assemble_from(data: &Dataset, query: &ReportQuery) -> Result<ReportResult, ReportError> {
    query.validate()?;
    Ok(Assembler::new(data, query).run())
}

enum NoteKind {
    Debit,
    Credit,
}

/// A row plus the group it belongs to.
struct Keyed {
    key: String,
    label: String,
    row: ReportRow,
}

struct Assembler<'a> {
    data: &'a Dataset,
    query: &'a ReportQuery,
    warnings: Vec<Warning>,
}

impl<'a> Assembler<'a> {
    fn new(data: &'a Dataset, query: &'a ReportQuery) -> Self {
        Self {
            data,
            query,
            warnings: Vec::new(),
        }
    }

    fn run(mut self) -> ReportResult {
        let (columns, keyed) = match self.query.report_type {
            ReportType::InvoiceRegister => (INVOICE_REGISTER_COLUMNS, self.invoice_register()),
            ReportType::DebitNoteRegister => {
                (NOTE_REGISTER_COLUMNS, self.note_register(NoteKind::Debit))
            }
            ReportType::CreditNoteRegister => {
                (NOTE_REGISTER_COLUMNS, self.note_register(NoteKind::Credit))
            }
            ReportType::CollectionsByCity => {
                (COLLECTIONS_CITY_COLUMNS, self.collections_by_city())
            }
            ReportType::CollectionsByExecutive => {
                (COLLECTIONS_EXEC_COLUMNS, self.collections_by_executive())
            }
            ReportType::AccountStatement => (STATEMENT_COLUMNS, self.account_statement()),
            ReportType::PayrollSummary => (PAYROLL_COLUMNS, self.payroll_summary()),
            ReportType::CommissionVoucher => (VOUCHER_COLUMNS, self.commission_voucher()),
        };

        let title = self.title();
        let groups = group_rows(keyed, self.query.grouping().order);
        let grand_total_cents = groups.iter().map(|g| g.subtotal_cents).sum();
        let period = match (self.query.date_from, self.query.date_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        };

        ReportResult {
            report: self.query.report_type.name(),
            title,
            columns: columns.to_vec(),
            period,
            groups,
            grand_total_cents,
            warnings: self.warnings,
            generated_at: Utc::now(),
        }
    }

    // ========================
    // Report builders
    // ========================

    fn invoice_register(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let mut rows = Vec::new();

        for invoice in &data.invoices {
            if !query.in_range(invoice.date) || !self.city_matches(&invoice.city_code) {
                continue;
            }

            let contract = data.contract(&invoice.contract_number);
            if contract.is_none() {
                self.warn(Warning::Resolution {
                    entity: "contract",
                    key: invoice.contract_number.clone(),
                    invoice: Some(invoice.invoice_number.clone()),
                });
            }
            let plan = contract.and_then(|c| data.plan_for(c));
            let holder = contract.and_then(|c| data.holder(&c.holder_id, &c.city_code));
            if let Some(contract) = contract {
                if holder.is_none() {
                    self.warn(Warning::Resolution {
                        entity: "holder",
                        key: contract.holder_id.clone(),
                        invoice: Some(invoice.invoice_number.clone()),
                    });
                }
            }

            // Value comes from the invoice itself, then the plan. Without
            // either the row has no value and is skipped.
            let Some(value) = invoice.total_value.or_else(|| plan.map(|p| p.total_value)) else {
                if let Some(contract) = contract {
                    let key = contract
                        .plan_code
                        .clone()
                        .unwrap_or_else(|| contract.contract_number.clone());
                    self.warn(Warning::Resolution {
                        entity: "plan",
                        key,
                        invoice: Some(invoice.invoice_number.clone()),
                    });
                }
                continue;
            };

            let holder_name = holder.map(|h| h.display_name());
            let (key, label) = match query.grouping().key {
                GroupBy::Executive => {
                    let executive = invoice
                        .executive_id
                        .as_deref()
                        .or_else(|| contract.and_then(|c| c.executive_id.as_deref()));
                    match executive {
                        Some(id) => (canonical(id).to_string(), self.executive_label(id)),
                        None => ("unassigned".to_string(), "Unassigned".to_string()),
                    }
                }
                GroupBy::Holder => match contract {
                    Some(contract) => (
                        canonical(&contract.holder_id).to_string(),
                        holder_name
                            .clone()
                            .unwrap_or_else(|| format!("Holder {}", canonical(&contract.holder_id))),
                    ),
                    None => ("unknown".to_string(), "Unknown holder".to_string()),
                },
                _ => (
                    canonical(&invoice.city_code).to_string(),
                    data.city_label(&invoice.city_code),
                ),
            };

            rows.push(Keyed {
                key,
                label,
                row: ReportRow {
                    cells: vec![
                        Cell::text(invoice.invoice_number.clone()),
                        Cell::Date(invoice.date),
                        Cell::opt_text(holder_name),
                        Cell::opt_text(plan.map(|p| p.name.clone())),
                        Cell::text(data.city_label(&invoice.city_code)),
                        Cell::Money(value),
                    ],
                    value_cents: value,
                },
            });
        }
        rows
    }

    fn note_register(&mut self, kind: NoteKind) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let notes = match kind {
            NoteKind::Debit => &data.debit_notes,
            NoteKind::Credit => &data.credit_notes,
        };

        notes
            .iter()
            .filter(|note| query.in_range(note.date) && self.city_matches(&note.city_code))
            .map(|note| Keyed {
                key: canonical(&note.city_code).to_string(),
                label: data.city_label(&note.city_code),
                row: ReportRow {
                    cells: vec![
                        Cell::text(note.note_number.clone()),
                        Cell::Date(note.date),
                        Cell::opt_text(note.invoice_number.clone()),
                        Cell::opt_text(note.concept.clone()),
                        Cell::Money(note.value),
                    ],
                    value_cents: note.value,
                },
            })
            .collect()
    }

    fn collections_by_city(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let mut rows = Vec::new();

        // The load pass already restricted payments to the queried city.
        for payment in &data.payments {
            if !payment.is_active() || !query.in_range(payment.date) {
                continue;
            }

            let invoice = data.invoice(&payment.invoice_number);
            if invoice.is_none() {
                self.warn(Warning::Resolution {
                    entity: "invoice",
                    key: payment.invoice_number.clone(),
                    invoice: None,
                });
            }
            let contract = invoice.and_then(|i| data.contract(&i.contract_number));
            let holder = contract.and_then(|c| data.holder(&c.holder_id, &c.city_code));
            let holder_name = holder.map(|h| h.display_name());
            let executive = invoice
                .and_then(|i| i.executive_id.as_deref())
                .or_else(|| contract.and_then(|c| c.executive_id.as_deref()));

            let (key, label) = match query.grouping().key {
                GroupBy::Holder => match contract {
                    Some(contract) => (
                        canonical(&contract.holder_id).to_string(),
                        holder_name
                            .clone()
                            .unwrap_or_else(|| format!("Holder {}", canonical(&contract.holder_id))),
                    ),
                    None => ("unknown".to_string(), "Unknown holder".to_string()),
                },
                _ => match executive {
                    Some(id) => (canonical(id).to_string(), self.executive_label(id)),
                    None => ("unassigned".to_string(), "Unassigned".to_string()),
                },
            };

            let invoice_display = invoice
                .map(|i| i.invoice_number.clone())
                .unwrap_or_else(|| payment.invoice_number.clone());
            rows.push(Keyed {
                key,
                label,
                row: ReportRow {
                    cells: vec![
                        Cell::Date(payment.date),
                        Cell::text(payment.receipt()),
                        Cell::text(invoice_display),
                        Cell::opt_text(holder_name),
                        Cell::text(payment.source.label()),
                        Cell::Money(payment.amount),
                    ],
                    value_cents: payment.amount,
                },
            });
        }
        rows
    }

    fn collections_by_executive(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let target = query.executive_id.as_deref().unwrap_or_default();
        let mut rows = Vec::new();

        for payment in &data.payments {
            if !payment.is_active() || !query.in_range(payment.date) {
                continue;
            }

            // A payment only counts for this executive through its invoice;
            // without the invoice it cannot be attributed at all.
            let Some(invoice) = data.invoice(&payment.invoice_number) else {
                self.warn(Warning::Resolution {
                    entity: "invoice",
                    key: payment.invoice_number.clone(),
                    invoice: None,
                });
                continue;
            };
            let contract = data.contract(&invoice.contract_number);
            let executive = invoice
                .executive_id
                .as_deref()
                .or_else(|| contract.and_then(|c| c.executive_id.as_deref()));
            if !executive.is_some_and(|id| identifiers_match(id, target)) {
                continue;
            }

            let (key, label) = match query.grouping().key {
                GroupBy::Invoice => (
                    canonical(&invoice.invoice_number).to_string(),
                    invoice.invoice_number.clone(),
                ),
                _ => (
                    payment.source.as_str().to_string(),
                    payment.source.label().to_string(),
                ),
            };

            rows.push(Keyed {
                key,
                label,
                row: ReportRow {
                    cells: vec![
                        Cell::Date(payment.date),
                        Cell::text(payment.receipt()),
                        Cell::text(invoice.invoice_number.clone()),
                        Cell::text(data.city_label(&invoice.city_code)),
                        Cell::Money(payment.amount),
                    ],
                    value_cents: payment.amount,
                },
            });
        }
        rows
    }

    fn account_statement(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let mut rows = Vec::new();

        for invoice in &data.invoices {
            if !self.city_matches(&invoice.city_code) {
                continue;
            }
            if let Some(filter) = &query.invoice_number {
                if !identifiers_match(&invoice.invoice_number, filter) {
                    continue;
                }
            }

            let contract = data.contract(&invoice.contract_number);
            if contract.is_none() {
                self.warn(Warning::Resolution {
                    entity: "contract",
                    key: invoice.contract_number.clone(),
                    invoice: Some(invoice.invoice_number.clone()),
                });
            }
            let plan = contract.and_then(|c| data.plan_for(c));

            // Statements reconcile against the plan total; an invoice total
            // stands in when the plan cannot be resolved.
            let Some(total) = plan.map(|p| p.total_value).or(invoice.total_value) else {
                if let Some(contract) = contract {
                    let key = contract
                        .plan_code
                        .clone()
                        .unwrap_or_else(|| contract.contract_number.clone());
                    self.warn(Warning::Resolution {
                        entity: "plan",
                        key,
                        invoice: Some(invoice.invoice_number.clone()),
                    });
                }
                continue;
            };

            let holder = contract.and_then(|c| data.holder(&c.holder_id, &c.city_code));
            if let Some(contract) = contract {
                if holder.is_none() {
                    self.warn(Warning::Resolution {
                        entity: "holder",
                        key: contract.holder_id.clone(),
                        invoice: Some(invoice.invoice_number.clone()),
                    });
                }
            }

            let payments: Vec<_> = data
                .active_payments_for(&invoice.invoice_number)
                .into_iter()
                .filter(|p| query.in_range(p.date))
                .collect();
            let schedule = reconcile(total, plan.map(|p| p.installment_count), &payments);
            self.schedule_warnings(&invoice.invoice_number, &schedule.issues);

            let key = canonical(&invoice.invoice_number).to_string();
            let label = match holder {
                Some(holder) => {
                    format!("{} / {}", invoice.invoice_number, holder.display_name())
                }
                None => invoice.invoice_number.clone(),
            };

            for row in schedule.rows {
                rows.push(Keyed {
                    key: key.clone(),
                    label: label.clone(),
                    row: ReportRow {
                        cells: vec![
                            Cell::Count(row.installment as i64),
                            Cell::Money(row.amount_paid),
                            Cell::opt_date(row.payment_date),
                            Cell::Money(row.balance),
                        ],
                        value_cents: row.amount_paid,
                    },
                });
            }
        }
        rows
    }

    fn payroll_summary(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let city = query.city_code.as_deref().unwrap_or_default();

        data.employees_in(city)
            .iter()
            .map(|employee| {
                let collected = self.collected_for(&employee.id);
                Keyed {
                    key: employee.area.as_str().to_string(),
                    label: employee.area.label().to_string(),
                    row: ReportRow {
                        cells: vec![
                            Cell::text(employee.id.clone()),
                            Cell::text(employee.display_name()),
                            Cell::text(employee.role_title().to_string()),
                            Cell::text(data.city_label(&employee.city_code)),
                            Cell::Money(collected),
                        ],
                        value_cents: collected,
                    },
                }
            })
            .collect()
    }

    fn commission_voucher(&mut self) -> Vec<Keyed> {
        let data = self.data;
        let query = self.query;
        let target = query.executive_id.as_deref().unwrap_or_default();
        let mut rows = Vec::new();

        for assignment in &data.assignments {
            if !identifiers_match(&assignment.executive_id, target) {
                continue;
            }
            if !self.overlaps_range(assignment) {
                continue;
            }

            let period = assignment.period_label();
            for account in &assignment.accounts {
                let invoice = data.invoice(&account.invoice_number);
                if invoice.is_none() {
                    self.warn(Warning::Resolution {
                        entity: "invoice",
                        key: account.invoice_number.clone(),
                        invoice: None,
                    });
                }
                let holder = invoice
                    .and_then(|i| data.contract(&i.contract_number))
                    .and_then(|c| data.holder(&c.holder_id, &c.city_code));
                let collected = self.collected_on(&account.invoice_number);

                let invoice_display = invoice
                    .map(|i| i.invoice_number.clone())
                    .unwrap_or_else(|| account.invoice_number.clone());
                rows.push(Keyed {
                    key: period.clone(),
                    label: period.clone(),
                    row: ReportRow {
                        cells: vec![
                            Cell::text(invoice_display),
                            Cell::opt_text(holder.map(|h| h.display_name())),
                            Cell::Money(account.value),
                            Cell::Money(collected),
                        ],
                        value_cents: collected,
                    },
                });
            }
        }
        rows
    }

    // ========================
    // Shared lookups
    // ========================

    fn title(&mut self) -> String {
        let base = self.query.report_type.title();
        match self.query.report_type {
            ReportType::CollectionsByCity
            | ReportType::AccountStatement
            | ReportType::PayrollSummary => match self.query.city_code.clone() {
                Some(code) => format!("{}: {}", base, self.data.city_label(&code)),
                None => base.to_string(),
            },
            ReportType::CommissionVoucher => match self.query.executive_id.clone() {
                Some(id) => format!("{}: {}", base, self.executive_label(&id)),
                None => base.to_string(),
            },
            ReportType::CollectionsByExecutive => match self.query.executive_id.clone() {
                Some(id) if self.query.city_code.is_some() => {
                    format!("{}: {}", base, self.executive_label(&id))
                }
                Some(id) => format!("{}: Executive {}", base, canonical(&id)),
                None => base.to_string(),
            },
            _ => base.to_string(),
        }
    }

    fn city_matches(&self, city_code: &str) -> bool {
        match &self.query.city_code {
            Some(filter) => identifiers_match(city_code, filter),
            None => true,
        }
    }

    /// Group label for an executive id. The lookup stays city-scoped when
    /// the query names a city; vouchers and cityless queries scan every
    /// loaded roster. Unresolved executives keep their id as the label.
    fn executive_label(&mut self, id: &str) -> String {
        let all_cities = self.query.report_type == ReportType::CommissionVoucher
            || self.query.city_code.is_none();
        let city = self.query.city_code.as_deref().unwrap_or_default();
        match self.data.employee(id, city, all_cities) {
            Some(employee) => employee.display_name(),
            None => {
                self.warn(Warning::Resolution {
                    entity: "employee",
                    key: id.to_string(),
                    invoice: None,
                });
                format!("Executive {}", canonical(id))
            }
        }
    }

    fn overlaps_range(&self, assignment: &Assignment) -> bool {
        match (self.query.date_from, self.query.date_to) {
            (Some(from), Some(to)) => assignment.overlaps(from, to),
            _ => true,
        }
    }

    /// Payments collected in the query range across every account assigned
    /// to an executive. Accounts repeated across assignments count once.
    fn collected_for(&self, executive_id: &str) -> Cents {
        let mut accounts: BTreeSet<String> = BTreeSet::new();
        for assignment in &self.data.assignments {
            if !identifiers_match(&assignment.executive_id, executive_id) {
                continue;
            }
            if !self.overlaps_range(assignment) {
                continue;
            }
            for account in &assignment.accounts {
                accounts.insert(canonical(&account.invoice_number).to_string());
            }
        }
        accounts
            .iter()
            .map(|invoice_number| self.collected_on(invoice_number))
            .sum()
    }

    /// Payments collected against one invoice in the query range.
    fn collected_on(&self, invoice_number: &str) -> Cents {
        self.data
            .active_payments_for(invoice_number)
            .iter()
            .filter(|p| self.query.in_range(p.date))
            .map(|p| p.amount)
            .sum()
    }

    fn schedule_warnings(&mut self, invoice_number: &str, issues: &[ScheduleIssue]) {
        for issue in issues {
            let warning = match issue {
                ScheduleIssue::OutOfRange { installment, limit } => {
                    Warning::InstallmentOutOfRange {
                        invoice: invoice_number.to_string(),
                        installment: *installment,
                        limit: *limit,
                    }
                }
                ScheduleIssue::BreakdownMismatch { recorded, shares } => {
                    Warning::BreakdownMismatch {
                        invoice: invoice_number.to_string(),
                        recorded_cents: *recorded,
                        share_cents: *shares,
                    }
                }
            };
            self.warn(warning);
        }
    }

    /// Record a warning once; repeated findings collapse.
    fn warn(&mut self, warning: Warning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// Fold keyed rows into groups, preserving either first-seen order or
/// sorting by key. Subtotals accumulate exactly, in cents.
fn group_rows(keyed: Vec<Keyed>, order: GroupOrder) -> Vec<ReportGroup> {
    let mut groups: Vec<ReportGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in keyed {
        let slot = match index.get(&item.key) {
            Some(&slot) => slot,
            None => {
                index.insert(item.key.clone(), groups.len());
                groups.push(ReportGroup {
                    key: item.key,
                    label: item.label,
                    rows: Vec::new(),
                    subtotal_cents: 0,
                });
                groups.len() - 1
            }
        };
        groups[slot].subtotal_cents += item.row.value_cents;
        groups[slot].rows.push(item.row);
    }

    if order == GroupOrder::Sorted {
        groups.sort_by(|a, b| a.key.cmp(&b.key));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contract, Holder, Invoice, Plan};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn invoice(number: &str, contract: &str, city: &str, day: &str) -> Invoice {
        Invoice {
            invoice_number: number.to_string(),
            contract_number: contract.to_string(),
            city_code: city.to_string(),
            date: date(day),
            first_payment_date: None,
            total_value: None,
            executive_id: None,
        }
    }

    fn dataset() -> Dataset {
        let mut data = Dataset::default();
        data.plans = vec![Plan {
            code: "P-12".to_string(),
            name: "Plan Oro".to_string(),
            installment_count: 12,
            installment_amount: Some(10_000),
            initial_payment: None,
            total_value: 120_000,
        }];
        data.contracts = vec![Contract {
            contract_number: "C-400".to_string(),
            holder_id: "H-100".to_string(),
            plan_code: Some("P-12".to_string()),
            plan_data: None,
            executive_id: Some("7".to_string()),
            city_code: "051".to_string(),
        }];
        data.holders = vec![Holder {
            id: "H-100".to_string(),
            first_name1: "Maria".to_string(),
            first_name2: None,
            last_name1: "Rojas".to_string(),
            last_name2: None,
            city_code: "051".to_string(),
        }];
        data.invoices = vec![
            invoice("000123", "C-400", "051", "2026-01-10"),
            invoice("000124", "C-999", "051", "2026-01-12"),
        ];
        data
    }

    #[test]
    fn test_invoice_register_prices_from_plan_and_skips_unpriceable() {
        let data = dataset();
        let query = ReportQuery::new(ReportType::InvoiceRegister)
            .with_range(date("2026-01-01"), date("2026-01-31"));
        let result = assemble_from(&data, &query).unwrap();

        // 000124 has no contract, hence no plan and no value
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.grand_total_cents, 120_000);
        assert!(result.warnings.contains(&Warning::Resolution {
            entity: "contract",
            key: "C-999".to_string(),
            invoice: Some("000124".to_string()),
        }));
    }

    #[test]
    fn test_invoice_register_groups_by_city_label() {
        let mut data = dataset();
        data.cities = vec![crate::domain::City {
            code: "051".to_string(),
            name: "Norte".to_string(),
        }];
        let query = ReportQuery::new(ReportType::InvoiceRegister)
            .with_range(date("2026-01-01"), date("2026-01-31"));
        let result = assemble_from(&data, &query).unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].key, "51");
        assert_eq!(result.groups[0].label, "Norte");
        assert_eq!(result.groups[0].subtotal_cents, 120_000);
    }

    #[test]
    fn test_invoice_register_explicit_total_beats_plan() {
        let mut data = dataset();
        data.invoices[0].total_value = Some(99_000);
        let query = ReportQuery::new(ReportType::InvoiceRegister)
            .with_range(date("2026-01-01"), date("2026-01-31"));
        let result = assemble_from(&data, &query).unwrap();
        assert_eq!(result.grand_total_cents, 99_000);
    }

    #[test]
    fn test_range_filter_excludes_everything() {
        let data = dataset();
        let query = ReportQuery::new(ReportType::InvoiceRegister)
            .with_range(date("2027-01-01"), date("2027-01-31"));
        let result = assemble_from(&data, &query).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.grand_total_cents, 0);
        assert_eq!(result.columns, INVOICE_REGISTER_COLUMNS.to_vec());
    }

    #[test]
    fn test_validation_errors_propagate() {
        let data = dataset();
        let query = ReportQuery::new(ReportType::CollectionsByCity)
            .with_range(date("2026-01-01"), date("2026-01-31"));
        assert!(matches!(
            assemble_from(&data, &query),
            Err(ReportError::MissingField { .. })
        ));
    }

    #[test]
    fn test_group_rows_first_seen_vs_sorted() {
        let keyed = |key: &str| Keyed {
            key: key.to_string(),
            label: key.to_uppercase(),
            row: ReportRow {
                cells: vec![],
                value_cents: 100,
            },
        };

        let first_seen = group_rows(
            vec![keyed("b"), keyed("a"), keyed("b")],
            GroupOrder::FirstSeen,
        );
        assert_eq!(first_seen.len(), 2);
        assert_eq!(first_seen[0].key, "b");
        assert_eq!(first_seen[0].subtotal_cents, 200);

        let sorted = group_rows(vec![keyed("b"), keyed("a"), keyed("b")], GroupOrder::Sorted);
        assert_eq!(sorted[0].key, "a");
        assert_eq!(sorted[1].key, "b");
    }
}
