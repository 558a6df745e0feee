use std::collections::BTreeMap;

use anyhow::Context;
use serde::de::DeserializeOwned;

use super::error::ReportError;
use super::query::{GroupBy, ReportQuery, ReportType};
use crate::domain::{
    identifiers_match, Assignment, City, Contract, Employee, Holder, Invoice, Note, Payment,
    PaymentSource, Plan,
};
use crate::storage::{collections, DocumentStore};

/// Which collection families one report run reads. Assembly is synchronous
/// once the dataset is in memory, so this is the complete I/O surface of a
/// report.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadPlan {
    pub invoices: bool,
    pub contracts: bool,
    pub plans: bool,
    pub holders: bool,
    pub employees: bool,
    pub employees_all_cities: bool,
    pub payments: bool,
    pub payments_all_cities: bool,
    pub assignments: bool,
    pub debit_notes: bool,
    pub credit_notes: bool,
    pub cities: bool,
}

impl LoadPlan {
    pub fn for_query(query: &ReportQuery) -> Self {
        let base = LoadPlan {
            cities: true,
            ..LoadPlan::default()
        };
        match query.report_type {
            ReportType::InvoiceRegister => LoadPlan {
                invoices: true,
                contracts: true,
                plans: true,
                holders: true,
                employees: query.grouping().key == GroupBy::Executive,
                ..base
            },
            ReportType::DebitNoteRegister => LoadPlan {
                debit_notes: true,
                ..base
            },
            ReportType::CreditNoteRegister => LoadPlan {
                credit_notes: true,
                ..base
            },
            ReportType::CollectionsByCity => LoadPlan {
                payments: true,
                invoices: true,
                contracts: true,
                holders: true,
                employees: true,
                ..base
            },
            ReportType::CollectionsByExecutive => LoadPlan {
                payments: true,
                payments_all_cities: true,
                invoices: true,
                contracts: true,
                holders: true,
                // Only useful for the heading, and only when a city narrows
                // the lookup
                employees: query.city_code.is_some(),
                ..base
            },
            ReportType::AccountStatement => LoadPlan {
                invoices: true,
                contracts: true,
                plans: true,
                holders: true,
                payments: true,
                ..base
            },
            ReportType::PayrollSummary => LoadPlan {
                employees: true,
                assignments: true,
                payments: true,
                payments_all_cities: true,
                ..base
            },
            // Voucher rows may reference invoices and people from any city,
            // so nothing here is city-scoped.
            ReportType::CommissionVoucher => LoadPlan {
                assignments: true,
                payments: true,
                payments_all_cities: true,
                invoices: true,
                contracts: true,
                holders: true,
                employees: true,
                employees_all_cities: true,
                ..base
            },
        }
    }
}

/// Everything a report run reads, loaded up front in one pass. Resolvers
/// below are the only lookup paths; all of them compare identifiers through
/// [`identifiers_match`].
#[derive(Debug, Default)]
pub struct Dataset {
    pub invoices: Vec<Invoice>,
    pub contracts: Vec<Contract>,
    pub plans: Vec<Plan>,
    pub holders: Vec<Holder>,
    pub holders_by_city: BTreeMap<String, Vec<Holder>>,
    pub employees_by_city: BTreeMap<String, Vec<Employee>>,
    pub payments: Vec<Payment>,
    pub assignments: Vec<Assignment>,
    pub debit_notes: Vec<Note>,
    pub credit_notes: Vec<Note>,
    pub cities: Vec<City>,
}

impl Dataset {
    /// Load the collections a query needs. City-scoped families load only
    /// the queried city unless the plan asks for all of them.
    pub async fn load(store: &DocumentStore, query: &ReportQuery) -> Result<Self, ReportError> {
        let plan = LoadPlan::for_query(query);
        let city = query.city_code.as_deref();
        let mut data = Dataset::default();

        if plan.invoices {
            data.invoices = read_collection(store, collections::INVOICES).await?;
        }
        if plan.contracts {
            data.contracts = read_collection(store, collections::CONTRACTS).await?;
        }
        if plan.plans {
            data.plans = read_collection(store, collections::PLANS).await?;
        }
        if plan.holders {
            data.holders = read_collection(store, collections::HOLDERS).await?;
            data.holders_by_city = read_scoped(store, collections::HOLDERS_PREFIX, None).await?;
        }
        if plan.employees {
            let scope = if plan.employees_all_cities { None } else { city };
            data.employees_by_city =
                read_scoped(store, collections::EMPLOYEES_PREFIX, scope).await?;
        }
        if plan.payments {
            let scope = if plan.payments_all_cities { None } else { city };
            let cash: BTreeMap<String, Vec<Payment>> =
                read_scoped(store, collections::PAYMENTS_CASH_PREFIX, scope).await?;
            let bank: BTreeMap<String, Vec<Payment>> =
                read_scoped(store, collections::PAYMENTS_BANK_PREFIX, scope).await?;
            for (source, batches) in [
                (PaymentSource::CashRegister, cash),
                (PaymentSource::Bank, bank),
            ] {
                for (_, mut batch) in batches {
                    for payment in &mut batch {
                        payment.source = source;
                    }
                    data.payments.append(&mut batch);
                }
            }
        }
        if plan.assignments {
            data.assignments = read_collection(store, collections::ASSIGNMENTS).await?;
        }
        if plan.debit_notes {
            data.debit_notes = read_collection(store, collections::DEBIT_NOTES).await?;
        }
        if plan.credit_notes {
            data.credit_notes = read_collection(store, collections::CREDIT_NOTES).await?;
        }
        if plan.cities {
            data.cities = read_collection(store, collections::CITIES).await?;
        }

        Ok(data)
    }

    // ========================
    // Resolvers
    // ========================

    pub fn invoice(&self, number: &str) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|i| identifiers_match(&i.invoice_number, number))
    }

    pub fn contract(&self, number: &str) -> Option<&Contract> {
        self.contracts
            .iter()
            .find(|c| identifiers_match(&c.contract_number, number))
    }

    /// Resolve a contract's plan: the embedded snapshot wins, then a lookup
    /// by plan code, then a fuzzy name match as last resort (old contracts
    /// sometimes recorded a name fragment where the code belongs).
    pub fn plan_for<'a>(&'a self, contract: &'a Contract) -> Option<&'a Plan> {
        if let Some(plan) = &contract.plan_data {
            return Some(plan);
        }
        let code = contract.plan_code.as_deref()?;
        self.plans
            .iter()
            .find(|p| identifiers_match(&p.code, code))
            .or_else(|| {
                let needle = code.trim().to_lowercase();
                if needle.is_empty() {
                    return None;
                }
                self.plans
                    .iter()
                    .find(|p| p.name.to_lowercase().contains(&needle))
            })
    }

    /// Resolve a holder: the city-scoped collection is authoritative, the
    /// flat collection is the fallback.
    pub fn holder(&self, id: &str, city_code: &str) -> Option<&Holder> {
        if let Some(list) = scoped(&self.holders_by_city, city_code) {
            if let Some(holder) = list.iter().find(|h| identifiers_match(&h.id, id)) {
                return Some(holder);
            }
        }
        self.holders.iter().find(|h| identifiers_match(&h.id, id))
    }

    /// Resolve an employee within a city: exact key first, then a
    /// normalized scan. `all_cities` widens the scan to every loaded city;
    /// only commission vouchers do that.
    pub fn employee(&self, id: &str, city_code: &str, all_cities: bool) -> Option<&Employee> {
        if let Some(list) = scoped(&self.employees_by_city, city_code) {
            if let Some(employee) = list.iter().find(|e| e.id == id) {
                return Some(employee);
            }
            if let Some(employee) = list.iter().find(|e| identifiers_match(&e.id, id)) {
                return Some(employee);
            }
        }
        if all_cities {
            return self
                .employees_by_city
                .values()
                .flatten()
                .find(|e| identifiers_match(&e.id, id));
        }
        None
    }

    /// The roster of one city, in document order. Missing city yields an
    /// empty roster.
    pub fn employees_in(&self, city_code: &str) -> &[Employee] {
        scoped(&self.employees_by_city, city_code)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Display name for a city code; falls back to the code itself when the
    /// city table has no entry.
    pub fn city_label(&self, code: &str) -> String {
        self.cities
            .iter()
            .find(|c| identifiers_match(&c.code, code))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("City {}", code.trim()))
    }

    /// Active payments recorded against an invoice, in load order.
    pub fn active_payments_for(&self, invoice_number: &str) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.is_active() && identifiers_match(&p.invoice_number, invoice_number))
            .collect()
    }
}

fn scoped<'a, T>(map: &'a BTreeMap<String, Vec<T>>, city_code: &str) -> Option<&'a Vec<T>> {
    map.get(city_code).or_else(|| {
        map.iter()
            .find(|(code, _)| identifiers_match(code, city_code))
            .map(|(_, list)| list)
    })
}

async fn read_collection<T: DeserializeOwned>(
    store: &DocumentStore,
    collection: &str,
) -> Result<Vec<T>, ReportError> {
    let documents = store.list(collection).await?;
    let mut records = Vec::with_capacity(documents.len());
    for document in documents {
        let record = serde_json::from_str(&document.body).with_context(|| {
            format!(
                "Corrupt document '{}' in collection '{}'",
                document.key, collection
            )
        })?;
        records.push(record);
    }
    Ok(records)
}

async fn read_scoped<T: DeserializeOwned>(
    store: &DocumentStore,
    prefix: &str,
    only_city: Option<&str>,
) -> Result<BTreeMap<String, Vec<T>>, ReportError> {
    let names: Vec<String> = store
        .collection_names(prefix)
        .await?
        .into_iter()
        .filter(|name| match only_city {
            Some(city) => collections::city_suffix(name, prefix)
                .is_some_and(|suffix| identifiers_match(suffix, city)),
            None => true,
        })
        .collect();

    let mut map = BTreeMap::new();
    for name in names {
        let Some(code) = collections::city_suffix(&name, prefix) else {
            continue;
        };
        let code = code.to_string();
        let records = read_collection(store, &name).await?;
        map.insert(code, records);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Area;

    fn plan(code: &str, name: &str) -> Plan {
        Plan {
            code: code.to_string(),
            name: name.to_string(),
            installment_count: 12,
            installment_amount: None,
            initial_payment: None,
            total_value: 120_000,
        }
    }

    fn contract(plan_code: Option<&str>, plan_data: Option<Plan>) -> Contract {
        Contract {
            contract_number: "C-400".to_string(),
            holder_id: "H-100".to_string(),
            plan_code: plan_code.map(String::from),
            plan_data,
            executive_id: None,
            city_code: "051".to_string(),
        }
    }

    fn holder(id: &str, first: &str) -> Holder {
        Holder {
            id: id.to_string(),
            first_name1: first.to_string(),
            first_name2: None,
            last_name1: "Rojas".to_string(),
            last_name2: None,
            city_code: "051".to_string(),
        }
    }

    fn employee(id: &str, city: &str) -> Employee {
        Employee {
            id: id.to_string(),
            city_code: city.to_string(),
            first_name1: "Carlos".to_string(),
            first_name2: None,
            last_name1: "Mendez".to_string(),
            last_name2: None,
            role: "EC".to_string(),
            area: Area::Administrative,
        }
    }

    #[test]
    fn test_plan_resolution_chain() {
        let mut data = Dataset::default();
        data.plans = vec![plan("P-12", "Plan Oro 12"), plan("P-24", "Plan Plata 24")];

        // Embedded snapshot wins even when a code is present
        let embedded = contract(Some("P-24"), Some(plan("OLD", "Plan Historico")));
        assert_eq!(data.plan_for(&embedded).unwrap().code, "OLD");

        // Lookup by code
        let by_code = contract(Some("P-24"), None);
        assert_eq!(data.plan_for(&by_code).unwrap().name, "Plan Plata 24");

        // Fuzzy name match as last resort
        let by_name = contract(Some("oro"), None);
        assert_eq!(data.plan_for(&by_name).unwrap().code, "P-12");

        // Nothing to go on
        assert!(data.plan_for(&contract(None, None)).is_none());
        assert!(data.plan_for(&contract(Some("inexistente"), None)).is_none());
    }

    #[test]
    fn test_holder_city_scope_wins_over_flat() {
        let mut data = Dataset::default();
        data.holders = vec![holder("H-100", "Flat")];
        data.holders_by_city
            .insert("051".to_string(), vec![holder("H-100", "Scoped")]);

        assert_eq!(data.holder("H-100", "051").unwrap().first_name1, "Scoped");
        // Unknown city falls back to the flat collection
        assert_eq!(data.holder("H-100", "099").unwrap().first_name1, "Flat");
    }

    #[test]
    fn test_employee_scan_stays_city_scoped_by_default() {
        let mut data = Dataset::default();
        data.employees_by_city
            .insert("051".to_string(), vec![employee("7", "051")]);
        data.employees_by_city
            .insert("052".to_string(), vec![employee("9", "052")]);

        // Padded id resolves through the normalized scan
        assert!(data.employee("007", "051", false).is_some());
        // Employee of another city is invisible without the wide scan
        assert!(data.employee("9", "051", false).is_none());
        assert!(data.employee("0009", "051", true).is_some());
    }

    #[test]
    fn test_city_label_fallback() {
        let mut data = Dataset::default();
        data.cities = vec![City {
            code: "051".to_string(),
            name: "Norte".to_string(),
        }];
        assert_eq!(data.city_label("51"), "Norte");
        assert_eq!(data.city_label("099"), "City 099");
    }

    #[test]
    fn test_active_payments_respect_status_and_padding() {
        use crate::domain::PaymentStatus;
        let mut data = Dataset::default();
        let mut active = Payment {
            invoice_number: "000123".to_string(),
            amount: 5_000,
            date: "2026-01-10".parse().unwrap(),
            installment_spec: None,
            receipt_letter: None,
            receipt_number: None,
            status: PaymentStatus::Active,
            source: PaymentSource::CashRegister,
        };
        let mut reversed = active.clone();
        reversed.status = PaymentStatus::Reversed;
        active.invoice_number = "123".to_string();
        data.payments = vec![active, reversed];

        let matched = data.active_payments_for("00123");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].invoice_number, "123");
    }
}
