use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::money::Cents;
use super::payment::Payment;

/// One reconciled installment: everything paid toward it, the latest date
/// any of it was paid, and the balance left on the plan after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentRow {
    pub installment: u32,
    pub amount_paid: Cents,
    pub payment_date: Option<NaiveDate>,
    pub balance: Cents,
}

/// Data-quality findings surfaced while reconciling. These never abort the
/// schedule; the affected rows stay, flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    /// An installment number outside the plan's declared range. `limit` is
    /// `None` when the plan's installment count is unknown.
    OutOfRange { installment: u32, limit: Option<u32> },
    /// A payment's explicit breakdown does not sum to its recorded amount.
    BreakdownMismatch { recorded: Cents, shares: Cents },
}

/// The reconciled payment schedule for one invoice.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub rows: Vec<InstallmentRow>,
    pub issues: Vec<ScheduleIssue>,
}

impl Schedule {
    /// Total paid across all installments.
    pub fn total_paid(&self) -> Cents {
        self.rows.iter().map(|r| r.amount_paid).sum()
    }
}

/// Reconcile an invoice's payments against its plan.
///
/// Payments are normalized into per-installment shares, grouped by
/// installment number and summed, then walked in ascending order against
/// `total` to produce a running balance. The balance is floored at zero so
/// overpayment never shows as a negative debt. Invoices with no payment
/// activity still produce a single zero row so statements always render.
pub fn reconcile(total: Cents, installment_count: Option<u32>, payments: &[&Payment]) -> Schedule {
    let mut issues = Vec::new();
    let mut grouped: BTreeMap<u32, (Cents, Option<NaiveDate>)> = BTreeMap::new();

    for payment in payments {
        let gap = payment.breakdown_gap();
        if gap != 0 {
            issues.push(ScheduleIssue::BreakdownMismatch {
                recorded: payment.amount,
                shares: payment.amount - gap,
            });
        }
        for share in payment.shares() {
            let entry = grouped.entry(share.installment).or_insert((0, None));
            entry.0 += share.amount_paid;
            entry.1 = entry.1.max(Some(payment.date));
        }
    }

    for &installment in grouped.keys() {
        let too_high = installment_count.is_some_and(|count| installment > count);
        if installment < 1 || too_high {
            issues.push(ScheduleIssue::OutOfRange {
                installment,
                limit: installment_count,
            });
        }
    }

    if grouped.is_empty() {
        return Schedule {
            rows: vec![InstallmentRow {
                installment: 1,
                amount_paid: 0,
                payment_date: None,
                balance: total,
            }],
            issues,
        };
    }

    let mut remaining = total;
    let rows = grouped
        .into_iter()
        .map(|(installment, (amount_paid, payment_date))| {
            remaining = (remaining - amount_paid).max(0);
            InstallmentRow {
                installment,
                amount_paid,
                payment_date,
                balance: remaining,
            }
        })
        .collect();

    Schedule { rows, issues }
}
