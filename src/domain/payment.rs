use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::{serde_cents, Cents};

/// Where a payment was taken. Not part of the document body; assigned from
/// the collection the record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentSource {
    #[default]
    #[serde(rename = "cash-register")]
    CashRegister,
    #[serde(rename = "bank")]
    Bank,
}

impl PaymentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSource::CashRegister => "cash-register",
            PaymentSource::Bank => "bank",
        }
    }

    /// Heading used when a report groups payments by source.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentSource::CashRegister => "Cash register",
            PaymentSource::Bank => "Bank",
        }
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a payment. Anything other than `Active` is excluded
/// from report totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Active,
    Reversed,
    Inactive,
}

/// One installment's portion of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentShare {
    pub installment: u32,
    #[serde(with = "serde_cents")]
    pub amount_paid: Cents,
}

/// The installment field as found in legacy payment documents. Three wire
/// shapes survive: an explicit per-installment breakdown, a single number,
/// and a comma-separated list ("3,4,5"); an absent field is the fourth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstallmentSpec {
    Breakdown(Vec<InstallmentShare>),
    Number(u32),
    List(String),
}

/// A payment against an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub invoice_number: String,
    #[serde(with = "serde_cents")]
    pub amount: Cents,
    pub date: NaiveDate,
    #[serde(default)]
    pub installment_spec: Option<InstallmentSpec>,
    #[serde(default)]
    pub receipt_letter: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(skip)]
    pub source: PaymentSource,
}

impl Payment {
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Active
    }

    /// Receipt reference as printed on reports: letter and number joined
    /// with a dash, either side optional.
    pub fn receipt(&self) -> String {
        match (self.receipt_letter.as_deref(), self.receipt_number.as_deref()) {
            (Some(letter), Some(number)) => format!("{}-{}", letter, number),
            (Some(letter), None) => letter.to_string(),
            (None, Some(number)) => number.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Normalize the installment field into explicit per-installment shares.
    ///
    /// - absent field: the whole amount goes to installment 1
    /// - single number: the whole amount goes to that installment
    /// - comma list: the amount splits evenly in integer cents, with the
    ///   remainder cents landing on the first listed installment so the
    ///   shares always sum back to the recorded amount
    /// - explicit breakdown: taken as recorded
    pub fn shares(&self) -> Vec<InstallmentShare> {
        match &self.installment_spec {
            None => vec![InstallmentShare {
                installment: 1,
                amount_paid: self.amount,
            }],
            Some(InstallmentSpec::Number(n)) => vec![InstallmentShare {
                installment: *n,
                amount_paid: self.amount,
            }],
            Some(InstallmentSpec::Breakdown(shares)) => shares.clone(),
            Some(InstallmentSpec::List(text)) => {
                let numbers: Vec<u32> = text
                    .split(',')
                    .filter_map(|token| token.trim().parse().ok())
                    .collect();
                if numbers.is_empty() {
                    return vec![InstallmentShare {
                        installment: 1,
                        amount_paid: self.amount,
                    }];
                }
                let count = numbers.len() as i64;
                let each = self.amount / count;
                let remainder = self.amount % count;
                numbers
                    .iter()
                    .enumerate()
                    .map(|(i, &installment)| InstallmentShare {
                        installment,
                        amount_paid: if i == 0 { each + remainder } else { each },
                    })
                    .collect()
            }
        }
    }

    /// Cents by which an explicit breakdown disagrees with the recorded
    /// amount. Zero for the other shapes, which sum exactly by construction.
    pub fn breakdown_gap(&self) -> Cents {
        match &self.installment_spec {
            Some(InstallmentSpec::Breakdown(shares)) => {
                let sum: Cents = shares.iter().map(|s| s.amount_paid).sum();
                self.amount - sum
            }
            _ => 0,
        }
    }
}
