use serde::{Deserialize, Serialize};

use super::money::{serde_cents, serde_cents_opt, Cents};

/// A financing plan: total value split into a fixed number of monthly
/// installments after an optional initial payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub code: String,
    pub name: String,
    pub installment_count: u32,
    #[serde(default, with = "serde_cents_opt")]
    pub installment_amount: Option<Cents>,
    #[serde(default, with = "serde_cents_opt")]
    pub initial_payment: Option<Cents>,
    #[serde(with = "serde_cents")]
    pub total_value: Cents,
}

impl Plan {
    /// The per-installment amount. Older plan documents omit it; the amount
    /// is then derived from the financed value, rounded down to whole cents.
    pub fn monthly_amount(&self) -> Cents {
        match self.installment_amount {
            Some(amount) => amount,
            None => {
                if self.installment_count == 0 {
                    return 0;
                }
                let financed = (self.total_value - self.initial_payment.unwrap_or(0)).max(0);
                financed / self.installment_count as i64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(amount: Option<Cents>, initial: Option<Cents>, count: u32, total: Cents) -> Plan {
        Plan {
            code: "P-12".to_string(),
            name: "Plan Oro".to_string(),
            installment_count: count,
            installment_amount: amount,
            initial_payment: initial,
            total_value: total,
        }
    }

    #[test]
    fn test_monthly_amount_explicit() {
        assert_eq!(plan(Some(10_000), None, 12, 120_000).monthly_amount(), 10_000);
    }

    #[test]
    fn test_monthly_amount_derived() {
        // (120000 - 20000) / 10
        assert_eq!(plan(None, Some(20_000), 10, 120_000).monthly_amount(), 10_000);
        // Rounds down to whole cents
        assert_eq!(plan(None, None, 3, 100_000).monthly_amount(), 33_333);
    }

    #[test]
    fn test_monthly_amount_degenerate() {
        assert_eq!(plan(None, None, 0, 120_000).monthly_amount(), 0);
        assert_eq!(plan(None, Some(200_000), 10, 120_000).monthly_amount(), 0);
    }

    #[test]
    fn test_decodes_legacy_number_fields() {
        let plan: Plan = serde_json::from_str(
            r#"{
                "code": "P-12",
                "name": "Plan Oro",
                "installmentCount": 12,
                "installmentAmount": 1000.5,
                "totalValue": "12006.00"
            }"#,
        )
        .unwrap();
        assert_eq!(plan.installment_amount, Some(100_050));
        assert_eq!(plan.initial_payment, None);
        assert_eq!(plan.total_value, 1_200_600);
    }
}
