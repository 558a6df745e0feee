use serde::{Deserialize, Serialize};

use super::plan::Plan;

/// A contract linking a holder to a financing plan. `plan_data` carries a
/// denormalized snapshot of the plan taken when the contract was signed;
/// when absent the plan must be looked up by `plan_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub contract_number: String,
    pub holder_id: String,
    #[serde(default)]
    pub plan_code: Option<String>,
    #[serde(default)]
    pub plan_data: Option<Plan>,
    #[serde(default)]
    pub executive_id: Option<String>,
    pub city_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_with_embedded_plan() {
        let contract: Contract = serde_json::from_str(
            r#"{
                "contractNumber": "C-400",
                "holderId": "H-100",
                "planData": {
                    "code": "P-12",
                    "name": "Plan Oro",
                    "installmentCount": 12,
                    "totalValue": 1200
                },
                "cityCode": "051"
            }"#,
        )
        .unwrap();
        assert!(contract.plan_code.is_none());
        assert_eq!(contract.plan_data.unwrap().total_value, 120_000);
    }
}
