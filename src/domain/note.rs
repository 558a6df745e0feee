use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::{serde_cents, Cents};

/// A debit or credit note. Both kinds share one shape; which is which is
/// decided by the collection the note lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_number: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub city_code: String,
    pub date: NaiveDate,
    #[serde(with = "serde_cents")]
    pub value: Cents,
    #[serde(default)]
    pub concept: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_note() {
        let note: Note = serde_json::from_str(
            r#"{
                "noteNumber": "ND-40",
                "invoiceNumber": "000123",
                "cityCode": "051",
                "date": "2026-02-01",
                "value": "150.00",
                "concept": "Late fee"
            }"#,
        )
        .unwrap();
        assert_eq!(note.value, 15_000);
        assert_eq!(note.concept.as_deref(), Some("Late fee"));
    }
}
