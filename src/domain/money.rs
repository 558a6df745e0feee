use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// All sums, subtotals and balances are computed in this representation and
/// converted back to a decimal string only at the render boundary.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole units
            let units: i64 = parts[0]
                .parse()
                .map_err(|_| ParseCentsError::InvalidFormat)?;
            let cents = units * 100;
            Ok(if negative { -cents } else { cents })
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?
            };

            // Handle decimal part - pad or truncate to 2 digits
            let decimal_str = parts[1];
            let decimal_cents: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    // Single digit like "5" means 50 cents
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                        * 10
                }
                2 => decimal_str
                    .parse()
                    .map_err(|_| ParseCentsError::InvalidFormat)?,
                _ => {
                    // More than 2 decimal places - truncate. The slice is
                    // checked so multibyte text errors instead of panicking.
                    decimal_str
                        .get(..2)
                        .ok_or(ParseCentsError::InvalidFormat)?
                        .parse()
                        .map_err(|_| ParseCentsError::InvalidFormat)?
                }
            };

            let cents = units * 100 + decimal_cents;
            Ok(if negative { -cents } else { cents })
        }
        _ => Err(ParseCentsError::InvalidFormat),
    }
}

/// Convert a JSON value holding a monetary amount into cents. Legacy records
/// store money as either a number or a string; numbers go through their
/// decimal text form so the amount is never touched by float arithmetic.
pub fn cents_from_value(value: &serde_json::Value) -> Result<Cents, ParseCentsError> {
    match value {
        serde_json::Value::Number(n) => parse_cents(&n.to_string()),
        serde_json::Value::String(s) => parse_cents(s),
        _ => Err(ParseCentsError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// Serde adapter for required monetary fields. Accepts number or string on
/// input, writes a decimal string on output so round-trips stay exact.
pub mod serde_cents {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{cents_from_value, format_cents, Cents};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_cents(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        cents_from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional monetary fields. `null` and missing both map
/// to `None`; combine with `#[serde(default)]`.
pub mod serde_cents_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{cents_from_value, format_cents, Cents};

    pub fn serialize<S: Serializer>(
        cents: &Option<Cents>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match cents {
            Some(v) => serializer.serialize_str(&format_cents(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Cents>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Null => Ok(None),
            other => cents_from_value(&other)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
