use bigdecimal::{BigDecimal, Zero};
use serde_json::Value;
use std::str::FromStr;

/// Defensive decimal parsing: anything that is not a number becomes zero.
/// Fiscal documents routinely omit zero-valued fields, so this is the
/// default for every monetary leaf.
pub fn parse_or_zero(s: &str) -> BigDecimal {
    BigDecimal::from_str(s.trim()).unwrap_or_else(|_| BigDecimal::zero())
}

/// Conversion factors fall back to 1 (identity), not 0, on parse failure.
pub fn parse_or_one(s: &str) -> BigDecimal {
    BigDecimal::from_str(s.trim()).unwrap_or_else(|_| BigDecimal::from(1))
}

/// Reads a decimal out of a JSON leaf that may be a string or a number.
pub fn value_or_zero(v: Option<&Value>) -> BigDecimal {
    match v {
        Some(Value::String(s)) => parse_or_zero(s),
        Some(Value::Number(n)) => parse_or_zero(&n.to_string()),
        _ => BigDecimal::zero(),
    }
}

/// Reads a string leaf, tolerating numeric leaves (codes sometimes arrive
/// unquoted from upstream parsers).
pub fn string_or_empty(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
