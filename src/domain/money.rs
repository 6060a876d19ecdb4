use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal places used for invoice and line amounts.
pub const AMOUNT_DP: u32 = 2;
/// Decimal places used for quantities and exchange rates.
pub const QUANTITY_DP: u32 = 3;
/// Decimal places used for allocated per-item tax.
pub const ITEM_TAX_DP: u32 = 6;

/// Coerces a loosely typed upstream value into a decimal.
///
/// Numbers are taken as-is, numeric strings are parsed (an empty string is
/// zero), booleans become `1`/`0`. Anything else, including `null`, yields
/// `None` so callers can substitute the field default.
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal(&n.to_string())
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(Decimal::ZERO)
            } else {
                parse_decimal(s)
            }
        }
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Renders a value as a fixed-point string with exactly `decimals` digits.
///
/// Missing values render as zero. Midpoints round away from zero and a
/// result that rounds to zero never carries a sign.
pub fn to_money(value: Option<Decimal>, decimals: u32) -> String {
    let rounded = value
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.*}", decimals as usize, rounded)
}

/// Serde adapter for numeric fields that tolerates strings, `null` and junk.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_decimal))
}
