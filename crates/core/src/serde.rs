//! Serde helpers for decoding stored documents.
//!
//! Stored attributes are loosely typed: counters may arrive as numbers,
//! numeric strings, or `null`, and seizure line-items are kept as a JSON
//! string. These helpers decode them into well-typed values without failing
//! the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::checkpost::SeizedItemEntry;

/// Deserialize a non-negative counter, treating anything unusable as 0.
///
/// Numbers are truncated, numeric strings are parsed, and negative values,
/// `null`, and non-numeric text all count as 0.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

fn count_from_value(value: &Value) -> u64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

/// Deserialize a string attribute, treating `null` as empty.
pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize seizure line-items stored either as an array or as a string
/// holding a JSON array. Anything else yields an empty list.
pub fn deserialize_seized_items<'de, D>(deserializer: D) -> Result<Vec<SeizedItemEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => serde_json::from_value(Value::Array(items)).ok(),
        Some(Value::String(raw)) => serde_json::from_str::<Vec<SeizedItemEntry>>(&raw).ok(),
        _ => None,
    };
    Ok(items.unwrap_or_default())
}
