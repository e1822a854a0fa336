//! Lenient field parsing for stored records.
//!
//! Records are written by several front ends over the years, so numbers show
//! up as JSON numbers or numeric strings and timestamps as epoch millis or
//! RFC 3339 text. Anything unusable becomes `None` with a warning instead of
//! failing the whole aggregation.

use chrono::DateTime;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn parse_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let parsed = parsed.filter(|n| n.is_finite());
    if parsed.is_none() {
        log::warn!("Ignoring non-numeric value {} in stored record", value);
    }
    parsed
}

pub fn parse_u32(value: &Value) -> Option<u32> {
    parse_f64(value)
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Epoch milliseconds from either a number or an RFC 3339 string.
pub fn parse_timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::String(s) => match DateTime::parse_from_rfc3339(s.trim()) {
            Ok(dt) => Some(dt.timestamp_millis()),
            Err(_) => parse_f64(value).map(|n| n as i64),
        },
        _ => parse_f64(value).map(|n| n as i64),
    }
}

pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(parse_f64(&Value::deserialize(d)?))
}

pub fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(parse_u32(&Value::deserialize(d)?))
}

pub fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(parse_bool(&Value::deserialize(d)?))
}

pub fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(parse_timestamp_millis(&Value::deserialize(d)?))
}

pub fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserializes one stored record, falling back to `T::default()` when the
/// node is not an object at all.
pub fn from_record<T>(context: &str, value: &Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match serde_json::from_value::<T>(value.clone()) {
        Ok(record) => record,
        Err(err) => {
            log::warn!("Malformed record at {}: {}; using defaults", context, err);
            T::default()
        }
    }
}
