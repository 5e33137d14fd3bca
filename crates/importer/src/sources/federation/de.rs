//! Field decoders for the federation API, which is loose about scalar types:
//! ids arrive as numbers or strings, flags as booleans or 0/1, dates with or
//! without a time part. `null` and a missing key both decode to `None`.
//!
//! Every decoder goes through `serde_json::Value`, so they also work inside
//! `#[serde(flatten)]` structs.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use storage::OpaquePayload;

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.filter(|value| !value.is_null()))
}

fn blank_to_none(value: Value) -> Option<Value> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

/// Strings, numbers and booleans, stored as text.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match present(deserializer)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// Like [`text`], but a blank string is absent. Used for external keys that
/// end up in request paths.
pub fn key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn parse_integer<T, E>(value: &Value) -> Result<T, E>
where
    T: TryFrom<i64>,
    E: Error,
{
    let whole = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    whole
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| E::custom(format!("expected an integer, found {}", value)))
}

/// A mandatory integer id, given as a number or a numeric string.
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_integer(&value)
}

pub fn integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    match present(deserializer)?.and_then(blank_to_none) {
        None => Ok(None),
        Some(value) => parse_integer(&value).map(Some),
    }
}

pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match present(deserializer)?.and_then(blank_to_none) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a number, found {}",
                other
            )));
        }
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid decimal '{}'", raw)))
}

pub fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match present(deserializer)?.and_then(blank_to_none) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(Some(false)),
        Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(Some(true)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("expected a boolean, found '{}'", s))),
        },
        Some(other) => Err(D::Error::custom(format!(
            "expected a boolean, found {}",
            other
        ))),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match present(deserializer)?.and_then(blank_to_none) {
        None => Ok(None),
        Some(Value::String(s)) => parse_date(s.trim())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", s))),
        Some(other) => Err(D::Error::custom(format!(
            "expected a date string, found {}",
            other
        ))),
    }
}

/// Any non-null JSON value, kept opaque.
pub fn payload<'de, D>(deserializer: D) -> Result<Option<OpaquePayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(present(deserializer)?.map(OpaquePayload::new))
}
