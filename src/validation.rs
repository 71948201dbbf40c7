// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation helpers shared by the services.
//!
//! Numeric request fields are accepted either as JSON numbers or as numeric
//! strings (mobile clients send both), so they arrive as raw
//! [`serde_json::Value`]s and are converted here.

use crate::error::{AppError, Result};
use crate::time_utils::{today_key, DATE_KEY_FORMAT};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::ops::RangeInclusive;
use validator::ValidationErrors;

/// Maximum number of entries returned by the tracking history.
pub const MAX_HISTORY_LIMIT: usize = 100;
/// History length when the client does not ask for one.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Fail with the list of fields whose presence check is false.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingFields(missing))
    }
}

/// Convert a JSON number or numeric string into a finite `f64`.
pub fn number_from_value(field: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("'{field}' must be a number")))
}

/// Convert a JSON number or integer string into an `i64`.
///
/// Fractional numbers are truncated toward zero; fractional strings are
/// rejected.
pub fn integer_from_value(field: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
                .map(|v| v.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| AppError::BadRequest(format!("'{field}' must be an integer")))
}

/// Require the request body to be a JSON object.
pub fn object_body(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))
}

/// A field counts as present unless it is absent, `null` or an empty string.
pub fn is_present(body: &Map<String, Value>, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Optional string field; any non-string value is rejected.
pub fn optional_string(body: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(AppError::BadRequest(format!("'{field}' must be a string"))),
    }
}

/// Optional list of strings, deduplicated in first-seen order.
pub fn optional_string_list(body: &Map<String, Value>, field: &str) -> Result<Option<Vec<String>>> {
    let items = match body.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::BadRequest(format!(
                "'{field}' must be a list of strings"
            )))
        }
    };

    let values = items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                AppError::BadRequest(format!("'{field}' must be a list of strings"))
            })
        })
        .collect::<Result<Vec<String>>>()?;
    Ok(Some(dedupe(values)))
}

/// Optional integer field constrained to `range`.
pub fn optional_u32(
    body: &Map<String, Value>,
    field: &str,
    range: RangeInclusive<u32>,
) -> Result<Option<u32>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = integer_from_value(field, value)?;
            u32::try_from(n)
                .ok()
                .filter(|n| range.contains(n))
                .map(Some)
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "'{field}' must be between {} and {}",
                        range.start(),
                        range.end()
                    ))
                })
        }
    }
}

/// Validate a `YYYY-MM-DD` daily log key.
pub fn parse_date_key(raw: &str) -> Result<String> {
    let invalid =
        || AppError::BadRequest(format!("Invalid date '{raw}': expected YYYY-MM-DD"));

    let date = NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT).map_err(|_| invalid())?;
    // chrono accepts unpadded fields; keys must sort lexicographically.
    let canonical = date.format(DATE_KEY_FORMAT).to_string();
    if canonical != raw {
        return Err(invalid());
    }
    Ok(canonical)
}

/// Validate a supplied date key, defaulting to today.
pub fn date_or_today(raw: Option<&str>) -> Result<String> {
    match raw {
        Some(date) => parse_date_key(date),
        None => Ok(today_key()),
    }
}

/// Parse the `limit` query parameter of the tracking history.
pub fn parse_history_limit(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HISTORY_LIMIT);
    };

    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("'limit' must be a positive integer".to_string()))?;
    if limit == 0 {
        return Err(AppError::BadRequest(
            "'limit' must be a positive integer".to_string(),
        ));
    }
    Ok(limit.min(MAX_HISTORY_LIMIT))
}

/// Normalize an email address for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deduplicate a list of tags, keeping the first occurrence of each.
pub fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

/// Flatten `validator` errors into a single 400 message.
pub fn validation_failed(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    fields.sort();
    AppError::BadRequest(fields.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_fields_lists_missing() {
        let err = require_fields(&[("weight", true), ("height", false), ("age", false)])
            .unwrap_err();
        match err {
            AppError::MissingFields(fields) => assert_eq!(fields, vec!["height", "age"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(require_fields(&[("weight", true)]).is_ok());
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value("w", &json!(75.5)).unwrap(), 75.5);
        assert_eq!(number_from_value("w", &json!("180")).unwrap(), 180.0);
        assert!(number_from_value("w", &json!("heavy")).is_err());
        assert!(number_from_value("w", &json!(null)).is_err());
        assert!(number_from_value("w", &json!([1])).is_err());
    }

    #[test]
    fn test_integer_from_value() {
        assert_eq!(integer_from_value("n", &json!(250)).unwrap(), 250);
        assert_eq!(integer_from_value("n", &json!("250")).unwrap(), 250);
        assert_eq!(integer_from_value("n", &json!(99.9)).unwrap(), 99);
        assert!(integer_from_value("n", &json!("1.5")).is_err());
        assert!(integer_from_value("n", &json!("lots")).is_err());
        assert!(integer_from_value("n", &json!(true)).is_err());
    }

    #[test]
    fn test_presence_treats_null_and_blank_as_missing() {
        let body = json!({"a": 1, "b": null, "c": "  ", "d": "x"});
        let body = object_body(&body).unwrap();
        assert!(is_present(body, "a"));
        assert!(!is_present(body, "b"));
        assert!(!is_present(body, "c"));
        assert!(is_present(body, "d"));
        assert!(!is_present(body, "missing"));
        assert!(object_body(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_optional_fields() {
        let body = json!({
            "goal": " strength ",
            "tags": ["a", "b", "a"],
            "meals": "4",
            "bad_tags": [1],
            "too_many": 11
        });
        let body = object_body(&body).unwrap();

        assert_eq!(optional_string(body, "goal").unwrap().as_deref(), Some("strength"));
        assert!(optional_string(body, "meals").is_ok());
        assert!(optional_string(body, "tags").is_err());
        assert_eq!(optional_string_list(body, "tags").unwrap().unwrap(), vec!["a", "b"]);
        assert!(optional_string_list(body, "bad_tags").is_err());
        assert_eq!(optional_u32(body, "meals", 1..=10).unwrap(), Some(4));
        assert!(optional_u32(body, "too_many", 1..=10).is_err());
        assert_eq!(optional_u32(body, "absent", 1..=10).unwrap(), None);
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(parse_date_key("2024-01-15").unwrap(), "2024-01-15");
        assert!(parse_date_key("2024-1-5").is_err());
        assert!(parse_date_key("2024-02-30").is_err());
        assert!(parse_date_key("15/01/2024").is_err());
        assert!(parse_date_key("").is_err());
    }

    #[test]
    fn test_date_or_today_defaults() {
        let today = date_or_today(None).unwrap();
        assert_eq!(parse_date_key(&today).unwrap(), today);
    }

    #[test]
    fn test_parse_history_limit() {
        assert_eq!(parse_history_limit(None).unwrap(), 30);
        assert_eq!(parse_history_limit(Some("2")).unwrap(), 2);
        assert_eq!(parse_history_limit(Some("500")).unwrap(), 100);
        assert!(parse_history_limit(Some("0")).is_err());
        assert!(parse_history_limit(Some("-3")).is_err());
        assert!(parse_history_limit(Some("ten")).is_err());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let tags = vec![
            "peanuts".to_string(),
            " shellfish ".to_string(),
            "peanuts".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedupe(tags), vec!["peanuts", "shellfish"]);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.com "), "a@b.com");
    }
}
