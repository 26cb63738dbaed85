//! Numeric Normalization
//!
//! Optional pass converting numeric-looking strings into JSON numbers so the search
//! service can sort and filter on them.
//!
//! Integral literals that fit neither `i64` nor `u64` stay strings: a float would keep
//! only the leading digits of identifiers such as long EAN or account numbers.
//!
//! Payloads come from parsed JSON and are therefore trees; the walk does not guard
//! against cycles.

use super::types::{OBJECT_ID_FIELD, Record};

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::OnceLock;

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("numeric pattern is valid")
    })
}

/// Parses `raw` as a strict numeric literal.
///
/// Surrounding whitespace is ignored. Anything that is not a plain decimal literal
/// (`"abc123"`, `"0x10"`, `"NaN"`, `"inf"`, `""`) yields `None`.
pub fn parse_numeric(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !numeric_pattern().is_match(trimmed) {
        return None;
    }

    let is_integral = !trimmed.contains(['.', 'e', 'E']);
    if is_integral {
        if let Ok(value) = trimmed.parse::<i64>() {
            return Some(Number::from(value));
        }
        if let Ok(value) = trimmed.trim_start_matches('+').parse::<u64>() {
            return Some(Number::from(value));
        }
        return None;
    }

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
}

/// Recursively replaces numeric strings inside `value`.
pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::String(raw) => {
            if let Some(number) = parse_numeric(raw) {
                *value = Value::Number(number);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Normalizes every field of `record` except the identifier and the optional
/// discriminator, which stay strings because they are routing keys.
pub fn normalize_record(record: &mut Record, discriminator: Option<&str>) {
    for (key, value) in record.iter_mut() {
        if key == OBJECT_ID_FIELD || Some(key.as_str()) == discriminator {
            continue;
        }
        normalize_numbers(value);
    }
}
