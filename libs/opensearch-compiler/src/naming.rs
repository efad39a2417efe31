//! Naming conventions shared by the request and response compilers.

use serde_json::Value;

/// Name of the unanalyzed multi-field declared next to keyword fields.
pub const RAW_SUBFIELD: &str = "raw";

/// Field names are stored lower-case in the index.
pub fn to_field_name(name: &str) -> String {
    name.to_lowercase()
}

pub fn raw_field_name(field_name: &str) -> String {
    format!("{field_name}.{RAW_SUBFIELD}")
}

/// Normalize a term value for a boolean field: `"1"`/`"0"` become
/// `"true"`/`"false"`, anything else is lower-cased.
pub fn normalize_boolean_term(value: &str) -> String {
    match value {
        "1" => "true".to_string(),
        "0" => "false".to_string(),
        other => other.to_lowercase(),
    }
}

/// Key of the filter aggregation emitted for one value of a range
/// aggregation. The response compiler looks buckets up by the same key.
pub fn composite_key(aggregation_id: &str, value_id: &str) -> String {
    format!("{aggregation_id}-{value_id}")
}

/// Culture-independent text form of a bucket key. Whole floating-point
/// keys drop their fraction, so `10.0` reads `"10"`.
pub fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
