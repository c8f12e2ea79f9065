//! Type coercion from raw environment text to JSON values.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Declared type of a binding's target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    String,
    Boolean,
    Integer,
    Float,
    Array,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Array => "array",
        }
    }

    /// Human-readable description of the accepted format, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TypeTag::String => "a string",
            TypeTag::Boolean => "a boolean (true or false)",
            TypeTag::Integer => "an integer",
            TypeTag::Float => "a number",
            TypeTag::Array => "a JSON array",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace literal `\n` sequences with real newlines.
///
/// Container environments cannot easily carry multi-line values (private keys,
/// descriptions), so operators write them with escaped newlines.
pub fn normalize_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Coerce raw text to a JSON value of the given type.
///
/// On failure, returns parser detail (possibly empty) for the caller to wrap
/// into a [`crate::error::ValidationError`].
pub fn coerce(tag: TypeTag, raw: &str) -> Result<Value, Option<String>> {
    match tag {
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Boolean => coerce_boolean(raw),
        TypeTag::Integer => coerce_integer(raw),
        TypeTag::Float => coerce_float(raw),
        TypeTag::Array => coerce_array(raw),
    }
}

fn coerce_boolean(raw: &str) -> Result<Value, Option<String>> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => Err(None),
    }
}

fn coerce_integer(raw: &str) -> Result<Value, Option<String>> {
    raw.trim()
        .parse::<i64>()
        .map(|n| Value::Number(n.into()))
        .map_err(|e| Some(e.to_string()))
}

fn coerce_float(raw: &str) -> Result<Value, Option<String>> {
    let parsed = raw.trim().parse::<f64>().map_err(|e| Some(e.to_string()))?;
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| Some("value is not finite".to_string()))
}

fn coerce_array(raw: &str) -> Result<Value, Option<String>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Array(_)) => Ok(value),
        Ok(other) => Err(Some(format!("parsed as JSON {}", json_kind(&other)))),
        Err(e) => Err(Some(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_passthrough() {
        assert_eq!(coerce(TypeTag::String, " !! ").unwrap(), json!(" !! "));
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(
            normalize_newlines("-----BEGIN KEY-----\\nabc\\n-----END KEY-----"),
            "-----BEGIN KEY-----\nabc\n-----END KEY-----"
        );
        assert_eq!(normalize_newlines("no escapes"), "no escapes");
    }

    #[test]
    fn test_boolean_is_case_insensitive() {
        assert_eq!(coerce(TypeTag::Boolean, "TRUE").unwrap(), json!(true));
        assert_eq!(coerce(TypeTag::Boolean, "False").unwrap(), json!(false));
        assert_eq!(coerce(TypeTag::Boolean, " true\n").unwrap(), json!(true));
    }

    #[test]
    fn test_boolean_rejects_other_text() {
        for raw in ["notabool", "1", "yes", ""] {
            assert!(coerce(TypeTag::Boolean, raw).is_err(), "{raw:?} accepted");
        }
    }

    #[test]
    fn test_integer() {
        assert_eq!(coerce(TypeTag::Integer, "42").unwrap(), json!(42));
        assert_eq!(coerce(TypeTag::Integer, "-7").unwrap(), json!(-7));
        assert!(coerce(TypeTag::Integer, "4.5").is_err());
        assert!(coerce(TypeTag::Integer, "ten").is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(coerce(TypeTag::Float, "0.5").unwrap(), json!(0.5));
        assert_eq!(coerce(TypeTag::Float, "3").unwrap(), json!(3.0));
        assert!(coerce(TypeTag::Float, "fast").is_err());
        assert!(coerce(TypeTag::Float, "inf").is_err());
        assert!(coerce(TypeTag::Float, "NaN").is_err());
    }

    #[test]
    fn test_array() {
        assert_eq!(
            coerce(TypeTag::Array, r#"["torch","rope"]"#).unwrap(),
            json!(["torch", "rope"])
        );
        assert_eq!(
            coerce(TypeTag::Array, r#"[["NULL", "", "HAT"]]"#).unwrap(),
            json!([["NULL", "", "HAT"]])
        );
    }

    #[test]
    fn test_array_rejects_malformed_and_non_arrays() {
        // What a shell leaves behind when the outer quotes are missing.
        assert!(coerce(TypeTag::Array, "[torch,rope]").is_err());
        let detail = coerce(TypeTag::Array, r#"{"a": 1}"#).unwrap_err();
        assert_eq!(detail.as_deref(), Some("parsed as JSON object"));
    }
}
