//! Purpose: Model the untyped upstream response as a closed tagged union.
//! Exports: `RawResponse`.
//! Role: Input type of the envelope resolver; built from a deserialized JSON tree or body text.
//! Invariants: Only object, array, string, and null shapes exist; other scalars collapse to null.
//! Invariants: Transient; never persisted.
use serde_json::{Map, Value};
use tracing::debug;

use crate::json::parse;

#[derive(Clone, Debug, PartialEq)]
pub enum RawResponse {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    String(String),
    Null,
}

impl RawResponse {
    /// Interpret an upstream body. Text that is not JSON is kept as a bare string.
    pub fn from_body(body: &str) -> Self {
        match parse::from_str::<Value>(body) {
            Ok(value) => Self::from(value),
            Err(err) => {
                debug!(
                    hint = %parse::hint_for_error(&err, "upstream body"),
                    "body is not JSON; treating it as bare text"
                );
                RawResponse::String(body.to_string())
            }
        }
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawResponse::Object(map),
            Value::Array(items) => RawResponse::Array(items),
            Value::String(text) => RawResponse::String(text),
            Value::Null | Value::Bool(_) | Value::Number(_) => RawResponse::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawResponse;
    use serde_json::json;

    #[test]
    fn scalars_collapse_to_null() {
        assert_eq!(RawResponse::from(json!(42)), RawResponse::Null);
        assert_eq!(RawResponse::from(json!(true)), RawResponse::Null);
        assert_eq!(RawResponse::from(json!(null)), RawResponse::Null);
    }

    #[test]
    fn body_that_is_not_json_becomes_bare_string() {
        let raw = RawResponse::from_body("{\"title\": \"cut off");
        assert_eq!(raw, RawResponse::String("{\"title\": \"cut off".to_string()));
    }

    #[test]
    fn json_body_keeps_its_shape() {
        let raw = RawResponse::from_body(r#"[{"text":"hi"}]"#);
        assert!(matches!(raw, RawResponse::Array(items) if items.len() == 1));
    }
}
