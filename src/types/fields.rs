//! Helpers for turning host-supplied field values into request parts.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::Query;

/// Parse a caller-supplied JSON blob.
pub fn parse_json_field(field: &str, raw: &str) -> Result<Value, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }

    serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Flatten a JSON object of scalar values into query parameters.
///
/// Null values are skipped; arrays and objects are rejected.
pub fn parse_query_pairs(value: &Value) -> Result<Query, ValidationError> {
    let object = value.as_object().ok_or_else(|| ValidationError::InvalidQuery {
        message: "query must be a JSON object".to_string(),
    })?;

    let mut query = Query::new();
    for (key, value) in object {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ValidationError::InvalidQuery {
                    message: format!("value of '{}' must be a scalar", key),
                })
            }
        };
        query.insert(key.clone(), rendered);
    }

    Ok(query)
}
