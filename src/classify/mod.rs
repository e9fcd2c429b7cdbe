//! Error Classifier
//!
//! Zoho endpoints report logical failures inside 2xx responses using one of
//! two conventions. Both conventions are checked on every body; a response
//! carrying a `data` list without an error marker is a success.

use serde_json::Value;

use crate::error::ApiError;

/// Message used when a `code` failure carries no `message`.
pub const DEFAULT_CODE_MESSAGE: &str = "The Zoho API reported an error";

/// Message used when an `error` record carries no `message`.
pub const DEFAULT_RECORD_MESSAGE: &str = "The Zoho API reported an error for the record";

/// Vendor error convention that signalled a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorShape {
    /// `{ "code": <non-zero>, "message": "..." }` (Billing, Projects).
    StatusCode { code: i64 },
    /// `{ "data": [{ "status": "error", "message": "..." }] }` (Bigin).
    RecordStatus { record_code: Option<String> },
}

impl ErrorShape {
    /// Field the convention is carried in.
    pub fn field(&self) -> &'static str {
        match self {
            Self::StatusCode { .. } => "code",
            Self::RecordStatus { .. } => "data",
        }
    }
}

/// One failure signal found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSignal {
    pub shape: ErrorShape,
    pub message: String,
}

/// Result of classifying a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    ApplicationError {
        /// Primary signal; `code` takes precedence over `data`.
        primary: ErrorSignal,
        /// Every signal found, in check order.
        signals: Vec<ErrorSignal>,
    },
}

impl Classification {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Convert into an [`ApiError`] carrying the raw body.
    pub fn into_api_error(self, body: &Value) -> Option<ApiError> {
        match self {
            Self::Ok => None,
            Self::ApplicationError { primary, .. } => Some(
                ApiError::new(primary.message)
                    .with_shape(primary.shape)
                    .with_payload(body.clone()),
            ),
        }
    }
}

/// Classify a decoded response body.
pub fn classify(body: &Value) -> Classification {
    let signals: Vec<ErrorSignal> = [check_status_code(body), check_record_status(body)]
        .into_iter()
        .flatten()
        .collect();

    match signals.first() {
        None => Classification::Ok,
        Some(primary) => Classification::ApplicationError {
            primary: primary.clone(),
            signals,
        },
    }
}

fn check_status_code(body: &Value) -> Option<ErrorSignal> {
    let code = body.get("code")?.as_i64()?;
    if code == 0 {
        return None;
    }

    Some(ErrorSignal {
        shape: ErrorShape::StatusCode { code },
        message: message_or(body, DEFAULT_CODE_MESSAGE),
    })
}

fn check_record_status(body: &Value) -> Option<ErrorSignal> {
    let first = body.get("data")?.as_array()?.first()?;
    if first.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }

    Some(ErrorSignal {
        shape: ErrorShape::RecordStatus {
            record_code: first.get("code").and_then(Value::as_str).map(String::from),
        },
        message: message_or(first, DEFAULT_RECORD_MESSAGE),
    })
}

fn message_or(value: &Value, default: &str) -> String {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(default)
        .to_string()
}
