//! Error Types
//!
//! Error taxonomy for the dispatch layer. Every failure surfaces as one of
//! the categories below and is returned to the immediate caller; nothing is
//! retried or swallowed inside the crate.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::classify::ErrorShape;

/// Result type for Zoho operations.
pub type ZohoResult<T> = Result<T, ZohoError>;

/// Root error type for the Zoho integration.
#[derive(Error, Debug)]
pub enum ZohoError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),
}

/// Classified error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Transport,
    Api,
    Validation,
    Configuration,
    Pagination,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auth => "AuthError",
            Self::Transport => "TransportError",
            Self::Api => "ApiError",
            Self::Validation => "ValidationError",
            Self::Configuration => "ConfigurationError",
            Self::Pagination => "PaginationError",
        };
        f.write_str(name)
    }
}

impl ZohoError {
    /// Get the taxonomy tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Api,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Pagination(_) => ErrorKind::Pagination,
        }
    }

    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "ZOHO_AUTH",
            Self::Transport(_) => "ZOHO_TRANSPORT",
            Self::Api(_) => "ZOHO_API",
            Self::Validation(_) => "ZOHO_VALIDATION",
            Self::Configuration(_) => "ZOHO_CONFIG",
            Self::Pagination(_) => "ZOHO_PAGINATION",
        }
    }

    /// Check if a caller could reasonably retry this error.
    ///
    /// Informational only: the dispatch layer never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Auth(AuthError::RefreshTransport(e)) => e.is_retryable(),
            Self::Api(e) => matches!(e.status, Some(429) | Some(500..=599)),
            _ => false,
        }
    }

    /// Check if the host has to run a fresh authorization grant.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::MissingTokenState)
                | Self::Auth(AuthError::NoRefreshToken)
                | Self::Auth(AuthError::RefreshRejected { .. })
        )
    }

    /// Human-readable message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Auth(e) => e.to_string(),
            Self::Transport(e) => e.to_string(),
            Self::Api(e) => e.message.clone(),
            Self::Validation(e) => e.to_string(),
            Self::Configuration(e) => e.to_string(),
            Self::Pagination(e) => e.to_string(),
        }
    }

    /// Structured cause payload, when the vendor returned one.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api(e) => e.payload.as_ref(),
            Self::Auth(AuthError::RefreshRejected { payload, .. }) => payload.as_ref(),
            _ => None,
        }
    }
}

/// Token retrieval or refresh failure.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No token state available; an authorization grant must be performed first")]
    MissingTokenState,

    #[error("Cached token expired and no refresh token is available")]
    NoRefreshToken,

    #[error("Token refresh request failed: {0}")]
    RefreshTransport(#[source] TransportError),

    #[error("Token refresh rejected: {message}")]
    RefreshRejected {
        status: u16,
        message: String,
        payload: Option<serde_json::Value>,
    },

    #[error("Invalid token response: {message}")]
    InvalidTokenResponse { message: String },

    #[error("Could not build token refresh request: {message}")]
    InvalidRefreshRequest { message: String },

    #[error("Failed to persist token state: {message}")]
    StoreFailed { message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl TransportError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

/// Application-level failure reported inside a received response body.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Vendor message (or a default when the vendor sent none).
    pub message: String,
    /// HTTP status of the response.
    pub status: Option<u16>,
    /// Which vendor error convention signalled the failure.
    pub shape: Option<ErrorShape>,
    /// Raw response body for diagnostics.
    pub payload: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            shape: None,
            payload: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_shape(mut self, shape: ErrorShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Caller-supplied input could not be used.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Field '{field}' is not valid JSON: {message}")]
    InvalidJson { field: String, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Pagination safety bound error.
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("Page limit of {max_pages} reached while the server still reports more pages")]
    PageLimitExceeded { max_pages: u32 },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportError::ConnectionFailed {
                message: err.to_string(),
            }
        } else if err.is_decode() || err.is_body() {
            TransportError::MalformedResponse {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Get user-friendly error message.
pub fn get_user_message(error: &ZohoError) -> String {
    match error {
        ZohoError::Auth(AuthError::MissingTokenState) | ZohoError::Auth(AuthError::NoRefreshToken) => {
            "The Zoho connection is not authorized. Please connect the account again.".to_string()
        }
        ZohoError::Auth(AuthError::RefreshRejected { .. }) => {
            "Zoho rejected the stored credentials. Please reconnect the account.".to_string()
        }
        ZohoError::Transport(TransportError::Timeout { .. }) => {
            "The request to Zoho timed out. Please try again.".to_string()
        }
        ZohoError::Api(e) => e.message.clone(),
        _ => error.to_string(),
    }
}
