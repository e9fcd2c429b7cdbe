//! Credential Types
//!
//! Client identity, cached token state, and the refresh-grant response.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::endpoint::Region;
use crate::error::AuthError;

/// Long-lived client identity. Immutable after creation.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Token endpoint of the data center the account lives in.
    pub authority_url: String,
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
    /// Redirect URI registered with the client.
    pub redirect_uri: String,
}

impl ClientCredentials {
    pub fn new(
        authority_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            authority_url: authority_url.into(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Data center resolved from the authority URL.
    pub fn region(&self) -> Region {
        Region::from_authority_url(&self.authority_url)
    }

    /// Form fields of a refresh-token grant.
    pub(crate) fn refresh_grant_fields<'a>(&'a self, refresh_token: &'a str) -> [(&'a str, &'a str); 5] {
        [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ]
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("authority_url", &self.authority_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Cached token state. Replaced wholesale on every refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTokenState {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// API domain the token was issued for.
    #[serde(default)]
    pub api_domain: String,
    /// Remaining lifetime in seconds; zero or less means expired/unknown.
    #[serde(default)]
    pub expires_in: i64,
    /// When this state was produced by a refresh. Diagnostic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CachedTokenState {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        api_domain: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            api_domain: api_domain.into(),
            expires_in,
            refreshed_at: None,
        }
    }

    /// Whether the cached access token must be refreshed before use.
    pub fn is_expired(&self) -> bool {
        self.expires_in <= 0
    }

    /// Mark the access token as expired, forcing the next call to refresh.
    pub fn expire(&mut self) {
        self.expires_in = 0;
    }
}

impl std::fmt::Debug for CachedTokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTokenState")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_domain", &self.api_domain)
            .field("expires_in", &self.expires_in)
            .field("refreshed_at", &self.refreshed_at)
            .finish()
    }
}

/// Refresh-grant response from the accounts server.
///
/// Zoho reports grant failures as HTTP 200 with an `error` field, so every
/// field is optional here and checked in [`TokenResponse::into_state`].
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub api_domain: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenResponse {
    /// Build the replacement token state.
    ///
    /// Falls back to `previous_refresh_token` when the response omits one,
    /// and to `previous_api_domain` when it omits the API domain.
    /// `access_token` and `expires_in` are required.
    pub fn into_state(
        self,
        previous_refresh_token: Option<String>,
        previous_api_domain: &str,
    ) -> Result<CachedTokenState, AuthError> {
        if let Some(error) = self.error {
            let mut payload: serde_json::Map<String, serde_json::Value> =
                self.extra.into_iter().collect();
            payload.insert("error".to_string(), serde_json::Value::String(error.clone()));

            return Err(AuthError::RefreshRejected {
                status: 200,
                message: error,
                payload: Some(serde_json::Value::Object(payload)),
            });
        }

        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                message: "missing access_token".to_string(),
            })?;

        let expires_in = self
            .expires_in
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                message: "missing expires_in".to_string(),
            })?;

        Ok(CachedTokenState {
            access_token,
            refresh_token: self.refresh_token.or(previous_refresh_token),
            api_domain: self
                .api_domain
                .unwrap_or_else(|| previous_api_domain.to_string()),
            expires_in,
            refreshed_at: Some(Utc::now()),
        })
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_domain", &self.api_domain)
            .field("expires_in", &self.expires_in)
            .field("error", &self.error)
            .finish()
    }
}
