//! Token Provider
//!
//! Returns a usable access token for a credential bundle, running the
//! refresh-token grant against the bundle's authority when the cached token
//! is reported expired.
//!
//! Expiry is decided solely from the cached `expires_in` value: a positive
//! value means the token is reused without a network call, zero or less
//! means a refresh happens first. Wall-clock expiry is left to the identity
//! provider, which rejects stale tokens; hosts can force a refresh with
//! [`CredentialBundle::invalidate`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{AuthError, ZohoError};
use crate::observability::redact_token;
use crate::token::CredentialBundle;
use crate::types::{CachedTokenState, ClientCredentials, TokenResponse};

/// Literal prefix of the authenticated-call header value.
pub const AUTHORIZATION_SCHEME: &str = "Zoho-oauthtoken";

/// Access token and the API domain it was issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    pub api_domain: String,
}

impl AccessGrant {
    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", AUTHORIZATION_SCHEME, self.access_token)
    }
}

impl From<&CachedTokenState> for AccessGrant {
    fn from(state: &CachedTokenState) -> Self {
        Self {
            access_token: state.access_token.clone(),
            api_domain: state.api_domain.clone(),
        }
    }
}

impl std::fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGrant")
            .field("access_token", &"[REDACTED]")
            .field("api_domain", &self.api_domain)
            .finish()
    }
}

/// Token provider interface.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a valid access token, refreshing only if the cached one is expired.
    async fn get_access_token(&self, bundle: &CredentialBundle) -> Result<AccessGrant, ZohoError>;

    /// Refresh unconditionally and return the new token.
    async fn refresh_access_token(&self, bundle: &CredentialBundle) -> Result<AccessGrant, ZohoError>;
}

/// Default token provider talking to the Zoho accounts server.
pub struct DefaultTokenProvider<T: HttpTransport> {
    transport: Arc<T>,
    timeout: Duration,
}

impl<T: HttpTransport> DefaultTokenProvider<T> {
    /// Create new token provider.
    pub fn new(transport: Arc<T>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Cached grant if present and not expired.
    async fn cached_grant(bundle: &CredentialBundle) -> Result<Option<AccessGrant>, ZohoError> {
        let state = bundle
            .token_state()
            .await
            .ok_or(AuthError::MissingTokenState)?;

        if state.is_expired() {
            Ok(None)
        } else {
            Ok(Some(AccessGrant::from(&state)))
        }
    }

    fn build_refresh_request(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<HttpRequest, ZohoError> {
        let fields = credentials.refresh_grant_fields(refresh_token);
        let body = serde_urlencoded::to_string(&fields[..]).map_err(|e| {
            AuthError::InvalidRefreshRequest {
                message: e.to_string(),
            }
        })?;

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: credentials.authority_url.clone(),
            headers,
            body: Some(body),
            timeout: Some(self.timeout),
        })
    }

    /// Run the refresh grant and install the new state in the bundle.
    ///
    /// Callers must hold the bundle's refresh gate.
    async fn refresh_locked(&self, bundle: &CredentialBundle) -> Result<AccessGrant, ZohoError> {
        let previous = bundle
            .token_state()
            .await
            .ok_or(AuthError::MissingTokenState)?;
        let refresh_token = previous
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NoRefreshToken)?;

        let credentials = bundle.credentials();
        let request = self.build_refresh_request(credentials, &refresh_token)?;

        debug!(
            authority = %credentials.authority_url,
            refresh_token = %redact_token(&refresh_token),
            "Refreshing access token"
        );

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Token refresh request failed");
            AuthError::RefreshTransport(e)
        })?;

        if !(200..300).contains(&response.status) {
            let payload = serde_json::from_str::<serde_json::Value>(&response.body).ok();
            let message = payload
                .as_ref()
                .and_then(|p| p.get("error"))
                .and_then(|e| e.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", response.status));

            warn!(status = response.status, error = %message, "Token refresh rejected");
            return Err(AuthError::RefreshRejected {
                status: response.status,
                message,
                payload,
            }
            .into());
        }

        let token_response: TokenResponse =
            serde_json::from_str(&response.body).map_err(|e| AuthError::InvalidTokenResponse {
                message: e.to_string(),
            })?;

        let state = token_response
            .into_state(Some(refresh_token), &previous.api_domain)
            .map_err(|e| {
                warn!(error = %e, "Token refresh rejected");
                e
            })?;

        info!(
            api_domain = %state.api_domain,
            expires_in = state.expires_in,
            access_token = %redact_token(&state.access_token),
            "Access token refreshed"
        );

        let grant = AccessGrant::from(&state);
        bundle.replace_token_state(state).await?;
        Ok(grant)
    }
}

#[async_trait]
impl<T: HttpTransport> TokenProvider for DefaultTokenProvider<T> {
    #[instrument(skip(self, bundle), fields(client_id = %bundle.credentials().client_id))]
    async fn get_access_token(&self, bundle: &CredentialBundle) -> Result<AccessGrant, ZohoError> {
        if let Some(grant) = Self::cached_grant(bundle).await? {
            debug!("Reusing cached access token");
            return Ok(grant);
        }

        let _gate = bundle.lock_refresh().await;

        // Another caller may have refreshed while we waited on the gate.
        if let Some(grant) = Self::cached_grant(bundle).await? {
            debug!("Access token refreshed by a concurrent caller");
            return Ok(grant);
        }

        self.refresh_locked(bundle).await
    }

    #[instrument(skip(self, bundle), fields(client_id = %bundle.credentials().client_id))]
    async fn refresh_access_token(&self, bundle: &CredentialBundle) -> Result<AccessGrant, ZohoError> {
        let _gate = bundle.lock_refresh().await;
        self.refresh_locked(bundle).await
    }
}
