//! Credential Bundle
//!
//! Client identity plus the mutable cached token state, shared by every call
//! made on behalf of one connection.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::error::{AuthError, ZohoError};
use crate::token::CredentialStore;
use crate::types::{CachedTokenState, ClientCredentials};

struct Persistence {
    store: Arc<dyn CredentialStore>,
    key: String,
}

/// Credentials and cached token state for one connection.
///
/// Share it as `Arc<CredentialBundle>`: a refresh performed through any
/// handle is visible to every other holder. Refreshes are serialized by an
/// internal gate so concurrent callers observing an expired token trigger a
/// single refresh round trip.
pub struct CredentialBundle {
    credentials: ClientCredentials,
    state: RwLock<Option<CachedTokenState>>,
    refresh_gate: Mutex<()>,
    persistence: Option<Persistence>,
}

impl CredentialBundle {
    /// Create a bundle from client credentials and an optional prior grant.
    pub fn new(credentials: ClientCredentials, state: Option<CachedTokenState>) -> Self {
        Self {
            credentials,
            state: RwLock::new(state),
            refresh_gate: Mutex::new(()),
            persistence: None,
        }
    }

    /// Create a bundle whose token state is loaded from, and written back
    /// to, a credential store.
    pub async fn from_store(
        credentials: ClientCredentials,
        store: Arc<dyn CredentialStore>,
        key: impl Into<String>,
    ) -> Result<Self, ZohoError> {
        let key = key.into();
        let state = store.load(&key).await?;

        Ok(Self {
            credentials,
            state: RwLock::new(state),
            refresh_gate: Mutex::new(()),
            persistence: Some(Persistence { store, key }),
        })
    }

    /// Wrap in an `Arc` for sharing.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Immutable client identity.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Snapshot of the cached token state.
    pub async fn token_state(&self) -> Option<CachedTokenState> {
        self.state.read().await.clone()
    }

    /// Replace the cached token state wholesale, writing it through to the
    /// attached store if there is one.
    pub async fn replace_token_state(&self, state: CachedTokenState) -> Result<(), ZohoError> {
        if let Some(persistence) = &self.persistence {
            persistence
                .store
                .store(&persistence.key, state.clone())
                .await
                .map_err(|e| match e {
                    ZohoError::Auth(auth) => auth,
                    other => AuthError::StoreFailed {
                        message: other.to_string(),
                    },
                })?;
        }

        *self.state.write().await = Some(state);
        Ok(())
    }

    /// Mark the cached access token as expired so the next call refreshes.
    pub async fn invalidate(&self) {
        if let Some(state) = self.state.write().await.as_mut() {
            state.expire();
        }
    }

    /// Acquire the refresh gate.
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("credentials", &self.credentials)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}
