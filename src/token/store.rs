//! Credential Store
//!
//! Persistence hook for cached token state. The host owns the storage
//! mechanism; the crate only writes refreshed state through this trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ZohoError;
use crate::types::CachedTokenState;

/// Token state persistence interface.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the token state stored for a credential key.
    async fn load(&self, key: &str) -> Result<Option<CachedTokenState>, ZohoError>;

    /// Store the token state for a credential key, replacing any previous one.
    async fn store(&self, key: &str, state: CachedTokenState) -> Result<(), ZohoError>;

    /// Delete the token state for a credential key.
    async fn delete(&self, key: &str) -> Result<bool, ZohoError>;
}

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    states: Mutex<HashMap<String, CachedTokenState>>,
}

impl InMemoryCredentialStore {
    /// Create new in-memory credential store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a token state.
    pub fn with_state(self, key: &str, state: CachedTokenState) -> Self {
        self.lock().insert(key.to_string(), state);
        self
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedTokenState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self, key: &str) -> Result<Option<CachedTokenState>, ZohoError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn store(&self, key: &str, state: CachedTokenState) -> Result<(), ZohoError> {
        self.lock().insert(key.to_string(), state);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, ZohoError> {
        Ok(self.lock().remove(key).is_some())
    }
}
