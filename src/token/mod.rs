//! Token Management
//!
//! Credential bundles, token refresh, and token state persistence.

pub mod bundle;
pub mod provider;
pub mod store;

pub use bundle::CredentialBundle;
pub use provider::{AccessGrant, DefaultTokenProvider, TokenProvider, AUTHORIZATION_SCHEME};
pub use store::{CredentialStore, InMemoryCredentialStore};
