//! Zoho Client
//!
//! High-level client combining configuration, transport, token provider and
//! request dispatcher.

use serde_json::Value;
use std::sync::Arc;

use crate::config::ZohoConfig;
use crate::core::{create_transport, HttpTransport, ReqwestHttpTransport};
use crate::dispatch::RequestDispatcher;
use crate::endpoint::Product;
use crate::error::ZohoResult;
use crate::token::{AccessGrant, CredentialBundle, TokenProvider};
use crate::types::RequestDescriptor;

/// Client for the Zoho product APIs.
///
/// One client serves any number of connections; the credential bundle is
/// passed per call.
pub struct ZohoClient<T: HttpTransport = ReqwestHttpTransport> {
    dispatcher: RequestDispatcher<T>,
}

impl ZohoClient<ReqwestHttpTransport> {
    /// Create a client with the production transport.
    pub fn new(config: ZohoConfig) -> ZohoResult<Self> {
        config.validate()?;
        let transport = create_transport(config.timeout, config.max_response_size)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client from environment configuration.
    pub fn from_env() -> ZohoResult<Self> {
        Self::new(ZohoConfig::from_env()?)
    }
}

impl<T: HttpTransport + 'static> ZohoClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(transport: Arc<T>, config: ZohoConfig) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(transport, config),
        }
    }
}

impl<T: HttpTransport> ZohoClient<T> {
    pub fn config(&self) -> &ZohoConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &RequestDispatcher<T> {
        &self.dispatcher
    }

    /// Get a valid access token for a connection.
    pub async fn get_access_token(&self, bundle: &CredentialBundle) -> ZohoResult<AccessGrant> {
        self.dispatcher.token_provider().get_access_token(bundle).await
    }

    /// Execute one authenticated call.
    pub async fn execute(
        &self,
        request: RequestDescriptor,
        bundle: &CredentialBundle,
    ) -> ZohoResult<Value> {
        self.dispatcher.execute(request, bundle).await
    }

    /// Fetch every page of a list endpoint.
    pub async fn fetch_all(
        &self,
        request: RequestDescriptor,
        bundle: &CredentialBundle,
        result_field: &str,
    ) -> ZohoResult<Vec<Value>> {
        self.dispatcher.fetch_all(request, bundle, result_field).await
    }

    /// Base URL a product call for this connection would use.
    pub async fn base_url(&self, product: Product, bundle: &CredentialBundle) -> String {
        let api_domain = bundle.token_state().await.map(|s| s.api_domain);
        product.base_url(bundle.credentials().region(), api_domain.as_deref())
    }
}
