//! Request Dispatcher
//!
//! Makes one authenticated call: token → URL → transport → classification.
//! Transport failures surface as [`TransportError`], application failures
//! reported inside a received body as [`ApiError`]. Nothing is retried here.

use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::classify::classify;
use crate::config::ZohoConfig;
use crate::core::{HttpRequest, HttpResponse, HttpTransport};
use crate::endpoint::{join_url, ORGANIZATION_HEADER};
use crate::error::{ApiError, TransportError, ValidationError, ZohoError, ZohoResult};
use crate::observability::redact_url;
use crate::pagination::Paginator;
use crate::token::{AccessGrant, CredentialBundle, DefaultTokenProvider, TokenProvider};
use crate::types::{RequestDescriptor, RequestTarget};

/// Composes token retrieval, URL resolution, transport and classification.
pub struct RequestDispatcher<T: HttpTransport> {
    transport: Arc<T>,
    token_provider: Arc<dyn TokenProvider>,
    config: ZohoConfig,
}

impl<T: HttpTransport + 'static> RequestDispatcher<T> {
    /// Create a dispatcher whose token refreshes go through the same transport.
    pub fn new(transport: Arc<T>, config: ZohoConfig) -> Self {
        let token_provider = Arc::new(DefaultTokenProvider::new(
            Arc::clone(&transport),
            config.timeout,
        ));

        Self {
            transport,
            token_provider,
            config,
        }
    }
}

impl<T: HttpTransport> RequestDispatcher<T> {
    /// Create a dispatcher with a custom token provider.
    pub fn with_token_provider(
        transport: Arc<T>,
        token_provider: Arc<dyn TokenProvider>,
        config: ZohoConfig,
    ) -> Self {
        Self {
            transport,
            token_provider,
            config,
        }
    }

    pub fn config(&self) -> &ZohoConfig {
        &self.config
    }

    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        &self.token_provider
    }

    /// Execute one authenticated call and return the response body.
    #[instrument(skip(self, request, bundle), fields(method = %request.method, product = ?request.product()))]
    pub async fn execute(
        &self,
        request: RequestDescriptor,
        bundle: &CredentialBundle,
    ) -> ZohoResult<Value> {
        let grant = self.token_provider.get_access_token(bundle).await?;
        let http_request = self.build_request(&request, bundle, &grant)?;

        debug!(url = %redact_url(&http_request.url), "Sending request");

        let response = self.transport.send(http_request).await.map_err(|e| {
            warn!(error = %e, "Transport failure");
            ZohoError::Transport(e)
        })?;

        interpret_response(response)
    }

    /// Fetch every page of a list endpoint and return the concatenated
    /// records found under `result_field`.
    #[instrument(skip(self, request, bundle), fields(product = ?request.product()))]
    pub async fn fetch_all(
        &self,
        request: RequestDescriptor,
        bundle: &CredentialBundle,
        result_field: &str,
    ) -> ZohoResult<Vec<Value>> {
        let paginator =
            Paginator::new(self.config.default_page_size).with_max_pages(self.config.max_pages);
        let initial_query = request.query.clone();

        paginator
            .fetch_all(
                |query| {
                    self.execute(request.clone().with_query_map(query), bundle)
                        .boxed()
                },
                initial_query,
                result_field,
            )
            .await
    }

    /// Resolve the fully-qualified URL of a request, query included.
    pub fn resolve_url(
        &self,
        request: &RequestDescriptor,
        bundle: &CredentialBundle,
        grant: &AccessGrant,
    ) -> ZohoResult<Url> {
        let raw = match &request.target {
            RequestTarget::Product { product, path } => {
                let base = product.base_url(
                    bundle.credentials().region(),
                    Some(grant.api_domain.as_str()),
                );
                join_url(&base, path)
            }
            RequestTarget::Url(url) => url.clone(),
        };

        let mut url = Url::parse(&raw).map_err(|_| TransportError::InvalidUrl { url: raw.clone() })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(url)
    }

    fn build_request(
        &self,
        request: &RequestDescriptor,
        bundle: &CredentialBundle,
        grant: &AccessGrant,
    ) -> ZohoResult<HttpRequest> {
        let url = self.resolve_url(request, bundle, grant)?;

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), grant.authorization_header());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("User-Agent".to_string(), self.config.user_agent.clone());

        match &request.organization_id {
            Some(organization_id) => {
                headers.insert(ORGANIZATION_HEADER.to_string(), organization_id.clone());
            }
            None => {
                if request.product().is_some_and(|p| p.requires_organization()) {
                    debug!("No organization id supplied for an organization-scoped product");
                }
            }
        }

        let body = match (&request.body, request.method.allows_body()) {
            (Some(body), true) => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                Some(serde_json::to_string(body).map_err(|e| ValidationError::InvalidJson {
                    field: "body".to_string(),
                    message: e.to_string(),
                })?)
            }
            _ => None,
        };

        Ok(HttpRequest {
            method: request.method,
            url: url.into(),
            headers,
            body,
            timeout: Some(self.config.timeout),
        })
    }
}

/// Turn a received response into a body or a classified error.
pub fn interpret_response(response: HttpResponse) -> ZohoResult<Value> {
    let status = response.status;
    let success = response.is_success();
    let text = response.body.trim();

    if text.is_empty() {
        if success {
            return Ok(Value::Null);
        }
        return Err(ApiError::new(format!("HTTP {}", status))
            .with_status(status)
            .into());
    }

    let body: Value = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(e) if success => {
            return Err(TransportError::MalformedResponse {
                message: format!("response body is not JSON: {}", e),
            }
            .into())
        }
        Err(_) => {
            return Err(ApiError::new(format!("HTTP {}", status))
                .with_status(status)
                .with_payload(Value::String(text.to_string()))
                .into())
        }
    };

    if let Some(error) = classify(&body).into_api_error(&body) {
        warn!(status, error = %error.message, "Application error reported by the API");
        return Err(error.with_status(status).into());
    }

    if !success {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {}", status));
        warn!(status, error = %message, "Request failed");
        return Err(ApiError::new(message)
            .with_status(status)
            .with_payload(body)
            .into());
    }

    Ok(body)
}
