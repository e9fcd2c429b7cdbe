//! Zoho Integration Module
//!
//! Authenticated request dispatch for the Zoho product suite: Bigin
//! (CRM-lite), Billing (subscriptions), Calendar and Projects (tasks).
//! Each product has its own base URL scheme, tenant header and error
//! convention; this crate hides those behind one calling contract.
//!
//! # Features
//!
//! - OAuth2 refresh-token grant with a shared, single-flight token cache
//! - Regional base URL resolution for the five Zoho data centers
//! - Classification of application errors reported inside 2xx responses
//! - `page`/`per_page` pagination aggregation
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_zoho::{
//!     CachedTokenState, ClientCredentials, CredentialBundle, Product, RequestDescriptor,
//!     ZohoClient, ZohoConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ZohoClient::new(ZohoConfig::default())?;
//!
//!     let bundle = CredentialBundle::new(
//!         ClientCredentials::new(
//!             "https://accounts.zoho.eu/oauth/v2/token",
//!             "1000.CLIENTID",
//!             "client-secret",
//!             "https://myapp.example.com/oauth/callback",
//!         ),
//!         Some(CachedTokenState::new("", Some("1000.refresh".into()), "", 0)),
//!     )
//!     .shared();
//!
//!     let customers = client
//!         .fetch_all(
//!             RequestDescriptor::get(Product::Billing, "customers").with_organization("20060000"),
//!             &bundle,
//!             "customers",
//!         )
//!         .await?;
//!
//!     println!("{} customers", customers.len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: credential, token and request descriptor types
//! - `error`: error taxonomy (auth, transport, API, validation)
//! - `core`: HTTP transport
//! - `token`: credential bundle, token provider, persistence hook
//! - `endpoint`: region and product base URL resolution
//! - `classify`: application error detection in response bodies
//! - `dispatch`: one authenticated call
//! - `pagination`: page aggregation for list endpoints
//! - `client`: high-level client combining all functionality

pub mod classify;
pub mod client;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod observability;
pub mod pagination;
pub mod token;
pub mod types;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 200;

// Re-export main client
pub use client::ZohoClient;

// Re-export configuration
pub use config::{ZohoConfig, ZohoConfigBuilder};

// Re-export errors
pub use error::{
    get_user_message, ApiError, AuthError, ConfigurationError, ErrorKind, PaginationError,
    TransportError, ValidationError, ZohoError, ZohoResult,
};

// Re-export types
pub use types::{
    parse_json_field, parse_query_pairs, CachedTokenState, ClientCredentials, Query,
    RequestDescriptor, RequestTarget, TokenResponse,
};

// Re-export core components
pub use core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export token management
pub use token::{
    AccessGrant, CredentialBundle, CredentialStore, DefaultTokenProvider, InMemoryCredentialStore,
    TokenProvider, AUTHORIZATION_SCHEME,
};

// Re-export endpoint resolution
pub use endpoint::{resolve_base_url, Product, Region, ORGANIZATION_HEADER};

// Re-export classification, dispatch and pagination
pub use classify::{classify, Classification, ErrorShape, ErrorSignal};
pub use dispatch::{interpret_response, RequestDispatcher};
pub use pagination::{fetch_all, has_more_page, PageCursor, Paginator};
