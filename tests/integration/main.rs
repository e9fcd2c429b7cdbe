//! Integration tests using WireMock
//!
//! These tests run the full call cycle against a mock HTTP server: token
//! refresh through the accounts endpoint, authenticated dispatch, error
//! classification and pagination.

mod dispatch;
mod pagination;
mod token_refresh;

use integrations_zoho::{CachedTokenState, ClientCredentials, CredentialBundle, ZohoClient, ZohoConfig};
use serde_json::Value;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/v2/token";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client credentials whose authority is the mock server.
pub fn credentials(server: &MockServer) -> ClientCredentials {
    ClientCredentials::new(
        format!("{}{}", server.uri(), TOKEN_PATH),
        "1000.TESTCLIENT",
        "test-secret",
        "https://app.example.com/oauth/callback",
    )
}

/// A bundle holding a still-valid token whose API domain is the mock server.
pub fn valid_bundle(server: &MockServer, access_token: &str) -> CredentialBundle {
    CredentialBundle::new(
        credentials(server),
        Some(CachedTokenState::new(
            access_token,
            Some("R1".to_string()),
            server.uri(),
            3600,
        )),
    )
}

/// A bundle that must refresh before its first call.
pub fn expired_bundle(server: &MockServer) -> CredentialBundle {
    CredentialBundle::new(
        credentials(server),
        Some(CachedTokenState::new("T1", Some("R1".to_string()), server.uri(), 0)),
    )
}

/// Client with default configuration.
pub fn client() -> ZohoClient {
    ZohoClient::new(ZohoConfig::default()).expect("Failed to build client")
}

/// Mount a successful refresh-grant response.
pub async fn mount_token_refresh(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(success_response(serde_json::json!({
            "access_token": access_token,
            "api_domain": server.uri(),
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Helper to create success response templates
pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Helper to create error response templates
pub fn error_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
