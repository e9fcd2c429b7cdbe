//! Integration tests for the refresh-token grant

use super::*;
use integrations_zoho::{
    AuthError, CredentialStore, ErrorKind, InMemoryCredentialStore, Product, RequestDescriptor,
    ZohoError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::header;

#[tokio::test]
async fn test_expired_token_refreshes_before_call() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "T2", 1).await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Contacts"))
        .and(header("Authorization", "Zoho-oauthtoken T2"))
        .respond_with(success_response(json!({"data": [{"id": "1"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bundle = expired_bundle(&mock_server);
    let body = client()
        .execute(RequestDescriptor::get(Product::Bigin, "Contacts"), &bundle)
        .await
        .expect("call should succeed after refresh");

    assert_eq!(body["data"][0]["id"], "1");

    let state = bundle.token_state().await.unwrap();
    assert_eq!(state.access_token, "T2");
    assert_eq!(state.refresh_token.as_deref(), Some("R1"));
    assert_eq!(state.expires_in, 3600);
}

#[tokio::test]
async fn test_refresh_form_carries_client_identity() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("refresh_token=R1"))
        .and(body_string_contains("client_id=1000.TESTCLIENT"))
        .and(body_string_contains("client_secret=test-secret"))
        .respond_with(success_response(json!({
            "access_token": "T2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bundle = expired_bundle(&mock_server);
    let grant = client().get_access_token(&bundle).await.unwrap();

    assert_eq!(grant.access_token, "T2");
    // api_domain falls back to the previous one when the response omits it
    assert_eq!(grant.api_domain, mock_server.uri());
}

#[tokio::test]
async fn test_valid_token_makes_no_refresh() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "unused", 0).await;

    let bundle = valid_bundle(&mock_server, "T1");
    let client = client();

    let first = client.get_access_token(&bundle).await.unwrap();
    let second = client.get_access_token(&bundle).await.unwrap();

    assert_eq!(first.access_token, "T1");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_refresh() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "T2", 1).await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Deals"))
        .and(header("Authorization", "Zoho-oauthtoken T2"))
        .respond_with(success_response(json!({"data": []})))
        .expect(5)
        .mount(&mock_server)
        .await;

    let bundle = expired_bundle(&mock_server).shared();
    let client = Arc::new(client());

    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = Arc::clone(&client);
        let bundle = Arc::clone(&bundle);
        handles.push(tokio::spawn(async move {
            client
                .execute(RequestDescriptor::get(Product::Bigin, "Deals"), &bundle)
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn test_rejected_refresh_is_auth_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(success_response(json!({"error": "invalid_code"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(success_response(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let bundle = expired_bundle(&mock_server);
    let err = client()
        .execute(RequestDescriptor::get(Product::Bigin, "Contacts"), &bundle)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(matches!(
        err,
        ZohoError::Auth(AuthError::RefreshRejected { ref message, .. }) if message == "invalid_code"
    ));

    // The failed refresh leaves the previous state in place
    let state = bundle.token_state().await.unwrap();
    assert_eq!(state.access_token, "T1");
}

#[tokio::test]
async fn test_refresh_writes_through_to_store() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "T2", 1).await;

    let store = Arc::new(InMemoryCredentialStore::new().with_state(
        "connection-42",
        CachedTokenState::new("T1", Some("R1".to_string()), mock_server.uri(), 0),
    ));

    let bundle = CredentialBundle::from_store(
        credentials(&mock_server),
        store.clone(),
        "connection-42",
    )
    .await
    .unwrap();

    client().get_access_token(&bundle).await.unwrap();

    let stored = store.load("connection-42").await.unwrap().unwrap();
    assert_eq!(stored.access_token, "T2");
    assert_eq!(stored.refresh_token.as_deref(), Some("R1"));
}
