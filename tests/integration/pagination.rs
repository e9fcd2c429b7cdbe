//! Integration tests for list pagination

use super::*;
use integrations_zoho::{
    HttpMethod, PaginationError, RequestDescriptor, ZohoConfig, ZohoError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::query_param;

fn customers_page(ids: &[u32], has_more: bool) -> ResponseTemplate {
    let customers: Vec<Value> = ids
        .iter()
        .map(|id| json!({"customer_id": id.to_string()}))
        .collect();

    success_response(json!({
        "code": 0,
        "message": "success",
        "customers": customers,
        "page_context": {"page": 1, "has_more_page": has_more}
    }))
}

async fn mount_page(server: &MockServer, page: &str, per_page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/billing/v1/customers"))
        .and(query_param("page", page))
        .and(query_param("per_page", per_page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn customers_request(server: &MockServer) -> RequestDescriptor {
    RequestDescriptor::url(
        HttpMethod::Get,
        format!("{}/billing/v1/customers", server.uri()),
    )
    .with_organization("20060000")
}

fn ids(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["customer_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_fetch_all_three_pages() {
    let mock_server = setup_mock_server().await;
    mount_page(&mock_server, "1", "200", customers_page(&[1, 2], true)).await;
    mount_page(&mock_server, "2", "200", customers_page(&[3, 4], true)).await;
    mount_page(&mock_server, "3", "200", customers_page(&[5], false)).await;

    let bundle = valid_bundle(&mock_server, "T1");
    let records = client()
        .fetch_all(customers_request(&mock_server), &bundle, "customers")
        .await
        .unwrap();

    assert_eq!(ids(&records), vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn test_fetch_all_honors_caller_page_size() {
    let mock_server = setup_mock_server().await;
    mount_page(&mock_server, "1", "50", customers_page(&[1], true)).await;
    mount_page(&mock_server, "2", "50", customers_page(&[2], false)).await;

    let bundle = valid_bundle(&mock_server, "T1");
    let request = customers_request(&mock_server).with_query("per_page", 50);
    let records = client()
        .fetch_all(request, &bundle, "customers")
        .await
        .unwrap();

    assert_eq!(ids(&records), vec!["1", "2"]);
}

#[tokio::test]
async fn test_fetch_all_error_mid_run() {
    let mock_server = setup_mock_server().await;
    mount_page(&mock_server, "1", "200", customers_page(&[1, 2], true)).await;
    mount_page(
        &mock_server,
        "2",
        "200",
        success_response(json!({"code": 57, "message": "You are not authorized to perform this operation"})),
    )
    .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let err = client()
        .fetch_all(customers_request(&mock_server), &bundle, "customers")
        .await
        .unwrap_err();

    assert!(matches!(err, ZohoError::Api(ref api) if api.message == "You are not authorized to perform this operation"));
}

#[tokio::test]
async fn test_fetch_all_page_cap() {
    let mock_server = setup_mock_server().await;
    mount_page(&mock_server, "1", "200", customers_page(&[1], true)).await;
    mount_page(&mock_server, "2", "200", customers_page(&[2], true)).await;

    let config = ZohoConfig::builder().max_pages(2).build().unwrap();
    let client = integrations_zoho::ZohoClient::new(config).unwrap();

    let bundle = valid_bundle(&mock_server, "T1");
    let err = client
        .fetch_all(customers_request(&mock_server), &bundle, "customers")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ZohoError::Pagination(PaginationError::PageLimitExceeded { max_pages: 2 })
    ));
}

#[tokio::test]
async fn test_fetch_all_refreshes_once() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "T2", 1).await;
    mount_page(&mock_server, "1", "200", customers_page(&[1], true)).await;
    mount_page(&mock_server, "2", "200", customers_page(&[2], false)).await;

    let bundle = expired_bundle(&mock_server);
    let records = client()
        .fetch_all(customers_request(&mock_server), &bundle, "customers")
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
}
