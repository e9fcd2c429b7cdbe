//! Integration tests for authenticated dispatch and error classification

use super::*;
use integrations_zoho::{
    ErrorKind, ErrorShape, HttpMethod, Product, RequestDescriptor, TransportError, ZohoError,
    ORGANIZATION_HEADER,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, query_param};

#[tokio::test]
async fn test_get_with_query_and_organization() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/billing/v1/plans"))
        .and(query_param("filter_by", "PlanStatus.ACTIVE"))
        .and(header("Authorization", "Zoho-oauthtoken T1"))
        .and(header(ORGANIZATION_HEADER, "20060000"))
        .respond_with(success_response(json!({
            "code": 0,
            "message": "success",
            "plans": [{"plan_code": "basic"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let request = RequestDescriptor::url(
        HttpMethod::Get,
        format!("{}/billing/v1/plans", mock_server.uri()),
    )
    .with_query("filter_by", "PlanStatus.ACTIVE")
    .with_organization("20060000");

    let body = assert_ok!(client().execute(request, &bundle).await);
    assert_eq!(body["plans"][0]["plan_code"], "basic");
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/bigin/v2/Contacts"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"data": [{"Last_Name": "Doe"}]})))
        .respond_with(success_response(json!({
            "data": [{"code": "SUCCESS", "status": "success", "details": {"id": "555"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let request = RequestDescriptor::post(
        Product::Bigin,
        "Contacts",
        json!({"data": [{"Last_Name": "Doe"}]}),
    );

    let body = assert_ok!(client().execute(request, &bundle).await);
    assert_eq!(body["data"][0]["details"]["id"], "555");
}

#[tokio::test]
async fn test_status_code_error_in_success_response() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Contacts/1"))
        .respond_with(success_response(json!({
            "code": 1002,
            "message": "Resource does not exist."
        })))
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let err = assert_err!(
        client()
            .execute(RequestDescriptor::get(Product::Bigin, "Contacts/1"), &bundle)
            .await
    );

    assert_eq!(err.kind(), ErrorKind::Api);
    match err {
        ZohoError::Api(api) => {
            assert_eq!(api.message, "Resource does not exist.");
            assert_eq!(api.status, Some(200));
            assert_eq!(api.shape, Some(ErrorShape::StatusCode { code: 1002 }));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_record_error_in_success_response() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("PUT"))
        .and(path("/bigin/v2/Deals"))
        .respond_with(success_response(json!({
            "data": [{
                "code": "INVALID_DATA",
                "status": "error",
                "message": "Invalid customer ID",
                "details": {"api_name": "Contact_Name"}
            }]
        })))
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let request = RequestDescriptor::put(Product::Bigin, "Deals", json!({"data": [{"id": "9"}]}));
    let err = assert_err!(client().execute(request, &bundle).await);

    match err {
        ZohoError::Api(api) => {
            assert_eq!(api.message, "Invalid customer ID");
            assert_eq!(
                api.shape,
                Some(ErrorShape::RecordStatus {
                    record_code: Some("INVALID_DATA".to_string())
                })
            );
            assert_eq!(api.payload.unwrap()["data"][0]["details"]["api_name"], "Contact_Name");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status_is_api_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/bigin/v2/Contacts/7"))
        .respond_with(error_response(
            404,
            json!({"code": "INVALID_URL_PATTERN", "message": "Please check if the URL trying to access is a correct one"}),
        ))
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let err = assert_err!(
        client()
            .execute(RequestDescriptor::delete(Product::Bigin, "Contacts/7"), &bundle)
            .await
    );

    match err {
        ZohoError::Api(api) => {
            assert_eq!(api.status, Some(404));
            assert_eq!(
                api.message,
                "Please check if the URL trying to access is a correct one"
            );
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_success_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/bigin/v2/Tags/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let body = assert_ok!(
        client()
            .execute(RequestDescriptor::delete(Product::Bigin, "Tags/3"), &bundle)
            .await
    );
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_non_json_success_body_is_transport_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let err = assert_err!(
        client()
            .execute(RequestDescriptor::get(Product::Bigin, "Contacts"), &bundle)
            .await
    );

    assert!(matches!(
        err,
        ZohoError::Transport(TransportError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let mock_server = setup_mock_server().await;
    let bundle = valid_bundle(&mock_server, "T1");

    let request = RequestDescriptor::url(HttpMethod::Get, "http://127.0.0.1:1/bigin/v2/Contacts");
    let err = assert_err!(client().execute(request, &bundle).await);

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_repeated_read_is_idempotent() {
    let mock_server = setup_mock_server().await;
    mount_token_refresh(&mock_server, "unused", 0).await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Pipelines"))
        .and(header("Authorization", "Zoho-oauthtoken T1"))
        .respond_with(success_response(json!({"layouts": [{"id": "42"}]})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let client = client();
    let request = RequestDescriptor::get(Product::Bigin, "Pipelines");

    let first = assert_ok!(client.execute(request.clone(), &bundle).await);
    let before = bundle.token_state().await.unwrap();
    let second = assert_ok!(client.execute(request, &bundle).await);
    let after = bundle.token_state().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(before.access_token, after.access_token);
    assert_eq!(before.refreshed_at, after.refreshed_at);
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/bigin/v2/Contacts"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/bigin/v2/Moved", mock_server.uri()).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bigin/v2/Moved"))
        .respond_with(success_response(json!({"data": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let bundle = valid_bundle(&mock_server, "T1");
    let request = RequestDescriptor::post(Product::Bigin, "Contacts", json!({"data": [{"Last_Name": "Doe"}]}));
    let err = assert_err!(client().execute(request, &bundle).await);

    match err {
        ZohoError::Api(api) => assert_eq!(api.status, Some(302)),
        other => panic!("expected ApiError, got {:?}", other),
    }
}
