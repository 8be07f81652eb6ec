//! Request execution against a real HTTP server: headers, status handling,
//! decoding and transport failures.

mod common;

use common::{client_for, config_for};
use gitter_stream::traits::Method;
use gitter_stream::{ApiError, ClientConfig, ErrorCategory, GitterClient, RequestExecutor};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let rooms = client_for(&server, Some("abc")).rooms().await.unwrap();
    assert!(rooms.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client_for(&server, None).rooms().await.unwrap();
    client_for(&server, Some("   ")).rooms().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert!(request.headers.get("authorization").is_none());
    }
}

#[tokio::test]
async fn test_status_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"Unauthorized\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("bad")).current_user().await.unwrap_err();
    match &err {
        ApiError::HttpStatus { status, body, url } => {
            assert_eq!(*status, 401);
            assert!(body.contains("Unauthorized"));
            assert!(url.ends_with("/v1/user"));
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
    assert!(err.is_auth_error());
    assert_eq!(err.category(), ErrorCategory::Auth);
}

#[tokio::test]
async fn test_server_error_is_retryable_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("abc")).rooms().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.category().is_retryable());
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("abc")).rooms().await.unwrap_err();
    match err {
        ApiError::Decode { preview, .. } => assert_eq!(preview, "<html>oops</html>"),
        other => panic!("Expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server, Some("abc"))
        .with_request_timeout(Some(Duration::from_millis(100)));
    let err = GitterClient::new(config).rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let config = ClientConfig::new()
        .with_api_base_url("http://127.0.0.1:1/v1/")
        .with_token("abc");
    let err = GitterClient::new(config).rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Connection { .. }), "got {:?}", err);
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn test_executor_can_be_used_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/anything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 7})))
        .mount(&server)
        .await;

    #[derive(serde::Deserialize)]
    struct Payload {
        value: u32,
    }

    let executor = RequestExecutor::new(config_for(&server, None));
    let url = format!("{}/v1/anything", server.uri());
    let payload: Payload = executor.execute(Method::Get, &url, None).await.unwrap();
    assert_eq!(payload.value, 7);
}
