//! Integration tests for the CRM client
//! Runs the client against a mocked Zoho API

use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoho_crm_sdk::*;

fn config_for(server: &MockServer) -> CrmConfig {
    CrmConfig {
        api_domain: server.uri(),
        accounts_url: server.uri(),
        access_token: Some("1000.test-token".to_string()),
        ..CrmConfig::default()
    }
}

/// Setup mock CRM server with a one-record Leads page
async fn setup_mock_api() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crm/v2/Leads"))
        .and(query_param("page", "0"))
        .and(query_param("per_page", "1"))
        .and(header("authorization", "Zoho-oauthtoken 1000.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "id": "4150868000000224005", "Last_Name": "Smith" }],
            "info": { "per_page": 1, "count": 1, "page": 1, "more_records": true }
        })))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_get_records() {
    let server = setup_mock_api().await;
    let client = ZohoCrmClient::initialize(&config_for(&server)).await.unwrap();

    let response = client
        .get_records(&RecordsRequest::new("Leads", 0, 1))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"][0]["Last_Name"], "Smith");
}

#[tokio::test]
async fn test_empty_module_is_null_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v2/Deals"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ZohoCrmClient::initialize(&config_for(&server)).await.unwrap();
    let response = client
        .get_records(&RecordsRequest::new("Deals", 0, 1))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
    assert_eq!(response.body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_invalid_token_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"code":"INVALID_TOKEN","details":{},"message":"invalid oauth token","status":"error"}"#,
        ))
        .mount(&server)
        .await;

    let client = ZohoCrmClient::initialize(&config_for(&server)).await.unwrap();
    let err = client
        .get_records(&RecordsRequest::new("Leads", 0, 1))
        .await
        .unwrap_err();

    match err {
        ApiError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("INVALID_TOKEN"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = ZohoCrmClient::initialize(&config_for(&server)).await.unwrap();
    let err = client
        .get_records(&RecordsRequest::new("Leads", 0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::RateLimited));
}

#[tokio::test]
async fn test_refresh_token_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1000.refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "1000.fresh",
            "api_domain": "https://www.zohoapis.com",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crm/v2/Leads"))
        .and(header("authorization", "Zoho-oauthtoken 1000.fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    let config = CrmConfig {
        access_token: None,
        refresh_token: Some("1000.refresh".to_string()),
        client_id: Some("1000.client".to_string()),
        client_secret: Some("secret".to_string()),
        ..config_for(&server)
    };
    let client = ZohoCrmClient::initialize(&config).await.unwrap();
    let response = client
        .get_records(&RecordsRequest::new("Leads", 0, 1))
        .await
        .unwrap();
    assert_eq!(response.body, serde_json::json!({ "data": [] }));
}

#[tokio::test]
async fn test_refresh_token_rejected_fails_initialize() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "invalid_code"
        })))
        .mount(&server)
        .await;

    let config = CrmConfig {
        access_token: None,
        refresh_token: Some("1000.revoked".to_string()),
        client_id: Some("1000.client".to_string()),
        client_secret: Some("secret".to_string()),
        ..config_for(&server)
    };
    match ZohoCrmClient::initialize(&config).await {
        Err(ApiError::Auth(message)) => assert_eq!(message, "invalid_code"),
        other => panic!("expected auth failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_coql_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crm/v2/coql"))
        .and(body_json(serde_json::json!({
            "select_query": "select Last_Name from Leads where Last_Name is not null limit 2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "Last_Name": "Smith" }, { "Last_Name": "Jones" }],
            "info": { "count": 2, "more_records": false }
        })))
        .mount(&server)
        .await;

    let client = ZohoCrmClient::initialize(&config_for(&server)).await.unwrap();
    let query = CoqlQuery::select(["Last_Name"])
        .from("Leads")
        .filter("Last_Name is not null")
        .limit(2)
        .build()
        .unwrap();

    let response = client.coql_query(&query).await.unwrap();
    assert_eq!(response.body["info"]["count"], 2);
}

#[tokio::test]
async fn test_probe_against_live_shaped_api() {
    let server = setup_mock_api().await;
    let client = Arc::new(ZohoCrmClient::initialize(&config_for(&server)).await.unwrap());

    let result = Probe::new(client).run().await;
    assert!(result.is_success());
    assert!(result.payload().starts_with(r#"{"data":[{"#));
}

#[tokio::test]
async fn test_probe_timeout_on_hung_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(5))
                .set_body_json(serde_json::json!({ "data": [] })),
        )
        .mount(&server)
        .await;

    let client = Arc::new(ZohoCrmClient::initialize(&config_for(&server)).await.unwrap());
    let probe = Probe::new(client).with_timeout(std::time::Duration::from_millis(200));

    let result = probe.run().await;
    assert_eq!(
        result,
        ProbeResult::Failure("request timed out after 200ms".to_string())
    );
}
