//! End-to-end OAuth connect flow against stubbed providers

mod support;

use axum::http::StatusCode;
use support::{expect_json, spawn_app};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn initiate_body(provider: &str, integration_type: &str) -> serde_json::Value {
    serde_json::json!({
        "provider": provider,
        "integration_type": integration_type,
        "redirect_uri": "https://app.example.com/oauth/done",
    })
}

fn callback_body(provider: &str, integration_type: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "provider": provider,
        "integration_type": integration_type,
        "code": "auth-code",
        "state": state,
        "redirect_uri": "https://app.example.com/oauth/done",
    })
}

async fn mount_google_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/google/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
            "refresh_token": "refresh",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/google/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u1",
            "email": "a@b.com",
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn google_calendar_connect_flow_end_to_end() {
    let server = MockServer::start().await;
    mount_google_success(&server).await;
    let app = spawn_app(Some(&server.uri())).await;

    // Initiate: authorization URL plus a state token bound to the pair.
    let response =
        app.request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "calendar"))).await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["provider"], "google");
    assert_eq!(body["integration_type"], "calendar");

    let state = body["state"].as_str().unwrap().to_string();
    let parts: Vec<&str> = state.splitn(3, ':').collect();
    assert_eq!(parts[0], "google");
    assert_eq!(parts[1], "calendar");
    assert_eq!(parts[2].len(), 32);

    let auth_url = body["authorization_url"].as_str().unwrap();
    assert!(auth_url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(auth_url.contains("access_type=offline"));
    assert!(auth_url.contains("prompt=consent"));

    // Callback: exchanges the code, fetches identity, upserts the record.
    let response = app
        .request("POST", "/integrations/oauth/callback", Some(callback_body("google", "calendar", &state)))
        .await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["message"], "Google calendar integration connected successfully");
    assert_eq!(body["provider_email"], "a@b.com");
    assert_eq!(body["created"], true);

    // The integration is listed, active, with sync enabled.
    let response = app.request("GET", "/integrations/calendar", None).await;
    let listed = expect_json(response, StatusCode::OK).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["provider"], "google");
    assert_eq!(listed[0]["provider_email"], "a@b.com");
    assert_eq!(listed[0]["is_active"], true);
    assert_eq!(listed[0]["sync_enabled"], true);
    assert_eq!(listed[0]["is_token_expired"], false);

    // The completion left an audit entry.
    let response =
        app.request("GET", "/integrations/logs?log_type=oauth_connected", None).await;
    let logs = expect_json(response, StatusCode::OK).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["success"], true);
    assert_eq!(logs[0]["details"]["created"], true);
}

#[tokio::test]
async fn repeat_connect_updates_instead_of_creating() {
    let server = MockServer::start().await;
    mount_google_success(&server).await;
    let app = spawn_app(Some(&server.uri())).await;

    for expected_created in [true, false] {
        let response = app
            .request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "calendar")))
            .await;
        let body = expect_json(response, StatusCode::OK).await;
        let state = body["state"].as_str().unwrap().to_string();

        let response = app
            .request(
                "POST",
                "/integrations/oauth/callback",
                Some(callback_body("google", "calendar", &state)),
            )
            .await;
        let body = expect_json(response, StatusCode::OK).await;
        assert_eq!(body["created"], expected_created);
    }

    let response = app.request("GET", "/integrations/calendar", None).await;
    let listed = expect_json(response, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn mismatched_state_rejects_without_provider_calls_or_persistence() {
    let server = MockServer::start().await;
    // No token exchange may happen at all.
    Mock::given(method("POST"))
        .and(path("/google/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = spawn_app(Some(&server.uri())).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "calendar")))
        .await;
    expect_json(response, StatusCode::OK).await;

    let response = app
        .request(
            "POST",
            "/integrations/oauth/callback",
            Some(callback_body("google", "calendar", "google:calendar:deadbeef")),
        )
        .await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid state parameter");

    let response = app.request("GET", "/integrations/calendar", None).await;
    let listed = expect_json(response, StatusCode::OK).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_state_is_rejected() {
    let app = spawn_app(None).await;

    let response = app
        .request(
            "POST",
            "/integrations/oauth/callback",
            Some(serde_json::json!({
                "provider": "google",
                "integration_type": "calendar",
                "code": "auth-code",
                "redirect_uri": "https://app.example.com/oauth/done",
            })),
        )
        .await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Invalid state parameter");
}

#[tokio::test]
async fn consumed_state_cannot_be_replayed() {
    let server = MockServer::start().await;
    mount_google_success(&server).await;
    let app = spawn_app(Some(&server.uri())).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "calendar")))
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let state = body["state"].as_str().unwrap().to_string();

    let response = app
        .request("POST", "/integrations/oauth/callback", Some(callback_body("google", "calendar", &state)))
        .await;
    expect_json(response, StatusCode::OK).await;

    let response = app
        .request("POST", "/integrations/oauth/callback", Some(callback_body("google", "calendar", &state)))
        .await;
    expect_json(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn unsupported_provider_is_rejected_at_initiate() {
    let app = spawn_app(None).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("slack", "calendar")))
        .await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Provider slack not supported");
}

#[tokio::test]
async fn unknown_integration_type_is_rejected() {
    let app = spawn_app(None).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "contacts")))
        .await;
    expect_json(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn failed_exchange_surfaces_provider_error_and_logs_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/google/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(&server)
        .await;
    let app = spawn_app(Some(&server.uri())).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("google", "calendar")))
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let state = body["state"].as_str().unwrap().to_string();

    let response = app
        .request("POST", "/integrations/oauth/callback", Some(callback_body("google", "calendar", &state)))
        .await;
    let body = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Failed to complete OAuth flow"));
    assert!(message.contains("invalid_grant"));

    // No record was created, and the failure was audited.
    let response = app.request("GET", "/integrations/calendar", None).await;
    let listed = expect_json(response, StatusCode::OK).await;
    assert!(listed.as_array().unwrap().is_empty());

    let response = app.request("GET", "/integrations/logs?success=false", None).await;
    let logs = expect_json(response, StatusCode::OK).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["log_type"], "error");
}

#[tokio::test]
async fn zoom_video_connect_creates_video_integration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zoom/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ztok",
            "refresh_token": "zrefresh",
            "expires_in": 3599,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zoom/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "z1",
            "email": "host@example.com",
        })))
        .mount(&server)
        .await;
    let app = spawn_app(Some(&server.uri())).await;

    let response = app
        .request("POST", "/integrations/oauth/initiate", Some(initiate_body("zoom", "video")))
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let state = body["state"].as_str().unwrap().to_string();

    let auth_url = body["authorization_url"].as_str().unwrap();
    assert!(auth_url.starts_with("https://zoom.us/oauth/authorize?"));
    assert!(!auth_url.contains("scope="));

    let response = app
        .request("POST", "/integrations/oauth/callback", Some(callback_body("zoom", "video", &state)))
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["created"], true);
    assert_eq!(body["provider_email"], "host@example.com");

    let response = app.request("GET", "/integrations/video", None).await;
    let listed = expect_json(response, StatusCode::OK).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["provider"], "zoom");
    assert_eq!(listed[0]["auto_generate_links"], true);
}
