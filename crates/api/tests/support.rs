//! Shared helpers for router-level integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use slotbook_api::{build_router, AppState};
use slotbook_domain::Organizer;
use slotbook_infra::database::DbManager;
use slotbook_infra::{HttpProviderGateway, ProviderRegistry, ProviderSettings};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-token";

/// A fully wired application over a temporary database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: Arc<DbManager>,
    pub organizer: Organizer,
    _temp_dir: TempDir,
}

/// Build the app. When `provider_base` is given, the google/outlook/zoom
/// token and userinfo endpoints point at that base URL (a wiremock server).
pub async fn spawn_app(provider_base: Option<&str>) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let db = Arc::new(
        DbManager::new(&temp_dir.path().join("test.db"), 4).expect("db manager should be created"),
    );

    let registry = match provider_base {
        Some(base) => registry_against(base),
        None => ProviderRegistry::new(
            ProviderSettings::google("google-cid", "google-secret"),
            ProviderSettings::outlook("ms-cid", "ms-secret", "tenant-1"),
            ProviderSettings::zoom("zoom-cid", "zoom-secret"),
        ),
    };
    let gateway = Arc::new(HttpProviderGateway::new(registry).expect("gateway should build"));

    let state = AppState::new(db.clone(), gateway);

    let organizer = Organizer {
        id: Uuid::now_v7(),
        email: "organizer@example.com".into(),
        display_name: "Organizer".into(),
        created_at: Utc::now(),
    };
    state
        .organizers
        .create(&organizer, TEST_TOKEN)
        .await
        .expect("organizer should be created");

    let router = build_router(state.clone());

    TestApp { router, state, db, organizer, _temp_dir: temp_dir }
}

/// Provider settings with token/userinfo endpoints rewritten to the mock
/// server. Authorize endpoints keep their production values; initiate only
/// builds URLs from them.
fn registry_against(base: &str) -> ProviderRegistry {
    let mut google = ProviderSettings::google("google-cid", "google-secret");
    google.token_endpoint = format!("{base}/google/token");
    google.userinfo_endpoint = format!("{base}/google/userinfo");

    let mut outlook = ProviderSettings::outlook("ms-cid", "ms-secret", "tenant-1");
    outlook.token_endpoint = format!("{base}/ms/token");
    outlook.userinfo_endpoint = format!("{base}/ms/me");

    let mut zoom = ProviderSettings::zoom("zoom-cid", "zoom-secret");
    zoom.token_endpoint = format!("{base}/zoom/token");
    zoom.userinfo_endpoint = format!("{base}/zoom/me");

    ProviderRegistry::new(google, outlook, zoom)
}

impl TestApp {
    /// Issue an authenticated request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        self.request_with_token(method, path, body, Some(TEST_TOKEN)).await
    }

    /// Issue a request with an arbitrary (or missing) bearer token.
    pub async fn request_with_token(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should produce a response")
    }
}

/// Read a JSON response body.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Assert a status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    json_body(response).await
}
