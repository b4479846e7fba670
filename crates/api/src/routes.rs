//! Route table for the integrations API

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{calendar, conflicts, health, logs, oauth, video, webhooks};
use crate::state::AppState;

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Calendar integrations
        .route("/integrations/calendar", get(calendar::list))
        .route("/integrations/calendar/conflicts", get(conflicts::calendar_conflicts))
        .route(
            "/integrations/calendar/{id}",
            get(calendar::detail).patch(calendar::update).delete(calendar::remove),
        )
        .route("/integrations/calendar/{id}/refresh", post(calendar::refresh_sync))
        .route("/integrations/calendar/{id}/force-sync", post(calendar::force_sync))
        // Video integrations
        .route("/integrations/video", get(video::list))
        .route(
            "/integrations/video/{id}",
            get(video::detail).patch(video::update).delete(video::remove),
        )
        // Webhook integrations
        .route("/integrations/webhooks", get(webhooks::list).post(webhooks::create))
        .route(
            "/integrations/webhooks/{id}",
            get(webhooks::detail).patch(webhooks::update).delete(webhooks::remove),
        )
        .route("/integrations/webhooks/{id}/test", post(webhooks::test))
        // Activity log
        .route("/integrations/logs", get(logs::list))
        // OAuth flow
        .route("/integrations/oauth/initiate", post(oauth::initiate))
        .route("/integrations/oauth/callback", post(oauth::callback))
        // Diagnostics
        .route("/integrations/health", get(health::report))
        .with_state(state)
}
