//! Shared application state
//!
//! Aggregates the repository and service handles every handler needs.
//! Construction wires the SQLite adapters from `slotbook-infra` into the
//! ports consumed by `slotbook-core`.

use std::sync::Arc;

use slotbook_core::{
    BusyBlockRepository, CalendarIntegrationRepository, ConnectService, IntegrationLogRepository,
    OAuthProviderGateway, OrganizerRepository, SyncJobQueue, VideoIntegrationRepository,
    WebhookIntegrationRepository,
};
use slotbook_infra::database::{
    DbManager, SqliteBusyBlockRepository, SqliteCalendarIntegrationRepository,
    SqliteIntegrationLogRepository, SqliteOAuthStateRepository, SqliteOrganizerRepository,
    SqliteSyncJobRepository, SqliteVideoIntegrationRepository,
    SqliteWebhookIntegrationRepository,
};

/// Handles shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub organizers: Arc<dyn OrganizerRepository>,
    pub calendars: Arc<dyn CalendarIntegrationRepository>,
    pub videos: Arc<dyn VideoIntegrationRepository>,
    pub webhooks: Arc<dyn WebhookIntegrationRepository>,
    pub logs: Arc<dyn IntegrationLogRepository>,
    pub busy_blocks: Arc<dyn BusyBlockRepository>,
    pub jobs: Arc<dyn SyncJobQueue>,
    pub connect: Arc<ConnectService>,
}

impl AppState {
    /// Wire the SQLite repositories and connect service over a database
    /// manager and a provider gateway.
    pub fn new(db: Arc<DbManager>, gateway: Arc<dyn OAuthProviderGateway>) -> Self {
        let organizers: Arc<dyn OrganizerRepository> =
            Arc::new(SqliteOrganizerRepository::new(db.clone()));
        let calendars: Arc<dyn CalendarIntegrationRepository> =
            Arc::new(SqliteCalendarIntegrationRepository::new(db.clone()));
        let videos: Arc<dyn VideoIntegrationRepository> =
            Arc::new(SqliteVideoIntegrationRepository::new(db.clone()));
        let webhooks: Arc<dyn WebhookIntegrationRepository> =
            Arc::new(SqliteWebhookIntegrationRepository::new(db.clone()));
        let logs: Arc<dyn IntegrationLogRepository> =
            Arc::new(SqliteIntegrationLogRepository::new(db.clone()));
        let busy_blocks: Arc<dyn BusyBlockRepository> =
            Arc::new(SqliteBusyBlockRepository::new(db.clone()));
        let jobs: Arc<dyn SyncJobQueue> = Arc::new(SqliteSyncJobRepository::new(db.clone()));
        let states = Arc::new(SqliteOAuthStateRepository::new(db));

        let connect = Arc::new(ConnectService::new(
            gateway,
            states,
            calendars.clone(),
            videos.clone(),
            logs.clone(),
        ));

        Self { organizers, calendars, videos, webhooks, logs, busy_blocks, jobs, connect }
    }
}
