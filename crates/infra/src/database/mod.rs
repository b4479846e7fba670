//! SQLite persistence layer
//!
//! One repository struct per aggregate, all sharing the pooled
//! [`DbManager`]. Timestamps are stored as epoch seconds, ids and JSON
//! payloads as TEXT.

pub mod busy_block_repository;
pub mod calendar_integration_repository;
pub mod integration_log_repository;
pub mod manager;
pub mod oauth_state_repository;
pub mod organizer_repository;
pub mod sync_job_repository;
pub mod video_integration_repository;
pub mod webhook_integration_repository;

pub use busy_block_repository::SqliteBusyBlockRepository;
pub use calendar_integration_repository::SqliteCalendarIntegrationRepository;
pub use integration_log_repository::SqliteIntegrationLogRepository;
pub use manager::DbManager;
pub use oauth_state_repository::SqliteOAuthStateRepository;
pub use organizer_repository::SqliteOrganizerRepository;
pub use sync_job_repository::SqliteSyncJobRepository;
pub use video_integration_repository::SqliteVideoIntegrationRepository;
pub use webhook_integration_repository::SqliteWebhookIntegrationRepository;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Convert an epoch-seconds column value back into a UTC timestamp.
pub(crate) fn ts_to_datetime(value: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(value, 0).single().unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse a TEXT uuid column, reporting a conversion failure on bad data.
pub(crate) fn column_uuid(value: String, idx: usize) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
    })
}

/// Parse a TEXT JSON column, reporting a conversion failure on bad data.
pub(crate) fn column_json(value: String, idx: usize) -> rusqlite::Result<serde_json::Value> {
    serde_json::from_str(&value).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
    })
}
