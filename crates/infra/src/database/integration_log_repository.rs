//! SQLite-backed implementation of the IntegrationLogRepository port.
//!
//! The log is append-only; rows are never updated or deleted by this
//! repository.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Row, ToSql};
use slotbook_core::IntegrationLogRepository;
use slotbook_domain::{IntegrationLog, LogFilter, LogType, NewIntegrationLog, Result};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{column_json, column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

/// SQLite implementation of IntegrationLogRepository
pub struct SqliteIntegrationLogRepository {
    db: Arc<DbManager>,
}

impl SqliteIntegrationLogRepository {
    /// Create a new integration log repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IntegrationLogRepository for SqliteIntegrationLogRepository {
    #[instrument(skip(self, entry), fields(log_type = %entry.log_type))]
    async fn append(&self, entry: &NewIntegrationLog) -> Result<IntegrationLog> {
        let conn = self.db.get_connection()?;

        let id = Uuid::now_v7();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO integration_logs (
                id, organizer_id, log_type, integration_type, booking_id,
                message, details, success, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                id.to_string(),
                entry.organizer_id.to_string(),
                entry.log_type.to_string(),
                entry.integration_type,
                entry.booking_id.map(|b| b.to_string()),
                entry.message,
                entry.details.to_string(),
                entry.success,
                created_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(IntegrationLog {
            id,
            organizer_id: entry.organizer_id,
            log_type: entry.log_type,
            integration_type: entry.integration_type.clone(),
            booking_id: entry.booking_id,
            message: entry.message.clone(),
            details: entry.details.clone(),
            success: entry.success,
            created_at,
        })
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, organizer_id: Uuid, filter: &LogFilter) -> Result<Vec<IntegrationLog>> {
        let conn = self.db.get_connection()?;

        let mut sql = String::from(
            "SELECT id, organizer_id, log_type, integration_type, booking_id,
                    message, details, success, created_at
             FROM integration_logs
             WHERE organizer_id = ?1",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(organizer_id.to_string())];

        if let Some(ref log_type) = filter.log_type {
            params.push(Box::new(log_type.clone()));
            sql.push_str(&format!(" AND log_type = ?{}", params.len()));
        }
        if let Some(ref integration_type) = filter.integration_type {
            params.push(Box::new(integration_type.clone()));
            sql.push_str(&format!(" AND integration_type = ?{}", params.len()));
        }
        if let Some(success) = filter.success {
            params.push(Box::new(success));
            sql.push_str(&format!(" AND success = ?{}", params.len()));
        }

        // uuid v7 ids are time-ordered; tiebreak rows created in the same second
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                map_log_row,
            )
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed integration logs");

        Ok(rows)
    }
}

fn map_log_row(row: &Row<'_>) -> rusqlite::Result<IntegrationLog> {
    let log_type_raw: String = row.get(2)?;
    let log_type = LogType::from_str(&log_type_raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(std::io::Error::other(err.to_string())))
    })?;

    let booking_id = row
        .get::<_, Option<String>>(4)?
        .map(|raw| column_uuid(raw, 4))
        .transpose()?;

    Ok(IntegrationLog {
        id: column_uuid(row.get(0)?, 0)?,
        organizer_id: column_uuid(row.get(1)?, 1)?,
        log_type,
        integration_type: row.get(3)?,
        booking_id,
        message: row.get(5)?,
        details: column_json(row.get(6)?, 6)?,
        success: row.get(7)?,
        created_at: ts_to_datetime(row.get(8)?),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (Arc<DbManager>, Uuid, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(DbManager::new(&temp_dir.path().join("test.db"), 2).unwrap());

        let organizer_id = Uuid::now_v7();
        let conn = db.get_connection().unwrap();
        conn.execute(
            "INSERT INTO organizers (id, email, display_name, api_token, created_at)
             VALUES (?1, 'test@example.com', 'Test', 'token', ?2)",
            rusqlite::params![organizer_id.to_string(), Utc::now().timestamp()],
        )
        .unwrap();

        (db, organizer_id, temp_dir)
    }

    fn entry(organizer_id: Uuid, log_type: LogType, tag: &str, success: bool) -> NewIntegrationLog {
        NewIntegrationLog {
            organizer_id,
            log_type,
            integration_type: tag.into(),
            booking_id: None,
            message: format!("{log_type} event"),
            details: serde_json::json!({ "tag": tag }),
            success,
        }
    }

    #[tokio::test]
    async fn filters_by_type_and_success() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteIntegrationLogRepository::new(db);

        repo.append(&entry(organizer_id, LogType::OauthConnected, "google", true)).await.unwrap();
        repo.append(&entry(organizer_id, LogType::Error, "google", false)).await.unwrap();
        repo.append(&entry(organizer_id, LogType::WebhookSent, "webhook", true)).await.unwrap();

        let all = repo.list(organizer_id, &LogFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let failures = repo
            .list(
                organizer_id,
                &LogFilter { success: Some(false), ..LogFilter::default() },
            )
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].log_type, LogType::Error);

        let google = repo
            .list(
                organizer_id,
                &LogFilter { integration_type: Some("google".into()), ..LogFilter::default() },
            )
            .await
            .unwrap();
        assert_eq!(google.len(), 2);

        let connected = repo
            .list(
                organizer_id,
                &LogFilter { log_type: Some("oauth_connected".into()), ..LogFilter::default() },
            )
            .await
            .unwrap();
        assert_eq!(connected.len(), 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_owner_scoped() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteIntegrationLogRepository::new(db);

        let first =
            repo.append(&entry(organizer_id, LogType::CalendarSync, "google", true)).await.unwrap();
        let second =
            repo.append(&entry(organizer_id, LogType::CalendarSync, "google", true)).await.unwrap();

        let listed = repo.list(organizer_id, &LogFilter::default()).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        let other = repo.list(Uuid::now_v7(), &LogFilter::default()).await.unwrap();
        assert!(other.is_empty());
    }
}
