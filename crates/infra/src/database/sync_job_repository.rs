//! SQLite-backed implementation of the SyncJobQueue port.
//!
//! The API process only enqueues; dequeue and the status transitions are
//! exercised by the external worker. Queries run on the blocking pool so a
//! slow disk never stalls the request executor.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::Row;
use slotbook_core::SyncJobQueue;
use slotbook_domain::{Result, SlotbookError, SyncJob, SyncJobStatus, SyncJobType};
use tokio::task;
use tracing::instrument;
use uuid::Uuid;

use super::{column_json, column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

/// SQLite implementation of SyncJobQueue
pub struct SqliteSyncJobRepository {
    db: Arc<DbManager>,
}

impl SqliteSyncJobRepository {
    /// Create a new sync job repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncJobQueue for SqliteSyncJobRepository {
    #[instrument(skip(self, job), fields(job_type = %job.job_type))]
    async fn enqueue(&self, job: &SyncJob) -> Result<()> {
        let db = Arc::clone(&self.db);
        let job = job.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sync_jobs (
                    id, job_type, payload_json, status, attempts, last_error, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    job.id.to_string(),
                    job.job_type.to_string(),
                    job.payload.to_string(),
                    job.status.to_string(),
                    job.attempts,
                    job.last_error,
                    job.created_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn dequeue_batch(&self, limit: usize) -> Result<Vec<SyncJob>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<SyncJob>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, job_type, payload_json, status, attempts, last_error, created_at
                     FROM sync_jobs
                     WHERE status = 'pending'
                     ORDER BY created_at ASC, id ASC
                     LIMIT ?1",
                )
                .map_err(InfraError::from)?;

            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows = stmt
                .query_map([limit], map_job_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        self.transition(id, SyncJobStatus::Completed, None).await
    }

    #[instrument(skip(self, error))]
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()> {
        self.transition(id, SyncJobStatus::Failed, Some(error.to_string())).await
    }
}

impl SqliteSyncJobRepository {
    async fn transition(
        &self,
        id: Uuid,
        status: SyncJobStatus,
        error: Option<String>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE sync_jobs SET
                        status = ?2,
                        attempts = attempts + 1,
                        last_error = ?3
                     WHERE id = ?1",
                    rusqlite::params![id.to_string(), status.to_string(), error],
                )
                .map_err(InfraError::from)?;

            if changed == 0 {
                return Err(SlotbookError::NotFound(format!("sync job not found: {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_job_row(row: &Row<'_>) -> rusqlite::Result<SyncJob> {
    let job_type_raw: String = row.get(1)?;
    let job_type = SyncJobType::from_str(&job_type_raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(std::io::Error::other(err.to_string())),
        )
    })?;

    let status_raw: String = row.get(3)?;
    let status = SyncJobStatus::from_str(&status_raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(std::io::Error::other(err.to_string())),
        )
    })?;

    Ok(SyncJob {
        id: column_uuid(row.get(0)?, 0)?,
        job_type,
        payload: column_json(row.get(2)?, 2)?,
        status,
        attempts: row.get(4)?,
        last_error: row.get(5)?,
        created_at: ts_to_datetime(row.get(6)?),
    })
}

fn map_join_error(err: task::JoinError) -> SlotbookError {
    SlotbookError::Internal(format!("blocking task failed: {err}"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteSyncJobRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(DbManager::new(&temp_dir.path().join("test.db"), 2).unwrap());
        (SqliteSyncJobRepository::new(db), temp_dir)
    }

    #[tokio::test]
    async fn enqueue_and_dequeue_oldest_first() {
        let (repo, _temp) = setup();

        let first = SyncJob::new(
            SyncJobType::CalendarSync,
            serde_json::json!({ "integration_id": "a" }),
        );
        let second = SyncJob::new(
            SyncJobType::WebhookDelivery,
            serde_json::json!({ "webhook_id": "b" }),
        );

        repo.enqueue(&first).await.unwrap();
        repo.enqueue(&second).await.unwrap();

        let batch = repo.dequeue_batch(10).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, first.id);
        assert_eq!(batch[1].id, second.id);

        assert!(repo.dequeue_batch(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_jobs_leave_the_pending_queue() {
        let (repo, _temp) = setup();

        let job = SyncJob::new(SyncJobType::CalendarSync, serde_json::json!({}));
        repo.enqueue(&job).await.unwrap();

        repo.mark_completed(job.id).await.unwrap();
        assert!(repo.dequeue_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_jobs_record_the_error() {
        let (repo, _temp) = setup();

        let job = SyncJob::new(SyncJobType::WebhookDelivery, serde_json::json!({}));
        repo.enqueue(&job).await.unwrap();
        repo.mark_failed(job.id, "connection refused").await.unwrap();

        assert!(repo.dequeue_batch(10).await.unwrap().is_empty());

        let err = repo.mark_completed(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SlotbookError::NotFound(_)));
    }
}
