//! Fire-and-forget job records handed to the external sync worker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SlotbookError;

/// Kind of work a queued job describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobType {
    CalendarSync,
    WebhookDelivery,
}

impl std::fmt::Display for SyncJobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncJobType::CalendarSync => write!(f, "calendar_sync"),
            SyncJobType::WebhookDelivery => write!(f, "webhook_delivery"),
        }
    }
}

impl std::str::FromStr for SyncJobType {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calendar_sync" => Ok(SyncJobType::CalendarSync),
            "webhook_delivery" => Ok(SyncJobType::WebhookDelivery),
            other => Err(SlotbookError::Validation(format!("unknown sync job type: {other}"))),
        }
    }
}

/// Processing state of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncJobStatus::Pending => write!(f, "pending"),
            SyncJobStatus::Completed => write!(f, "completed"),
            SyncJobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for SyncJobStatus {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SyncJobStatus::Pending),
            "completed" => Ok(SyncJobStatus::Completed),
            "failed" => Ok(SyncJobStatus::Failed),
            other => {
                Err(SlotbookError::Validation(format!("unknown sync job status: {other}")))
            }
        }
    }
}

/// One queued unit of background work.
///
/// The API only enqueues; dequeue and status transitions belong to the
/// external worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: Uuid,
    pub job_type: SyncJobType,
    pub payload: serde_json::Value,
    pub status: SyncJobStatus,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SyncJob {
    /// Build a fresh pending job.
    pub fn new(job_type: SyncJobType, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            job_type,
            payload,
            status: SyncJobStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
        }
    }
}
