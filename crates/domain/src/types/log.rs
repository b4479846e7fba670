//! Append-only integration activity log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SlotbookError;

/// Category of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    CalendarSync,
    VideoLinkCreated,
    WebhookSent,
    OauthConnected,
    Error,
}

impl LogType {
    /// Human-readable label, mirrored in list responses.
    pub fn display(self) -> &'static str {
        match self {
            LogType::CalendarSync => "Calendar Sync",
            LogType::VideoLinkCreated => "Video Link Created",
            LogType::WebhookSent => "Webhook Sent",
            LogType::OauthConnected => "OAuth Connected",
            LogType::Error => "Error",
        }
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            LogType::CalendarSync => "calendar_sync",
            LogType::VideoLinkCreated => "video_link_created",
            LogType::WebhookSent => "webhook_sent",
            LogType::OauthConnected => "oauth_connected",
            LogType::Error => "error",
        };
        write!(f, "{tag}")
    }
}

impl std::str::FromStr for LogType {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calendar_sync" => Ok(LogType::CalendarSync),
            "video_link_created" => Ok(LogType::VideoLinkCreated),
            "webhook_sent" => Ok(LogType::WebhookSent),
            "oauth_connected" => Ok(LogType::OauthConnected),
            "error" => Ok(LogType::Error),
            other => Err(SlotbookError::Validation(format!("unknown log type: {other}"))),
        }
    }
}

/// One audit entry. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationLog {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub log_type: LogType,
    /// Provider or integration tag the entry refers to.
    pub integration_type: String,
    pub booking_id: Option<Uuid>,
    pub message: String,
    pub details: serde_json::Value,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a new audit entry.
#[derive(Debug, Clone)]
pub struct NewIntegrationLog {
    pub organizer_id: Uuid,
    pub log_type: LogType,
    pub integration_type: String,
    pub booking_id: Option<Uuid>,
    pub message: String,
    pub details: serde_json::Value,
    pub success: bool,
}

/// Filters accepted by the log listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub log_type: Option<String>,
    pub integration_type: Option<String>,
    pub success: Option<bool>,
}
