//! Integration health report types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health of a single integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Aggregate health across all of an organizer's integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    Healthy,
    Degraded,
}

/// Health summary for one calendar integration.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarIntegrationHealth {
    pub provider: String,
    pub is_active: bool,
    pub sync_enabled: bool,
    pub token_expired: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub sync_errors: i64,
    pub health: HealthStatus,
}

/// Health summary for one video integration.
#[derive(Debug, Clone, Serialize)]
pub struct VideoIntegrationHealth {
    pub provider: String,
    pub is_active: bool,
    pub auto_generate_links: bool,
    pub token_expired: bool,
    pub api_calls_today: i64,
    pub health: HealthStatus,
}

/// Full report returned by `GET /integrations/health`.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationHealthReport {
    pub organizer_email: String,
    pub timestamp: DateTime<Utc>,
    pub calendar_integrations: Vec<CalendarIntegrationHealth>,
    pub video_integrations: Vec<VideoIntegrationHealth>,
    pub overall_health: OverallHealth,
}
