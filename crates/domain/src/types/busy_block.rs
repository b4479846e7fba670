//! Busy blocks: time intervals during which an organizer is unavailable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SlotbookError;

/// Where a busy block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyBlockSource {
    Manual,
    GoogleCalendar,
    OutlookCalendar,
    AppleCalendar,
}

impl BusyBlockSource {
    /// The non-manual sources, i.e. blocks mirrored from a provider sync.
    pub const SYNCED: [BusyBlockSource; 3] = [
        BusyBlockSource::GoogleCalendar,
        BusyBlockSource::OutlookCalendar,
        BusyBlockSource::AppleCalendar,
    ];
}

impl std::fmt::Display for BusyBlockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            BusyBlockSource::Manual => "manual",
            BusyBlockSource::GoogleCalendar => "google_calendar",
            BusyBlockSource::OutlookCalendar => "outlook_calendar",
            BusyBlockSource::AppleCalendar => "apple_calendar",
        };
        write!(f, "{tag}")
    }
}

impl std::str::FromStr for BusyBlockSource {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(BusyBlockSource::Manual),
            "google_calendar" => Ok(BusyBlockSource::GoogleCalendar),
            "outlook_calendar" => Ok(BusyBlockSource::OutlookCalendar),
            "apple_calendar" => Ok(BusyBlockSource::AppleCalendar),
            other => {
                Err(SlotbookError::Validation(format!("unknown busy block source: {other}")))
            }
        }
    }
}

/// A `[start, end)` interval during which the organizer is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyBlock {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub source: BusyBlockSource,
    /// Provider-side event id for synced blocks.
    pub external_id: Option<String>,
    pub reason: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
