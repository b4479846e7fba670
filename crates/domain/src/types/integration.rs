//! Calendar and video conference integration records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A connected external calendar account.
///
/// At most one row exists per `(organizer, provider)` pair; the OAuth
/// callback upserts into that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarIntegration {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub provider_user_id: String,
    pub provider_email: String,
    pub calendar_id: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub sync_errors: i64,
    pub is_active: bool,
    pub sync_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarIntegration {
    /// Whether the stored access token has passed its expiry timestamp.
    pub fn is_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|expires| expires <= now)
    }

    /// Display label for the provider tag.
    pub fn provider_display(&self) -> &str {
        match self.provider.as_str() {
            "google" => "Google Calendar",
            "outlook" => "Microsoft Outlook",
            "apple" => "Apple Calendar",
            other => other,
        }
    }
}

/// A connected video-conferencing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoIntegration {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub provider_user_id: String,
    pub provider_email: String,
    pub api_calls_today: i64,
    pub is_active: bool,
    pub auto_generate_links: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoIntegration {
    /// Whether the stored access token has passed its expiry timestamp.
    pub fn is_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|expires| expires <= now)
    }

    /// Display label for the provider tag.
    pub fn provider_display(&self) -> &str {
        match self.provider.as_str() {
            "zoom" => "Zoom",
            "google_meet" | "google" => "Google Meet",
            "microsoft_teams" | "outlook" => "Microsoft Teams",
            "webex" => "Cisco Webex",
            other => other,
        }
    }
}

/// Token material and provider identity written by the OAuth callback.
///
/// `token_expires_at` is computed by the connect service as
/// `now + expires_in` (with the domain default when the provider omits
/// `expires_in`), so every store implementation applies identical expiry
/// semantics.
#[derive(Debug, Clone)]
pub struct IntegrationUpsert {
    pub provider: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: DateTime<Utc>,
    pub provider_user_id: String,
    pub provider_email: String,
}

/// Mutable settings of a calendar integration (`PATCH` body).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarIntegrationSettings {
    pub is_active: Option<bool>,
    pub sync_enabled: Option<bool>,
}

/// Mutable settings of a video integration (`PATCH` body).
#[derive(Debug, Clone, Deserialize)]
pub struct VideoIntegrationSettings {
    pub is_active: Option<bool>,
    pub auto_generate_links: Option<bool>,
}
