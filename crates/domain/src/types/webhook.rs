//! Webhook integration records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outbound webhook endpoint registered by an organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookIntegration {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub name: String,
    pub webhook_url: String,
    /// Booking events this endpoint subscribes to.
    pub events: Vec<String>,
    pub secret_key: Option<String>,
    /// Static headers attached to every delivery.
    pub headers: BTreeMap<String, String>,
    pub is_active: bool,
    pub retry_failed: bool,
    pub max_retries: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a webhook integration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWebhookIntegration {
    pub name: String,
    pub webhook_url: String,
    pub events: Vec<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub retry_failed: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: i64,
}

/// Partial update payload for a webhook integration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookIntegrationUpdate {
    pub name: Option<String>,
    pub webhook_url: Option<String>,
    pub events: Option<Vec<String>>,
    pub secret_key: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub is_active: Option<bool>,
    pub retry_failed: Option<bool>,
    pub max_retries: Option<i64>,
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> i64 {
    3
}
