//! Organizer (authenticated account) type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account that owns integrations, logs and busy blocks.
///
/// Every API query is scoped to a single organizer; there is no
/// cross-organizer access path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organizer {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
