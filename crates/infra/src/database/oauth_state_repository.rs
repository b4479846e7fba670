//! SQLite-backed implementation of the OAuthStateStore port.
//!
//! One pending state per `(organizer, provider, integration_type)` key;
//! issuing overwrites, validating consumes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::OptionalExtension;
use slotbook_core::OAuthStateStore;
use slotbook_domain::{IntegrationType, Provider, Result};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of OAuthStateStore
pub struct SqliteOAuthStateRepository {
    db: Arc<DbManager>,
}

impl SqliteOAuthStateRepository {
    /// Create a new OAuth state repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OAuthStateStore for SqliteOAuthStateRepository {
    #[instrument(skip(self, state))]
    async fn put(
        &self,
        organizer_id: Uuid,
        provider: Provider,
        integration_type: IntegrationType,
        state: &str,
    ) -> Result<()> {
        let conn = self.db.get_connection()?;

        conn.execute(
            "INSERT INTO oauth_states (organizer_id, provider, integration_type, state, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(organizer_id, provider, integration_type) DO UPDATE SET
                state = excluded.state,
                created_at = excluded.created_at",
            rusqlite::params![
                organizer_id.to_string(),
                provider.to_string(),
                integration_type.to_string(),
                state,
                Utc::now().timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(())
    }

    #[instrument(skip(self, presented))]
    async fn consume(
        &self,
        organizer_id: Uuid,
        provider: Provider,
        integration_type: IntegrationType,
        presented: &str,
    ) -> Result<bool> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let stored: Option<String> = tx
            .query_row(
                "SELECT state FROM oauth_states
                 WHERE organizer_id = ?1 AND provider = ?2 AND integration_type = ?3",
                [
                    organizer_id.to_string(),
                    provider.to_string(),
                    integration_type.to_string(),
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(InfraError::from)?;

        let matches = stored.as_deref() == Some(presented);

        if matches {
            tx.execute(
                "DELETE FROM oauth_states
                 WHERE organizer_id = ?1 AND provider = ?2 AND integration_type = ?3",
                [
                    organizer_id.to_string(),
                    provider.to_string(),
                    integration_type.to_string(),
                ],
            )
            .map_err(InfraError::from)?;
        }

        tx.commit().map_err(InfraError::from)?;

        debug!(%provider, %integration_type, matches, "validated OAuth state");

        Ok(matches)
    }
}
