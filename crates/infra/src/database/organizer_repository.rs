//! SQLite-backed implementation of the OrganizerRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use slotbook_core::OrganizerRepository;
use slotbook_domain::{Organizer, Result};
use tracing::instrument;
use uuid::Uuid;

use super::{column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

/// SQLite implementation of OrganizerRepository
pub struct SqliteOrganizerRepository {
    db: Arc<DbManager>,
}

impl SqliteOrganizerRepository {
    /// Create a new organizer repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizerRepository for SqliteOrganizerRepository {
    #[instrument(skip(self, token))]
    async fn find_by_api_token(&self, token: &str) -> Result<Option<Organizer>> {
        let conn = self.db.get_connection()?;

        let organizer = conn
            .query_row(
                "SELECT id, email, display_name, created_at
                 FROM organizers
                 WHERE api_token = ?1",
                [token],
                map_organizer_row,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(organizer)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<Organizer>> {
        let conn = self.db.get_connection()?;

        let organizer = conn
            .query_row(
                "SELECT id, email, display_name, created_at
                 FROM organizers
                 WHERE id = ?1",
                [id.to_string()],
                map_organizer_row,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(organizer)
    }

    #[instrument(skip(self, organizer, api_token))]
    async fn create(&self, organizer: &Organizer, api_token: &str) -> Result<()> {
        let conn = self.db.get_connection()?;

        conn.execute(
            "INSERT INTO organizers (id, email, display_name, api_token, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                organizer.id.to_string(),
                organizer.email,
                organizer.display_name,
                api_token,
                organizer.created_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(())
    }
}

fn map_organizer_row(row: &Row<'_>) -> rusqlite::Result<Organizer> {
    Ok(Organizer {
        id: column_uuid(row.get(0)?, 0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: ts_to_datetime(row.get(3)?),
    })
}
