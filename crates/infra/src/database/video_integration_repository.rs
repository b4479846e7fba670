//! SQLite-backed implementation of the VideoIntegrationRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};
use slotbook_core::VideoIntegrationRepository;
use slotbook_domain::{
    IntegrationUpsert, Result, SlotbookError, VideoIntegration, VideoIntegrationSettings,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, organizer_id, provider, access_token, refresh_token,
    token_expires_at, provider_user_id, provider_email, api_calls_today,
    is_active, auto_generate_links, created_at, updated_at";

/// SQLite implementation of VideoIntegrationRepository
pub struct SqliteVideoIntegrationRepository {
    db: Arc<DbManager>,
}

impl SqliteVideoIntegrationRepository {
    /// Create a new video integration repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoIntegrationRepository for SqliteVideoIntegrationRepository {
    #[instrument(skip(self))]
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<VideoIntegration>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM video_integrations
                 WHERE organizer_id = ?1
                 ORDER BY created_at ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([organizer_id.to_string()], map_integration_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed video integrations");

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<VideoIntegration>> {
        let conn = self.db.get_connection()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM video_integrations
                     WHERE id = ?1 AND organizer_id = ?2"
                ),
                [id.to_string(), organizer_id.to_string()],
                map_integration_row,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(row)
    }

    #[instrument(skip(self, settings))]
    async fn update_settings(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        settings: &VideoIntegrationSettings,
    ) -> Result<VideoIntegration> {
        let conn = self.db.get_connection()?;

        let changed = conn
            .execute(
                "UPDATE video_integrations SET
                    is_active = COALESCE(?3, is_active),
                    auto_generate_links = COALESCE(?4, auto_generate_links),
                    updated_at = ?5
                 WHERE id = ?1 AND organizer_id = ?2",
                rusqlite::params![
                    id.to_string(),
                    organizer_id.to_string(),
                    settings.is_active,
                    settings.auto_generate_links,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Video integration not found".into()));
        }

        self.find(organizer_id, id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound("Video integration not found".into()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()> {
        let conn = self.db.get_connection()?;

        let changed = conn
            .execute(
                "DELETE FROM video_integrations WHERE id = ?1 AND organizer_id = ?2",
                [id.to_string(), organizer_id.to_string()],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Video integration not found".into()));
        }

        Ok(())
    }

    #[instrument(skip(self, upsert), fields(provider = %upsert.provider))]
    async fn upsert_from_oauth(
        &self,
        organizer_id: Uuid,
        upsert: &IntegrationUpsert,
    ) -> Result<(VideoIntegration, bool)> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM video_integrations
                 WHERE organizer_id = ?1 AND provider = ?2",
                [organizer_id.to_string(), upsert.provider.clone()],
                |row| row.get(0),
            )
            .optional()
            .map_err(InfraError::from)?;
        let created = existing.is_none();

        let now = Utc::now().timestamp();

        tx.execute(
            "INSERT INTO video_integrations (
                id, organizer_id, provider, access_token, refresh_token,
                token_expires_at, provider_user_id, provider_email,
                is_active, auto_generate_links, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, 1, ?9, ?9)
            ON CONFLICT(organizer_id, provider) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                token_expires_at = excluded.token_expires_at,
                provider_user_id = excluded.provider_user_id,
                provider_email = excluded.provider_email,
                is_active = 1,
                auto_generate_links = 1,
                updated_at = excluded.updated_at",
            rusqlite::params![
                Uuid::now_v7().to_string(),
                organizer_id.to_string(),
                upsert.provider,
                upsert.access_token,
                upsert.refresh_token,
                upsert.token_expires_at.timestamp(),
                upsert.provider_user_id,
                upsert.provider_email,
                now,
            ],
        )
        .map_err(InfraError::from)?;

        let row = tx
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM video_integrations
                     WHERE organizer_id = ?1 AND provider = ?2"
                ),
                [organizer_id.to_string(), upsert.provider.clone()],
                map_integration_row,
            )
            .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        debug!(provider = %upsert.provider, created, "upserted video integration");

        Ok((row, created))
    }
}

fn map_integration_row(row: &Row<'_>) -> rusqlite::Result<VideoIntegration> {
    Ok(VideoIntegration {
        id: column_uuid(row.get(0)?, 0)?,
        organizer_id: column_uuid(row.get(1)?, 1)?,
        provider: row.get(2)?,
        access_token: row.get(3)?,
        refresh_token: row.get(4)?,
        token_expires_at: row.get::<_, Option<i64>>(5)?.map(ts_to_datetime),
        provider_user_id: row.get(6)?,
        provider_email: row.get(7)?,
        api_calls_today: row.get(8)?,
        is_active: row.get(9)?,
        auto_generate_links: row.get(10)?,
        created_at: ts_to_datetime(row.get(11)?),
        updated_at: ts_to_datetime(row.get(12)?),
    })
}
