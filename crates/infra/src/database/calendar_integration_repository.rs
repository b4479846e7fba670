//! SQLite-backed implementation of the CalendarIntegrationRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};
use slotbook_core::CalendarIntegrationRepository;
use slotbook_domain::{
    CalendarIntegration, CalendarIntegrationSettings, IntegrationUpsert, Result, SlotbookError,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, organizer_id, provider, access_token, refresh_token,
    token_expires_at, provider_user_id, provider_email, calendar_id, last_sync_at,
    sync_errors, is_active, sync_enabled, created_at, updated_at";

/// SQLite implementation of CalendarIntegrationRepository
pub struct SqliteCalendarIntegrationRepository {
    db: Arc<DbManager>,
}

impl SqliteCalendarIntegrationRepository {
    /// Create a new calendar integration repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarIntegrationRepository for SqliteCalendarIntegrationRepository {
    #[instrument(skip(self))]
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<CalendarIntegration>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM calendar_integrations
                 WHERE organizer_id = ?1
                 ORDER BY created_at ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([organizer_id.to_string()], map_integration_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed calendar integrations");

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<CalendarIntegration>> {
        let conn = self.db.get_connection()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM calendar_integrations
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
        settings: &CalendarIntegrationSettings,
    ) -> Result<CalendarIntegration> {
        let conn = self.db.get_connection()?;

        let changed = conn
            .execute(
                "UPDATE calendar_integrations SET
                    is_active = COALESCE(?3, is_active),
                    sync_enabled = COALESCE(?4, sync_enabled),
                    updated_at = ?5
                 WHERE id = ?1 AND organizer_id = ?2",
                rusqlite::params![
                    id.to_string(),
                    organizer_id.to_string(),
                    settings.is_active,
                    settings.sync_enabled,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Calendar integration not found".into()));
        }

        self.find(organizer_id, id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound("Calendar integration not found".into()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()> {
        let conn = self.db.get_connection()?;

        let changed = conn
            .execute(
                "DELETE FROM calendar_integrations WHERE id = ?1 AND organizer_id = ?2",
                [id.to_string(), organizer_id.to_string()],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Calendar integration not found".into()));
        }

        Ok(())
    }

    #[instrument(skip(self, upsert), fields(provider = %upsert.provider))]
    async fn upsert_from_oauth(
        &self,
        organizer_id: Uuid,
        upsert: &IntegrationUpsert,
    ) -> Result<(CalendarIntegration, bool)> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM calendar_integrations
                 WHERE organizer_id = ?1 AND provider = ?2",
                [organizer_id.to_string(), upsert.provider.clone()],
                |row| row.get(0),
            )
            .optional()
            .map_err(InfraError::from)?;
        let created = existing.is_none();

        let now = Utc::now().timestamp();

        // A successful OAuth completion always reactivates the integration
        // and resets the error counter, even when the organizer had
        // previously disabled sync.
        tx.execute(
            "INSERT INTO calendar_integrations (
                id, organizer_id, provider, access_token, refresh_token,
                token_expires_at, provider_user_id, provider_email,
                sync_errors, is_active, sync_enabled, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 1, 1, ?9, ?9)
            ON CONFLICT(organizer_id, provider) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                token_expires_at = excluded.token_expires_at,
                provider_user_id = excluded.provider_user_id,
                provider_email = excluded.provider_email,
                sync_errors = 0,
                is_active = 1,
                sync_enabled = 1,
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
                    "SELECT {SELECT_COLUMNS} FROM calendar_integrations
                     WHERE organizer_id = ?1 AND provider = ?2"
                ),
                [organizer_id.to_string(), upsert.provider.clone()],
                map_integration_row,
            )
            .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        debug!(provider = %upsert.provider, created, "upserted calendar integration");

        Ok((row, created))
    }
}

fn map_integration_row(row: &Row<'_>) -> rusqlite::Result<CalendarIntegration> {
    Ok(CalendarIntegration {
        id: column_uuid(row.get(0)?, 0)?,
        organizer_id: column_uuid(row.get(1)?, 1)?,
        provider: row.get(2)?,
        access_token: row.get(3)?,
        refresh_token: row.get(4)?,
        token_expires_at: row.get::<_, Option<i64>>(5)?.map(ts_to_datetime),
        provider_user_id: row.get(6)?,
        provider_email: row.get(7)?,
        calendar_id: row.get(8)?,
        last_sync_at: row.get::<_, Option<i64>>(9)?.map(ts_to_datetime),
        sync_errors: row.get(10)?,
        is_active: row.get(11)?,
        sync_enabled: row.get(12)?,
        created_at: ts_to_datetime(row.get(13)?),
        updated_at: ts_to_datetime(row.get(14)?),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (Arc<DbManager>, Uuid, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(DbManager::new(&temp_dir.path().join("test.db"), 2).unwrap());

        let organizer_id = Uuid::now_v7();
        let conn = db.get_connection().unwrap();
        conn.execute(
            "INSERT INTO organizers (id, email, display_name, api_token, created_at)
             VALUES (?1, 'test@example.com', 'Test', 'token', ?2)",
            rusqlite::params![organizer_id.to_string(), Utc::now().timestamp()],
        )
        .unwrap();

        (db, organizer_id, temp_dir)
    }

    fn upsert_payload(email: &str) -> IntegrationUpsert {
        IntegrationUpsert {
            provider: "google".into(),
            access_token: "tok".into(),
            refresh_token: Some("refresh".into()),
            token_expires_at: Utc::now() + Duration::seconds(3600),
            provider_user_id: "u1".into(),
            provider_email: email.into(),
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteCalendarIntegrationRepository::new(db);

        let (first, created) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("a@b.com")).await.unwrap();
        assert!(created);
        assert!(first.is_active);
        assert!(first.sync_enabled);
        assert_eq!(first.provider_email, "a@b.com");

        let (second, created) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("new@b.com")).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.provider_email, "new@b.com");

        assert_eq!(repo.list(organizer_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reauth_reactivates_disabled_integration_and_resets_errors() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteCalendarIntegrationRepository::new(db.clone());

        let (integration, _) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("a@b.com")).await.unwrap();

        // Disable sync and accumulate errors out-of-band.
        let conn = db.get_connection().unwrap();
        conn.execute(
            "UPDATE calendar_integrations SET is_active = 0, sync_enabled = 0, sync_errors = 7
             WHERE id = ?1",
            [integration.id.to_string()],
        )
        .unwrap();
        drop(conn);

        let (after, created) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("a@b.com")).await.unwrap();
        assert!(!created);
        assert!(after.is_active);
        assert!(after.sync_enabled);
        assert_eq!(after.sync_errors, 0);
    }

    #[tokio::test]
    async fn update_settings_patches_only_provided_fields() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteCalendarIntegrationRepository::new(db);

        let (integration, _) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("a@b.com")).await.unwrap();

        let updated = repo
            .update_settings(
                organizer_id,
                integration.id,
                &CalendarIntegrationSettings { is_active: None, sync_enabled: Some(false) },
            )
            .await
            .unwrap();
        assert!(updated.is_active);
        assert!(!updated.sync_enabled);
    }

    #[tokio::test]
    async fn update_and_delete_scope_to_owner() {
        let (db, organizer_id, _temp) = setup();
        let repo = SqliteCalendarIntegrationRepository::new(db);

        let (integration, _) =
            repo.upsert_from_oauth(organizer_id, &upsert_payload("a@b.com")).await.unwrap();

        let other_organizer = Uuid::now_v7();
        let err = repo
            .update_settings(
                other_organizer,
                integration.id,
                &CalendarIntegrationSettings { is_active: Some(false), sync_enabled: None },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SlotbookError::NotFound(_)));

        let err = repo.delete(other_organizer, integration.id).await.unwrap_err();
        assert!(matches!(err, SlotbookError::NotFound(_)));

        repo.delete(organizer_id, integration.id).await.unwrap();
        assert!(repo.find(organizer_id, integration.id).await.unwrap().is_none());
    }
}
