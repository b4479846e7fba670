//! SQLite-backed implementation of the WebhookIntegrationRepository port.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row};
use slotbook_core::WebhookIntegrationRepository;
use slotbook_domain::{
    NewWebhookIntegration, Result, SlotbookError, WebhookIntegration, WebhookIntegrationUpdate,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, organizer_id, name, webhook_url, events, secret_key,
    headers, is_active, retry_failed, max_retries, created_at, updated_at";

/// SQLite implementation of WebhookIntegrationRepository
pub struct SqliteWebhookIntegrationRepository {
    db: Arc<DbManager>,
}

impl SqliteWebhookIntegrationRepository {
    /// Create a new webhook integration repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WebhookIntegrationRepository for SqliteWebhookIntegrationRepository {
    #[instrument(skip(self))]
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<WebhookIntegration>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM webhook_integrations
                 WHERE organizer_id = ?1
                 ORDER BY created_at ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([organizer_id.to_string()], map_webhook_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<WebhookIntegration>> {
        let conn = self.db.get_connection()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM webhook_integrations
                     WHERE id = ?1 AND organizer_id = ?2"
                ),
                [id.to_string(), organizer_id.to_string()],
                map_webhook_row,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(row)
    }

    #[instrument(skip(self, webhook), fields(name = %webhook.name))]
    async fn create(
        &self,
        organizer_id: Uuid,
        webhook: &NewWebhookIntegration,
    ) -> Result<WebhookIntegration> {
        let conn = self.db.get_connection()?;

        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO webhook_integrations (
                id, organizer_id, name, webhook_url, events, secret_key, headers,
                is_active, retry_failed, max_retries, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            rusqlite::params![
                id.to_string(),
                organizer_id.to_string(),
                webhook.name,
                webhook.webhook_url,
                encode_json(&webhook.events)?,
                webhook.secret_key,
                encode_json(&webhook.headers)?,
                webhook.is_active,
                webhook.retry_failed,
                webhook.max_retries,
                now,
            ],
        )
        .map_err(InfraError::from)?;

        debug!(webhook_id = %id, "created webhook integration");

        self.find(organizer_id, id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound("Webhook integration not found".into()))
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        update: &WebhookIntegrationUpdate,
    ) -> Result<WebhookIntegration> {
        let conn = self.db.get_connection()?;

        let events_json = update.events.as_ref().map(encode_json).transpose()?;
        let headers_json = update.headers.as_ref().map(encode_json).transpose()?;

        let changed = conn
            .execute(
                "UPDATE webhook_integrations SET
                    name = COALESCE(?3, name),
                    webhook_url = COALESCE(?4, webhook_url),
                    events = COALESCE(?5, events),
                    secret_key = COALESCE(?6, secret_key),
                    headers = COALESCE(?7, headers),
                    is_active = COALESCE(?8, is_active),
                    retry_failed = COALESCE(?9, retry_failed),
                    max_retries = COALESCE(?10, max_retries),
                    updated_at = ?11
                 WHERE id = ?1 AND organizer_id = ?2",
                rusqlite::params![
                    id.to_string(),
                    organizer_id.to_string(),
                    update.name,
                    update.webhook_url,
                    events_json,
                    update.secret_key,
                    headers_json,
                    update.is_active,
                    update.retry_failed,
                    update.max_retries,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Webhook integration not found".into()));
        }

        self.find(organizer_id, id)
            .await?
            .ok_or_else(|| SlotbookError::NotFound("Webhook integration not found".into()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()> {
        let conn = self.db.get_connection()?;

        let changed = conn
            .execute(
                "DELETE FROM webhook_integrations WHERE id = ?1 AND organizer_id = ?2",
                [id.to_string(), organizer_id.to_string()],
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(SlotbookError::NotFound("Webhook integration not found".into()));
        }

        Ok(())
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|err| SlotbookError::Internal(format!("failed to encode JSON column: {err}")))
}

fn map_webhook_row(row: &Row<'_>) -> rusqlite::Result<WebhookIntegration> {
    let events: Vec<String> = decode_json(row.get(4)?, 4)?;
    let headers: BTreeMap<String, String> = decode_json(row.get(6)?, 6)?;

    Ok(WebhookIntegration {
        id: column_uuid(row.get(0)?, 0)?,
        organizer_id: column_uuid(row.get(1)?, 1)?,
        name: row.get(2)?,
        webhook_url: row.get(3)?,
        events,
        secret_key: row.get(5)?,
        headers,
        is_active: row.get(7)?,
        retry_failed: row.get(8)?,
        max_retries: row.get(9)?,
        created_at: ts_to_datetime(row.get(10)?),
        updated_at: ts_to_datetime(row.get(11)?),
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(value: String, idx: usize) -> rusqlite::Result<T> {
    serde_json::from_str(&value).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
    })
}
