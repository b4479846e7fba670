//! SQLite-backed implementation of the BusyBlockRepository port.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{Row, ToSql};
use slotbook_core::BusyBlockRepository;
use slotbook_domain::{BusyBlock, BusyBlockSource, Result};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{column_uuid, ts_to_datetime, DbManager};
use crate::errors::InfraError;

/// SQLite implementation of BusyBlockRepository
pub struct SqliteBusyBlockRepository {
    db: Arc<DbManager>,
}

impl SqliteBusyBlockRepository {
    /// Create a new busy block repository
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BusyBlockRepository for SqliteBusyBlockRepository {
    #[instrument(skip(self, sources))]
    async fn active_by_sources(
        &self,
        organizer_id: Uuid,
        sources: &[BusyBlockSource],
    ) -> Result<Vec<BusyBlock>> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.get_connection()?;

        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(organizer_id.to_string())];
        let placeholders: Vec<String> = sources
            .iter()
            .map(|source| {
                params.push(Box::new(source.to_string()));
                format!("?{}", params.len())
            })
            .collect();

        let sql = format!(
            "SELECT id, organizer_id, start_ts, end_ts, source, external_id,
                    reason, is_active, created_at, updated_at
             FROM busy_blocks
             WHERE organizer_id = ?1 AND is_active = 1 AND source IN ({})
             ORDER BY start_ts ASC",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                map_block_row,
            )
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "fetched busy blocks");

        Ok(rows)
    }

    #[instrument(skip(self, block), fields(source = %block.source))]
    async fn insert(&self, block: &BusyBlock) -> Result<()> {
        let conn = self.db.get_connection()?;

        conn.execute(
            "INSERT INTO busy_blocks (
                id, organizer_id, start_ts, end_ts, source, external_id,
                reason, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                block.id.to_string(),
                block.organizer_id.to_string(),
                block.start_time.timestamp(),
                block.end_time.timestamp(),
                block.source.to_string(),
                block.external_id,
                block.reason,
                block.is_active,
                block.created_at.timestamp(),
                block.updated_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(())
    }
}

fn map_block_row(row: &Row<'_>) -> rusqlite::Result<BusyBlock> {
    let source_raw: String = row.get(4)?;
    let source = BusyBlockSource::from_str(&source_raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            Box::new(std::io::Error::other(err.to_string())),
        )
    })?;

    Ok(BusyBlock {
        id: column_uuid(row.get(0)?, 0)?,
        organizer_id: column_uuid(row.get(1)?, 1)?,
        start_time: ts_to_datetime(row.get(2)?),
        end_time: ts_to_datetime(row.get(3)?),
        source,
        external_id: row.get(5)?,
        reason: row.get(6)?,
        is_active: row.get(7)?,
        created_at: ts_to_datetime(row.get(8)?),
        updated_at: ts_to_datetime(row.get(9)?),
    })
}
