//! Calendar conflict report types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How two overlapping blocks relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapType {
    /// The external event covers the manual block entirely.
    CompleteOverlap,
    /// The manual block covers the external event entirely.
    ContainedOverlap,
    /// The intervals intersect without either containing the other.
    PartialOverlap,
}

/// One side of a conflicting pair.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictBlockRef {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A synced event overlapping a manually entered block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockConflict {
    pub external_event: ConflictBlockRef,
    pub manual_block: ConflictBlockRef,
    pub overlap_type: OverlapType,
}

/// Result of the pairwise conflict scan, plus input set sizes.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub organizer_id: Uuid,
    pub conflicts: Vec<BlockConflict>,
    pub manual_blocks_count: usize,
    pub synced_blocks_count: usize,
    pub total_external_events: usize,
    pub total_manual_blocks: usize,
}
