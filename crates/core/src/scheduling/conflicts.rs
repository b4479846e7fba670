//! Conflict detection between synced and manually entered busy blocks
//!
//! A naive O(M x N) pairwise scan; expected inputs are tens to low
//! hundreds of blocks per organizer.

use slotbook_domain::{
    BlockConflict, BusyBlock, ConflictBlockRef, ConflictReport, OverlapType,
};
use uuid::Uuid;

/// Compare every manual block against every external (synced) block and
/// report overlapping pairs.
///
/// Two blocks conflict iff their half-open `[start, end)` intervals
/// intersect; blocks that merely touch at a boundary do not conflict.
pub fn detect_conflicts(
    organizer_id: Uuid,
    external: &[BusyBlock],
    manual: &[BusyBlock],
) -> ConflictReport {
    let mut conflicts = Vec::new();

    for external_block in external {
        for manual_block in manual {
            if !blocks_overlap(external_block, manual_block) {
                continue;
            }

            conflicts.push(BlockConflict {
                external_event: block_ref(external_block),
                manual_block: block_ref(manual_block),
                overlap_type: classify_overlap(external_block, manual_block),
            });
        }
    }

    ConflictReport {
        organizer_id,
        conflicts,
        manual_blocks_count: manual.len(),
        synced_blocks_count: external.len(),
        total_external_events: external.len(),
        total_manual_blocks: manual.len(),
    }
}

fn blocks_overlap(a: &BusyBlock, b: &BusyBlock) -> bool {
    a.start_time < b.end_time && b.start_time < a.end_time
}

fn classify_overlap(external: &BusyBlock, manual: &BusyBlock) -> OverlapType {
    if external.start_time <= manual.start_time && external.end_time >= manual.end_time {
        OverlapType::CompleteOverlap
    } else if manual.start_time <= external.start_time && manual.end_time >= external.end_time {
        OverlapType::ContainedOverlap
    } else {
        OverlapType::PartialOverlap
    }
}

fn block_ref(block: &BusyBlock) -> ConflictBlockRef {
    ConflictBlockRef {
        id: block
            .external_id
            .clone()
            .unwrap_or_else(|| block.id.to_string()),
        summary: block.reason.clone(),
        start: block.start_time,
        end: block.end_time,
    }
}
