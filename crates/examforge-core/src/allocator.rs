//! Proportional point allocation by instructional periods.
//!
//! Each row's share of a point pool is its period count over the pool's
//! period total. Values are recomputed from scratch on every pass and
//! rounded half-to-even (ratio to 4 places, points to 5) so repeated
//! allocation always yields the same totals.

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::model::MatrixRow;

/// Point pool of a whole-exam allocation.
pub const WHOLE_EXAM_POINTS: f64 = 10.0;

/// How points are pooled across the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum AllocationMode {
    /// One 10-point pool over every row.
    WholeExam,
    /// Two independent pools keyed by each row's block.
    TwoBlock { block1_points: f64, block2_points: f64 },
}

impl Default for AllocationMode {
    fn default() -> Self {
        AllocationMode::TwoBlock {
            block1_points: 2.5,
            block2_points: 7.5,
        }
    }
}

/// Round half-to-even at `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Assign ratio and points to every row.
///
/// All previous values are cleared first. On failure no row of a failing
/// pool carries values; in two-block mode a block that could be computed
/// keeps its values even when the other block fails.
pub fn allocate(rows: &mut [MatrixRow], mode: AllocationMode) -> Result<(), AllocationError> {
    for row in rows.iter_mut() {
        row.ratio = None;
        row.allocated_points = None;
    }
    if rows.is_empty() {
        return Err(AllocationError::EmptyMatrix);
    }

    match mode {
        AllocationMode::WholeExam => {
            let mut all: Vec<&mut MatrixRow> = rows.iter_mut().collect();
            if !assign_pool(&mut all, WHOLE_EXAM_POINTS) {
                tracing::warn!("allocation failed: total period count is 0");
                return Err(AllocationError::ZeroPeriods);
            }
        }
        AllocationMode::TwoBlock {
            block1_points,
            block2_points,
        } => {
            let (mut block2, mut block1): (Vec<&mut MatrixRow>, Vec<&mut MatrixRow>) =
                rows.iter_mut().partition(|r| r.block == 2);

            let mut failed = Vec::new();
            for (block, members, pool) in [
                (1u8, &mut block1, block1_points),
                (2u8, &mut block2, block2_points),
            ] {
                if members.is_empty() {
                    continue;
                }
                if !assign_pool(members, pool) {
                    failed.push(block);
                }
            }
            if !failed.is_empty() {
                tracing::warn!(blocks = ?failed, "allocation failed for blocks without periods");
                return Err(AllocationError::BlocksWithoutPeriods { blocks: failed });
            }
        }
    }

    tracing::debug!(rows = rows.len(), "allocated points");
    Ok(())
}

/// Distribute `pool` across `rows` by period count. Returns `false`, leaving
/// the rows untouched, when the pool has no periods.
fn assign_pool(rows: &mut [&mut MatrixRow], pool: f64) -> bool {
    let total: u64 = rows.iter().map(|r| u64::from(r.periods)).sum();
    if total == 0 {
        return false;
    }
    for row in rows.iter_mut() {
        let ratio = round_to(f64::from(row.periods) * 100.0 / total as f64, 4);
        row.ratio = Some(ratio);
        row.allocated_points = Some(round_to(ratio * pool / 100.0, 5));
    }
    true
}
