//! Error types for matrix and exam operations.
//!
//! Allocation and edit failures are ordinary values the caller reports to
//! the user; neither leaves the session in a half-updated state.

use thiserror::Error;

/// Why a point allocation pass could not assign points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// The matrix has no rows at all.
    #[error("the matrix is empty; add rows before allocating points")]
    EmptyMatrix,

    /// Whole-exam mode with a period total of zero.
    #[error("total period count is 0; fill in period counts first")]
    ZeroPeriods,

    /// Two-block mode where some non-empty blocks have no period data.
    #[error("block(s) {} have no period data; fill in period counts first", join_blocks(.blocks))]
    BlocksWithoutPeriods { blocks: Vec<u8> },
}

fn join_blocks(blocks: &[u8]) -> String {
    blocks
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a manual content edit was not applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("no question {index} (the exam has {len} questions)")]
    NoSuchItem { index: usize, len: usize },

    #[error("edit rejected: {0}")]
    Rejected(String),
}
