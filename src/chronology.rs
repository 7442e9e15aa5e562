//! Chronological interaction builder
//!
//! Flattens the per-cell timestamp lists of a session grid into one
//! time-ordered event sequence. This is the first stage of the tracing
//! pipeline; everything downstream walks the sequence it produces.

use serde::{Deserialize, Serialize};

use crate::types::MatrixSession;

/// One cell of the decision matrix: (decision-factor row, alternative column)
pub type Bin = (usize, usize);

/// A single recorded interaction with one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinInteraction {
    /// Milliseconds since session start
    pub interaction_time: i64,
    /// The cell the participant interacted with
    pub bin: Bin,
}

/// Flatten a session grid into a chronological list of bin interactions
///
/// The result is stably sorted ascending by timestamp: ties keep the
/// flattening order, which is row-major and then recording order within a
/// cell. Timestamps are not validated; negative or duplicate values are
/// passed through unchanged.
pub fn sort_interactions(session: &MatrixSession) -> Vec<BinInteraction> {
    let mut interactions = Vec::new();
    for (row, cells) in session.cells.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            interactions.extend(cell.interactions.iter().map(|&ts| BinInteraction {
                interaction_time: ts,
                bin: (row, col),
            }));
        }
    }

    interactions.sort_by_key(|interaction| interaction.interaction_time);
    interactions
}
