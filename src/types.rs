//! Input data model
//!
//! This module defines the session record consumed by the tracing engine: one
//! participant's completed pass over a decision matrix, with per-cell interaction
//! timestamps recorded by the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cell of the recorded interaction grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Raw interaction timestamps in milliseconds since session start, in
    /// the order they were recorded
    #[serde(default)]
    pub interactions: Vec<i64>,
    /// Participant rating for this cell, if the matrix collected one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// One participant's completed decision-matrix session
///
/// Rows are decision factors (dimensions), columns are alternatives. The grid
/// is row-major: `cells[row][column]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSession {
    /// Unique identifier of this stats record
    pub session_id: Uuid,
    /// The decision matrix this session belongs to
    pub matrix_id: Uuid,
    /// When the participant started the session
    pub start_time: DateTime<Utc>,
    /// Number of decision factors (rows)
    pub row_count: usize,
    /// Number of alternatives (columns)
    pub column_count: usize,
    /// Row-major grid of per-cell interaction records
    pub cells: Vec<Vec<CellRecord>>,
    /// Optional per-alternative ratings given by the participant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_ratings: Option<Vec<f64>>,
    /// Index of the chosen alternative, -1 if the session ended without a choice
    #[serde(default = "no_decision")]
    pub decision: i32,
    /// Milliseconds from session start to the final decision
    pub elapsed_ms: i64,
}

fn no_decision() -> i32 {
    -1
}

impl MatrixSession {
    /// Whether the participant committed to an alternative
    pub fn has_decision(&self) -> bool {
        self.decision >= 0
    }
}

/// Display labels for a decision matrix
///
/// The engine itself works purely on row/column indices; labels exist so a
/// downstream exporter can annotate its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixLabels {
    /// Matrix display name
    pub name: String,
    /// Decision factor names, one per row
    pub row_names: Vec<String>,
    /// Alternative names, one per column
    pub column_names: Vec<String>,
}

impl MatrixLabels {
    /// Check that the label lists match a session's dimensions
    pub fn matches(&self, session: &MatrixSession) -> bool {
        self.row_names.len() == session.row_count
            && self.column_names.len() == session.column_count
    }
}
