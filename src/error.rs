//! Error types for decitrace

use thiserror::Error;

/// Errors that can occur during session tracing or aggregation
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Matrix must have at least one row and one column, got {rows}x{columns}")]
    InvalidMatrixShape { rows: usize, columns: usize },

    #[error("Grid has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    JaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Decision index {decision} is out of range for {columns} alternatives")]
    DecisionOutOfRange { decision: i32, columns: usize },

    #[error("Cannot aggregate an empty batch of sessions")]
    EmptyBatch,

    #[error("Session at index {index} is {rows}x{columns}, batch expects {expected_rows}x{expected_columns}")]
    BatchShapeMismatch {
        index: usize,
        rows: usize,
        columns: usize,
        expected_rows: usize,
        expected_columns: usize,
    },

    #[error("Failed to parse session record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
