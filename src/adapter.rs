//! Session record adapter
//!
//! Parses session JSON and validates the grid shape before the tracing
//! pipeline runs. Shape problems fail fast here so the numeric stages never
//! see a malformed grid.

use crate::error::AnalysisError;
use crate::types::MatrixSession;

/// Parse a single session record from JSON
pub fn parse_session(json: &str) -> Result<MatrixSession, AnalysisError> {
    let session: MatrixSession = serde_json::from_str(json)
        .map_err(|e| AnalysisError::ParseError(format!("Failed to parse session record: {}", e)))?;
    validate_session(&session)?;
    Ok(session)
}

/// Parse a JSON array of session records
pub fn parse_sessions(json: &str) -> Result<Vec<MatrixSession>, AnalysisError> {
    let sessions: Vec<MatrixSession> = serde_json::from_str(json)
        .map_err(|e| AnalysisError::ParseError(format!("Failed to parse session array: {}", e)))?;
    for session in &sessions {
        validate_session(session)?;
    }
    Ok(sessions)
}

/// Validate the structural invariants of a session record
///
/// Checks that the declared dimensions are positive, the grid is exactly
/// `row_count x column_count` with no jagged rows, and the decision index (when
/// present) refers to a real alternative. Interaction timestamps are not
/// validated; negative or duplicate values pass through to the tracer unchanged.
pub fn validate_session(session: &MatrixSession) -> Result<(), AnalysisError> {
    if session.row_count == 0 || session.column_count == 0 {
        return Err(AnalysisError::InvalidMatrixShape {
            rows: session.row_count,
            columns: session.column_count,
        });
    }

    if session.cells.len() != session.row_count {
        return Err(AnalysisError::RowCountMismatch {
            expected: session.row_count,
            actual: session.cells.len(),
        });
    }

    for (row, cells) in session.cells.iter().enumerate() {
        if cells.len() != session.column_count {
            return Err(AnalysisError::JaggedRow {
                row,
                expected: session.column_count,
                actual: cells.len(),
            });
        }
    }

    if session.decision >= session.column_count as i32 {
        return Err(AnalysisError::DecisionOutOfRange {
            decision: session.decision,
            columns: session.column_count,
        });
    }

    Ok(())
}
