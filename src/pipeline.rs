//! Analysis pipeline orchestration
//!
//! This module provides the public API for decision-matrix analysis. It
//! orchestrates the full pipeline from recorded session data to per-session
//! traces and the cross-participant aggregate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::parse_sessions;
use crate::aggregate::{aggregate_sessions, AggregateInteractions};
use crate::error::AnalysisError;
use crate::session::{trace_session, TracedInteractions};
use crate::types::MatrixSession;

/// Full analysis of one decision matrix across all its participants
///
/// `sessions` keeps the caller's input order, so index `i` is the same
/// participant in every per-participant array the aggregate was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixAnalysis {
    /// One trace per participant session, in input order
    pub sessions: Vec<TracedInteractions>,
    /// Descriptive statistics over all participants
    pub aggregate: AggregateInteractions,
}

/// Analyze a batch of sessions recorded on the same decision matrix.
///
/// # Arguments
/// * `sessions` - Recorded participant sessions, one per participant
///
/// # Returns
/// Per-session traces plus the cross-participant aggregate
pub fn analyze_matrix(sessions: &[MatrixSession]) -> Result<MatrixAnalysis, AnalysisError> {
    // Stage 1: Trace each session independently
    let traces = sessions
        .iter()
        .map(trace_session)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(participant_count = traces.len(), "traced session batch");

    // Stage 2: Reduce the batch into descriptive statistics
    let aggregate = aggregate_sessions(&traces)?;

    Ok(MatrixAnalysis {
        sessions: traces,
        aggregate,
    })
}

/// Convert recorded session JSON to analysis JSON (stateless, one-shot).
///
/// # Arguments
/// * `sessions_json` - JSON array of recorded session objects
///
/// # Returns
/// `MatrixAnalysis` serialized to JSON
pub fn analyze_matrix_json(sessions_json: &str) -> Result<String, AnalysisError> {
    let sessions = parse_sessions(sessions_json)?;
    let analysis = analyze_matrix(&sessions)?;
    Ok(serde_json::to_string(&analysis)?)
}
