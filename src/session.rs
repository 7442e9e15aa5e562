//! Session trace assembler
//!
//! Composes the chronology builder, first-pass tracer, search-index
//! calculator, and strategy classifier into one `TracedInteractions` result
//! per participant session. Tracing is a pure function of the session record:
//! the same input always produces the same result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::adapter::validate_session;
use crate::chronology::sort_interactions;
use crate::error::AnalysisError;
use crate::numeric::floor_to_percent;
use crate::search_index::{coverage, search_indices, selection_percentages};
use crate::strategy::{classify, ClassifierInputs, StrategyLabel};
use crate::tracer::{first_pass, InitialTrace};
use crate::types::MatrixSession;

/// Complete per-session trace: the first-pass output plus all derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedInteractions {
    /// First-pass output: interaction map, chronological list, counts,
    /// transition counters
    pub initial: InitialTrace,
    /// Per-alternative share of all touches, percent-scaled
    pub alternative_selection_percentages: Vec<f64>,
    /// Per-dimension share of all touches, percent-scaled
    pub dimension_selection_percentages: Vec<f64>,
    /// Number of unique bins visited at least once
    pub total_bins_visited: usize,
    /// Global search-balance index: positive for alternative-dominant search,
    /// negative for dimension-dominant search
    pub si: f64,
    /// Per-dimension search indices
    pub dimension_search_indices: Vec<f64>,
    /// Per-alternative search indices
    pub alternative_search_indices: Vec<f64>,
    /// Percentage of unique bins visited out of all bins
    pub coverage: f64,
    /// Decision strategies the search pattern is consistent with
    pub decision_strategies: BTreeSet<StrategyLabel>,
}

impl TracedInteractions {
    /// Milliseconds between the first and last interaction, -1 if none
    pub fn time_to_interaction(&self) -> i64 {
        self.initial.time_to_interaction
    }
}

/// Global search-balance index from the transition counters
///
/// Percent-scaled and floored; defaults to 100 (maximally alternative-
/// dominant) when no axis-aligned transitions were recorded.
fn calculate_si(si_alt: u32, si_dim: u32) -> f64 {
    let denominator = si_alt + si_dim;
    if denominator == 0 {
        return 100.0;
    }
    floor_to_percent((si_alt as f64 - si_dim as f64) / denominator as f64)
}

/// Trace one participant session
///
/// Validates the grid shape, reconstructs the chronological sequence, runs
/// the first pass, and derives every per-session metric.
pub fn trace_session(session: &MatrixSession) -> Result<TracedInteractions, AnalysisError> {
    validate_session(session)?;

    let interactions = sort_interactions(session);
    let initial = first_pass(interactions, session.row_count, session.column_count);

    let alternative_selection_percentages = selection_percentages(
        &initial.alternative_selection_counts,
        initial.total_alternative_selection_count,
    );
    let dimension_selection_percentages = selection_percentages(
        &initial.dimension_selection_counts,
        initial.total_dimension_selection_count,
    );

    let total_bins_visited = initial.total_bins_visited();
    let si = calculate_si(initial.si_alt, initial.si_dim);

    let dimension_search_indices =
        search_indices(&initial.dimension_selection_counts, session.column_count);
    let alternative_search_indices =
        search_indices(&initial.alternative_selection_counts, session.row_count);

    let decision_strategies = classify(&ClassifierInputs {
        attribute_ranks: &initial.attribute_ranks,
        dimension_selection_counts: &initial.dimension_selection_counts,
        num_dimensions: session.row_count,
        num_alternatives: session.column_count,
        si_dim: initial.si_dim,
        si_alt: initial.si_alt,
        si_mix: initial.si_mix,
        si,
    });

    let coverage = coverage(
        total_bins_visited,
        session.row_count,
        session.column_count,
    );

    Ok(TracedInteractions {
        initial,
        alternative_selection_percentages,
        dimension_selection_percentages,
        total_bins_visited,
        si,
        dimension_search_indices,
        alternative_search_indices,
        coverage,
        decision_strategies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellRecord;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn session_with_cells(cells: Vec<Vec<CellRecord>>, decision: i32) -> MatrixSession {
        let rows = cells.len();
        let columns = cells[0].len();
        MatrixSession {
            session_id: Uuid::new_v4(),
            matrix_id: Uuid::new_v4(),
            start_time: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            row_count: rows,
            column_count: columns,
            cells,
            row_ratings: None,
            decision,
            elapsed_ms: 4000,
        }
    }

    fn cell(timestamps: &[i64]) -> CellRecord {
        CellRecord {
            interactions: timestamps.to_vec(),
            rating: None,
        }
    }

    /// 2x2 matrix, visits (0,0) t=100, (0,1) t=200, (1,1) t=300, decision 1.
    fn three_visit_session() -> MatrixSession {
        session_with_cells(
            vec![
                vec![cell(&[100]), cell(&[200])],
                vec![cell(&[]), cell(&[300])],
            ],
            1,
        )
    }

    #[test]
    fn test_three_visit_trace() {
        let traced = trace_session(&three_visit_session()).unwrap();

        assert_eq!(traced.total_bins_visited, 3);
        assert_eq!(traced.coverage, 75.0);
        assert_eq!(traced.initial.si_dim, 1);
        assert_eq!(traced.initial.si_alt, 1);
        assert_eq!(traced.time_to_interaction(), 200);
        // One same-row and one same-column transition balance out.
        assert_eq!(traced.si, 0.0);
    }

    #[test]
    fn test_selection_percentage_sums() {
        let traced = trace_session(&three_visit_session()).unwrap();

        let dim_sum: f64 = traced.dimension_selection_percentages.iter().sum();
        assert!((dim_sum - 100.0).abs() <= 2.0 * 0.01 + 1e-9);

        let alt_sum: f64 = traced.alternative_selection_percentages.iter().sum();
        assert!((alt_sum - 100.0).abs() <= 2.0 * 0.01 + 1e-9);

        assert_eq!(
            traced
                .initial
                .dimension_selection_counts
                .iter()
                .sum::<u32>(),
            traced.initial.total_dimension_selection_count
        );
    }

    #[test]
    fn test_chronological_invariants() {
        let session = session_with_cells(
            vec![
                vec![cell(&[500, 100]), cell(&[300])],
                vec![cell(&[200]), cell(&[400])],
            ],
            0,
        );
        let traced = trace_session(&session).unwrap();

        let chronological = &traced.initial.chronological_interactions;
        for pair in chronological.windows(2) {
            assert!(pair[0].interaction_time <= pair[1].interaction_time);
        }

        let mut indices: Vec<usize> = traced
            .initial
            .interaction_map
            .values()
            .flatten()
            .map(|t| t.interaction_index)
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..chronological.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_session() {
        let session = session_with_cells(
            vec![vec![cell(&[]), cell(&[])], vec![cell(&[]), cell(&[])]],
            -1,
        );
        let traced = trace_session(&session).unwrap();

        assert_eq!(traced.total_bins_visited, 0);
        assert_eq!(traced.coverage, 0.0);
        assert_eq!(traced.time_to_interaction(), -1);
        assert!(traced.decision_strategies.is_empty());
        assert_eq!(traced.dimension_selection_percentages, vec![0.0, 0.0]);
        assert_eq!(traced.si, 100.0);
    }

    #[test]
    fn test_tracing_is_idempotent() {
        let session = three_visit_session();
        let first = trace_session(&session).unwrap();
        let second = trace_session(&session).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_shape_is_rejected() {
        let mut session = three_visit_session();
        session.cells[0].pop();
        assert!(matches!(
            trace_session(&session),
            Err(AnalysisError::JaggedRow { .. })
        ));
    }

    #[test]
    fn test_coverage_zero_only_when_untouched() {
        let touched = trace_session(&session_with_cells(
            vec![vec![cell(&[10]), cell(&[])]],
            -1,
        ))
        .unwrap();
        assert!(touched.coverage > 0.0);
        assert!(touched.coverage <= 100.0);
    }

    #[test]
    fn test_alternative_dominant_session_gets_labels() {
        // Column-wise scan: the participant works through one alternative at
        // a time, so nearly every transition stays within a column.
        let session = session_with_cells(
            vec![
                vec![cell(&[100]), cell(&[400])],
                vec![cell(&[200]), cell(&[500])],
                vec![cell(&[300]), cell(&[600])],
            ],
            0,
        );
        let traced = trace_session(&session).unwrap();

        assert!(traced.si > 0.0);
        assert!(!traced.decision_strategies.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let traced = trace_session(&three_visit_session()).unwrap();
        let json = serde_json::to_string(&traced).unwrap();
        let parsed: TracedInteractions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, traced);
    }
}
