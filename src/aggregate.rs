//! Cross-participant aggregation
//!
//! Reduces a batch of per-session traces into descriptive statistics per
//! metric, plus a frequency table of the classified decision strategies. The
//! reduction observes every participant before finalizing any statistic, and
//! participant order is the caller's (fixed) batch order, so array slots
//! sharing an index stay consistent across metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::numeric::newton_sqrt;
use crate::session::TracedInteractions;
use crate::strategy::StrategyLabel;

/// Descriptive statistics of one metric across participants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateInteraction {
    pub mean: f64,
    pub median: f64,
    /// Most common value: the longest run of equal values in sorted order,
    /// first run winning ties
    pub mode: f64,
    pub standard_deviation: f64,
    pub variance: f64,
    pub range: f64,
    pub max: f64,
    pub min: f64,
}

/// Fixed-length staging accumulator for one metric
///
/// One slot per participant, each written exactly once, then finalized into
/// an `AggregateInteraction` and discarded. Never leaves this module.
#[derive(Debug, Clone)]
struct MetricAccumulator {
    values: Vec<f64>,
}

impl MetricAccumulator {
    fn new(participant_count: usize) -> Self {
        Self {
            values: vec![0.0; participant_count],
        }
    }

    fn set(&mut self, participant: usize, value: f64) {
        self.values[participant] = value;
    }

    /// Finalize into descriptive statistics
    ///
    /// A single participant always uses the population variance formula,
    /// whatever the caller asked for.
    fn aggregate(mut self, population: bool) -> AggregateInteraction {
        let population = population || self.values.len() == 1;
        self.values.sort_by(f64::total_cmp);
        let sorted = &self.values;
        let n = sorted.len();

        let min = sorted[0];
        let max = sorted[n - 1];
        let range = max - min;

        let median = if n % 2 == 0 {
            (sorted[n / 2] + sorted[n / 2 - 1]) / 2.0
        } else {
            sorted[n / 2]
        };

        let mut mode = sorted[0];
        let mut best_run = 1;
        let mut current_run = 1;
        for i in 1..n {
            if sorted[i] == sorted[i - 1] {
                current_run += 1;
            } else {
                current_run = 1;
            }
            if current_run > best_run {
                best_run = current_run;
                mode = sorted[i];
            }
        }

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let sum_of_squares: f64 = sorted
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum();
        let variance = if population {
            sum_of_squares / n as f64
        } else {
            sum_of_squares / (n - 1) as f64
        };
        let standard_deviation = newton_sqrt(variance, None);

        AggregateInteraction {
            mean,
            median,
            mode,
            standard_deviation,
            variance,
            range,
            max,
            min,
        }
    }
}

/// Descriptive statistics for every tracked metric of one decision matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateInteractions {
    pub alternative_selection_percentages: Vec<AggregateInteraction>,
    pub dimension_selection_percentages: Vec<AggregateInteraction>,
    pub total_bins_visited: AggregateInteraction,
    pub si: AggregateInteraction,
    pub dimension_search_indices: Vec<AggregateInteraction>,
    pub alternative_search_indices: Vec<AggregateInteraction>,
    pub attribute_ranks: Vec<AggregateInteraction>,
    pub dimension_selection_counts: Vec<AggregateInteraction>,
    pub total_dimension_selection_count: AggregateInteraction,
    pub alternative_selection_counts: Vec<AggregateInteraction>,
    pub total_alternative_selection_count: AggregateInteraction,
    pub si_dim: AggregateInteraction,
    pub si_alt: AggregateInteraction,
    pub si_mix: AggregateInteraction,
    pub coverage: AggregateInteraction,
    /// How many participants exhibited each classified strategy
    pub strategy_frequencies: BTreeMap<StrategyLabel, u32>,
}

fn accumulators(num_elements: usize, participant_count: usize) -> Vec<MetricAccumulator> {
    vec![MetricAccumulator::new(participant_count); num_elements]
}

fn finalize(accumulators: Vec<MetricAccumulator>) -> Vec<AggregateInteraction> {
    accumulators
        .into_iter()
        .map(|acc| acc.aggregate(false))
        .collect()
}

/// Reduce a batch of per-session traces into one aggregate record
///
/// The batch must be non-empty and every trace must come from a matrix of
/// the same dimensions.
pub fn aggregate_sessions(
    traces: &[TracedInteractions],
) -> Result<AggregateInteractions, AnalysisError> {
    let first = traces.first().ok_or(AnalysisError::EmptyBatch)?;
    let participant_count = traces.len();
    let num_dimensions = first.dimension_selection_percentages.len();
    let num_alternatives = first.alternative_selection_percentages.len();

    for (index, trace) in traces.iter().enumerate() {
        if trace.dimension_selection_percentages.len() != num_dimensions
            || trace.alternative_selection_percentages.len() != num_alternatives
        {
            return Err(AnalysisError::BatchShapeMismatch {
                index,
                rows: trace.dimension_selection_percentages.len(),
                columns: trace.alternative_selection_percentages.len(),
                expected_rows: num_dimensions,
                expected_columns: num_alternatives,
            });
        }
    }

    let mut alternative_selection_percentages = accumulators(num_alternatives, participant_count);
    let mut dimension_selection_percentages = accumulators(num_dimensions, participant_count);
    let mut total_bins_visited = MetricAccumulator::new(participant_count);
    let mut si = MetricAccumulator::new(participant_count);
    let mut dimension_search_indices = accumulators(num_dimensions, participant_count);
    let mut alternative_search_indices = accumulators(num_alternatives, participant_count);
    let mut attribute_ranks = accumulators(num_dimensions, participant_count);
    let mut dimension_selection_counts = accumulators(num_dimensions, participant_count);
    let mut total_dimension_selection_count = MetricAccumulator::new(participant_count);
    let mut alternative_selection_counts = accumulators(num_alternatives, participant_count);
    let mut total_alternative_selection_count = MetricAccumulator::new(participant_count);
    let mut si_dim = MetricAccumulator::new(participant_count);
    let mut si_alt = MetricAccumulator::new(participant_count);
    let mut si_mix = MetricAccumulator::new(participant_count);
    let mut coverage = MetricAccumulator::new(participant_count);
    let mut strategy_frequencies: BTreeMap<StrategyLabel, u32> = BTreeMap::new();

    for (i, trace) in traces.iter().enumerate() {
        for (j, &value) in trace.alternative_selection_percentages.iter().enumerate() {
            alternative_selection_percentages[j].set(i, value);
        }
        for (j, &value) in trace.dimension_selection_percentages.iter().enumerate() {
            dimension_selection_percentages[j].set(i, value);
        }
        total_bins_visited.set(i, trace.total_bins_visited as f64);
        si.set(i, trace.si);
        for (j, &value) in trace.dimension_search_indices.iter().enumerate() {
            dimension_search_indices[j].set(i, value);
        }
        for (j, &value) in trace.alternative_search_indices.iter().enumerate() {
            alternative_search_indices[j].set(i, value);
        }
        for (j, &value) in trace.initial.attribute_ranks.iter().enumerate() {
            attribute_ranks[j].set(i, value);
        }
        for (j, &count) in trace.initial.dimension_selection_counts.iter().enumerate() {
            dimension_selection_counts[j].set(i, count as f64);
        }
        total_dimension_selection_count.set(i, trace.initial.total_dimension_selection_count as f64);
        for (j, &count) in trace
            .initial
            .alternative_selection_counts
            .iter()
            .enumerate()
        {
            alternative_selection_counts[j].set(i, count as f64);
        }
        total_alternative_selection_count
            .set(i, trace.initial.total_alternative_selection_count as f64);
        si_dim.set(i, trace.initial.si_dim as f64);
        si_alt.set(i, trace.initial.si_alt as f64);
        si_mix.set(i, trace.initial.si_mix as f64);
        coverage.set(i, trace.coverage);

        for &strategy in &trace.decision_strategies {
            *strategy_frequencies.entry(strategy).or_insert(0) += 1;
        }
    }

    Ok(AggregateInteractions {
        alternative_selection_percentages: finalize(alternative_selection_percentages),
        dimension_selection_percentages: finalize(dimension_selection_percentages),
        total_bins_visited: total_bins_visited.aggregate(false),
        si: si.aggregate(false),
        dimension_search_indices: finalize(dimension_search_indices),
        alternative_search_indices: finalize(alternative_search_indices),
        attribute_ranks: finalize(attribute_ranks),
        dimension_selection_counts: finalize(dimension_selection_counts),
        total_dimension_selection_count: total_dimension_selection_count.aggregate(false),
        alternative_selection_counts: finalize(alternative_selection_counts),
        total_alternative_selection_count: total_alternative_selection_count.aggregate(false),
        si_dim: si_dim.aggregate(false),
        si_alt: si_alt.aggregate(false),
        si_mix: si_mix.aggregate(false),
        coverage: coverage.aggregate(false),
        strategy_frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::trace_session;
    use crate::types::{CellRecord, MatrixSession};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn accumulator_of(values: &[f64]) -> MetricAccumulator {
        let mut acc = MetricAccumulator::new(values.len());
        for (i, &v) in values.iter().enumerate() {
            acc.set(i, v);
        }
        acc
    }

    #[test]
    fn test_min_max_range_median_odd() {
        let stats = accumulator_of(&[5.0, 1.0, 3.0]).aggregate(false);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.range, 4.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mean, 3.0);
    }

    #[test]
    fn test_median_even() {
        let stats = accumulator_of(&[4.0, 1.0, 3.0, 2.0]).aggregate(false);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_mode_longest_run_wins() {
        let stats = accumulator_of(&[2.0, 1.0, 1.0, 1.0, 2.0]).aggregate(false);
        assert_eq!(stats.mode, 1.0);
    }

    #[test]
    fn test_mode_tie_keeps_first() {
        let stats = accumulator_of(&[2.0, 1.0, 2.0, 1.0]).aggregate(false);
        assert_eq!(stats.mode, 1.0);
    }

    #[test]
    fn test_mode_final_run_counted() {
        let stats = accumulator_of(&[1.0, 2.0, 2.0, 2.0]).aggregate(false);
        assert_eq!(stats.mode, 2.0);
    }

    #[test]
    fn test_sample_variance() {
        // Sample variance of [2, 4, 6]: mean 4, sum of squares 8, / 2 = 4.
        let stats = accumulator_of(&[2.0, 4.0, 6.0]).aggregate(false);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.standard_deviation - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_variance() {
        // Population variance of [2, 4, 6]: sum of squares 8, / 3.
        let stats = accumulator_of(&[2.0, 4.0, 6.0]).aggregate(true);
        assert!((stats.variance - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_participant_forces_population_variance() {
        let stats = accumulator_of(&[7.5]).aggregate(false);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.standard_deviation, 0.0);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.mode, 7.5);
        assert_eq!(stats.range, 0.0);
    }

    #[test]
    fn test_identical_values_have_zero_deviation() {
        let stats = accumulator_of(&[3.3, 3.3]).aggregate(false);
        assert_eq!(stats.standard_deviation, 0.0);
        assert_eq!(stats.variance, 0.0);
    }

    fn session_with_cells(cells: Vec<Vec<CellRecord>>) -> MatrixSession {
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
            decision: 0,
            elapsed_ms: 2500,
        }
    }

    fn cell(timestamps: &[i64]) -> CellRecord {
        CellRecord {
            interactions: timestamps.to_vec(),
            rating: None,
        }
    }

    fn balanced_session() -> MatrixSession {
        // One same-row and one same-column transition: si is exactly 0.
        session_with_cells(vec![
            vec![cell(&[100]), cell(&[200])],
            vec![cell(&[]), cell(&[300])],
        ])
    }

    #[test]
    fn test_identical_participants_aggregate_exactly() {
        let traces: Vec<_> = (0..3)
            .map(|_| trace_session(&balanced_session()).unwrap())
            .collect();
        assert!(traces.iter().all(|t| t.si == 0.0));

        let aggregate = aggregate_sessions(&traces).unwrap();
        assert_eq!(aggregate.si.standard_deviation, 0.0);
        assert_eq!(aggregate.si.mean, 0.0);
        for stats in &aggregate.dimension_selection_counts {
            assert_eq!(stats.standard_deviation, 0.0);
        }
        assert_eq!(aggregate.total_bins_visited.mean, 3.0);
        assert_eq!(aggregate.coverage.mean, 75.0);
    }

    #[test]
    fn test_strategy_frequencies_tally_participants() {
        let traces: Vec<_> = (0..3)
            .map(|_| trace_session(&balanced_session()).unwrap())
            .collect();
        let aggregate = aggregate_sessions(&traces).unwrap();

        // Each participant carries the same label set; every label's count
        // equals the participant count.
        assert!(!aggregate.strategy_frequencies.is_empty());
        for &count in aggregate.strategy_frequencies.values() {
            assert_eq!(count, 3);
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            aggregate_sessions(&[]),
            Err(AnalysisError::EmptyBatch)
        ));
    }

    #[test]
    fn test_mismatched_batch_rejected() {
        let small = trace_session(&balanced_session()).unwrap();
        let large = trace_session(&session_with_cells(vec![
            vec![cell(&[100]), cell(&[200]), cell(&[])],
            vec![cell(&[]), cell(&[300]), cell(&[])],
            vec![cell(&[]), cell(&[]), cell(&[400])],
        ]))
        .unwrap();

        assert!(matches!(
            aggregate_sessions(&[small, large]),
            Err(AnalysisError::BatchShapeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_aggregate_mixed_batch() {
        let sparse = trace_session(&balanced_session()).unwrap();
        let dense = trace_session(&session_with_cells(vec![
            vec![cell(&[100]), cell(&[200])],
            vec![cell(&[300]), cell(&[400])],
        ]))
        .unwrap();

        let aggregate = aggregate_sessions(&[sparse, dense]).unwrap();
        assert_eq!(aggregate.total_bins_visited.min, 3.0);
        assert_eq!(aggregate.total_bins_visited.max, 4.0);
        assert_eq!(aggregate.total_bins_visited.mean, 3.5);
        assert_eq!(aggregate.total_bins_visited.range, 1.0);
        assert_eq!(aggregate.coverage.max, 100.0);
    }
}
