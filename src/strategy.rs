//! Decision strategy classifier
//!
//! Infers which named decision-making strategies a participant's search
//! pattern is consistent with. The heuristic deliberately over-labels: an
//! ambiguous pattern carries every strategy it cannot rule out, and the
//! caller receives an ordered set rather than a single verdict.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::numeric::pearson_correlation;

/// A named decision-making strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyLabel {
    Unknown,
    EqualWeights,
    LeastImportantMinimumHeuristic,
    LeastVarianceHeuristic,
    MultiAttributeUtilityModel,
    Disjunctive,
    SatisficingHeuristic,
    AdditiveDifference,
    Dominance,
    Majority,
    MajorityOfConfirmingDimensions,
    EliminationByAspects,
    Lexicographic,
    RecognitionHeuristic,
}

impl StrategyLabel {
    /// Human-readable name, as presented to researchers
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyLabel::Unknown => {
                "Unknown (attribute ranks correlated positively with cells opened)"
            }
            StrategyLabel::EqualWeights => "Equal Weights Strategy (EQW)",
            StrategyLabel::LeastImportantMinimumHeuristic => {
                "Least-Important Minimum Heuristic (LIM)"
            }
            StrategyLabel::LeastVarianceHeuristic => "Least-Variance Heuristic (LVA)",
            StrategyLabel::MultiAttributeUtilityModel => "Multiattribute Utility Model (MAU)",
            StrategyLabel::Disjunctive => "Disjunctive Strategy (DIS)",
            StrategyLabel::SatisficingHeuristic => "Satisficing Heuristic (SAT)",
            StrategyLabel::AdditiveDifference => "Additive Difference Strategy (ADD)",
            StrategyLabel::Dominance => "Dominance Strategy (DOM)",
            StrategyLabel::Majority => "Majority Strategy (MAJ)",
            StrategyLabel::MajorityOfConfirmingDimensions => {
                "Majority of Confirming Dimensions Strategy (MCD)"
            }
            StrategyLabel::EliminationByAspects => "Elimination-By-Aspects Strategy (EBA)",
            StrategyLabel::Lexicographic => "Lexicographic Strategy (LEX)",
            StrategyLabel::RecognitionHeuristic => "Recognition Heuristic (REC)",
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Inputs to the strategy classification
pub struct ClassifierInputs<'a> {
    pub attribute_ranks: &'a [f64],
    pub dimension_selection_counts: &'a [u32],
    pub num_dimensions: usize,
    pub num_alternatives: usize,
    pub si_dim: u32,
    pub si_alt: u32,
    pub si_mix: u32,
    /// Global search-balance index, percent-scaled
    pub si: f64,
}

/// Classify the decision strategies consistent with one session's search pattern
///
/// A session with no interactions carries no labels: neither branch of the
/// heuristic has any evidence to act on. Otherwise, alternative-dominant
/// search (`si > 0`) is split on the ratio of dimension-bound transitions to
/// everything else, and dimension-dominant search falls through to the
/// correlation between attribute ranks and selection counts.
pub fn classify(inputs: &ClassifierInputs<'_>) -> BTreeSet<StrategyLabel> {
    let mut labels = BTreeSet::new();

    if inputs.dimension_selection_counts.iter().all(|&c| c == 0) {
        return labels;
    }

    if inputs.si > 0.0 {
        let transition_total = inputs.si_alt + inputs.si_mix;
        // Undefined in the recorded procedure when no alternative-bound or
        // mixed transitions exist; zero keeps the comparison deterministic.
        let si_ratio = if transition_total > 0 {
            inputs.si_dim as f64 / transition_total as f64
        } else {
            0.0
        };
        let max_ratio = ((inputs.num_dimensions - 1) as f64 * inputs.num_alternatives as f64)
            / (inputs.num_alternatives - 1) as f64;

        if si_ratio == max_ratio {
            labels.insert(StrategyLabel::EqualWeights);
            labels.insert(StrategyLabel::LeastImportantMinimumHeuristic);
            labels.insert(StrategyLabel::LeastVarianceHeuristic);
            labels.insert(StrategyLabel::MultiAttributeUtilityModel);
        } else {
            labels.insert(StrategyLabel::Disjunctive);
            labels.insert(StrategyLabel::SatisficingHeuristic);
        }
    } else {
        let counts: Vec<f64> = inputs
            .dimension_selection_counts
            .iter()
            .map(|&c| c as f64)
            .collect();
        let correlation = pearson_correlation(inputs.attribute_ranks, &counts);

        if correlation == 0.0 {
            labels.insert(StrategyLabel::AdditiveDifference);
            labels.insert(StrategyLabel::Dominance);
            labels.insert(StrategyLabel::Majority);
            labels.insert(StrategyLabel::MajorityOfConfirmingDimensions);
        } else if correlation < 0.0 {
            labels.insert(StrategyLabel::EliminationByAspects);
            labels.insert(StrategyLabel::Lexicographic);
            labels.insert(StrategyLabel::RecognitionHeuristic);
        } else {
            // Ranks should not positively correlate with search order; keep
            // every candidate and flag the session.
            warn!(
                correlation,
                "positive correlation between attribute ranks and cells opened"
            );
            labels.insert(StrategyLabel::Unknown);
            labels.insert(StrategyLabel::AdditiveDifference);
            labels.insert(StrategyLabel::Dominance);
            labels.insert(StrategyLabel::Majority);
            labels.insert(StrategyLabel::MajorityOfConfirmingDimensions);
            labels.insert(StrategyLabel::EliminationByAspects);
            labels.insert(StrategyLabel::Lexicographic);
            labels.insert(StrategyLabel::RecognitionHeuristic);
        }
    }

    labels
}
