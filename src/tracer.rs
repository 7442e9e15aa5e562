//! First-pass tracer
//!
//! Walks the chronological interaction sequence once, building the interaction
//! index map, the per-axis selection counts, the summed attribute ranks, and
//! the transition counters that later drive the search-index and strategy
//! calculations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chronology::{Bin, BinInteraction};

/// One interaction annotated with its position in the chronological sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracedInteraction {
    /// Milliseconds since session start
    pub interaction_time: i64,
    /// 0-based position in the globally sorted sequence
    pub interaction_index: usize,
}

/// Mapping from bin to its chronologically ordered interactions
///
/// Only bins touched at least once have an entry.
pub type InteractionMap = HashMap<Bin, Vec<TracedInteraction>>;

/// Serialize the interaction map as a bin-sorted entry list, since JSON
/// object keys cannot be tuples and researchers diff the output.
mod interaction_map_entries {
    use serde::de::Deserializer;
    use serde::ser::Serializer;
    use serde::{Deserialize, Serialize};

    use super::{Bin, InteractionMap, TracedInteraction};

    pub fn serialize<S: Serializer>(map: &InteractionMap, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&Bin, &Vec<TracedInteraction>)> = map.iter().collect();
        entries.sort_by_key(|(bin, _)| **bin);
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<InteractionMap, D::Error> {
        let entries: Vec<(Bin, Vec<TracedInteraction>)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Output of the first pass over the chronological sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialTrace {
    /// Per-bin chronological interaction lists
    #[serde(with = "interaction_map_entries")]
    pub interaction_map: InteractionMap,
    /// The full sorted event sequence
    pub chronological_interactions: Vec<BinInteraction>,
    /// Last timestamp minus first timestamp, -1 for an empty sequence
    pub time_to_interaction: i64,
    /// Per-dimension average chronological rank (1-based positions summed,
    /// then divided by the dimension count)
    pub attribute_ranks: Vec<f64>,
    /// Per-dimension selection counts, repeats included
    pub dimension_selection_counts: Vec<u32>,
    /// Sum of the per-dimension selection counts
    pub total_dimension_selection_count: u32,
    /// Per-alternative selection counts, repeats included
    pub alternative_selection_counts: Vec<u32>,
    /// Sum of the per-alternative selection counts
    pub total_alternative_selection_count: u32,
    /// Consecutive transitions that stayed in the same dimension
    pub si_dim: u32,
    /// Consecutive transitions that stayed with the same alternative
    pub si_alt: u32,
    /// Consecutive transitions that crossed both axes; reset whenever a
    /// same-row or same-column transition occurs
    pub si_mix: u32,
}

impl InitialTrace {
    /// Number of unique bins visited at least once
    pub fn total_bins_visited(&self) -> usize {
        self.interaction_map.len()
    }
}

/// Run the first pass over a sorted interaction sequence
pub fn first_pass(
    interactions: Vec<BinInteraction>,
    num_dimensions: usize,
    num_alternatives: usize,
) -> InitialTrace {
    let mut interaction_map: InteractionMap = HashMap::new();
    let mut attribute_ranks = vec![0.0; num_dimensions];
    let mut dimension_selection_counts = vec![0u32; num_dimensions];
    let mut total_dimension_selection_count = 0u32;
    let mut alternative_selection_counts = vec![0u32; num_alternatives];
    let mut total_alternative_selection_count = 0u32;
    let mut si_dim = 0u32;
    let mut si_alt = 0u32;
    let mut si_mix = 0u32;

    let mut prev_bin: (i64, i64) = (-1, -1);
    for (i, interaction) in interactions.iter().enumerate() {
        let (row, col) = interaction.bin;

        interaction_map
            .entry(interaction.bin)
            .or_default()
            .push(TracedInteraction {
                interaction_time: interaction.interaction_time,
                interaction_index: i,
            });

        attribute_ranks[row] += (i + 1) as f64;
        dimension_selection_counts[row] += 1;
        total_dimension_selection_count += 1;
        alternative_selection_counts[col] += 1;
        total_alternative_selection_count += 1;

        let curr = (row as i64, col as i64);
        if curr.0 == prev_bin.0 && curr.1 != prev_bin.1 {
            si_dim += 1;
            si_mix = 0;
        } else if curr.0 != prev_bin.0 && curr.1 == prev_bin.1 {
            si_alt += 1;
            si_mix = 0;
        } else if curr.0 != prev_bin.0 && curr.1 != prev_bin.1 {
            si_mix += 1;
        }
        // Immediate repeat of the same bin leaves all counters unchanged.

        prev_bin = curr;
    }

    for rank in &mut attribute_ranks {
        *rank /= num_dimensions as f64;
    }

    let time_to_interaction = match (interactions.first(), interactions.last()) {
        (Some(first), Some(last)) => last.interaction_time - first.interaction_time,
        _ => -1,
    };

    InitialTrace {
        interaction_map,
        chronological_interactions: interactions,
        time_to_interaction,
        attribute_ranks,
        dimension_selection_counts,
        total_dimension_selection_count,
        alternative_selection_counts,
        total_alternative_selection_count,
        si_dim,
        si_alt,
        si_mix,
    }
}
