//! Search index calculator
//!
//! Converts raw selection counts into percentage-scaled selection shares and
//! per-axis search indices, and computes matrix coverage. A search index
//! relates one axis element's selection count to the average count of all
//! other elements on that axis.

use crate::numeric::floor_to_percent;

/// Per-element selection percentages for one axis
///
/// Every touch is counted, including repeats. An untouched session (total of
/// zero) yields all zeros by convention rather than dividing 0/0.
pub fn selection_percentages(selection_counts: &[u32], total: u32) -> Vec<f64> {
    if total == 0 {
        return vec![0.0; selection_counts.len()];
    }
    selection_counts
        .iter()
        .map(|&count| floor_to_percent(count as f64 / total as f64))
        .collect()
}

/// Per-element search indices for one axis
///
/// For element `i` the denominator is the mean selection count of all other
/// elements on the same axis. When that mean is zero the index falls back to
/// the raw element count of the *other* axis (`num_minor_elements`), carried
/// over unchanged from the recorded procedure; see DESIGN.md before treating
/// the fallback as meaningful.
pub fn search_indices(selection_counts: &[u32], num_minor_elements: usize) -> Vec<f64> {
    let num_major_elements = selection_counts.len();
    let mut indices = Vec::with_capacity(num_major_elements);

    for i in 0..num_major_elements {
        let other_sum: u32 = selection_counts
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &count)| count)
            .sum();

        // A single-element axis has no "other" elements; treat the mean as
        // zero so the minor-axis fallback applies.
        let denominator = if num_major_elements > 1 {
            other_sum as f64 / (num_major_elements - 1) as f64
        } else {
            0.0
        };
        let index = if denominator == 0.0 {
            num_minor_elements as f64
        } else {
            floor_to_percent(selection_counts[i] as f64 / denominator)
        };
        indices.push(index);
    }

    indices
}

/// Percentage of unique bins visited out of all bins in the matrix
pub fn coverage(total_bins_visited: usize, num_dimensions: usize, num_alternatives: usize) -> f64 {
    floor_to_percent(total_bins_visited as f64 / (num_dimensions * num_alternatives) as f64)
}
