//! Numeric primitives
//!
//! Newton-Raphson square root, Pearson product-moment correlation, and the
//! floored percent scaling shared by every percentage-valued metric.

use tracing::warn;

/// Iteration cap for the Newton-Raphson loop. Convergence normally takes well
/// under 64 steps; the cap guards against a 1-ulp oscillation around the root.
const MAX_SQRT_ITERATIONS: u32 = 128;

/// Newton-Raphson square root
///
/// Iterates `guess <- (guess + x / guess) / 2` until the update reaches a
/// fixed point at full precision. Returns 0 for an input of 0. An optional
/// initial guess can seed the iteration; `x / 2` is used otherwise.
pub fn newton_sqrt(x: f64, initial_guess: Option<f64>) -> f64 {
    if x == 0.0 {
        return 0.0;
    }

    let mut guess = initial_guess.unwrap_or(x / 2.0);
    for _ in 0..MAX_SQRT_ITERATIONS {
        let average = (guess + x / guess) / 2.0;
        if average == guess {
            return average;
        }
        guess = average;
    }
    guess
}

/// Pearson product-moment correlation between two numeric series
///
/// Series of unequal length are truncated to the shorter one; this is logged
/// as a warning, not treated as an error. A degenerate series (zero variance
/// in either input) yields a correlation of 0 by convention.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if x.len() != y.len() {
        warn!(
            x_len = x.len(),
            y_len = y.len(),
            "correlation inputs differ in length; truncating to {} item(s)",
            n
        );
    }
    if n == 0 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for i in 0..n {
        sum_x += x[i];
        sum_y += y[i];
        sum_xy += x[i] * y[i];
        sum_x2 += x[i] * x[i];
        sum_y2 += y[i] * y[i];
    }

    let count = n as f64;
    let numerator = count * sum_xy - sum_x * sum_y;
    let denominator = newton_sqrt(
        (count * sum_x2 - sum_x * sum_x) * (count * sum_y2 - sum_y * sum_y),
        None,
    );
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Scale a ratio to percent and floor it at two decimal places
///
/// `0.756` becomes `75.60`, `0.6667` becomes `66.67`. Flooring (not rounding)
/// matches the granularity the recorded metrics are reported at.
pub fn floor_to_percent(ratio: f64) -> f64 {
    (ratio * 10_000.0).floor() / 100.0
}
