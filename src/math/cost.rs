//! Route cost arithmetic
//!
//! A tile demanding an item of level `n` costs `2^(n-1)` base items, the number
//! of level-one items merged to produce it.

use crate::io::configuration::BALANCE_TOLERANCE_PERCENT;

/// Base-item cost of a single requirement level
///
/// Level 0 carries no cost; levels beyond the width of `u64` saturate.
pub fn tile_cost(level: u8) -> u64 {
    if level == 0 {
        return 0;
    }
    1_u64
        .checked_shl(u32::from(level - 1))
        .unwrap_or(u64::MAX)
}

/// Arithmetic mean of a list of costs, 0 for an empty list
pub fn mean_cost(costs: &[u64]) -> f64 {
    if costs.is_empty() {
        return 0.0;
    }
    costs.iter().map(|&c| c as f64).sum::<f64>() / costs.len() as f64
}

/// Largest absolute deviation from the mean as a percentage of the mean
///
/// Empty lists and lists averaging zero have no spread.
pub fn variance_percent(costs: &[u64]) -> f64 {
    let mean = mean_cost(costs);
    if mean <= 0.0 {
        return 0.0;
    }

    let max_deviation = costs
        .iter()
        .map(|&c| (c as f64 - mean).abs())
        .fold(0.0, f64::max);

    max_deviation / mean * 100.0
}

/// Whether a set of route costs lies within the balance tolerance
pub fn is_balanced(costs: &[u64]) -> bool {
    !costs.is_empty() && variance_percent(costs) <= BALANCE_TOLERANCE_PERCENT
}
