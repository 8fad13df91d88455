//! Local-search cost balancing across routes
//!
//! One routine serves both the coarse pass over path groups right after level
//! assignment and the final pass over enumerated routes. Each iteration moves
//! a single tile one level towards the mean on the route deviating most.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::{debug, trace};

use crate::algorithm::requirements::{Progression, chain_cap};
use crate::io::configuration::{BALANCE_TOLERANCE_PERCENT, ItemChain, MIN_REQUIRED_LEVEL};
use crate::math::cost::{mean_cost, tile_cost, variance_percent};
use crate::spatial::tiles::Tile;

/// Which way a route's cost has to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Lower one level on a route above the mean
    Lower,
    /// Raise one level on a route below the mean
    Raise,
}

impl Adjustment {
    const fn apply(self, level: u8) -> u8 {
        match self {
            Self::Lower => level.saturating_sub(1),
            Self::Raise => level.saturating_add(1),
        }
    }

    const fn opposite(self) -> Self {
        match self {
            Self::Lower => Self::Raise,
            Self::Raise => Self::Lower,
        }
    }
}

/// Result of a balancing run
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOutcome {
    /// Iterations spent, bounded by the cap
    pub iterations: usize,
    /// Level changes actually applied
    pub adjustments: usize,
    /// Final cost of every route, in input order
    pub costs: Vec<u64>,
    /// Final spread of the route costs
    pub variance_percent: f64,
    /// Whether the final costs lie within the tolerance
    pub converged: bool,
}

/// Bring route costs within the tolerance by nudging single tile levels
///
/// Each route is a list of tile indices in travel order. Iteration stops when
/// the largest deviation from the mean is within [`BALANCE_TOLERANCE_PERCENT`],
/// when fewer than two routes exist, or at `max_iterations`. The route farther
/// from the mean is adjusted: its cost is lowered when above the mean and
/// raised when below. Tiles that also lie on the opposite extreme route are
/// moved only when no tile exclusive to either extreme can. When no tile of
/// that route can move, the iteration still counts and the opposite extreme
/// route is tried instead. Once neither can move the search ends early; a
/// stalled iteration changes nothing, so every remaining one would stall the
/// same way and the outcome equals running out the cap.
///
/// Levels stay within `[2, chain max_level - 1]` and never break the order
/// kept by `progression`. The verdict in the outcome is computed from the
/// final costs, never assumed.
pub fn equalize(
    tiles: &mut [Tile],
    routes: &[Vec<usize>],
    progression: &Progression,
    chains: &[ItemChain],
    max_iterations: usize,
) -> BalanceOutcome {
    let mut costs: Vec<u64> = routes
        .iter()
        .map(|route| {
            route
                .iter()
                .filter_map(|&t| tiles.get(t))
                .map(Tile::cost)
                .sum()
        })
        .collect();

    let mut membership: HashMap<usize, Vec<usize>> = HashMap::new();
    for (route_index, route) in routes.iter().enumerate() {
        for &tile in route {
            membership.entry(tile).or_default().push(route_index);
        }
    }

    let mut iterations = 0;
    let mut adjustments = 0;

    while iterations < max_iterations && routes.len() >= 2 {
        let mean = mean_cost(&costs);
        if mean <= 0.0 {
            break;
        }

        let Some((high, low)) = extremes(&costs) else {
            break;
        };
        let above = costs.get(high).map_or(0.0, |&c| c as f64 - mean);
        let below = costs.get(low).map_or(0.0, |&c| mean - c as f64);
        if above.max(below) <= mean * BALANCE_TOLERANCE_PERCENT / 100.0 {
            break;
        }

        iterations += 1;

        let (primary, direction) = if above >= below {
            (high, Adjustment::Lower)
        } else {
            (low, Adjustment::Raise)
        };
        let secondary = if primary == high { low } else { high };

        let candidates = [
            (primary, secondary, direction),
            (secondary, primary, direction.opposite()),
        ];
        let choice = [true, false]
            .into_iter()
            .flat_map(|exclusive| candidates.map(|candidate| (candidate, exclusive)))
            .find_map(|((route_index, other_index, adjustment), exclusive)| {
                let route = routes.get(route_index)?;
                let pool: Vec<usize> = if exclusive {
                    let other = routes.get(other_index)?;
                    route.iter().copied().filter(|t| !other.contains(t)).collect()
                } else {
                    route.clone()
                };
                select_tile(tiles, &pool, adjustment, progression, chains)
                    .map(|tile| (tile, adjustment))
            });

        let Some((tile_index, adjustment)) = choice else {
            debug!("Balancing stalled after {iterations} iterations");
            break;
        };

        let Some(tile) = tiles.get_mut(tile_index) else {
            continue;
        };
        let Some(old_level) = tile.level() else {
            continue;
        };
        let new_level = adjustment.apply(old_level);
        tile.set_level(new_level);
        adjustments += 1;
        trace!(
            "Tile ({}, {}) level {old_level} -> {new_level}",
            tile.row, tile.col
        );

        let (old_cost, new_cost) = (tile_cost(old_level), tile_cost(new_level));
        for &route_index in membership.get(&tile_index).into_iter().flatten() {
            if let Some(cost) = costs.get_mut(route_index) {
                *cost = cost.saturating_add(new_cost).saturating_sub(old_cost);
            }
        }
    }

    let spread = variance_percent(&costs);
    BalanceOutcome {
        iterations,
        adjustments,
        converged: !costs.is_empty() && spread <= BALANCE_TOLERANCE_PERCENT,
        variance_percent: spread,
        costs,
    }
}

/// Indices of the most and least expensive routes
fn extremes(costs: &[u64]) -> Option<(usize, usize)> {
    let high = costs
        .iter()
        .enumerate()
        .max_by_key(|&(_, cost)| *cost)
        .map(|(i, _)| i)?;
    let low = costs
        .iter()
        .enumerate()
        .min_by_key(|&(_, cost)| *cost)
        .map(|(i, _)| i)?;
    Some((high, low))
}

/// Pick the tile of `route` to move one level in `adjustment`'s direction
///
/// Runs of three or more equal levels are broken up first, starting at the
/// run's middle. Otherwise the tile with the most extreme level in the needed
/// direction is taken. Candidates that would leave the chain's range or break
/// the group order are skipped.
pub fn select_tile(
    tiles: &[Tile],
    route: &[usize],
    adjustment: Adjustment,
    progression: &Progression,
    chains: &[ItemChain],
) -> Option<usize> {
    let leveled: Vec<(usize, u8)> = route
        .iter()
        .filter_map(|&t| tiles.get(t).and_then(Tile::level).map(|level| (t, level)))
        .collect();

    let can_move = |tile_index: usize| -> bool {
        let Some(item) = tiles.get(tile_index).and_then(|t| t.required_item.as_ref()) else {
            return false;
        };
        let target = adjustment.apply(item.level);
        target != item.level
            && target >= MIN_REQUIRED_LEVEL
            && target <= chain_cap(chains, item)
            && progression.allows(tiles, tile_index, target)
    };

    let run_candidate = monotone_runs(&leveled)
        .into_iter()
        .flat_map(|run| middle_out(&run))
        .find(|&tile| can_move(tile));
    if run_candidate.is_some() {
        return run_candidate;
    }

    let mut extreme = leveled;
    match adjustment {
        Adjustment::Lower => extreme.sort_by_key(|&(_, level)| Reverse(level)),
        Adjustment::Raise => extreme.sort_by_key(|&(_, level)| level),
    }
    extreme
        .into_iter()
        .map(|(tile, _)| tile)
        .find(|&tile| can_move(tile))
}

/// Maximal runs of at least three consecutive equal levels
fn monotone_runs(leveled: &[(usize, u8)]) -> Vec<Vec<usize>> {
    let mut runs = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_level = None;

    for &(tile, level) in leveled {
        if current_level == Some(level) {
            current.push(tile);
        } else {
            if current.len() >= 3 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(tile);
            current_level = Some(level);
        }
    }
    if current.len() >= 3 {
        runs.push(current);
    }
    runs
}

/// Run members ordered from the middle outwards
fn middle_out(run: &[usize]) -> Vec<usize> {
    let middle = run.len() / 2;
    let mut ordered: Vec<(usize, usize)> = run
        .iter()
        .enumerate()
        .map(|(position, &tile)| (position.abs_diff(middle), tile))
        .collect();
    ordered.sort_by_key(|&(distance, _)| distance);
    ordered.into_iter().map(|(_, tile)| tile).collect()
}
