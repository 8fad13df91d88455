//! Route and tile statistics reported alongside a generated board

use serde::{Deserialize, Serialize};

use crate::algorithm::enumeration::RoutePath;
use crate::io::configuration::{BALANCE_TOLERANCE_PERCENT, Milestone};
use crate::math::cost::{mean_cost, variance_percent};
use crate::spatial::tiles::{Tile, TileType};

/// Summary of every enumerated route of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Every route from an entry point to the key
    pub all_paths: Vec<RoutePath>,
    /// Route costs in route order
    pub costs: Vec<u64>,
    /// Mean route cost
    pub average_cost: f64,
    /// Cheapest route cost
    pub min_cost: u64,
    /// Most expensive route cost
    pub max_cost: u64,
    /// Largest deviation from the mean, percent of the mean
    pub variance_percent: f64,
    /// Whether the spread lies within the balance tolerance
    pub balanced: bool,
    /// Number of routes
    pub path_count: usize,
    /// Number of flagged entry tiles
    pub entry_point_count: usize,
    /// Number of tiles on the board
    pub tile_count: usize,
    /// Number of tiles carrying a requirement
    pub semi_locked_count: usize,
    /// Whether every route tile is reachable from the start region
    pub connected: bool,
    /// Iterations spent by the route balancing pass
    pub balance_iterations: usize,
    /// Milestones copied from the configuration
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Analysis {
    /// Build the analysis from final routes and tiles
    ///
    /// All cost figures, and with them the balance verdict, are derived
    /// from the route costs as passed in.
    pub fn from_routes(
        routes: Vec<RoutePath>,
        tiles: &[Tile],
        connected: bool,
        balance_iterations: usize,
        milestones: Vec<Milestone>,
    ) -> Self {
        let costs: Vec<u64> = routes.iter().map(|route| route.cost).collect();
        let spread = variance_percent(&costs);

        Self {
            path_count: routes.len(),
            all_paths: routes,
            average_cost: mean_cost(&costs),
            min_cost: costs.iter().copied().min().unwrap_or(0),
            max_cost: costs.iter().copied().max().unwrap_or(0),
            variance_percent: spread,
            balanced: !costs.is_empty() && spread <= BALANCE_TOLERANCE_PERCENT,
            costs,
            entry_point_count: tiles.iter().filter(|t| t.is_entry_point).count(),
            tile_count: tiles.len(),
            semi_locked_count: tiles
                .iter()
                .filter(|t| t.tile_type == TileType::SemiLocked)
                .count(),
            connected,
            balance_iterations,
            milestones,
        }
    }
}
