//! Generator constants, configuration record and resource chain defaults

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::io::error::{Result, invalid_parameter};

// Board geometry
/// Number of rows on a procedural board
pub const BOARD_ROWS: usize = 9;
/// Number of columns on a procedural board
pub const BOARD_COLS: usize = 7;
/// Height of the start block
pub const START_BLOCK_ROWS: usize = 2;
/// Width of the start block
pub const START_BLOCK_COLS: usize = 3;
/// Top-left corner (row, col) of the start block
pub const START_BLOCK_ORIGIN: (usize, usize) = (BOARD_ROWS - START_BLOCK_ROWS, 0);
/// Number of generator tiles placed on the start block's bottom row
pub const GENERATOR_COUNT: usize = 3;

// Path drawing
/// Probability that a walk step takes a detour instead of heading for its target
pub const DETOUR_PROBABILITY: f64 = 0.2;
/// Multiplier on the cell count bounding the length of a single walk
pub const WALK_STEP_FACTOR: usize = 4;
/// Smallest number of unlock paths on a board
pub const MIN_PATH_COUNT: usize = 1;
/// Largest number of unlock paths on a board
pub const MAX_PATH_COUNT: usize = 4;

// Difficulty curve
/// Lowest level a requirement may carry (level 1 is trivial)
pub const MIN_REQUIRED_LEVEL: u8 = 2;
/// Position ratio up to which the easy tier applies
pub const EASY_TIER_LIMIT: f64 = 0.3;
/// Position ratio up to which the medium tier applies
pub const MEDIUM_TIER_LIMIT: f64 = 0.7;
/// Inclusive level range of the easy tier
pub const EASY_LEVELS: (u8, u8) = (2, 3);
/// Inclusive level range of the medium tier
pub const MEDIUM_LEVELS: (u8, u8) = (3, 5);
/// Inclusive level range of the hard tier
pub const HARD_LEVELS: (u8, u8) = (4, 7);

// Balancing
/// Largest relative cost deviation (percent of the mean) still considered balanced
pub const BALANCE_TOLERANCE_PERCENT: f64 = 15.0;
/// Iteration cap of the coarse pass run right after level assignment
pub const ASSIGNMENT_BALANCE_ITERATIONS: usize = 300;
/// Iteration cap of the route balancing pass
pub const DEFAULT_BALANCE_ITERATIONS: usize = 400;

// Enumeration
/// Maximum number of routes collected per entry point
pub const DEFAULT_MAX_PATHS_PER_ENTRY: usize = 1000;

// Defaults for configurable parameters
/// Default number of unlock paths
pub const DEFAULT_PATH_COUNT: usize = 2;
/// Default number of rock cells opened up as free exploration tiles
pub const DEFAULT_FREE_TILE_COUNT: usize = 4;
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default number of boards generated by one CLI run
pub const DEFAULT_BOARD_COUNT: usize = 1;
/// Default number of draws before a board is given up
pub const DEFAULT_ATTEMPTS: usize = 5;

// Output settings
/// Prefix of generated board files
pub const OUTPUT_PREFIX: &str = "board_";
/// Suffix added to re-analysis output filenames
pub const ANALYSIS_SUFFIX: &str = "_analysis";
/// Edge length of one tile in preview images, in pixels
pub const PREVIEW_CELL_SIZE: u32 = 32;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// A named resource family whose items are merged up to `max_level`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemChain {
    /// Unique chain name, also used as lookup key for requirements
    pub name: String,
    /// Display color of the chain
    pub color: String,
    /// Highest level an item of this chain can reach
    pub max_level: u8,
    /// Chain-specific parameters passed through to the game layer
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl ItemChain {
    /// Create a chain without extra parameters
    pub fn new(name: &str, color: &str, max_level: u8) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            max_level,
            parameters: BTreeMap::new(),
        }
    }

    /// Highest level a tile requirement of this chain may demand
    pub const fn level_cap(&self) -> u8 {
        self.max_level.saturating_sub(1)
    }

    /// A chain is usable when it is named and can host at least one requirement level
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && self.level_cap() >= MIN_REQUIRED_LEVEL
    }
}

/// The three resource chains every board can rely on
pub fn canonical_chains() -> Vec<ItemChain> {
    vec![
        ItemChain::new("Ember", "red", 8),
        ItemChain::new("Tide", "blue", 8),
        ItemChain::new("Grove", "green", 8),
    ]
}

/// Merge configured chains over the canonical ones
///
/// A configured chain replaces the canonical chain of the same name and is
/// appended otherwise. Malformed chains are dropped with a warning, never an error.
pub fn resolve_chains(configured: &[ItemChain]) -> Vec<ItemChain> {
    let mut chains = canonical_chains();

    for chain in configured {
        if !chain.is_well_formed() {
            warn!(
                "Ignoring malformed item chain '{}' (max level {})",
                chain.name, chain.max_level
            );
            continue;
        }

        if let Some(existing) = chains.iter_mut().find(|c| c.name == chain.name) {
            *existing = chain.clone();
        } else {
            chains.push(chain.clone());
        }
    }

    chains
}

/// Accept whatever the configuration holds under `item_chains`
///
/// Entries that do not parse as chains are skipped with a warning; a value that
/// is not a list at all yields no configured chains, so the canonical ones apply.
fn deserialize_chains_leniently<'de, D>(deserializer: D) -> std::result::Result<Vec<ItemChain>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    let serde_json::Value::Array(entries) = value else {
        if !value.is_null() {
            warn!("Ignoring item_chains: expected a list, found {value}");
        }
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ItemChain>(entry) {
            Ok(chain) => Some(chain),
            Err(error) => {
                warn!("Ignoring unreadable item chain: {error}");
                None
            }
        })
        .collect())
}

/// Shape strategy used when drawing unlock paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PathPattern {
    /// Zig-zag walks towards random targets in the top third
    #[default]
    FreeForm,
    /// Walks towards evenly spaced lane columns
    VerticalLanes,
    /// Walks bending through a waypoint on alternating sides
    MirroredS,
    /// Two walks merging at a shared midpoint before a single trunk to the key
    YJunction,
}

/// Reward marker attached to a board row, interpreted only by the game layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Board row the milestone belongs to
    pub row: usize,
    /// Opaque reward description
    pub reward: serde_json::Value,
}

/// Configuration record consumed by the generation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Extra or overriding resource chains
    #[serde(deserialize_with = "deserialize_chains_leniently")]
    pub item_chains: Vec<ItemChain>,
    /// Number of unlock paths to draw
    pub path_count: usize,
    /// Rock cells opened up as free tiles after drawing
    pub free_tile_count: usize,
    /// Shape strategy for procedural paths
    pub path_pattern: PathPattern,
    /// Static token layout replacing procedural synthesis
    pub custom_grid: Option<Vec<Vec<String>>>,
    /// Pass-through milestones copied into the analysis
    pub milestones: Vec<Milestone>,
    /// Route cap per entry point during enumeration
    pub max_paths_per_entry: usize,
    /// Iteration cap of the route balancing pass
    pub balance_iterations: usize,
    /// Seed used when the caller does not supply one
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            item_chains: Vec::new(),
            path_count: DEFAULT_PATH_COUNT,
            free_tile_count: DEFAULT_FREE_TILE_COUNT,
            path_pattern: PathPattern::default(),
            custom_grid: None,
            milestones: Vec::new(),
            max_paths_per_entry: DEFAULT_MAX_PATHS_PER_ENTRY,
            balance_iterations: DEFAULT_BALANCE_ITERATIONS,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Check parameters that have no sensible fallback
    ///
    /// # Errors
    ///
    /// Returns an error if the path count is outside `1..=4` or the
    /// per-entry route cap is zero
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PATH_COUNT..=MAX_PATH_COUNT).contains(&self.path_count) {
            return Err(invalid_parameter(
                "path_count",
                &self.path_count,
                &format!("must be between {MIN_PATH_COUNT} and {MAX_PATH_COUNT}"),
            ));
        }

        if self.max_paths_per_entry == 0 {
            return Err(invalid_parameter(
                "max_paths_per_entry",
                &self.max_paths_per_entry,
                &"at least one route per entry must be allowed",
            ));
        }

        Ok(())
    }

    /// Resource chains in effect for this configuration
    pub fn chains(&self) -> Vec<ItemChain> {
        resolve_chains(&self.item_chains)
    }
}
