use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    algorithm::enumeration::{
        PathEnumerator, RoutePath, balance_routes, connect_longest_group, correct_entry_points,
    },
    algorithm::repair::{is_fully_connected, repair_reachability},
    algorithm::requirements::{
        Progression, RequirementAssigner, flag_entry_points, harmonize_entry_levels,
    },
    algorithm::synthesis::GridSynthesizer,
    analysis::statistics::Analysis,
    io::configuration::{GeneratorConfig, ItemChain},
    io::error::{Result, invalid_parameter},
    math::probability::RandomSelector,
    spatial::grid::Grid,
    spatial::tiles::{Tile, TileExtractor},
};

/// Outcome of one generation request
///
/// A discarded board carries no tiles and no analysis. Discarding is an
/// ordinary outcome of an unlucky draw, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedBoard {
    /// Tiles in row-major order
    pub tiles: Vec<Tile>,
    /// Route statistics, `None` for a discarded board
    pub analysis: Option<Analysis>,
}

impl GeneratedBoard {
    /// The empty result reported for boards that cannot be connected
    pub fn discarded() -> Self {
        Self::default()
    }

    /// Check if the board was given up
    pub fn is_discarded(&self) -> bool {
        self.tiles.is_empty() && self.analysis.is_none()
    }
}

/// Runs the full pipeline for one configuration
///
/// Owns the seeded random source shared by every stochastic stage, so two
/// generators built from the same configuration and seed produce the same
/// sequence of boards.
pub struct BoardGenerator {
    config: GeneratorConfig,
    chains: Vec<ItemChain>,
    random_selector: RandomSelector,
}

impl BoardGenerator {
    /// Create a generator for a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: GeneratorConfig, seed: u64) -> Result<Self> {
        Self::with_selector(config, RandomSelector::new(seed))
    }

    /// Create a generator drawing from an existing random source
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn with_selector(config: GeneratorConfig, random_selector: RandomSelector) -> Result<Self> {
        config.validate()?;
        let chains = config.chains();
        debug!(
            "Resolved {} item chains: {:?}",
            chains.len(),
            chains.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            config,
            chains,
            random_selector,
        })
    }

    /// Resource chains in effect
    pub fn chains(&self) -> &[ItemChain] {
        &self.chains
    }

    /// Configuration in effect
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one board
    ///
    /// Synthesizes and repairs the grid, extracts tiles, assigns requirements,
    /// flags entries, enumerates and balances routes. If no route exists a
    /// single targeted repair is tried before the board is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured static layout is malformed
    pub fn generate(&mut self) -> Result<GeneratedBoard> {
        let grid = GridSynthesizer::new(&self.config).synthesize(&mut self.random_selector)?;
        let (grid, report) = repair_reachability(grid);
        debug!(
            "Repair converted {} rock cells (connected: {})",
            report.converted.len(),
            report.connected()
        );

        let mut tiles = TileExtractor::extract_tiles(&grid, &self.chains);
        let mut progression = Progression::from_grid(&grid, &tiles);
        RequirementAssigner::new(&self.chains).assign(
            &mut tiles,
            &progression,
            &mut self.random_selector,
        );

        let Some(key) = grid.key() else {
            warn!("Board has no key cell, discarding");
            return Ok(GeneratedBoard::discarded());
        };
        let entries = flag_entry_points(&mut tiles, &progression, key, grid.cols());
        harmonize_entry_levels(&mut tiles, &entries, &progression);
        debug!("Flagged {} entry points", entries.len());

        let mut routes = self.enumerate(&grid, &tiles);
        let grid = if routes.is_empty() {
            let (grid, drew) = connect_longest_group(
                grid,
                &mut tiles,
                &mut progression,
                &mut self.random_selector,
            );
            if drew {
                routes = self.enumerate(&grid, &tiles);
            }
            grid
        } else {
            grid
        };

        if routes.is_empty() {
            warn!("No route reaches the key, discarding board");
            return Ok(GeneratedBoard::discarded());
        }
        if !is_fully_connected(&grid) {
            warn!("Board is not fully connected, discarding");
            return Ok(GeneratedBoard::discarded());
        }

        correct_entry_points(&mut tiles, &progression, &routes);

        let iterations = balance_routes(
            &mut tiles,
            &mut routes,
            &progression,
            &self.chains,
            self.config.balance_iterations,
        );

        let analysis = Analysis::from_routes(
            routes,
            &tiles,
            true,
            iterations,
            self.config.milestones.clone(),
        );
        info!(
            "Generated board: {} routes, costs {}..{}, spread {:.1}% (balanced: {})",
            analysis.path_count,
            analysis.min_cost,
            analysis.max_cost,
            analysis.variance_percent,
            analysis.balanced
        );

        Ok(GeneratedBoard {
            tiles,
            analysis: Some(analysis),
        })
    }

    /// Generate until a board survives or `attempts` draws are spent
    ///
    /// Every attempt continues from the random state left by the previous
    /// one. Returns the board together with the number of attempts used; the
    /// board is discarded only if every attempt was.
    ///
    /// # Errors
    ///
    /// Returns an error if `attempts` is zero or generation fails
    pub fn generate_with_retries(&mut self, attempts: usize) -> Result<(GeneratedBoard, usize)> {
        if attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &attempts,
                &"at least one attempt is required",
            ));
        }

        for attempt in 1..=attempts {
            let board = self.generate()?;
            if !board.is_discarded() {
                return Ok((board, attempt));
            }
            debug!("Attempt {attempt}/{attempts} discarded");
        }

        warn!("All {attempts} attempts were discarded");
        Ok((GeneratedBoard::discarded(), attempts))
    }

    fn enumerate(&self, grid: &Grid, tiles: &[Tile]) -> Vec<RoutePath> {
        PathEnumerator::new(grid, self.config.max_paths_per_entry).enumerate(tiles)
    }
}
