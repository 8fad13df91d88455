//! Grid synthesis from a static layout or procedurally drawn paths

use log::{debug, info};

use crate::algorithm::drawer::PathDrawer;
use crate::io::configuration::{
    BOARD_COLS, BOARD_ROWS, GeneratorConfig, PathPattern, START_BLOCK_COLS, START_BLOCK_ORIGIN,
    START_BLOCK_ROWS,
};
use crate::io::error::Result;
use crate::math::probability::RandomSelector;
use crate::spatial::grid::{CellKind, Coord, Grid};

/// Builds the cell-type grid of a new board
pub struct GridSynthesizer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> GridSynthesizer<'a> {
    /// Create a synthesizer for one configuration
    pub const fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Produce the grid for one generation request
    ///
    /// A configured static layout is used as-is after token normalization.
    /// Otherwise the start block and key are placed, paths are drawn following
    /// the configured pattern and free exploration cells are carved out.
    ///
    /// # Errors
    ///
    /// Returns an error if the static layout is malformed
    pub fn synthesize(&self, random_selector: &mut RandomSelector) -> Result<Grid> {
        if let Some(layout) = &self.config.custom_grid {
            info!("Using static layout of {} rows", layout.len());
            return Grid::from_tokens(layout);
        }

        let mut grid = Grid::new(BOARD_ROWS, BOARD_COLS);
        grid.place_start_block(
            Coord::new(START_BLOCK_ORIGIN.0, START_BLOCK_ORIGIN.1),
            START_BLOCK_ROWS,
            START_BLOCK_COLS,
        );

        let key_col = random_selector.index(grid.cols()).unwrap_or(0);
        let key = Coord::new(0, key_col);
        grid.set(key, CellKind::Key);

        let path_count = self.config.path_count;
        let origins = Self::path_origins(&grid, path_count, random_selector);
        debug!(
            "Drawing {path_count} paths ({:?}) towards key at {key}",
            self.config.path_pattern
        );

        match self.config.path_pattern {
            PathPattern::FreeForm => {
                for (index, &origin) in origins.iter().enumerate() {
                    let target = Self::top_third_target(&grid, None, random_selector);
                    Self::draw_path(&mut grid, index, &[origin, target], key, random_selector);
                }
            }
            PathPattern::VerticalLanes => {
                for (index, &origin) in origins.iter().enumerate() {
                    let lane = (index + 1) * grid.cols() / (path_count + 1);
                    let lane = lane.min(grid.cols().saturating_sub(1));
                    let target = Self::top_third_target(&grid, Some(lane), random_selector);
                    Self::draw_path(&mut grid, index, &[origin, target], key, random_selector);
                }
            }
            PathPattern::MirroredS => {
                let half = grid.cols() / 2;
                for (index, &origin) in origins.iter().enumerate() {
                    let (bend_side, end_side) = if index % 2 == 0 {
                        (0..half, half..grid.cols())
                    } else {
                        (half..grid.cols(), 0..half)
                    };
                    let bend_col = bend_side.start
                        + random_selector.index(bend_side.len()).unwrap_or(0);
                    let end_col =
                        end_side.start + random_selector.index(end_side.len()).unwrap_or(0);
                    let bend = Coord::new(grid.rows() / 2, bend_col);
                    let target = Self::top_third_target(&grid, Some(end_col), random_selector);
                    Self::draw_path(&mut grid, index, &[origin, bend, target], key, random_selector);
                }
            }
            PathPattern::YJunction => {
                let junction = Coord::new(grid.rows() / 3 + 1, grid.cols() / 2);
                for (index, &origin) in origins.iter().enumerate() {
                    if index < 2 {
                        let paint = Self::path_tag(index);
                        let mut drawer = PathDrawer::new(random_selector);
                        drawer.draw(&mut grid, origin, junction, paint);
                    } else {
                        let target = Self::top_third_target(&grid, None, random_selector);
                        Self::draw_path(&mut grid, index, &[origin, target], key, random_selector);
                    }
                }
                let mut drawer = PathDrawer::new(random_selector);
                drawer.draw(&mut grid, junction, key, CellKind::Bridge);
            }
        }

        Self::carve_free_tiles(&mut grid, self.config.free_tile_count, random_selector);
        Ok(grid)
    }

    /// Tag painted for the zero-based path `index`
    fn path_tag(index: usize) -> CellKind {
        CellKind::Path(u8::try_from(index + 1).unwrap_or(u8::MAX))
    }

    /// Walk through `waypoints`, then bridge the walk's end to the key
    fn draw_path(
        grid: &mut Grid,
        index: usize,
        waypoints: &[Coord],
        key: Coord,
        random_selector: &mut RandomSelector,
    ) {
        let paint = Self::path_tag(index);
        let mut drawer = PathDrawer::new(random_selector);

        let mut end = waypoints.first().copied();
        for leg in waypoints.windows(2) {
            if let (Some(&from), Some(&to)) = (leg.first(), leg.get(1)) {
                let start = end.unwrap_or(from);
                end = drawer.draw(grid, start, to, paint).end();
            }
        }

        if let Some(end) = end {
            let bridge = drawer.draw(grid, end, key, CellKind::Bridge);
            debug!(
                "Path {} ends at {end}, bridge of {} cells (reached key: {})",
                index + 1,
                bridge.cells.len(),
                bridge.reached
            );
        }
    }

    /// Distinct start-adjacent cells, one per path
    ///
    /// When there are more paths than candidate cells, candidates are reused.
    pub fn path_origins(
        grid: &Grid,
        count: usize,
        random_selector: &mut RandomSelector,
    ) -> Vec<Coord> {
        let mut candidates = grid.cells_where(CellKind::is_paintable);
        candidates.retain(|&coord| {
            grid.neighbors(coord)
                .any(|n| grid.get(n) == Some(CellKind::Start))
        });
        random_selector.shuffle(&mut candidates);

        if candidates.is_empty() {
            return Vec::new();
        }
        candidates.iter().copied().cycle().take(count).collect()
    }

    /// Random cell in the top third, optionally pinned to a column
    fn top_third_target(
        grid: &Grid,
        column: Option<usize>,
        random_selector: &mut RandomSelector,
    ) -> Coord {
        let band = (grid.rows() / 3).max(1);
        let row = random_selector.index(band).unwrap_or(0);
        let col = column.unwrap_or_else(|| random_selector.index(grid.cols()).unwrap_or(0));
        let target = Coord::new(row, col);

        if grid.get(target) == Some(CellKind::Key) {
            Coord::new((row + 1).min(grid.rows().saturating_sub(1)), col)
        } else {
            target
        }
    }

    /// Open up `count` rock cells bordering walkable cells as free tiles
    pub fn carve_free_tiles(grid: &mut Grid, count: usize, random_selector: &mut RandomSelector) {
        for _ in 0..count {
            let candidates: Vec<Coord> = grid
                .cells_where(|kind| kind == CellKind::Rock)
                .into_iter()
                .filter(|&coord| {
                    grid.neighbors(coord)
                        .any(|n| grid.get(n).is_some_and(CellKind::is_traversable))
                })
                .collect();

            let Some(&choice) = random_selector.choose(&candidates) else {
                break;
            };
            grid.set(choice, CellKind::Free);
        }
    }
}
