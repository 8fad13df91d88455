//! Biased random walks painting routes onto the grid

use log::trace;

use crate::io::configuration::{DETOUR_PROBABILITY, WALK_STEP_FACTOR};
use crate::math::probability::RandomSelector;
use crate::spatial::grid::{CellKind, Coord, Direction, Grid};

/// Cells visited by a single walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Visited cells in walking order, starting with the origin
    pub cells: Vec<Coord>,
    /// Cells that were rock or free before this walk painted them
    pub painted: Vec<Coord>,
    /// Whether the walk arrived at (or, for the key, next to) its target
    pub reached: bool,
}

impl Walk {
    /// Last visited cell
    pub fn end(&self) -> Option<Coord> {
        self.cells.last().copied()
    }
}

/// Draws routes with a random walk biased towards a target
///
/// Each step heads for the target along the axis with the larger remaining
/// distance, except that with [`DETOUR_PROBABILITY`] it steps in a random
/// direction instead. Start cells and the key are never painted over, and
/// cells already carrying another route tag keep it.
pub struct PathDrawer<'a> {
    random_selector: &'a mut RandomSelector,
    detour_probability: f64,
}

impl<'a> PathDrawer<'a> {
    /// Create a drawer using the default detour probability
    pub const fn new(random_selector: &'a mut RandomSelector) -> Self {
        Self {
            random_selector,
            detour_probability: DETOUR_PROBABILITY,
        }
    }

    /// Override the detour probability
    #[must_use]
    pub const fn with_detour_probability(mut self, probability: f64) -> Self {
        self.detour_probability = probability;
        self
    }

    /// Walk from `from` to `target`, painting visited cells with `paint`
    ///
    /// A walk targeting the key stops next to it without entering it. Walks are
    /// bounded by `WALK_STEP_FACTOR` times the number of cells.
    pub fn draw(&mut self, grid: &mut Grid, from: Coord, target: Coord, paint: CellKind) -> Walk {
        let mut walk = Walk {
            cells: vec![from],
            painted: Vec::new(),
            reached: false,
        };
        Self::paint(grid, from, paint, &mut walk.painted);

        let targets_key = grid.get(target) == Some(CellKind::Key);
        let step_limit = WALK_STEP_FACTOR * grid.rows() * grid.cols();
        let mut current = from;

        for _ in 0..step_limit {
            if current == target || (targets_key && current.manhattan(target) == 1) {
                walk.reached = true;
                break;
            }

            let Some(next) = self.next_step(grid, current, target, targets_key) else {
                trace!("Walk from {from} stuck at {current}");
                break;
            };

            if targets_key && next == target {
                walk.reached = true;
                break;
            }

            Self::paint(grid, next, paint, &mut walk.painted);
            walk.cells.push(next);
            current = next;
        }

        if !walk.reached {
            walk.reached =
                current == target || (targets_key && current.manhattan(target) == 1);
        }
        walk
    }

    fn paint(grid: &mut Grid, coord: Coord, paint: CellKind, painted: &mut Vec<Coord>) {
        if grid.get(coord).is_some_and(CellKind::is_paintable) {
            grid.set(coord, paint);
            painted.push(coord);
        }
    }

    fn next_step(
        &mut self,
        grid: &Grid,
        current: Coord,
        target: Coord,
        targets_key: bool,
    ) -> Option<Coord> {
        let allowed = |coord: Coord| match grid.get(coord) {
            Some(CellKind::Start) | None => false,
            Some(CellKind::Key) => targets_key && coord == target,
            Some(_) => true,
        };

        if !self.random_selector.chance(self.detour_probability) {
            for direction in self.toward(current, target) {
                if let Some(next) = grid.step(current, direction).filter(|&c| allowed(c)) {
                    return Some(next);
                }
            }
        }

        let options: Vec<Coord> = grid.neighbors(current).filter(|&c| allowed(c)).collect();
        self.random_selector.choose(&options).copied()
    }

    /// Directions reducing the distance to `target`, larger axis first
    fn toward(&mut self, current: Coord, target: Coord) -> Vec<Direction> {
        let vertical = match current.row.cmp(&target.row) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        };
        let horizontal = match current.col.cmp(&target.col) {
            std::cmp::Ordering::Greater => Some(Direction::Left),
            std::cmp::Ordering::Less => Some(Direction::Right),
            std::cmp::Ordering::Equal => None,
        };

        let row_distance = current.row.abs_diff(target.row);
        let col_distance = current.col.abs_diff(target.col);
        let vertical_first = match row_distance.cmp(&col_distance) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.random_selector.chance(0.5),
        };

        let ordered = if vertical_first {
            [vertical, horizontal]
        } else {
            [horizontal, vertical]
        };
        ordered.into_iter().flatten().collect()
    }
}
