use std::collections::VecDeque;

use log::{debug, warn};

use crate::algorithm::bitset::CellBitset;
use crate::spatial::grid::{CellKind, Coord, Grid};

/// Summary of the cells touched by reachability repair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Rock cells converted into bridges, in conversion order
    pub converted: Vec<Coord>,
    /// Route cells still unreachable when repair stopped
    pub unreached: Vec<Coord>,
}

impl RepairReport {
    /// Whether every route cell is reachable from the start region
    pub fn connected(&self) -> bool {
        self.unreached.is_empty()
    }
}

/// Cells reachable from any start cell over non-rock cells
///
/// Breadth-first search seeded with every start cell, moving in the four
/// orthogonal directions.
pub fn reachable_cells(grid: &Grid) -> CellBitset {
    let mut visited = CellBitset::new(grid.rows(), grid.cols());
    let mut queue: VecDeque<Coord> = VecDeque::new();

    for start in grid.start_cells() {
        if visited.insert(start) {
            queue.push_back(start);
        }
    }

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors(current) {
            if grid.get(next).is_some_and(CellKind::is_traversable) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

/// Path, bridge and key cells missing from `visited`, row-major
pub fn unreached_route_cells(grid: &Grid, visited: &CellBitset) -> Vec<Coord> {
    grid.cells_where(CellKind::is_route)
        .into_iter()
        .filter(|&coord| !visited.contains(coord))
        .collect()
}

/// Check if every route cell can be reached from the start region
pub fn is_fully_connected(grid: &Grid) -> bool {
    unreached_route_cells(grid, &reachable_cells(grid)).is_empty()
}

/// Convert blocking rock into bridges until every route cell is reachable
///
/// Each round runs a fresh reachability search, then looks at the unreached
/// route cells in row-major order. The first rock neighbor (scanned up, down,
/// left, right) that itself touches the reachable region becomes a bridge and
/// the round restarts. Every round converts one rock cell, so the loop ends
/// after at most as many rounds as there are rock cells. When no unreached
/// cell has such a neighbor the grid is handed back unchanged from that point
/// and the report lists what is still unreachable.
pub fn repair_reachability(mut grid: Grid) -> (Grid, RepairReport) {
    let mut report = RepairReport::default();

    loop {
        let visited = reachable_cells(&grid);
        let unreached = unreached_route_cells(&grid, &visited);
        if unreached.is_empty() {
            break;
        }

        let candidate = unreached.iter().find_map(|&cell| {
            grid.neighbors(cell).find(|&neighbor| {
                grid.get(neighbor) == Some(CellKind::Rock)
                    && grid.neighbors(neighbor).any(|n| visited.contains(n))
            })
        });

        let Some(rock) = candidate else {
            warn!(
                "Reachability repair gave up with {} unreachable route cells",
                unreached.len()
            );
            report.unreached = unreached;
            break;
        };

        debug!("Converting rock at {rock} into a bridge");
        grid.set(rock, CellKind::Bridge);
        report.converted.push(rock);
    }

    (grid, report)
}
