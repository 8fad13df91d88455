//! Exhaustive route enumeration from entry points to the key

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::balance::equalize;
use crate::algorithm::bitset::CellBitset;
use crate::algorithm::drawer::PathDrawer;
use crate::algorithm::repair::repair_reachability;
use crate::algorithm::requirements::{GroupKind, PathGroup, Progression};
use crate::io::configuration::ItemChain;
use crate::math::probability::RandomSelector;
use crate::spatial::grid::{CellKind, Coord, Direction, Grid};
use crate::spatial::tiles::{Tile, index_by_coord};

/// A simple route from an entry point to the key with its traversal cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePath {
    /// Zero-based cells from the entry point to the key, inclusive
    pub cells: Vec<Coord>,
    /// Sum of `2^(level-1)` over the route's tiles carrying a requirement
    pub cost: u64,
}

impl RoutePath {
    /// First cell of the route
    pub fn entry(&self) -> Option<Coord> {
        self.cells.first().copied()
    }
}

/// Cost of a cell sequence given the tiles of the board
pub fn route_cost(cells: &[Coord], tiles: &[Tile], lookup: &HashMap<Coord, usize>) -> u64 {
    cells
        .iter()
        .filter_map(|coord| lookup.get(coord).and_then(|&i| tiles.get(i)))
        .map(Tile::cost)
        .sum()
}

/// Finds every simple route from the flagged entries to the key
///
/// Routes may only use path, bridge and key cells. The per-entry cap bounds
/// the otherwise exponential search on dense boards; routes beyond it are
/// silently not reported.
pub struct PathEnumerator<'a> {
    grid: &'a Grid,
    max_paths_per_entry: usize,
}

impl<'a> PathEnumerator<'a> {
    /// Create an enumerator over `grid`
    pub const fn new(grid: &'a Grid, max_paths_per_entry: usize) -> Self {
        Self {
            grid,
            max_paths_per_entry,
        }
    }

    /// Simple cell sequences from `entry` to `key`
    ///
    /// Iterative depth-first search with an explicit stack of direction
    /// cursors, one per cell on the current route.
    pub fn routes_from(&self, entry: Coord, key: Coord) -> Vec<Vec<Coord>> {
        let mut found = Vec::new();
        if !self.grid.get(entry).is_some_and(CellKind::is_route) {
            return found;
        }

        let mut on_route = CellBitset::new(self.grid.rows(), self.grid.cols());
        let mut route = vec![entry];
        let mut cursors: Vec<usize> = vec![0];
        on_route.insert(entry);

        while let Some(&cursor) = cursors.last() {
            let Some(&current) = route.last() else {
                break;
            };

            if current == key {
                found.push(route.clone());
                if found.len() >= self.max_paths_per_entry {
                    break;
                }
                cursors.pop();
                on_route.remove(current);
                route.pop();
                continue;
            }

            let Some(&direction) = Direction::ALL.get(cursor) else {
                cursors.pop();
                on_route.remove(current);
                route.pop();
                continue;
            };
            if let Some(top) = cursors.last_mut() {
                *top += 1;
            }

            let next = self.grid.step(current, direction).filter(|&next| {
                self.grid.get(next).is_some_and(CellKind::is_route) && !on_route.contains(next)
            });
            if let Some(next) = next {
                on_route.insert(next);
                route.push(next);
                cursors.push(0);
            }
        }

        found
    }

    /// Enumerate, cost, deduplicate and merge routes from every flagged entry
    pub fn enumerate(&self, tiles: &[Tile]) -> Vec<RoutePath> {
        let Some(key) = self.grid.key() else {
            return Vec::new();
        };
        let lookup = index_by_coord(tiles);

        let mut routes: Vec<RoutePath> = Vec::new();
        let mut seen: HashMap<Vec<Coord>, usize> = HashMap::new();

        for tile in tiles.iter().filter(|t| t.is_entry_point) {
            let found = self.routes_from(tile.coord(), key);
            debug!("Entry {} yields {} routes", tile.coord(), found.len());

            for cells in found {
                let cost = route_cost(&cells, tiles, &lookup);
                if let Some(&existing) = seen.get(&cells) {
                    if let Some(route) = routes.get_mut(existing) {
                        route.cost = route.cost.min(cost);
                    }
                    continue;
                }
                seen.insert(cells.clone(), routes.len());
                routes.push(RoutePath { cells, cost });
            }
        }

        merge_detours(routes)
    }
}

/// Whether `shorter` appears in `longer` in order, possibly with gaps
fn is_contained(shorter: &[Coord], longer: &[Coord]) -> bool {
    let mut remaining = longer.iter();
    shorter
        .iter()
        .all(|cell| remaining.by_ref().any(|other| other == cell))
}

/// Fold a main route and its detour variant into one completionist route
///
/// Applies only where exactly two routes share a starting cell: if the
/// shorter one's cells appear in order inside the strictly longer one, the
/// shorter is dropped.
pub fn merge_detours(routes: Vec<RoutePath>) -> Vec<RoutePath> {
    let mut by_entry: HashMap<Coord, Vec<usize>> = HashMap::new();
    for (index, route) in routes.iter().enumerate() {
        if let Some(entry) = route.entry() {
            by_entry.entry(entry).or_default().push(index);
        }
    }

    let mut dropped: HashSet<usize> = HashSet::new();
    for indices in by_entry.values() {
        let [first, second] = indices.as_slice() else {
            continue;
        };
        let (Some(a), Some(b)) = (routes.get(*first), routes.get(*second)) else {
            continue;
        };
        let (short_index, short, long) = if a.cells.len() < b.cells.len() {
            (*first, a, b)
        } else {
            (*second, b, a)
        };
        if short.cells.len() < long.cells.len() && is_contained(&short.cells, &long.cells) {
            debug!("Merging detour route from {:?}", short.entry());
            dropped.insert(short_index);
        }
    }

    routes
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, route)| route)
        .collect()
}

/// Clear entry flags that start no surviving route
///
/// If no entry survives, the bottom-most tile of the first non-empty path group
/// is flagged instead. Returns the number of entries left flagged.
pub fn correct_entry_points(
    tiles: &mut [Tile],
    progression: &Progression,
    routes: &[RoutePath],
) -> usize {
    let starts: HashSet<Coord> = routes.iter().filter_map(RoutePath::entry).collect();

    for tile in tiles.iter_mut().filter(|t| t.is_entry_point) {
        if !starts.contains(&tile.coord()) {
            debug!("Clearing entry flag at {}", tile.coord());
            tile.is_entry_point = false;
        }
    }

    let remaining = tiles.iter().filter(|t| t.is_entry_point).count();
    if remaining > 0 {
        return remaining;
    }

    let fallback = progression
        .path_groups()
        .find_map(|group| group.tiles.first().copied());
    if let Some(tile) = fallback.and_then(|index| tiles.get_mut(index)) {
        warn!("No entry point survived, falling back to {}", tile.coord());
        tile.is_entry_point = true;
        return 1;
    }
    0
}

/// Connect the longest path group straight to the key
///
/// Draws one bridge walk from the group's tile closest to the key, then runs
/// reachability repair again. Every newly opened cell becomes a semi-locked
/// tile demanding that tile's requirement, and together they form a new group
/// in `progression`. Returns the grid and whether anything was opened.
pub fn connect_longest_group(
    mut grid: Grid,
    tiles: &mut [Tile],
    progression: &mut Progression,
    random_selector: &mut RandomSelector,
) -> (Grid, bool) {
    let Some(key) = grid.key() else {
        return (grid, false);
    };
    let Some(group) = progression.path_groups().max_by_key(|g| g.tiles.len()) else {
        return (grid, false);
    };

    let origin = group
        .tiles
        .iter()
        .copied()
        .filter_map(|index| tiles.get(index).map(|tile| (index, tile.coord())))
        .min_by_key(|&(_, coord)| coord.manhattan(key));
    let Some((origin_index, origin)) = origin else {
        return (grid, false);
    };

    info!("Targeted repair: bridging {origin} to the key at {key}");
    let walk = PathDrawer::new(random_selector).draw(&mut grid, origin, key, CellKind::Bridge);
    let (grid, report) = repair_reachability(grid);

    let requirement = tiles
        .get(origin_index)
        .and_then(|tile| tile.required_item.clone());
    let lookup = index_by_coord(tiles);
    let mut added = Vec::new();
    for coord in walk.painted.iter().chain(&report.converted) {
        let Some(&index) = lookup.get(coord) else {
            continue;
        };
        if let (Some(tile), Some(item)) = (tiles.get_mut(index), requirement.clone()) {
            tile.lock_with(item);
            added.push(index);
        }
    }

    let drew = !added.is_empty();
    if drew {
        progression.push_group(PathGroup {
            kind: GroupKind::Bridge,
            tiles: added,
        });
    }
    (grid, drew)
}

/// Final route balancing over enumerated routes
///
/// Converts each route into tile indices, runs [`equalize`] and writes the
/// resulting costs back into the routes. Returns the iterations spent.
pub fn balance_routes(
    tiles: &mut [Tile],
    routes: &mut [RoutePath],
    progression: &Progression,
    chains: &[ItemChain],
    max_iterations: usize,
) -> usize {
    let lookup = index_by_coord(tiles);
    let indexed: Vec<Vec<usize>> = routes
        .iter()
        .map(|route| {
            route
                .cells
                .iter()
                .filter_map(|coord| lookup.get(coord).copied())
                .collect()
        })
        .collect();

    let outcome = equalize(tiles, &indexed, progression, chains, max_iterations);
    for (route, cost) in routes.iter_mut().zip(outcome.costs) {
        route.cost = cost;
    }
    info!(
        "Balanced {} routes in {} iterations ({} adjustments, spread {:.1}%)",
        routes.len(),
        outcome.iterations,
        outcome.adjustments,
        outcome.variance_percent
    );
    outcome.iterations
}
