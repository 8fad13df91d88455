//! Progressive requirement assignment along path groups
//!
//! Every path tag forms one group and all bridge cells form a pooled group.
//! Inside a group tiles are ordered bottom (entry side) to top (key side) and
//! required levels never decrease along that order. The [`Progression`] keeps
//! that order so later stages can nudge levels without breaking it.

use std::collections::HashMap;

use log::debug;

use crate::algorithm::balance::equalize;
use crate::io::configuration::{
    ASSIGNMENT_BALANCE_ITERATIONS, EASY_LEVELS, EASY_TIER_LIMIT, HARD_LEVELS, ItemChain,
    MEDIUM_LEVELS, MEDIUM_TIER_LIMIT, MIN_REQUIRED_LEVEL,
};
use crate::math::probability::RandomSelector;
use crate::spatial::grid::{CellKind, Coord, Grid};
use crate::spatial::tiles::{RequiredItem, Tile, index_by_coord};

/// Which cells a group was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Cells of one numbered path
    Path(u8),
    /// Pooled bridge cells
    Bridge,
}

/// Ordered tiles of one group, entry side first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGroup {
    /// Origin of the group
    pub kind: GroupKind,
    /// Tile indices from the entry side towards the key
    pub tiles: Vec<usize>,
}

/// Group ordering with predecessor/successor lookup per tile
#[derive(Debug, Clone, Default)]
pub struct Progression {
    groups: Vec<PathGroup>,
    previous: HashMap<usize, usize>,
    next: HashMap<usize, usize>,
}

impl Progression {
    /// Group the route tiles of `grid`
    ///
    /// Tiles are sorted by descending row, then ascending column. Path groups
    /// come first in path order, followed by the bridge pool.
    pub fn from_grid(grid: &Grid, tiles: &[Tile]) -> Self {
        let lookup = index_by_coord(tiles);
        let mut by_kind: HashMap<GroupKind, Vec<Coord>> = HashMap::new();

        for coord in grid.coords() {
            let kind = match grid.get(coord) {
                Some(CellKind::Path(index)) => GroupKind::Path(index),
                Some(CellKind::Bridge) => GroupKind::Bridge,
                _ => continue,
            };
            by_kind.entry(kind).or_default().push(coord);
        }

        let mut kinds: Vec<GroupKind> = by_kind.keys().copied().collect();
        kinds.sort_by_key(|kind| match kind {
            GroupKind::Path(index) => u16::from(*index),
            GroupKind::Bridge => u16::MAX,
        });

        let mut progression = Self::default();
        for kind in kinds {
            let mut coords = by_kind.remove(&kind).unwrap_or_default();
            coords.sort_by(|a, b| b.row.cmp(&a.row).then(a.col.cmp(&b.col)));
            let indices = coords
                .iter()
                .filter_map(|coord| lookup.get(coord).copied())
                .collect();
            progression.push_group(PathGroup {
                kind,
                tiles: indices,
            });
        }
        progression
    }

    /// Append a group, linking its tiles in order
    pub fn push_group(&mut self, group: PathGroup) {
        for pair in group.tiles.windows(2) {
            if let (Some(&before), Some(&after)) = (pair.first(), pair.get(1)) {
                self.next.insert(before, after);
                self.previous.insert(after, before);
            }
        }
        self.groups.push(group);
    }

    /// All groups, path groups first
    pub fn groups(&self) -> &[PathGroup] {
        &self.groups
    }

    /// Groups built from numbered paths
    pub fn path_groups(&self) -> impl Iterator<Item = &PathGroup> + '_ {
        self.groups
            .iter()
            .filter(|group| matches!(group.kind, GroupKind::Path(_)))
    }

    /// Whether `tile` may take `level` without breaking its group's order
    pub fn allows(&self, tiles: &[Tile], tile: usize, level: u8) -> bool {
        let previous_ok = self
            .previous
            .get(&tile)
            .and_then(|&p| tiles.get(p))
            .and_then(Tile::level)
            .is_none_or(|before| level >= before);
        let next_ok = self
            .next
            .get(&tile)
            .and_then(|&n| tiles.get(n))
            .and_then(Tile::level)
            .is_none_or(|after| level <= after);
        previous_ok && next_ok
    }
}

/// Level range of the difficulty tier at a relative position along a group
pub fn tier_levels(ratio: f64) -> (u8, u8) {
    if ratio <= EASY_TIER_LIMIT {
        EASY_LEVELS
    } else if ratio <= MEDIUM_TIER_LIMIT {
        MEDIUM_LEVELS
    } else {
        HARD_LEVELS
    }
}

/// Largest level a requirement of `item`'s chain may take
///
/// Falls back to the item's current level when its chain is unknown, which
/// freezes the tile against raises.
pub fn chain_cap(chains: &[ItemChain], item: &RequiredItem) -> u8 {
    chains
        .iter()
        .find(|chain| chain.name == item.chain)
        .or_else(|| chains.iter().find(|chain| chain.color == item.color))
        .map_or(item.level, ItemChain::level_cap)
}

/// Assigns leveled requirements along every group
pub struct RequirementAssigner<'a> {
    chains: &'a [ItemChain],
}

impl<'a> RequirementAssigner<'a> {
    /// Create an assigner over the resolved resource chains
    pub const fn new(chains: &'a [ItemChain]) -> Self {
        Self { chains }
    }

    /// Give every grouped tile a requirement, then equalize path group costs
    ///
    /// Chains rotate from tile to tile. Each level is sampled from the tier
    /// matching the tile's position ratio, raised to the previous tile's level
    /// and capped by its chain. If the rotating chain cannot host the previous
    /// level, the next chain that can is used instead.
    pub fn assign(
        &self,
        tiles: &mut [Tile],
        progression: &Progression,
        random_selector: &mut RandomSelector,
    ) {
        if self.chains.is_empty() {
            return;
        }

        for (group_index, group) in progression.groups().iter().enumerate() {
            let mut previous = MIN_REQUIRED_LEVEL;
            let last = group.tiles.len().saturating_sub(1);

            for (position, &tile_index) in group.tiles.iter().enumerate() {
                let ratio = if last == 0 {
                    0.0
                } else {
                    position as f64 / last as f64
                };
                let (low, high) = tier_levels(ratio);
                let sampled = random_selector.level_in(low, high);
                let wanted = sampled.max(previous).max(MIN_REQUIRED_LEVEL);

                let Some((chain, level)) = self.pick_chain(group_index + position, wanted) else {
                    continue;
                };
                if let Some(tile) = tiles.get_mut(tile_index) {
                    tile.lock_with(RequiredItem::new(chain, level));
                }
                previous = level;
            }
        }

        let routes: Vec<Vec<usize>> = progression
            .path_groups()
            .map(|group| group.tiles.clone())
            .collect();
        if routes.len() > 1 {
            let outcome = equalize(
                tiles,
                &routes,
                progression,
                self.chains,
                ASSIGNMENT_BALANCE_ITERATIONS,
            );
            debug!(
                "Coarse group equalization: {} iterations, spread {:.1}%",
                outcome.iterations, outcome.variance_percent
            );
        }
    }

    /// Chain at rotation `slot` or the next one able to host `wanted`
    fn pick_chain(&self, slot: usize, wanted: u8) -> Option<(&'a ItemChain, u8)> {
        let count = self.chains.len();
        let fitting = (0..count)
            .filter_map(|offset| self.chains.get((slot + offset) % count))
            .find(|chain| chain.level_cap() >= wanted);

        if let Some(chain) = fitting {
            return Some((chain, wanted));
        }

        self.chains
            .iter()
            .max_by_key(|chain| chain.level_cap())
            .map(|chain| (chain, chain.level_cap().max(MIN_REQUIRED_LEVEL)))
    }
}

/// Flag the entry tile of every path group
///
/// The entry is the group tile farthest (Manhattan) from the key; ties go to
/// the tile farther from the board's centre column, then to the lower row.
/// Two groups never get entries in the same column. Returns the flagged tiles.
pub fn flag_entry_points(
    tiles: &mut [Tile],
    progression: &Progression,
    key: Coord,
    cols: usize,
) -> Vec<usize> {
    let centre = cols.saturating_sub(1) as f64 / 2.0;
    let mut entries: Vec<usize> = Vec::new();

    for group in progression.path_groups() {
        let best = group.tiles.iter().copied().max_by(|&a, &b| {
            let (Some(tile_a), Some(tile_b)) = (tiles.get(a), tiles.get(b)) else {
                return std::cmp::Ordering::Equal;
            };
            let (coord_a, coord_b) = (tile_a.coord(), tile_b.coord());
            let side_a = (coord_a.col as f64 - centre).abs();
            let side_b = (coord_b.col as f64 - centre).abs();
            coord_a
                .manhattan(key)
                .cmp(&coord_b.manhattan(key))
                .then(side_a.total_cmp(&side_b))
                .then(coord_a.row.cmp(&coord_b.row))
        });

        let Some(best) = best else {
            continue;
        };
        let Some(col) = tiles.get(best).map(|t| t.col) else {
            continue;
        };
        let column_taken = entries
            .iter()
            .any(|&e| tiles.get(e).is_some_and(|t| t.col == col));
        if column_taken {
            debug!("Skipping entry in already used column {col}");
            continue;
        }

        if let Some(tile) = tiles.get_mut(best) {
            tile.is_entry_point = true;
        }
        entries.push(best);
    }

    entries
}

/// Keep entry requirements within one level of the easiest entry
///
/// Levels are only lowered, and never below what the group order allows.
pub fn harmonize_entry_levels(tiles: &mut [Tile], entries: &[usize], progression: &Progression) {
    let levels: Vec<u8> = entries
        .iter()
        .filter_map(|&e| tiles.get(e).and_then(Tile::level))
        .collect();
    if levels.len() < 2 {
        return;
    }
    let Some(&lowest) = levels.iter().min() else {
        return;
    };

    for &entry in entries {
        let Some(current) = tiles.get(entry).and_then(Tile::level) else {
            continue;
        };
        let mut target = lowest + 1;
        while target < current && !progression.allows(tiles, entry, target) {
            target += 1;
        }
        if let Some(tile) = tiles.get_mut(entry).filter(|_| target < current) {
            tile.set_level(target);
        }
    }
}
