//! Runtime tile records extracted from a finished grid

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::io::configuration::{GENERATOR_COUNT, ItemChain};
use crate::io::error::{Result, invalid_grid};
use crate::math::cost::tile_cost;
use crate::spatial::grid::{CellKind, Coord, Grid};

/// Gameplay type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    /// Open tile
    Free,
    /// Impassable tile
    Rock,
    /// Locked tile opened by delivering its required item
    SemiLocked,
    /// The goal tile
    Key,
}

/// Item a player must deliver to open a semi-locked tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredItem {
    /// Item level, at least 2 and below the chain's maximum
    pub level: u8,
    /// Name of the chain the item belongs to
    pub chain: String,
    /// Display color of the chain
    pub color: String,
    /// Human readable item name
    pub name: String,
}

impl RequiredItem {
    /// Requirement for an item of `chain` at `level`
    pub fn new(chain: &ItemChain, level: u8) -> Self {
        Self {
            level,
            chain: chain.name.clone(),
            color: chain.color.clone(),
            name: format!("{} Lv.{level}", chain.name),
        }
    }

    /// Change the level, keeping the display name in step
    pub fn set_level(&mut self, level: u8) {
        self.level = level;
        self.name = format!("{} Lv.{level}", self.chain);
    }
}

/// One board cell as seen by the game layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// One-based row
    pub row: usize,
    /// One-based column
    pub col: usize,
    /// Gameplay type
    pub tile_type: TileType,
    /// Whether the tile starts open
    pub unlocked: bool,
    /// Whether the tile is visible through the fog of war
    pub discovered: bool,
    /// Requirement for semi-locked tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_item: Option<RequiredItem>,
    /// Whether route enumeration starts here
    #[serde(default, alias = "isEntryPoint")]
    pub is_entry_point: bool,
    /// Chain produced by a generator standing on this tile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl Tile {
    /// Zero-based grid coordinate of the tile
    pub const fn coord(&self) -> Coord {
        Coord::new(self.row.saturating_sub(1), self.col.saturating_sub(1))
    }

    /// Required level, if any
    pub fn level(&self) -> Option<u8> {
        self.required_item.as_ref().map(|item| item.level)
    }

    /// Cost contributed to a route crossing this tile
    pub fn cost(&self) -> u64 {
        self.level().map_or(0, tile_cost)
    }

    /// Overwrite the required level, if the tile has a requirement
    pub fn set_level(&mut self, level: u8) {
        if let Some(item) = self.required_item.as_mut() {
            item.set_level(level);
        }
    }

    /// Turn the tile into a semi-locked route tile demanding `item`
    pub fn lock_with(&mut self, item: RequiredItem) {
        self.tile_type = TileType::SemiLocked;
        self.unlocked = false;
        self.required_item = Some(item);
    }
}

/// Tile extraction from a synthesized grid
pub struct TileExtractor;

impl TileExtractor {
    /// Convert every grid cell into a tile, row-major
    ///
    /// Start cells are unlocked; route cells become semi-locked tiles without a
    /// requirement yet. Start cells and their neighbors are discovered. The
    /// first start cells of the bottom-most start row host one generator per
    /// resource chain.
    pub fn extract_tiles(grid: &Grid, chains: &[ItemChain]) -> Vec<Tile> {
        let generators = Self::generator_positions(grid);

        grid.coords()
            .map(|coord| {
                let kind = grid.get(coord).unwrap_or(CellKind::Rock);
                let discovered = kind == CellKind::Start
                    || grid
                        .neighbors(coord)
                        .any(|n| grid.get(n) == Some(CellKind::Start));
                let generator = generators
                    .iter()
                    .position(|&g| g == coord)
                    .and_then(|slot| chains.get(slot))
                    .map(|chain| chain.name.clone());

                let (tile_type, unlocked) = match kind {
                    CellKind::Rock => (TileType::Rock, false),
                    CellKind::Start => (TileType::Free, true),
                    CellKind::Free => (TileType::Free, false),
                    CellKind::Key => (TileType::Key, false),
                    CellKind::Path(_) | CellKind::Bridge => (TileType::SemiLocked, false),
                };

                Tile {
                    row: coord.row + 1,
                    col: coord.col + 1,
                    tile_type,
                    unlocked,
                    discovered,
                    required_item: None,
                    is_entry_point: false,
                    generator,
                }
            })
            .collect()
    }

    /// Generator slots: leftmost start cells on the bottom-most start row
    pub fn generator_positions(grid: &Grid) -> Vec<Coord> {
        let starts = grid.start_cells();
        let Some(bottom) = starts.iter().map(|c| c.row).max() else {
            return Vec::new();
        };

        starts
            .into_iter()
            .filter(|c| c.row == bottom)
            .take(GENERATOR_COUNT)
            .collect()
    }

    /// Rebuild a cell grid from an edited tile list
    ///
    /// Semi-locked tiles become bridge cells, open free tiles become start cells
    /// and locked free tiles free cells. Cells without a tile are rock.
    ///
    /// # Errors
    ///
    /// Returns an error if the tile list is empty or holds no or several key tiles
    pub fn rebuild_grid(tiles: &[Tile]) -> Result<Grid> {
        let rows = tiles.iter().map(|t| t.row).max().unwrap_or(0);
        let cols = tiles.iter().map(|t| t.col).max().unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(invalid_grid(&"tile list has no positioned tiles"));
        }

        let mut grid = Grid::new(rows, cols);
        for tile in tiles {
            let kind = match (tile.tile_type, tile.unlocked) {
                (TileType::Rock, _) => CellKind::Rock,
                (TileType::Free, true) => CellKind::Start,
                (TileType::Free, false) => CellKind::Free,
                (TileType::SemiLocked, _) => CellKind::Bridge,
                (TileType::Key, _) => CellKind::Key,
            };
            grid.set(tile.coord(), kind);
        }

        grid.ensure_single_key()?;
        Ok(grid)
    }
}

/// Map every tile coordinate to its index in the tile list
pub fn index_by_coord(tiles: &[Tile]) -> HashMap<Coord, usize> {
    tiles
        .iter()
        .enumerate()
        .map(|(index, tile)| (tile.coord(), index))
        .collect()
}
