//! Spatial data structures for board layouts
//!
//! This module contains spatial-related functionality including:
//! - The cell-type grid and its coordinates
//! - Tile records and their extraction from a grid

/// Cell-type grid, coordinates and directions
pub mod grid;
/// Tile records and grid-to-tile extraction
pub mod tiles;

pub use grid::{CellKind, Coord, Grid};
pub use tiles::{Tile, TileType};
