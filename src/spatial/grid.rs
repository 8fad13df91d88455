//! Cell-type grid shared by the synthesis and repair stages
//!
//! The grid is a plain matrix of [`CellKind`] tags. Stages take it by value,
//! mutate it and hand it on, so no two stages ever hold it at the same time.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::io::error::{Result, invalid_grid};

/// Zero-based grid coordinate, row 0 being the top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, growing downwards
    pub row: usize,
    /// Column index, growing to the right
    pub col: usize,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another coordinate
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four orthogonal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All directions in neighbor scan order
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Tag of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Impassable filler
    Rock,
    /// Part of the unlocked start region
    Start,
    /// Open exploration cell without a requirement
    Free,
    /// The goal cell
    Key,
    /// Cell of the numbered unlock path
    Path(u8),
    /// Connector cell linking paths to the key or to the start region
    Bridge,
}

impl CellKind {
    /// Normalize a layout token into a cell tag
    ///
    /// Matching is case-insensitive and accepts the short aliases used by
    /// hand-written layouts. Returns `None` for unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "rock" | "r" | "#" | "x" => Some(Self::Rock),
            "start" | "s" => Some(Self::Start),
            "free" | "f" | "." => Some(Self::Free),
            "key" | "k" | "goal" => Some(Self::Key),
            "bridge" | "b" => Some(Self::Bridge),
            other => other
                .strip_prefix("path")
                .or_else(|| other.strip_prefix('p'))
                .and_then(|index| index.parse::<u8>().ok())
                .map(Self::Path),
        }
    }

    /// Canonical layout token for this tag
    pub fn token(self) -> String {
        match self {
            Self::Rock => "rock".to_string(),
            Self::Start => "start".to_string(),
            Self::Free => "free".to_string(),
            Self::Key => "key".to_string(),
            Self::Path(index) => format!("path{index}"),
            Self::Bridge => "bridge".to_string(),
        }
    }

    /// Anything but rock can be walked over
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Rock)
    }

    /// Path, bridge and key cells form the routes towards the key
    pub const fn is_route(self) -> bool {
        matches!(self, Self::Path(_) | Self::Bridge | Self::Key)
    }

    /// Drawing may paint over rock and free cells only
    pub const fn is_paintable(self) -> bool {
        matches!(self, Self::Rock | Self::Free)
    }
}

/// Rectangular matrix of cell tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<CellKind>,
}

impl Grid {
    /// Create a grid filled with rock
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: Array2::from_elem((rows, cols), CellKind::Rock),
        }
    }

    /// Build a grid from a static token layout
    ///
    /// Unknown tokens are read as rock with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty, its rows differ in length, or
    /// it does not contain exactly one key cell
    pub fn from_tokens(layout: &[Vec<String>]) -> Result<Self> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(invalid_grid(&"layout has no cells"));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, tokens) in layout.iter().enumerate() {
            if tokens.len() != cols {
                return Err(invalid_grid(&format!(
                    "row {row} has {} cells, expected {cols}",
                    tokens.len()
                )));
            }
            for (col, token) in tokens.iter().enumerate() {
                let kind = CellKind::from_token(token).unwrap_or_else(|| {
                    log::warn!("Unknown cell token '{token}' at ({row}, {col}), using rock");
                    CellKind::Rock
                });
                cells.push(kind);
            }
        }

        let cells = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|error| invalid_grid(&error))?;
        let grid = Self { cells };
        grid.ensure_single_key()?;
        Ok(grid)
    }

    /// Token layout of the grid, the inverse of [`Grid::from_tokens`]
    pub fn to_tokens(&self) -> Vec<Vec<String>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|kind| kind.token()).collect())
            .collect()
    }

    /// Get the number of rows in the grid
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Get the number of columns in the grid
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Tag at a coordinate, `None` outside the grid
    pub fn get(&self, coord: Coord) -> Option<CellKind> {
        self.cells.get((coord.row, coord.col)).copied()
    }

    /// Overwrite the tag at a coordinate
    ///
    /// Returns false when the coordinate lies outside the grid.
    pub fn set(&mut self, coord: Coord, kind: CellKind) -> bool {
        self.cells
            .get_mut((coord.row, coord.col))
            .map(|cell| *cell = kind)
            .is_some()
    }

    /// Check if a coordinate lies inside the grid
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows() && coord.col < self.cols()
    }

    /// Neighbor one step away in `direction`, if inside the grid
    pub fn step(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let next = match direction {
            Direction::Up => Coord::new(coord.row.checked_sub(1)?, coord.col),
            Direction::Down => Coord::new(coord.row + 1, coord.col),
            Direction::Left => Coord::new(coord.row, coord.col.checked_sub(1)?),
            Direction::Right => Coord::new(coord.row, coord.col + 1),
        };
        self.contains(next).then_some(next)
    }

    /// In-grid neighbors in up, down, left, right order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(coord, direction))
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), _)| Coord::new(row, col))
    }

    /// Coordinates whose tag satisfies `predicate`, row-major
    pub fn cells_where(&self, predicate: impl Fn(CellKind) -> bool) -> Vec<Coord> {
        self.cells
            .indexed_iter()
            .filter(|(_, kind)| predicate(**kind))
            .map(|((row, col), _)| Coord::new(row, col))
            .collect()
    }

    /// Number of cells carrying `kind`
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Coordinate of the first key cell
    pub fn key(&self) -> Option<Coord> {
        self.cells_where(|kind| kind == CellKind::Key).first().copied()
    }

    /// Start region cells, row-major
    pub fn start_cells(&self) -> Vec<Coord> {
        self.cells_where(|kind| kind == CellKind::Start)
    }

    /// Check the single-key invariant
    ///
    /// # Errors
    ///
    /// Returns an error if the grid holds no key or more than one
    pub fn ensure_single_key(&self) -> Result<()> {
        match self.count(CellKind::Key) {
            1 => Ok(()),
            count => Err(invalid_grid(&format!(
                "expected exactly one key cell, found {count}"
            ))),
        }
    }

    /// Fill a `height` x `width` block anchored at `origin` with start cells
    ///
    /// Parts of the block falling outside the grid are ignored.
    pub fn place_start_block(&mut self, origin: Coord, height: usize, width: usize) {
        for row in origin.row..origin.row + height {
            for col in origin.col..origin.col + width {
                self.set(Coord::new(row, col), CellKind::Start);
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let line: String = row
                .iter()
                .map(|kind| match kind {
                    CellKind::Rock => '#',
                    CellKind::Start => 'S',
                    CellKind::Free => '.',
                    CellKind::Key => 'K',
                    CellKind::Path(index) => char::from_digit(u32::from(*index), 10).unwrap_or('P'),
                    CellKind::Bridge => 'B',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
