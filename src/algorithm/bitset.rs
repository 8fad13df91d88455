use bitvec::prelude::*;
use std::fmt;

use crate::spatial::grid::Coord;

/// Fixed-size bitset over the cells of a grid
///
/// Used for visited sets in breadth-first reachability checks and for the
/// on-route set of the depth-first route search. Coordinates outside the
/// grid are never members.
#[derive(Clone, Debug)]
pub struct CellBitset {
    bits: BitVec,
    rows: usize,
    cols: usize,
}

impl CellBitset {
    /// Create an empty bitset for a `rows` x `cols` grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            bits: bitvec![0; rows * cols],
            rows,
            cols,
        }
    }

    const fn slot(&self, coord: Coord) -> Option<usize> {
        if coord.row < self.rows && coord.col < self.cols {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Insert a cell, returning true if it was not yet present
    pub fn insert(&mut self, coord: Coord) -> bool {
        let Some(slot) = self.slot(coord) else {
            return false;
        };
        let was_present = self.bits.get(slot).as_deref() == Some(&true);
        self.bits.set(slot, true);
        !was_present
    }

    /// Remove a cell
    pub fn remove(&mut self, coord: Coord) {
        if let Some(slot) = self.slot(coord) {
            self.bits.set(slot, false);
        }
    }

    /// Test cell membership
    pub fn contains(&self, coord: Coord) -> bool {
        self.slot(coord)
            .is_some_and(|slot| self.bits.get(slot).as_deref() == Some(&true))
    }

    /// Count cells in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Extract all member cells, row-major
    pub fn to_vec(&self) -> Vec<Coord> {
        self.bits
            .iter_ones()
            .map(|slot| Coord::new(slot / self.cols.max(1), slot % self.cols.max(1)))
            .collect()
    }
}

impl fmt::Display for CellBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellBitset({} cells: {:?})", self.count(), self.to_vec())
    }
}
