//! Procedural board generator for merge-and-unlock puzzles
//!
//! A board is a small grid holding a start region, a single key tile and one or
//! more unlock paths whose tiles demand leveled resources. Generation runs as a
//! pipeline: grid synthesis, reachability repair, requirement assignment, route
//! enumeration and cost balancing, so that every route to the key costs about
//! the same.

#![forbid(unsafe_code)]

/// Pipeline stages from grid synthesis to cost balancing
pub mod algorithm;
/// Route statistics and re-analysis of edited boards
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Cost arithmetic and seeded randomness
pub mod math;
/// Grid, coordinate and tile data structures
pub mod spatial;

pub use algorithm::executor::{BoardGenerator, GeneratedBoard};
pub use io::error::{GeneratorError, Result};
