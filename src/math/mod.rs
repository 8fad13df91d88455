//! Mathematical utilities for the generator

/// Route cost arithmetic and spread statistics
pub mod cost;
/// Seedable random source shared by all pipeline stages
pub mod probability;
