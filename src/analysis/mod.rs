//! Route statistics for generated and edited boards

/// Re-analysis of externally edited tile lists
pub mod reanalysis;
/// Cost statistics over enumerated routes
pub mod statistics;

pub use reanalysis::reanalyze;
pub use statistics::Analysis;
