//! Re-analysis of tile sets edited outside the generator

use log::info;

use crate::algorithm::enumeration::PathEnumerator;
use crate::algorithm::repair::is_fully_connected;
use crate::analysis::statistics::Analysis;
use crate::io::configuration::Milestone;
use crate::io::error::Result;
use crate::spatial::tiles::{Tile, TileExtractor};

/// Analyse an edited tile list without touching its levels
///
/// The cell grid is rebuilt from the tiles, routes are enumerated from the
/// tiles flagged as entry points and costed with their current requirements.
///
/// # Errors
///
/// Returns an error if the tiles do not describe a grid with exactly one key
pub fn reanalyze(
    tiles: &[Tile],
    milestones: Vec<Milestone>,
    max_paths_per_entry: usize,
) -> Result<Analysis> {
    let grid = TileExtractor::rebuild_grid(tiles)?;
    let routes = PathEnumerator::new(&grid, max_paths_per_entry).enumerate(tiles);
    info!(
        "Re-analysed {} tiles: {} routes from {} entries",
        tiles.len(),
        routes.len(),
        tiles.iter().filter(|t| t.is_entry_point).count()
    );

    Ok(Analysis::from_routes(
        routes,
        tiles,
        is_fully_connected(&grid),
        0,
        milestones,
    ))
}
