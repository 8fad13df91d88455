//! PNG board previews, one square block per tile

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::io::configuration::PREVIEW_CELL_SIZE;
use crate::io::error::{GeneratorError, Result, file_system_error, invalid_grid};
use crate::spatial::tiles::{Tile, TileType};

const ROCK: [u8; 3] = [70, 62, 58];
const FREE_LOCKED: [u8; 3] = [150, 150, 140];
const FREE_OPEN: [u8; 3] = [225, 222, 205];
const KEY: [u8; 3] = [232, 186, 40];
const GENERATOR: [u8; 3] = [120, 200, 120];
const OUTLINE: [u8; 3] = [255, 255, 255];
const UNKNOWN_CHAIN: [u8; 3] = [160, 90, 200];

/// Base colour of a chain's display color name
fn chain_rgb(color: &str) -> [u8; 3] {
    match color.trim().to_ascii_lowercase().as_str() {
        "red" => [210, 60, 50],
        "blue" => [50, 110, 220],
        "green" => [60, 170, 80],
        "yellow" => [225, 200, 50],
        "orange" => [235, 140, 40],
        "purple" => [140, 70, 190],
        _ => UNKNOWN_CHAIN,
    }
}

/// Darken `rgb` as the level rises so harder tiles read heavier
fn shade(rgb: [u8; 3], level: u8) -> [u8; 3] {
    let factor = 1.0 - (f64::from(level.saturating_sub(2)) * 0.1).min(0.6);
    rgb.map(|channel| (f64::from(channel) * factor) as u8)
}

/// Fill colour of one tile
fn tile_rgb(tile: &Tile) -> [u8; 3] {
    match tile.tile_type {
        TileType::Rock => ROCK,
        TileType::Key => KEY,
        TileType::Free if tile.generator.is_some() => GENERATOR,
        TileType::Free if tile.unlocked => FREE_OPEN,
        TileType::Free => FREE_LOCKED,
        TileType::SemiLocked => tile
            .required_item
            .as_ref()
            .map_or(UNKNOWN_CHAIN, |item| shade(chain_rgb(&item.color), item.level)),
    }
}

/// Render `tiles` into an image without writing it
///
/// # Errors
///
/// Returns an error if the tile list is empty
pub fn render_board(tiles: &[Tile]) -> Result<RgbaImage> {
    let rows = tiles.iter().map(|t| t.row).max().unwrap_or(0);
    let cols = tiles.iter().map(|t| t.col).max().unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(invalid_grid(&"cannot render a board without tiles"));
    }

    let cell = PREVIEW_CELL_SIZE;
    let mut img = ImageBuffer::from_pixel(cols as u32 * cell, rows as u32 * cell, Rgba([0, 0, 0, 0]));

    for tile in tiles {
        let coord = tile.coord();
        let origin_x = coord.col as u32 * cell;
        let origin_y = coord.row as u32 * cell;
        let [r, g, b] = tile_rgb(tile);

        for dy in 0..cell {
            for dx in 0..cell {
                let border = dx == 0 || dy == 0 || dx + 1 == cell || dy + 1 == cell;
                let [pr, pg, pb] = if border && tile.is_entry_point {
                    OUTLINE
                } else {
                    [r, g, b]
                };
                img.put_pixel(origin_x + dx, origin_y + dy, Rgba([pr, pg, pb, 255]));
            }
        }
    }

    Ok(img)
}

/// Export a board preview as PNG
///
/// # Errors
///
/// Returns an error if:
/// - The tile list is empty
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_board_as_png(tiles: &[Tile], output_path: &Path) -> Result<()> {
    let img = render_board(tiles)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| file_system_error(parent, "create directory", source))?;
    }

    img.save(output_path)
        .map_err(|source| GeneratorError::ImageExport {
            path: output_path.to_path_buf(),
            source,
        })
}
