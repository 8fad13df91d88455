//! JSON documents exchanged with the game layer and editors

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::algorithm::executor::GeneratedBoard;
use crate::io::configuration::GeneratorConfig;
use crate::io::error::{GeneratorError, Result, file_system_error};

/// Read and deserialize a JSON document
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).map_err(|source| file_system_error(path, "read", source))?;
    serde_json::from_str(&content).map_err(|source| GeneratorError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the file cannot be written
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(value).map_err(|source| GeneratorError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| file_system_error(parent, "create directory", source))?;
    }
    fs::write(path, content).map_err(|source| file_system_error(path, "write", source))
}

/// Load a generator configuration
///
/// Missing fields take their defaults. The result is validated.
///
/// # Errors
///
/// Returns an error if the file is unreadable, malformed or fails validation
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

/// Write a board document holding `tiles` and `analysis`
///
/// # Errors
///
/// Returns an error if the document cannot be written
pub fn write_board(board: &GeneratedBoard, path: &Path) -> Result<()> {
    write_json(board, path)
}

/// Load a board document, for instance one edited by hand
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed
pub fn load_board(path: &Path) -> Result<GeneratedBoard> {
    read_json(path)
}
