//! Error types and context management for board generation

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generator operations
///
/// Unlucky random draws are never errors: a board that cannot be connected is
/// reported as a discarded board and an unbalanced one carries `balanced = false`.
/// Only malformed input and I/O failures end up here.
#[derive(Debug)]
pub enum GeneratorError {
    /// Generator parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A supplied grid layout cannot be turned into a board
    ///
    /// Raised for ragged or empty layouts and for layouts without exactly one key cell.
    InvalidGrid {
        /// Description of what's wrong with the layout
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON document could not be read or written
    Serialization {
        /// Path of the document
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Failed to save a board preview to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidGrid { reason } => {
                write!(f, "Invalid grid layout: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "Malformed JSON document '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export preview to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::InvalidParameter { .. } | Self::InvalidGrid { .. } => None,
        }
    }
}

/// Convenience type alias for generator results
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GeneratorError {
    GeneratorError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid grid error
pub fn invalid_grid(reason: &impl ToString) -> GeneratorError {
    GeneratorError::InvalidGrid {
        reason: reason.to_string(),
    }
}

/// Attach a path and operation to an I/O error
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GeneratorError {
    GeneratorError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
