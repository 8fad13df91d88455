//! Input/output operations, configuration and error handling

/// Command-line interface and batch board processing
pub mod cli;
/// Generator constants, configuration record and chain defaults
pub mod configuration;
/// JSON documents for configurations and boards
pub mod document;
/// Error types shared by every stage
pub mod error;
/// PNG board previews
pub mod image;
/// Progress display for board batches
pub mod progress;
