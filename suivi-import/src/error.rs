//! Importer error types

use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that abort an import run
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input file has no usable header row
    #[error("no header row found in {0}")]
    MissingHeaders(String),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// suivi-common error
    #[error(transparent)]
    Common(#[from] suivi_common::Error),
}
