//! Error types for tomlschema-core

use thiserror::Error;

/// Result type alias for tomlschema-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading documents
///
/// Validation and binding failures are not reported through this type:
/// validation accumulates [`crate::ValidationError`] values and binding
/// returns a [`crate::BindError`].
#[derive(Error, Debug)]
pub enum Error {
    /// Document file could not be found
    #[error("document not found: {path}")]
    DocumentNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse TOML text
    #[error("failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
