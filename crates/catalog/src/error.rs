//! Error types for the catalog crate.

use thiserror::Error;

use crate::types::MovieId;

/// Errors that can occur while loading or querying the movie catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No movie is stored under the requested id
    #[error("Couldn't find Movie with id={id}")]
    NotFound { id: MovieId },

    /// Attributes supplied to create/update were not acceptable
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Every movie id has been used
    #[error("No movie ids left to assign")]
    IdsExhausted,

    /// I/O error occurred while reading the seed file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in the seed file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had a value outside its allowed set
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
