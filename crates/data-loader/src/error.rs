//! Error types for the data-loader crate.
//!
//! Every variant here is fatal at startup: a catalog that fails to load
//! must never be served.

use thiserror::Error;

/// Errors that can occur while loading the movie catalog
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    /// Catalog file could not be found
    #[error("Failed to open catalog file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the catalog
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The header row lacks one of the required columns
    #[error("Catalog is missing the required '{column}' column")]
    MissingColumn { column: &'static str },

    /// A row couldn't be parsed
    ///
    /// `line` is 1-based and counts the header row.
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// An in-memory record breaks a catalog invariant
    ///
    /// `index` is the record's 0-based position in the catalog.
    #[error("Invalid record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// The source held a header but no movie rows
    #[error("Catalog contains no movies")]
    EmptyCatalog,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogLoadError>;
