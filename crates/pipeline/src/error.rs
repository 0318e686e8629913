//! Validation errors raised while resolving user-entered genres.
//!
//! These are recoverable: the caller shows a warning and nothing about the
//! session changes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing left after trimming the input
    #[error("Please enter a genre!")]
    EmptyGenre,

    /// The input doesn't match any catalog genre exactly
    #[error("Unknown genre '{input}'. Please enter one of the categories: {}", .valid_genres.join(", "))]
    UnknownGenre {
        input: String,
        /// The full catalog genre set, sorted, for the user-facing hint
        valid_genres: Vec<String>,
    },
}
