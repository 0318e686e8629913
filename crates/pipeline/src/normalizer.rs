//! Genre normalizer.
//!
//! Turns free-form genre text into a [`CanonicalGenre`] or explains why it
//! can't. Matching is strict: trim, lower-case, then exact equality against
//! the catalog's genre set. No fuzzy or substring matching and no synonyms;
//! an ambiguous entry is reported back to the user instead of guessed at.

use crate::error::ValidationError;
use data_loader::{canonical_genre, GenreSet};
use serde::Serialize;
use std::fmt;

/// A genre that has been validated against the catalog.
///
/// Only the normalizer can build one, so holding a `CanonicalGenre` is proof
/// the genre passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalGenre(String);

impl CanonicalGenre {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalGenre {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates raw genre input against a fixed genre set
#[derive(Debug, Clone)]
pub struct GenreNormalizer {
    genres: GenreSet,
}

impl GenreNormalizer {
    pub fn new(genres: GenreSet) -> Self {
        Self { genres }
    }

    pub fn genres(&self) -> &GenreSet {
        &self.genres
    }

    /// Resolve raw user input to a catalog genre.
    ///
    /// # Errors
    /// * `EmptyGenre` - the input is blank
    /// * `UnknownGenre` - no exact match; carries every valid genre
    pub fn normalize(&self, raw: &str) -> Result<CanonicalGenre, ValidationError> {
        let candidate = canonical_genre(raw);
        if candidate.is_empty() {
            return Err(ValidationError::EmptyGenre);
        }

        if self.genres.contains(&candidate) {
            Ok(CanonicalGenre(candidate))
        } else {
            Err(ValidationError::UnknownGenre {
                input: raw.trim().to_string(),
                valid_genres: self.genres.to_vec(),
            })
        }
    }
}
