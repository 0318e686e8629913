//! Core domain types for the movie catalog.
//!
//! The catalog is deliberately small: every record is a title paired with
//! exactly one genre. Genres are held in their canonical form (trimmed and
//! lower-cased) so lookups never have to think about case.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Canonicalize a genre string: trim surrounding whitespace and lower-case it.
///
/// This is the single definition of "canonical genre" used by both the
/// loader and the genre normalizer.
pub fn canonical_genre(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// =============================================================================
// Movie Records
// =============================================================================

/// A single catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Canonical genre (see [`canonical_genre`])
    pub genre: String,
}

impl MovieRecord {
    /// Build a record, canonicalizing the genre and trimming the title
    pub fn new(title: impl AsRef<str>, genre: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            genre: canonical_genre(genre.as_ref()),
        }
    }
}

// =============================================================================
// GenreSet
// =============================================================================

/// The distinct genres present in the catalog.
///
/// Backed by a `BTreeSet` so iteration (and therefore the list shown to a
/// user who typed an unknown genre) is always alphabetical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSet {
    genres: BTreeSet<String>,
}

impl GenreSet {
    pub fn contains(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Owned, sorted copy of the genres (used in validation hints)
    pub fn to_vec(&self) -> Vec<String> {
        self.genres.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for GenreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            genres: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Catalog - The In-Memory Movie Store
// =============================================================================

/// The read-only movie catalog.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// across sessions behind an `Arc` without any locking.
///
/// Invariants (enforced by every constructor):
/// - there is at least one record, so `genres` is never empty
/// - every record's genre is a member of `genres`
#[derive(Debug)]
pub struct Catalog {
    /// Records in source order
    pub(crate) records: Vec<MovieRecord>,

    /// Derived set of distinct genres
    pub(crate) genres: GenreSet,

    /// Positions into `records`, grouped by genre (catalog order preserved)
    pub(crate) genre_index: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// All records in catalog order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// The authoritative genre enumeration
    pub fn genres(&self) -> &GenreSet {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records whose genre equals `genre` exactly.
    ///
    /// The comparison is case-sensitive against the canonical form, so
    /// callers are expected to pass a genre that went through the
    /// normalizer. Unknown genres yield an empty list.
    pub fn filter_by_genre(&self, genre: &str) -> Vec<&MovieRecord> {
        self.genre_index
            .get(genre)
            .map(|positions| positions.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Number of records in a genre
    pub fn count_in_genre(&self, genre: &str) -> usize {
        self.genre_index.get(genre).map(Vec::len).unwrap_or(0)
    }
}
