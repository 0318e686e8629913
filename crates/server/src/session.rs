//! Per-session state: the active genre and the last search result.
//!
//! Each session owns its own `SessionState`; nothing here is global or
//! shared, so no synchronization is needed.

use pipeline::{CanonicalGenre, SearchResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    active_genre: Option<CanonicalGenre>,
    /// What the user typed for the active genre
    genre_input: Option<String>,
    last_search: Option<SearchResult>,
}

impl SessionState {
    /// A fresh session with no genre
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active genre.
    ///
    /// Only a `CanonicalGenre` is accepted, so whatever ends up here has
    /// been through the normalizer. A different genre drops the stale
    /// search result.
    pub fn set_genre(&mut self, genre: CanonicalGenre) {
        if self.active_genre.as_ref() != Some(&genre) {
            self.last_search = None;
            self.genre_input = None;
        }
        self.active_genre = Some(genre);
    }

    pub fn genre(&self) -> Option<&CanonicalGenre> {
        self.active_genre.as_ref()
    }

    /// The active genre as the user entered it. Falls back to the
    /// canonical form when the genre was set directly.
    pub fn genre_input(&self) -> Option<&str> {
        self.genre_input
            .as_deref()
            .or_else(|| self.active_genre.as_ref().map(CanonicalGenre::as_str))
    }

    /// Store a successful search: its genre becomes the active genre
    pub fn record_search(&mut self, result: SearchResult) {
        self.active_genre = Some(result.genre.clone());
        self.genre_input = Some(result.query.clone());
        self.last_search = Some(result);
    }

    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    /// Clear the genre and the last result. Safe to call on an empty session.
    pub fn reset(&mut self) {
        self.active_genre = None;
        self.genre_input = None;
        self.last_search = None;
    }

    pub fn is_empty(&self) -> bool {
        self.active_genre.is_none() && self.last_search.is_none()
    }
}
