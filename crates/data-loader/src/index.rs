//! Catalog construction and indexing.
//!
//! Loading happens exactly once at startup:
//! 1. Read and parse the CSV source
//! 2. Derive the genre set
//! 3. Build the genre -> record-positions index
//! 4. Validate the catalog invariants

use crate::error::{CatalogLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Load the catalog from a CSV file on disk.
    ///
    /// This is the main entry point used at process start.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let content = parser::read_catalog_file(path)?;
        let catalog = Self::from_csv_str(&content)?;

        info!(
            "Loaded {} movies across {} genres",
            catalog.len(),
            catalog.genres().len()
        );
        Ok(catalog)
    }

    /// Load the catalog from any reader yielding CSV text
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_csv_str(&String::from_utf8_lossy(&bytes))
    }

    /// Parse CSV text into a catalog
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let records = parser::parse_catalog(content)?;
        Self::from_records(records)
    }

    /// Build a catalog from records that are already in memory.
    ///
    /// Genres are re-canonicalized so hand-built records obey the same
    /// rules as parsed ones.
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self> {
        let records: Vec<MovieRecord> = records
            .into_iter()
            .map(|r| MovieRecord::new(r.title, r.genre))
            .collect();

        let mut catalog = Catalog {
            records,
            genres: GenreSet::default(),
            genre_index: HashMap::new(),
        };
        catalog.build_indices();
        catalog.validate()?;

        Ok(catalog)
    }

    /// Derive the genre set and the per-genre index from the records
    pub(crate) fn build_indices(&mut self) {
        for (position, record) in self.records.iter().enumerate() {
            self.genre_index
                .entry(record.genre.clone())
                .or_insert_with(Vec::new)
                .push(position);
        }
        self.genres = self.genre_index.keys().cloned().collect();

        for genre in self.genres.iter() {
            debug!("Genre '{}': {} movies", genre, self.count_in_genre(genre));
        }
    }

    /// Validate catalog invariants
    ///
    /// Check that:
    /// - the catalog holds at least one record
    /// - no record has a blank title or genre
    /// - every record's genre is in the genre set
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() || self.genres.is_empty() {
            return Err(CatalogLoadError::EmptyCatalog);
        }

        for (idx, record) in self.records.iter().enumerate() {
            if record.title.is_empty() || record.genre.is_empty() {
                return Err(CatalogLoadError::InvalidRecord {
                    index: idx,
                    reason: "blank title or genre".to_string(),
                });
            }
            if !self.genres.contains(&record.genre) {
                return Err(CatalogLoadError::InvalidRecord {
                    index: idx,
                    reason: format!("genre '{}' missing from genre set", record.genre),
                });
            }
        }
        Ok(())
    }
}
