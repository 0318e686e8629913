//! Search by genre: normalize, filter, sample.

use crate::error::ValidationError;
use crate::normalizer::{CanonicalGenre, GenreNormalizer};
use crate::sampler::Sampler;
use data_loader::{Catalog, GenreSet};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Titles drawn for one search.
///
/// Created fresh on every search; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub genre: CanonicalGenre,
    /// The genre text as entered, trimmed
    pub query: String,
    /// Distinct titles in random draw order
    pub titles: Vec<String>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Genre search over a shared catalog.
///
/// ## Usage
/// ```ignore
/// let search = GenreSearch::new(catalog.clone());
/// let result = search.search("Comedy", &mut rng)?;
/// ```
#[derive(Debug, Clone)]
pub struct GenreSearch {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,
    normalizer: GenreNormalizer,
    sampler: Sampler,
}

impl GenreSearch {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let normalizer = GenreNormalizer::new(catalog.genres().clone());
        Self {
            catalog,
            normalizer,
            sampler: Sampler::new(),
        }
    }

    /// Configure how many titles a search returns (default: 10)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sampler = self.sampler.with_sample_size(sample_size);
        self
    }

    pub fn genres(&self) -> &GenreSet {
        self.normalizer.genres()
    }

    /// Run a search for `raw` genre text.
    ///
    /// # Returns
    /// * `Ok(SearchResult)` - up to `sample_size` distinct titles of that genre
    /// * `Err(ValidationError)` - the genre isn't in the catalog
    #[instrument(skip(self, rng))]
    pub fn search<R: Rng + ?Sized>(
        &self,
        raw: &str,
        rng: &mut R,
    ) -> Result<SearchResult, ValidationError> {
        let genre = self.normalizer.normalize(raw).inspect_err(|e| {
            warn!("Rejected genre input: {}", e);
        })?;

        let matching = self.catalog.filter_by_genre(genre.as_str());
        let titles = self.sampler.sample(&matching, rng);

        info!(
            "Sampled {} of {} '{}' titles",
            titles.len(),
            matching.len(),
            genre
        );

        Ok(SearchResult {
            genre,
            query: raw.trim().to_string(),
            titles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn create_test_catalog() -> Arc<Catalog> {
        let mut records = vec![
            MovieRecord::new("Alien", "horror"),
            MovieRecord::new("The Thing", "horror"),
            MovieRecord::new("Halloween", "horror"),
        ];
        for i in 0..15 {
            records.push(MovieRecord::new(format!("Comedy {}", i), "comedy"));
        }
        Arc::new(Catalog::from_records(records).unwrap())
    }

    #[test]
    fn test_search_returns_only_matching_titles() {
        let search = GenreSearch::new(create_test_catalog());
        let mut rng = StdRng::seed_from_u64(11);

        let result = search.search("comedy", &mut rng).unwrap();

        assert_eq!(result.genre.as_str(), "comedy");
        assert_eq!(result.len(), 10);
        assert!(result.titles.iter().all(|t| t.starts_with("Comedy ")));
    }

    #[test]
    fn test_search_small_genre_returns_all() {
        let search = GenreSearch::new(create_test_catalog());
        let mut rng = StdRng::seed_from_u64(5);

        let mut result = search.search(" HORROR ", &mut rng).unwrap();
        result.titles.sort();

        assert_eq!(result.genre.as_str(), "horror");
        assert_eq!(result.query, "HORROR");

        assert_eq!(result.titles, vec!["Alien", "Halloween", "The Thing"]);
    }

    #[test]
    fn test_search_unknown_genre() {
        let search = GenreSearch::new(create_test_catalog());
        let mut rng = StdRng::seed_from_u64(5);

        let err = search.search("western", &mut rng).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownGenre {
                input: "western".to_string(),
                valid_genres: vec!["comedy".to_string(), "horror".to_string()],
            }
        );
    }

    #[test]
    fn test_custom_sample_size() {
        let search = GenreSearch::new(create_test_catalog()).with_sample_size(4);
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(search.search("comedy", &mut rng).unwrap().len(), 4);
        assert_eq!(search.search("horror", &mut rng).unwrap().len(), 3);
    }
}
