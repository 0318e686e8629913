//! Uniform random sampling of titles.
//!
//! ## Algorithm
//! 1. Collapse duplicate titles (first occurrence wins)
//! 2. Draw `min(n, distinct)` indices without replacement
//! 3. Return titles in draw order
//!
//! When a genre has fewer titles than requested, every title comes back in
//! shuffled order instead of failing.

use data_loader::MovieRecord;
use rand::Rng;
use rand::seq::index;
use std::collections::HashSet;
use tracing::debug;

/// Default number of titles returned by a search
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Draws a bounded, non-repeating random subset of titles
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    sample_size: usize,
}

impl Sampler {
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Configure how many titles to draw (default: 10)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Sample titles from `records`.
    ///
    /// The random source is injected so tests can seed it.
    pub fn sample<R: Rng + ?Sized>(&self, records: &[&MovieRecord], rng: &mut R) -> Vec<String> {
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = records
            .iter()
            .map(|record| record.title.as_str())
            .filter(|title| seen.insert(*title))
            .collect();

        let amount = self.sample_size.min(distinct.len());
        if amount < self.sample_size {
            debug!(
                "Only {} distinct titles available, wanted {}",
                distinct.len(),
                self.sample_size
            );
        }

        index::sample(rng, distinct.len(), amount)
            .into_iter()
            .map(|i| distinct[i].to_string())
            .collect()
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}
