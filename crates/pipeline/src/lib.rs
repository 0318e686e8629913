//! Pipeline for resolving genres and sampling catalog titles.
//!
//! This crate provides:
//! - GenreNormalizer for validating user-entered genres
//! - Sampler for uniform, non-repeating title selection
//! - GenreSearch, which chains the two over a shared catalog
//!
//! ## Architecture
//! A search runs in stages:
//! 1. The normalizer trims and lower-cases the input and checks it against
//!    the catalog's genre set
//! 2. The catalog returns every record of that genre
//! 3. The sampler draws up to 10 distinct titles at random
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::GenreSearch;
//!
//! let search = GenreSearch::new(catalog.clone());
//! match search.search("Comedy", &mut rand::rng()) {
//!     Ok(result) => println!("{:?}", result.titles),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod error;
pub mod normalizer;
pub mod sampler;
pub mod search;

// Re-export main types
pub use error::ValidationError;
pub use normalizer::{CanonicalGenre, GenreNormalizer};
pub use sampler::{DEFAULT_SAMPLE_SIZE, Sampler};
pub use search::{GenreSearch, SearchResult};
