//! # Data Loader Crate
//!
//! This crate loads and holds the movie catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, GenreSet, Catalog)
//! - **parser**: Parse the catalog CSV into records
//! - **index**: Build the genre index and validate the catalog
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("final_movies.csv"))?;
//!
//! for genre in catalog.genres().iter() {
//!     println!("{}: {} movies", genre, catalog.count_in_genre(genre));
//! }
//! let horror = catalog.filter_by_genre("horror");
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogLoadError, Result};
pub use types::{canonical_genre, Catalog, GenreSet, MovieRecord};
