//! # Catalog Crate
//!
//! This crate owns the movie data: the Movie entity, the repository trait the
//! request handlers are written against, and an in-memory implementation of
//! it that is seeded from a `::`-separated data file.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, SortKey, MovieCatalog)
//! - **repository**: The MovieRepository trait
//! - **parser**: Parse the seed file into Rust structs
//! - **index**: Build the catalog and implement the repository operations
//! - **error**: Error types for loading and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{MovieCatalog, MovieRepository, Rating, SortKey};
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_file(Path::new("data/movies.dat"))?;
//!
//! let ratings = catalog.all_ratings().into_iter().collect();
//! for movie in catalog.find_all_by_rating(&ratings, SortKey::Title)? {
//!     println!("{} [{}]", movie.title, movie.rating);
//! }
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod repository;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use repository::MovieRepository;
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    Movie,
    MovieAttributes,
    MovieCatalog,
    // Enums
    Rating,
    SortKey,
};
