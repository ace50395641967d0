//! The repository trait the request handlers talk to.
//!
//! The handlers never own a movie's lifecycle; they only look movies up and
//! ask the repository to create, change or remove them. Keeping that behind a
//! trait lets tests swap in a recording fake.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::types::{Movie, MovieAttributes, MovieId, Rating, SortKey};

/// Lookup and mutation operations on the movie store.
///
/// ## Design Note
/// - `Send + Sync` allows one repository to be shared by concurrent requests
/// - Lookups return owned `Movie` values so no lock outlives the call
pub trait MovieRepository: Send + Sync {
    /// Find one movie by id.
    ///
    /// # Returns
    /// * `Ok(Movie)` - The stored movie
    /// * `Err(CatalogError::NotFound)` - If no movie has that id
    fn find_by_id(&self, id: MovieId) -> Result<Movie>;

    /// All movies whose rating is in `ratings`, ordered by `sort`.
    fn find_all_by_rating(&self, ratings: &BTreeSet<Rating>, sort: SortKey) -> Result<Vec<Movie>>;

    /// All movies by exactly this director.
    fn find_all_by_director(&self, director: &str) -> Result<Vec<Movie>>;

    /// Every rating a movie can have, in display order.
    fn all_ratings(&self) -> Vec<Rating>;

    /// Store a new movie built from `attrs` and return it with its id.
    fn create(&self, attrs: MovieAttributes) -> Result<Movie>;

    /// Apply `attrs` to the stored movie and to the caller's copy.
    fn update_attributes(&self, movie: &mut Movie, attrs: MovieAttributes) -> Result<()>;

    /// Remove the movie from the store.
    fn destroy(&self, movie: &Movie) -> Result<()>;
}
