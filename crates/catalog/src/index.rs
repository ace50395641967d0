//! MovieCatalog building, indexing and the repository implementation.
//!
//! The catalog keeps:
//! - a primary index (movie id -> movie)
//! - a secondary index (director -> movie ids) for the "similar" lookup
//! - the next id to hand out on create

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::repository::MovieRepository;
use crate::types::*;

impl MovieCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                next_id: Some(1),
                ..Default::default()
            }),
        }
    }

    /// Load the catalog from a seed file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);
        let movies = parser::parse_movies(path)?;
        let catalog = Self::from_movies(movies);
        info!("Loaded {} movies", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from already parsed movies
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let catalog = Self::new();
        for movie in movies {
            catalog.insert_movie(movie);
        }
        catalog
    }

    /// Insert a movie under its own id, replacing any movie already stored there
    pub fn insert_movie(&self, movie: Movie) {
        let mut state = self.write();
        state.next_id = match (state.next_id, movie.id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        if let Some(previous) = state.movies.remove(&movie.id) {
            state.unindex(&previous);
        }
        state.index(&movie);
        state.movies.insert(movie.id, movie);
    }

    /// Number of movies currently stored
    pub fn len(&self) -> usize {
        self.read().movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MovieCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    fn index(&mut self, movie: &Movie) {
        if let Some(director) = movie.director_name() {
            let ids = self.director_index.entry(director.to_string()).or_default();
            if let Err(pos) = ids.binary_search(&movie.id) {
                ids.insert(pos, movie.id);
            }
        }
    }

    fn unindex(&mut self, movie: &Movie) {
        let Some(director) = movie.director_name() else {
            return;
        };
        if let Some(ids) = self.director_index.get_mut(director) {
            ids.retain(|&id| id != movie.id);
            if ids.is_empty() {
                self.director_index.remove(director);
            }
        }
    }
}

impl MovieRepository for MovieCatalog {
    fn find_by_id(&self, id: MovieId) -> Result<Movie> {
        self.read()
            .movies
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound { id })
    }

    fn find_all_by_rating(&self, ratings: &BTreeSet<Rating>, sort: SortKey) -> Result<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .read()
            .movies
            .values()
            .filter(|movie| ratings.contains(&movie.rating))
            .cloned()
            .collect();
        movies.sort_by(|a, b| compare_by(sort, a, b));
        debug!(
            "find_all_by_rating({:?}, {}) -> {} movies",
            ratings,
            sort,
            movies.len()
        );
        Ok(movies)
    }

    fn find_all_by_director(&self, director: &str) -> Result<Vec<Movie>> {
        let state = self.read();
        let movies: Vec<Movie> = state
            .director_index
            .get(director)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.movies.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!("find_all_by_director({:?}) -> {} movies", director, movies.len());
        Ok(movies)
    }

    fn all_ratings(&self) -> Vec<Rating> {
        Rating::ALL.to_vec()
    }

    fn create(&self, attrs: MovieAttributes) -> Result<Movie> {
        let title = attrs
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| CatalogError::Validation("Title can't be blank".to_string()))?;
        let rating = attrs
            .rating
            .ok_or_else(|| CatalogError::Validation("Rating can't be blank".to_string()))?;

        let mut state = self.write();
        let id = state
            .next_id
            .filter(|id| !state.movies.contains_key(id))
            .ok_or(CatalogError::IdsExhausted)?;
        let mut movie = Movie {
            id,
            title: title.to_string(),
            rating,
            release_date: None,
            director: None,
            description: None,
        };
        attrs.apply_to(&mut movie);

        state.next_id = id.checked_add(1);
        state.index(&movie);
        state.movies.insert(id, movie.clone());
        info!("Created movie {} ({:?})", id, movie.title);
        Ok(movie)
    }

    fn update_attributes(&self, movie: &mut Movie, attrs: MovieAttributes) -> Result<()> {
        if attrs.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(CatalogError::Validation("Title can't be blank".to_string()));
        }

        let mut state = self.write();
        let stored = state
            .movies
            .get(&movie.id)
            .cloned()
            .ok_or(CatalogError::NotFound { id: movie.id })?;

        let mut updated = stored.clone();
        attrs.apply_to(&mut updated);

        state.unindex(&stored);
        state.index(&updated);
        state.movies.insert(updated.id, updated.clone());
        info!("Updated movie {} ({:?})", updated.id, updated.title);

        *movie = updated;
        Ok(())
    }

    fn destroy(&self, movie: &Movie) -> Result<()> {
        let mut state = self.write();
        let removed = state
            .movies
            .remove(&movie.id)
            .ok_or(CatalogError::NotFound { id: movie.id })?;
        state.unindex(&removed);
        info!("Destroyed movie {} ({:?})", removed.id, removed.title);
        Ok(())
    }
}

/// Ordering used by the movie list for each sortable column.
///
/// Undated movies go last when sorting by release date; ties fall back to id
/// so the order is stable across requests.
fn compare_by(sort: SortKey, a: &Movie, b: &Movie) -> Ordering {
    let primary = match sort {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::ReleaseDate => match (a.release_date, b.release_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    primary.then_with(|| a.id.cmp(&b.id))
}
