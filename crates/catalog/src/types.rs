//! Core domain types for the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (MovieId)
//! - Enums for fixed sets of values (Rating, SortKey)
//! - The Movie entity and the writable subset of its fields
//! - The MovieCatalog in-memory store

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, assigned by the catalog
pub type MovieId = u32;

// =============================================================================
// Rating
// =============================================================================

/// MPAA rating of a movie.
///
/// The declaration order is the order ratings are offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "G")]
    G,
    #[serde(rename = "PG")]
    PG,
    #[serde(rename = "PG-13")]
    PG13,
    #[serde(rename = "NC-17")]
    NC17,
    #[serde(rename = "R")]
    R,
}

impl Rating {
    /// Every rating the catalog knows about, in display order
    pub const ALL: [Rating; 5] = [Rating::G, Rating::PG, Rating::PG13, Rating::NC17, Rating::R];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::G => "G",
            Rating::PG => "PG",
            Rating::PG13 => "PG-13",
            Rating::NC17 => "NC-17",
            Rating::R => "R",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" => Ok(Rating::G),
            "PG" => Ok(Rating::PG),
            "PG-13" => Ok(Rating::PG13),
            "NC-17" => Ok(Rating::NC17),
            "R" => Ok(Rating::R),
            _ => Err(CatalogError::InvalidValue {
                field: "rating".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// SortKey
// =============================================================================

/// Column the movie list can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Title,
    ReleaseDate,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::ReleaseDate => "release_date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "release_date" => Ok(SortKey::ReleaseDate),
            _ => Err(CatalogError::InvalidValue {
                field: "sort".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Movie
// =============================================================================

/// A movie stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub rating: Rating,
    pub release_date: Option<NaiveDate>,
    /// `None` when the catalog has no director info for this movie
    pub director: Option<String>,
    pub description: Option<String>,
}

impl Movie {
    /// The director name, if present and not blank
    pub fn director_name(&self) -> Option<&str> {
        self.director
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// The writable fields of a movie.
///
/// Every field is optional: on create the catalog checks the required ones,
/// on update only the fields that are present are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieAttributes {
    pub title: Option<String>,
    pub rating: Option<Rating>,
    /// `Some(None)` clears the release date
    pub release_date: Option<Option<NaiveDate>>,
    pub director: Option<String>,
    pub description: Option<String>,
}

impl MovieAttributes {
    /// Copy every present attribute onto `movie`.
    ///
    /// Blank director/description values and an empty release date clear the field.
    pub fn apply_to(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.trim().to_string();
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(date) = self.release_date {
            movie.release_date = date;
        }
        if let Some(director) = &self.director {
            movie.director = non_blank(director);
        }
        if let Some(description) = &self.description {
            movie.description = non_blank(description);
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// MovieCatalog - The In-Memory Movie Store
// =============================================================================

/// In-memory movie store implementing [`MovieRepository`](crate::MovieRepository).
///
/// Reads and writes go through an `RwLock` so one catalog can be shared by
/// every request handler behind an `Arc`.
#[derive(Debug)]
pub struct MovieCatalog {
    pub(crate) state: RwLock<CatalogState>,
}

#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub(crate) movies: HashMap<MovieId, Movie>,
    /// Movie ids grouped by director name, each list kept in id order
    pub(crate) director_index: HashMap<String, Vec<MovieId>>,
    /// `None` once every id has been handed out
    pub(crate) next_id: Option<MovieId>,
}
