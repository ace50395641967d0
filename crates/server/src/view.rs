//! What a handler hands back: a page to render or a place to redirect to.
//!
//! Pages are rendered as JSON view models. The `view` field names the
//! template a browser front end would use; the remaining fields are the
//! values the handler exposed to it.

use std::collections::BTreeSet;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use catalog::{Movie, MovieId, Rating, SortKey};
use serde::Serialize;

/// Marker placed on the column header the list is sorted by
pub const HILITE: &str = "hilite";

/// Result of one handler call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(Page),
    Redirect(Location),
}

/// Redirect targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The movie list
    Movies,
    /// A movie's detail page
    Movie(MovieId),
}

impl Location {
    pub fn path(&self) -> String {
        match self {
            Location::Movies => "/movies".to_string(),
            Location::Movie(id) => format!("/movies/{id}"),
        }
    }
}

/// A rendered response: the flash for this render plus the view model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub flash: Option<String>,
    #[serde(flatten)]
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Index(IndexView),
    Show { movie: Movie },
    New { all_ratings: Vec<Rating> },
    Edit { movie: Movie, all_ratings: Vec<Rating> },
    Similar { movie: Movie, movies: Vec<Movie> },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index(_) => "index",
            View::Show { .. } => "show",
            View::New { .. } => "new",
            View::Edit { .. } => "edit",
            View::Similar { .. } => "similar",
        }
    }
}

/// Values exposed by the movie list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexView {
    pub movies: Vec<Movie>,
    pub all_ratings: Vec<Rating>,
    pub selected_ratings: BTreeSet<Rating>,
    pub sort: SortKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_header: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date_header: Option<&'static str>,
}

impl IndexView {
    pub fn new(
        movies: Vec<Movie>,
        all_ratings: Vec<Rating>,
        selected_ratings: BTreeSet<Rating>,
        sort: SortKey,
    ) -> Self {
        let marker = |column: SortKey| (sort == column).then_some(HILITE);
        Self {
            movies,
            all_ratings,
            selected_ratings,
            sort,
            title_header: marker(SortKey::Title),
            release_date_header: marker(SortKey::ReleaseDate),
        }
    }

    /// Highlight marker for a column header, if it is the sort column
    pub fn header(&self, column: SortKey) -> Option<&'static str> {
        match column {
            SortKey::Title => self.title_header,
            SortKey::ReleaseDate => self.release_date_header,
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(page) => (StatusCode::OK, Json(page)).into_response(),
            Outcome::Redirect(location) => Redirect::to(&location.path()).into_response(),
        }
    }
}
