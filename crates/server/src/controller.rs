//! # Movie list handler
//!
//! Request-level logic for the catalog pages. Each operation receives its
//! typed parameters and the client's [`Session`], talks to the movie
//! repository at most twice, and returns an [`Outcome`].
//!
//! Nothing here knows about HTTP; `routes` does the translation both ways.

use std::collections::BTreeSet;
use std::sync::Arc;

use catalog::{MovieAttributes, MovieId, MovieRepository, Rating, Result};
use tracing::{debug, info};

use crate::params::IndexParams;
use crate::session::Session;
use crate::view::{IndexView, Location, Outcome, Page, View};

/// Handler for every movie page
#[derive(Clone)]
pub struct MovieList {
    repository: Arc<dyn MovieRepository>,
}

impl MovieList {
    pub fn new(repository: Arc<dyn MovieRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn MovieRepository> {
        &self.repository
    }

    /// List movies filtered by rating and ordered by a column.
    ///
    /// ## Algorithm
    /// 1. Sort key: request parameter, else session, else title
    /// 2. Rating selection: request parameter, else session, else every rating
    /// 3. Store whichever of the two differs from what the session holds
    /// 4. Look up the matching movies
    pub fn index(&self, params: IndexParams, session: &mut Session) -> Result<Outcome> {
        let sort = params.sort.or(session.sort).unwrap_or_default();

        let all_ratings = self.repository.all_ratings();
        let selected: BTreeSet<Rating> = match params.ratings.or_else(|| session.ratings.clone()) {
            Some(ratings) if !ratings.is_empty() => ratings,
            _ => all_ratings.iter().copied().collect(),
        };

        if session.sort != Some(sort) {
            debug!("Storing sort {} in session", sort);
            session.sort = Some(sort);
        }
        if session.ratings.as_ref() != Some(&selected) {
            debug!("Storing ratings {:?} in session", selected);
            session.ratings = Some(selected.clone());
        }

        let movies = self.repository.find_all_by_rating(&selected, sort)?;
        let view = IndexView::new(movies, all_ratings, selected, sort);
        Ok(render(session, View::Index(view)))
    }

    pub fn show(&self, id: MovieId, session: &mut Session) -> Result<Outcome> {
        let movie = self.repository.find_by_id(id)?;
        Ok(render(session, View::Show { movie }))
    }

    /// Empty form for a new movie
    pub fn new_movie(&self, session: &mut Session) -> Result<Outcome> {
        let all_ratings = self.repository.all_ratings();
        Ok(render(session, View::New { all_ratings }))
    }

    pub fn create(&self, attrs: MovieAttributes, session: &mut Session) -> Result<Outcome> {
        let movie = self.repository.create(attrs)?;
        info!("Movie {} created", movie.id);
        session.set_flash(format!("{} was successfully created.", movie.title));
        Ok(Outcome::Redirect(Location::Movies))
    }

    pub fn edit(&self, id: MovieId, session: &mut Session) -> Result<Outcome> {
        let movie = self.repository.find_by_id(id)?;
        let all_ratings = self.repository.all_ratings();
        Ok(render(session, View::Edit { movie, all_ratings }))
    }

    pub fn update(
        &self,
        id: MovieId,
        attrs: MovieAttributes,
        session: &mut Session,
    ) -> Result<Outcome> {
        let mut movie = self.repository.find_by_id(id)?;
        self.repository.update_attributes(&mut movie, attrs)?;
        info!("Movie {} updated", movie.id);
        session.set_flash(format!("{} was successfully updated.", movie.title));
        Ok(Outcome::Redirect(Location::Movie(movie.id)))
    }

    pub fn destroy(&self, id: MovieId, session: &mut Session) -> Result<Outcome> {
        let movie = self.repository.find_by_id(id)?;
        self.repository.destroy(&movie)?;
        info!("Movie {} deleted", movie.id);
        session.set_flash(format!("Movie '{}' deleted.", movie.title));
        Ok(Outcome::Redirect(Location::Movies))
    }

    /// Movies sharing the director of movie `id`.
    ///
    /// A movie without director info sends the client back to the list with
    /// a flash instead of searching.
    pub fn similar(&self, id: MovieId, session: &mut Session) -> Result<Outcome> {
        let movie = self.repository.find_by_id(id)?;

        let Some(director) = movie.director_name() else {
            session.set_flash(format!("'{}' has no director info", movie.title));
            return Ok(Outcome::Redirect(Location::Movies));
        };

        let movies = self.repository.find_all_by_director(director)?;
        debug!("Found {} movies directed by {}", movies.len(), director);
        Ok(render(session, View::Similar { movie, movies }))
    }
}

/// Build a page, consuming the pending flash
fn render(session: &mut Session, view: View) -> Outcome {
    Outcome::Render(Page {
        flash: session.take_flash(),
        view,
    })
}
