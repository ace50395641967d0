//! Routing definitions for the movie catalog.
//!
//! Each route extracts its parameters, opens the client's session, runs the
//! matching [`MovieList`] operation and stores the session back before the
//! outcome is turned into a response.

use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use catalog::{MovieId, MovieRepository};
use tower_http::trace::TraceLayer;

use crate::controller::MovieList;
use crate::error::ServerError;
use crate::params::{movie_attributes_from_pairs, IndexParams};
use crate::session::{session_cookie, session_id_from_headers, Session, SessionStore};
use crate::view::{Location, Outcome};

/// Shared application dependencies
#[derive(Clone)]
pub struct AppState {
    pub movie_list: MovieList,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(repository: Arc<dyn MovieRepository>) -> Self {
        Self {
            movie_list: MovieList::new(repository),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

type Pairs = Vec<(String, String)>;

/// Creates the router with all movie routes and request tracing.
///
/// ```ignore
/// let router = create_router(AppState::new(Arc::new(catalog)));
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/movies", get(index).post(create))
        .route("/movies/new", get(new_movie))
        .route(
            "/movies/{id}",
            get(show).put(update).post(update).delete(destroy),
        )
        .route("/movies/{id}/edit", get(edit))
        .route("/movies/{id}/destroy", post(destroy))
        .route("/movies/{id}/similar", get(similar))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::to(&Location::Movies.path())
}

async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Pairs>,
) -> Response {
    let params = IndexParams::from_pairs(&pairs);
    respond(&state, &headers, |movie_list, session| {
        movie_list.index(params, session)
    })
}

async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MovieId>,
) -> Response {
    respond(&state, &headers, |movie_list, session| {
        movie_list.show(id, session)
    })
}

async fn new_movie(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(&state, &headers, |movie_list, session| {
        movie_list.new_movie(session)
    })
}

async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Pairs>,
) -> Response {
    let attrs = match movie_attributes_from_pairs(&pairs) {
        Ok(attrs) => attrs,
        Err(e) => return ServerError::from(e).into_response(),
    };
    respond(&state, &headers, |movie_list, session| {
        movie_list.create(attrs, session)
    })
}

async fn edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MovieId>,
) -> Response {
    respond(&state, &headers, |movie_list, session| {
        movie_list.edit(id, session)
    })
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MovieId>,
    Form(pairs): Form<Pairs>,
) -> Response {
    let attrs = match movie_attributes_from_pairs(&pairs) {
        Ok(attrs) => attrs,
        Err(e) => return ServerError::from(e).into_response(),
    };
    respond(&state, &headers, |movie_list, session| {
        movie_list.update(id, attrs, session)
    })
}

async fn destroy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MovieId>,
) -> Response {
    respond(&state, &headers, |movie_list, session| {
        movie_list.destroy(id, session)
    })
}

async fn similar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MovieId>,
) -> Response {
    respond(&state, &headers, |movie_list, session| {
        movie_list.similar(id, session)
    })
}

/// Run one handler operation inside the client's session.
///
/// A known session is written back whatever the outcome. A fresh one is only
/// stored, and its cookie issued, when the operation left something in it.
fn respond<F>(state: &AppState, headers: &HeaderMap, action: F) -> Response
where
    F: FnOnce(&MovieList, &mut Session) -> catalog::Result<Outcome>,
{
    let (id, mut session, fresh) = state.sessions.open(session_id_from_headers(headers));
    let result = action(&state.movie_list, &mut session);
    let keep = !fresh || session != Session::default();
    if keep {
        state.sessions.save(id, session);
    }

    let mut response = match result {
        Ok(outcome) => outcome.into_response(),
        Err(e) => ServerError::from(e).into_response(),
    };
    if fresh && keep {
        if let Ok(cookie) = HeaderValue::from_str(&session_cookie(id)) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}
