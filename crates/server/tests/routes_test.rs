//! Integration tests for the HTTP routes.
//!
//! These drive the router end to end against a small in-memory catalog and
//! check status codes, redirects, rendered view models and that the session
//! cookie carries state between requests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use catalog::{Movie, MovieCatalog, MovieRepository, Rating};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use server::{create_router, AppState};
use tower::ServiceExt;

fn movie(
    id: u32,
    title: &str,
    rating: Rating,
    date: (i32, u32, u32),
    director: Option<&str>,
) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        rating,
        release_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
        director: director.map(str::to_string),
        description: None,
    }
}

fn create_test_state() -> (Arc<MovieCatalog>, AppState) {
    let catalog = Arc::new(MovieCatalog::from_movies(vec![
        movie(1, "Star Wars", Rating::PG, (1977, 5, 25), Some("George Lucas")),
        movie(2, "Blade Runner", Rating::PG, (1982, 6, 25), Some("Ridley Scott")),
        movie(3, "Alien", Rating::R, (1979, 5, 25), None),
        movie(4, "THX-1138", Rating::R, (1971, 3, 11), Some("George Lucas")),
        movie(5, "Aladdin", Rating::G, (1992, 11, 25), Some("Ron Clements")),
    ]));
    let state = AppState::new(catalog.clone());
    (catalog, state)
}

fn create_test_app() -> (Arc<MovieCatalog>, Router) {
    let (catalog, state) = create_test_state();
    (catalog, create_router(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// `name=value` part of the Set-Cookie header
fn session_cookie(response: &Response) -> String {
    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

fn location(response: &Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn titles(page: &Value) -> Vec<String> {
    page["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_root_redirects_to_movies() {
    let (_, app) = create_test_app();
    let response = send(&app, Method::GET, "/", None, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies");
}

#[tokio::test]
async fn test_index_defaults() {
    let (_, app) = create_test_app();
    let response = send(&app, Method::GET, "/movies", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_some());

    let page = json(response).await;
    assert_eq!(page["view"], "index");
    assert_eq!(page["sort"], "title");
    assert_eq!(page["title_header"], "hilite");
    assert!(page.get("release_date_header").is_none());
    assert_eq!(
        page["selected_ratings"],
        serde_json::json!(["G", "PG", "PG-13", "NC-17", "R"])
    );
    assert_eq!(
        titles(&page),
        vec!["Aladdin", "Alien", "Blade Runner", "Star Wars", "THX-1138"]
    );
}

#[tokio::test]
async fn test_index_sort_and_filter_persist_in_session() {
    let (_, app) = create_test_app();

    let first = send(
        &app,
        Method::GET,
        "/movies?sort=release_date&ratings%5BR%5D=R&ratings%5BPG%5D=PG",
        None,
        None,
    )
    .await;
    let cookie = session_cookie(&first);
    let page = json(first).await;
    assert_eq!(page["release_date_header"], "hilite");
    assert_eq!(titles(&page), vec!["THX-1138", "Star Wars", "Alien", "Blade Runner"]);

    // No parameters: the session remembers both choices
    let second = send(&app, Method::GET, "/movies", Some(&cookie), None).await;
    assert!(second.headers().get(SET_COOKIE).is_none());
    let page = json(second).await;
    assert_eq!(page["sort"], "release_date");
    assert_eq!(page["selected_ratings"], serde_json::json!(["PG", "R"]));

    // New parameters overwrite the session
    let third = send(&app, Method::GET, "/movies?ratings%5BG%5D=G", Some(&cookie), None).await;
    let page = json(third).await;
    assert_eq!(page["sort"], "release_date");
    assert_eq!(titles(&page), vec!["Aladdin"]);
}

#[tokio::test]
async fn test_show_and_not_found() {
    let (_, app) = create_test_app();

    let page = json(send(&app, Method::GET, "/movies/1", None, None).await).await;
    assert_eq!(page["view"], "show");
    assert_eq!(page["movie"]["title"], "Star Wars");
    assert_eq!(page["movie"]["release_date"], "1977-05-25");

    let missing = send(&app, Method::GET, "/movies/999", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = json(missing).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cookieless_reads_store_no_session() {
    let (_, state) = create_test_state();
    let sessions = state.sessions.clone();
    let app = create_router(state);

    for _ in 0..20 {
        let missing = send(&app, Method::GET, "/movies/999", None, None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(missing.headers().get(SET_COOKIE).is_none());
    }
    let shown = send(&app, Method::GET, "/movies/1", None, None).await;
    assert_eq!(shown.status(), StatusCode::OK);
    assert!(shown.headers().get(SET_COOKIE).is_none());
    assert!(sessions.is_empty());

    // Remembering the list settings is what starts a session
    let listed = send(&app, Method::GET, "/movies", None, None).await;
    assert!(listed.headers().get(SET_COOKIE).is_some());
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_new_and_edit_forms() {
    let (_, app) = create_test_app();

    let page = json(send(&app, Method::GET, "/movies/new", None, None).await).await;
    assert_eq!(page["view"], "new");
    assert_eq!(page["all_ratings"].as_array().unwrap().len(), 5);

    let page = json(send(&app, Method::GET, "/movies/2/edit", None, None).await).await;
    assert_eq!(page["view"], "edit");
    assert_eq!(page["movie"]["title"], "Blade Runner");
}

#[tokio::test]
async fn test_create_redirects_and_flashes_once() {
    let (catalog, app) = create_test_app();

    let response = send(
        &app,
        Method::POST,
        "/movies",
        None,
        Some(concat!(
            "movie%5Btitle%5D=Chicken+Run&movie%5Brating%5D=G",
            "&movie%5Brelease_date%5D=2000-06-21&movie%5Bid%5D=1",
        )),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies");
    let cookie = session_cookie(&response);

    let created = catalog.find_by_id(6).unwrap();
    assert_eq!(created.title, "Chicken Run");
    assert_eq!(created.rating, Rating::G);
    // The original movie 1 was not touched by the stray id field
    assert_eq!(catalog.find_by_id(1).unwrap().title, "Star Wars");

    let page = json(send(&app, Method::GET, "/movies", Some(&cookie), None).await).await;
    assert_eq!(page["flash"], "Chicken Run was successfully created.");

    let page = json(send(&app, Method::GET, "/movies", Some(&cookie), None).await).await;
    assert!(page["flash"].is_null());
}

#[tokio::test]
async fn test_create_without_title_is_rejected() {
    let (catalog, app) = create_test_app();

    let response = send(&app, Method::POST, "/movies", None, Some("movie%5Brating%5D=G")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(catalog.len(), 5);
}

#[tokio::test]
async fn test_update_redirects_to_movie() {
    let (catalog, app) = create_test_app();

    let response = send(
        &app,
        Method::PUT,
        "/movies/3",
        None,
        Some("movie%5Bdirector%5D=Ridley+Scott"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies/3");
    let cookie = session_cookie(&response);

    assert_eq!(catalog.find_by_id(3).unwrap().director.as_deref(), Some("Ridley Scott"));

    let page = json(send(&app, Method::GET, "/movies/3", Some(&cookie), None).await).await;
    assert_eq!(page["flash"], "Alien was successfully updated.");
}

#[tokio::test]
async fn test_update_with_blank_release_date_clears_it() {
    let (catalog, app) = create_test_app();

    let response = send(
        &app,
        Method::PUT,
        "/movies/1",
        None,
        Some("movie%5Brelease_date%5D=&movie%5Btitle%5D=Star+Wars"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = catalog.find_by_id(1).unwrap();
    assert_eq!(updated.release_date, None);
    assert_eq!(updated.director.as_deref(), Some("George Lucas"));
}

#[tokio::test]
async fn test_destroy_via_delete_and_post() {
    let (catalog, app) = create_test_app();

    let response = send(&app, Method::DELETE, "/movies/1", None, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies");
    let cookie = session_cookie(&response);
    assert!(catalog.find_by_id(1).is_err());

    let page = json(send(&app, Method::GET, "/movies", Some(&cookie), None).await).await;
    assert_eq!(page["flash"], "Movie 'Star Wars' deleted.");

    let response = send(&app, Method::POST, "/movies/2/destroy", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(catalog.find_by_id(2).is_err());
}

#[tokio::test]
async fn test_similar_lists_same_director() {
    let (_, app) = create_test_app();

    let page = json(send(&app, Method::GET, "/movies/4/similar", None, None).await).await;
    assert_eq!(page["view"], "similar");
    assert_eq!(page["movie"]["title"], "THX-1138");
    assert_eq!(titles(&page), vec!["Star Wars", "THX-1138"]);
}

#[tokio::test]
async fn test_similar_without_director_redirects_with_flash() {
    let (_, app) = create_test_app();

    let response = send(&app, Method::GET, "/movies/3/similar", None, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies");
    let cookie = session_cookie(&response);

    let page = json(send(&app, Method::GET, "/movies", Some(&cookie), None).await).await;
    assert_eq!(page["flash"], "'Alien' has no director info");
}
