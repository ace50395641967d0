//! Server crate for the movie catalog.
//!
//! This crate contains the movie list handler, the per-client session it
//! threads through every request, and the axum router that exposes it over
//! HTTP.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod params;
pub mod routes;
pub mod session;
pub mod view;

pub use app::{serve, serve_catalog};
pub use config::ServerConfig;
pub use controller::MovieList;
pub use routes::{create_router, AppState};
pub use session::{Session, SessionStore};
pub use view::{Location, Outcome, Page, View};
