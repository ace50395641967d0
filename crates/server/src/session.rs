//! Per-client session state.
//!
//! A [`Session`] is plain data: the handler receives it by `&mut` for the
//! duration of one request and the HTTP layer stores it back afterwards. The
//! [`SessionStore`] keeps sessions in memory keyed by the id carried in the
//! session cookie, and forgets the ones that have been idle for too long.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use catalog::{Rating, SortKey};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "_moviedb_session";

/// How long an unused session is kept
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// State remembered for one client between requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Last sort column used on the movie list
    pub sort: Option<SortKey>,
    /// Last rating filter used on the movie list
    pub ratings: Option<BTreeSet<Rating>>,
    /// Message for the next rendered page
    pub flash: Option<String>,
}

impl Session {
    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    /// Read the flash message; it is gone afterwards
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

/// In-memory session storage shared by all requests
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    ttl: Duration,
}

#[derive(Debug)]
struct StoredSession {
    session: Session,
    last_seen: Instant,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Store whose sessions expire after `ttl` without a save
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up the session for `id`.
    ///
    /// Unknown, expired or missing ids start a fresh session under a new id;
    /// the returned flag is `true` in that case so the caller can issue a
    /// cookie once the session is worth keeping.
    pub fn open(&self, id: Option<Uuid>) -> (Uuid, Session, bool) {
        if let Some(id) = id {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(stored) = sessions.get(&id).filter(|s| !self.is_expired(s)) {
                return (id, stored.session.clone(), false);
            }
        }
        let id = Uuid::new_v4();
        debug!("Starting session {}", id);
        (id, Session::default(), true)
    }

    /// Store the session back after a request, dropping expired sessions
    pub fn save(&self, id: Uuid, session: Session) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, stored| !self.is_expired(stored));
        if sessions.len() < before {
            debug!("Expired {} sessions", before - sessions.len());
        }
        sessions.insert(
            id,
            StoredSession {
                session,
                last_seen: Instant::now(),
            },
        );
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .filter(|stored| !self.is_expired(stored))
            .map(|stored| stored.session.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, stored: &StoredSession) -> bool {
        stored.last_seen.elapsed() > self.ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a newly issued session id
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
