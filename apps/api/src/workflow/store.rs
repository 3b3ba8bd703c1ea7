//! In-memory session store and the cookie that points into it.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::AppState;
use crate::workflow::session::Session;

pub const SESSION_COOKIE: &str = "legacy_session";

/// Sessions untouched for this long are dropped when the next session is created.
const SESSION_IDLE_TTL: Duration = Duration::from_secs(4 * 60 * 60);

struct Slot {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Session id -> session. Each session sits behind its own mutex; a handler holds
/// that lock for the whole action, model call included, so actions on one session
/// run one at a time while other sessions proceed.
#[derive(Clone, Default)]
pub struct SessionStore {
    slots: Arc<RwLock<HashMap<Uuid, Slot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `requested`, or a fresh one if it is absent or unknown.
    pub async fn resume_or_create(&self, requested: Option<Uuid>) -> CurrentSession {
        let now = Instant::now();
        let mut slots = self.slots.write().await;

        if let Some(id) = requested {
            if let Some(slot) = slots.get_mut(&id) {
                slot.last_seen = now;
                return CurrentSession {
                    id,
                    session: slot.session.clone(),
                    created: false,
                };
            }
            debug!("Session {id} is unknown or expired, starting a new one");
        }

        let before = slots.len();
        slots.retain(|_, slot| now.duration_since(slot.last_seen) < SESSION_IDLE_TTL);
        if slots.len() < before {
            info!("Dropped {} idle sessions", before - slots.len());
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(id)));
        slots.insert(
            id,
            Slot {
                session: session.clone(),
                last_seen: now,
            },
        );
        info!("Created session {id} ({} active)", slots.len());

        CurrentSession {
            id,
            session,
            created: true,
        }
    }

    #[cfg(test)]
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.slots.read().await.get(&id).map(|s| s.session.clone())
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

/// The session behind the request's cookie. Extracting it never fails.
pub struct CurrentSession {
    pub id: Uuid,
    pub session: Arc<Mutex<Session>>,
    /// Set when no usable cookie came in; the response must set one.
    pub created: bool,
}

impl CurrentSession {
    /// Attaches the session cookie if this session was just created.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.created {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(self.id)) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = session_id_from_headers(&parts.headers);
        Ok(state.sessions.resume_or_create(requested).await)
    }
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
