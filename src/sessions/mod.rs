use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};
use rand::{distributions::Alphanumeric, Rng};

use crate::AppState;

pub const SESSION_COOKIE: &str = "club_session";

/// Identity attached to a browser session after a successful login.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub member_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Process-wide session state, opaque key to logged-in member. Sessions
/// live until the process restarts; there is no logout route.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionUser>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `user` under a fresh opaque key and returns the key.
    pub fn create(&self, user: SessionUser) -> String {
        let key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        self.inner.write().unwrap().insert(key.clone(), user);
        key
    }

    pub fn get(&self, key: &str) -> Option<SessionUser> {
        self.inner.read().unwrap().get(key).cloned()
    }
}

pub fn session_cookie(key: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, key.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn session_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("club_session="))
        })
}

pub fn current_user(headers: &HeaderMap, sessions: &SessionStore) -> Option<SessionUser> {
    session_key(headers).and_then(|key| sessions.get(key))
}

/// Guards the member area. Requests without a live session are sent to the
/// login page before any storage work happens.
pub async fn require_member(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match current_user(request.headers(), &state.sessions) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Optional identity for the public pages; anonymous visitors get `None`.
pub struct MaybeUser(pub Option<SessionUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(&parts.headers, &state.sessions)))
    }
}
