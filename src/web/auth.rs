//! Back office access
//!
//! A shared token from config unlocks the back office. Logging in with it
//! opens a server-side session whose id is kept in an HTTP-only cookie.
//! Without a configured token the back office is open.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use uuid::Uuid;

use super::AppState;

pub const SESSION_COOKIE: &str = "maeda_admin";

/// Ids of signed-in back office sessions
#[derive(Default)]
pub struct AdminSessions {
    ids: RwLock<HashSet<Uuid>>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.ids.write().await.insert(id);
        id
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.ids.read().await.contains(&id)
    }

    pub async fn close(&self, id: Uuid) {
        self.ids.write().await.remove(&id);
    }
}

fn session_id(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Whether the request belongs to a signed-in session
pub async fn is_signed_in(state: &AppState, cookies: &Cookies) -> bool {
    if state.config.admin.token.is_none() {
        return true;
    }
    match session_id(cookies) {
        Some(id) => state.sessions.contains(id).await,
        None => false,
    }
}

/// Whether `candidate` matches the configured token
pub fn token_matches(state: &AppState, candidate: &str) -> bool {
    match &state.config.admin.token {
        Some(token) => {
            token.len() == candidate.len()
                && token
                    .bytes()
                    .zip(candidate.bytes())
                    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                    == 0
        }
        None => true,
    }
}

pub async fn sign_in(state: &AppState, cookies: &Cookies) {
    let id = state.sessions.open().await;
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/admin");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookies.add(cookie);
    tracing::info!("Back office sign-in");
}

pub async fn sign_out(state: &AppState, cookies: &Cookies) {
    if let Some(id) = session_id(cookies) {
        state.sessions.close(id).await;
    }
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/admin");
    cookies.remove(cookie);
}

/// Redirect requests without a valid session to the login page
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    if is_signed_in(&state, &cookies).await {
        next.run(request).await
    } else {
        tracing::debug!(path = %request.uri().path(), "Back office request without session");
        Redirect::to("/admin/login").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions() {
        let sessions = AdminSessions::new();
        let id = sessions.open().await;
        assert!(sessions.contains(id).await);
        sessions.close(id).await;
        assert!(!sessions.contains(id).await);
        assert!(!sessions.contains(Uuid::new_v4()).await);
    }
}
