//! Session extractors resolving the session cookie before the handler runs.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use suitter_session::manager::resolve_or_anonymous;
use suitter_session::{Session, SessionManager};

/// Rejection for pages that need a login: `302 Found` back to `/`.
#[derive(Debug, Clone, Copy)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
    }
}

/// A live session. Requests without one are redirected to `/`.
///
/// Malformed cookies are logged and treated like a missing session.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Arc<Session>);

impl std::ops::Deref for RequireSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let manager = SessionManager::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        resolve_or_anonymous(&manager, &jar)
            .map(RequireSession)
            .ok_or(LoginRedirect)
    }
}

/// The session if there is one; pages that work logged-out use this.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Arc<Session>>);

impl<S> FromRequestParts<S> for MaybeSession
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let manager = SessionManager::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeSession(resolve_or_anonymous(&manager, &jar)))
    }
}
