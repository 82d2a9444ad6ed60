//! Login state handlers: starting a logged-in session, logout and the
//! current-session view.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use suitter_core::AppResult;
use suitter_core::error::AppError;
use suitter_session::{Session, SessionError, SessionManager, UserId};

use crate::error::ApiError;
use crate::extractors::{LoginRedirect, MaybeSession, RequireSession};
use crate::state::AppState;

/// Session summary returned by `GET /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// The authenticated user.
    pub user_id: UserId,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Landing page state returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingInfo {
    /// Whether the request carried a live session.
    pub authenticated: bool,
}

/// Start a session for a user whose credentials were just verified.
///
/// Returns the jar carrying the new session cookie; the caller must include
/// it in the response.
pub fn establish_login(
    manager: &SessionManager,
    jar: CookieJar,
    user_id: UserId,
) -> AppResult<(CookieJar, Arc<Session>)> {
    let (jar, session) = manager.start(jar)?;
    session.set_user_id(user_id);
    tracing::info!(user_id = %user_id, "User logged in");
    Ok((jar, session))
}

/// `POST /logout`
///
/// Ends the session and redirects to `/`. A request without a session
/// cookie is already logged out and is redirected all the same.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    match state.sessions.end(jar.clone()) {
        Ok(jar) => {
            tracing::info!("User logged out");
            (jar, LoginRedirect)
        }
        Err(SessionError::MissingCookie) => {
            tracing::debug!("Logout without a session cookie");
            (jar, LoginRedirect)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Logout with an unusable session cookie");
            (jar, LoginRedirect)
        }
    }
}

/// `GET /session`
pub async fn current_session(session: RequireSession) -> Result<Json<SessionInfo>, ApiError> {
    let user_id = session
        .user_id()
        .ok_or_else(|| AppError::authentication("Session has no authenticated user"))?;

    Ok(Json(SessionInfo {
        user_id,
        expires_at: session.expires_at(),
    }))
}

/// `GET /`
pub async fn landing(MaybeSession(session): MaybeSession) -> Json<LandingInfo> {
    let authenticated = session.is_some_and(|s| s.user_id().is_some());
    Json(LandingInfo { authenticated })
}
