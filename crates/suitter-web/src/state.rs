//! Shared application state handed to every handler.

use axum::extract::FromRef;

use suitter_session::SessionManager;

/// State shared by all routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide session store.
    pub sessions: SessionManager,
}

impl AppState {
    /// Wrap an existing session manager.
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
