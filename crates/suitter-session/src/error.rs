//! Session store errors.

use thiserror::Error;

use suitter_core::error::{AppError, ErrorKind};

/// Errors produced by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session cookie was present but its value could not be decoded.
    #[error("malformed session cookie: {0}")]
    MalformedCookie(String),
    /// `end` was called for a request that carries no session cookie.
    #[error("request carries no session cookie")]
    MissingCookie,
    /// The random source failed while generating a session token.
    #[error("failed to generate session token: {0}")]
    TokenGeneration(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let kind = match &err {
            SessionError::MalformedCookie(_) => ErrorKind::Validation,
            SessionError::MissingCookie => ErrorKind::Session,
            SessionError::TokenGeneration(_) => ErrorKind::Internal,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}
