//! A single user session and its data bag.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::data::{SessionKey, SessionValue, UserId};
use crate::token::SessionToken;

/// Server-side state bound to one browser.
///
/// Token and expiry are fixed at creation. The data bag sits behind this
/// session's own mutex, so requests for the same browser serialize while
/// other sessions are unaffected.
#[derive(Debug)]
pub struct Session {
    token: SessionToken,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    data: Mutex<HashMap<SessionKey, SessionValue>>,
}

impl Session {
    pub(crate) fn new(
        token: SessionToken,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            created_at,
            expires_at,
            data: Mutex::new(HashMap::new()),
        }
    }

    /// The session's token.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Absolute expiry. Eviction happens at the next sweep after this instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session is expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Read a value. Returns `None` when the key is unset.
    pub fn get(&self, key: &SessionKey) -> Option<SessionValue> {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Store a value, replacing any previous one.
    pub fn set(&self, key: SessionKey, value: impl Into<SessionValue>) {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value.into());
    }

    /// Remove a value if present.
    pub fn delete(&self, key: &SessionKey) {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    /// Number of keys currently set.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no keys are set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The authenticated user, if one has been recorded.
    pub fn user_id(&self) -> Option<UserId> {
        self.get(&SessionKey::UserId)
            .and_then(|v| v.as_int())
            .map(UserId)
    }

    /// Record the authenticated user.
    pub fn set_user_id(&self, user_id: UserId) {
        self.set(SessionKey::UserId, user_id);
    }

    /// Forget the authenticated user.
    pub fn clear_user_id(&self) {
        self.delete(&SessionKey::UserId);
    }
}
