//! Session registry: start, resolve, end and sweep.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Duration, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::{debug, info, warn};

use suitter_core::config::SessionConfig;

use crate::clock::{Clock, SystemClock};
use crate::cookie::{decode_token, removal_cookie, session_cookie};
use crate::entity::Session;
use crate::error::SessionError;
use crate::token::SessionToken;

type Registry = HashMap<SessionToken, Arc<Session>>;

/// Owns every live session, keyed by token.
///
/// The registry lock is held only for the map operation itself. Session data
/// is guarded by each session's own mutex, never by this lock.
///
/// Expiry is enforced by [`SessionManager::sweep`] only: a session whose
/// expiry has passed stays resolvable until the next sweep runs.
///
/// Clones share the same registry. Separate `new` calls give independent
/// stores.
#[derive(Clone)]
pub struct SessionManager {
    /// Token → session map.
    registry: Arc<RwLock<Registry>>,
    /// Cookie name, also the store's namespace.
    cookie_name: String,
    /// Session lifetime counted from creation.
    max_age: Duration,
    /// Time source for expiry.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("sessions", &self.len())
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager driven by the system clock.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a session manager with an explicit time source.
    pub fn with_clock(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            cookie_name: config.cookie_name.clone(),
            max_age: Duration::from_std(config.max_age()).unwrap_or(Duration::weeks(52 * 100)),
            clock,
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Lifetime given to new sessions.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Number of sessions currently in the registry.
    pub fn len(&self) -> usize {
        self.registry.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the session named by the request's cookie.
    ///
    /// A missing or empty cookie, or a token that is not in the registry, is
    /// `Ok(None)`. A cookie that cannot be decoded is
    /// [`SessionError::MalformedCookie`].
    pub fn resolve(&self, jar: &CookieJar) -> Result<Option<Arc<Session>>, SessionError> {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(None);
        };
        if cookie.value().is_empty() {
            return Ok(None);
        }

        let token = decode_token(cookie.value())?;

        let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
        Ok(registry.get(&token).cloned())
    }

    /// Starts a new session and attaches its cookie to `jar`.
    ///
    /// Token collisions are not checked; 256 random bits make them
    /// practically impossible.
    pub fn start(&self, jar: CookieJar) -> Result<(CookieJar, Arc<Session>), SessionError> {
        self.start_with_rng(jar, &mut OsRng)
    }

    /// [`SessionManager::start`] drawing the token from `rng`.
    pub(crate) fn start_with_rng<R>(
        &self,
        jar: CookieJar,
        rng: &mut R,
    ) -> Result<(CookieJar, Arc<Session>), SessionError>
    where
        R: TryRngCore,
        R::Error: std::error::Error + Send + Sync + 'static,
    {
        let token = SessionToken::generate_from(rng)?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.max_age)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let session = Arc::new(Session::new(token.clone(), now, expires_at));

        {
            let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
            registry.insert(token.clone(), Arc::clone(&session));
        }

        debug!(
            cookie = %self.cookie_name,
            expires_at = %session.expires_at(),
            "Session started"
        );

        let jar = jar.add(session_cookie(&self.cookie_name, &token));
        Ok((jar, session))
    }

    /// Ends the request's session and tells the client to drop its cookie.
    ///
    /// Fails with [`SessionError::MissingCookie`] when the request carries no
    /// session cookie; callers usually treat that as already logged out.
    pub fn end(&self, jar: CookieJar) -> Result<CookieJar, SessionError> {
        let value = match jar.get(&self.cookie_name) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_owned(),
            _ => return Err(SessionError::MissingCookie),
        };

        let token = decode_token(&value)?;

        let removed = {
            let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
            registry.remove(&token)
        };

        if removed.is_some() {
            debug!(cookie = %self.cookie_name, "Session ended");
        } else {
            debug!(cookie = %self.cookie_name, "Ended a session that was not in the registry");
        }

        Ok(jar.add(removal_cookie(&self.cookie_name, self.clock.now())))
    }

    /// Evicts every session whose expiry is at or before now.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let (evicted, remaining) = {
            let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
            let before = registry.len();
            registry.retain(|_, session| !session.is_expired_at(now));
            (before - registry.len(), registry.len())
        };

        if evicted > 0 {
            info!(
                cookie = %self.cookie_name,
                evicted,
                remaining,
                "Expired sessions swept"
            );
        } else {
            debug!(cookie = %self.cookie_name, remaining, "Session sweep found nothing to evict");
        }

        evicted
    }
}

/// Logs a malformed-cookie error and degrades it to "no session".
///
/// Convenience for callers that treat a bad cookie as unauthenticated.
pub fn resolve_or_anonymous(manager: &SessionManager, jar: &CookieJar) -> Option<Arc<Session>> {
    match manager.resolve(jar) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Ignoring unusable session cookie");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Cookie;

    use super::*;
    use crate::clock::ManualClock;
    use crate::data::{SessionKey, SessionValue, UserId};
    use crate::token::FailingRng;

    fn make_manager(max_age_seconds: u64) -> (SessionManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = SessionConfig {
            cookie_name: "suitter".to_string(),
            max_age_seconds,
            sweep_interval_seconds: 1,
        };
        let manager = SessionManager::with_clock(&config, clock.clone());
        (manager, clock)
    }

    /// Turns the cookies a response would set into the jar of the next request.
    fn next_request(response: &CookieJar, name: &str) -> CookieJar {
        let value = response.get(name).map(|c| c.value().to_owned()).unwrap_or_default();
        CookieJar::new().add(Cookie::new(name.to_owned(), value))
    }

    #[test]
    fn test_resolve_without_cookie_is_none() {
        let (manager, _) = make_manager(60);
        assert!(manager.resolve(&CookieJar::new()).unwrap().is_none());
    }

    #[test]
    fn test_resolve_empty_cookie_is_none() {
        let (manager, _) = make_manager(60);
        let jar = CookieJar::new().add(Cookie::new("suitter", ""));
        assert!(manager.resolve(&jar).unwrap().is_none());
    }

    #[test]
    fn test_resolve_unknown_token_is_none() {
        let (manager, _) = make_manager(60);
        let forged = SessionToken::generate().unwrap();
        let jar = CookieJar::new().add(Cookie::new("suitter", forged.as_str().to_owned()));
        assert!(manager.resolve(&jar).unwrap().is_none());
    }

    #[test]
    fn test_resolve_malformed_cookie_is_error() {
        let (manager, _) = make_manager(60);
        let jar = CookieJar::new().add(Cookie::new("suitter", "%zz"));
        assert!(matches!(
            manager.resolve(&jar),
            Err(SessionError::MalformedCookie(_))
        ));
        assert!(resolve_or_anonymous(&manager, &jar).is_none());
    }

    #[test]
    fn test_start_then_resolve() {
        let (manager, clock) = make_manager(60);
        let (response, session) = manager.start(CookieJar::new()).unwrap();

        assert_eq!(session.expires_at(), clock.now() + Duration::seconds(60));
        assert_eq!(manager.len(), 1);

        let request = next_request(&response, "suitter");
        let found = manager.resolve(&request).unwrap().expect("session should resolve");
        assert!(Arc::ptr_eq(&found, &session));
        assert_eq!(found.get(&SessionKey::custom("anything")), None);
    }

    #[test]
    fn test_start_with_failing_rng_creates_nothing() {
        let (manager, _) = make_manager(60);
        let result = manager.start_with_rng(CookieJar::new(), &mut FailingRng);

        // The jar is only handed back on success, so no cookie reaches the response.
        assert!(matches!(result, Err(SessionError::TokenGeneration(_))));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_start_with_rng_attaches_cookie() {
        let (manager, _) = make_manager(60);
        let (jar, session) = manager.start_with_rng(CookieJar::new(), &mut OsRng).unwrap();

        assert_eq!(jar.get("suitter").unwrap().value(), session.token().as_str());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_data_is_shared_between_lookups() {
        let (manager, _) = make_manager(60);
        let (response, session) = manager.start(CookieJar::new()).unwrap();
        session.set_user_id(UserId(42));

        let request = next_request(&response, "suitter");
        let found = manager.resolve(&request).unwrap().unwrap();
        assert_eq!(found.get(&SessionKey::UserId), Some(SessionValue::Int(42)));
    }

    #[test]
    fn test_end_removes_session_and_expires_cookie() {
        let (manager, _) = make_manager(60);
        let (response, _) = manager.start(CookieJar::new()).unwrap();
        let request = next_request(&response, "suitter");

        let ended = manager.end(request.clone()).unwrap();
        let removal = ended.get("suitter").unwrap();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::seconds(-1)));
        assert_eq!(removal.path(), Some("/"));
        assert_eq!(removal.http_only(), Some(true));

        assert!(manager.resolve(&request).unwrap().is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_end_without_cookie_is_missing_cookie() {
        let (manager, _) = make_manager(60);
        assert!(matches!(
            manager.end(CookieJar::new()),
            Err(SessionError::MissingCookie)
        ));
    }

    #[test]
    fn test_end_unknown_token_still_clears_cookie() {
        let (manager, _) = make_manager(60);
        let jar = CookieJar::new().add(Cookie::new("suitter", "deadbeef"));
        let ended = manager.end(jar).unwrap();
        assert_eq!(ended.get("suitter").unwrap().value(), "");
    }

    #[test]
    fn test_expired_session_resolves_until_swept() {
        let (manager, clock) = make_manager(2);
        let (response, session) = manager.start(CookieJar::new()).unwrap();
        session.set(SessionKey::UserId, 42i64);
        assert_eq!(session.user_id(), Some(UserId(42)));

        let request = next_request(&response, "suitter");
        clock.advance(Duration::seconds(3));

        // Stale but not yet swept.
        assert!(manager.resolve(&request).unwrap().is_some());

        assert_eq!(manager.sweep(), 1);
        assert!(manager.resolve(&request).unwrap().is_none());
    }

    #[test]
    fn test_sweep_evicts_at_exact_expiry_and_keeps_live_sessions() {
        let (manager, clock) = make_manager(10);
        let (_, old) = manager.start(CookieJar::new()).unwrap();
        clock.advance(Duration::seconds(5));
        let (response, _) = manager.start(CookieJar::new()).unwrap();

        clock.set(old.expires_at());
        assert_eq!(manager.sweep(), 1);
        assert_eq!(manager.len(), 1);
        assert!(manager.resolve(&next_request(&response, "suitter")).unwrap().is_some());
    }

    #[test]
    fn test_independent_managers_do_not_share_sessions() {
        let (first, _) = make_manager(60);
        let (second, _) = make_manager(60);
        let (response, _) = first.start(CookieJar::new()).unwrap();

        let request = next_request(&response, "suitter");
        assert!(second.resolve(&request).unwrap().is_none());
        assert!(first.clone().resolve(&request).unwrap().is_some());
    }
}
