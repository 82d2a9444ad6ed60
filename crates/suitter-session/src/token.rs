//! Session token generation.

use std::fmt::{self, Write};

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::SessionError;

/// Number of random bytes behind each token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Opaque session credential exchanged with the client.
///
/// `Debug` never prints the value; use [`SessionToken::as_str`] when the raw
/// token is actually needed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the operating system's CSPRNG.
    pub fn generate() -> Result<Self, SessionError> {
        Self::generate_from(&mut OsRng)
    }

    /// Generate a token from the given fallible random source.
    pub fn generate_from<R>(rng: &mut R) -> Result<Self, SessionError>
    where
        R: TryRngCore,
        R::Error: std::error::Error + Send + Sync + 'static,
    {
        let mut buf = [0u8; TOKEN_BYTES];
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| SessionError::TokenGeneration(Box::new(e)))?;

        let mut hex = String::with_capacity(TOKEN_BYTES * 2);
        for byte in buf {
            // Writing into a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        Ok(Self(hex))
    }

    /// Wrap a token received from a client.
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// Random source that always fails, for exercising error paths.
#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl TryRngCore for FailingRng {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(std::io::Error::other("entropy exhausted"))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(std::io::Error::other("entropy exhausted"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(std::io::Error::other("entropy exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_is_fixed_width_lowercase_hex() {
        let token = SessionToken::generate().unwrap();
        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let mut seen = HashSet::with_capacity(100_000);
        for _ in 0..100_000 {
            let token = SessionToken::generate().unwrap();
            assert!(seen.insert(token), "duplicate token generated");
        }
    }

    #[test]
    fn test_random_source_failure_is_reported() {
        let err = SessionToken::generate_from(&mut FailingRng).unwrap_err();
        assert!(matches!(err, SessionError::TokenGeneration(_)));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = SessionToken::from_client("secret-value");
        let printed = format!("{token:?}");
        assert!(!printed.contains("secret-value"));
    }
}
