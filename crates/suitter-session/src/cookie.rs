//! Session cookie encoding and construction.
//!
//! The cookie value is the percent-encoded token. The server sets `Path=/`
//! and `HttpOnly`, and no client-side expiry: expiry is enforced by the sweep.

use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use time::OffsetDateTime;

use crate::error::SessionError;
use crate::token::SessionToken;

/// Percent-encode a token for use as a cookie value.
pub fn encode_token(token: &SessionToken) -> String {
    utf8_percent_encode(token.as_str(), NON_ALPHANUMERIC).to_string()
}

/// Recover a token from a cookie value.
///
/// Rejects truncated or non-hex escapes and escapes that decode to invalid
/// UTF-8.
pub fn decode_token(value: &str) -> Result<SessionToken, SessionError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(SessionError::MalformedCookie(format!(
                    "invalid escape at byte {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let decoded = percent_decode_str(value)
        .decode_utf8()
        .map_err(|e| SessionError::MalformedCookie(e.to_string()))?;
    Ok(SessionToken::from_client(decoded.into_owned()))
}

/// Cookie handed to the client when a session starts.
pub fn session_cookie(name: &str, token: &SessionToken) -> Cookie<'static> {
    Cookie::build((name.to_owned(), encode_token(token)))
        .path("/")
        .http_only(true)
        .build()
}

/// Cookie instructing the client to discard its session cookie.
pub fn removal_cookie(name: &str, now: DateTime<Utc>) -> Cookie<'static> {
    let expires =
        OffsetDateTime::from_unix_timestamp(now.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH);

    Cookie::build((name.to_owned(), String::new()))
        .path("/")
        .http_only(true)
        .expires(expires)
        .max_age(time::Duration::seconds(-1))
        .build()
}
