//! Typed session keys and values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an authenticated user, as stored in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Key into a session's data bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// The authenticated user's id. Set on login, read by every protected page.
    UserId,
    /// Any other application-defined key.
    Custom(String),
}

impl SessionKey {
    /// Convenience constructor for [`SessionKey::Custom`].
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserId => write!(f, "UserID"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Value stored in a session's data bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionValue {
    /// Integer value (user ids are stored this way).
    Int(i64),
    /// Text value.
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

impl SessionValue {
    /// The integer payload, if this is an [`SessionValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a [`SessionValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The boolean payload, if this is a [`SessionValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for SessionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<UserId> for SessionValue {
    fn from(id: UserId) -> Self {
        Self::Int(id.0)
    }
}

impl From<String> for SessionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SessionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for SessionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(SessionKey::UserId.to_string(), "UserID");
        assert_eq!(SessionKey::custom("theme").to_string(), "theme");
    }

    #[test]
    fn test_value_accessors_match_variant() {
        let text = SessionValue::from("dark");
        assert_eq!(text.as_text(), Some("dark"));
        assert_eq!(text.as_int(), None);
        assert_eq!(text.as_bool(), None);

        let flag = SessionValue::from(true);
        assert_eq!(flag.as_bool(), Some(true));
        assert_eq!(flag.as_text(), None);

        assert_eq!(SessionValue::from(UserId(9)).as_int(), Some(9));
    }
}
