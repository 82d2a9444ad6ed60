//! Session store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie. Also namespaces the session store.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Lifetime of a session in seconds, counted from its creation.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
    /// Interval between expired-session sweeps in seconds.
    ///
    /// An expired session stays resolvable until the next sweep, so this is
    /// the upper bound on how long a stale session can still be used.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_seconds: default_max_age(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl SessionConfig {
    /// Session lifetime as a [`Duration`].
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Validate the session settings.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.cookie_name.trim().is_empty() {
            return Err(AppError::configuration("session.cookie_name must not be empty"));
        }
        if self.max_age_seconds == 0 {
            return Err(AppError::configuration(
                "session.max_age_seconds must be greater than zero",
            ));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "session.sweep_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_cookie_name() -> String {
    "suitter".to_string()
}

fn default_max_age() -> u64 {
    86400
}

fn default_sweep_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_cookie_name() {
        let config = SessionConfig {
            cookie_name: "  ".to_string(),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_durations() {
        let config = SessionConfig {
            max_age_seconds: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            sweep_interval_seconds: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_helpers() {
        let config = SessionConfig::default();
        assert_eq!(config.max_age(), Duration::from_secs(86400));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
    }
}
