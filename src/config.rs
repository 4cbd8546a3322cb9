use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Client settings, read from `CANTEEN_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub student_poll: Duration,
    pub vendor_poll: Duration,
    pub timeout: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            student_poll: Duration::from_secs(10),
            vendor_poll: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            session_file: default_session_file(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Like [`ClientConfig::load`], with a custom variable source.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_url: try_load(&lookup, "CANTEEN_API_URL", defaults.api_url)?,
            student_poll: Duration::from_secs(try_load(
                &lookup,
                "CANTEEN_STUDENT_POLL_SECS",
                defaults.student_poll.as_secs(),
            )?),
            vendor_poll: Duration::from_secs(try_load(
                &lookup,
                "CANTEEN_VENDOR_POLL_SECS",
                defaults.vendor_poll.as_secs(),
            )?),
            timeout: Duration::from_secs(try_load(
                &lookup,
                "CANTEEN_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            session_file: try_load(&lookup, "CANTEEN_SESSION_FILE", defaults.session_file)?,
        }
        .validated()?)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("CANTEEN_STUDENT_POLL_SECS", self.student_poll),
            ("CANTEEN_VENDOR_POLL_SECS", self.vendor_poll),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid {
                    key,
                    value: "0".to_string(),
                    reason: "poll interval must be at least one second".to_string(),
                });
            }
        }
        Ok(self)
    }
}

fn default_session_file() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".canteen").join("session.json"),
        None => PathBuf::from("canteen-session.json"),
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default:?}");
        return Ok(default);
    };
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::load_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.student_poll, Duration::from_secs(10));
        assert_eq!(config.vendor_poll, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = from(&[
            ("CANTEEN_API_URL", "https://canteen.example/api"),
            ("CANTEEN_VENDOR_POLL_SECS", "2"),
            ("CANTEEN_SESSION_FILE", "/tmp/s.json"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://canteen.example/api");
        assert_eq!(config.vendor_poll, Duration::from_secs(2));
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            from(&[("CANTEEN_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { key: "CANTEEN_TIMEOUT_SECS", .. })
        ));
        assert!(from(&[("CANTEEN_STUDENT_POLL_SECS", "0")]).is_err());
    }
}
