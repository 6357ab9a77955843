use std::{
    env, fmt::Display, fs::read_to_string, io::ErrorKind, str::FromStr, time::Duration,
};

use reqwest::Url;
use thiserror::Error;
use tracing::{info, warn};

use crate::forward::Destination;

/// Placeholder left in deployments that never set up the spreadsheet.
pub const SHEET_URL_SENTINEL: &str = "YOUR_GOOGLE_APPS_SCRIPT_WEB_APP_URL_HERE";

const PORT_KEY: &str = "RUST_PORT";
const SHEET_URL_KEY: &str = "SHEET_WEBHOOK_URL";
const SHEET_TIMEOUT_KEY: &str = "SHEET_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub destination: Destination,
    pub sheet_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).or_else(|| read_secret(key)))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sheet_url = lookup(SHEET_URL_KEY).unwrap_or_else(|| {
            warn!("{SHEET_URL_KEY} not set, running in demo mode");
            SHEET_URL_SENTINEL.to_string()
        });

        Ok(Self {
            port: try_load(&lookup, PORT_KEY, "8080")?,
            destination: parse_destination(&sheet_url)?,
            sheet_timeout: Duration::from_secs(try_load(&lookup, SHEET_TIMEOUT_KEY, "10")?),
        })
    }
}

fn parse_destination(raw: &str) -> Result<Destination, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == SHEET_URL_SENTINEL {
        return Ok(Destination::Unconfigured);
    }

    let invalid = |reason: String| ConfigError::Invalid {
        key: SHEET_URL_KEY,
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(Destination::Endpoint(url)),
        scheme => Err(invalid(format!("unsupported scheme {scheme}"))),
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    read_secret_at(&format!("/run/secrets/{secret_name}"))
}

fn read_secret_at(path: &str) -> Option<String> {
    match read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Failed to read secret {path}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.destination, Destination::Unconfigured);
        assert_eq!(config.sheet_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_sentinel_means_demo_mode() {
        let config = load(&[(SHEET_URL_KEY, SHEET_URL_SENTINEL)]).unwrap();
        assert_eq!(config.destination, Destination::Unconfigured);

        let config = load(&[(SHEET_URL_KEY, "   ")]).unwrap();
        assert_eq!(config.destination, Destination::Unconfigured);
    }

    #[test]
    fn test_endpoint() {
        let config = load(&[
            (SHEET_URL_KEY, "https://script.google.com/macros/s/abc/exec"),
            (PORT_KEY, "3000"),
            (SHEET_TIMEOUT_KEY, "3"),
        ])
        .unwrap();

        match config.destination {
            Destination::Endpoint(url) => assert_eq!(url.host_str(), Some("script.google.com")),
            other => panic!("expected endpoint, got {other:?}"),
        }
        assert_eq!(config.port, 3000);
        assert_eq!(config.sheet_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_secret_read_failures_fall_back() {
        assert_eq!(read_secret_at("/nonexistent/SHEET_WEBHOOK_URL"), None);

        let dir = std::env::temp_dir();
        assert_eq!(read_secret_at(dir.to_str().unwrap()), None);

        let path = dir.join(format!("rsvp-secret-{}", std::process::id()));
        std::fs::write(&path, "  https://example.com/exec\n").unwrap();
        assert_eq!(
            read_secret_at(path.to_str().unwrap()).as_deref(),
            Some("https://example.com/exec")
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            load(&[(PORT_KEY, "eighty")]),
            Err(ConfigError::Invalid { key: PORT_KEY, .. })
        ));
        assert!(matches!(
            load(&[(SHEET_URL_KEY, "not a url")]),
            Err(ConfigError::Invalid { key: SHEET_URL_KEY, .. })
        ));
        assert!(matches!(
            load(&[(SHEET_URL_KEY, "ftp://example.com/sheet")]),
            Err(ConfigError::Invalid { key: SHEET_URL_KEY, .. })
        ));
    }
}
