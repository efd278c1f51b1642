//! Configuration loaded from the environment.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 5080;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_DETECTOR_URL: &str = "http://localhost:8000";
pub const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Remote PII detector (Presidio service) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Base URL, without trailing slash (e.g., `http://localhost:8000`).
    pub base_url: String,
    /// Upper bound on a single detector call.
    pub timeout: Duration,
    /// Locale code sent with every request.
    pub language: String,
    /// When false the pipeline goes straight to local redaction.
    pub enabled: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DETECTOR_URL.into(),
            timeout: Duration::from_secs(DEFAULT_DETECTOR_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.into(),
            enabled: true,
        }
    }
}

/// Service window, Monday to Friday, `open_hour <= hour < close_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_hour: 8,
            close_hour: 17,
        }
    }
}

/// Top-level Ouvidoria configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OuvidoriaConfig {
    /// HTTP server port.
    pub port: u16,
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    pub detector: DetectorConfig,
    pub business_hours: BusinessHours,
}

impl Default for OuvidoriaConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.into(),
            detector: DetectorConfig::default(),
            business_hours: BusinessHours::default(),
        }
    }
}

impl OuvidoriaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind_addr);

        let base_url = lookup("PRESIDIO_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.detector.base_url);
        let timeout = parse_var::<u64, _>(&lookup, "PRESIDIO_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.detector.timeout);
        let enabled = match lookup("PRESIDIO_ENABLED") {
            Some(v) => parse_bool("PRESIDIO_ENABLED", &v)?,
            None => defaults.detector.enabled,
        };
        let language = lookup("OUVIDORIA_LANGUAGE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.detector.language);

        let open_hour =
            parse_var(&lookup, "BUSINESS_OPEN_HOUR")?.unwrap_or(defaults.business_hours.open_hour);
        let close_hour = parse_var(&lookup, "BUSINESS_CLOSE_HOUR")?
            .unwrap_or(defaults.business_hours.close_hour);
        if open_hour >= close_hour || close_hour > 24 {
            return Err(Error::Config(format!(
                "invalid business hours: {}..{}",
                open_hour, close_hour
            )));
        }

        Ok(Self {
            port,
            bind_addr,
            detector: DetectorConfig {
                base_url,
                timeout,
                language,
                enabled,
            },
            business_hours: BusinessHours {
                open_hour,
                close_hour,
            },
        })
    }

    /// `host:port` string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{}={:?}: expected a boolean", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = OuvidoriaConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5080);
        assert_eq!(config.detector.base_url, "http://localhost:8000");
        assert_eq!(config.detector.timeout, Duration::from_secs(5));
        assert_eq!(config.detector.language, "pt");
        assert!(config.detector.enabled);
        assert_eq!(config.business_hours, BusinessHours::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:5080");
    }

    #[test]
    fn test_overrides() {
        let config = OuvidoriaConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("PRESIDIO_URL", "http://presidio:8000/"),
            ("PRESIDIO_TIMEOUT_SECS", "2"),
            ("PRESIDIO_ENABLED", "false"),
            ("BUSINESS_OPEN_HOUR", "9"),
            ("BUSINESS_CLOSE_HOUR", "18"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.detector.base_url, "http://presidio:8000");
        assert_eq!(config.detector.timeout, Duration::from_secs(2));
        assert!(!config.detector.enabled);
        assert_eq!(config.business_hours.open_hour, 9);
        assert_eq!(config.business_hours.close_hour, 18);
    }

    #[test]
    fn test_invalid_port_is_error() {
        let err = OuvidoriaConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_inverted_hours_rejected() {
        let result = OuvidoriaConfig::from_lookup(lookup_from(&[
            ("BUSINESS_OPEN_HOUR", "18"),
            ("BUSINESS_CLOSE_HOUR", "8"),
        ]));
        assert!(result.is_err());
    }
}
