use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MAX_CONTEXT_DOCUMENTS: usize = 5;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_HISTORY: usize = 20;
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

/// What to do when the oracle says the active set suffices but its handle
/// has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Rebuild the handle from the same documents without re-selection.
    #[default]
    Refresh,
    /// Ask the selector again.
    Reselect,
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "refresh" => Ok(ExpiryPolicy::Refresh),
            "reselect" => Ok(ExpiryPolicy::Reselect),
            _ => Err("expected \"refresh\" or \"reselect\"".to_string()),
        }
    }
}

/// Session settings, fixed when the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_context_documents: usize,
    pub cache_ttl: Duration,
    pub max_history: usize,
    pub streaming: bool,
    /// Surfaces routing and cache statistics; never changes behaviour.
    pub debug: bool,
    pub expiry_policy: ExpiryPolicy,
    /// Applied to every capability call. `None` waits indefinitely.
    pub capability_timeout: Option<Duration>,
    /// Keep the current handle when a reload picks the same documents and
    /// at least this much TTL remains.
    pub reuse_headroom: Option<Duration>,
    /// Recent transcripts to load when the selector yields nothing usable.
    pub fallback_recent_transcripts: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_context_documents: DEFAULT_MAX_CONTEXT_DOCUMENTS,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_history: DEFAULT_MAX_HISTORY,
            streaming: true,
            debug: false,
            expiry_policy: ExpiryPolicy::Refresh,
            capability_timeout: Some(DEFAULT_CAPABILITY_TIMEOUT),
            reuse_headroom: None,
            fallback_recent_transcripts: 0,
        }
    }
}

impl SessionConfig {
    /// Loads `.env` if present, then reads `OLA_*` variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment variables from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("OLA_MAX_CONTEXT_DOCUMENTS") {
            config.max_context_documents = parse_value("OLA_MAX_CONTEXT_DOCUMENTS", &v)?;
        }
        if let Some(v) = lookup("OLA_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_value("OLA_CACHE_TTL_SECS", &v)?);
        }
        if let Some(v) = lookup("OLA_MAX_HISTORY") {
            config.max_history = parse_value("OLA_MAX_HISTORY", &v)?;
        }
        if let Some(v) = lookup("OLA_STREAMING") {
            config.streaming = parse_flag("OLA_STREAMING", &v)?;
        }
        if let Some(v) = lookup("OLA_DEBUG") {
            config.debug = parse_flag("OLA_DEBUG", &v)?;
        }
        if let Some(v) = lookup("OLA_EXPIRY_POLICY") {
            config.expiry_policy = parse_value("OLA_EXPIRY_POLICY", &v)?;
        }
        if let Some(v) = lookup("OLA_CAPABILITY_TIMEOUT_SECS") {
            // 0 disables the timeout
            let secs: u64 = parse_value("OLA_CAPABILITY_TIMEOUT_SECS", &v)?;
            config.capability_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = lookup("OLA_REUSE_HEADROOM_SECS") {
            let secs: u64 = parse_value("OLA_REUSE_HEADROOM_SECS", &v)?;
            config.reuse_headroom = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = lookup("OLA_FALLBACK_RECENT_TRANSCRIPTS") {
            config.fallback_recent_transcripts = parse_value("OLA_FALLBACK_RECENT_TRANSCRIPTS", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_context_documents == 0 {
            return Err(ConfigError::OutOfRange {
                key: "max_context_documents",
                reason: "must be at least 1".into(),
            });
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::OutOfRange {
                key: "cache_ttl",
                reason: "must be greater than zero".into(),
            });
        }
        self.cache_ttl_delta()?;
        if self.capability_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::OutOfRange {
                key: "capability_timeout",
                reason: "use None to disable the timeout".into(),
            });
        }
        if self.reuse_headroom.is_some_and(|h| h.is_zero()) {
            return Err(ConfigError::OutOfRange {
                key: "reuse_headroom",
                reason: "use None to always rebuild".into(),
            });
        }
        Ok(())
    }

    /// The TTL as a wall-clock offset.
    pub fn cache_ttl_delta(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.cache_ttl).map_err(|e| ConfigError::OutOfRange {
            key: "cache_ttl",
            reason: e.to_string(),
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}
