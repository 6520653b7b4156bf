//! Configuration for the upserter
//!
//! All configuration comes from environment variables:
//!
//! - `CF_API_TOKEN`: API token (not validated locally)
//! - `CF_ZONE_ID`: target zone ID (not validated locally)
//! - `CFDNS_API_BASE`: override of the API base URL (optional)
//! - `CFDNS_HTTP_TIMEOUT_SECS`: per-request timeout, default 30
//! - `CFDNS_LOG_LEVEL`: trace, debug, info, warn or error, default info
//!
//! A missing or wrong token or zone ID is deliberately accepted here and
//! surfaces as an error from the first remote call.

use std::time::Duration;

use crate::error::ConfigError;

/// API token variable
pub const ENV_API_TOKEN: &str = "CF_API_TOKEN";
/// Zone ID variable
pub const ENV_ZONE_ID: &str = "CF_ZONE_ID";
/// API base URL override variable
pub const ENV_API_BASE: &str = "CFDNS_API_BASE";
/// HTTP timeout variable
pub const ENV_HTTP_TIMEOUT_SECS: &str = "CFDNS_HTTP_TIMEOUT_SECS";
/// Log level variable
pub const ENV_LOG_LEVEL: &str = "CFDNS_LOG_LEVEL";

/// Default per-request HTTP timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upserter configuration
#[derive(Clone, PartialEq, Eq)]
pub struct UpserterConfig {
    /// API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Target zone ID
    pub zone_id: String,

    /// API base URL override
    pub api_base: Option<String>,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,

    /// Maximum log level
    pub log_level: tracing::Level,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for UpserterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpserterConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .field("http_timeout", &self.http_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl UpserterConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup(ENV_API_BASE).filter(|s| !s.is_empty());
        if let Some(ref url) = api_base
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(ConfigError::InvalidUrl {
                var: ENV_API_BASE,
                value: url.clone(),
            });
        }

        let http_timeout = match lookup(ENV_HTTP_TIMEOUT_SECS).filter(|s| !s.is_empty()) {
            None => DEFAULT_HTTP_TIMEOUT,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: ENV_HTTP_TIMEOUT_SECS,
                        value,
                    });
                }
            },
        };

        let log_level = match lookup(ENV_LOG_LEVEL).filter(|s| !s.is_empty()) {
            None => tracing::Level::INFO,
            Some(value) => parse_level(&value).ok_or(ConfigError::InvalidLogLevel {
                var: ENV_LOG_LEVEL,
                value,
            })?,
        };

        Ok(Self {
            api_token: lookup(ENV_API_TOKEN).unwrap_or_default(),
            zone_id: lookup(ENV_ZONE_ID).unwrap_or_default(),
            api_base,
            http_timeout,
            log_level,
        })
    }
}

fn parse_level(value: &str) -> Option<tracing::Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(tracing::Level::TRACE),
        "debug" => Some(tracing::Level::DEBUG),
        "info" => Some(tracing::Level::INFO),
        "warn" => Some(tracing::Level::WARN),
        "error" => Some(tracing::Level::ERROR),
        _ => None,
    }
}
