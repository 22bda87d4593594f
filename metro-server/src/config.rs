//! Process configuration read from the environment.
//!
//! Every setting has a default, so an empty environment yields a working
//! server. Values that are present but malformed are startup errors.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric constant is zero, negative or not finite
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Read and parse an optional variable through `lookup`.
pub(crate) fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Path to the line dataset JSON.
    pub dataset_path: PathBuf,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Deadline for a single request.
    pub request_timeout: Duration,

    /// Route cache settings.
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            dataset_path: PathBuf::from("data/lines.json"),
            static_dir: PathBuf::from("static"),
            request_timeout: Duration::from_secs(10),
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build from a variable lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs: Option<u64> = parse_var(&lookup, "METRO_REQUEST_TIMEOUT_SECS")?;
        if timeout_secs == Some(0) {
            return Err(ConfigError::NonPositive {
                name: "METRO_REQUEST_TIMEOUT_SECS",
                value: 0.0,
            });
        }
        let ttl_secs: Option<u64> = parse_var(&lookup, "METRO_CACHE_TTL_SECS")?;

        Ok(Self {
            bind_addr: parse_var(&lookup, "METRO_BIND")?.unwrap_or(defaults.bind_addr),
            dataset_path: lookup("METRO_DATASET")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            static_dir: lookup("METRO_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            request_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            cache: CacheConfig {
                ttl: ttl_secs.map(Duration::from_secs).unwrap_or(defaults.cache.ttl),
                max_capacity: parse_var(&lookup, "METRO_CACHE_CAPACITY")?
                    .unwrap_or(defaults.cache.max_capacity),
            },
        })
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
