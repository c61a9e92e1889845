//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the memory tier aims to hold
    pub memory_max_size: usize,
    /// Redis connection URL; `None` runs the cache memory-only
    pub redis_url: Option<String>,
    /// Namespace prepended to every key stored in Redis
    pub key_prefix: String,
    /// Longest TTL (seconds) the memory tier will honour
    pub memory_ttl_cap: u64,
    /// TTL (seconds) used when a Redis hit is copied into memory
    pub backfill_ttl: u64,
    /// Per-call time budget for Redis, in milliseconds
    pub remote_timeout_ms: u64,
    /// TTL applied by the HTTP surface when a set omits one
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MEMORY_MAX_SIZE` - Memory tier capacity (default: 1000)
    /// - `REDIS_URL` - Redis URL (default: unset, memory-only)
    /// - `CACHE_KEY_PREFIX` - Redis key namespace (default: "hybrid:")
    /// - `CACHE_MEMORY_TTL_CAP` - Memory TTL ceiling in seconds (default: 3600)
    /// - `CACHE_BACKFILL_TTL` - Backfill TTL in seconds (default: 3600)
    /// - `CACHE_REMOTE_TIMEOUT_MS` - Redis call timeout (default: 500)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory_max_size: parse_env("CACHE_MEMORY_MAX_SIZE", defaults.memory_max_size),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            memory_ttl_cap: parse_env("CACHE_MEMORY_TTL_CAP", defaults.memory_ttl_cap),
            backfill_ttl: parse_env("CACHE_BACKFILL_TTL", defaults.backfill_ttl),
            remote_timeout_ms: parse_env("CACHE_REMOTE_TIMEOUT_MS", defaults.remote_timeout_ms),
            default_ttl: parse_env("CACHE_DEFAULT_TTL", defaults.default_ttl),
            server_port: parse_env("SERVER_PORT", defaults.server_port),
        }
    }

    /// Rejects settings that would silently disable a tier or let `clear`
    /// reach keys outside this cache's namespace.
    ///
    /// Capacity is checked by the memory tier itself.
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(CacheError::InvalidConfig(
                "CACHE_KEY_PREFIX must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("CACHE_MEMORY_TTL_CAP", self.memory_ttl_cap),
            ("CACHE_BACKFILL_TTL", self.backfill_ttl),
            ("CACHE_REMOTE_TIMEOUT_MS", self.remote_timeout_ms),
            ("CACHE_DEFAULT_TTL", self.default_ttl),
        ] {
            if value == 0 {
                return Err(CacheError::InvalidConfig(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }

    /// Time budget for a single Redis call.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_max_size: 1000,
            redis_url: None,
            key_prefix: "hybrid:".to_string(),
            memory_ttl_cap: 3600,
            backfill_ttl: 3600,
            remote_timeout_ms: 500,
            default_ttl: 300,
            server_port: 3000,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.memory_max_size, 1000);
        assert!(config.redis_url.is_none());
        assert_eq!(config.key_prefix, "hybrid:");
        assert_eq!(config.memory_ttl_cap, 3600);
        assert_eq!(config.backfill_ttl, 3600);
        assert_eq!(config.remote_timeout(), Duration::from_millis(500));
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_MEMORY_MAX_SIZE",
            "REDIS_URL",
            "CACHE_KEY_PREFIX",
            "CACHE_MEMORY_TTL_CAP",
            "CACHE_BACKFILL_TTL",
            "CACHE_REMOTE_TIMEOUT_MS",
            "CACHE_DEFAULT_TTL",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.memory_max_size, 1000);
        assert!(config.redis_url.is_none());
        assert_eq!(config.key_prefix, "hybrid:");
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_key_prefix() {
        let config = Config {
            key_prefix: String::new(),
            ..Config::default()
        };

        let error = config.validate().unwrap_err();
        assert!(matches!(error, CacheError::InvalidConfig(_)));
        assert!(error.to_string().contains("CACHE_KEY_PREFIX"));
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let cases = [
            (
                Config { memory_ttl_cap: 0, ..Config::default() },
                "CACHE_MEMORY_TTL_CAP",
            ),
            (
                Config { backfill_ttl: 0, ..Config::default() },
                "CACHE_BACKFILL_TTL",
            ),
            (
                Config { remote_timeout_ms: 0, ..Config::default() },
                "CACHE_REMOTE_TIMEOUT_MS",
            ),
            (
                Config { default_ttl: 0, ..Config::default() },
                "CACHE_DEFAULT_TTL",
            ),
        ];

        for (config, name) in cases {
            let error = config.validate().unwrap_err();
            assert!(error.to_string().contains(name), "{}", error);
        }
    }

    #[test]
    fn test_parse_env_falls_back_on_garbage() {
        env::set_var("HYBRID_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(parse_env("HYBRID_CACHE_TEST_GARBAGE", 42u64), 42);
        env::remove_var("HYBRID_CACHE_TEST_GARBAGE");
    }
}
