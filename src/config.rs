//! Configuration Module
//!
//! Loads height cache and diagnostics server settings from environment variables.

use std::env;

use crate::cache::DEFAULT_MAX_CACHE_SIZE;
use crate::preload::DEFAULT_MAX_CONCURRENT;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of height entries the cache can hold
    pub max_cache_size: usize,
    /// Maximum number of in-flight preload measurements
    pub max_concurrent: usize,
    /// Diagnostics HTTP server port
    pub server_port: u16,
    /// Width used by the preload endpoint when a request omits one
    pub default_width: f64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_SIZE` - Maximum cached heights (default: 5000)
    /// - `MAX_CONCURRENT_PRELOADS` - Preload concurrency bound (default: 5)
    /// - `SERVER_PORT` - Diagnostics server port (default: 3000)
    /// - `DEFAULT_WIDTH` - Fallback measurement width (default: 375.0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cache_size: parse_var("MAX_CACHE_SIZE")
                .filter(|&size: &usize| size > 0)
                .unwrap_or(defaults.max_cache_size),
            max_concurrent: parse_var("MAX_CONCURRENT_PRELOADS")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_concurrent),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_width: parse_var("DEFAULT_WIDTH")
                .filter(|&w: &f64| w.is_finite() && w > 0.0)
                .unwrap_or(defaults.default_width),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            server_port: 3000,
            default_width: 375.0,
        }
    }
}
