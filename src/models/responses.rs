//! Response DTOs for the diagnostics API

use serde::Serialize;

use crate::cache::CacheStatistics;
use crate::lifecycle::LifecycleState;

/// Response body for `GET /heights/:id`
#[derive(Debug, Clone, Serialize)]
pub struct HeightResponse {
    pub id: String,
    pub height: f64,
}

impl HeightResponse {
    pub fn new(id: impl Into<String>, height: f64) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

/// Response body for mutations that have been applied to the cache
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedResponse {
    /// Human readable summary
    pub message: String,
    /// Item affected, absent for whole-cache operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl AcceptedResponse {
    pub fn stored(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Height for '{}' stored", id),
            id: Some(id),
        }
    }

    pub fn invalidated(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Height for '{}' invalidated", id),
            id: Some(id),
        }
    }

    pub fn cleared() -> Self {
        Self {
            message: "All heights invalidated".to_string(),
            id: None,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub cache: CacheStatistics,
    pub hit_rate: f64,
    /// Preload measurements currently in flight
    pub preloads_in_flight: usize,
    pub lifecycle: LifecycleState,
}

impl StatsResponse {
    pub fn new(cache: CacheStatistics, preloads_in_flight: usize, lifecycle: LifecycleState) -> Self {
        let hit_rate = cache.hit_rate();
        Self {
            cache,
            hit_rate,
            preloads_in_flight,
            lifecycle,
        }
    }
}

/// Response body for `POST /signals/:signal`
#[derive(Debug, Clone, Serialize)]
pub struct SignalResponse {
    pub signal: String,
    /// Subscribers that will observe the signal
    pub receivers: usize,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
