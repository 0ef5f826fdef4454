//! Error types for the height cache
//!
//! Provides unified error handling using thiserror. None of these abort a
//! caller of the cache: they are logged and degrade to "entry absent".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Height Error Enum ==
/// Unified error type for the height cache and its diagnostics surface.
#[derive(Error, Debug)]
pub enum HeightError {
    /// Height outside the storable range `(0, 5000)`
    #[error("Rejected height {0}: must be within (0, 5000)")]
    RejectedInput(f64),

    /// Admission set is at its concurrency limit
    #[error("Preload admission saturated, skipped: {0}")]
    AdmissionSaturated(String),

    /// Item is already being measured by another preload
    #[error("Preload already in flight: {0}")]
    AlreadyInFlight(String),

    /// No cached height for this item
    #[error("Height not cached: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Signal name not recognised
    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    /// The measurer panicked while measuring one item
    #[error("Measurement failed")]
    MeasurementFailed,

    /// The render thread has shut down
    #[error("Render thread unavailable")]
    RenderThreadUnavailable,

    /// The cache writer task has shut down
    #[error("Cache writer closed")]
    CacheClosed,
}

// == IntoResponse Implementation ==
impl IntoResponse for HeightError {
    fn into_response(self) -> Response {
        let status = match &self {
            HeightError::NotFound(_) => StatusCode::NOT_FOUND,
            HeightError::RejectedInput(_)
            | HeightError::InvalidRequest(_)
            | HeightError::UnknownSignal(_) => StatusCode::BAD_REQUEST,
            HeightError::AdmissionSaturated(_) | HeightError::AlreadyInFlight(_) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            HeightError::MeasurementFailed => StatusCode::INTERNAL_SERVER_ERROR,
            HeightError::RenderThreadUnavailable | HeightError::CacheClosed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the height cache.
pub type Result<T> = std::result::Result<T, HeightError>;
