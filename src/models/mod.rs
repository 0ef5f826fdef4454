//! Request and Response models for the diagnostics API
//!
//! DTOs serialized to and from HTTP bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PreloadRequest, SetHeightRequest};
pub use responses::{
    AcceptedResponse, ErrorResponse, HealthResponse, HeightResponse, SignalResponse,
    StatsResponse,
};
