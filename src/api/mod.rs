//! API Module
//!
//! Diagnostics HTTP surface for inspecting and driving the height cache.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /stats` - Cache statistics, preload and lifecycle state
//! - `GET /heights/:id` - Cached height of one item
//! - `PUT /heights` - Store a height
//! - `DELETE /heights/:id` - Invalidate one item
//! - `DELETE /heights` - Invalidate every item
//! - `POST /signals/:signal` - Emit an environment signal
//! - `POST /preload` - Run a batch preload with the text measurer

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
