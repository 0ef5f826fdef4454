//! API Handlers
//!
//! HTTP request handlers for each diagnostics endpoint. Mutating handlers
//! flush the cache before responding so the response reflects applied state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{validate_height, HeightCache};
use crate::config::Config;
use crate::error::{HeightError, Result};
use crate::lifecycle::{EnvironmentSignal, LifecycleManager, SignalBus};
use crate::measure::{TextItem, TextMeasurer};
use crate::models::{
    AcceptedResponse, HealthResponse, HeightResponse, PreloadRequest, SetHeightRequest,
    SignalResponse, StatsResponse,
};
use crate::preload::{BatchPreloader, PreloadReport};
use crate::render_thread::RenderThread;

/// Service handles shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: HeightCache,
    pub signals: SignalBus,
    pub lifecycle: Arc<LifecycleManager>,
    pub preloader: BatchPreloader<TextItem>,
    /// Width used when a preload request omits one
    pub default_width: f64,
}

impl AppState {
    /// Wires the lifecycle manager to the given cache and bus.
    ///
    /// The manager is created stopped.
    pub fn new(
        cache: HeightCache,
        signals: SignalBus,
        preloader: BatchPreloader<TextItem>,
        default_width: f64,
    ) -> Self {
        let lifecycle = Arc::new(LifecycleManager::new(cache.clone(), signals.clone()));
        Self {
            cache,
            signals,
            lifecycle,
            preloader,
            default_width,
        }
    }

    /// Builds every service from configuration, spawning the render thread
    /// with the reference text measurer.
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        let cache = HeightCache::new(config.max_cache_size);
        let render = RenderThread::spawn(TextMeasurer::default)?;
        let preloader = BatchPreloader::new(cache.clone(), render, config.max_concurrent);
        Ok(Self::new(
            cache,
            SignalBus::default(),
            preloader,
            config.default_width,
        ))
    }
}

/// Handler for PUT /heights
pub async fn set_height_handler(
    State(state): State<AppState>,
    Json(req): Json<SetHeightRequest>,
) -> Result<Json<AcceptedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(HeightError::InvalidRequest(error_msg));
    }
    let height = validate_height(req.height)?;

    state.cache.set_height(height, req.id.clone());
    state.cache.flush().await;

    Ok(Json(AcceptedResponse::stored(req.id)))
}

/// Handler for GET /heights/:id
pub async fn get_height_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HeightResponse>> {
    let height = state
        .cache
        .get_height(&id)
        .ok_or_else(|| HeightError::NotFound(id.clone()))?;

    Ok(Json(HeightResponse::new(id, height)))
}

/// Handler for DELETE /heights/:id
pub async fn invalidate_height_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<AcceptedResponse> {
    state.lifecycle.invalidate_one(id.clone());
    state.cache.flush().await;

    Json(AcceptedResponse::invalidated(id))
}

/// Handler for DELETE /heights
pub async fn invalidate_all_handler(State(state): State<AppState>) -> Json<AcceptedResponse> {
    state.lifecycle.invalidate_all();
    state.cache.flush().await;

    Json(AcceptedResponse::cleared())
}

/// Handler for POST /signals/:signal
///
/// The signal goes through the bus, so it only has an effect while the
/// lifecycle manager is started.
pub async fn emit_signal_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SignalResponse>> {
    let signal: EnvironmentSignal = name.parse()?;
    let receivers = state.signals.emit(signal);

    Ok(Json(SignalResponse {
        signal: signal.to_string(),
        receivers,
    }))
}

/// Handler for POST /preload
pub async fn preload_handler(
    State(state): State<AppState>,
    Json(req): Json<PreloadRequest>,
) -> Result<Json<PreloadReport>> {
    if let Some(error_msg) = req.validate() {
        return Err(HeightError::InvalidRequest(error_msg));
    }
    let width = req.width.unwrap_or(state.default_width);

    let report = state.preloader.batch_preload_heights(&req.items, width).await;
    state.cache.flush().await;

    Ok(Json(report))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.statistics(),
        state.preloader.in_flight(),
        state.lifecycle.state(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
