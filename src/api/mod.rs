//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SessionState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<SessionState>) -> Router {
    Router::new()
        .route("/stopwatch", get(stopwatch_handler))
        .route("/stopwatch/start", post(stopwatch_start_handler))
        .route("/stopwatch/pause", post(stopwatch_pause_handler))
        .route("/stopwatch/reset", post(stopwatch_reset_handler))
        .route("/scratch", get(scratch_get_handler).put(scratch_put_handler))
        .route("/scratch/timestamp", post(scratch_timestamp_handler))
        .route("/scratch/clear", post(scratch_clear_handler))
        .route("/scratch/export", get(scratch_export_handler))
        .route("/layout", get(layout_get_handler).put(layout_put_handler))
        .route("/layout/toggle", post(layout_toggle_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
