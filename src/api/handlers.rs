//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::state::{LayoutState, PanelSide, SessionState};
use super::responses::{
    ApiResponse, HealthResponse, ScratchResponse, StatusResponse, StopwatchResponse,
};

/// Fixed download filename for the exported scratch pad
const EXPORT_CONTENT_DISPOSITION: &str = "attachment; filename=\"dcpn-notes.txt\"";

/// Request body for PUT /scratch
#[derive(Debug, Deserialize)]
pub struct ScratchUpdateRequest {
    pub text: String,
}

/// Request body for POST /scratch/timestamp
#[derive(Debug, Deserialize)]
pub struct TimestampRequest {
    /// Character offset of the cursor; absent means no cursor context
    pub cursor: Option<usize>,
}

/// Request body for POST /scratch/clear
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Request body for PUT /layout
#[derive(Debug, Deserialize)]
pub struct LayoutUpdateRequest {
    pub side: Option<PanelSide>,
    pub width: Option<String>,
}

/// Handle GET /stopwatch - Current stopwatch snapshot
pub async fn stopwatch_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<StopwatchResponse>, StatusCode> {
    match state.get_stopwatch() {
        Ok(stopwatch) => Ok(Json(StopwatchResponse::from(stopwatch))),
        Err(e) => {
            error!("Failed to get stopwatch state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stopwatch/start - Begin ticking
pub async fn stopwatch_start_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<StopwatchResponse>, StatusCode> {
    match state.start_stopwatch() {
        Ok(stopwatch) => {
            info!("Start endpoint called - stopwatch running");
            Ok(Json(StopwatchResponse::from(stopwatch)))
        }
        Err(e) => {
            error!("Failed to start stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stopwatch/pause - Cancel the tick, keep elapsed time
pub async fn stopwatch_pause_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<StopwatchResponse>, StatusCode> {
    match state.pause_stopwatch() {
        Ok(stopwatch) => {
            info!("Pause endpoint called - stopwatch stopped");
            Ok(Json(StopwatchResponse::from(stopwatch)))
        }
        Err(e) => {
            error!("Failed to pause stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stopwatch/reset - Force stopped, zero elapsed time
pub async fn stopwatch_reset_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<StopwatchResponse>, StatusCode> {
    match state.reset_stopwatch() {
        Ok(stopwatch) => {
            info!("Reset endpoint called - stopwatch zeroed");
            Ok(Json(StopwatchResponse::from(stopwatch)))
        }
        Err(e) => {
            error!("Failed to reset stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /scratch - Current scratch pad text
pub async fn scratch_get_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<ScratchResponse>, StatusCode> {
    match state.get_scratch() {
        Ok(buffer) => Ok(Json(ScratchResponse::text(buffer.text))),
        Err(e) => {
            error!("Failed to get scratch buffer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /scratch - Replace the scratch pad text
pub async fn scratch_put_handler(
    State(state): State<Arc<SessionState>>,
    Json(request): Json<ScratchUpdateRequest>,
) -> Result<Json<ScratchResponse>, StatusCode> {
    match state.set_scratch_text(request.text) {
        Ok(buffer) => Ok(Json(ScratchResponse::text(buffer.text))),
        Err(e) => {
            error!("Failed to update scratch buffer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /scratch/timestamp - Insert a `[HH:MM:SS] ` token at the cursor
///
/// Without a cursor offset in the request there is no cursor context, and the
/// request is rejected with the buffer untouched.
pub async fn scratch_timestamp_handler(
    State(state): State<Arc<SessionState>>,
    Json(request): Json<TimestampRequest>,
) -> Result<Json<ScratchResponse>, StatusCode> {
    let cursor = match request.cursor {
        Some(cursor) => cursor,
        None => {
            warn!("Timestamp insertion requested without a cursor, ignoring");
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    match state.insert_timestamp(cursor) {
        Ok((buffer, new_cursor)) => Ok(Json(ScratchResponse::with_cursor(buffer.text, new_cursor))),
        Err(e) => {
            error!("Failed to insert timestamp: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /scratch/clear - Empty the scratch pad
///
/// Destructive: the body must carry `confirm: true`. Declining leaves all
/// state untouched.
pub async fn scratch_clear_handler(
    State(state): State<Arc<SessionState>>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if !request.confirm {
        warn!("Scratch clear requested without confirmation, ignoring");
        return Ok(Json(ApiResponse::error(
            "Clearing the scratch pad requires confirm: true".to_string(),
        )));
    }

    match state.clear_scratch() {
        Ok(_) => {
            info!("Clear endpoint called - scratch pad emptied");
            Ok(Json(ApiResponse::ok("Scratch pad cleared".to_string())))
        }
        Err(e) => {
            error!("Failed to clear scratch buffer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /scratch/export - Download the scratch pad as plain text
pub async fn scratch_export_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<impl IntoResponse, StatusCode> {
    match state.get_scratch() {
        Ok(buffer) => {
            info!("Exporting scratch pad ({} bytes)", buffer.text.len());
            Ok((
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                    (header::CONTENT_DISPOSITION, EXPORT_CONTENT_DISPOSITION),
                ],
                buffer.text,
            ))
        }
        Err(e) => {
            error!("Failed to export scratch buffer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /layout - Current layout preference
pub async fn layout_get_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<LayoutState>, StatusCode> {
    match state.get_layout() {
        Ok(layout) => Ok(Json(layout)),
        Err(e) => {
            error!("Failed to get layout state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /layout - Update side and/or width
pub async fn layout_put_handler(
    State(state): State<Arc<SessionState>>,
    Json(request): Json<LayoutUpdateRequest>,
) -> Result<Json<LayoutState>, StatusCode> {
    match state.update_layout(request.side, request.width) {
        Ok(layout) => Ok(Json(layout)),
        Err(e) => {
            error!("Failed to update layout: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /layout/toggle - Flip the docked side
pub async fn layout_toggle_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<LayoutState>, StatusCode> {
    match state.toggle_panel_side() {
        Ok(layout) => {
            info!("Toggle endpoint called - panel side is now {}", layout.side.as_str());
            Ok(Json(layout))
        }
        Err(e) => {
            error!("Failed to toggle panel side: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Full session snapshot
pub async fn status_handler(
    State(state): State<Arc<SessionState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let stopwatch = match state.get_stopwatch() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get stopwatch state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let scratch = match state.get_scratch() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get scratch buffer: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let layout = match state.get_layout() {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to get layout state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        stopwatch: StopwatchResponse::from(stopwatch),
        scratch_chars: scratch.text.chars().count(),
        layout,
        mode: state.mode,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
