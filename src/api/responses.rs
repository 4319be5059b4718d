//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{LayoutState, PanelMode, StopwatchState};

/// Generic response for endpoints that report an outcome without a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create a success response
    pub fn ok(message: String) -> Self {
        Self::new("ok".to_string(), message)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message)
    }
}

/// Stopwatch snapshot with the formatted display string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchResponse {
    pub running: bool,
    pub elapsed_seconds: u64,
    pub display: String,
}

impl From<StopwatchState> for StopwatchResponse {
    fn from(state: StopwatchState) -> Self {
        Self {
            display: state.display(),
            running: state.running,
            elapsed_seconds: state.elapsed_seconds,
        }
    }
}

/// Scratch pad contents, with the new cursor position after an insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

impl ScratchResponse {
    /// Response carrying only the buffer text
    pub fn text(text: String) -> Self {
        Self { text, cursor: None }
    }

    /// Response carrying the buffer text and a repositioned cursor
    pub fn with_cursor(text: String, cursor: usize) -> Self {
        Self {
            text,
            cursor: Some(cursor),
        }
    }
}

/// Full session snapshot for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub stopwatch: StopwatchResponse,
    pub scratch_chars: usize,
    pub layout: LayoutState,
    pub mode: PanelMode,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
