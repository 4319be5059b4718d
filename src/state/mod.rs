//! State management module
//!
//! This module contains all session state structures and their management logic.

pub mod layout;
pub mod scratch;
pub mod session_state;
pub mod stopwatch;

// Re-export main types
pub use layout::{LayoutState, PanelSide};
pub use scratch::ScratchBuffer;
pub use session_state::{PanelMode, SessionState};
pub use stopwatch::{format_elapsed, StopwatchState};
