//! Stopwatch state structure and display formatting

use serde::{Deserialize, Serialize};

/// Stopwatch state - elapsed time plus the running flag
///
/// Mutated only by the start/pause/reset operations and the 1-second tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchState {
    pub elapsed_seconds: u64,
    pub running: bool,
}

impl StopwatchState {
    /// Create a stopped stopwatch at zero
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
        }
    }

    /// Create a stopped stopwatch resumed from a persisted second count
    pub fn resumed(elapsed_seconds: u64) -> Self {
        Self {
            elapsed_seconds,
            running: false,
        }
    }

    /// Check if the stopwatch is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render the elapsed time for display
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

impl Default for StopwatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a total second count as zero-padded `HH:MM:SS`.
///
/// Hours have no upper bound and never roll over into days, so 86400 seconds
/// renders as `24:00:00`.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
