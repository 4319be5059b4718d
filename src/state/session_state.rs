//! Main session state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::store::{
    KeyValueStore, KEY_PANEL_POSITION, KEY_PANEL_WIDTH, KEY_SCRATCHPAD, KEY_TIMER_ELAPSED,
};
use super::{LayoutState, PanelSide, ScratchBuffer, StopwatchState};

/// Presentation mode selected at launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelMode {
    /// Default mode - the widget sits inside a host page
    Embedded,
    /// Reduced mode - full-width panel window, no resize affordance
    Panel,
}

/// Session state manager - stopwatch, scratch pad and layout preference,
/// all funneled through a single key-value store
pub struct SessionState {
    /// Stopwatch elapsed time and running flag
    pub stopwatch: Arc<Mutex<StopwatchState>>,
    /// Scratch pad text buffer
    pub scratch: Arc<Mutex<ScratchBuffer>>,
    /// Panel side and width preference
    pub layout: Arc<Mutex<LayoutState>>,
    /// Store every mutation is written through
    pub store: Arc<dyn KeyValueStore>,
    /// Presentation mode reported to clients
    pub mode: PanelMode,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel notifying the tick task of start/pause/reset transitions
    pub stopwatch_change_tx: broadcast::Sender<StopwatchState>,
    /// Channel publishing per-tick snapshots
    pub tick_update_tx: watch::Sender<StopwatchState>,
    /// Keep the receiver alive to prevent channel closure
    pub _tick_update_rx: watch::Receiver<StopwatchState>,
}

impl SessionState {
    /// Create a SessionState loaded from the store.
    ///
    /// Each of the four persisted keys is optional and independent; an absent
    /// or malformed value silently leaves that field at its default. The
    /// stopwatch always loads stopped, whatever it was doing last session.
    pub fn new(store: Arc<dyn KeyValueStore>, mode: PanelMode, port: u16, host: String) -> Self {
        let elapsed = store
            .get(KEY_TIMER_ELAPSED)
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        let text = store.get(KEY_SCRATCHPAD).unwrap_or_default();
        let side = store
            .get(KEY_PANEL_POSITION)
            .map(|value| PanelSide::from_persisted(&value))
            .unwrap_or(PanelSide::Left);
        let width = store.get(KEY_PANEL_WIDTH);

        debug!(
            "Loaded session: elapsed={}s, scratch={} chars, side={}, width={:?}",
            elapsed,
            text.chars().count(),
            side.as_str(),
            width
        );

        let stopwatch = StopwatchState::resumed(elapsed);
        let (stopwatch_change_tx, _) = broadcast::channel(100);
        let (tick_update_tx, tick_update_rx) = watch::channel(stopwatch.clone());

        Self {
            stopwatch: Arc::new(Mutex::new(stopwatch)),
            scratch: Arc::new(Mutex::new(ScratchBuffer::with_text(text))),
            layout: Arc::new(Mutex::new(LayoutState { side, width })),
            store,
            mode,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            stopwatch_change_tx,
            tick_update_tx,
            _tick_update_rx: tick_update_rx,
        }
    }

    /// Record the last action name and time
    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Apply a stopwatch mutation and notify the tick task.
    ///
    /// When `persist_elapsed` is set the new elapsed count is written while
    /// the lock is still held, so a racing tick can never land a stale value
    /// in the store after this mutation's write.
    fn update_stopwatch<F>(
        &self,
        action: &str,
        persist_elapsed: bool,
        updater: F,
    ) -> Result<StopwatchState, String>
    where
        F: FnOnce(&mut StopwatchState),
    {
        let mut stopwatch = self.stopwatch.lock()
            .map_err(|e| format!("Failed to lock stopwatch state: {}", e))?;

        updater(&mut stopwatch);
        let new_state = stopwatch.clone();
        if persist_elapsed {
            self.store.set(KEY_TIMER_ELAPSED, &new_state.elapsed_seconds.to_string());
        }
        drop(stopwatch);

        self.record_action(action);

        // Notify the tick task (this is what starts and cancels the interval)
        if let Err(e) = self.stopwatch_change_tx.send(new_state.clone()) {
            warn!("Failed to send stopwatch change notification: {}", e);
        }

        Ok(new_state)
    }

    /// Start the stopwatch. A no-op while already running, so a second live
    /// tick interval is unreachable.
    pub fn start_stopwatch(&self) -> Result<StopwatchState, String> {
        {
            let stopwatch = self.stopwatch.lock()
                .map_err(|e| format!("Failed to lock stopwatch state: {}", e))?;
            if stopwatch.running {
                info!("Stopwatch already running, ignoring start");
                return Ok(stopwatch.clone());
            }
        }

        info!("Starting stopwatch");
        self.update_stopwatch("start", false, |stopwatch| stopwatch.running = true)
    }

    /// Pause the stopwatch, cancelling the tick. Elapsed time is kept.
    pub fn pause_stopwatch(&self) -> Result<StopwatchState, String> {
        info!("Pausing stopwatch");
        self.update_stopwatch("pause", false, |stopwatch| stopwatch.running = false)
    }

    /// Reset the stopwatch from any state: forces stopped, zeroes elapsed
    /// time and persists the zero.
    pub fn reset_stopwatch(&self) -> Result<StopwatchState, String> {
        info!("Resetting stopwatch");
        self.update_stopwatch("reset", true, |stopwatch| {
            stopwatch.running = false;
            stopwatch.elapsed_seconds = 0;
        })
    }

    /// Advance the stopwatch by one tick and persist the new elapsed time.
    ///
    /// Called by the tick task once per second. Returns `None` without
    /// mutating anything if a pause or reset won the race against the tick.
    pub fn advance_tick(&self) -> Result<Option<StopwatchState>, String> {
        let mut stopwatch = self.stopwatch.lock()
            .map_err(|e| format!("Failed to lock stopwatch state: {}", e))?;

        if !stopwatch.running {
            return Ok(None);
        }

        stopwatch.elapsed_seconds += 1;
        let snapshot = stopwatch.clone();
        // Persist while the lock is held: whichever mutation commits last
        // in memory also writes last, so the store never trails a reset.
        self.store.set(KEY_TIMER_ELAPSED, &snapshot.elapsed_seconds.to_string());
        drop(stopwatch);

        // Publish the snapshot for display watchers
        if let Err(e) = self.tick_update_tx.send(snapshot.clone()) {
            warn!("Failed to send tick update: {}", e);
        }

        Ok(Some(snapshot))
    }

    /// Get current stopwatch state
    pub fn get_stopwatch(&self) -> Result<StopwatchState, String> {
        self.stopwatch.lock()
            .map(|stopwatch| stopwatch.clone())
            .map_err(|e| format!("Failed to lock stopwatch state: {}", e))
    }

    /// Replace the scratch pad text and persist it
    pub fn set_scratch_text(&self, text: String) -> Result<ScratchBuffer, String> {
        let mut scratch = self.scratch.lock()
            .map_err(|e| format!("Failed to lock scratch buffer: {}", e))?;

        scratch.set_text(text);
        let new_buffer = scratch.clone();
        self.store.set(KEY_SCRATCHPAD, &new_buffer.text);
        drop(scratch);

        self.record_action("scratch-edit");

        Ok(new_buffer)
    }

    /// Insert a timestamp token for the current elapsed time at the given
    /// cursor offset, persist the buffer and return it with the new cursor.
    pub fn insert_timestamp(&self, cursor: usize) -> Result<(ScratchBuffer, usize), String> {
        let elapsed = self.get_stopwatch()?.elapsed_seconds;

        let mut scratch = self.scratch.lock()
            .map_err(|e| format!("Failed to lock scratch buffer: {}", e))?;

        let new_cursor = scratch.insert_timestamp(elapsed, cursor);
        let new_buffer = scratch.clone();
        self.store.set(KEY_SCRATCHPAD, &new_buffer.text);
        drop(scratch);

        self.record_action("timestamp");

        info!("Inserted timestamp at cursor {} (elapsed {}s)", cursor, elapsed);
        Ok((new_buffer, new_cursor))
    }

    /// Empty the scratch pad and persist the empty buffer.
    ///
    /// Destructive - callers must obtain explicit user confirmation first.
    pub fn clear_scratch(&self) -> Result<ScratchBuffer, String> {
        let mut scratch = self.scratch.lock()
            .map_err(|e| format!("Failed to lock scratch buffer: {}", e))?;

        scratch.clear();
        let new_buffer = scratch.clone();
        self.store.set(KEY_SCRATCHPAD, "");
        drop(scratch);

        self.record_action("scratch-clear");

        info!("Scratch pad cleared");
        Ok(new_buffer)
    }

    /// Get current scratch buffer
    pub fn get_scratch(&self) -> Result<ScratchBuffer, String> {
        self.scratch.lock()
            .map(|scratch| scratch.clone())
            .map_err(|e| format!("Failed to lock scratch buffer: {}", e))
    }

    /// Update layout fields and persist only the keys that changed.
    ///
    /// Fields are independent - there is no cross-field transaction.
    pub fn update_layout(
        &self,
        side: Option<PanelSide>,
        width: Option<String>,
    ) -> Result<LayoutState, String> {
        let width_changed = width.is_some();

        let mut layout = self.layout.lock()
            .map_err(|e| format!("Failed to lock layout state: {}", e))?;

        if let Some(side) = side {
            layout.side = side;
        }
        if let Some(width) = width {
            layout.width = Some(width);
        }
        let new_layout = layout.clone();

        // Persist under the lock, and only the keys this mutation touched
        if side.is_some() {
            self.store.set(KEY_PANEL_POSITION, new_layout.side.as_str());
        }
        if width_changed {
            if let Some(width) = new_layout.width.as_deref() {
                self.store.set(KEY_PANEL_WIDTH, width);
            }
        }
        drop(layout);

        self.record_action("layout-update");

        Ok(new_layout)
    }

    /// Flip the docked side and persist the new value
    pub fn toggle_panel_side(&self) -> Result<LayoutState, String> {
        let mut layout = self.layout.lock()
            .map_err(|e| format!("Failed to lock layout state: {}", e))?;

        let new_side = layout.toggle_side();
        let new_layout = layout.clone();
        self.store.set(KEY_PANEL_POSITION, new_side.as_str());
        drop(layout);

        self.record_action("toggle-side");

        info!("Panel side toggled to: {}", new_side.as_str());
        Ok(new_layout)
    }

    /// Get current layout preference
    pub fn get_layout(&self) -> Result<LayoutState, String> {
        self.layout.lock()
            .map(|layout| layout.clone())
            .map_err(|e| format!("Failed to lock layout state: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
