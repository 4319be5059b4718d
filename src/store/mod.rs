//! Key-value persistence module
//!
//! This module contains the store interface the session state writes through,
//! plus the file-backed production store and an in-memory store for tests.

pub mod file_store;
pub mod memory_store;

// Re-export main types
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Key under which the stopwatch elapsed seconds are persisted
pub const KEY_TIMER_ELAPSED: &str = "dcpn-timer-elapsed";
/// Key under which the scratch pad text is persisted
pub const KEY_SCRATCHPAD: &str = "dcpn-scratchpad";
/// Key under which the panel side is persisted ("left" or "right")
pub const KEY_PANEL_POSITION: &str = "dcpn-panel-position";
/// Key under which the panel width is persisted (CSS length string)
pub const KEY_PANEL_WIDTH: &str = "dcpn-panel-width";

/// String-keyed, string-valued store backing the session state.
///
/// Every `set` commits immediately; there is no batching. Write failures are
/// the implementation's concern and never surface to callers, so mutation
/// paths stay infallible with respect to persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for a key, if one was ever written
    fn get(&self, key: &str) -> Option<String>;

    /// Write the value for a key, committing it immediately
    fn set(&self, key: &str, value: &str);
}
