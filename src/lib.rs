//! Producer Panel - a state-managed HTTP server for the panel session widget
//!
//! This library provides the session state behind the producer panel
//! front-end: a stopwatch, a timestamp-annotated scratch pad and a persisted
//! layout preference, all written through a small key-value store.

pub mod api;
pub mod config;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::SessionState;
pub use store::KeyValueStore;
pub use utils::signals::shutdown_signal;
