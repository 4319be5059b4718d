//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod stopwatch_tick;

// Re-export main functions
pub use stopwatch_tick::stopwatch_tick_task;
