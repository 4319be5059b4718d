//! Stopwatch tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::state::SessionState;

/// Background task that drives the 1-second stopwatch tick.
///
/// The task idles until a state change reports the stopwatch running, then
/// runs a repeating 1-second interval that advances the elapsed time and
/// persists it. The interval is cancelled on the first change back to
/// stopped (pause or reset). Only this task ever holds an interval, and it
/// holds at most one at a time.
///
/// There is no drift correction: under scheduling delay the tick count may
/// lag wall-clock time.
pub async fn stopwatch_tick_task(state: Arc<SessionState>) {
    info!("Starting stopwatch tick task");

    let mut change_rx = state.stopwatch_change_tx.subscribe();

    loop {
        // Wait for a stopwatch state change notification
        match change_rx.recv().await {
            Ok(current) => {
                if !current.running {
                    debug!("Stopwatch stopped, tick task idle");
                    continue;
                }

                info!(
                    "Stopwatch running from {}s, starting 1-second tick",
                    current.elapsed_seconds
                );

                let mut interval = tokio::time::interval(Duration::from_secs(1));
                // The first interval tick completes immediately; consume it
                // so the first increment lands a full second after start.
                interval.tick().await;

                loop {
                    tokio::select! {
                        // Tick - advance elapsed time and persist it
                        _ = interval.tick() => {
                            match state.advance_tick() {
                                Ok(Some(snapshot)) => {
                                    debug!("Tick: elapsed={}s", snapshot.elapsed_seconds);
                                }
                                Ok(None) => {
                                    // Pause or reset won the race against this tick
                                    debug!("Stopwatch no longer running, cancelling tick");
                                    break;
                                }
                                Err(e) => {
                                    error!("Failed to advance stopwatch: {}", e);
                                    break;
                                }
                            }
                        }

                        // State change - cancel the interval on pause/reset
                        result = change_rx.recv() => {
                            match result {
                                Ok(new_state) => {
                                    if !new_state.running {
                                        info!("Stopwatch stopped, cancelling tick");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    error!("Error receiving stopwatch change: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            Err(e) => {
                error!("Error receiving stopwatch change: {}", e);
                // Wait a bit before retrying
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
