//! Producer Panel - a state-managed HTTP server for the panel session widget
//!
//! This is the main entry point for the producer-panel application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use producer_panel::{
    api::create_router,
    config::Config,
    state::SessionState,
    store::FileStore,
    tasks::stopwatch_tick_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("producer_panel={},tower_http=info", config.log_level()))
        .init();

    info!("Starting producer-panel server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_file={}, mode={:?}",
        config.host,
        config.port,
        config.data_file.display(),
        config.mode()
    );

    // Open the persistence store and load the session from it
    let store = Arc::new(FileStore::open(&config.data_file));
    let state = Arc::new(SessionState::new(
        store,
        config.mode(),
        config.port,
        config.host.clone(),
    ));

    // Start the stopwatch tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        stopwatch_tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /stopwatch/start   - Start the stopwatch");
    info!("  POST /stopwatch/pause   - Pause the stopwatch");
    info!("  POST /stopwatch/reset   - Reset the stopwatch to zero");
    info!("  GET  /stopwatch         - Stopwatch snapshot");
    info!("  GET/PUT /scratch        - Read or replace the scratch pad");
    info!("  POST /scratch/timestamp - Insert a timestamp at the cursor");
    info!("  POST /scratch/clear     - Clear the scratch pad (needs confirm)");
    info!("  GET  /scratch/export    - Download the scratch pad as text");
    info!("  GET/PUT /layout         - Read or update the layout preference");
    info!("  POST /layout/toggle     - Flip the panel side");
    info!("  GET  /status            - Full session snapshot");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Tear down the session: cancel the tick so the last persisted elapsed
    // value is the final one
    if let Err(e) = state.pause_stopwatch() {
        tracing::warn!("Failed to stop the stopwatch during shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
