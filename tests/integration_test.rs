//! Integration tests for producer-panel
//!
//! These tests verify end-to-end behavior of the session state manager, the
//! tick task and the HTTP surface, using the in-memory store as the
//! injectable persistence fake.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use producer_panel::api::create_router;
use producer_panel::state::{PanelMode, PanelSide, SessionState};
use producer_panel::store::{
    FileStore, KeyValueStore, MemoryStore, KEY_SCRATCHPAD, KEY_TIMER_ELAPSED,
};
use producer_panel::tasks::stopwatch_tick_task;

fn new_session(store: Arc<dyn KeyValueStore>) -> Arc<SessionState> {
    Arc::new(SessionState::new(
        store,
        PanelMode::Embedded,
        0,
        "127.0.0.1".to_string(),
    ))
}

// =============================================================================
// Tick task tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn tick_task_accumulates_only_while_running() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let state = new_session(Arc::clone(&store) as Arc<dyn KeyValueStore>);

    tokio::spawn(stopwatch_tick_task(Arc::clone(&state)));
    // Let the task subscribe before the first transition
    tokio::time::sleep(Duration::from_millis(10)).await;

    state.start_stopwatch().expect("Failed to start stopwatch");
    tokio::time::sleep(Duration::from_secs(5)).await;
    state.pause_stopwatch().expect("Failed to pause stopwatch");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let paused = state.get_stopwatch().expect("Failed to read stopwatch");
    assert!(!paused.running);
    assert!(
        (4..=6).contains(&paused.elapsed_seconds),
        "expected ~5 elapsed seconds, got {}",
        paused.elapsed_seconds
    );

    // Elapsed must not move while stopped
    tokio::time::sleep(Duration::from_secs(10)).await;
    let still_paused = state.get_stopwatch().expect("Failed to read stopwatch");
    assert_eq!(still_paused.elapsed_seconds, paused.elapsed_seconds);

    // Restarting continues from where it left off
    state.start_stopwatch().expect("Failed to restart stopwatch");
    tokio::time::sleep(Duration::from_secs(3)).await;
    state.pause_stopwatch().expect("Failed to pause stopwatch");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let resumed = state.get_stopwatch().expect("Failed to read stopwatch");
    assert!(
        resumed.elapsed_seconds > paused.elapsed_seconds,
        "elapsed should keep accumulating after restart"
    );

    // Every tick persisted the elapsed count
    let persisted: u64 = store
        .get(KEY_TIMER_ELAPSED)
        .expect("Elapsed should be persisted")
        .parse()
        .expect("Persisted elapsed should be an integer");
    assert_eq!(persisted, resumed.elapsed_seconds);
}

#[tokio::test(start_paused = true)]
async fn reset_while_running_cancels_the_tick() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let state = new_session(Arc::clone(&store) as Arc<dyn KeyValueStore>);

    tokio::spawn(stopwatch_tick_task(Arc::clone(&state)));
    tokio::time::sleep(Duration::from_millis(10)).await;

    state.start_stopwatch().expect("Failed to start stopwatch");
    tokio::time::sleep(Duration::from_secs(3)).await;
    state.reset_stopwatch().expect("Failed to reset stopwatch");
    tokio::time::sleep(Duration::from_secs(5)).await;

    let stopwatch = state.get_stopwatch().expect("Failed to read stopwatch");
    assert!(!stopwatch.running);
    assert_eq!(stopwatch.elapsed_seconds, 0);
    assert_eq!(store.get(KEY_TIMER_ELAPSED).as_deref(), Some("0"));
}

// =============================================================================
// Persistence tests
// =============================================================================

#[tokio::test]
async fn session_round_trips_through_a_file_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("dcpn-state.json");

    {
        let store = Arc::new(FileStore::open(&path));
        let state = new_session(store);
        state
            .set_scratch_text("mix notes: vocals up 2dB".to_string())
            .expect("Failed to set scratch text");
        state.toggle_panel_side().expect("Failed to toggle side");
        state
            .update_layout(None, Some("420px".to_string()))
            .expect("Failed to update layout");
        state.start_stopwatch().expect("Failed to start stopwatch");
        state.advance_tick().expect("Failed to tick");
        state.advance_tick().expect("Failed to tick");
    }

    let store = Arc::new(FileStore::open(&path));
    let state = new_session(store);

    let stopwatch = state.get_stopwatch().expect("Failed to read stopwatch");
    assert_eq!(stopwatch.elapsed_seconds, 2);
    assert!(!stopwatch.running, "stopwatch always reloads stopped");

    assert_eq!(
        state.get_scratch().expect("Failed to read scratch").text,
        "mix notes: vocals up 2dB"
    );

    let layout = state.get_layout().expect("Failed to read layout");
    assert_eq!(layout.side, PanelSide::Right);
    assert_eq!(layout.width.as_deref(), Some("420px"));
}

#[tokio::test]
async fn empty_scratch_round_trips_exactly() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("dcpn-state.json");

    {
        let store = Arc::new(FileStore::open(&path));
        let state = new_session(store);
        state
            .set_scratch_text(String::new())
            .expect("Failed to set scratch text");
    }

    let store = FileStore::open(&path);
    assert_eq!(store.get(KEY_SCRATCHPAD).as_deref(), Some(""));
}

// =============================================================================
// HTTP API tests
// =============================================================================

async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    };
    (status, json)
}

async fn send_empty(app: axum::Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    };
    (status, json)
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let state = new_session(Arc::new(MemoryStore::new()));
    let app = create_router(state);

    let (status, body) = send_empty(app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn stopwatch_endpoints_drive_the_state_machine() {
    let state = new_session(Arc::new(MemoryStore::new()));
    let app = create_router(Arc::clone(&state));

    let (status, body) = send_empty(app.clone(), "POST", "/stopwatch/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], true);
    assert_eq!(body["display"], "00:00:00");

    // Simulate two ticks, then pause over HTTP
    state.advance_tick().expect("Failed to tick");
    state.advance_tick().expect("Failed to tick");

    let (status, body) = send_empty(app.clone(), "POST", "/stopwatch/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], false);
    assert_eq!(body["elapsed_seconds"], 2);
    assert_eq!(body["display"], "00:00:02");

    let (status, body) = send_empty(app, "POST", "/stopwatch/reset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["elapsed_seconds"], 0);
}

#[tokio::test]
async fn timestamp_insertion_over_http_repositions_the_cursor() {
    let state = new_session(Arc::new(MemoryStore::new()));
    let app = create_router(Arc::clone(&state));

    let (status, _) = send_json(
        app.clone(),
        "PUT",
        "/scratch",
        serde_json::json!({"text": "verse chorus"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        app.clone(),
        "POST",
        "/scratch/timestamp",
        serde_json::json!({"cursor": 6}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "verse [00:00:00] chorus");
    assert_eq!(body["cursor"], 17);

    // No cursor context: rejected, buffer untouched
    let (status, _) = send_json(app.clone(), "POST", "/scratch/timestamp", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send_empty(app, "GET", "/scratch").await;
    assert_eq!(body["text"], "verse [00:00:00] chorus");
}

#[tokio::test]
async fn clear_requires_explicit_confirmation() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let state = new_session(Arc::clone(&store) as Arc<dyn KeyValueStore>);
    let app = create_router(Arc::clone(&state));

    state
        .set_scratch_text("keep me".to_string())
        .expect("Failed to set scratch text");

    // Declined (no confirm flag): state untouched
    let (status, body) =
        send_json(app.clone(), "POST", "/scratch/clear", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(state.get_scratch().expect("Failed to read scratch").text, "keep me");

    // Confirmed: buffer emptied and the empty string persisted
    let (status, body) = send_json(
        app,
        "POST",
        "/scratch/clear",
        serde_json::json!({"confirm": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(state.get_scratch().expect("Failed to read scratch").text, "");
    assert_eq!(store.get(KEY_SCRATCHPAD).as_deref(), Some(""));
}

#[tokio::test]
async fn export_downloads_plain_text_with_fixed_filename() {
    let state = new_session(Arc::new(MemoryStore::new()));
    state
        .set_scratch_text("[00:01:30] drums come in".to_string())
        .expect("Failed to set scratch text");
    let app = create_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/scratch/export")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .expect("Export should set a content disposition")
        .to_str()
        .expect("Header should be ASCII");
    assert!(disposition.contains("dcpn-notes.txt"));

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    assert_eq!(&bytes[..], b"[00:01:30] drums come in");
}

#[tokio::test]
async fn layout_toggle_twice_round_trips_over_http() {
    let state = new_session(Arc::new(MemoryStore::new()));
    let app = create_router(state);

    let (status, body) = send_empty(app.clone(), "POST", "/layout/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["side"], "right");

    let (status, body) = send_empty(app.clone(), "POST", "/layout/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["side"], "left");

    let (_, body) = send_json(
        app.clone(),
        "PUT",
        "/layout",
        serde_json::json!({"width": "275px"}),
    )
    .await;
    assert_eq!(body["width"], "275px");

    let (_, body) = send_empty(app, "GET", "/status").await;
    assert_eq!(body["layout"]["side"], "left");
    assert_eq!(body["layout"]["width"], "275px");
    assert_eq!(body["mode"], "embedded");
}
