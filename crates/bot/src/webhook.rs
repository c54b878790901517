//! Thin webhook receiver.
//!
//! Accepted bodies are handed to the event queue unmodified, in arrival
//! order; all classification happens in the dispatcher. The receiver
//! never blocks on the consumer.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use jackbot_engine::EventQueue;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

#[derive(Clone)]
struct AppState {
    queue: EventQueue,
    stop: Arc<Notify>,
}

/// Events worth queueing at all; everything else is acknowledged and
/// dropped at the door.
fn accepted(payload: &Value) -> bool {
    payload
        .get("webhookEvent")
        .and_then(Value::as_str)
        .is_some_and(|event| event.starts_with("jira:issue_") || event == "sprint_started")
}

async fn health() -> &'static str {
    "JackBot is running!"
}

async fn receive(State(state): State<AppState>, Json(payload): Json<Value>) -> &'static str {
    if accepted(&payload) {
        state.queue.enqueue(payload);
    }
    "OK"
}

async fn shutdown(State(state): State<AppState>) -> &'static str {
    info!("shutdown requested");
    state.queue.shutdown();
    state.stop.notify_one();
    "Server shutting down..."
}

fn build_router(queue: EventQueue, stop: Arc<Notify>) -> Router {
    Router::new()
        .route("/", get(health).post(receive))
        .route("/shutdown", post(shutdown))
        .with_state(AppState { queue, stop })
}

/// Serve the receiver until `POST /shutdown` or Ctrl-C.
pub async fn serve(addr: SocketAddr, queue: EventQueue) -> std::io::Result<()> {
    let stop = Arc::new(Notify::new());
    let app = build_router(queue, stop.clone());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = stop.notified() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        })
        .await
}
