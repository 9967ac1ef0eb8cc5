//! REST API server for the underwriting orchestrator
//!
//! Exposes one analysis operation in two modes: an SSE stream of progress
//! events (`/api/analyze`) and a blocking variant returning the decision
//! directly (`/api/analyze-simple`), plus a liveness probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::coordinator::Coordinator;
use crate::models::Submission;
use crate::reporter::run_streaming;

#[derive(Clone)]
pub struct ApiState {
    pub coordinator: Arc<Coordinator>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "AgentLend API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Streaming analysis: Submission in, ordered SSE event sequence out.
async fn analyze(
    State(state): State<ApiState>,
    Json(submission): Json<Submission>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        business = %submission.business_name,
        "New streaming analysis request"
    );

    let (tx, rx) = mpsc::channel(16);
    let coordinator = state.coordinator.clone();
    tokio::spawn(run_streaming(coordinator, submission, tx));

    let stream = ReceiverStream::new(rx)
        .map(|event| Event::default().event(event.kind()).json_data(event.payload()));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Blocking analysis: Submission in, decision JSON (or one error body) out.
async fn analyze_simple(
    State(state): State<ApiState>,
    Json(submission): Json<Submission>,
) -> Response {
    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        business = %submission.business_name,
        "New simple analysis request"
    );

    match state.coordinator.analyze(&submission).await {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Analysis failed",
                "message": e.to_string(),
            })),
        )
            .into_response(),
    }
}

pub fn create_router(coordinator: Arc<Coordinator>) -> Router {
    let state = ApiState { coordinator };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/analyze-simple", post(analyze_simple))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(
    coordinator: Arc<Coordinator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(coordinator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API server listening on http://0.0.0.0:{}", port);
    info!("Health check: http://127.0.0.1:{}/api/health", port);

    axum::serve(listener, router).await?;

    Ok(())
}
