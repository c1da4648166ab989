//! HTTP front end over [`ConciergeService`].
//!
//! `POST /api/chat` runs one routed turn, bounded by the configured turn
//! timeout (504 on expiry). An empty message is a 400 before the service
//! is touched; a request without `session_id` gets a fresh one.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use concierge_agent::{Category, ConciergeService, HistoryEntry, ResponseMetadata};
use concierge_common::{new_request_id, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::Instrument;

#[derive(Clone)]
pub struct AppState {
    pub service: ConciergeService,
    pub turn_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub session_id: SessionId,
    /// Matches the `request_id` field on this turn's log lines.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub session_id: SessionId,
    pub messages: Vec<HistoryEntry>,
    pub count: usize,
    pub total_tokens: u64,
    pub llm_calls: u64,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"success": false, "error": message.into()})))
}

/// Returns the trimmed-nonempty message and the session id to use.
pub fn validate_chat_request(body: ChatRequest) -> Result<(String, SessionId), ApiError> {
    let message = body.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message is required"));
    }
    let session_id = match body.session_id {
        Some(id) if !id.trim().is_empty() => SessionId::from(id),
        _ => SessionId::new(),
    };
    Ok((message, session_id))
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (message, session_id) = validate_chat_request(body)?;
    let timeout_secs = state.turn_timeout_secs;
    let request_id = new_request_id();
    let span = tracing::info_span!("chat", request_id = %request_id, session_id = %session_id);

    let result = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.service.send_message(&session_id, &message).instrument(span),
    )
    .await
    .map_err(|_| {
        tracing::warn!(request_id = %request_id, session_id = %session_id, timeout_secs, "chat turn timed out");
        api_error(
            StatusCode::GATEWAY_TIMEOUT,
            format!("turn timed out after {timeout_secs}s"),
        )
    })?;

    Ok(Json(ChatResponse {
        success: result.success,
        response: result.response,
        session_id,
        request_id,
        category: result.category,
        metadata: result.metadata,
        error: result.error,
    }))
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        provider: state.service.provider().to_string(),
        model: state.service.model().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let id = SessionId::from(session_id);
    let history = state
        .service
        .history(&id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "session not found"))?;
    Ok(Json(HistoryResponse {
        success: true,
        session_id: history.session_id,
        count: history.count,
        total_tokens: history.usage.total_tokens(),
        llm_calls: history.llm_calls,
        messages: history.messages,
    }))
}

async fn handle_clear(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = SessionId::from(session_id);
    if !state.service.clear(&id).await {
        return Err(api_error(StatusCode::NOT_FOUND, "session not found"));
    }
    Ok(Json(json!({
        "success": true,
        "session_id": id,
        "message": "Conversation cleared",
    })))
}

async fn handle_sessions(State(state): State<AppState>) -> Json<Value> {
    let sessions = state.service.sessions().await;
    Json(json!({
        "success": true,
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

pub fn router(service: ConciergeService, turn_timeout_secs: u64) -> Router {
    let state = AppState {
        service,
        turn_timeout_secs,
    };
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .route("/api/history/{session_id}", get(handle_history))
        .route("/api/clear/{session_id}", post(handle_clear))
        .route("/api/sessions", get(handle_sessions))
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM; in-flight requests complete first.
pub async fn run_http(
    service: ConciergeService,
    bind_addr: &str,
    turn_timeout_secs: u64,
) -> anyhow::Result<()> {
    let app = router(service, turn_timeout_secs);
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(
        "concierge listening on {} (turn_timeout={}s)",
        bind_addr,
        turn_timeout_secs
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("concierge stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: Option<&str>, session_id: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.map(str::to_string),
            session_id: session_id.map(str::to_string),
        }
    }

    #[test]
    fn missing_or_blank_message_is_bad_request() {
        for body in [request(None, None), request(Some(""), None), request(Some("  \n"), Some("s"))] {
            let (status, _) = validate_chat_request(body).unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn caller_session_id_is_kept() {
        let (message, id) = validate_chat_request(request(Some("hi"), Some("user-1"))).unwrap();
        assert_eq!(message, "hi");
        assert_eq!(id.as_str(), "user-1");
    }

    #[test]
    fn missing_session_id_gets_fresh_one() {
        let (_, a) = validate_chat_request(request(Some("hi"), None)).unwrap();
        let (_, b) = validate_chat_request(request(Some("hi"), Some(""))).unwrap();
        assert_eq!(a.as_str().len(), 36);
        assert_ne!(a, b);
    }
}
