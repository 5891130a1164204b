//! Negotiation endpoints.
//!
//! - `POST /negotiate`     - run one negotiation turn, returns `{"reply"}`
//! - `POST /clear-history` - forget a conversation, returns `{"message"}`
//!
//! Both accept `{"message": ..., "conversationId": ...}` with the
//! identifier defaulting to `"default"`. Turn failures never surface here;
//! the runtime degrades them to an apology reply, so the error payload
//! shape is only used for unknown routes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use parley_agent::runtime::NegotiationRuntime;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_CONVERSATION_ID: &str = "default";
pub const CLEARED_MESSAGE: &str = "Conversation history cleared successfully";

#[derive(Clone)]
pub struct AppState {
    runtime: Arc<NegotiationRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct NegotiateRequest {
    pub message: String,
    #[serde(rename = "conversationId", default = "default_conversation_id")]
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearHistoryRequest {
    #[serde(rename = "conversationId", default = "default_conversation_id")]
    pub conversation_id: String,
}

#[derive(Debug, Serialize)]
pub struct NegotiateResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn default_conversation_id() -> String {
    DEFAULT_CONVERSATION_ID.to_string()
}

pub fn router(runtime: Arc<NegotiationRuntime>) -> Router {
    Router::new()
        .route("/negotiate", post(negotiate))
        .route("/clear-history", post(clear_history))
        .fallback(unknown_route)
        .with_state(AppState { runtime })
}

async fn negotiate(
    State(state): State<AppState>,
    Json(request): Json<NegotiateRequest>,
) -> Json<NegotiateResponse> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "api.negotiate.received",
        correlation_id = %correlation_id,
        conversation_id = %request.conversation_id,
        "inbound negotiation message"
    );

    let reply = state.runtime.handle_turn(&request.message, &request.conversation_id).await;
    Json(NegotiateResponse { reply })
}

async fn clear_history(
    State(state): State<AppState>,
    Json(request): Json<ClearHistoryRequest>,
) -> Json<ClearHistoryResponse> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "api.clear_history.received",
        correlation_id = %correlation_id,
        conversation_id = %request.conversation_id,
        "clearing conversation history"
    );

    state.runtime.clear_history(&request.conversation_id).await;
    Json(ClearHistoryResponse { message: CLEARED_MESSAGE.to_string() })
}

async fn unknown_route() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: "unknown route".to_string() }))
}
