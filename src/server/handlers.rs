//! HTTP handlers for liveness and chat

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use super::AppState;
use crate::relay::ChatRequest;

pub const LIVENESS_MESSAGE: &str = "PPO-AI backend is running. Kyllä se siitä.";

/// Liveness check
pub async fn status_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// POST /chat - runs after admission has let the request through.
///
/// A body that fails to decode, or is not a JSON object, is treated as an
/// empty request so the relay's own ordering applies (missing credential
/// first, then "Missing message."). Oversized bodies keep their 413.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(body)) => ChatRequest::from_json(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return rejection.into_response();
        }
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Undecodable chat body");
            ChatRequest::default()
        }
    };

    match state.relay.handle(request).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => e.into_response(),
    }
}
