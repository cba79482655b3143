//! Admission gate in front of /chat

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::AppState;
use crate::admission::{Admission, client_id};
use crate::error::RelayError;

/// Rejects with 429 before the body is read when the client is over its limit.
pub async fn admission_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_id(request.headers(), peer, state.trust_forwarded_for);

    match state.admission.check(&client) {
        Admission::Admitted => next.run(request).await,
        Admission::Rejected { retry_after } => {
            warn!(
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            RelayError::RateLimited { retry_after }.into_response()
        }
    }
}
