// src/error.rs
// Error taxonomy for the relay and its HTTP mapping

use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message shown to clients that hit the admission limit
pub const RATE_LIMITED_MESSAGE: &str = "Liikaa kysymyksiä. PPO-AI hengähtää hetken. (Rate limit)";

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Convenience type alias for Result using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Configuration(_) | RelayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text placed in the `error` field of the JSON body
    pub fn client_message(&self) -> String {
        match self {
            RelayError::InvalidInput(msg) | RelayError::Configuration(msg) => msg.clone(),
            RelayError::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            RelayError::Upstream(detail) => format!("Gemini API error: {}", detail),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.client_message() }));
        let mut response = (status, body).into_response();

        if let RelayError::RateLimited { retry_after } = self {
            // Whole seconds, rounded up, never zero
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }

        response
    }
}
