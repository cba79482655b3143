//! HTTP server for the PPO-AI widget
//!
//! - GET /      - Liveness string
//! - POST /chat - Persona chat via Gemini (rate limited per client)

mod handlers;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::admission::AdmissionController;
use crate::config::RelayConfig;
use crate::gemini::Upstream;
use crate::relay::RelayHandler;

pub use handlers::LIVENESS_MESSAGE;

/// Max request body size for /chat (64KB)
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Server State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub admission: Arc<AdmissionController>,
    pub relay: Arc<RelayHandler>,
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// Wire the admission controller and relay from configuration
    pub fn new(config: &RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            admission: Arc::new(AdmissionController::new(config.admission)),
            relay: Arc::new(RelayHandler::new(
                upstream,
                config.gemini_api_key.clone(),
                config.relay,
            )),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // The widget is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let admission = axum::middleware::from_fn_with_state(state.clone(), middleware::admission_gate);

    Router::new()
        .route("/", get(handlers::status_handler))
        .route(
            "/chat",
            post(handlers::chat_handler)
                .route_layer(admission)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Run the HTTP server until ctrl-c
pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "PPO-AI backend running");

    // ConnectInfo feeds the peer address into admission when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
