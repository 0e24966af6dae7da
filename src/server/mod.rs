//! HTTP service.
//!
//! Exposes `verify` over `POST /verify` plus read-only health, stats and
//! model-info endpoints.

pub mod error;
pub mod handlers;
pub mod stats;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::Verifier;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use stats::{StatsSnapshot, VerificationStats};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The verification engine
    pub verifier: Arc<Verifier>,

    /// Process-wide counters
    pub stats: Arc<VerificationStats>,

    /// Service version
    pub version: String,
}

impl AppState {
    pub fn new(verifier: Verifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
            stats: Arc::new(VerificationStats::new()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/verify", post(handlers::verify))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/model-info", get(handlers::model_info))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn run_server(addr: SocketAddr, verifier: Verifier) -> Result<()> {
    let entities = verifier.facts().entities.len();
    let app = create_router(AppState::new(verifier));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, entities, "TruthLens listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("TruthLens shut down");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
