//! HTTP endpoint publishing card reads
//!
//! - `GET /` - banner
//! - `GET /health` - liveness
//! - `GET /read?token=...` - read the inserted card as JSON

pub mod error;
pub mod routes;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{error, info};

use crate::app::services::card_reader::{CardReader, CardService};
use crate::{Error, Result};

pub use error::{ApiError, ErrorResponse};

/// Shared state of the HTTP handlers
#[derive(Debug)]
pub struct AppState<R> {
    pub service: CardService<R>,
    pub auth_token: String,
}

impl<R: CardReader> AppState<R> {
    pub fn new(service: CardService<R>, auth_token: impl Into<String>) -> Self {
        Self {
            service,
            auth_token: auth_token.into(),
        }
    }
}

/// Build the router
pub fn create_router<R: CardReader + 'static>(state: Arc<AppState<R>>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health_check))
        .route("/read", get(routes::read_card::<R>))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}

/// Serve until CTRL+C or SIGTERM
pub async fn serve<R: CardReader + 'static>(
    bind_address: SocketAddr,
    state: Arc<AppState<R>>,
) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| Error::io(format!("Failed to bind {}", bind_address), e))?;
    info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::io("HTTP server stopped", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Graceful shutdown initiated");
}
