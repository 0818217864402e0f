//! HTTP Leaderboard Server
//!
//! Assembles the router, applies permissive CORS, and runs until a shutdown
//! signal arrives. The leaderboard is flushed one last time on the way out.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::network::config::ServerConfig;
use crate::network::handlers::{
    handle_get_leaderboard, handle_health, handle_submit_score, AppState,
};
use crate::network::protocol::{ENDPOINT_HEALTH, ENDPOINT_LEADERBOARD};
use crate::store::RankedStore;

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[source] std::io::Error),

    /// The HTTP server stopped with an error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

/// Allow any origin, and answer pre-flight requests with an empty 200.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

/// Build the application router around `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            ENDPOINT_LEADERBOARD,
            get(handle_get_leaderboard).post(handle_submit_score),
        )
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(state))
        .layer(middleware::from_fn(cors))
}

/// The leaderboard server.
pub struct LeaderboardServer {
    /// Shared handler state.
    state: AppState,
    /// Shutdown signal. Latched, so a request made before `run` still counts.
    shutdown_tx: watch::Sender<bool>,
}

impl LeaderboardServer {
    /// Create a server around an existing store.
    pub fn new(store: Arc<RankedStore>, config: ServerConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            state: AppState::new(store, config),
            shutdown_tx,
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// The store this server serves.
    pub fn store(&self) -> &Arc<RankedStore> {
        &self.state.store
    }

    /// Run the server on the configured address until shutdown or Ctrl+C.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config().bind_addr)
            .await
            .map_err(ServerError::BindFailed)?;
        self.run_with_listener(listener).await
    }

    /// Run the server on an already bound listener.
    #[instrument(skip_all)]
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            info!("Leaderboard server listening on {}", addr);
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let shutdown = async move {
            tokio::select! {
                _ = shutdown_rx.wait_for(|&stop| stop) => info!("Shutdown signal received"),
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => info!("Ctrl+C received"),
                    Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
                },
            }
        };

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        self.flush().await;
        Ok(())
    }

    /// Save the store to the configured path, logging any failure.
    pub async fn flush(&self) {
        let path = &self.config().data_path;
        match self.store().save_to_file(path).await {
            Ok(()) => info!("Flushed leaderboard to {}", path.display()),
            Err(e) => error!("Final flush to {} failed: {}", path.display(), e),
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
