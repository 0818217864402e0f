//! HTTP Handlers
//!
//! Validate requests, call into the store and shape responses. Persistence
//! is dispatched as a detached task after each successful submission and
//! never affects the response.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::network::config::ServerConfig;
use crate::network::protocol::{
    ErrorResponse, HealthResponse, LeaderboardQuery, SubmitScoreRequest, ValidationError,
};
use crate::store::RankedStore;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The one store instance this server serves.
    pub store: Arc<RankedStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Bundle a store and config for the router.
    pub fn new(store: Arc<RankedStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Save `store` to `path` in the background.
///
/// Failures are logged here; nothing is reported back to the caller.
pub fn spawn_save(store: Arc<RankedStore>, path: PathBuf) -> JoinHandle<()> {
    tokio::spawn(async move {
        match store.save_to_file(&path).await {
            Ok(()) => debug!("Persisted leaderboard to {}", path.display()),
            Err(e) => error!("Failed to persist leaderboard to {}: {}", path.display(), e),
        }
    })
}

fn bad_request(err: ValidationError) -> Response {
    debug!("Rejected submission: {}", err);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(err))).into_response()
}

/// `POST /api/leaderboard`
pub async fn handle_submit_score(
    Extension(state): Extension<AppState>,
    body: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return bad_request(ValidationError::MalformedBody(rejection.body_text()));
        }
    };

    let submission = match request.validate() {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };

    let entry = state
        .store
        .add(submission.score, submission.player_name)
        .await;
    info!(
        "New score {} for {:?} ({})",
        entry.score(),
        entry.player_name(),
        entry.id()
    );

    spawn_save(state.store.clone(), state.config.data_path.clone());

    (StatusCode::CREATED, Json(entry)).into_response()
}

/// `GET /api/leaderboard?limit=N`
pub async fn handle_get_leaderboard(
    Extension(state): Extension<AppState>,
    query: Option<Query<LeaderboardQuery>>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let limit = query.effective_limit(state.config.default_limit);

    let entries = state.store.top_scores(limit).await;
    (StatusCode::OK, Json(entries)).into_response()
}

/// `GET /api/health`
pub async fn handle_health(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.config.version.clone(),
        entries: state.store.len().await,
    })
}
