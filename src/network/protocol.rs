//! Protocol Messages
//!
//! JSON wire format for the leaderboard HTTP API, plus validation of
//! untrusted client input before it reaches the store.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

/// Leaderboard endpoint (GET to query, POST to submit).
pub const ENDPOINT_LEADERBOARD: &str = "/api/leaderboard";

/// Health endpoint.
pub const ENDPOINT_HEALTH: &str = "/api/health";

/// Result cap used when the client does not supply a usable `limit`.
pub const DEFAULT_LIMIT: usize = 10;

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// Score submission body: `{ "score": <int>, "playerName": <string> }`.
///
/// Both fields are optional at the decoding stage so that missing fields are
/// reported as validation errors rather than opaque decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// Submitted score. Any JSON number decodes here; negative and
    /// fractional values are rejected by `validate`.
    #[serde(default)]
    pub score: Option<Number>,
    /// Display name. Must be present and non-empty.
    #[serde(default)]
    pub player_name: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Non-negative score.
    pub score: u64,
    /// Non-empty player name.
    pub player_name: String,
}

/// Client input errors. All map to `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is not JSON or not the expected object shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// `playerName` is missing or empty.
    #[error("playerName is required")]
    MissingPlayerName,
    /// `score` is missing.
    #[error("score is required")]
    MissingScore,
    /// `score` is below zero.
    #[error("score must be non-negative, got {0}")]
    NegativeScore(Number),
}

impl SubmitScoreRequest {
    /// Check the request and convert it into store inputs.
    pub fn validate(self) -> Result<ValidSubmission, ValidationError> {
        let player_name = match self.player_name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ValidationError::MissingPlayerName),
        };

        let score = self.score.ok_or(ValidationError::MissingScore)?;
        let score = match score.as_u64() {
            Some(score) => score,
            None if score.as_i64().is_some() => return Err(ValidationError::NegativeScore(score)),
            None if score.as_f64().is_some_and(|f| f < 0.0) => {
                return Err(ValidationError::NegativeScore(score))
            }
            None => {
                return Err(ValidationError::MalformedBody(format!(
                    "score must be an integer, got {}",
                    score
                )))
            }
        };

        Ok(ValidSubmission { score, player_name })
    }
}

/// Query string for the leaderboard listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// Requested result cap, string-encoded.
    pub limit: Option<String>,
}

impl LeaderboardQuery {
    /// Parse `limit` as a positive integer, falling back to `default`.
    pub fn effective_limit(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(default)
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Error codes carried in error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid input.
    InvalidInput,
    /// Internal error.
    InternalError,
}

/// Error body: `{ "error": <message>, "code": <code> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: ErrorCode,
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        Self {
            error: err.to_string(),
            code: ErrorCode::InvalidInput,
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Number of stored entries.
    pub entries: usize,
}
