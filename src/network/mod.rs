//! Network Layer
//!
//! HTTP surface of the leaderboard. Validates untrusted client input and
//! translates requests into store calls; all shared state lives in `store/`.

pub mod config;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use handlers::{spawn_save, AppState};
pub use protocol::{
    ErrorCode, ErrorResponse, HealthResponse, LeaderboardQuery, SubmitScoreRequest,
    ValidSubmission, ValidationError, DEFAULT_LIMIT,
};
pub use server::{router, LeaderboardServer, ServerError};
