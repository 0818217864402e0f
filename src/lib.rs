//! # Leaderboard Server
//!
//! Score tracking service for the browser game: a concurrent ranked score
//! store with file persistence, served over a small JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LEADERBOARD SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  store/          - Shared state                              │
//! │  ├── entry.rs    - Immutable score entries                   │
//! │  ├── ranked.rs   - Concurrent store and top-N queries        │
//! │  └── persist.rs  - JSON file load/save (atomic replace)      │
//! │                                                              │
//! │  network/        - HTTP layer                                │
//! │  ├── config.rs   - Server configuration                      │
//! │  ├── protocol.rs - Wire types and input validation           │
//! │  ├── handlers.rs - Request handlers, background saves        │
//! │  └── server.rs   - Router, CORS, graceful shutdown           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ranking
//!
//! Entries are ranked by score, highest first. Equal scores keep the order
//! in which they were submitted. A limit of `0` returns the whole board.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod network;
pub mod store;

// Re-export commonly used types
pub use network::{LeaderboardServer, ServerConfig};
pub use store::{EntryId, RankedStore, ScoreEntry, StoreError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
