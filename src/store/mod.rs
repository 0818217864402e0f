//! Score Store
//!
//! The leaderboard's shared state: immutable score entries, the concurrent
//! ranked collection that holds them, and its file persistence.

pub mod entry;
pub mod persist;
pub mod ranked;

pub use entry::{EntryId, ScoreEntry};
pub use persist::{quarantine, StoreError};
pub use ranked::{rank, RankedStore};
