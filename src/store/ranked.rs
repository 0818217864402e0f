//! Ranked Score Store
//!
//! Concurrent, persistable collection of score entries.
//!
//! Entries are kept in insertion order. Ranking happens lazily at query time
//! with a stable sort, so equal scores keep the order in which they were
//! added. File I/O never happens while the collection lock is held.

use std::path::Path;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use super::entry::ScoreEntry;
use super::persist::{read_entries, write_entries, StoreError};

/// Sort entries by score descending, keeping insertion order on ties.
pub fn rank(entries: &mut [ScoreEntry]) {
    // `sort_by` is stable.
    entries.sort_by(|a, b| b.score().cmp(&a.score()));
}

/// The ranked score store.
#[derive(Debug, Default)]
pub struct RankedStore {
    /// Canonical collection, insertion-ordered.
    entries: RwLock<Vec<ScoreEntry>>,
    /// Serializes file writes so a stale snapshot never lands after a newer one.
    save_guard: Mutex<()>,
}

impl RankedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new score and return the created entry.
    ///
    /// Does not persist; callers schedule a save afterwards.
    pub async fn add(&self, score: u64, player_name: impl Into<String>) -> ScoreEntry {
        let mut entries = self.entries.write().await;
        let entry = ScoreEntry::new(score, player_name);
        entries.push(entry.clone());
        entry
    }

    /// Highest scores first. `limit == 0` returns every entry.
    pub async fn top_scores(&self, limit: usize) -> Vec<ScoreEntry> {
        let mut snapshot = self.snapshot().await;
        rank(&mut snapshot);
        if limit > 0 {
            snapshot.truncate(limit);
        }
        snapshot
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of the canonical collection in insertion order.
    pub async fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.read().await.clone()
    }

    /// Write the full collection to `path`.
    ///
    /// On failure the previous file and the in-memory state are untouched.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        let _guard = self.save_guard.lock().await;
        let snapshot = self.snapshot().await;
        write_entries(path, &snapshot).await?;
        debug!("Saved {} entries", snapshot.len());
        Ok(())
    }

    /// Replace the collection with the contents of `path`.
    ///
    /// Returns the number of entries loaded. On `NotFound` or `Decode` the
    /// store is left exactly as it was.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn load_from_file(&self, path: &Path) -> Result<usize, StoreError> {
        let loaded = read_entries(path).await?;
        let count = loaded.len();

        *self.entries.write().await = loaded;

        info!("Loaded {} entries", count);
        Ok(count)
    }
}
