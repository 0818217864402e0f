//! Score Entry
//!
//! One submitted score. Entries are value objects: they are created once by
//! the store and never edited afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a score entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single leaderboard submission.
///
/// Serialized as `{ "id", "score", "playerName", "timestamp" }`, both on the
/// wire and in the persisted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    id: EntryId,
    score: u64,
    player_name: String,
    timestamp: DateTime<Utc>,
}

impl ScoreEntry {
    /// Create an entry stamped with a fresh id and the current time.
    pub fn new(score: u64, player_name: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            score,
            player_name: player_name.into(),
            timestamp: Utc::now(),
        }
    }

    /// Entry identifier.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Submitted score (ranking key).
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Display name of the submitter.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Time the entry was inserted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_unique_id() {
        let a = ScoreEntry::new(100, "Alice");
        let b = ScoreEntry::new(100, "Alice");

        assert_ne!(a.id(), b.id());
        assert_eq!(a.score(), 100);
        assert_eq!(a.player_name(), "Alice");
    }

    #[test]
    fn test_timestamp_is_assigned_at_creation() {
        let before = Utc::now();
        let entry = ScoreEntry::new(1, "Bob");
        let after = Utc::now();

        assert!(entry.timestamp() >= before);
        assert!(entry.timestamp() <= after);
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let entry = ScoreEntry::new(750, "Player4");
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["score"], 750);
        assert_eq!(value["playerName"], "Player4");
        assert_eq!(value["id"], entry.id().to_string());
        assert!(value["timestamp"].is_string());
        assert!(value.get("player_name").is_none());
    }

    #[test]
    fn test_entry_decodes_from_file_shape() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "score": 42,
            "playerName": "Carol",
            "timestamp": "2024-03-01T12:00:00Z"
        }"#;

        let entry: ScoreEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.score(), 42);
        assert_eq!(entry.player_name(), "Carol");
        assert_eq!(entry.id().to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(entry.timestamp().to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_negative_score_does_not_decode() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "score": -5,
            "playerName": "Carol",
            "timestamp": "2024-03-01T12:00:00Z"
        }"#;

        assert!(serde_json::from_str::<ScoreEntry>(json).is_err());
    }
}
