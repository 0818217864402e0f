//! File Persistence
//!
//! Encodes the full entry collection as a single JSON array. Writes go to a
//! sibling temporary file which is then renamed over the target, so a failed
//! write never clobbers the previous file. The temporary file is synced to
//! disk before the rename, and the directory after it.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::entry::ScoreEntry;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file does not exist (normal on cold start).
    #[error("data file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file exists but its contents are not a valid entry list.
    #[error("failed to decode data file: {0}")]
    Decode(#[source] serde_json::Error),

    /// The entry list could not be encoded.
    #[error("failed to encode entries: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// True if the error only means there was nothing to load.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// `<file name><suffix>` next to `path`.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("leaderboard"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Temporary path used while writing `path`: `<file name>.tmp` next to it.
fn temp_path(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

/// Create `path`, write `bytes` and flush them to disk before returning.
async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    // Ensure data is physically written to disk
    file.sync_all().await
}

/// Persist a rename by syncing the containing directory.
#[cfg(unix)]
async fn sync_dir(dir: &Path) {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let result = match File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!("Failed to sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) {}

/// Read and decode the entry list stored at `path`.
pub async fn read_entries(path: &Path) -> Result<Vec<ScoreEntry>, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(StoreError::Io(e)),
    };

    let entries: Vec<ScoreEntry> = serde_json::from_slice(&bytes).map_err(StoreError::Decode)?;
    debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Encode `entries` and atomically replace the file at `path`.
pub async fn write_entries(path: &Path, entries: &[ScoreEntry]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(entries).map_err(StoreError::Encode)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp_path = temp_path(path);
    let result = async {
        write_synced(&tmp_path, &json).await?;
        fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(&tmp_path).await {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
        }
        return Err(StoreError::Io(e));
    }

    if let Some(parent) = path.parent() {
        sync_dir(parent).await;
    }

    debug!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Move an unreadable data file out of the way so later saves cannot
/// overwrite it. Returns the new location, `<file name>.corrupt-<UTC time>`.
pub async fn quarantine(path: &Path) -> Result<PathBuf, StoreError> {
    let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
    let target = sibling_path(path, &suffix);
    match fs::rename(path, &target).await {
        Ok(()) => Ok(target),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(StoreError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/var/data/leaderboard.json"));
        assert_eq!(tmp, PathBuf::from("/var/data/leaderboard.json.tmp"));
    }

    #[tokio::test]
    async fn test_write_synced_persists_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synced.json");

        write_synced(&path, b"[]").await.unwrap();
        write_synced(&path, b"[ ]").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"[ ]");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let first = vec![ScoreEntry::new(1, "A"), ScoreEntry::new(2, "B")];
        let second = vec![ScoreEntry::new(3, "C")];

        write_entries(&path, &first).await.unwrap();
        write_entries(&path, &second).await.unwrap();

        assert!(!temp_path(&path).exists());
        assert_eq!(read_entries(&path).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_quarantine_moves_corrupt_file_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, b"{ garbage").unwrap();

        let moved = quarantine(&path).await.unwrap();

        assert!(!path.exists());
        assert_eq!(moved.parent(), path.parent());
        let name = moved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("leaderboard.json.corrupt-"));
        assert_eq!(std::fs::read(&moved).unwrap(), b"{ garbage");
    }

    #[tokio::test]
    async fn test_quarantine_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let result = quarantine(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result = read_entries(&path).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = read_entries(&path).await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("object.json");
        std::fs::write(&path, br#"{"score": 10}"#).unwrap();

        let result = read_entries(&path).await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");
        let entries = vec![ScoreEntry::new(10, "A"), ScoreEntry::new(20, "B")];

        write_entries(&path, &entries).await.unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());
        assert_eq!(read_entries(&path).await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_empty_file_contents_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(read_entries(&path).await, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_write_into_directory_path_fails_with_io() {
        let dir = tempdir().unwrap();
        // Renaming a file over an existing directory fails.
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();

        let result = write_entries(&path, &[ScoreEntry::new(1, "A")]).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!temp_path(&path).exists());
    }
}
