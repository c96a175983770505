//! Leaderboard storage back-ends
//!
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//! - `JsonFileStore`: JSON file on disk (native)
//! - `MemoryStore`: in-process, for tests and throwaway sessions
//!
//! All of them read missing or corrupt data as an empty leaderboard.

use thiserror::Error;

use super::ScoreStore;
use crate::highscores::{ScoreEntry, decode_entries, encode_entries};

/// Storage failure (logged, never surfaced to the game loop)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Leaderboard kept in memory as its encoded JSON
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

#[cfg(test)]
impl MemoryStore {
    /// Store pre-seeded with raw (possibly malformed) data
    pub(crate) fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    pub(crate) fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load_top_scores(&self) -> Vec<ScoreEntry> {
        self.json.as_deref().map(decode_entries).unwrap_or_default()
    }

    fn save_top_scores(&mut self, entries: &[ScoreEntry]) {
        self.json = Some(encode_entries(entries));
    }
}

/// Leaderboard in a JSON file
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read entries; a missing file is an empty leaderboard
    pub fn try_load(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Write entries, replacing the file atomically
    pub fn try_save(&self, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn load_top_scores(&self) -> Vec<ScoreEntry> {
        self.try_load().unwrap_or_else(|err| {
            log::warn!("{}: {}, starting fresh", self.path.display(), err);
            Vec::new()
        })
    }

    fn save_top_scores(&mut self, entries: &[ScoreEntry]) {
        match self.try_save(entries) {
            Ok(()) => log::info!("High scores saved ({} entries)", entries.len()),
            Err(err) => log::warn!("Could not save high scores to {}: {}", self.path.display(), err),
        }
    }
}

/// Leaderboard in browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "avoidBoxesLeaderboard";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load_top_scores(&self) -> Vec<ScoreEntry> {
        Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .map(|json| decode_entries(&json))
            .unwrap_or_default()
    }

    fn save_top_scores(&mut self, entries: &[ScoreEntry]) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high scores not saved");
            return;
        };
        if storage
            .set_item(Self::STORAGE_KEY, &encode_entries(entries))
            .is_err()
        {
            log::warn!("LocalStorage rejected high scores");
        } else {
            log::info!("High scores saved ({} entries)", entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, time: f64) -> ScoreEntry {
        ScoreEntry {
            name: name.to_string(),
            time,
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert!(store.load_top_scores().is_empty());
        store.save_top_scores(&[entry("A", 3.5)]);
        assert_eq!(store.load_top_scores(), vec![entry("A", 3.5)]);
        assert_eq!(store.raw(), Some(r#"[{"name":"A","time":3.5}]"#));
    }

    #[test]
    fn test_memory_store_malformed_reads_empty() {
        let store = MemoryStore::with_raw("[{\"name\": \"A\"");
        assert!(store.load_top_scores().is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "avoid_boxes_missing_{}.json",
            std::process::id()
        ));
        let store = JsonFileStore::new(&path);
        assert!(store.try_load().unwrap().is_empty());
        assert!(store.load_top_scores().is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_saves_and_recovers_from_corruption() {
        let path = std::env::temp_dir().join(format!(
            "avoid_boxes_store_{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::new(&path);
        store.save_top_scores(&[entry("B", 20.0), entry("A", 10.0)]);
        assert_eq!(store.load_top_scores(), vec![entry("B", 20.0), entry("A", 10.0)]);

        std::fs::write(&path, "{ definitely not a leaderboard").unwrap();
        assert!(matches!(store.try_load(), Err(StorageError::Json(_))));
        assert!(store.load_top_scores().is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
