//! Survival-time leaderboard
//!
//! Keeps the top 5 runs, longest survival first. Storage goes through a
//! [`ScoreStore`](crate::platform::ScoreStore).

use serde::{Deserialize, Serialize};

use crate::platform::ScoreStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name as entered (trimmed)
    pub name: String,
    /// Survival time in seconds (one decimal)
    pub time: f64,
}

/// Survival-time leaderboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from stored entries, restoring order and the size cap
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        entries.retain(|e| e.time.is_finite());
        entries.sort_by(|a, b| b.time.total_cmp(&a.time));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a time would make the leaderboard
    pub fn qualifies(&self, time: f64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| time > e.time).unwrap_or(true)
    }

    /// Add a run. Returns the rank achieved (1-indexed), or None if it
    /// didn't make the cut. Ties rank below existing entries.
    pub fn add_score(&mut self, name: &str, time: f64) -> Option<usize> {
        if !time.is_finite() || !self.qualifies(time) {
            return None;
        }

        let entry = ScoreEntry {
            name: name.trim().to_string(),
            time,
        };

        // Find insertion point (sorted descending by time)
        let pos = self.entries.iter().position(|e| time > e.time);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest survival time (if any)
    pub fn top_time(&self) -> Option<f64> {
        self.entries.first().map(|e| e.time)
    }

    /// Load from a store; unreadable data means an empty board
    pub fn load(store: &dyn ScoreStore) -> Self {
        let scores = Self::from_entries(store.load_top_scores());
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, store: &mut dyn ScoreStore) {
        store.save_top_scores(&self.entries);
    }

    /// Add a named run and persist the board if it changed
    pub fn record(&mut self, store: &mut dyn ScoreStore, name: &str, time: f64) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        let rank = self.add_score(name, time)?;
        self.save(store);
        log::info!("{} placed #{} with {:.1}s", name.trim(), rank, time);
        Some(rank)
    }
}

/// Decode stored leaderboard JSON; anything malformed reads as no records
pub fn decode_entries(json: &str) -> Vec<ScoreEntry> {
    match serde_json::from_str::<Vec<ScoreEntry>>(json) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("Ignoring malformed leaderboard data: {}", err);
            Vec::new()
        }
    }
}

/// Encode entries for storage (`[{"name": ..., "time": ...}]`)
pub fn encode_entries(entries: &[ScoreEntry]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
}
