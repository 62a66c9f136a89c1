//! Leaderboard and high-score persistence
//!
//! Backed by a string-keyed durable map (LocalStorage in the browser,
//! an in-memory map in tests and the native demo). Missing or malformed
//! data degrades to defaults; write failures surface as a `StoreError`
//! once and are never retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LEADERBOARD_ENTRIES;

/// Storage key for the leaderboard JSON array
pub const LEADERBOARD_KEY: &str = "tapdash_leaderboard";
/// Storage key for the high-score decimal string
pub const HIGHSCORE_KEY: &str = "tapdash_highscore";

/// Non-fatal persistence failure; in-memory state stays authoritative
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("leaderboard serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string-keyed durable map
pub trait StringStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend for tests and the headless native build
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: std::collections::HashMap<String, String>,
}

impl StringStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// LocalStorage backend (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl StringStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::WriteFailed("LocalStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::WriteFailed(format!("{e:?}")))
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Top-5 leaderboard plus the monotonic high score
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
    high_score: u32,
}

impl ScoreBoard {
    /// Load from the store. Absent or malformed data yields an empty
    /// board; a stale high-score key is lifted to the best entry.
    pub fn load(store: &impl StringStore) -> Self {
        let entries: Vec<ScoreEntry> = store
            .get(LEADERBOARD_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let stored = store
            .get(HIGHSCORE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let best_entry = entries.iter().map(|e| e.score).max().unwrap_or(0);
        let high_score = stored.max(best_entry);

        log::info!(
            "loaded {} leaderboard entries, high score {}",
            entries.len(),
            high_score
        );
        Self {
            entries,
            high_score,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a finished session. Keeps the board sorted descending
    /// (stable, so earlier submissions win ties), capped at five
    /// entries, and never lets the high score regress.
    pub fn submit(
        &mut self,
        store: &mut impl StringStore,
        name: &str,
        score: u32,
    ) -> Result<(), StoreError> {
        self.entries.push(ScoreEntry {
            name: normalize_name(name),
            score,
        });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);

        let best_entry = self.entries.first().map(|e| e.score).unwrap_or(score);
        self.high_score = self.high_score.max(best_entry);

        self.persist(store)
    }

    fn persist(&self, store: &mut impl StringStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(LEADERBOARD_KEY, &json)?;
        store.set(HIGHSCORE_KEY, &self.high_score.to_string())?;
        Ok(())
    }
}

/// Trimmed player name, defaulting for empty input
fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "Player".to_string()
    } else {
        trimmed.to_string()
    }
}
