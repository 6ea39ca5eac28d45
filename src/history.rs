use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maximum retained entries per history key; oldest entries are evicted first.
pub const MAX_HISTORY: usize = 300;

const KEY_PREFIX: &str = "word-history-";

/// Platform key/value storage: string keys, string values, no schema
/// versioning. The browser build backs this with local storage; tests and
/// headless sessions use [`MemoryStore`].
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-memory [`KvStore`].
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}

/// First 8 hex chars of SHA-256, to keep free-form context strings key-safe.
fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..4])
}

/// Bounded list of previously served items for one (game, language, context)
/// combination, used to bias the generator away from repeats.
///
/// Keys follow `word-history-<gameId>[-<language>][-<contextHash>]`.
pub struct HistoryStore {
    store: Arc<dyn KvStore>,
    game_id: String,
    key: String,
}

impl HistoryStore {
    /// `language` is normalized (trimmed, lowercased); an empty `language` or
    /// `extra` leaves the corresponding key suffix off.
    pub fn new(store: Arc<dyn KvStore>, game_id: &str, language: &str, extra: &str) -> Self {
        let mut key = format!("{KEY_PREFIX}{game_id}");
        let language = language.trim().to_lowercase();
        if !language.is_empty() {
            key.push('-');
            key.push_str(&language);
        }
        if !extra.is_empty() {
            key.push('-');
            key.push_str(&short_hash(extra));
        }
        Self {
            store,
            game_id: game_id.to_string(),
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Previously served entries, most recent last.
    pub fn recent(&self) -> Vec<String> {
        self.store
            .get(&self.key)
            .and_then(|stored| serde_json::from_str(&stored).ok())
            .unwrap_or_default()
    }

    /// Append entries, keeping only the newest [`MAX_HISTORY`].
    pub fn append(&self, entries: &[String]) {
        if entries.is_empty() {
            return;
        }
        let mut all = self.recent();
        all.extend(entries.iter().cloned());
        if all.len() > MAX_HISTORY {
            all.drain(..all.len() - MAX_HISTORY);
        }
        if let Ok(json) = serde_json::to_string(&all) {
            self.store.set(&self.key, &json);
        }
    }

    /// Forget this key only.
    pub fn clear(&self) {
        self.store.remove(&self.key);
    }

    /// Forget every key for this game id, across all languages and contexts.
    pub fn clear_all(&self) {
        let prefix = format!("{KEY_PREFIX}{}", self.game_id);
        for key in self.store.keys() {
            if key.starts_with(&prefix) {
                self.store.remove(&key);
            }
        }
    }
}
