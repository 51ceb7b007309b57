//! String key-value persistence
//!
//! The game only ever stores three small values, so the store is a plain
//! string map. Reads never fail: a missing or unreadable value is `None`.

use std::collections::HashMap;

use thiserror::Error;

/// Best score, stored as decimal text
pub const BEST_SCORE_KEY: &str = "whackBestScore";
/// Leaderboard, stored as a JSON array
pub const LEADERBOARD_KEY: &str = "whackLeaderboard";
/// Last name typed into the prompt
pub const PLAYER_NAME_KEY: &str = "whackPlayerName";

/// Failure writing to the backing store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to write key `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Durable string-keyed store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key (handy for seeding corrupt data in tests)
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Read the best score, treating anything unparseable as 0
pub fn load_best_score(store: &impl KeyValueStore) -> u32 {
    store
        .get(BEST_SCORE_KEY)
        .and_then(|s| parse_leading_digits(&s))
        .unwrap_or(0)
}

pub fn save_best_score(store: &mut impl KeyValueStore, best: u32) {
    if let Err(e) = store.set(BEST_SCORE_KEY, &best.to_string()) {
        log::warn!("Failed to save best score: {}", e);
    }
}

pub fn load_player_name(store: &impl KeyValueStore) -> String {
    store.get(PLAYER_NAME_KEY).unwrap_or_default()
}

pub fn save_player_name(store: &mut impl KeyValueStore, name: &str) {
    if let Err(e) = store.set(PLAYER_NAME_KEY, name) {
        log::warn!("Failed to save player name: {}", e);
    }
}

/// Lenient integer parse: leading whitespace, then digits up to the first non-digit
fn parse_leading_digits(s: &str) -> Option<u32> {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
