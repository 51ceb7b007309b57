//! Leaderboard
//!
//! Persisted to the key-value store as a JSON array, keeps the top 10 scores
//! in descending order. Equal scores keep their insertion order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::LEADERBOARD_KEY;

/// Default number of rows kept
pub const MAX_ENTRIES: usize = 10;

/// Name used when the player leaves the prompt blank
pub const ANONYMOUS: &str = "Anonymous";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Day the score was set (`YYYY-MM-DD`)
    pub date: NaiveDate,
}

impl LeaderboardEntry {
    /// Build an entry, substituting a placeholder for blank names
    pub fn new(name: &str, score: u32, date: NaiveDate) -> Self {
        Self {
            name: sanitize_name(name),
            score,
            date,
        }
    }
}

/// Ranked score list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, restoring order and the size limit
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Self {
        // sort_by is stable, so equal scores keep their stored order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a score would make it onto a board of `limit` rows
    pub fn qualifies(&self, score: u32, limit: usize) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < limit {
            return true;
        }
        // Ties lose to existing rows, so it must beat the lowest outright
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32, limit: usize) -> Option<usize> {
        if !self.qualifies(score, limit) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry below every row with an equal or higher score, then
    /// trim to `limit`. Same result as append + stable sort + truncate.
    pub fn insert(&mut self, entry: LeaderboardEntry, limit: usize) {
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        match pos {
            Some(i) => self.entries.insert(i, entry),
            None => self.entries.push(entry),
        }
        self.entries.truncate(limit);
    }

    /// Index of the first row equal to `entry` by name, score and date
    pub fn position_of(&self, entry: &LeaderboardEntry) -> Option<usize> {
        self.entries.iter().position(|e| e == entry)
    }

    /// Load the leaderboard, treating missing or corrupt data as empty
    pub fn load(store: &impl KeyValueStore, limit: usize) -> Self {
        let Some(json) = store.get(LEADERBOARD_KEY) else {
            log::info!("No leaderboard found, starting fresh");
            return Self::new();
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
            Ok(entries) => {
                let board = Self::from_entries(entries, limit);
                log::info!("Loaded {} leaderboard entries", board.len());
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Self::new()
            }
        }
    }

    /// Save the leaderboard; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(LEADERBOARD_KEY, &json) {
                Ok(()) => log::info!("Leaderboard saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("Failed to save leaderboard: {}", e),
            },
            Err(e) => log::warn!("Failed to serialize leaderboard: {}", e),
        }
    }
}

/// Trim a submitted name, substituting the placeholder when blank
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Display label for a 0-based row index: medals for the podium
pub fn rank_label(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Escape text for insertion into HTML markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
