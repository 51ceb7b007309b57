//! Game tuning
//!
//! Every timing and size constant the controller uses. The browser binary can
//! override any subset through a JSON object; missing fields keep defaults.

use serde::{Deserialize, Serialize};

/// Pop cadence by round stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopTiers {
    /// Interval while more than `medium_at` seconds remain
    pub slow_ms: u64,
    /// Interval while more than `fast_at` seconds remain
    pub medium_ms: u64,
    /// Interval for the final stretch
    pub fast_ms: u64,
    /// Seconds remaining at (and below) which the medium tier starts
    pub medium_at: u32,
    /// Seconds remaining at (and below) which the fast tier starts
    pub fast_at: u32,
}

impl Default for PopTiers {
    fn default() -> Self {
        Self {
            slow_ms: 800,
            medium_ms: 650,
            fast_ms: 500,
            medium_at: 20,
            fast_at: 10,
        }
    }
}

impl PopTiers {
    /// Pop interval for a given number of seconds remaining
    pub fn interval_for(&self, time_remaining: u32) -> u64 {
        if time_remaining <= self.fast_at {
            self.fast_ms
        } else if time_remaining <= self.medium_at {
            self.medium_ms
        } else {
            self.slow_ms
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of holes in the grid
    pub slot_count: usize,
    /// Round length in seconds
    pub round_seconds: u32,
    /// Max simultaneously popped targets
    pub max_popped: usize,
    /// Random picks tried before giving up on avoiding a repeat
    pub pick_attempts: u32,
    pub pop_tiers: PopTiers,
    /// Lower bound (inclusive) of a target's visible time
    pub expire_min_ms: u64,
    /// Upper bound (exclusive) of a target's visible time
    pub expire_max_ms: u64,
    /// How long a hit target stays on screen
    pub hit_revert_ms: u64,
    /// How long a new leaderboard row stays highlighted
    pub highlight_ms: u64,
    pub leaderboard_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_count: 9,
            round_seconds: 30,
            max_popped: 3,
            pick_attempts: 10,
            pop_tiers: PopTiers::default(),
            expire_min_ms: 400,
            expire_max_ms: 1000,
            hit_revert_ms: 300,
            highlight_ms: 2000,
            leaderboard_size: 10,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<GameConfig>(json) {
            Ok(config) => {
                log::info!("Loaded game config override");
                config.validated()
            }
            Err(e) => {
                log::warn!("Ignoring invalid game config: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the game unplayable
    pub fn validated(mut self) -> Self {
        self.slot_count = self.slot_count.max(1);
        self.max_popped = self.max_popped.clamp(1, self.slot_count);
        self.pick_attempts = self.pick_attempts.max(1);
        if self.expire_max_ms <= self.expire_min_ms {
            self.expire_max_ms = self.expire_min_ms + 1;
        }
        self.leaderboard_size = self.leaderboard_size.max(1);
        self.round_seconds = self.round_seconds.max(1);
        self
    }
}
