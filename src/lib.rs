//! Holiday Whack - a festive whack-a-mole reaction game
//!
//! Core modules:
//! - `game`: Deterministic controller (round lifecycle, targets, scheduler)
//! - `leaderboard`: Top 10 scores persisted as JSON
//! - `platform`: Browser/native storage and calendar
//! - `config`: Data-driven game tuning

pub mod config;
pub mod game;
pub mod leaderboard;
pub mod platform;

pub use config::{GameConfig, PopTiers};
pub use game::{Command, DisplayEvent, Game, GameView};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
