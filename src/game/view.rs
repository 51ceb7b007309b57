//! Render outputs
//!
//! The display layer polls a [`GameView`] snapshot and drains
//! [`DisplayEvent`]s for one-shot effects.

use super::state::{CharacterKind, EndReason, RoundPhase, SlotId, SlotState};
use crate::leaderboard::{Leaderboard, rank_label};

/// One-shot notifications for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Sparkle over a successfully hit slot
    HitEffect { slot: SlotId },
    /// A round finished
    RoundEnded { score: u32, reason: EndReason },
    /// The best score went up
    NewBest { score: u32 },
    /// Ask for a leaderboard name
    PromptName {
        score: u32,
        /// Last name used, pre-filled into the input
        default_name: String,
        /// Rank the score will reach, if it makes the board
        potential_rank: Option<usize>,
    },
    /// Name prompt dismissed (submitted or skipped)
    PromptClosed,
}

/// Rendering state of one hole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    pub id: SlotId,
    pub occupant: Option<CharacterKind>,
    pub state: SlotState,
}

impl SlotView {
    /// Class list for the hole's character element
    pub fn css_class(&self) -> String {
        match (self.occupant, self.state) {
            (Some(kind), SlotState::Popped) => format!("character {} active", kind.as_str()),
            (Some(kind), SlotState::Hit) => format!("character {} whacked", kind.as_str()),
            _ => "character".to_string(),
        }
    }
}

/// One leaderboard table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based rank
    pub rank: usize,
    pub rank_label: String,
    pub name: String,
    pub score: u32,
    /// Freshly submitted entry
    pub highlighted: bool,
}

impl LeaderboardRow {
    /// Build table rows, capped at `limit`
    pub fn from_board(board: &Leaderboard, highlight: Option<usize>, limit: usize) -> Vec<Self> {
        board
            .entries()
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, e)| LeaderboardRow {
                rank: i + 1,
                rank_label: rank_label(i),
                name: e.name.clone(),
                score: e.score,
                highlighted: highlight == Some(i),
            })
            .collect()
    }
}

/// Everything the page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub phase: RoundPhase,
    pub score: u32,
    pub time_remaining: u32,
    pub best_score: u32,
    pub slots: Vec<SlotView>,
    pub leaderboard: Vec<LeaderboardRow>,
    /// Status line shown under the grid
    pub message: Option<String>,
    pub start_label: &'static str,
    pub start_enabled: bool,
    pub stop_visible: bool,
}
