//! Typed input commands
//!
//! Whatever the input technology (mouse, touch, keyboard, a test script), it
//! reaches the game as one of these.

use super::controller::Game;
use super::state::SlotId;
use crate::platform::{Calendar, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pointer or touch on a hole
    TargetActivated(SlotId),
    StartRequested,
    StopRequested,
    /// Name typed into the leaderboard prompt
    NameSubmitted(String),
    NameSkipped,
}

impl<S: KeyValueStore, C: Calendar> Game<S, C> {
    /// Fire timers due by `now_ms`, then apply `command`
    pub fn handle(&mut self, command: Command, now_ms: u64) {
        self.advance_to(now_ms);
        match command {
            Command::TargetActivated(slot) => {
                self.whack(slot);
            }
            Command::StartRequested => self.start(),
            Command::StopRequested => self.stop(),
            Command::NameSubmitted(name) => self.submit(&name),
            Command::NameSkipped => self.skip(),
        }
    }
}
