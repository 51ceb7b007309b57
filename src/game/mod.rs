//! Reaction game module
//!
//! All gameplay logic lives here and is deterministic:
//! - Explicit millisecond clock supplied by the host
//! - Seeded RNG only
//! - Deferred work goes through the scheduler, guarded by slot cycles

pub mod command;
pub mod controller;
pub mod schedule;
pub mod state;
pub mod view;

pub use command::Command;
pub use controller::{Game, TICK_MS};
pub use schedule::{Scheduler, TimerEvent, TimerId};
pub use state::{CharacterKind, EndReason, Round, RoundPhase, Slot, SlotId, SlotState};
pub use view::{DisplayEvent, GameView, LeaderboardRow, SlotView};
