//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory map natively)
//! - Calendar dates for leaderboard entries

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore, StorageError};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
pub use time::{Calendar, FixedCalendar, SystemCalendar};
