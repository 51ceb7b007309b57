//! Deferred callbacks on an explicit millisecond clock
//!
//! The browser's timers become entries in a min-heap ordered by deadline, then
//! by scheduling order. The controller drains due entries each frame.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::state::SlotId;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One-second countdown tick (re-armed by the controller)
    Tick,
    /// A popped target times out
    Expire { slot: SlotId, cycle: u32 },
    /// A hit target leaves the screen
    RevertHit { slot: SlotId, cycle: u32 },
    /// Drop the new-entry highlight on the leaderboard
    ClearHighlight,
}

#[derive(Debug, Clone)]
struct Timer {
    deadline: u64,
    id: TimerId,
    event: TimerEvent,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        // ids are handed out in scheduling order, so they break deadline ties
        (self.deadline, self.id.0).cmp(&(other.deadline, other.id.0))
    }
}

/// Pending timers
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Timer>>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at `deadline` (ms)
    pub fn schedule(&mut self, deadline: u64, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse(Timer {
            deadline,
            id,
            event,
        }));
        id
    }

    /// Remove a pending timer. Returns false if it already fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.heap.len();
        self.heap.retain(|Reverse(t)| t.id != id);
        self.heap.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.heap.iter().any(|Reverse(t)| t.id == id)
    }

    /// Pop the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, TimerEvent)> {
        let due = self
            .heap
            .peek()
            .is_some_and(|Reverse(t)| t.deadline <= now);
        if !due {
            return None;
        }
        self.heap.pop().map(|Reverse(t)| (t.deadline, t.event))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
