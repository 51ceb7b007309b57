//! Reaction game controller
//!
//! Owns all mutable game state. Time only moves when the host calls
//! [`Game::update`] (once per display frame) or [`Game::handle`] (on input),
//! so the whole thing is deterministic for a given seed and clock.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::schedule::{Scheduler, TimerEvent, TimerId};
use super::state::{CharacterKind, EndReason, Round, RoundPhase, Slot, SlotId, SlotState};
use super::view::{DisplayEvent, GameView, LeaderboardRow, SlotView};
use crate::config::GameConfig;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::platform::storage::{
    load_best_score, load_player_name, save_best_score, save_player_name,
};
use crate::platform::{Calendar, KeyValueStore};

/// Countdown tick period
pub const TICK_MS: u64 = 1000;

/// The reaction game
pub struct Game<S: KeyValueStore, C: Calendar> {
    config: GameConfig,
    store: S,
    calendar: C,
    rng: Pcg32,
    /// Current time (ms, host clock)
    now_ms: u64,
    phase: RoundPhase,
    round: Round,
    slots: Vec<Slot>,
    best_score: u32,
    leaderboard: Leaderboard,
    /// Row index of the freshly submitted entry
    highlight: Option<usize>,
    highlight_timer: Option<TimerId>,
    tick_timer: Option<TimerId>,
    /// Whether frames drive the pop scheduler
    frame_subscribed: bool,
    scheduler: Scheduler,
    message: Option<String>,
    /// At least one round has ended
    played: bool,
    events: Vec<DisplayEvent>,
}

impl<S: KeyValueStore, C: Calendar> Game<S, C> {
    /// Create a game, loading best score and leaderboard from `store`
    pub fn new(config: GameConfig, store: S, calendar: C, seed: u64) -> Self {
        let config = config.validated();
        let best_score = load_best_score(&store);
        let leaderboard = Leaderboard::load(&store, config.leaderboard_size);
        let round = Round::new(config.round_seconds, config.pop_tiers.slow_ms);
        let slots = vec![Slot::default(); config.slot_count];

        log::info!(
            "Game ready: {} slots, best score {}, {} leaderboard entries",
            slots.len(),
            best_score,
            leaderboard.len()
        );

        Self {
            config,
            store,
            calendar,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0,
            phase: RoundPhase::Idle,
            round,
            slots,
            best_score,
            leaderboard,
            highlight: None,
            highlight_timer: None,
            tick_timer: None,
            frame_subscribed: false,
            scheduler: Scheduler::new(),
            message: None,
            played: false,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.round.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.round.time_remaining
    }

    pub fn pop_interval_ms(&self) -> u64 {
        self.round.pop_interval_ms
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlight
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn popped_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_popped()).count()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the countdown tick is armed
    pub fn tick_armed(&self) -> bool {
        self.tick_timer.is_some_and(|id| self.scheduler.is_pending(id))
    }

    pub fn frame_subscribed(&self) -> bool {
        self.frame_subscribed
    }

    /// Take the pending one-shot display events
    pub fn drain_events(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.events)
    }

    // === Clock ===

    /// Advance to `now_ms`, fire due timers, then run one frame of the pop
    /// scheduler. Call once per display refresh.
    pub fn update(&mut self, now_ms: u64) {
        self.advance_to(now_ms);
        if self.frame_subscribed {
            self.on_frame();
        }
    }

    /// Fire every timer due by `now_ms` in deadline order. The clock never
    /// moves backwards.
    pub(crate) fn advance_to(&mut self, now_ms: u64) {
        let now_ms = now_ms.max(self.now_ms);
        while let Some((deadline, event)) = self.scheduler.pop_due(now_ms) {
            self.now_ms = deadline.max(self.now_ms);
            self.fire(event);
        }
        self.now_ms = now_ms;
    }

    fn fire(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick => {
                self.tick_timer =
                    Some(self.scheduler.schedule(self.now_ms + TICK_MS, TimerEvent::Tick));
                self.tick();
            }
            TimerEvent::Expire { slot, cycle } => {
                if let Some(s) = self.slots.get_mut(slot) {
                    if s.is_current(cycle, SlotState::Popped) {
                        s.clear();
                    }
                }
            }
            TimerEvent::RevertHit { slot, cycle } => {
                if let Some(s) = self.slots.get_mut(slot) {
                    if s.is_current(cycle, SlotState::Hit) {
                        s.clear();
                    }
                }
            }
            TimerEvent::ClearHighlight => {
                self.highlight = None;
                self.highlight_timer = None;
            }
        }
    }

    /// Frame-synchronized pop gate
    fn on_frame(&mut self) {
        let due = self
            .round
            .last_pop_ms
            .is_none_or(|last| {
                self.now_ms.saturating_sub(last) >= self.round.pop_interval_ms
            });
        if due {
            self.pop_character();
            self.round.last_pop_ms = Some(self.now_ms);
        }
    }

    // === Round lifecycle ===

    /// Begin a round. Ignored unless idle.
    pub fn start(&mut self) {
        if self.phase != RoundPhase::Idle {
            log::debug!("Start ignored in phase {:?}", self.phase);
            return;
        }

        self.round = Round::new(
            self.config.round_seconds,
            self.config.pop_tiers.interval_for(self.config.round_seconds),
        );
        self.clear_slots();
        self.message = None;
        self.phase = RoundPhase::Running;

        self.tick_timer = Some(self.scheduler.schedule(self.now_ms + TICK_MS, TimerEvent::Tick));
        self.frame_subscribed = true;

        log::info!("Round started ({}s)", self.round.time_remaining);
    }

    /// One second of countdown. Ends the round when the timer hits zero.
    pub fn tick(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }

        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        self.round.pop_interval_ms = self.config.pop_tiers.interval_for(self.round.time_remaining);

        if self.round.time_remaining == 0 {
            self.end(EndReason::Natural);
        }
    }

    /// Stop a running round early
    pub fn stop(&mut self) {
        if self.phase != RoundPhase::Running {
            log::debug!("Stop ignored in phase {:?}", self.phase);
            return;
        }
        self.end(EndReason::Stopped);
    }

    /// Finish the running round
    pub fn end(&mut self, reason: EndReason) {
        if self.phase != RoundPhase::Running {
            return;
        }

        if let Some(id) = self.tick_timer.take() {
            self.scheduler.cancel(id);
        }
        self.frame_subscribed = false;
        self.round.pop_interval_ms = self.config.pop_tiers.slow_ms;
        self.clear_slots();
        self.played = true;

        let score = self.round.score;
        self.events.push(DisplayEvent::RoundEnded { score, reason });
        log::info!("Round ended ({:?}) with score {}", reason, score);

        match reason {
            EndReason::Natural => {
                if score > self.best_score {
                    self.best_score = score;
                    save_best_score(&mut self.store, score);
                    self.events.push(DisplayEvent::NewBest { score });
                    log::info!("New best score: {}", score);
                }
                self.message = None;

                if score > 0 {
                    self.phase = RoundPhase::AwaitingName { score };
                    self.events.push(DisplayEvent::PromptName {
                        score,
                        default_name: load_player_name(&self.store),
                        potential_rank: self
                            .leaderboard
                            .potential_rank(score, self.config.leaderboard_size),
                    });
                } else {
                    self.phase = RoundPhase::Idle;
                }
            }
            EndReason::Stopped => {
                self.message = Some(format!("Game stopped! You scored {} points.", score));
                self.phase = RoundPhase::Idle;
            }
        }
    }

    fn clear_slots(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    // === Targets ===

    /// Show a character in a random free hole. Returns the slot used, or
    /// None when capped, not running, or the pick collided.
    pub fn pop_character(&mut self) -> Option<SlotId> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        if self.popped_count() >= self.config.max_popped {
            return None;
        }

        // Try to avoid busy holes and immediate repeats, then take what we get
        let mut pick;
        let mut attempts = 0;
        loop {
            pick = self.rng.random_range(0..self.slots.len());
            attempts += 1;
            let avoid = self.slots[pick].is_popped() || self.round.last_slot == Some(pick);
            if !avoid || attempts >= self.config.pick_attempts {
                break;
            }
        }
        if self.slots[pick].is_popped() {
            return None;
        }

        let kind = CharacterKind::ALL[self.rng.random_range(0..CharacterKind::ALL.len())];
        let cycle = self.slots[pick].pop(kind);
        self.round.last_slot = Some(pick);

        let visible_ms = self
            .rng
            .random_range(self.config.expire_min_ms..self.config.expire_max_ms);
        self.scheduler.schedule(
            self.now_ms + visible_ms,
            TimerEvent::Expire { slot: pick, cycle },
        );

        Some(pick)
    }

    /// Hit a hole. Returns true if it scored.
    pub fn whack(&mut self, slot: SlotId) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        let Some(target) = self.slots.get_mut(slot) else {
            log::debug!("Whack on unknown slot {}", slot);
            return false;
        };
        if !target.hit() {
            return false;
        }

        let cycle = target.cycle;
        self.round.score += 1;
        self.events.push(DisplayEvent::HitEffect { slot });
        self.scheduler.schedule(
            self.now_ms + self.config.hit_revert_ms,
            TimerEvent::RevertHit { slot, cycle },
        );
        true
    }

    // === Leaderboard prompt ===

    /// Record the finished round under `name`
    pub fn submit(&mut self, name: &str) {
        let RoundPhase::AwaitingName { score } = self.phase else {
            log::debug!("Submit ignored in phase {:?}", self.phase);
            return;
        };

        let entry = LeaderboardEntry::new(name, score, self.calendar.today());
        save_player_name(&mut self.store, &entry.name);

        self.leaderboard.insert(entry.clone(), self.config.leaderboard_size);
        self.leaderboard.save(&mut self.store);

        if let Some(id) = self.highlight_timer.take() {
            self.scheduler.cancel(id);
        }
        self.highlight = self.leaderboard.position_of(&entry);
        if self.highlight.is_some() {
            self.highlight_timer = Some(self.scheduler.schedule(
                self.now_ms + self.config.highlight_ms,
                TimerEvent::ClearHighlight,
            ));
        }

        log::info!(
            "{} submitted score {} (rank {:?})",
            entry.name,
            score,
            self.highlight.map(|i| i + 1)
        );

        self.phase = RoundPhase::Idle;
        self.events.push(DisplayEvent::PromptClosed);
    }

    /// Dismiss the name prompt without recording
    pub fn skip(&mut self) {
        if !matches!(self.phase, RoundPhase::AwaitingName { .. }) {
            return;
        }
        self.phase = RoundPhase::Idle;
        self.events.push(DisplayEvent::PromptClosed);
    }

    // === Rendering ===

    pub fn view(&self) -> GameView {
        let start_label = match self.phase {
            RoundPhase::Running => "Playing...",
            _ if self.played => "Play Again",
            _ => "Start Game",
        };

        GameView {
            phase: self.phase,
            score: self.round.score,
            time_remaining: self.round.time_remaining,
            best_score: self.best_score,
            slots: self
                .slots
                .iter()
                .enumerate()
                .map(|(id, s)| SlotView {
                    id,
                    occupant: s.occupant,
                    state: s.state,
                })
                .collect(),
            leaderboard: LeaderboardRow::from_board(
                &self.leaderboard,
                self.highlight,
                self.config.leaderboard_size,
            ),
            message: self.message.clone(),
            start_label,
            start_enabled: self.phase == RoundPhase::Idle,
            stop_visible: self.phase == RoundPhase::Running,
        }
    }
}
