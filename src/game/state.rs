//! Game state types
//!
//! Slots, round counters and the lifecycle phase. Everything here is plain
//! data; transitions live in the controller.

/// Index of a hole in the grid
pub type SlotId = usize;

/// What pops out of a hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    Snowman,
    Reindeer,
    Present,
    Candy,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 4] = [
        CharacterKind::Snowman,
        CharacterKind::Reindeer,
        CharacterKind::Present,
        CharacterKind::Candy,
    ];

    /// CSS class used by the page stylesheet
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Snowman => "snowman",
            CharacterKind::Reindeer => "reindeer",
            CharacterKind::Present => "present",
            CharacterKind::Candy => "candy",
        }
    }
}

/// Slot lifecycle: Empty -> Popped -> Hit -> Empty, or Popped -> Empty on expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Empty,
    Popped,
    Hit,
}

/// One hole in the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub occupant: Option<CharacterKind>,
    pub state: SlotState,
    /// Bumped on every pop and clear so deferred timers can detect staleness
    pub cycle: u32,
}

impl Slot {
    pub fn is_popped(&self) -> bool {
        self.state == SlotState::Popped
    }

    /// Show a character, returning the new cycle
    pub fn pop(&mut self, kind: CharacterKind) -> u32 {
        self.cycle = self.cycle.wrapping_add(1);
        self.occupant = Some(kind);
        self.state = SlotState::Popped;
        self.cycle
    }

    /// Mark as hit. Returns false if nothing was showing.
    pub fn hit(&mut self) -> bool {
        if !self.is_popped() {
            return false;
        }
        self.state = SlotState::Hit;
        true
    }

    pub fn clear(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
        self.occupant = None;
        self.state = SlotState::Empty;
    }

    /// True if still in `state` for the pop that produced `cycle`
    pub fn is_current(&self, cycle: u32, state: SlotState) -> bool {
        self.cycle == cycle && self.state == state
    }
}

/// Lifecycle phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round running, ready to start
    Idle,
    /// Timer counting down, targets popping
    Running,
    /// Round ended naturally with points, waiting for a name or a skip
    AwaitingName { score: u32 },
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Timer ran out
    Natural,
    /// Player pressed stop
    Stopped,
}

/// Counters for the current (or last) round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub score: u32,
    pub time_remaining: u32,
    /// Current pop cadence
    pub pop_interval_ms: u64,
    /// When the frame scheduler last tried to pop
    pub last_pop_ms: Option<u64>,
    /// Most recently chosen slot, avoided on the next pick
    pub last_slot: Option<SlotId>,
}

impl Round {
    pub fn new(time_remaining: u32, pop_interval_ms: u64) -> Self {
        Self {
            score: 0,
            time_remaining,
            pop_interval_ms,
            last_pop_ms: None,
            last_slot: None,
        }
    }
}
