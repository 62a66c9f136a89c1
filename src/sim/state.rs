//! Game state and core simulation types
//!
//! Plain data mutated by the round engine. Nothing here touches the
//! platform or the wall clock; time arrives as tick steps and event
//! timestamps.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::command::RenderCommand;
use crate::consts::*;

/// Current phase of a play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session running (menu)
    Idle,
    /// Session in progress, countdown running
    Active,
    /// Session over; only a fresh `start` leaves this phase
    Terminal(EndReason),
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Countdown hit zero before the target was tapped
    Timeout,
    /// The player tapped a bomb
    Bomb,
}

/// The four tappable target flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Normal,
    Bonus,
    Freeze,
    Bomb,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Normal => "normal",
            TargetKind::Bonus => "bonus",
            TargetKind::Freeze => "freeze",
            TargetKind::Bomb => "bomb",
        }
    }

    /// Points before the combo multiplier (bombs never score)
    pub fn base_gain(&self) -> u32 {
        match self {
            TargetKind::Normal => 1,
            TargetKind::Bonus => 3,
            TargetKind::Freeze => 1,
            TargetKind::Bomb => 0,
        }
    }

    /// Particle burst color for a hit of this kind
    pub fn particle_color(&self) -> &'static str {
        match self {
            TargetKind::Normal => "#ff80ab",
            TargetKind::Bonus => "#ffc107",
            TargetKind::Freeze => "#80d8ff",
            TargetKind::Bomb => "#ff5252",
        }
    }

    /// Feedback tone for a hit of this kind: (frequency Hz, duration ms, volume).
    /// Normal and bonus pitch up as the combo grows.
    pub fn tone(&self, combo: u32) -> (f32, u32, f32) {
        match self {
            TargetKind::Normal => (700.0 + combo as f32 * 40.0, 90, 0.2),
            TargetKind::Bonus => (900.0 + combo as f32 * 50.0, 110, 0.25),
            TargetKind::Freeze => (600.0, 120, 0.25),
            TargetKind::Bomb => (200.0, 180, 0.3),
        }
    }
}

/// The single live target
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub kind: TargetKind,
    /// Diameter in display px
    pub size: f32,
    /// Top-left corner within the playfield
    pub pos: Vec2,
    /// Engine clock reading when this target appeared
    pub spawn_ms: f64,
}

/// Per-target countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Time allotted for the current target
    pub budget_ms: i32,
    pub remaining_ms: i32,
}

impl TimerState {
    pub fn new(budget_ms: i32) -> Self {
        Self {
            budget_ms,
            remaining_ms: budget_ms,
        }
    }

    /// Swap in a new budget; the running countdown is untouched until the
    /// next refill.
    pub fn set_budget(&mut self, budget_ms: i32) {
        self.budget_ms = budget_ms;
    }

    /// Restart the countdown at the full budget (every target spawn)
    pub fn refill(&mut self) {
        self.remaining_ms = self.budget_ms;
    }

    /// Add time, capped at `budget + slack`. Invariant:
    /// `remaining_ms <= budget_ms + slack_ms` afterwards.
    pub fn extend(&mut self, add_ms: i32, slack_ms: i32) {
        self.remaining_ms = (self.remaining_ms + add_ms).min(self.budget_ms + slack_ms);
    }

    /// Remaining time as a 0..1 fraction of the budget
    pub fn fraction(&self) -> f32 {
        (self.remaining_ms as f32 / self.budget_ms as f32).max(0.0)
    }
}

/// One play-through's mutable counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    /// Timestamp of the previous scoring hit (combo window anchor)
    pub last_hit_ms: Option<f64>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            combo: 1,
            last_hit_ms: None,
        }
    }
}

/// Playfield dimensions in display px
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// End-of-session report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub final_level: u32,
    pub is_new_high_score: bool,
}

/// Complete engine state for one game instance
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (target kinds and positions)
    pub rng: Pcg32,
    pub phase: Phase,
    pub session: Session,
    /// The live target; `None` outside an active session
    pub target: Option<Target>,
    pub timer: TimerState,
    pub playfield: Playfield,
    /// High score on record when the session began; summaries compare
    /// against this snapshot
    pub high_score: u32,
    /// Engine clock, advanced one tick at a time
    pub elapsed_ms: f64,
    /// Fixed-step accumulator fed by wall-clock deltas
    pub(crate) accum_ms: f64,
    /// Pending render commands, drained by the adapter
    commands: Vec<RenderCommand>,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Idle,
            session: Session::default(),
            target: None,
            timer: TimerState::new(BASE_BUDGET_MS),
            playfield: Playfield::new(480.0, 640.0),
            high_score: 0,
            elapsed_ms: 0.0,
            accum_ms: 0.0,
            commands: Vec::new(),
        }
    }

    pub fn set_playfield(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub(crate) fn emit(&mut self, cmd: RenderCommand) {
        self.commands.push(cmd);
    }

    /// Take all pending render commands
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }
}
