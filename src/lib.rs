//! Tap Dash - a reflex tap-the-target arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game core (round engine, difficulty, spawning)
//! - `store`: Leaderboard/high-score persistence behind a durable key-value map
//! - `app`: Platform-neutral driver wiring the engine to a score store
//! - `audio`: Web Audio tone playback (wasm only)

pub mod app;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub mod sim;

pub use app::TapDash;
pub use store::{MemoryStore, ScoreBoard, ScoreEntry, StringStore};

/// Game configuration constants
pub mod consts {
    /// Fixed countdown granularity in milliseconds (~60 Hz)
    pub const TICK_MS: i32 = 16;

    /// Consecutive hits within this window chain the combo
    pub const COMBO_WINDOW_MS: f64 = 800.0;

    /// Time added to the countdown by a freeze target
    pub const FREEZE_EXTEND_MS: i32 = 500;
    /// Freeze can push the countdown at most this far past the budget
    pub const FREEZE_CAP_SLACK_MS: i32 = 400;

    /// Per-target time budget at level 1
    pub const BASE_BUDGET_MS: i32 = 1300;
    /// Budget floor reached at high levels
    pub const MIN_BUDGET_MS: i32 = 650;
    /// Budget shrink per level
    pub const BUDGET_STEP_MS: i32 = 100;

    /// Target diameter at level 1 (display px)
    pub const BASE_TARGET_SIZE: f32 = 80.0;
    /// Target diameter floor
    pub const MIN_TARGET_SIZE: f32 = 40.0;
    /// Target shrink per level
    pub const SIZE_STEP: f32 = 4.0;

    /// Points needed to advance one level
    pub const SCORE_PER_LEVEL: u32 = 10;

    /// Vertical space reserved for the HUD at the top of the playfield
    pub const HUD_TOP_INSET: f32 = 50.0;

    /// Leaderboard capacity
    pub const MAX_LEADERBOARD_ENTRIES: usize = 5;
}
