//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod command;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use command::{InputEvent, Overlay, RenderCommand};
pub use state::{
    EndReason, GameState, Phase, Playfield, Session, SessionSummary, Target, TargetKind,
    TimerState,
};
pub use tick::{advance, end_session, on_hit, start};
