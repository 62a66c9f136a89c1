//! Input events and render commands
//!
//! The two wire enums between the core and the presentation adapter.
//! Input flows in as plain data; everything the adapter must draw or
//! play flows back out as commands, so the core never touches the DOM.

use glam::Vec2;

use super::state::{SessionSummary, TargetKind};

/// Raw input forwarded by the presentation adapter
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Player tapped/clicked at `pos` (page coordinates)
    Tap { at_ms: f64, pos: Vec2 },
    StartRequested,
    /// Save the finished session's score under this name
    SubmitScore(String),
    ViewLeaderboard,
    ReturnToMenu,
}

/// Full-screen overlays the adapter can present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Menu,
    GameOver,
    Leaderboard,
}

/// Drawing/playback instructions emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    UpdateScore(String),
    UpdateLevel(String),
    UpdateCombo(String),
    /// Remaining fraction of the current target's time budget, 0..1
    UpdateTimer(f32),
    ShowTarget {
        kind: TargetKind,
        size: f32,
        x: f32,
        y: f32,
    },
    HideTarget,
    SpawnParticles {
        x: f32,
        y: f32,
        color: &'static str,
    },
    PlayTone {
        freq: f32,
        duration_ms: u32,
        volume: f32,
    },
    ShowOverlay(Overlay),
    SessionSummary(SessionSummary),
}
