//! Platform-neutral game driver
//!
//! Owns the engine state and the score board, routes input events and
//! exposes the drained render-command stream. The browser adapter holds
//! one of these behind `Rc<RefCell<_>>`; tests and the native demo drive
//! it directly with a `MemoryStore`.

use crate::sim::{self, GameState, InputEvent, Overlay, RenderCommand};
use crate::store::{ScoreBoard, ScoreEntry, StringStore};

pub struct TapDash<S: StringStore> {
    state: GameState,
    board: ScoreBoard,
    store: S,
}

impl<S: StringStore> TapDash<S> {
    pub fn new(seed: u64, store: S) -> Self {
        let board = ScoreBoard::load(&store);
        let mut state = GameState::new(seed);
        state.high_score = board.high_score();
        Self {
            state,
            board,
            store,
        }
    }

    /// Tell the engine how big the playfield is (call again on resize)
    pub fn set_playfield(&mut self, width: f32, height: f32) {
        self.state.set_playfield(width, height);
    }

    /// Route one input event
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::StartRequested => {
                self.state.high_score = self.board.high_score();
                sim::tick::start(&mut self.state);
            }
            InputEvent::Tap { at_ms, pos } => sim::tick::on_hit(&mut self.state, at_ms, pos),
            InputEvent::SubmitScore(name) => {
                let score = self.state.session.score;
                if let Err(err) = self.board.submit(&mut self.store, &name, score) {
                    // Quota or missing storage: keep playing, the board
                    // just won't survive a reload
                    log::warn!("leaderboard not persisted: {err}");
                }
                self.state.high_score = self.board.high_score();
            }
            InputEvent::ViewLeaderboard => {
                self.state.emit(RenderCommand::ShowOverlay(Overlay::Leaderboard));
            }
            InputEvent::ReturnToMenu => {
                self.state.emit(RenderCommand::ShowOverlay(Overlay::Menu));
            }
        }
    }

    /// Feed a wall-clock frame delta into the countdown
    pub fn advance(&mut self, elapsed_ms: f64) {
        sim::tick::advance(&mut self.state, elapsed_ms);
    }

    /// Take all pending render commands
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        self.state.drain_commands()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> u32 {
        self.board.high_score()
    }

    pub fn leaderboard(&self) -> &[ScoreEntry] {
        self.board.entries()
    }
}
