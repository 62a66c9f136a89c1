//! Round engine
//!
//! Drives one session: fixed-step countdown, hit resolution, difficulty
//! progression and target spawning. Wall-clock deltas are folded into a
//! fixed-step accumulator so behavior is deterministic under test.

use glam::Vec2;
use rand::Rng;

use super::command::{Overlay, RenderCommand};
use super::difficulty;
use super::state::{EndReason, GameState, Phase, Session, SessionSummary, Target, TargetKind};
use crate::consts::*;

/// Begin a fresh session. Valid from any phase; a terminal session never
/// resumes any other way.
pub fn start(state: &mut GameState) {
    state.session = Session::default();
    state.phase = Phase::Active;
    state.elapsed_ms = 0.0;
    state.accum_ms = 0.0;
    state.timer.set_budget(difficulty::budget_ms(1));

    state.emit(RenderCommand::UpdateScore("Score: 0".into()));
    state.emit(RenderCommand::UpdateLevel("Level: 1".into()));
    state.emit(RenderCommand::UpdateCombo("Combo: x1".into()));
    spawn_target(state);

    log::info!("session started (seed {})", state.seed);
}

/// Feed a wall-clock delta into the countdown. Steps in whole `TICK_MS`
/// quanta; the remainder stays in the accumulator for the next frame.
pub fn advance(state: &mut GameState, elapsed_ms: f64) {
    if !state.is_active() {
        return;
    }
    state.accum_ms += elapsed_ms;
    while state.accum_ms >= TICK_MS as f64 {
        state.accum_ms -= TICK_MS as f64;
        step(state);
        if !state.is_active() {
            break;
        }
    }
}

/// One fixed countdown tick
fn step(state: &mut GameState) {
    state.elapsed_ms += TICK_MS as f64;
    state.timer.remaining_ms -= TICK_MS;
    state.emit(RenderCommand::UpdateTimer(state.timer.fraction()));

    if state.timer.remaining_ms <= 0 {
        end_session(state, EndReason::Timeout);
    }
}

/// Resolve a tap on the live target. Ignored outside an active session.
pub fn on_hit(state: &mut GameState, at_ms: f64, pos: Vec2) {
    if !state.is_active() {
        return;
    }
    let Some(target) = state.target else {
        return;
    };

    if target.kind == TargetKind::Bomb {
        state.emit(RenderCommand::SpawnParticles {
            x: pos.x,
            y: pos.y,
            color: TargetKind::Bomb.particle_color(),
        });
        let (freq, duration_ms, volume) = TargetKind::Bomb.tone(state.session.combo);
        state.emit(RenderCommand::PlayTone {
            freq,
            duration_ms,
            volume,
        });
        end_session(state, EndReason::Bomb);
        return;
    }

    // Combo chains while hits stay inside the window
    let chained = state
        .session
        .last_hit_ms
        .is_some_and(|last| at_ms - last < COMBO_WINDOW_MS);
    state.session.combo = if chained { state.session.combo + 1 } else { 1 };
    state.session.last_hit_ms = Some(at_ms);

    state.session.score += target.kind.base_gain() * state.session.combo;

    if target.kind == TargetKind::Freeze {
        state.timer.extend(FREEZE_EXTEND_MS, FREEZE_CAP_SLACK_MS);
    }

    let level = difficulty::level_for_score(state.session.score);
    if level > state.session.level {
        state.session.level = level;
        state.timer.set_budget(difficulty::budget_ms(level));
        state.emit(RenderCommand::UpdateLevel(format!("Level: {level}")));
        state.emit(RenderCommand::PlayTone {
            freq: 900.0,
            duration_ms: 100,
            volume: 0.25,
        });
    }

    state.emit(RenderCommand::UpdateScore(format!(
        "Score: {}",
        state.session.score
    )));
    state.emit(RenderCommand::UpdateCombo(format!(
        "Combo: x{}",
        state.session.combo
    )));
    state.emit(RenderCommand::SpawnParticles {
        x: pos.x,
        y: pos.y,
        color: target.kind.particle_color(),
    });
    let (freq, duration_ms, volume) = target.kind.tone(state.session.combo);
    state.emit(RenderCommand::PlayTone {
        freq,
        duration_ms,
        volume,
    });

    spawn_target(state);
}

/// Terminate the session and report the result. The accumulator is
/// zeroed so no queued tick mutates state afterwards.
pub fn end_session(state: &mut GameState, reason: EndReason) -> SessionSummary {
    state.phase = Phase::Terminal(reason);
    state.accum_ms = 0.0;
    state.target = None;

    let summary = SessionSummary {
        final_score: state.session.score,
        final_level: state.session.level,
        is_new_high_score: state.session.score > state.high_score,
    };

    state.emit(RenderCommand::HideTarget);
    state.emit(RenderCommand::ShowOverlay(Overlay::GameOver));
    state.emit(RenderCommand::SessionSummary(summary));

    log::info!(
        "session over ({:?}): score {} at level {}",
        reason,
        summary.final_score,
        summary.final_level
    );
    summary
}

/// Replace the live target with a fresh draw and restart the countdown.
/// Kind, size and position are re-derived on every spawn.
fn spawn_target(state: &mut GameState) {
    let size = difficulty::target_size(state.session.level);
    let kind = pick_target_kind(state.rng.random::<f32>());

    let max_x = (state.playfield.width - size).max(0.0);
    let max_y = (state.playfield.height - size).max(HUD_TOP_INSET);
    let x = state.rng.random_range(0.0..=max_x);
    let y = state.rng.random_range(HUD_TOP_INSET..=max_y);

    state.target = Some(Target {
        kind,
        size,
        pos: Vec2::new(x, y),
        spawn_ms: state.elapsed_ms,
    });
    state.timer.refill();

    state.emit(RenderCommand::ShowTarget { kind, size, x, y });
    state.emit(RenderCommand::UpdateTimer(state.timer.fraction()));
}

/// Weighted kind draw from a single uniform sample (~8% bombs)
fn pick_target_kind(r: f32) -> TargetKind {
    if r < 0.65 {
        TargetKind::Normal
    } else if r < 0.80 {
        TargetKind::Bonus
    } else if r < 0.92 {
        TargetKind::Freeze
    } else {
        TargetKind::Bomb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start(&mut state);
        state.drain_commands();
        state
    }

    fn force_kind(state: &mut GameState, kind: TargetKind) {
        state.target.as_mut().unwrap().kind = kind;
    }

    fn tap(state: &mut GameState, at_ms: f64) {
        let pos = state.target.unwrap().pos;
        on_hit(state, at_ms, pos);
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = GameState::new(42);
        assert_eq!(state.phase, Phase::Idle);

        start(&mut state);
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.level, 1);
        assert_eq!(state.session.combo, 1);
        assert_eq!(state.session.last_hit_ms, None);
        assert_eq!(state.timer.budget_ms, 1300);
        assert_eq!(state.timer.remaining_ms, 1300);
        assert!(state.target.is_some());
    }

    #[test]
    fn test_quick_hits_chain_combo() {
        let mut state = active_state(42);

        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 0.0);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.combo, 1);

        // 200ms later, inside the 800ms window
        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 200.0);
        assert_eq!(state.session.combo, 2);
        assert_eq!(state.session.score, 3);
    }

    #[test]
    fn test_combo_resets_outside_window() {
        let mut state = active_state(42);

        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 0.0);
        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 300.0);
        assert_eq!(state.session.combo, 2);

        // Exactly the window is already too slow
        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 300.0 + COMBO_WINDOW_MS);
        assert_eq!(state.session.combo, 1);
    }

    #[test]
    fn test_bonus_scores_triple() {
        let mut state = active_state(7);
        force_kind(&mut state, TargetKind::Bonus);
        tap(&mut state, 0.0);
        assert_eq!(state.session.score, 3);
    }

    #[test]
    fn test_bomb_ends_session_without_scoring() {
        let mut state = active_state(7);
        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 0.0);

        force_kind(&mut state, TargetKind::Bomb);
        tap(&mut state, 100.0);
        assert_eq!(state.phase, Phase::Terminal(EndReason::Bomb));
        assert_eq!(state.session.score, 1);
        assert!(state.target.is_none());
    }

    #[test]
    fn test_freeze_scores_one_and_countdown_restarts() {
        let mut state = active_state(7);
        advance(&mut state, 400.0);

        force_kind(&mut state, TargetKind::Freeze);
        tap(&mut state, 0.0);
        assert_eq!(state.session.score, 1);
        // The next target always starts from the full budget
        assert_eq!(state.timer.remaining_ms, state.timer.budget_ms);
    }

    #[test]
    fn test_level_up_at_ten_points() {
        let mut state = active_state(42);
        state.session.score = 9;

        force_kind(&mut state, TargetKind::Normal);
        tap(&mut state, 0.0);
        assert_eq!(state.session.score, 10);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.timer.budget_ms, 1200);
        assert_eq!(state.timer.remaining_ms, 1200);
        assert_eq!(state.target.unwrap().size, 76.0);
    }

    #[test]
    fn test_timeout_terminates_and_freezes_state() {
        let mut state = active_state(42);
        advance(&mut state, 1300.0 + TICK_MS as f64);
        assert_eq!(state.phase, Phase::Terminal(EndReason::Timeout));
        assert!(!state.is_active());

        // Nothing mutates a terminal session
        let snapshot = state.session;
        advance(&mut state, 1000.0);
        on_hit(&mut state, 0.0, Vec2::ZERO);
        assert_eq!(state.session, snapshot);
        assert_eq!(state.phase, Phase::Terminal(EndReason::Timeout));
    }

    #[test]
    fn test_hits_ignored_while_idle() {
        let mut state = GameState::new(42);
        on_hit(&mut state, 0.0, Vec2::new(10.0, 10.0));
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_accumulator_steps_fixed_quanta() {
        let mut state = active_state(42);
        // 40ms = two whole ticks, 8ms carried over
        advance(&mut state, 40.0);
        assert_eq!(state.timer.remaining_ms, 1300 - 2 * TICK_MS);
        advance(&mut state, 8.0);
        assert_eq!(state.timer.remaining_ms, 1300 - 3 * TICK_MS);
    }

    #[test]
    fn test_kind_draw_thresholds() {
        assert_eq!(pick_target_kind(0.0), TargetKind::Normal);
        assert_eq!(pick_target_kind(0.649), TargetKind::Normal);
        assert_eq!(pick_target_kind(0.65), TargetKind::Bonus);
        assert_eq!(pick_target_kind(0.799), TargetKind::Bonus);
        assert_eq!(pick_target_kind(0.80), TargetKind::Freeze);
        assert_eq!(pick_target_kind(0.919), TargetKind::Freeze);
        assert_eq!(pick_target_kind(0.92), TargetKind::Bomb);
        assert_eq!(pick_target_kind(0.999), TargetKind::Bomb);
    }

    #[test]
    fn test_kind_draw_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            let idx = match pick_target_kind(rng.random::<f32>()) {
                TargetKind::Normal => 0,
                TargetKind::Bonus => 1,
                TargetKind::Freeze => 2,
                TargetKind::Bomb => 3,
            };
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
        // Bombs stay the rare draw
        assert!(counts[3] < counts[0]);
        assert!((400..1600).contains(&counts[3]));
    }

    #[test]
    fn test_spawns_stay_in_bounds() {
        let mut state = active_state(99);
        state.set_playfield(320.0, 480.0);
        for _ in 0..200 {
            spawn_target(&mut state);
            let t = state.target.unwrap();
            assert!(t.pos.x >= 0.0);
            assert!(t.pos.x <= state.playfield.width - t.size);
            assert!(t.pos.y >= HUD_TOP_INSET);
            assert!(t.pos.y <= state.playfield.height - t.size);
        }
    }

    #[test]
    fn test_determinism() {
        // Same seed and same script produce the same command stream
        let mut a = GameState::new(555);
        let mut b = GameState::new(555);
        for state in [&mut a, &mut b] {
            start(state);
            advance(state, 100.0);
            let pos = state.target.unwrap().pos;
            on_hit(state, 50.0, pos);
            advance(state, 64.0);
        }
        assert_eq!(a.drain_commands(), b.drain_commands());
        assert_eq!(a.session, b.session);
        assert_eq!(a.target.map(|t| t.kind), b.target.map(|t| t.kind));
    }
}
