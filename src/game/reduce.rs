//! Event Reduction
//!
//! Folds events into the state. Total over every event type and free of
//! side effects: replaying the same history always rebuilds the same state.

use crate::game::events::GameEvent;
use crate::game::state::{GameState, Mode, TurnPhase};

/// Apply one event to `state`.
pub fn apply_event(state: &mut GameState, event: &GameEvent) {
    match event {
        GameEvent::GameStart {
            game_id,
            players,
            order,
            order_dir,
            rules,
            ..
        } => {
            state.game_id = game_id.clone();
            state.mode = Mode::Running;
            state.game_started = true;
            state.players = players.clone();
            state.order = order.clone();
            state.order_dir = *order_dir;
            state.rules = rules.clone();
            state.reset_banks();
        }

        GameEvent::TurnStart { player, phase, now_mono } => {
            state.current_player = Some(player.clone());
            state.turn.phase = *phase;
            state.turn.turn_started_mono = *now_mono;
            state.turn.phase_started_mono = *now_mono;
            state.turn.elapsed_no_cooldown = 0.0;
            state.turn.warn_count = 0;
        }

        GameEvent::CooldownEnd { .. } => {
            state.turn.phase = TurnPhase::Countdown;
        }

        GameEvent::TurnEnd(record) => {
            state.bank.insert(record.player.clone(), record.bank_after);
            state.last_turn_end = Some(record.clone());
        }

        GameEvent::RuntimeSync {
            player,
            bank_after,
            phase,
            phase_started_mono,
            elapsed_no_cooldown,
            warn_count,
            ..
        } => {
            state.bank.insert(player.clone(), *bank_after);
            state.turn.phase = *phase;
            state.turn.phase_started_mono = *phase_started_mono;
            state.turn.elapsed_no_cooldown = *elapsed_no_cooldown;
            state.turn.warn_count = *warn_count;
        }

        GameEvent::TechPauseOn { .. } => {
            state.mode = Mode::TechPause;
        }

        GameEvent::TechPauseOff { now_mono, .. } => {
            state.mode = Mode::Running;
            // Paused span is not charged
            state.turn.phase_started_mono = *now_mono;
        }

        GameEvent::AdminAuthOk => state.admin_mode = true,

        GameEvent::AdminAuthFail | GameEvent::AdminModeOff => state.admin_mode = false,

        GameEvent::SetupEdit(edit) | GameEvent::AdminEdit(edit) => edit.apply(state),

        // Notification only
        GameEvent::WarnLongTurn { .. } => {}
    }
}

/// Apply events in order.
pub fn apply_all<'a>(state: &mut GameState, events: impl IntoIterator<Item = &'a GameEvent>) {
    for event in events {
        apply_event(state, event);
    }
}

/// Rebuild a state by folding a recorded history over `initial`.
pub fn replay<'a>(initial: GameState, events: impl IntoIterator<Item = &'a GameEvent>) -> GameState {
    let mut state = initial;
    apply_all(&mut state, events);
    state
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::edit::EditOp;
    use crate::game::state::{OrderDir, PlayerConfig, Rules};

    fn game_start() -> GameEvent {
        GameEvent::GameStart {
            game_id: "g1".into(),
            players: vec![PlayerConfig::new("A"), PlayerConfig::new("B")],
            order: vec!["B".into(), "A".into()],
            order_dir: OrderDir::CounterClockwise,
            rules: Rules::new(100.0, 5.0, 10),
            now_mono: 0.0,
        }
    }

    #[test]
    fn test_game_start_initializes_banks() {
        let mut state = GameState::new();
        state.bank.insert("old".into(), 3.0);
        apply_event(&mut state, &game_start());

        assert_eq!(state.mode, Mode::Running);
        assert!(state.game_started);
        assert_eq!(state.game_id, "g1");
        assert_eq!(state.order_dir, OrderDir::CounterClockwise);
        assert_eq!(state.bank.len(), 2);
        assert_eq!(state.bank["A"], 100.0);
        assert_eq!(state.bank["B"], 100.0);
    }

    #[test]
    fn test_turn_start_resets_runtime() {
        let mut state = GameState::new();
        apply_event(&mut state, &game_start());
        state.turn.elapsed_no_cooldown = 9.0;
        state.turn.warn_count = 4;

        apply_event(&mut state, &GameEvent::turn_start("A", 12.0));
        assert_eq!(state.current_player.as_deref(), Some("A"));
        assert_eq!(state.turn.phase, TurnPhase::Cooldown);
        assert_eq!(state.turn.turn_started_mono, 12.0);
        assert_eq!(state.turn.phase_started_mono, 12.0);
        assert_eq!(state.turn.elapsed_no_cooldown, 0.0);
        assert_eq!(state.turn.warn_count, 0);
    }

    #[test]
    fn test_turn_end_records_snapshot() {
        let mut state = GameState::new();
        apply_event(&mut state, &game_start());
        let event = GameEvent::turn_end("A", 80.0, 20.0, 25.0);
        apply_event(&mut state, &event);

        assert_eq!(state.bank["A"], 80.0);
        assert_eq!(GameEvent::TurnEnd(state.last_turn_end.clone().unwrap()), event);
    }

    #[test]
    fn test_runtime_sync_overwrites_runtime() {
        let mut state = GameState::new();
        apply_event(&mut state, &game_start());
        apply_event(&mut state, &GameEvent::turn_start("B", 0.0));
        apply_event(
            &mut state,
            &GameEvent::RuntimeSync {
                player: "B".into(),
                bank_after: 70.0,
                phase: TurnPhase::Countdown,
                phase_started_mono: 35.0,
                elapsed_no_cooldown: 30.0,
                warn_count: 3,
                now_mono: 35.0,
            },
        );

        assert_eq!(state.bank["B"], 70.0);
        assert_eq!(state.turn.phase, TurnPhase::Countdown);
        assert_eq!(state.turn.phase_started_mono, 35.0);
        assert_eq!(state.turn.elapsed_no_cooldown, 30.0);
        assert_eq!(state.turn.warn_count, 3);
    }

    #[test]
    fn test_pause_cycle_rebases_phase() {
        let mut state = GameState::new();
        apply_event(&mut state, &game_start());
        apply_event(&mut state, &GameEvent::TechPauseOn { cause: "manual".into(), now_mono: 3.0 });
        assert_eq!(state.mode, Mode::TechPause);

        apply_event(&mut state, &GameEvent::TechPauseOff { cause: "continue".into(), now_mono: 90.0 });
        assert_eq!(state.mode, Mode::Running);
        assert_eq!(state.turn.phase_started_mono, 90.0);
    }

    #[test]
    fn test_admin_flags() {
        let mut state = GameState::new();
        apply_event(&mut state, &GameEvent::AdminAuthOk);
        assert!(state.admin_mode);
        apply_event(&mut state, &GameEvent::AdminModeOff);
        assert!(!state.admin_mode);
        apply_event(&mut state, &GameEvent::AdminAuthOk);
        apply_event(&mut state, &GameEvent::AdminAuthFail);
        assert!(!state.admin_mode);
    }

    #[test]
    fn test_warn_event_is_notification_only() {
        let mut state = GameState::new();
        apply_event(&mut state, &game_start());
        let before = state.clone();
        apply_event(
            &mut state,
            &GameEvent::WarnLongTurn { player: "A".into(), warn_no: 1, elapsed_no_cooldown: 10.0 },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_setup_and_admin_edits_share_semantics() {
        let mut via_setup = GameState::new();
        apply_event(&mut via_setup, &game_start());
        let mut via_admin = via_setup.clone();

        apply_event(&mut via_setup, &GameEvent::SetupEdit(EditOp::Reverse));
        apply_event(&mut via_admin, &GameEvent::AdminEdit(EditOp::Reverse));
        assert_eq!(via_setup, via_admin);
    }

    #[test]
    fn test_replay_matches_incremental_fold() {
        let history = vec![
            game_start(),
            GameEvent::turn_start("B", 0.0),
            GameEvent::turn_end("B", 91.0, 9.0, 14.0),
            GameEvent::turn_start("A", 14.0),
        ];
        let replayed = replay(GameState::new(), &history);

        let mut incremental = GameState::new();
        for event in &history {
            apply_event(&mut incremental, event);
        }
        assert_eq!(replayed.compute_hash(), incremental.compute_hash());
        assert_eq!(replayed.current_player.as_deref(), Some("A"));
    }
}
