//! End-to-end scenarios for the clock engine: commands go through the
//! decider, events are folded with the reducer, exactly as the controller
//! does it.

use proptest::prelude::*;

use timebank::game::reduce::{apply_all, replay};
use timebank::{
    Command, CommandError, Decider, EditOp, GameEvent, GameSetup, GameState, Mode, OrderDir, PlayerConfig, Rules,
    TurnPhase,
};

const PASSWORD: &str = "secret";

struct Table {
    decider: Decider,
    state: GameState,
    history: Vec<GameEvent>,
}

impl Table {
    fn new() -> Self {
        Self {
            decider: Decider::new(PASSWORD),
            state: GameState::new(),
            history: Vec::new(),
        }
    }

    fn started(names: &[&str], dir: OrderDir, rules: Rules) -> Self {
        let mut table = Self::new();
        table.send(Command::start_game(0.0, setup(names, dir, rules))).unwrap();
        table
    }

    fn send(&mut self, command: Command) -> Result<Vec<GameEvent>, CommandError> {
        let events = self.decider.decide(&self.state, &command)?;
        apply_all(&mut self.state, &events);
        self.history.extend(events.iter().cloned());
        Ok(events)
    }

    fn bank(&self, name: &str) -> f64 {
        self.state.bank[name]
    }

    fn current(&self) -> Option<&str> {
        self.state.current_player.as_deref()
    }
}

fn setup(names: &[&str], dir: OrderDir, rules: Rules) -> GameSetup {
    GameSetup {
        game_id: "g1".into(),
        players: names.iter().map(|n| PlayerConfig::new(*n)).collect(),
        order: names.iter().map(|n| n.to_string()).collect(),
        order_dir: dir,
        rules,
    }
}

fn types(events: &[GameEvent]) -> Vec<&'static str> {
    events.iter().map(GameEvent::event_type).collect()
}

fn warn_numbers(events: &[GameEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::WarnLongTurn { warn_no, .. } => Some(*warn_no),
            _ => None,
        })
        .collect()
}

#[test]
fn test_start_game_banks_and_first_turn() {
    let mut table = Table::new();
    let rules = Rules::new(100.0, 5.0, 10);
    let events = table
        .send(Command::start_game(0.0, setup(&["C", "A", "B"], OrderDir::Clockwise, rules)))
        .unwrap();

    assert_eq!(types(&events), ["GAME_START", "TURN_START"]);
    assert_eq!(events[1], GameEvent::turn_start("C", 0.0));
    assert_eq!(table.state.mode, Mode::Running);
    assert_eq!(table.state.turn.phase, TurnPhase::Cooldown);
    for name in ["A", "B", "C"] {
        assert_eq!(table.bank(name), 100.0);
    }
}

#[test]
fn test_worked_example_tick_then_tap() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 10));
    assert_eq!(table.current(), Some("A"));

    let events = table.send(Command::tick(27.0)).unwrap();
    assert_eq!(
        types(&events),
        ["COOLDOWN_END", "WARN_LONG_TURN", "WARN_LONG_TURN", "RUNTIME_SYNC"]
    );
    assert_eq!(warn_numbers(&events), [1, 2]);
    assert_eq!(table.state.turn.phase, TurnPhase::Countdown);
    assert_eq!(table.state.turn.elapsed_no_cooldown, 22.0);
    assert_eq!(table.bank("A"), 78.0);

    let events = table.send(Command::tap(27.0)).unwrap();
    assert_eq!(types(&events), ["TURN_END", "TURN_START"]);
    assert_eq!(events[0], GameEvent::turn_end("A", 78.0, 22.0, 27.0));
    assert_eq!(events[1], GameEvent::turn_start("B", 27.0));
    assert_eq!(table.bank("A"), 78.0);
    assert_eq!(table.current(), Some("B"));
}

#[test]
fn test_tap_without_tick_charges_countdown_only() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 60));

    let events = table.send(Command::tap(12.5)).unwrap();
    assert_eq!(types(&events), ["COOLDOWN_END", "RUNTIME_SYNC", "TURN_END", "TURN_START"]);
    assert_eq!(table.bank("A"), 92.5);
    assert_eq!(table.state.last_turn_end.as_ref().map(|r| r.spent_no_cooldown), Some(7.5));
}

#[test]
fn test_tap_inside_cooldown_is_free() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 10));
    let events = table.send(Command::tap(4.9)).unwrap();

    assert_eq!(types(&events), ["TURN_END", "TURN_START"]);
    assert_eq!(table.bank("A"), 100.0);
}

#[test]
fn test_counterclockwise_rotation() {
    let mut table = Table::started(&["A", "B", "C"], OrderDir::CounterClockwise, Rules::new(100.0, 1.0, 10));
    table.send(Command::tap(0.5)).unwrap();
    assert_eq!(table.current(), Some("C"));
    table.send(Command::tap(1.0)).unwrap();
    assert_eq!(table.current(), Some("B"));
}

#[test]
fn test_pause_freezes_the_clock() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 60));
    table.send(Command::tick(10.0)).unwrap();
    assert_eq!(table.bank("A"), 95.0);

    let events = table.send(Command::background(11.0)).unwrap();
    assert_eq!(types(&events), ["RUNTIME_SYNC", "TECH_PAUSE_ON"]);
    assert_eq!(table.state.mode, Mode::TechPause);

    assert!(table.send(Command::tick(500.0)).unwrap().is_empty());
    assert_eq!(table.send(Command::tap(500.0)).unwrap_err(), CommandError::NotRunning);

    let events = table.send(Command::resume(600.0)).unwrap();
    assert_eq!(types(&events), ["TECH_PAUSE_OFF"]);

    table.send(Command::tick(602.0)).unwrap();
    assert_eq!(table.bank("A"), 92.0);
}

#[test]
fn test_pause_on_in_setup_is_noop() {
    let mut table = Table::new();
    assert!(table.send(Command::pause_on(1.0, "manual")).unwrap().is_empty());
    assert!(table.send(Command::background(1.0)).unwrap().is_empty());
    assert_eq!(table.state.mode, Mode::Setup);
}

#[test]
fn test_pause_on_while_running_always_pauses() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::default());
    let events = table.send(Command::pause_on(0.0, "manual")).unwrap();
    assert_eq!(types(&events), ["TECH_PAUSE_ON"]);
}

#[test]
fn test_wrong_password_keeps_edits_locked() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::default());

    let events = table.send(Command::admin_auth(1.0, "guess")).unwrap();
    assert_eq!(events, [GameEvent::AdminAuthFail]);
    assert!(!table.state.admin_mode);

    let before = table.state.clone();
    let err = table.send(Command::admin_edit(2.0, EditOp::Reverse)).unwrap_err();
    assert_eq!(err, CommandError::AdminRequired);
    assert_eq!(table.state, before);
}

#[test]
fn test_setup_edits_need_no_admin() {
    let mut table = Table::new();
    let events = table.send(Command::admin_edit(0.0, EditOp::Reverse)).unwrap();
    assert_eq!(types(&events), ["SETUP_EDIT"]);
    assert_eq!(table.state.order_dir, OrderDir::CounterClockwise);
}

#[test]
fn test_undo_is_single_level() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 10));
    table.send(Command::tap(20.0)).unwrap();
    assert_eq!(table.bank("A"), 85.0);

    table.send(Command::admin_auth(20.0, PASSWORD)).unwrap();
    table.send(Command::admin_edit(20.0, EditOp::Undo)).unwrap();
    assert_eq!(table.current(), Some("A"));
    assert_eq!(table.state.turn.phase, TurnPhase::Countdown);
    assert_eq!(table.state.turn.elapsed_no_cooldown, 15.0);
    assert_eq!(table.state.turn.warn_count, 1);

    let after_first = table.state.clone();
    let events = table.send(Command::admin_edit(20.0, EditOp::Undo)).unwrap();
    assert_eq!(types(&events), ["ADMIN_EDIT"]);
    assert_eq!(table.state, after_first);
}

#[test]
fn test_admin_edit_charges_time_first() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 5.0, 60));
    table.send(Command::admin_auth(0.0, PASSWORD)).unwrap();

    let events = table
        .send(Command::admin_edit(
            10.0,
            EditOp::SetBank {
                player: "A".into(),
                value: 50.0,
            },
        ))
        .unwrap();
    assert_eq!(types(&events), ["COOLDOWN_END", "RUNTIME_SYNC", "ADMIN_EDIT"]);
    assert_eq!(table.bank("A"), 50.0);
}

#[test]
fn test_new_game_resets_banks() {
    let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(100.0, 1.0, 60));
    table.send(Command::tap(30.0)).unwrap();
    table.send(Command::admin_auth(31.0, PASSWORD)).unwrap();
    table
        .send(Command::admin_edit(31.0, EditOp::NewGame { game_id: "g2".into() }))
        .unwrap();

    assert_eq!(table.state.game_id, "g2");
    assert_eq!(table.current(), Some("A"));
    assert_eq!(table.bank("A"), 100.0);
    assert_eq!(table.bank("B"), 100.0);
    assert_eq!(table.state.turn.phase, TurnPhase::Cooldown);
}

#[test]
fn test_replay_matches_live_state() {
    let mut table = Table::started(&["A", "B", "C"], OrderDir::Clockwise, Rules::new(300.0, 3.0, 7));
    table.send(Command::tick(9.0)).unwrap();
    table.send(Command::tap(14.0)).unwrap();
    table.send(Command::pause_on(20.0, "snack")).unwrap();
    table.send(Command::pause_off(80.0)).unwrap();
    table.send(Command::admin_auth(81.0, PASSWORD)).unwrap();
    table
        .send(Command::admin_edit(82.0, EditOp::RemovePlayer { player: "B".into() }))
        .unwrap();
    table.send(Command::admin_mode_off(83.0)).unwrap();
    table.send(Command::tap(100.0)).unwrap();

    let replayed = replay(GameState::new(), &table.history);
    assert_eq!(replayed, table.state);
    assert_eq!(replayed.compute_hash(), table.state.compute_hash());
}

proptest! {
    #[test]
    fn prop_one_warning_per_crossed_multiple(warn_every in 1u32..60, gap in 0u32..600) {
        let cooldown = 5.0;
        let mut table = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(10_000.0, cooldown, warn_every));

        let events = table.send(Command::tick(cooldown + gap as f64)).unwrap();
        let numbers = warn_numbers(&events);
        let expected: Vec<u32> = (1..=gap / warn_every).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn prop_split_gaps_warn_like_one_gap(warn_every in 1u32..30, first in 0u32..200, second in 0u32..200) {
        let mut split = Table::started(&["A", "B"], OrderDir::Clockwise, Rules::new(10_000.0, 0.0, warn_every));
        let mut numbers = warn_numbers(&split.send(Command::tick(first as f64)).unwrap());
        numbers.extend(warn_numbers(&split.send(Command::tick((first + second) as f64)).unwrap()));

        let expected: Vec<u32> = (1..=(first + second) / warn_every).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert_eq!(split.state.turn.warn_count, (first + second) / warn_every);
    }

    #[test]
    fn prop_remove_current_player_keeps_valid_current(
        size in 2usize..7,
        turns in 0usize..10,
        victim in 0usize..7,
        counter_clockwise in any::<bool>(),
    ) {
        let names: Vec<String> = (0..size).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = if counter_clockwise { OrderDir::CounterClockwise } else { OrderDir::Clockwise };
        let mut table = Table::started(&refs, dir, Rules::new(100.0, 1.0, 10));

        for t in 0..turns {
            table.send(Command::tap(t as f64 + 0.5)).unwrap();
        }
        let target = if victim < size {
            names[victim].clone()
        } else {
            table.current().unwrap_or_default().to_string()
        };

        table.send(Command::admin_auth(50.0, PASSWORD)).unwrap();
        table.send(Command::admin_edit(50.0, EditOp::RemovePlayer { player: target.clone() })).unwrap();

        prop_assert!(!table.state.order.contains(&target));
        prop_assert!(!table.state.bank.contains_key(&target));
        match table.current() {
            Some(current) => prop_assert!(table.state.order.iter().any(|n| n == current)),
            None => prop_assert!(table.state.order.is_empty()),
        }
        prop_assert!(table.send(Command::tap(60.0)).is_ok());
    }
}
