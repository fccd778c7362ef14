//! Command Decision
//!
//! Turns `(state, command)` into the ordered list of events that the command
//! produces. All validation and every time-derived effect lives here.
//!
//! # Determinism
//!
//! `decide` is a pure function of the state, the command, and the admin
//! password. It never reads a clock: time only enters through
//! `Command::now_mono`, so any history can be replayed exactly.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::game::command::{Command, CommandKind, GameSetup};
use crate::game::edit::EditOp;
use crate::game::events::GameEvent;
use crate::game::state::{next_in_rotation, GameState, Mode, Seconds, TurnPhase};

/// Cause recorded when the app is backgrounded.
pub const CAUSE_BACKGROUND: &str = "background";

/// Cause recorded when the app returns to the foreground.
pub const CAUSE_RESUME: &str = "resume";

/// Cause recorded when a manual pause is lifted.
pub const CAUSE_CONTINUE: &str = "continue";

/// Reasons a command is rejected.
///
/// A rejected command emits no events and leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Two roster entries share a name.
    #[error("player names must be unique (duplicate: {0})")]
    DuplicatePlayerName(String),
    /// Order is not a permutation of the roster.
    #[error("order must include every player exactly once")]
    OrderMismatch,
    /// Roster is empty.
    #[error("at least one player is required")]
    NoPlayers,
    /// Tap outside a running game or without a current player.
    #[error("tap is available only in running mode")]
    NotRunning,
    /// Current player vanished from the order.
    #[error("current player {0} is not in the turn order")]
    CurrentPlayerNotInOrder(String),
    /// In-game edit without admin mode.
    #[error("admin mode is required")]
    AdminRequired,
}

impl CommandError {
    /// Human-readable reason, suitable for showing to the user.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Result of advancing a disposable copy of the state to `now`.
#[derive(Debug)]
pub struct Projection {
    /// State advanced to `now` (never committed directly)
    pub shadow: GameState,
    /// Time-derived events, followed by a runtime sync if anything moved
    pub events: Vec<GameEvent>,
}

/// Advance a disposable copy of `state` to `now` and describe the change.
pub fn project(state: &GameState, now: Seconds) -> Projection {
    let mut shadow = state.clone();
    let mut events = advance_runtime(&mut shadow, now);
    if let Some(sync) = runtime_sync(state, &shadow, now) {
        events.push(sync);
    }
    Projection { shadow, events }
}

/// Advance the running turn in `shadow` to `now`.
///
/// Ends the cooldown if it has run out (rebasing the phase start by exactly
/// `cooldown`, so fractional time is not lost), then charges the countdown
/// and emits one warning per newly crossed multiple of `warn_every`.
pub fn advance_runtime(shadow: &mut GameState, now: Seconds) -> Vec<GameEvent> {
    if shadow.mode != Mode::Running {
        return Vec::new();
    }
    let Some(player) = shadow.current_player.clone() else {
        return Vec::new();
    };

    let mut events = Vec::new();
    let mut elapsed = (now - shadow.turn.phase_started_mono).max(0.0);

    if shadow.turn.phase == TurnPhase::Cooldown && elapsed >= shadow.rules.cooldown {
        shadow.turn.phase = TurnPhase::Countdown;
        shadow.turn.phase_started_mono += shadow.rules.cooldown;
        events.push(GameEvent::CooldownEnd { player: player.clone() });
        elapsed = (now - shadow.turn.phase_started_mono).max(0.0);
    }

    if shadow.turn.phase == TurnPhase::Countdown {
        let bank = shadow.bank.entry(player.clone()).or_insert(shadow.rules.bank_initial);
        *bank -= elapsed;
        shadow.turn.elapsed_no_cooldown += elapsed;
        shadow.turn.phase_started_mono = now;

        let due = shadow.rules.warnings_due(shadow.turn.elapsed_no_cooldown);
        let interval = shadow.rules.warn_interval();
        while shadow.turn.warn_count < due {
            shadow.turn.warn_count += 1;
            events.push(GameEvent::WarnLongTurn {
                player: player.clone(),
                warn_no: shadow.turn.warn_count,
                elapsed_no_cooldown: shadow.turn.warn_count as Seconds * interval,
            });
        }
    }

    events
}

/// Build a `RUNTIME_SYNC` if the shadow's runtime differs from `state`.
fn runtime_sync(state: &GameState, shadow: &GameState, now: Seconds) -> Option<GameEvent> {
    if state.mode != Mode::Running {
        return None;
    }
    let player = state.current_player.as_ref()?;

    let bank_before = state.bank.get(player).copied();
    let bank_after = shadow.bank.get(player).copied();
    let (old, new) = (&state.turn, &shadow.turn);
    let unchanged = bank_before == bank_after
        && old.phase == new.phase
        && old.phase_started_mono == new.phase_started_mono
        && old.elapsed_no_cooldown == new.elapsed_no_cooldown
        && old.warn_count == new.warn_count;
    if unchanged {
        return None;
    }

    Some(GameEvent::RuntimeSync {
        player: player.clone(),
        bank_after: bank_after.unwrap_or(shadow.rules.bank_initial),
        phase: new.phase,
        phase_started_mono: new.phase_started_mono,
        elapsed_no_cooldown: new.elapsed_no_cooldown,
        warn_count: new.warn_count,
        now_mono: now,
    })
}

/// The command interpreter.
#[derive(Clone)]
pub struct Decider {
    admin_password: String,
}

impl std::fmt::Debug for Decider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decider").finish_non_exhaustive()
    }
}

impl Decider {
    /// Create a decider that accepts `admin_password` for admin mode.
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
        }
    }

    /// Decide which events `command` produces against `state`.
    ///
    /// Time-derived events come first, then the command's own events.
    /// `state` is only read; callers fold the result with `apply_event`.
    pub fn decide(&self, state: &GameState, command: &Command) -> Result<Vec<GameEvent>, CommandError> {
        let now = command.now_mono;
        let Projection { shadow, events: mut pre } = project(state, now);

        match &command.kind {
            CommandKind::StartGame(setup) => decide_start(setup, now),

            CommandKind::Tap => {
                let tail = decide_tap(&shadow, now)?;
                pre.extend(tail);
                Ok(pre)
            }

            CommandKind::Tick => Ok(pre),

            CommandKind::PauseOn { cause } => Ok(pause_on(state, pre, cause, now)),
            CommandKind::Background => Ok(pause_on(state, pre, CAUSE_BACKGROUND, now)),

            CommandKind::PauseOff => Ok(pause_off(state, pre, CAUSE_CONTINUE, now)),
            CommandKind::Resume => Ok(pause_off(state, pre, CAUSE_RESUME, now)),

            CommandKind::AdminAuth { password } => {
                pre.push(if *password == self.admin_password {
                    GameEvent::AdminAuthOk
                } else {
                    GameEvent::AdminAuthFail
                });
                Ok(pre)
            }

            CommandKind::AdminModeOff => {
                if state.admin_mode {
                    pre.push(GameEvent::AdminModeOff);
                }
                Ok(pre)
            }

            CommandKind::AdminEdit { edit } => decide_edit(state, pre, edit),
        }
    }
}

fn decide_start(setup: &GameSetup, now: Seconds) -> Result<Vec<GameEvent>, CommandError> {
    let mut names = BTreeSet::new();
    for player in &setup.players {
        if !names.insert(player.name.as_str()) {
            return Err(CommandError::DuplicatePlayerName(player.name.clone()));
        }
    }

    let ordered: BTreeSet<&str> = setup.order.iter().map(String::as_str).collect();
    if ordered != names || setup.order.len() != names.len() {
        return Err(CommandError::OrderMismatch);
    }
    let first = setup.order.first().ok_or(CommandError::NoPlayers)?;

    Ok(vec![
        GameEvent::GameStart {
            game_id: setup.game_id.clone(),
            players: setup.players.clone(),
            order: setup.order.clone(),
            order_dir: setup.order_dir,
            rules: setup.rules.clone(),
            now_mono: now,
        },
        GameEvent::turn_start(first.clone(), now),
    ])
}

fn decide_tap(shadow: &GameState, now: Seconds) -> Result<Vec<GameEvent>, CommandError> {
    if shadow.mode != Mode::Running {
        return Err(CommandError::NotRunning);
    }
    let current = shadow.current_player.as_deref().ok_or(CommandError::NotRunning)?;
    let next = next_in_rotation(&shadow.order, current, shadow.order_dir)
        .ok_or_else(|| CommandError::CurrentPlayerNotInOrder(current.to_string()))?;

    let bank_after = shadow
        .bank
        .get(current)
        .copied()
        .unwrap_or(shadow.rules.bank_initial);

    Ok(vec![
        GameEvent::turn_end(current, bank_after, shadow.turn.elapsed_no_cooldown, now),
        GameEvent::turn_start(next, now),
    ])
}

fn pause_on(state: &GameState, mut pre: Vec<GameEvent>, cause: &str, now: Seconds) -> Vec<GameEvent> {
    if state.mode == Mode::Running {
        pre.push(GameEvent::TechPauseOn {
            cause: cause.to_string(),
            now_mono: now,
        });
    }
    pre
}

fn pause_off(state: &GameState, mut pre: Vec<GameEvent>, cause: &str, now: Seconds) -> Vec<GameEvent> {
    if state.mode == Mode::TechPause {
        pre.push(GameEvent::TechPauseOff {
            cause: cause.to_string(),
            now_mono: now,
        });
    }
    pre
}

fn decide_edit(
    state: &GameState,
    mut pre: Vec<GameEvent>,
    edit: &EditOp,
) -> Result<Vec<GameEvent>, CommandError> {
    if !state.game_started {
        return Ok(vec![GameEvent::SetupEdit(edit.clone())]);
    }
    if !state.admin_mode {
        return Err(CommandError::AdminRequired);
    }
    pre.push(GameEvent::AdminEdit(edit.clone()));
    Ok(pre)
}

// =============================================================================
// TESTS
// =============================================================================
