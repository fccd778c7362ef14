//! Game Events
//!
//! Facts produced by the decider and folded into the state by the reducer.
//! Each event is created once, applied once, and is immutable history after.

use serde::{Serialize, Deserialize};

use crate::game::edit::EditOp;
use crate::game::state::{OrderDir, PlayerConfig, Rules, Seconds, TurnPhase};

/// Snapshot of a finished turn, kept on the state for undo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnEndRecord {
    /// Player whose turn ended
    pub player: String,
    /// Bank after charging the turn
    pub bank_after: Seconds,
    /// Countdown seconds charged during the turn
    pub spent_no_cooldown: Seconds,
    /// When the turn ended
    pub now_mono: Seconds,
}

/// Game event.
///
/// Serialized adjacently tagged so the sink can write the tag and the
/// payload fields separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    /// A game started with a full configuration snapshot
    GameStart {
        /// Game identifier
        game_id: String,
        /// Roster
        players: Vec<PlayerConfig>,
        /// Turn order
        order: Vec<String>,
        /// Rotation direction
        order_dir: OrderDir,
        /// Rules for the game
        rules: Rules,
        /// Monotonic time of the event
        now_mono: Seconds,
    },

    /// A player's turn started
    TurnStart {
        /// Player concerned
        player: String,
        /// Phase the turn is in
        phase: TurnPhase,
        /// Monotonic time of the event
        now_mono: Seconds,
    },

    /// Grace period ran out; the bank starts draining
    CooldownEnd {
        /// Player concerned
        player: String,
    },

    /// Turn crossed another multiple of `warn_every`
    WarnLongTurn {
        /// Player concerned
        player: String,
        /// Warning number within the turn, from 1
        warn_no: u32,
        /// Countdown seconds charged so far
        elapsed_no_cooldown: Seconds,
    },

    /// Time-derived runtime values caught up to `now_mono`
    RuntimeSync {
        /// Player concerned
        player: String,
        /// Bank after charging
        bank_after: Seconds,
        /// Phase the turn is in
        phase: TurnPhase,
        /// Reference point of the phase
        phase_started_mono: Seconds,
        /// Countdown seconds charged so far
        elapsed_no_cooldown: Seconds,
        /// Warnings emitted this turn
        warn_count: u32,
        /// Monotonic time of the event
        now_mono: Seconds,
    },

    /// A player's turn ended
    TurnEnd(TurnEndRecord),

    /// Clock frozen
    TechPauseOn {
        /// Why the pause changed
        cause: String,
        /// Monotonic time of the event
        now_mono: Seconds,
    },

    /// Clock resumed; the paused span is not charged
    TechPauseOff {
        /// Why the pause changed
        cause: String,
        /// Monotonic time of the event
        now_mono: Seconds,
    },

    /// Admin password accepted
    AdminAuthOk,

    /// Admin password rejected
    AdminAuthFail,

    /// Admin mode left
    AdminModeOff,

    /// Configuration edit before the first game
    SetupEdit(EditOp),

    /// Privileged edit during a game
    AdminEdit(EditOp),
}

impl GameEvent {
    /// Wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameStart { .. } => "GAME_START",
            GameEvent::TurnStart { .. } => "TURN_START",
            GameEvent::CooldownEnd { .. } => "COOLDOWN_END",
            GameEvent::WarnLongTurn { .. } => "WARN_LONG_TURN",
            GameEvent::RuntimeSync { .. } => "RUNTIME_SYNC",
            GameEvent::TurnEnd(_) => "TURN_END",
            GameEvent::TechPauseOn { .. } => "TECH_PAUSE_ON",
            GameEvent::TechPauseOff { .. } => "TECH_PAUSE_OFF",
            GameEvent::AdminAuthOk => "ADMIN_AUTH_OK",
            GameEvent::AdminAuthFail => "ADMIN_AUTH_FAIL",
            GameEvent::AdminModeOff => "ADMIN_MODE_OFF",
            GameEvent::SetupEdit(_) => "SETUP_EDIT",
            GameEvent::AdminEdit(_) => "ADMIN_EDIT",
        }
    }

    /// Player the event is about, if any.
    pub fn player(&self) -> Option<&str> {
        match self {
            GameEvent::TurnStart { player, .. }
            | GameEvent::CooldownEnd { player }
            | GameEvent::WarnLongTurn { player, .. }
            | GameEvent::RuntimeSync { player, .. } => Some(player),
            GameEvent::TurnEnd(record) => Some(&record.player),
            _ => None,
        }
    }

    /// Create turn start event.
    pub fn turn_start(player: impl Into<String>, now_mono: Seconds) -> Self {
        GameEvent::TurnStart {
            player: player.into(),
            phase: TurnPhase::Cooldown,
            now_mono,
        }
    }

    /// Create turn end event.
    pub fn turn_end(
        player: impl Into<String>,
        bank_after: Seconds,
        spent_no_cooldown: Seconds,
        now_mono: Seconds,
    ) -> Self {
        GameEvent::TurnEnd(TurnEndRecord {
            player: player.into(),
            bank_after,
            spent_no_cooldown,
            now_mono,
        })
    }
}
