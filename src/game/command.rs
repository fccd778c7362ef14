//! Commands
//!
//! Requests submitted to the decider. Every command carries the monotonic
//! timestamp it was issued at; the engine never reads a clock itself.

use serde::{Serialize, Deserialize};

use crate::game::edit::EditOp;
use crate::game::state::{OrderDir, PlayerConfig, Rules, Seconds};

/// Configuration snapshot used to start a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSetup {
    /// New game identifier
    pub game_id: String,
    /// Roster
    pub players: Vec<PlayerConfig>,
    /// Turn order; must be a permutation of roster names
    pub order: Vec<String>,
    /// Rotation direction
    pub order_dir: OrderDir,
    /// Rules for this game
    pub rules: Rules,
}

/// What the command asks for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandKind {
    /// Start a game
    StartGame(GameSetup),
    /// Current player ends the turn
    Tap,
    /// Periodic catch-up of time-derived state
    Tick,
    /// Manual pause
    PauseOn {
        /// Reason shown and logged
        cause: String,
    },
    /// Leave a manual pause
    PauseOff,
    /// Enter admin mode
    AdminAuth {
        /// Candidate password
        password: String,
    },
    /// Leave admin mode
    AdminModeOff,
    /// Edit configuration (setup or admin)
    AdminEdit {
        /// Requested edit
        edit: EditOp,
    },
    /// App went to the background
    Background,
    /// App came back to the foreground
    Resume,
}

/// A command with the monotonic time it was issued at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Monotonic timestamp (seconds)
    pub now_mono: Seconds,
    /// Request
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl Command {
    /// Create a command.
    pub fn new(now_mono: Seconds, kind: CommandKind) -> Self {
        Self { now_mono, kind }
    }

    /// Create start game command.
    pub fn start_game(now_mono: Seconds, setup: GameSetup) -> Self {
        Self::new(now_mono, CommandKind::StartGame(setup))
    }

    /// Create tap command.
    pub fn tap(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::Tap)
    }

    /// Create tick command.
    pub fn tick(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::Tick)
    }

    /// Create manual pause command.
    pub fn pause_on(now_mono: Seconds, cause: impl Into<String>) -> Self {
        Self::new(now_mono, CommandKind::PauseOn { cause: cause.into() })
    }

    /// Create continue command.
    pub fn pause_off(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::PauseOff)
    }

    /// Create admin login command.
    pub fn admin_auth(now_mono: Seconds, password: impl Into<String>) -> Self {
        Self::new(now_mono, CommandKind::AdminAuth { password: password.into() })
    }

    /// Create admin logout command.
    pub fn admin_mode_off(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::AdminModeOff)
    }

    /// Create edit command.
    pub fn admin_edit(now_mono: Seconds, edit: EditOp) -> Self {
        Self::new(now_mono, CommandKind::AdminEdit { edit })
    }

    /// Create backgrounded command.
    pub fn background(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::Background)
    }

    /// Create foregrounded command.
    pub fn resume(now_mono: Seconds) -> Self {
        Self::new(now_mono, CommandKind::Resume)
    }

    /// Check if this is a tap.
    #[inline]
    pub fn is_tap(&self) -> bool {
        matches!(self.kind, CommandKind::Tap)
    }
}
