//! Game State Definitions
//!
//! The session aggregate and its sub-records.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::events::TurnEndRecord;

/// Seconds on the monotonic clock (or a duration measured on it).
pub type Seconds = f64;

// =============================================================================
// ENUMS
// =============================================================================

/// Session mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum Mode {
    /// Roster and rules are being configured
    #[default]
    Setup = 0,
    /// Clock is running
    Running = 1,
    /// Clock frozen without ending the turn
    TechPause = 2,
}

/// Phase of the active turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum TurnPhase {
    /// Grace period, nothing is charged
    #[default]
    Cooldown = 0,
    /// Elapsed time is charged to the active player
    Countdown = 1,
}

/// Direction of turn rotation through `order`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum OrderDir {
    /// Next player is the following entry
    #[default]
    #[serde(rename = "clockwise")]
    Clockwise = 0,
    /// Next player is the preceding entry
    #[serde(rename = "counterclockwise")]
    CounterClockwise = 1,
}

impl OrderDir {
    /// Opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            OrderDir::Clockwise => OrderDir::CounterClockwise,
            OrderDir::CounterClockwise => OrderDir::Clockwise,
        }
    }

    /// Index shift applied when passing the turn.
    #[inline]
    pub fn step(self) -> isize {
        match self {
            OrderDir::Clockwise => 1,
            OrderDir::CounterClockwise => -1,
        }
    }
}

/// Name of the player after `current` in rotation.
///
/// Returns `None` if `current` is not part of `order`.
pub fn next_in_rotation<'a>(order: &'a [String], current: &str, dir: OrderDir) -> Option<&'a str> {
    let index = order.iter().position(|name| name == current)?;
    let len = order.len() as isize;
    let next = (index as isize + dir.step()).rem_euclid(len);
    Some(order[next as usize].as_str())
}

// =============================================================================
// PLAYER CONFIG
// =============================================================================

fn default_color() -> String {
    "#FFFFFF".to_string()
}

/// Per-player presentation settings. `name` is the unique key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name, unique within the roster
    pub name: String,
    /// Background color shown during the player's turn
    #[serde(default = "default_color")]
    pub color: String,
    /// Sound played when the player ends a turn
    #[serde(default)]
    pub sound_tap: String,
    /// Per-player warning sound
    #[serde(default)]
    pub sound_warn: String,
}

impl PlayerConfig {
    /// Create a player with default color and no sounds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
            sound_tap: String::new(),
            sound_warn: String::new(),
        }
    }

    /// Builder-style tap sound.
    pub fn with_sound_tap(mut self, sound: impl Into<String>) -> Self {
        self.sound_tap = sound.into();
        self
    }

    /// Builder-style color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

// =============================================================================
// RULES
// =============================================================================

/// Game rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Starting bank for every player (seconds)
    pub bank_initial: Seconds,
    /// Grace period at the start of each turn (seconds)
    pub cooldown: Seconds,
    /// Long-turn warning interval (seconds)
    pub warn_every: u32,
    /// Sound played on each long-turn warning
    pub warn_sound: String,
    /// Blink rate with a full bank (presentation hint)
    pub blink_min_hz: f64,
    /// Blink rate with an empty bank (presentation hint)
    pub blink_max_hz: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            bank_initial: 600.0,
            cooldown: 5.0,
            warn_every: 60,
            warn_sound: String::new(),
            blink_min_hz: 1.0 / 60.0,
            blink_max_hz: 1.0,
        }
    }
}

impl Rules {
    /// Create rules with the three timing values and default hints.
    pub fn new(bank_initial: Seconds, cooldown: Seconds, warn_every: u32) -> Self {
        Self {
            bank_initial,
            cooldown,
            warn_every,
            ..Self::default()
        }
    }

    /// Warning interval, never shorter than one second.
    #[inline]
    pub fn warn_interval(&self) -> Seconds {
        self.warn_every.max(1) as Seconds
    }

    /// Number of warnings due after `elapsed` countdown seconds.
    #[inline]
    pub fn warnings_due(&self, elapsed: Seconds) -> u32 {
        (elapsed / self.warn_interval()).floor().max(0.0) as u32
    }

    /// Blink frequency for a player with `bank_left` seconds remaining.
    ///
    /// Interpolates from `blink_min_hz` at a full bank to `blink_max_hz`
    /// once the bank is exhausted.
    pub fn blink_hz(&self, bank_left: Seconds) -> f64 {
        let fraction = if self.bank_initial <= 0.0 {
            0.0
        } else {
            1.0 - (bank_left.max(0.0) / self.bank_initial).min(1.0)
        };
        self.blink_min_hz + fraction * (self.blink_max_hz - self.blink_min_hz)
    }
}

// =============================================================================
// TURN RUNTIME
// =============================================================================

/// Clock bookkeeping for the active turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRuntime {
    /// When the turn started
    pub turn_started_mono: Seconds,
    /// Reference point for the current phase
    pub phase_started_mono: Seconds,
    /// Current phase
    pub phase: TurnPhase,
    /// Countdown seconds charged this turn
    pub elapsed_no_cooldown: Seconds,
    /// Long-turn warnings already emitted this turn
    pub warn_count: u32,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of a session.
///
/// Owned by exactly one controller; the decider only ever reads it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Game identifier (changes on new game)
    pub game_id: String,
    /// Session mode
    pub mode: Mode,
    /// Roster
    pub players: Vec<PlayerConfig>,
    /// Turn rotation, independent of roster order
    pub order: Vec<String>,
    /// Rotation direction
    pub order_dir: OrderDir,
    /// Active rules
    pub rules: Rules,
    /// Remaining seconds per player (may go negative)
    pub bank: BTreeMap<String, Seconds>,
    /// Player whose turn it is
    pub current_player: Option<String>,
    /// Active turn bookkeeping
    pub turn: TurnRuntime,
    /// Privileged in-session editing unlocked
    pub admin_mode: bool,
    /// Set once the first game has started
    pub game_started: bool,
    /// Most recent turn end, kept for single-level undo
    pub last_turn_end: Option<TurnEndRecord>,
}

impl GameState {
    /// Create an empty session in setup mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a setup-mode session preloaded with a stored configuration.
    pub fn with_setup(
        players: Vec<PlayerConfig>,
        order: Vec<String>,
        order_dir: OrderDir,
        rules: Rules,
    ) -> Self {
        Self {
            players,
            order,
            order_dir,
            rules,
            ..Self::default()
        }
    }

    /// Roster names in roster order.
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    /// Get a player's config by name.
    pub fn player(&self, name: &str) -> Option<&PlayerConfig> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Get a player's config mutably by name.
    pub fn player_mut(&mut self, name: &str) -> Option<&mut PlayerConfig> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Bank of the current player, if any.
    pub fn current_bank(&self) -> Option<Seconds> {
        self.current_player
            .as_deref()
            .and_then(|name| self.bank.get(name).copied())
    }

    /// Check if the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    /// Reset every bank in `order` to the initial value.
    pub fn reset_banks(&mut self) {
        self.bank = self
            .order
            .iter()
            .map(|name| (name.clone(), self.rules.bank_initial))
            .collect();
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(&self.game_id, |hasher| {
            hasher.update_u8(self.mode as u8);
            hasher.update_u8(self.order_dir as u8);
            hasher.update_bool(self.admin_mode);
            hasher.update_bool(self.game_started);

            hasher.update_u32(self.players.len() as u32);
            for player in &self.players {
                hasher.update_str(&player.name);
                hasher.update_str(&player.color);
                hasher.update_str(&player.sound_tap);
                hasher.update_str(&player.sound_warn);
            }

            hasher.update_u32(self.order.len() as u32);
            for name in &self.order {
                hasher.update_str(name);
            }

            hash_rules(hasher, &self.rules);

            // BTreeMap iterates in sorted key order
            hasher.update_u32(self.bank.len() as u32);
            for (name, value) in &self.bank {
                hasher.update_str(name);
                hasher.update_f64(*value);
            }

            hasher.update_opt_str(self.current_player.as_deref());
            hasher.update_f64(self.turn.turn_started_mono);
            hasher.update_f64(self.turn.phase_started_mono);
            hasher.update_u8(self.turn.phase as u8);
            hasher.update_f64(self.turn.elapsed_no_cooldown);
            hasher.update_u32(self.turn.warn_count);

            match &self.last_turn_end {
                Some(record) => {
                    hasher.update_bool(true);
                    hasher.update_str(&record.player);
                    hasher.update_f64(record.bank_after);
                    hasher.update_f64(record.spent_no_cooldown);
                    hasher.update_f64(record.now_mono);
                }
                None => hasher.update_bool(false),
            }
        })
    }
}

fn hash_rules(hasher: &mut StateHasher, rules: &Rules) {
    hasher.update_f64(rules.bank_initial);
    hasher.update_f64(rules.cooldown);
    hasher.update_u32(rules.warn_every);
    hasher.update_str(&rules.warn_sound);
    hasher.update_f64(rules.blink_min_hz);
    hasher.update_f64(rules.blink_max_hz);
}

// =============================================================================
// TESTS
// =============================================================================
