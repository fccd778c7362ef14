//! Configuration Edits
//!
//! The ten edit operations shared by pre-game setup and in-game admin
//! editing. Application semantics are identical in both contexts.

use serde::{Serialize, Deserialize};

use crate::game::state::{GameState, Seconds, TurnPhase};

/// Partial update of `Rules`. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesPatch {
    /// New starting bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_initial: Option<Seconds>,
    /// New grace period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<Seconds>,
    /// New warning interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_every: Option<u32>,
    /// New warning sound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_sound: Option<String>,
    /// New blink rate at a full bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blink_min_hz: Option<f64>,
    /// New blink rate at an empty bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blink_max_hz: Option<f64>,
}

impl RulesPatch {
    /// Merge the present fields into `state.rules`.
    fn merge_into(&self, state: &mut GameState) {
        let rules = &mut state.rules;
        if let Some(v) = self.bank_initial {
            rules.bank_initial = v;
        }
        if let Some(v) = self.cooldown {
            rules.cooldown = v;
        }
        if let Some(v) = self.warn_every {
            rules.warn_every = v;
        }
        if let Some(v) = &self.warn_sound {
            rules.warn_sound = v.clone();
        }
        if let Some(v) = self.blink_min_hz {
            rules.blink_min_hz = v;
        }
        if let Some(v) = self.blink_max_hz {
            rules.blink_max_hz = v;
        }
    }
}

/// An edit of the live configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit_type", content = "payload", rename_all = "snake_case")]
pub enum EditOp {
    /// Replace the turn order wholesale (validated by the caller)
    Reorder {
        /// Complete new turn order
        new_order: Vec<String>,
    },
    /// Flip the rotation direction
    Reverse,
    /// Overwrite one player's bank
    SetBank {
        /// Player to change
        player: String,
        /// New bank in seconds
        value: Seconds,
    },
    /// Merge rule fields
    SetRules(RulesPatch),
    /// Rename a player everywhere the name is referenced
    RenamePlayer {
        /// Current name
        old: String,
        /// Replacement name
        new: String,
    },
    /// Change a player's color
    SetColor {
        /// Player to change
        player: String,
        /// Color string, e.g. `#FF0000`
        value: String,
    },
    /// Change a player's tap sound
    SetSoundTap {
        /// Player to change
        player: String,
        /// Sound file name
        value: String,
    },
    /// Drop a player from the game
    RemovePlayer {
        /// Player to remove
        player: String,
    },
    /// Reset banks and the turn, keeping roster, order and rules
    NewGame {
        /// Identifier of the new game
        game_id: String,
    },
    /// Restore the turn that ended most recently
    Undo,
}

impl EditOp {
    /// Wire name of the edit type.
    pub fn edit_type(&self) -> &'static str {
        match self {
            EditOp::Reorder { .. } => "reorder",
            EditOp::Reverse => "reverse",
            EditOp::SetBank { .. } => "set_bank",
            EditOp::SetRules(_) => "set_rules",
            EditOp::RenamePlayer { .. } => "rename_player",
            EditOp::SetColor { .. } => "set_color",
            EditOp::SetSoundTap { .. } => "set_sound_tap",
            EditOp::RemovePlayer { .. } => "remove_player",
            EditOp::NewGame { .. } => "new_game",
            EditOp::Undo => "undo",
        }
    }

    /// Apply the edit to `state`.
    ///
    /// Edits that would break the state's invariants (unknown player,
    /// duplicate name, removing the last player) are no-ops.
    pub fn apply(&self, state: &mut GameState) {
        match self {
            EditOp::Reorder { new_order } => {
                state.order = new_order.clone();
            }
            EditOp::Reverse => {
                state.order_dir = state.order_dir.reversed();
            }
            EditOp::SetBank { player, value } => {
                if state.order.contains(player) {
                    state.bank.insert(player.clone(), *value);
                }
            }
            EditOp::SetRules(patch) => patch.merge_into(state),
            EditOp::RenamePlayer { old, new } => rename_player(state, old, new),
            EditOp::SetColor { player, value } => {
                if let Some(cfg) = state.player_mut(player) {
                    cfg.color = value.clone();
                }
            }
            EditOp::SetSoundTap { player, value } => {
                if let Some(cfg) = state.player_mut(player) {
                    cfg.sound_tap = value.clone();
                }
            }
            EditOp::RemovePlayer { player } => remove_player(state, player),
            EditOp::NewGame { game_id } => new_game(state, game_id),
            EditOp::Undo => undo(state),
        }
    }
}

fn rename_player(state: &mut GameState, old: &str, new: &str) {
    if old == new {
        return;
    }
    let taken = state.order.iter().any(|n| n == new) || state.player(new).is_some();
    if taken {
        return;
    }

    if let Some(value) = state.bank.remove(old) {
        state.bank.insert(new.to_string(), value);
    }
    for name in state.order.iter_mut().filter(|n| n.as_str() == old) {
        *name = new.to_string();
    }
    if state.current_player.as_deref() == Some(old) {
        state.current_player = Some(new.to_string());
    }
    if let Some(record) = state.last_turn_end.as_mut().filter(|r| r.player == old) {
        record.player = new.to_string();
    }
    for cfg in state.players.iter_mut().filter(|p| p.name == old) {
        cfg.name = new.to_string();
    }
}

/// Remove `target` from order, bank and roster.
///
/// If the target held the turn, the turn passes to
/// `new_order[old_index % new_len]`. Depending on the removed position and
/// rotation direction this can skip or repeat a neighbour's turn.
fn remove_player(state: &mut GameState, target: &str) {
    let Some(index) = state.order.iter().position(|n| n == target) else {
        return;
    };
    if state.order.len() <= 1 {
        return;
    }

    state.order.retain(|n| n != target);
    state.bank.remove(target);
    state.players.retain(|p| p.name != target);

    if state.current_player.as_deref() == Some(target) {
        state.current_player = if state.order.is_empty() {
            None
        } else {
            Some(state.order[index % state.order.len()].clone())
        };
    }
}

fn new_game(state: &mut GameState, game_id: &str) {
    state.game_id = game_id.to_string();
    state.reset_banks();
    state.current_player = state.order.first().cloned();
    state.turn.phase = TurnPhase::Cooldown;
    state.turn.elapsed_no_cooldown = 0.0;
    state.turn.warn_count = 0;
}

/// Restore the most recent turn end. Consumes the record, so a second undo
/// without an intervening turn end does nothing.
fn undo(state: &mut GameState) {
    let restorable = state
        .last_turn_end
        .as_ref()
        .is_some_and(|r| state.order.contains(&r.player));
    if !restorable {
        return;
    }
    let Some(record) = state.last_turn_end.take() else {
        return;
    };

    state.bank.insert(record.player.clone(), record.bank_after);
    state.current_player = Some(record.player);
    state.turn.phase = TurnPhase::Countdown;
    state.turn.elapsed_no_cooldown = record.spent_no_cooldown;
    state.turn.warn_count = state.rules.warnings_due(record.spent_no_cooldown);
}

// =============================================================================
// TESTS
// =============================================================================
