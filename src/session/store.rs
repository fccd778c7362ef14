//! Configuration Store
//!
//! Persists the roster, turn order, direction and rules between sessions as
//! a JSON document. Missing fields fall back to defaults so older files keep
//! loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game::command::GameSetup;
use crate::game::state::{GameState, OrderDir, PlayerConfig, Rules};

/// Version written into new files.
pub const CONFIG_VERSION: u32 = 2;

/// Configuration store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("config store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid JSON for the expected layout.
    #[error("config store format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game configuration kept between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Roster
    pub players: Vec<PlayerConfig>,
    /// Turn order
    pub order: Vec<String>,
    /// Rotation direction
    pub order_dir: OrderDir,
    /// Rules
    pub rules: Rules,
}

impl GameConfig {
    /// Snapshot the configuration part of a live state.
    pub fn from_state(state: &GameState) -> Self {
        Self {
            players: state.players.clone(),
            order: state.order.clone(),
            order_dir: state.order_dir,
            rules: state.rules.clone(),
        }
    }

    /// Setup-mode state preloaded with this configuration.
    pub fn into_state(self) -> GameState {
        GameState::with_setup(self.players, self.order, self.order_dir, self.rules)
    }

    /// Start-game payload for this configuration.
    pub fn to_setup(&self, game_id: impl Into<String>) -> GameSetup {
        GameSetup {
            game_id: game_id.into(),
            players: self.players.clone(),
            order: self.order.clone(),
            order_dir: self.order_dir,
            rules: self.rules.clone(),
        }
    }
}

fn current_version() -> u32 {
    CONFIG_VERSION
}

/// Unknown directions fall back to clockwise instead of failing the load.
fn lenient_order_dir<'de, D>(deserializer: D) -> Result<OrderDir, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("counterclockwise") => OrderDir::CounterClockwise,
        _ => OrderDir::Clockwise,
    })
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GameSection {
    #[serde(default)]
    order: Vec<String>,
    #[serde(default, deserialize_with = "lenient_order_dir")]
    order_dir: OrderDir,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredConfig {
    #[serde(default = "current_version")]
    config_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game: Option<GameSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<Rules>,
    #[serde(default)]
    players: Vec<PlayerConfig>,
}

/// JSON-file configuration store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored configuration.
    ///
    /// Returns `Ok(None)` if the file is missing or lacks the game or rules
    /// section.
    pub fn load_game_config(&self) -> Result<Option<GameConfig>, StoreError> {
        if !self.path.exists() {
            debug!("No stored config at {}", self.path.display());
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let stored: StoredConfig = serde_json::from_str(&text)?;

        let (Some(game), Some(rules)) = (stored.game, stored.rules) else {
            return Ok(None);
        };
        debug!(
            "Loaded config v{} with {} players",
            stored.config_version,
            stored.players.len()
        );

        Ok(Some(GameConfig {
            players: stored.players,
            order: game.order.into_iter().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()).collect(),
            order_dir: game.order_dir,
            rules,
        }))
    }

    /// Persist `config`, replacing whatever was stored.
    pub fn save_game_config(&self, config: &GameConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredConfig {
            config_version: CONFIG_VERSION,
            game: Some(GameSection {
                order: config.order.clone(),
                order_dir: config.order_dir,
            }),
            rules: Some(config.rules.clone()),
            players: config.players.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
