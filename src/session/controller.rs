//! Game Controller
//!
//! Owns the session state and serializes every command through
//! decide → log → apply → effects. This is the only writer of `GameState`.

use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::game::command::Command;
use crate::game::decide::{CommandError, Decider};
use crate::game::edit::EditOp;
use crate::game::events::GameEvent;
use crate::game::reduce::apply_event;
use crate::game::state::GameState;
use crate::session::effects::{EffectSink, SoundRepo};
use crate::session::log::{EventLogWriter, LogError};
use crate::session::store::{ConfigStore, GameConfig};

/// Outcome of one dispatched command.
#[derive(Debug, Default, Clone)]
pub struct DispatchResult {
    /// Events applied, in order
    pub events: Vec<GameEvent>,
    /// Log lines written for those events
    pub log_lines: Vec<String>,
}

/// Controller loop for a single session.
pub struct GameController<E: EffectSink> {
    decider: Decider,
    log: EventLogWriter,
    effects: E,
    sounds: SoundRepo,
    store: Option<ConfigStore>,
    state: GameState,
    history: Vec<GameEvent>,
}

impl<E: EffectSink + Default> GameController<E> {
    /// Build a controller from process configuration, seeding the setup
    /// state from the stored game configuration if there is one.
    pub fn open(config: &AppConfig) -> Result<Self, LogError> {
        let controller = Self::new(
            Decider::new(config.admin_password.clone()),
            EventLogWriter::open(config.log_path())?,
            E::default(),
            SoundRepo::new(config.sound_dir()),
        );
        Ok(controller.with_config_store(ConfigStore::new(config.config_path())))
    }
}

impl<E: EffectSink> GameController<E> {
    /// Create a controller with an empty setup-mode state.
    pub fn new(decider: Decider, log: EventLogWriter, effects: E, sounds: SoundRepo) -> Self {
        Self {
            decider,
            log,
            effects,
            sounds,
            store: None,
            state: GameState::new(),
            history: Vec::new(),
        }
    }

    /// Attach a configuration store.
    ///
    /// Before the first game the stored roster, order, direction and rules
    /// replace the setup state. Afterwards the store is rewritten whenever
    /// the configuration changes.
    pub fn with_config_store(mut self, store: ConfigStore) -> Self {
        if !self.state.game_started {
            match store.load_game_config() {
                Ok(Some(config)) => {
                    info!("Loaded {} players from {}", config.players.len(), store.path().display());
                    self.state = config.into_state();
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable config {}: {}", store.path().display(), e),
            }
        }
        self.store = Some(store);
        self
    }

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Effect sink.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Sound repository.
    pub fn sounds(&self) -> &SoundRepo {
        &self.sounds
    }

    /// Every event applied so far, in order.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Run one command.
    ///
    /// A rejected command leaves the state untouched and writes nothing.
    /// Sink failures are logged and never interrupt applying the events.
    pub fn dispatch(&mut self, command: &Command) -> Result<DispatchResult, CommandError> {
        let events = match self.decider.decide(&self.state, command) {
            Ok(events) => events,
            Err(e) => {
                warn!("Command rejected at {:.3}: {}", command.now_mono, e);
                return Err(e);
            }
        };

        let mut log_lines = Vec::with_capacity(events.len());
        let mut config_changed = false;

        for event in &events {
            debug!("Applying {}", event.event_type());
            match self.log.append(&self.state.game_id, event) {
                Ok(line) => log_lines.push(line),
                Err(e) => error!("Failed to log {}: {}", event.event_type(), e),
            }

            apply_event(&mut self.state, event);
            self.run_effects(command, event);

            #[cfg(feature = "debug-tracing")]
            debug!("State after {}: {:?}", event.event_type(), self.state);

            match event {
                GameEvent::GameStart { game_id, order, .. } => {
                    info!("Game {} started with {} players", game_id, order.len());
                    config_changed = true;
                }
                GameEvent::SetupEdit(edit) | GameEvent::AdminEdit(edit) => {
                    if let EditOp::NewGame { game_id } = edit {
                        info!("New game {}", game_id);
                    }
                    config_changed = true;
                }
                _ => {}
            }
        }

        if config_changed {
            self.persist_config();
        }
        self.history.extend(events.iter().cloned());

        Ok(DispatchResult { events, log_lines })
    }

    fn run_effects(&mut self, command: &Command, event: &GameEvent) {
        match event {
            GameEvent::GameStart { .. } | GameEvent::TechPauseOff { .. } => {
                self.effects.set_keep_awake(true);
            }
            GameEvent::TechPauseOn { .. } => {
                self.effects.set_keep_awake(false);
            }
            GameEvent::TurnEnd(record) if command.is_tap() => {
                let sound = self
                    .state
                    .player(&record.player)
                    .map(|p| p.sound_tap.as_str())
                    .unwrap_or_default();
                let path = self.sounds.resolve(sound);
                self.effects.play_sound(path.as_deref());
                self.effects.vibrate();
            }
            GameEvent::WarnLongTurn { .. } => {
                let path = self.sounds.resolve(&self.state.rules.warn_sound);
                self.effects.play_sound(path.as_deref());
            }
            _ => {}
        }
    }

    fn persist_config(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_game_config(&GameConfig::from_state(&self.state)) {
            error!("Failed to persist config to {}: {}", store.path().display(), e);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
