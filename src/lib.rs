//! # Timebank
//!
//! Turn-based time bank clock for multiplayer board games. Every player owns
//! a depleting budget of seconds; the engine charges the active player, grants
//! a short cooldown at the start of each turn, warns on long turns, pauses,
//! and lets an authenticated admin edit the running game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         TIMEBANK                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── hash.rs     - State hashing for replay verification     │
//! │  └── format.rs   - mm:ss clock display                       │
//! │                                                              │
//! │  game/           - Clock engine (deterministic)              │
//! │  ├── state.rs    - Game state, rules, turn runtime           │
//! │  ├── command.rs  - Timestamped commands                      │
//! │  ├── events.rs   - Event vocabulary                          │
//! │  ├── edit.rs     - Setup/admin edit operations               │
//! │  ├── decide.rs   - Command interpreter, time interpolation   │
//! │  └── reduce.rs   - Event reducer and replay                  │
//! │                                                              │
//! │  session/        - Shell (non-deterministic)                 │
//! │  ├── controller.rs - decide → log → apply → effects          │
//! │  ├── log.rs      - Append-only event log                     │
//! │  ├── effects.rs  - Sounds, haptics, keep-awake               │
//! │  ├── store.rs    - Persisted roster and rules                │
//! │  └── clock.rs    - Monotonic time sources                    │
//! │                                                              │
//! │  config.rs       - Environment configuration                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules never read a clock or touch the disk:
//! - Every command carries its own monotonic timestamp
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - `decide` is pure; `apply_event` is total
//!
//! Folding the recorded events into a fresh state with [`game::replay`]
//! reproduces the live state bit for bit, which [`GameState::compute_hash`]
//! checks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::core::format::format_mm_ss;
pub use crate::game::command::{Command, CommandKind, GameSetup};
pub use crate::game::decide::{CommandError, Decider};
pub use crate::game::edit::EditOp;
pub use crate::game::events::GameEvent;
pub use crate::game::state::{GameState, Mode, OrderDir, PlayerConfig, Rules, TurnPhase};
pub use crate::session::controller::{DispatchResult, GameController};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
