//! Game Logic Module
//!
//! The clock engine. 100% deterministic: no I/O, no clock reads.
//!
//! ## Module Structure
//!
//! - `state`: Game state, rules, players, turn runtime
//! - `command`: Commands stamped with monotonic time
//! - `events`: Closed set of facts produced by the decider
//! - `edit`: Admin/setup edit operations
//! - `decide`: Command interpreter and time interpolation
//! - `reduce`: Total event reducer and replay

pub mod state;
pub mod command;
pub mod events;
pub mod edit;
pub mod decide;
pub mod reduce;

// Re-export key types
pub use state::{GameState, Mode, OrderDir, PlayerConfig, Rules, Seconds, TurnPhase, TurnRuntime};
pub use command::{Command, CommandKind, GameSetup};
pub use events::{GameEvent, TurnEndRecord};
pub use edit::{EditOp, RulesPatch};
pub use decide::{CommandError, Decider};
pub use reduce::{apply_event, replay};
