//! Session shell (non-deterministic).
//!
//! Wraps the pure engine with everything that touches the outside world:
//! wall-clock time, the event log, sound/haptic effects and the stored
//! configuration. Failures here are logged and never change engine state.
//!
//! ## Module Structure
//!
//! - `controller`: Serialized decide → log → apply → effects loop
//! - `log`: Append-only event log
//! - `effects`: Effect sink and sound lookup
//! - `store`: Persisted roster and rules
//! - `clock`: Monotonic time sources

pub mod clock;
pub mod controller;
pub mod effects;
pub mod log;
pub mod store;

pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use controller::{DispatchResult, GameController};
pub use effects::{EffectSink, RecordingEffects, SoundRepo};
pub use log::{EventLogWriter, LogError};
pub use store::{ConfigStore, GameConfig, StoreError};
