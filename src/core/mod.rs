//! Core primitives.
//!
//! State hashing for replay verification and clock display formatting.

pub mod hash;
pub mod format;

// Re-export core types
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use format::format_mm_ss;
