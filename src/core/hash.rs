//! State Hashing for Replay Verification
//!
//! Provides deterministic hashing of the session aggregate so that a live
//! state can be compared against one rebuilt from the event history.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for the scalar types found in the state.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game state.
    pub fn for_game_state() -> Self {
        Self::new(b"TIMEBANK_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f64 value (bit pattern, little-endian).
    ///
    /// `-0.0` and `0.0` hash differently; the engine never produces `-0.0`
    /// from arithmetic on non-negative inputs.
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Update with an optional string (presence flag, then contents).
    pub fn update_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.update_bool(true);
                self.update_str(s);
            }
            None => self.update_bool(false),
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// This function is called by `GameState::compute_hash()`.
/// The closure adds state-specific data after the game id.
pub fn compute_state_hash<F>(game_id: &str, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();
    hasher.update_str(game_id);
    add_state(&mut hasher);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
