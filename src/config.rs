//! Process configuration.
//!
//! Read once at startup from environment variables. Everything the engine
//! itself needs travels inside commands; this only locates files and sets
//! the admin password and tick cadence of the controller loop.

use std::path::PathBuf;
use std::time::Duration;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./timebank-data";

/// Default admin password.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Default tick cadence in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 250;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Root for the config file, event log and sounds.
    pub data_dir: PathBuf,
    /// Password accepted by admin auth.
    pub admin_password: String,
    /// How often the shell sends a Tick command.
    pub tick_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_dir: lookup("TIMEBANK_DATA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            admin_password: lookup("TIMEBANK_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            tick_interval: lookup("TIMEBANK_TICK_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
        }
    }

    /// Stored game configuration.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Event log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("logs").join("events.log")
    }

    /// Sound directory.
    pub fn sound_dir(&self) -> PathBuf {
        self.data_dir.join("sounds")
    }
}
