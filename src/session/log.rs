//! Event Log Sink
//!
//! Append-only text log with one line per applied event:
//!
//! ```text
//! 2026-01-01T10:00:00.000+00:00 SEQ=3 G=g1 EVENT=TURN_END bank_after=78.0 now_mono=27.0 player=A spent_no_cooldown=22.0
//! ```
//!
//! Payload keys are sorted. Sequences and maps collapse into a single quoted,
//! comma-joined token so every line splits cleanly on spaces.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::game::events::GameEvent;

/// First line of every new log file.
pub const LOG_HEADER: &str = "LOG_FORMAT v=1";

/// Event log errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// Filesystem failure.
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Event could not be converted to key/value pairs.
    #[error("event encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Appends events to a log file, numbering them with a strictly increasing
/// sequence.
#[derive(Debug)]
pub struct EventLogWriter {
    path: PathBuf,
    seq: u64,
}

impl EventLogWriter {
    /// Open (or create) the log at `path`.
    ///
    /// Creates parent directories and writes the version header if the file
    /// does not exist yet. The sequence restarts at 1 for every writer.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            fs::write(&path, format!("{LOG_HEADER}\n"))?;
            debug!("Created event log {}", path.display());
        }
        Ok(Self { path, seq: 0 })
    }

    /// Log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last sequence number written (0 before the first event).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Append one event and return the written line.
    pub fn append(&mut self, game_id: &str, event: &GameEvent) -> Result<String, LogError> {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false);
        let line = format_line(&stamp, self.seq + 1, game_id, event)?;

        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        self.seq += 1;
        Ok(line)
    }
}

/// Render one log line.
pub fn format_line(stamp: &str, seq: u64, game_id: &str, event: &GameEvent) -> Result<String, LogError> {
    let game = if game_id.is_empty() { "-" } else { game_id };
    let mut line = format!("{stamp} SEQ={seq} G={game} EVENT={}", event.event_type());

    // serde_json's object map is a BTreeMap: keys come out sorted
    let value = serde_json::to_value(event)?;
    let mut data = match value.get("data") {
        Some(Value::Object(data)) => data.clone(),
        _ => Map::new(),
    };
    // Field-less edits still carry an (empty) payload
    if matches!(event, GameEvent::SetupEdit(_) | GameEvent::AdminEdit(_)) {
        data.entry("payload").or_insert_with(|| Value::Object(Map::new()));
    }
    for (key, value) in &data {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&safe(value));
    }
    Ok(line)
}

fn safe(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(nested).collect();
            format!("\"{}\"", joined.join(","))
        }
        Value::Object(map) => {
            let joined: Vec<String> = map.iter().map(|(k, v)| format!("{k}:{}", nested(v))).collect();
            format!("\"{}\"", joined.join(","))
        }
        other => {
            let text = nested(other);
            if text.contains(' ') {
                format!("\"{text}\"")
            } else {
                text
            }
        }
    }
}

/// Render a value inside a quoted token. Never emits `"`; inner lists and
/// records use `;` so they stay apart from the outer `,` separator.
fn nested(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('"', "'"),
        Value::Null => "-".to_string(),
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(nested).collect();
            format!("[{}]", joined.join(";"))
        }
        Value::Object(map) => {
            let joined: Vec<String> = map.iter().map(|(k, v)| format!("{k}:{}", nested(v))).collect();
            format!("{{{}}}", joined.join(";"))
        }
        other => other.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
