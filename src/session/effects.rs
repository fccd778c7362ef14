//! Effect Sink
//!
//! Sound, haptics and keep-awake signals triggered by applied events.
//! The engine only decides *when*; resolving sound files and playing them
//! belongs to the sink.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Error recorded when a sound cannot be resolved.
pub const SOUND_UNAVAILABLE: &str = "sound_unavailable";

/// Receiver of side effects.
pub trait EffectSink {
    /// Play a resolved sound file; `None` means the sound could not be found.
    fn play_sound(&mut self, sound: Option<&Path>);

    /// Emit one haptic pulse.
    fn vibrate(&mut self);

    /// Keep the screen awake (or release it).
    fn set_keep_awake(&mut self, enabled: bool);
}

/// Effect sink that records everything it is asked to do.
///
/// Used headless (the binary) and in tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingEffects {
    /// File names of played sounds, in order
    pub played_sounds: Vec<String>,
    /// Number of haptic pulses
    pub vibrations: u32,
    /// Current keep-awake flag
    pub keep_awake: bool,
    /// Errors, e.g. unresolved sounds
    pub errors: Vec<String>,
}

impl RecordingEffects {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EffectSink for RecordingEffects {
    fn play_sound(&mut self, sound: Option<&Path>) {
        match sound.and_then(Path::file_name) {
            Some(name) => self.played_sounds.push(name.to_string_lossy().into_owned()),
            None => {
                warn!("Sound unavailable");
                self.errors.push(SOUND_UNAVAILABLE.to_string());
            }
        }
    }

    fn vibrate(&mut self) {
        self.vibrations += 1;
    }

    fn set_keep_awake(&mut self, enabled: bool) {
        self.keep_awake = enabled;
    }
}

/// Directory of sound files addressed by file name.
#[derive(Debug, Clone)]
pub struct SoundRepo {
    sound_dir: PathBuf,
}

impl SoundRepo {
    /// Create a repo rooted at `sound_dir` (which may not exist).
    pub fn new(sound_dir: impl Into<PathBuf>) -> Self {
        Self {
            sound_dir: sound_dir.into(),
        }
    }

    /// Sorted file names available, empty if the directory is missing.
    pub fn list_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.sound_dir) else {
            return Vec::new();
        };
        let mut files: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }

    /// Resolve a sound name to an existing file.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty() {
            return None;
        }
        let candidate = self.sound_dir.join(file_name);
        candidate.is_file().then_some(candidate)
    }
}
