//! Session settings

use serde::{Deserialize, Serialize};

use crate::gesture::DEFAULT_DOUBLE_TAP_MS;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::song::{Song, TimeSignature, DEFAULT_TEMPO};
use crate::theory::{normalize_note, Key};

/// Tunables for a [`Session`](crate::Session). Every field has a default,
/// so partial config files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of undo steps kept
    pub history_limit: usize,
    /// Double-tap window in milliseconds
    pub double_tap_ms: u64,
    pub default_tempo: u16,
    /// Tonic of new songs, any spelling `normalize_note` accepts
    pub default_key: String,
    pub default_minor: bool,
    pub default_time_signature: TimeSignature,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
            default_tempo: DEFAULT_TEMPO,
            default_key: "C".to_string(),
            default_minor: false,
            default_time_signature: TimeSignature::default(),
        }
    }
}

impl SessionConfig {
    pub fn key(&self) -> Key {
        let root = normalize_note(&self.default_key);
        if self.default_minor {
            Key::minor(root)
        } else {
            Key::major(root)
        }
    }

    /// Empty song using the configured defaults
    pub fn new_song(&self) -> Song {
        Song::new("Untitled", self.default_tempo, self.default_time_signature, self.key())
    }
}
