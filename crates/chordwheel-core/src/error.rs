//! Error types for chordwheel

use thiserror::Error;

/// Errors reported by the strict parsers.
///
/// The lenient entry points (`normalize_note`, `numeral_to_chord`, the editor
/// reducer) never surface these; they fall back to a documented default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordwheelError {
    #[error("Invalid note: {0:?}")]
    InvalidNote(String),
    #[error("Unknown chord quality: {0:?}")]
    InvalidQuality(String),
    #[error("Invalid roman numeral: {0:?}")]
    InvalidNumeral(String),
    #[error("Invalid chord symbol: {0:?}")]
    InvalidChord(String),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Invalid time signature: {0:?}")]
    InvalidTimeSignature(String),
}

pub type Result<T> = std::result::Result<T, ChordwheelError>;
