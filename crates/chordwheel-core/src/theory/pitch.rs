//! Pitch classes, notes and note-name normalization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChordwheelError, Result};

/// Octave used as the base reference when voicing chords.
pub const BASE_OCTAVE: i8 = 4;

/// Preferred accidental when spelling a pitch class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spelling {
    Sharp,
    Flat,
}

/// One of the twelve pitch classes, independent of octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        Self::C,
        Self::Db,
        Self::D,
        Self::Eb,
        Self::E,
        Self::F,
        Self::FSharp,
        Self::G,
        Self::Ab,
        Self::A,
        Self::Bb,
        Self::B,
    ];

    /// Semitones above C (0-11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Pitch class for any semitone count, wrapping in both directions
    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Transpose by a signed number of semitones
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone(self.semitone() as i32 + semitones.rem_euclid(12))
    }

    /// Canonical chord-wheel name
    pub fn name(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Db => "Db",
            Self::D => "D",
            Self::Eb => "Eb",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F#",
            Self::G => "G",
            Self::Ab => "Ab",
            Self::A => "A",
            Self::Bb => "Bb",
            Self::B => "B",
        }
    }

    /// Name using only sharps or only flats for the black keys
    pub fn spelled(self, spelling: Spelling) -> &'static str {
        const SHARPS: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        const FLATS: [&str; 12] = [
            "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
        ];
        match spelling {
            Spelling::Sharp => SHARPS[self.semitone() as usize],
            Spelling::Flat => FLATS[self.semitone() as usize],
        }
    }

    /// Position on the circle of fifths, C = 0, G = 1, ... F = 11
    pub fn fifths_index(self) -> u8 {
        (self.semitone() * 7) % 12
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = ChordwheelError;

    fn from_str(s: &str) -> Result<Self> {
        parse_note(s)
    }
}

/// A pitch class placed in a specific octave (scientific pitch notation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i8,
}

impl Note {
    pub fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self { pitch_class, octave }
    }

    /// Build from an absolute semitone count where 0 is C at `BASE_OCTAVE`
    pub fn from_offset(root: PitchClass, semitones_above_root: i32) -> Self {
        let absolute = root.semitone() as i32 + semitones_above_root;
        Self {
            pitch_class: PitchClass::from_semitone(absolute),
            octave: BASE_OCTAVE + absolute.div_euclid(12) as i8,
        }
    }

    /// MIDI note number (C4 = 60)
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class.semitone() as i32
    }

    /// Same pitch class, shifted by whole octaves
    pub fn shift_octaves(self, octaves: i8) -> Self {
        Self {
            octave: self.octave.saturating_add(octaves),
            ..self
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

/// Split a leading note name from the rest of a string.
///
/// Returns the pitch class and the unconsumed remainder. Accepts any letter
/// case and both ASCII and Unicode accidentals, stacked (`"C##"`, `"Ebb"`).
pub(crate) fn split_note_prefix(input: &str) -> Option<(PitchClass, &str)> {
    let mut chars = input.char_indices();
    let (_, letter) = chars.next()?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut offset = 0;
    let mut rest_start = letter.len_utf8();
    for (idx, ch) in chars {
        let delta = match ch {
            '#' | '♯' => 1,
            'b' | 'B' | '♭' => -1,
            '𝄪' => 2,
            '𝄫' => -2,
            _ => break,
        };
        offset += delta;
        rest_start = idx + ch.len_utf8();
    }

    Some((PitchClass::from_semitone(base + offset), &input[rest_start..]))
}

/// Strictly parse a note name with an optional octave suffix.
pub fn parse_note(input: &str) -> Result<PitchClass> {
    let trimmed = input.trim();
    let (pitch_class, rest) =
        split_note_prefix(trimmed).ok_or_else(|| ChordwheelError::InvalidNote(input.to_string()))?;

    let octave = rest.strip_prefix('-').unwrap_or(rest);
    if octave.chars().all(|c| c.is_ascii_digit()) {
        Ok(pitch_class)
    } else {
        Err(ChordwheelError::InvalidNote(input.to_string()))
    }
}

/// Canonicalize a note name. Never fails: malformed input maps to `C`.
///
/// ```
/// use chordwheel_core::{normalize_note, PitchClass};
/// assert_eq!(normalize_note("f#4"), PitchClass::FSharp);
/// assert_eq!(normalize_note("G♭"), PitchClass::FSharp);
/// assert_eq!(normalize_note("???"), PitchClass::C);
/// ```
pub fn normalize_note(input: &str) -> PitchClass {
    parse_note(input).unwrap_or_else(|_| {
        tracing::debug!(input, "unrecognized note name, using C");
        PitchClass::C
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_and_glyph_insensitive() {
        assert_eq!(normalize_note("f#"), normalize_note("F♯"));
        assert_eq!(normalize_note("bb"), PitchClass::Bb);
        assert_eq!(normalize_note("B♭3"), PitchClass::Bb);
        assert_eq!(normalize_note("  eb "), PitchClass::Eb);
        assert_eq!(normalize_note("C#"), PitchClass::Db);
        assert_eq!(normalize_note("Cb"), PitchClass::B);
        assert_eq!(normalize_note("E#"), PitchClass::F);
        assert_eq!(normalize_note("F𝄪"), PitchClass::G);
        assert_eq!(normalize_note("a-1"), PitchClass::A);
        assert_eq!(normalize_note("EB"), normalize_note("eb"));
        assert_eq!(normalize_note("BB"), PitchClass::Bb);
        assert_eq!(normalize_note("AB4"), PitchClass::Ab);
    }

    #[test]
    fn test_transpose_wraps_extreme_offsets() {
        assert_eq!(PitchClass::G.transpose(i32::MAX), PitchClass::D);
        assert_eq!(PitchClass::G.transpose(i32::MIN), PitchClass::B);
        assert_eq!(PitchClass::C.transpose(-13), PitchClass::B);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["c", "F#4", "g♭", "Bbb", "e#", "", "H", "x7", "Ab", "D♯"] {
            let once = normalize_note(input);
            assert_eq!(normalize_note(once.name()), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_malformed_falls_back_to_c() {
        assert_eq!(normalize_note(""), PitchClass::C);
        assert_eq!(normalize_note("H"), PitchClass::C);
        assert_eq!(normalize_note("Cmaj7"), PitchClass::C);
        assert!(parse_note("Cmaj7").is_err());
        assert!("Q".parse::<PitchClass>().is_err());
    }

    #[test]
    fn test_spelling_and_fifths() {
        assert_eq!(PitchClass::Db.spelled(Spelling::Sharp), "C#");
        assert_eq!(PitchClass::FSharp.spelled(Spelling::Flat), "Gb");
        assert_eq!(PitchClass::G.fifths_index(), 1);
        assert_eq!(PitchClass::F.fifths_index(), 11);
    }

    #[test]
    fn test_note_offsets_and_midi() {
        let b = Note::from_offset(PitchClass::B, 4);
        assert_eq!(b.to_string(), "Eb5");
        assert_eq!(Note::new(PitchClass::C, 4).midi(), 60);
        assert_eq!(Note::from_offset(PitchClass::C, -1).to_string(), "B3");
    }
}
