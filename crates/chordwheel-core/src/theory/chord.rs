//! Chord qualities, chord construction, inversions and voicings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pitch::{split_note_prefix, Note, PitchClass};
use crate::error::{ChordwheelError, Result};

// ============================================================================
// Chord Quality
// ============================================================================

/// Chord quality, each backed by a fixed interval formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "diminished")]
    Diminished,
    #[serde(rename = "augmented")]
    Augmented,
    #[serde(rename = "sus2")]
    Sus2,
    #[serde(rename = "sus4")]
    Sus4,
    #[serde(rename = "7sus4")]
    Dominant7Sus4,
    #[serde(rename = "6")]
    Major6,
    #[serde(rename = "m6")]
    Minor6,
    #[serde(rename = "6/9")]
    SixNine,
    #[serde(rename = "add9")]
    Add9,
    #[serde(rename = "7")]
    Dominant7,
    #[serde(rename = "maj7")]
    Major7,
    #[serde(rename = "m7")]
    Minor7,
    #[serde(rename = "mMaj7")]
    MinorMajor7,
    #[serde(rename = "dim7")]
    Diminished7,
    #[serde(rename = "m7b5")]
    HalfDiminished7,
    #[serde(rename = "7#5")]
    Augmented7,
    #[serde(rename = "9")]
    Dominant9,
    #[serde(rename = "maj9")]
    Major9,
    #[serde(rename = "m9")]
    Minor9,
    #[serde(rename = "11")]
    Dominant11,
    #[serde(rename = "m11")]
    Minor11,
    #[serde(rename = "13")]
    Dominant13,
    #[serde(rename = "maj13")]
    Major13,
    #[serde(rename = "m13")]
    Minor13,
}

/// Accepted spellings for chord qualities, used by symbol parsing and
/// voicing suggestions. Matched exactly first, then lowercased.
const ABBREVIATIONS: &[(&str, ChordQuality)] = &[
    ("", ChordQuality::Major),
    ("M", ChordQuality::Major),
    ("maj", ChordQuality::Major),
    ("major", ChordQuality::Major),
    ("triad", ChordQuality::Major),
    ("m", ChordQuality::Minor),
    ("-", ChordQuality::Minor),
    ("min", ChordQuality::Minor),
    ("minor", ChordQuality::Minor),
    ("dim", ChordQuality::Diminished),
    ("°", ChordQuality::Diminished),
    ("o", ChordQuality::Diminished),
    ("diminished", ChordQuality::Diminished),
    ("aug", ChordQuality::Augmented),
    ("+", ChordQuality::Augmented),
    ("augmented", ChordQuality::Augmented),
    ("sus2", ChordQuality::Sus2),
    ("sus4", ChordQuality::Sus4),
    ("sus", ChordQuality::Sus4),
    ("7sus4", ChordQuality::Dominant7Sus4),
    ("7sus", ChordQuality::Dominant7Sus4),
    ("6", ChordQuality::Major6),
    ("maj6", ChordQuality::Major6),
    ("m6", ChordQuality::Minor6),
    ("min6", ChordQuality::Minor6),
    ("6/9", ChordQuality::SixNine),
    ("69", ChordQuality::SixNine),
    ("add9", ChordQuality::Add9),
    ("add2", ChordQuality::Add9),
    ("7", ChordQuality::Dominant7),
    ("dom7", ChordQuality::Dominant7),
    ("maj7", ChordQuality::Major7),
    ("M7", ChordQuality::Major7),
    ("Δ", ChordQuality::Major7),
    ("Δ7", ChordQuality::Major7),
    ("m7", ChordQuality::Minor7),
    ("-7", ChordQuality::Minor7),
    ("min7", ChordQuality::Minor7),
    ("mMaj7", ChordQuality::MinorMajor7),
    ("mmaj7", ChordQuality::MinorMajor7),
    ("m(maj7)", ChordQuality::MinorMajor7),
    ("dim7", ChordQuality::Diminished7),
    ("°7", ChordQuality::Diminished7),
    ("o7", ChordQuality::Diminished7),
    ("m7b5", ChordQuality::HalfDiminished7),
    ("m7♭5", ChordQuality::HalfDiminished7),
    ("ø", ChordQuality::HalfDiminished7),
    ("ø7", ChordQuality::HalfDiminished7),
    ("half-dim", ChordQuality::HalfDiminished7),
    ("7#5", ChordQuality::Augmented7),
    ("7♯5", ChordQuality::Augmented7),
    ("aug7", ChordQuality::Augmented7),
    ("+7", ChordQuality::Augmented7),
    ("9", ChordQuality::Dominant9),
    ("maj9", ChordQuality::Major9),
    ("M9", ChordQuality::Major9),
    ("m9", ChordQuality::Minor9),
    ("min9", ChordQuality::Minor9),
    ("11", ChordQuality::Dominant11),
    ("m11", ChordQuality::Minor11),
    ("min11", ChordQuality::Minor11),
    ("13", ChordQuality::Dominant13),
    ("maj13", ChordQuality::Major13),
    ("M13", ChordQuality::Major13),
    ("m13", ChordQuality::Minor13),
    ("min13", ChordQuality::Minor13),
];

impl ChordQuality {
    pub const ALL: [ChordQuality; 26] = [
        Self::Major,
        Self::Minor,
        Self::Diminished,
        Self::Augmented,
        Self::Sus2,
        Self::Sus4,
        Self::Dominant7Sus4,
        Self::Major6,
        Self::Minor6,
        Self::SixNine,
        Self::Add9,
        Self::Dominant7,
        Self::Major7,
        Self::Minor7,
        Self::MinorMajor7,
        Self::Diminished7,
        Self::HalfDiminished7,
        Self::Augmented7,
        Self::Dominant9,
        Self::Major9,
        Self::Minor9,
        Self::Dominant11,
        Self::Minor11,
        Self::Dominant13,
        Self::Major13,
        Self::Minor13,
    ];

    /// Get chord intervals from root
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],
            Self::Dominant7Sus4 => &[0, 5, 7, 10],
            Self::Major6 => &[0, 4, 7, 9],
            Self::Minor6 => &[0, 3, 7, 9],
            Self::SixNine => &[0, 4, 7, 9, 14],
            Self::Add9 => &[0, 4, 7, 14],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::MinorMajor7 => &[0, 3, 7, 11],
            Self::Diminished7 => &[0, 3, 6, 9],
            Self::HalfDiminished7 => &[0, 3, 6, 10],
            Self::Augmented7 => &[0, 4, 8, 10],
            Self::Dominant9 => &[0, 4, 7, 10, 14],
            Self::Major9 => &[0, 4, 7, 11, 14],
            Self::Minor9 => &[0, 3, 7, 10, 14],
            Self::Dominant11 => &[0, 4, 7, 10, 14, 17],
            Self::Minor11 => &[0, 3, 7, 10, 14, 17],
            // 13ths drop the 11th except on minor, where it doesn't clash
            Self::Dominant13 => &[0, 4, 7, 10, 14, 21],
            Self::Major13 => &[0, 4, 7, 11, 14, 21],
            Self::Minor13 => &[0, 3, 7, 10, 14, 17, 21],
        }
    }

    /// Suffix appended to the root in a chord symbol
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Major => "",
            Self::Minor => "m",
            Self::Diminished => "dim",
            Self::Augmented => "aug",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Dominant7Sus4 => "7sus4",
            Self::Major6 => "6",
            Self::Minor6 => "m6",
            Self::SixNine => "6/9",
            Self::Add9 => "add9",
            Self::Dominant7 => "7",
            Self::Major7 => "maj7",
            Self::Minor7 => "m7",
            Self::MinorMajor7 => "mMaj7",
            Self::Diminished7 => "dim7",
            Self::HalfDiminished7 => "m7b5",
            Self::Augmented7 => "7#5",
            Self::Dominant9 => "9",
            Self::Major9 => "maj9",
            Self::Minor9 => "m9",
            Self::Dominant11 => "11",
            Self::Minor11 => "m11",
            Self::Dominant13 => "13",
            Self::Major13 => "maj13",
            Self::Minor13 => "m13",
        }
    }

    /// Human-readable label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Diminished => "Dim",
            Self::Augmented => "Aug",
            Self::Sus2 => "Sus2",
            Self::Sus4 => "Sus4",
            Self::HalfDiminished7 => "m7♭5",
            Self::Augmented7 => "7♯5",
            other => other.suffix(),
        }
    }

    /// The triad this quality extends
    pub fn triad(&self) -> ChordQuality {
        match self {
            Self::Major
            | Self::Major6
            | Self::SixNine
            | Self::Add9
            | Self::Dominant7
            | Self::Major7
            | Self::Dominant9
            | Self::Major9
            | Self::Dominant11
            | Self::Dominant13
            | Self::Major13 => Self::Major,
            Self::Minor
            | Self::Minor6
            | Self::Minor7
            | Self::MinorMajor7
            | Self::Minor9
            | Self::Minor11
            | Self::Minor13 => Self::Minor,
            Self::Diminished | Self::Diminished7 | Self::HalfDiminished7 => Self::Diminished,
            Self::Augmented | Self::Augmented7 => Self::Augmented,
            Self::Sus2 => Self::Sus2,
            Self::Sus4 | Self::Dominant7Sus4 => Self::Sus4,
        }
    }

    pub fn is_triad(&self) -> bool {
        self.triad() == *self
    }

    /// Look up a quality by any accepted abbreviation
    pub fn from_abbreviation(abbr: &str) -> Option<ChordQuality> {
        let abbr = abbr.trim();
        let exact = ABBREVIATIONS.iter().find(|(a, _)| *a == abbr);
        exact
            .or_else(|| {
                let lower = abbr.to_lowercase();
                ABBREVIATIONS.iter().find(|(a, _)| *a == lower)
            })
            .map(|(_, quality)| *quality)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChordQuality {
    type Err = ChordwheelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_abbreviation(s).ok_or_else(|| ChordwheelError::InvalidQuality(s.to_string()))
    }
}

// ============================================================================
// Chord
// ============================================================================

/// A chord placed in the timeline or previewed on the wheel.
///
/// `notes` and `symbol` are always derived from `(root, quality, inversion)`;
/// build chords through the constructors rather than by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
    pub notes: Vec<Note>,
    pub symbol: String,
    #[serde(default)]
    pub inversion: u8,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self::with_inversion(root, quality, 0)
    }

    pub fn with_inversion(root: PitchClass, quality: ChordQuality, inversion: u8) -> Self {
        let size = quality.intervals().len() as u8;
        let inversion = inversion % size;
        let notes = get_chord_notes(root, quality, inversion as usize);
        let symbol = match notes.first() {
            Some(bass) if inversion > 0 => {
                format!("{}{}/{}", root.name(), quality.suffix(), bass.pitch_class.name())
            }
            _ => format!("{}{}", root.name(), quality.suffix()),
        };
        Self {
            root,
            quality,
            notes,
            symbol,
            inversion,
        }
    }

    /// Parse a chord symbol such as `"F#m7"` or `"Bbmaj9"`.
    ///
    /// A slash bass (`"C/E"`) is accepted and ignored; inversion is always 0.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        let trimmed = symbol.trim();
        let invalid = || ChordwheelError::InvalidChord(symbol.to_string());
        let (root, rest) = split_note_prefix(trimmed).ok_or_else(invalid)?;
        let quality_part = rest.split('/').next().unwrap_or_default();
        let quality = ChordQuality::from_abbreviation(quality_part).ok_or_else(invalid)?;
        Ok(Self::new(root, quality))
    }

    /// Same quality and inversion on a transposed root
    pub fn transposed(&self, semitones: i32) -> Self {
        Self::with_inversion(self.root.transpose(semitones), self.quality, self.inversion)
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.notes.iter().map(|n| n.pitch_class).collect()
    }

    /// Rebuild notes, symbol and a wrapped inversion from root and quality
    pub fn rederive(&self) -> Self {
        Self::with_inversion(self.root, self.quality, self.inversion)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// Build chord notes on `root` at the base octave, then invert.
pub fn get_chord_notes(root: PitchClass, quality: ChordQuality, inversion: usize) -> Vec<Note> {
    let notes: Vec<Note> = quality
        .intervals()
        .iter()
        .map(|&interval| Note::from_offset(root, interval as i32))
        .collect();
    rotate_up(notes, inversion)
}

/// Invert an existing voicing: the lowest `inversion mod len` notes are each
/// raised one octave and moved to the top.
pub fn invert_chord(notes: &[Note], inversion: usize) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by_key(Note::midi);
    rotate_up(sorted, inversion)
}

fn rotate_up(mut notes: Vec<Note>, inversion: usize) -> Vec<Note> {
    if notes.is_empty() {
        return notes;
    }
    let inv = inversion % notes.len();
    for _ in 0..inv {
        let first = notes.remove(0);
        notes.push(first.shift_octaves(1));
    }
    notes
}

// ============================================================================
// Voicings
// ============================================================================

/// Chord voicing types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Voicing {
    #[default]
    Close, // Notes stacked in order
    Open,     // Every other voice up an octave
    Drop2,    // 2nd voice from top dropped an octave
    Drop3,    // 3rd voice from top dropped an octave
    RootBass, // Root doubled an octave below
}

/// Re-voice a chord for playback. The result is sorted low to high.
pub fn apply_voicing(notes: &[Note], root: PitchClass, voicing: Voicing) -> Vec<Note> {
    let mut notes = notes.to_vec();
    match voicing {
        Voicing::Close => return notes,
        Voicing::Open => {
            for (i, note) in notes.iter_mut().enumerate() {
                if i % 2 == 1 {
                    *note = note.shift_octaves(1);
                }
            }
        }
        Voicing::Drop2 => {
            if notes.len() >= 2 {
                let idx = notes.len() - 2;
                notes[idx] = notes[idx].shift_octaves(-1);
            }
        }
        Voicing::Drop3 => {
            if notes.len() >= 3 {
                let idx = notes.len() - 3;
                notes[idx] = notes[idx].shift_octaves(-1);
            }
        }
        Voicing::RootBass => {
            let lowest = notes.iter().map(Note::midi).min().unwrap_or(60);
            let mut bass = Note::new(root, (lowest.div_euclid(12) - 1) as i8);
            while bass.midi() >= lowest {
                bass = bass.shift_octaves(-1);
            }
            notes.push(bass);
        }
    }
    notes.sort_by_key(Note::midi);
    notes
}
