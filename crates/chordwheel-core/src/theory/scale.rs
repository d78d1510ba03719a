//! Keys, diatonic scales and modal rotations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::chord::{Chord, ChordQuality};
use super::pitch::{PitchClass, Spelling};

/// Seven pitch classes of a diatonic scale, tonic first
pub type Scale = [PitchClass; 7];

const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Major or minor key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

/// Church modes, in order of the major-scale degree they start on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Self::Ionian,
        Self::Dorian,
        Self::Phrygian,
        Self::Lydian,
        Self::Mixolydian,
        Self::Aeolian,
        Self::Locrian,
    ];

    /// Degree of the parent major scale this mode starts on (0-6)
    pub fn degree_index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ionian => "Ionian",
            Self::Dorian => "Dorian",
            Self::Phrygian => "Phrygian",
            Self::Lydian => "Lydian",
            Self::Mixolydian => "Mixolydian",
            Self::Aeolian => "Aeolian",
            Self::Locrian => "Locrian",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        let lower = name.trim().to_lowercase();
        match lower.as_str() {
            "major" => Some(Self::Ionian),
            "minor" => Some(Self::Aeolian),
            _ => Self::ALL.into_iter().find(|m| m.name().to_lowercase() == lower),
        }
    }
}

/// Tonal frame for numerals and scale derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: PitchClass,
    #[serde(default)]
    pub mode: KeyMode,
}

impl Default for Key {
    fn default() -> Self {
        Self::major(PitchClass::C)
    }
}

impl Key {
    pub fn new(root: PitchClass, mode: KeyMode) -> Self {
        Self { root, mode }
    }

    pub fn major(root: PitchClass) -> Self {
        Self::new(root, KeyMode::Major)
    }

    pub fn minor(root: PitchClass) -> Self {
        Self::new(root, KeyMode::Minor)
    }

    /// Whether black keys in this key read better as flats.
    ///
    /// Flat keys: F Bb Eb Ab Db (Gb) major, and their relative minors.
    pub fn spelling(&self) -> Spelling {
        let relative_major = match self.mode {
            KeyMode::Major => self.root,
            KeyMode::Minor => self.root.transpose(3),
        };
        match relative_major {
            PitchClass::F
            | PitchClass::Bb
            | PitchClass::Eb
            | PitchClass::Ab
            | PitchClass::Db => Spelling::Flat,
            _ => Spelling::Sharp,
        }
    }

    /// Quality of the tonic triad
    pub fn tonic_quality(&self) -> ChordQuality {
        match self.mode {
            KeyMode::Major => ChordQuality::Major,
            KeyMode::Minor => ChordQuality::Minor,
        }
    }

    pub fn scale(&self) -> Scale {
        diatonic_scale(self)
    }

    /// Same mode, root moved by `semitones`
    pub fn transposed(&self, semitones: i32) -> Self {
        Self::new(self.root.transpose(semitones), self.mode)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        };
        write!(f, "{} {}", self.root.spelled(self.spelling()), mode)
    }
}

/// Major scale built on `root`
pub fn major_scale(root: PitchClass) -> Scale {
    MAJOR_STEPS.map(|step| root.transpose(step as i32))
}

/// Rotate a scale so it starts on the mode's degree
pub fn modal_rotation(scale: &Scale, mode: Mode) -> Scale {
    let mut rotated = *scale;
    rotated.rotate_left(mode.degree_index());
    rotated
}

/// Mode built on `tonic`, e.g. D Dorian = D E F G A B C
pub fn mode_scale(tonic: PitchClass, mode: Mode) -> Scale {
    let parent = tonic.transpose(-(MAJOR_STEPS[mode.degree_index()] as i32));
    modal_rotation(&major_scale(parent), mode)
}

/// Diatonic scale of a key; minor keys use natural minor (Aeolian)
pub fn diatonic_scale(key: &Key) -> Scale {
    match key.mode {
        KeyMode::Major => major_scale(key.root),
        KeyMode::Minor => mode_scale(key.root, Mode::Aeolian),
    }
}

/// Quality of the chord stacked in thirds on scale degree `degree` (0-6).
pub fn diatonic_quality(scale: &Scale, degree: usize, seventh: bool) -> ChordQuality {
    let root = scale[degree % 7];
    let interval = |steps: usize| {
        let target = scale[(degree + steps) % 7];
        (target.semitone() as i32 - root.semitone() as i32).rem_euclid(12)
    };
    let (third, fifth) = (interval(2), interval(4));
    if !seventh {
        return match (third, fifth) {
            (4, 7) => ChordQuality::Major,
            (3, 7) => ChordQuality::Minor,
            (3, 6) => ChordQuality::Diminished,
            (4, 8) => ChordQuality::Augmented,
            _ => ChordQuality::Major,
        };
    }
    match (third, fifth, interval(6)) {
        (4, 7, 11) => ChordQuality::Major7,
        (4, 7, 10) => ChordQuality::Dominant7,
        (3, 7, 10) => ChordQuality::Minor7,
        (3, 7, 11) => ChordQuality::MinorMajor7,
        (3, 6, 10) => ChordQuality::HalfDiminished7,
        (3, 6, 9) => ChordQuality::Diminished7,
        (4, 8, 10) => ChordQuality::Augmented7,
        _ => ChordQuality::Dominant7,
    }
}

/// The seven diatonic triads (or seventh chords) of a key
pub fn diatonic_chords(key: &Key, sevenths: bool) -> Vec<Chord> {
    let scale = diatonic_scale(key);
    (0..7)
        .map(|degree| Chord::new(scale[degree], diatonic_quality(&scale, degree, sevenths)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use PitchClass::*;

    #[test]
    fn test_major_scales() {
        assert_eq!(major_scale(C), [C, D, E, F, G, A, B]);
        assert_eq!(major_scale(Eb), [Eb, F, G, Ab, Bb, C, D]);
    }

    #[test]
    fn test_modal_rotation_starts_on_degree() {
        let c_major = major_scale(C);
        assert_eq!(modal_rotation(&c_major, Mode::Dorian), [D, E, F, G, A, B, C]);
        assert_eq!(modal_rotation(&c_major, Mode::Locrian), [B, C, D, E, F, G, A]);
        assert_eq!(modal_rotation(&c_major, Mode::Ionian), c_major);
    }

    #[test]
    fn test_mode_scale_on_tonic() {
        assert_eq!(mode_scale(D, Mode::Dorian), [D, E, F, G, A, B, C]);
        assert_eq!(mode_scale(F, Mode::Lydian), [F, G, A, B, C, D, E]);
        assert_eq!(mode_scale(A, Mode::Aeolian), diatonic_scale(&Key::minor(A)));
    }

    #[test]
    fn test_diatonic_chords() {
        let triads: Vec<String> = diatonic_chords(&Key::major(C), false)
            .into_iter()
            .map(|c| c.symbol)
            .collect();
        assert_eq!(triads, vec!["C", "Dm", "Em", "F", "G", "Am", "Bdim"]);

        let sevenths: Vec<ChordQuality> = diatonic_chords(&Key::minor(A), true)
            .into_iter()
            .map(|c| c.quality)
            .collect();
        assert_eq!(sevenths[0], ChordQuality::Minor7);
        assert_eq!(sevenths[1], ChordQuality::HalfDiminished7);
        assert_eq!(sevenths[2], ChordQuality::Major7);
        assert_eq!(sevenths[6], ChordQuality::Dominant7);
    }

    #[test]
    fn test_key_spelling() {
        assert_eq!(Key::major(F).spelling(), Spelling::Flat);
        assert_eq!(Key::minor(D).spelling(), Spelling::Flat);
        assert_eq!(Key::major(E).spelling(), Spelling::Sharp);
        assert_eq!(Key::major(Db).to_string(), "Db major");
        assert_eq!(Key::minor(C).to_string(), "C minor");
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::from_name("dorian"), Some(Mode::Dorian));
        assert_eq!(Mode::from_name("Minor"), Some(Mode::Aeolian));
        assert_eq!(Mode::from_name("bogus"), None);
    }
}
