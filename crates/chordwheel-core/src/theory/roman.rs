//! Roman numeral analysis: numeral ↔ chord within a key

use serde::{Deserialize, Serialize};

use super::chord::{Chord, ChordQuality};
use super::scale::{diatonic_scale, Key};
use crate::error::{ChordwheelError, Result};

const DEGREE_LETTERS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Parsed roman numeral, independent of any key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomanNumeral {
    /// Chromatic alteration of the degree root (`bVII` = -1)
    pub accidental: i8,
    /// Scale degree, 1-7
    pub degree: u8,
    pub quality: ChordQuality,
}

#[derive(Clone, Copy, PartialEq)]
enum Family {
    Major,
    Minor,
    Diminished,
    HalfDiminished,
    Augmented,
}

impl RomanNumeral {
    /// Resolve against a key's diatonic scale
    pub fn to_chord(&self, key: &Key) -> Chord {
        let scale = diatonic_scale(key);
        let root = scale[(self.degree as usize + 6) % 7].transpose(self.accidental as i32);
        Chord::new(root, self.quality)
    }
}

/// Strictly parse a numeral such as `"V7"`, `"ii"`, `"vii°"`, `"bVIImaj7"`.
pub fn parse_numeral(numeral: &str) -> Result<RomanNumeral> {
    let invalid = || ChordwheelError::InvalidNumeral(numeral.to_string());
    let mut rest = numeral.trim();

    let mut accidental: i8 = 0;
    loop {
        let Some(ch) = rest.chars().next() else { break };
        let delta = match ch {
            'b' | '♭' => -1,
            '#' | '♯' => 1,
            _ => break,
        };
        accidental = accidental.checked_add(delta).ok_or_else(invalid)?;
        rest = &rest[ch.len_utf8()..];
    }

    let letters_len = rest
        .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
        .unwrap_or(rest.len());
    let (letters, suffix) = rest.split_at(letters_len);
    if letters.is_empty() {
        return Err(invalid());
    }
    let upper = letters.chars().all(|c| c.is_ascii_uppercase());
    let lower = letters.chars().all(|c| c.is_ascii_lowercase());
    if !upper && !lower {
        return Err(invalid());
    }
    let degree = DEGREE_LETTERS
        .iter()
        .position(|d| d.eq_ignore_ascii_case(letters))
        .ok_or_else(invalid)? as u8
        + 1;

    let (family, extension) = split_alteration(suffix, upper);
    let quality = quality_for(family, extension).ok_or_else(invalid)?;

    Ok(RomanNumeral {
        accidental,
        degree,
        quality,
    })
}

fn split_alteration(suffix: &str, upper: bool) -> (Family, &str) {
    for (marker, family) in [
        ("dim", Family::Diminished),
        ("°", Family::Diminished),
        ("o", Family::Diminished),
        ("ø", Family::HalfDiminished),
        ("aug", Family::Augmented),
        ("+", Family::Augmented),
    ] {
        if let Some(ext) = suffix.strip_prefix(marker) {
            return (family, ext);
        }
    }
    let family = if upper { Family::Major } else { Family::Minor };
    (family, suffix)
}

fn quality_for(family: Family, extension: &str) -> Option<ChordQuality> {
    use ChordQuality as Q;
    let quality = match (family, extension) {
        (Family::Major, "") => Q::Major,
        (Family::Major, "7") => Q::Dominant7,
        (Family::Major, "9") => Q::Dominant9,
        (Family::Major, "11") => Q::Dominant11,
        (Family::Major, "13") => Q::Dominant13,
        (Family::Major, "6") => Q::Major6,
        (Family::Major, "6/9") => Q::SixNine,
        (Family::Major, "add9") => Q::Add9,
        (Family::Major, "maj7" | "M7" | "Δ" | "Δ7") => Q::Major7,
        (Family::Major, "maj9" | "M9") => Q::Major9,
        (Family::Major, "maj13" | "M13") => Q::Major13,
        (Family::Major, "sus2") => Q::Sus2,
        (Family::Major, "sus4" | "sus") => Q::Sus4,
        (Family::Major, "7sus4" | "7sus") => Q::Dominant7Sus4,
        (Family::Minor, "") => Q::Minor,
        (Family::Minor, "7") => Q::Minor7,
        (Family::Minor, "9") => Q::Minor9,
        (Family::Minor, "11") => Q::Minor11,
        (Family::Minor, "13") => Q::Minor13,
        (Family::Minor, "6") => Q::Minor6,
        (Family::Minor, "maj7" | "M7") => Q::MinorMajor7,
        (Family::Diminished, "") => Q::Diminished,
        (Family::Diminished, "7") => Q::Diminished7,
        (Family::HalfDiminished, "" | "7") => Q::HalfDiminished7,
        (Family::Augmented, "") => Q::Augmented,
        (Family::Augmented, "7") => Q::Augmented7,
        _ => return None,
    };
    Some(quality)
}

/// Resolve a numeral to a chord in `key`.
///
/// Malformed numerals fall back to the tonic chord of the key.
pub fn numeral_to_chord(numeral: &str, key: &Key) -> Chord {
    match parse_numeral(numeral) {
        Ok(parsed) => parsed.to_chord(key),
        Err(err) => {
            tracing::debug!(%err, %key, "falling back to tonic chord");
            Chord::new(key.root, key.tonic_quality())
        }
    }
}

/// Numeral for a chord in `key`, or `None` when its root is not a scale degree.
pub fn chord_to_numeral(chord: &Chord, key: &Key) -> Option<String> {
    use ChordQuality as Q;
    let scale = diatonic_scale(key);
    let degree = scale.iter().position(|pc| *pc == chord.root)?;

    let upper = !matches!(chord.quality.triad(), Q::Minor | Q::Diminished);
    let letters = DEGREE_LETTERS[degree];
    let letters = if upper {
        letters.to_string()
    } else {
        letters.to_lowercase()
    };

    let suffix = match chord.quality {
        Q::Major | Q::Minor => "",
        Q::Diminished => "°",
        Q::Augmented => "+",
        Q::Sus2 => "sus2",
        Q::Sus4 => "sus4",
        Q::Dominant7Sus4 => "7sus4",
        Q::Major6 | Q::Minor6 => "6",
        Q::SixNine => "6/9",
        Q::Add9 => "add9",
        Q::Dominant7 | Q::Minor7 => "7",
        Q::Major7 | Q::MinorMajor7 => "maj7",
        Q::Diminished7 => "°7",
        Q::HalfDiminished7 => "ø7",
        Q::Augmented7 => "+7",
        Q::Dominant9 | Q::Minor9 => "9",
        Q::Major9 => "maj9",
        Q::Dominant11 | Q::Minor11 => "11",
        Q::Dominant13 | Q::Minor13 => "13",
        Q::Major13 => "maj13",
    };
    Some(format!("{letters}{suffix}"))
}
