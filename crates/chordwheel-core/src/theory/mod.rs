//! Music-theory engine: pure queries over pitch classes, chords, keys and
//! numerals. Nothing here holds state, and the lenient entry points never
//! fail on malformed input.

mod chord;
mod color;
mod display;
mod pitch;
mod roman;
mod scale;
mod voicing;

pub use chord::{apply_voicing, get_chord_notes, invert_chord, Chord, ChordQuality, Voicing};
pub use color::{contrasting_text_color, wheel_color, wheel_colors, Color};
pub use display::format_chord_for_display;
pub use pitch::{normalize_note, parse_note, Note, PitchClass, Spelling, BASE_OCTAVE};
pub use roman::{chord_to_numeral, numeral_to_chord, parse_numeral, RomanNumeral};
pub use scale::{
    diatonic_chords, diatonic_quality, diatonic_scale, major_scale, modal_rotation, mode_scale,
    Key, KeyMode, Mode, Scale,
};
pub use voicing::{parse_voicing_suggestions, VoicingOption};
