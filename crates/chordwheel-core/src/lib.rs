//! chordwheel-core: music theory and song timeline editing for the chord wheel
//!
//! ```
//! use chordwheel_core::{normalize_note, PitchClass};
//!
//! assert_eq!(normalize_note("f♯"), PitchClass::FSharp);
//! assert_eq!(normalize_note(normalize_note("Gb").name()), PitchClass::FSharp);
//! ```

mod config;
pub mod editor;
mod error;
mod gesture;
mod history;
mod instrument;
mod selection;
mod session;
pub mod song;
pub mod theory;
mod transport;

pub use config::SessionConfig;
pub use editor::{apply, reduce, suggest_next_section, EditCommand};
pub use error::{ChordwheelError, Result};
pub use gesture::{EditIntent, TapDetector, TapEvent, TapState, DEFAULT_DOUBLE_TAP_MS};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use instrument::{BuiltinInstrument, Instrument};
pub use selection::Selection;
pub use session::Session;
pub use song::{
    ChordSlot, Measure, MeasureId, Section, SectionId, SectionType, SlotId, SlotRef, Song,
    TimeSignature,
};
pub use theory::{
    apply_voicing, chord_to_numeral, contrasting_text_color, diatonic_chords, diatonic_quality,
    diatonic_scale, format_chord_for_display, get_chord_notes, invert_chord, major_scale,
    modal_rotation, mode_scale, normalize_note, numeral_to_chord, parse_note, parse_numeral,
    parse_voicing_suggestions, wheel_color, wheel_colors, Chord, ChordQuality, Color, Key,
    KeyMode, Mode, Note, PitchClass, RomanNumeral, Scale, Spelling, Voicing, VoicingOption,
    BASE_OCTAVE,
};
pub use transport::{LoopMode, Transport, TransportState};
