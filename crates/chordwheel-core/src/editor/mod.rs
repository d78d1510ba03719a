//! Timeline editor: commands over the song document
//!
//! Every command is a pure transition `(&Song, &EditCommand) -> Song`.
//! Commands that target stale ids or out-of-range values leave the document
//! untouched instead of failing, since the UI that issues them may lag
//! behind the document.

mod ops;
mod suggest;

use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;
use crate::song::{MeasureId, SectionId, SectionType, SlotRef, Song, TimeSignature};
use crate::theory::{Chord, Key};

pub use suggest::suggest_next_section;

/// Edit commands issued against the song document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum EditCommand {
    SetSectionMeasures { section: SectionId, count: usize },
    SetSectionSubdivision { section: SectionId, steps: u8 },
    SetMeasureSubdivision { section: SectionId, measure: MeasureId, steps: u8 },
    SetSectionTimeSignature { section: SectionId, time_signature: Option<TimeSignature> },
    ReorderSections { order: Vec<SectionId> },
    DuplicateSection { section: SectionId },
    RemoveSection { section: SectionId },
    ClearSection { section: SectionId },
    ClearSlot { slot: SlotRef },
    AddSuggestedSection,
    MoveChord { from: SlotRef, to: SlotRef },
    AddSection { section_type: SectionType },
    RenameSection { section: SectionId, name: String },
    SetSlotChord { slot: SlotRef, chord: Option<Chord> },
    SetTitle(String),
    SetTempo(u16),
    SetKey(Key),
    SetTimeSignature(TimeSignature),
    SetInstrument(Instrument),
    TransposeSong { semitones: i32 },
}

/// Apply a command, returning `None` when it leaves the document unchanged
pub fn apply(song: &Song, command: &EditCommand) -> Option<Song> {
    let mut next = song.clone();

    let applied = match command {
        EditCommand::SetSectionMeasures { section, count } => {
            ops::set_section_measures(&mut next, *section, *count)
        }
        EditCommand::SetSectionSubdivision { section, steps } => {
            ops::set_section_subdivision(&mut next, *section, *steps)
        }
        EditCommand::SetMeasureSubdivision { section, measure, steps } => {
            ops::set_measure_subdivision(&mut next, *section, *measure, *steps)
        }
        EditCommand::SetSectionTimeSignature { section, time_signature } => {
            ops::set_section_time_signature(&mut next, *section, *time_signature)
        }
        EditCommand::ReorderSections { order } => ops::reorder_sections(&mut next, order),
        EditCommand::DuplicateSection { section } => ops::duplicate_section(&mut next, *section),
        EditCommand::RemoveSection { section } => ops::remove_section(&mut next, *section),
        EditCommand::ClearSection { section } => ops::clear_section(&mut next, *section),
        EditCommand::ClearSlot { slot } => ops::set_slot_chord(&mut next, *slot, None),
        EditCommand::AddSuggestedSection => {
            let types: Vec<SectionType> = next.sections.iter().map(|s| s.section_type).collect();
            ops::add_section(&mut next, suggest_next_section(&types))
        }
        EditCommand::MoveChord { from, to } => ops::move_chord(&mut next, *from, *to),
        EditCommand::AddSection { section_type } => ops::add_section(&mut next, *section_type),
        EditCommand::RenameSection { section, name } => {
            ops::rename_section(&mut next, *section, name)
        }
        EditCommand::SetSlotChord { slot, chord } => {
            ops::set_slot_chord(&mut next, *slot, chord.clone())
        }
        EditCommand::SetTitle(title) => {
            next.title = title.trim().to_string();
            Some(())
        }
        EditCommand::SetTempo(bpm) => {
            next.tempo = (*bpm).clamp(crate::song::MIN_TEMPO, crate::song::MAX_TEMPO);
            Some(())
        }
        EditCommand::SetKey(key) => {
            next.key = *key;
            Some(())
        }
        EditCommand::SetTimeSignature(ts) => ops::set_time_signature(&mut next, *ts),
        EditCommand::SetInstrument(instrument) => {
            next.instrument = instrument.clone();
            Some(())
        }
        EditCommand::TransposeSong { semitones } => ops::transpose_song(&mut next, *semitones),
    };

    match applied {
        Some(()) if next != *song => {
            tracing::trace!("Applied {:?}", command);
            Some(next)
        }
        _ => {
            tracing::debug!("Ignored {:?}: no change to the document", command);
            None
        }
    }
}

/// Apply a command, handing back the unchanged document on a no-op
pub fn reduce(song: &Song, command: &EditCommand) -> Song {
    apply(song, command).unwrap_or_else(|| song.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{SectionId, SlotId};
    use crate::theory::{ChordQuality, PitchClass};

    fn chord(root: PitchClass, quality: ChordQuality) -> Chord {
        Chord::new(root, quality)
    }

    fn verse(song: &Song) -> SectionId {
        song.sections[0].id
    }

    fn slot_at(song: &Song, section: usize, measure: usize, beat: usize) -> SlotRef {
        let s = &song.sections[section];
        SlotRef::new(s.id, s.measures[measure].beats[beat].id)
    }

    fn place(song: &Song, at: SlotRef, c: Chord) -> Song {
        reduce(song, &EditCommand::SetSlotChord { slot: at, chord: Some(c) })
    }

    #[test]
    fn test_measure_count_clamped_and_round_trips() {
        let song = Song::default();
        let id = verse(&song);

        let grown = reduce(&song, &EditCommand::SetSectionMeasures { section: id, count: 99 });
        assert_eq!(grown.sections[0].measures.len(), 32);
        assert!(grown.sections[0].measures.iter().all(|m| m.beats.len() == 4));

        let shrunk = reduce(&grown, &EditCommand::SetSectionMeasures { section: id, count: 0 });
        assert_eq!(shrunk.sections[0].measures.len(), 1);

        let restored = reduce(&shrunk, &EditCommand::SetSectionMeasures { section: id, count: 4 });
        let section = &restored.sections[0];
        assert_eq!(section.measures.len(), 4);
        assert!(section.measures.iter().all(|m| m.beats.len() == 4));
        assert!(section.is_empty());
    }

    #[test]
    fn test_shrinking_measures_discards_chords() {
        let song = Song::default();
        let at = slot_at(&song, 0, 3, 0);
        let song = place(&song, at, chord(PitchClass::G, ChordQuality::Major));
        let shrunk = reduce(
            &song,
            &EditCommand::SetSectionMeasures { section: verse(&song), count: 2 },
        );
        assert!(shrunk.chord_at(at).is_none());
        assert_eq!(shrunk.sections[0].chord_count(), 0);
    }

    #[test]
    fn test_subdivision_halving_keeps_bucket_heads() {
        let song = Song::default();
        let id = verse(&song);
        // measure 2: chords on beats 1, 2 and 4, beat 3 empty
        let song = place(&song, slot_at(&song, 0, 1, 0), chord(PitchClass::C, ChordQuality::Major));
        let song = place(&song, slot_at(&song, 0, 1, 1), chord(PitchClass::D, ChordQuality::Minor));
        let song = place(&song, slot_at(&song, 0, 1, 3), chord(PitchClass::F, ChordQuality::Major));

        let halved = reduce(&song, &EditCommand::SetSectionSubdivision { section: id, steps: 2 });
        let measure = &halved.sections[0].measures[1];
        assert_eq!(measure.beats.len(), 2);
        assert_eq!(measure.beats[0].chord.as_ref().map(|c| c.root), Some(PitchClass::C));
        assert!(measure.beats[1].chord.is_none());
        assert!(halved.sections[0].slots().all(|s| s.duration == 2.0));
        assert_eq!(halved.sections[0].subdivision, 2);
    }

    #[test]
    fn test_subdivision_growth_spreads_chords() {
        let song = Song::default();
        let id = verse(&song);
        let song = place(&song, slot_at(&song, 0, 0, 1), chord(PitchClass::A, ChordQuality::Minor));
        let doubled = reduce(&song, &EditCommand::SetSectionSubdivision { section: id, steps: 8 });
        let beats = &doubled.sections[0].measures[0].beats;
        assert_eq!(beats.len(), 8);
        assert_eq!(beats[2].chord.as_ref().map(|c| c.root), Some(PitchClass::A));
        assert_eq!(doubled.sections[0].chord_count(), 1);
        assert_eq!(beats[0].duration, 0.5);
    }

    #[test]
    fn test_invalid_subdivision_is_noop() {
        let song = Song::default();
        let id = verse(&song);
        let odd = EditCommand::SetSectionSubdivision { section: id, steps: 3 };
        assert!(apply(&song, &odd).is_none());
        let missing = EditCommand::SetSectionSubdivision { section: SectionId(999), steps: 2 };
        assert!(apply(&song, &missing).is_none());
    }

    #[test]
    fn test_measure_subdivision_only_touches_one_measure() {
        let song = Song::default();
        let id = verse(&song);
        let measure = song.sections[0].measures[2].id;
        let next = reduce(
            &song,
            &EditCommand::SetMeasureSubdivision { section: id, measure, steps: 8 },
        );
        let lens: Vec<usize> = next.sections[0].measures.iter().map(|m| m.beats.len()).collect();
        assert_eq!(lens, vec![4, 4, 8, 4]);
        assert_eq!(next.sections[0].subdivision, 4);
    }

    #[test]
    fn test_section_time_signature_override() {
        let song = Song::default();
        let id = verse(&song);
        let waltz = TimeSignature::new(3, 4).unwrap();
        let next = reduce(
            &song,
            &EditCommand::SetSectionTimeSignature { section: id, time_signature: Some(waltz) },
        );
        assert_eq!(next.sections[0].time_signature, Some(waltz));
        // subdivision is left for the next subdivision command
        assert_eq!(next.sections[0].measures[0].beats.len(), 4);
        assert!(next.sections[0].slots().all(|s| s.duration == 0.75));

        let same = EditCommand::SetSectionSubdivision { section: id, steps: 4 };
        assert!(apply(&next, &same).is_none());
        let tripled = reduce(&next, &EditCommand::SetSectionSubdivision { section: id, steps: 3 });
        assert!(tripled.sections[0].slots().all(|s| s.duration == 1.0));
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let song = Song::default();
        let song = reduce(&song, &EditCommand::AddSection { section_type: SectionType::Chorus });
        let song = reduce(&song, &EditCommand::AddSection { section_type: SectionType::Bridge });
        let ids = song.section_ids();

        let reversed: Vec<SectionId> = ids.iter().rev().copied().collect();
        let next = reduce(&song, &EditCommand::ReorderSections { order: reversed.clone() });
        assert_eq!(next.section_ids(), reversed);

        let mut sorted_before = ids.clone();
        let mut sorted_after = next.section_ids();
        sorted_before.sort();
        sorted_after.sort();
        assert_eq!(sorted_before, sorted_after);

        let duplicate = vec![ids[0], ids[0], ids[1]];
        assert!(apply(&song, &EditCommand::ReorderSections { order: duplicate }).is_none());
        let short = vec![ids[0], ids[1]];
        assert!(apply(&song, &EditCommand::ReorderSections { order: short }).is_none());
        let foreign = vec![ids[0], ids[1], SectionId(4242)];
        assert!(apply(&song, &EditCommand::ReorderSections { order: foreign }).is_none());
    }

    #[test]
    fn test_duplicate_section_gets_fresh_ids() {
        let song = Song::default();
        let at = slot_at(&song, 0, 0, 0);
        let song = place(&song, at, chord(PitchClass::E, ChordQuality::Minor7));
        let next = reduce(&song, &EditCommand::DuplicateSection { section: verse(&song) });

        assert_eq!(next.sections.len(), 2);
        let (original, copy) = (&next.sections[0], &next.sections[1]);
        assert_ne!(original.id, copy.id);
        assert_eq!(copy.chord_count(), 1);
        assert_eq!(copy.measures[0].beats[0].chord, original.measures[0].beats[0].chord);
        assert!(copy.slots().all(|s| original.slot(s.id).is_none()));
    }

    #[test]
    fn test_remove_keeps_last_section() {
        let song = Song::default();
        assert!(apply(&song, &EditCommand::RemoveSection { section: verse(&song) }).is_none());

        let song = reduce(&song, &EditCommand::AddSection { section_type: SectionType::Chorus });
        let next = reduce(&song, &EditCommand::RemoveSection { section: verse(&song) });
        assert_eq!(next.sections.len(), 1);
        assert_eq!(next.sections[0].section_type, SectionType::Chorus);
    }

    #[test]
    fn test_clear_section_and_slot() {
        let song = Song::default();
        let a = slot_at(&song, 0, 0, 0);
        let b = slot_at(&song, 0, 2, 1);
        let song = place(&song, a, chord(PitchClass::C, ChordQuality::Major));
        let song = place(&song, b, chord(PitchClass::G, ChordQuality::Major));

        let one = reduce(&song, &EditCommand::ClearSlot { slot: a });
        assert!(one.chord_at(a).is_none());
        assert!(one.chord_at(b).is_some());

        let none = reduce(&song, &EditCommand::ClearSection { section: verse(&song) });
        assert!(none.sections[0].is_empty());
        assert_eq!(none.sections[0].measures.len(), 4);

        // clearing an empty section changes nothing
        assert!(apply(&none, &EditCommand::ClearSection { section: verse(&song) }).is_none());
    }

    #[test]
    fn test_move_chord_swap_is_self_inverse() {
        let song = Song::default();
        let a = slot_at(&song, 0, 0, 0);
        let b = slot_at(&song, 0, 1, 2);
        let song = place(&song, a, chord(PitchClass::C, ChordQuality::Major));
        let song = place(&song, b, chord(PitchClass::A, ChordQuality::Minor));

        let swap = EditCommand::MoveChord { from: a, to: b };
        let once = reduce(&song, &swap);
        assert_eq!(once.chord_at(a).map(|c| c.root), Some(PitchClass::A));
        assert_eq!(once.chord_at(b).map(|c| c.root), Some(PitchClass::C));

        let twice = reduce(&once, &swap);
        assert_eq!(twice, song);
    }

    #[test]
    fn test_move_chord_into_empty_slot() {
        let song = Song::default();
        let a = slot_at(&song, 0, 0, 0);
        let b = slot_at(&song, 0, 3, 3);
        let song = place(&song, a, chord(PitchClass::F, ChordQuality::Major7));

        let moved = reduce(&song, &EditCommand::MoveChord { from: a, to: b });
        assert!(moved.chord_at(a).is_none());
        assert_eq!(moved.chord_at(b).map(|c| c.quality), Some(ChordQuality::Major7));

        assert!(apply(&song, &EditCommand::MoveChord { from: a, to: a }).is_none());
        let stale = SlotRef::new(verse(&song), SlotId(9999));
        assert!(apply(&song, &EditCommand::MoveChord { from: a, to: stale }).is_none());
    }

    #[test]
    fn test_add_suggested_section_appends() {
        let song = Song::default();
        let next = reduce(&song, &EditCommand::AddSuggestedSection);
        assert_eq!(next.sections.len(), 2);
        assert_eq!(next.sections[1].section_type, SectionType::Chorus);
        assert_eq!(next.sections[1].name, "Chorus");
    }

    #[test]
    fn test_song_level_settings() {
        let song = Song::default();
        assert_eq!(reduce(&song, &EditCommand::SetTempo(1000)).tempo, 300);
        assert_eq!(reduce(&song, &EditCommand::SetTempo(5)).tempo, 20);
        assert_eq!(reduce(&song, &EditCommand::SetTitle("  Hey  ".into())).title, "Hey");
        assert!(apply(&song, &EditCommand::SetTempo(song.tempo)).is_none());

        let six_eight = TimeSignature::new(6, 8).unwrap();
        let next = reduce(&song, &EditCommand::SetTimeSignature(six_eight));
        assert_eq!(next.time_signature, six_eight);
        assert!(next.sections[0].slots().all(|s| s.duration == 1.5));
    }

    #[test]
    fn test_transpose_moves_key_and_chords() {
        let song = Song::default();
        let at = slot_at(&song, 0, 0, 0);
        let song = place(&song, at, chord(PitchClass::C, ChordQuality::Major7));
        let up = reduce(&song, &EditCommand::TransposeSong { semitones: 2 });
        assert_eq!(up.key.root, PitchClass::D);
        let moved = up.chord_at(at).unwrap();
        assert_eq!(moved.root, PitchClass::D);
        assert_eq!(moved.symbol, "Dmaj7");

        assert!(apply(&song, &EditCommand::TransposeSong { semitones: 12 }).is_none());
    }

    #[test]
    fn test_transpose_by_extreme_offset_wraps() {
        let song = reduce(&Song::default(), &EditCommand::SetKey(Key::major(PitchClass::G)));
        let next = reduce(&song, &EditCommand::TransposeSong { semitones: i32::MAX });
        assert_eq!(next.key, Key::major(PitchClass::D));
        let back = reduce(&next, &EditCommand::TransposeSong { semitones: i32::MIN });
        assert_eq!(back.key.root, PitchClass::FSharp);
    }

    #[test]
    fn test_rename_rejects_blank() {
        let song = Song::default();
        let id = verse(&song);
        let rename = EditCommand::RenameSection { section: id, name: "Verse A".into() };
        assert_eq!(reduce(&song, &rename).sections[0].name, "Verse A");
        let blank = EditCommand::RenameSection { section: id, name: "   ".into() };
        assert!(apply(&song, &blank).is_none());
    }

    #[test]
    fn test_placed_chord_is_rederived() {
        let song = Song::default();
        let at = slot_at(&song, 0, 0, 0);
        let forged = Chord {
            root: PitchClass::C,
            quality: ChordQuality::Major,
            notes: Vec::new(),
            symbol: "X".into(),
            inversion: 7,
        };
        let next = reduce(&song, &EditCommand::SetSlotChord { slot: at, chord: Some(forged) });
        let stored = next.chord_at(at).unwrap();
        assert_eq!(stored, &Chord::with_inversion(PitchClass::C, ChordQuality::Major, 1));
        assert_eq!(stored.symbol, "C/E");
        assert_eq!(stored.notes.len(), 3);
    }
}
