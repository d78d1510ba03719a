//! Structural edits on a mutable working copy of the song.
//!
//! Each op returns `None` when its target does not resolve or its argument is
//! out of range; the caller then discards the working copy.

use std::collections::HashSet;

use crate::song::{
    ChordSlot, MeasureId, SectionId, SectionType, SlotId, SlotRef, Song, TimeSignature,
    DEFAULT_SECTION_MEASURES, MAX_MEASURES, MIN_MEASURES,
};
use crate::theory::Chord;

pub(super) fn set_section_measures(
    song: &mut Song,
    section: SectionId,
    count: usize,
) -> Option<()> {
    let index = song.section_index(section)?;
    let count = count.clamp(MIN_MEASURES, MAX_MEASURES);

    let current = song.sections[index].measures.len();
    if count <= current {
        song.sections[index].measures.truncate(count);
        return Some(());
    }

    let steps = song.sections[index].subdivision;
    let meter = song.effective_time_signature(&song.sections[index]);
    let duration = meter.slot_duration(steps);
    let added: Vec<_> = (current..count)
        .map(|_| song.new_measure(steps, duration))
        .collect();
    song.sections[index].measures.extend(added);
    Some(())
}

pub(super) fn set_section_subdivision(
    song: &mut Song,
    section: SectionId,
    steps: u8,
) -> Option<()> {
    let index = song.section_index(section)?;
    let meter = song.effective_time_signature(&song.sections[index]);
    if !meter.allows_subdivision(steps) {
        tracing::debug!("Subdivision {} not allowed in {}", steps, meter);
        return None;
    }

    let duration = meter.slot_duration(steps);
    for m in 0..song.sections[index].measures.len() {
        let old = std::mem::take(&mut song.sections[index].measures[m].beats);
        let beats = resample(song, old, steps as usize, duration);
        song.sections[index].measures[m].beats = beats;
    }
    song.sections[index].subdivision = steps;
    Some(())
}

pub(super) fn set_measure_subdivision(
    song: &mut Song,
    section: SectionId,
    measure: MeasureId,
    steps: u8,
) -> Option<()> {
    let index = song.section_index(section)?;
    let target = &song.sections[index];
    let meter = song.effective_time_signature(target);
    let m = target.measures.iter().position(|x| x.id == measure)?;
    if !meter.allows_subdivision(steps) {
        tracing::debug!("Subdivision {} not allowed in {}", steps, meter);
        return None;
    }

    let old = std::mem::take(&mut song.sections[index].measures[m].beats);
    let beats = resample(song, old, steps as usize, meter.slot_duration(steps));
    song.sections[index].measures[m].beats = beats;
    Some(())
}

/// Rebuild a measure's slots at a new length.
///
/// Shrinking `n -> m` keeps, for each new bucket `j`, the slot at old index
/// `j * n / m` and drops the rest. Growing places old slot `i` at new index
/// `i * m / n` and fills the gaps with empty slots. Surviving slots keep
/// their ids.
fn resample(song: &mut Song, old: Vec<ChordSlot>, steps: usize, duration: f32) -> Vec<ChordSlot> {
    let n = old.len();
    if n == 0 {
        return (0..steps).map(|_| empty_slot(song, duration)).collect();
    }

    let mut slots: Vec<Option<ChordSlot>> = (0..steps).map(|_| None).collect();
    if steps <= n {
        let mut old: Vec<Option<ChordSlot>> = old.into_iter().map(Some).collect();
        for (j, slot) in slots.iter_mut().enumerate() {
            *slot = old[j * n / steps].take();
        }
    } else {
        for (i, slot) in old.into_iter().enumerate() {
            slots[i * steps / n] = Some(slot);
        }
    }

    slots
        .into_iter()
        .map(|slot| match slot {
            Some(mut slot) => {
                slot.duration = duration;
                slot
            }
            None => empty_slot(song, duration),
        })
        .collect()
}

fn empty_slot(song: &mut Song, duration: f32) -> ChordSlot {
    ChordSlot {
        id: SlotId(song.alloc_id()),
        chord: None,
        duration,
    }
}

pub(super) fn set_section_time_signature(
    song: &mut Song,
    section: SectionId,
    time_signature: Option<TimeSignature>,
) -> Option<()> {
    let index = song.section_index(section)?;
    song.sections[index].time_signature = time_signature;
    song.retime_section(index);
    Some(())
}

pub(super) fn set_time_signature(song: &mut Song, time_signature: TimeSignature) -> Option<()> {
    song.time_signature = time_signature;
    for index in 0..song.sections.len() {
        song.retime_section(index);
    }
    Some(())
}

pub(super) fn reorder_sections(song: &mut Song, order: &[SectionId]) -> Option<()> {
    let current: HashSet<SectionId> = song.sections.iter().map(|s| s.id).collect();
    let requested: HashSet<SectionId> = order.iter().copied().collect();
    if order.len() != song.sections.len()
        || requested.len() != order.len()
        || requested != current
    {
        tracing::debug!("Reorder rejected: not a permutation of the current sections");
        return None;
    }

    let mut remaining = std::mem::take(&mut song.sections);
    for id in order {
        let pos = remaining.iter().position(|s| s.id == *id)?;
        song.sections.push(remaining.swap_remove(pos));
    }
    Some(())
}

pub(super) fn duplicate_section(song: &mut Song, section: SectionId) -> Option<()> {
    let index = song.section_index(section)?;
    let source = song.sections[index].clone();
    let copy = song.clone_section_fresh(&source);
    song.sections.insert(index + 1, copy);
    Some(())
}

pub(super) fn remove_section(song: &mut Song, section: SectionId) -> Option<()> {
    let index = song.section_index(section)?;
    if song.sections.len() <= 1 {
        return None;
    }
    song.sections.remove(index);
    Some(())
}

pub(super) fn clear_section(song: &mut Song, section: SectionId) -> Option<()> {
    let target = song.section_mut(section)?;
    for slot in target.slots_mut() {
        slot.chord = None;
    }
    Some(())
}

pub(super) fn set_slot_chord(song: &mut Song, at: SlotRef, chord: Option<Chord>) -> Option<()> {
    song.slot_mut(at)?.chord = chord.map(|c| c.rederive());
    Some(())
}

/// Swap the chords of two slots, or move into an empty destination
pub(super) fn move_chord(song: &mut Song, from: SlotRef, to: SlotRef) -> Option<()> {
    if from == to {
        return None;
    }
    // Resolve both ends before touching either
    song.slot(to)?;
    let moving = song.slot(from)?.chord.clone()?;

    let displaced = song.slot_mut(to)?.chord.replace(moving);
    song.slot_mut(from)?.chord = displaced;
    Some(())
}

pub(super) fn add_section(song: &mut Song, section_type: SectionType) -> Option<()> {
    let section = song.new_section(section_type, DEFAULT_SECTION_MEASURES);
    song.sections.push(section);
    Some(())
}

pub(super) fn rename_section(song: &mut Song, section: SectionId, name: &str) -> Option<()> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    song.section_mut(section)?.name = name.to_string();
    Some(())
}

pub(super) fn transpose_song(song: &mut Song, semitones: i32) -> Option<()> {
    song.key = song.key.transposed(semitones);
    for section in &mut song.sections {
        for slot in section.slots_mut() {
            if let Some(chord) = &slot.chord {
                slot.chord = Some(chord.transposed(semitones));
            }
        }
    }
    Some(())
}
