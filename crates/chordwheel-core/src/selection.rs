//! Current section/slot/chord selection, kept outside of history

use serde::{Deserialize, Serialize};

use crate::song::{Section, SectionId, SlotRef, Song};
use crate::theory::Chord;

/// What the user is currently focused on.
///
/// Ids may go stale when the document changes underneath; the resolving
/// accessors then return `None` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub section: Option<SectionId>,
    pub slot: Option<SlotRef>,
    /// Chord picked on the wheel, waiting to be placed
    pub chord: Option<Chord>,
}

impl Selection {
    pub fn select_section(&mut self, section: Option<SectionId>) {
        self.section = section;
        if self.slot.is_some_and(|s| Some(s.section) != section) {
            self.slot = None;
        }
    }

    /// Selecting a slot also selects its section
    pub fn select_slot(&mut self, slot: Option<SlotRef>) {
        if let Some(at) = slot {
            self.section = Some(at.section);
        }
        self.slot = slot;
    }

    pub fn select_chord(&mut self, chord: Option<Chord>) {
        self.chord = chord;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn resolve_section<'a>(&self, song: &'a Song) -> Option<&'a Section> {
        song.section(self.section?)
    }

    pub fn resolve_slot(&self, song: &Song) -> Option<SlotRef> {
        let at = self.slot?;
        song.slot(at).map(|_| at)
    }

    /// Drop references that no longer resolve in `song`.
    ///
    /// If the selected section was removed, the section that took its place
    /// is selected (or the previous one when it was last). `before` is the
    /// document the selection was made against.
    pub fn reconcile(&mut self, before: &Song, song: &Song) {
        if let Some(section) = self.section.filter(|id| song.section(*id).is_none()) {
            self.section = before
                .section_index(section)
                .and_then(|i| neighbor(before, song, i));
            tracing::debug!("Selected section {:?} removed, now {:?}", section, self.section);
        }
        if self.slot.is_some() && self.resolve_slot(song).is_none() {
            self.slot = None;
        }
    }
}

/// First surviving section after index `i` in `before`, else the nearest one
/// before it
fn neighbor(before: &Song, after: &Song, i: usize) -> Option<SectionId> {
    let survives = |s: &&Section| after.section(s.id).is_some();
    before.sections[i + 1..]
        .iter()
        .find(survives)
        .or_else(|| before.sections[..i].iter().rev().find(survives))
        .map(|s| s.id)
        .or_else(|| after.sections.first().map(|s| s.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{reduce, EditCommand};
    use crate::song::SectionType;

    fn three_sections() -> Song {
        let song = Song::default();
        let song = reduce(&song, &EditCommand::AddSection { section_type: SectionType::Chorus });
        reduce(&song, &EditCommand::AddSection { section_type: SectionType::Bridge })
    }

    #[test]
    fn test_select_slot_selects_section() {
        let song = Song::default();
        let at = song.slot_refs()[5];
        let mut selection = Selection::default();
        selection.select_slot(Some(at));
        assert_eq!(selection.section, Some(at.section));
        assert_eq!(selection.resolve_slot(&song), Some(at));
    }

    #[test]
    fn test_removed_section_reselects_next_then_previous() {
        let song = three_sections();
        let ids = song.section_ids();

        let mut selection = Selection::default();
        selection.select_section(Some(ids[1]));
        let after = reduce(&song, &EditCommand::RemoveSection { section: ids[1] });
        selection.reconcile(&song, &after);
        assert_eq!(selection.section, Some(ids[2]));

        let mut selection = Selection::default();
        selection.select_section(Some(ids[2]));
        let after = reduce(&song, &EditCommand::RemoveSection { section: ids[2] });
        selection.reconcile(&song, &after);
        assert_eq!(selection.section, Some(ids[1]));
    }

    #[test]
    fn test_stale_slot_is_cleared() {
        let song = Song::default();
        let last = *song.slot_refs().last().unwrap();
        let mut selection = Selection::default();
        selection.select_slot(Some(last));

        let after = reduce(
            &song,
            &EditCommand::SetSectionMeasures { section: last.section, count: 1 },
        );
        selection.reconcile(&song, &after);
        assert_eq!(selection.slot, None);
        assert_eq!(selection.section, Some(last.section));
    }
}
