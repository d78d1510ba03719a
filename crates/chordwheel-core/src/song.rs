//! Song document: sections of measures of chord slots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChordwheelError, Result};
use crate::instrument::Instrument;
use crate::theory::{Chord, Key};

pub const MIN_MEASURES: usize = 1;
pub const MAX_MEASURES: usize = 32;
pub const MIN_TEMPO: u16 = 20;
pub const MAX_TEMPO: u16 = 300;
pub const DEFAULT_TEMPO: u16 = 120;
pub const DEFAULT_SECTION_MEASURES: usize = 4;

/// Unique identifier for sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub u64);

/// Unique identifier for measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasureId(pub u64);

/// Unique identifier for chord slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u64);

/// Address of a slot within the song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub section: SectionId,
    pub slot: SlotId,
}

impl SlotRef {
    pub fn new(section: SectionId, slot: SlotId) -> Self {
        Self { section, slot }
    }
}

// ============================================================================
// Time Signature
// ============================================================================

/// Meter, serialized as `[numerator, denominator]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl From<(u8, u8)> for TimeSignature {
    fn from((numerator, denominator): (u8, u8)) -> Self {
        Self::new(numerator, denominator).unwrap_or_default()
    }
}

impl From<TimeSignature> for (u8, u8) {
    fn from(ts: TimeSignature) -> Self {
        (ts.numerator, ts.denominator)
    }
}

impl TimeSignature {
    /// Numerator 1-32, denominator a power of two up to 32
    pub fn new(numerator: u8, denominator: u8) -> Result<Self> {
        let valid = (1..=32).contains(&numerator)
            && denominator.is_power_of_two()
            && denominator <= 32;
        if !valid {
            return Err(ChordwheelError::InvalidTimeSignature(format!(
                "{numerator}/{denominator}"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Subdivision step counts a measure may be split into.
    ///
    /// Simple triple meters get {1,3,6}, compound meters {1,2,3,6,12}, and
    /// duple/quadruple (or irregular) meters {1,2,4,8}.
    pub fn subdivision_options(&self) -> &'static [u8] {
        match self.numerator {
            3 | 9 => &[1, 3, 6],
            n if n % 3 == 0 => &[1, 2, 3, 6, 12],
            _ => &[1, 2, 4, 8],
        }
    }

    pub fn allows_subdivision(&self, steps: u8) -> bool {
        self.subdivision_options().contains(&steps)
    }

    /// Largest allowed subdivision not exceeding one slot per beat
    pub fn default_subdivision(&self) -> u8 {
        self.subdivision_options()
            .iter()
            .copied()
            .filter(|&s| s <= self.numerator)
            .max()
            .unwrap_or(1)
    }

    /// Length of one slot in beats when a measure has `steps` slots
    pub fn slot_duration(&self, steps: u8) -> f32 {
        self.numerator as f32 / steps.max(1) as f32
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TimeSignature {
    type Err = ChordwheelError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ChordwheelError::InvalidTimeSignature(s.to_string());
        let (num, den) = s.trim().split_once('/').ok_or_else(invalid)?;
        let num = num.trim().parse().map_err(|_| invalid())?;
        let den = den.trim().parse().map_err(|_| invalid())?;
        Self::new(num, den)
    }
}

// ============================================================================
// Section Types
// ============================================================================

/// Role of a section within the song form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Intro,
    Verse,
    PreChorus,
    Chorus,
    Bridge,
    Interlude,
    Solo,
    Breakdown,
    Tag,
    Hook,
    Outro,
    Custom,
}

impl SectionType {
    pub const ALL: [SectionType; 12] = [
        Self::Intro,
        Self::Verse,
        Self::PreChorus,
        Self::Chorus,
        Self::Bridge,
        Self::Interlude,
        Self::Solo,
        Self::Breakdown,
        Self::Tag,
        Self::Hook,
        Self::Outro,
        Self::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro => "Intro",
            Self::Verse => "Verse",
            Self::PreChorus => "Pre-Chorus",
            Self::Chorus => "Chorus",
            Self::Bridge => "Bridge",
            Self::Interlude => "Interlude",
            Self::Solo => "Solo",
            Self::Breakdown => "Breakdown",
            Self::Tag => "Tag",
            Self::Hook => "Hook",
            Self::Outro => "Outro",
            Self::Custom => "Section",
        }
    }
}

// ============================================================================
// Document Tree
// ============================================================================

/// Smallest addressable timeline unit; holds at most one chord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSlot {
    pub id: SlotId,
    pub chord: Option<Chord>,
    /// Length in beats of the effective time signature
    pub duration: f32,
}

impl ChordSlot {
    pub fn is_empty(&self) -> bool {
        self.chord.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub id: MeasureId,
    pub beats: Vec<ChordSlot>,
}

impl Measure {
    pub fn subdivision(&self) -> usize {
        self.beats.len()
    }
}

/// A named part of the song form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub section_type: SectionType,
    /// Overrides the song meter when set
    #[serde(default)]
    pub time_signature: Option<TimeSignature>,
    /// Slot count used for newly added measures
    pub subdivision: u8,
    pub measures: Vec<Measure>,
}

impl Section {
    pub fn slots(&self) -> impl Iterator<Item = &ChordSlot> {
        self.measures.iter().flat_map(|m| m.beats.iter())
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut ChordSlot> {
        self.measures.iter_mut().flat_map(|m| m.beats.iter_mut())
    }

    pub fn slot(&self, id: SlotId) -> Option<&ChordSlot> {
        self.slots().find(|s| s.id == id)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut ChordSlot> {
        self.slots_mut().find(|s| s.id == id)
    }

    pub fn measure(&self, id: MeasureId) -> Option<&Measure> {
        self.measures.iter().find(|m| m.id == id)
    }

    pub fn chord_count(&self) -> usize {
        self.slots().filter(|s| !s.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.chord_count() == 0
    }
}

/// The whole document. Every editor command yields a new `Song` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    /// Beats per minute
    pub tempo: u16,
    pub time_signature: TimeSignature,
    pub key: Key,
    #[serde(default)]
    pub instrument: Instrument,
    pub sections: Vec<Section>,
    /// Id allocator; part of the document so ids never repeat across undo
    next_id: u64,
}

impl Default for Song {
    fn default() -> Self {
        Self::new("Untitled", DEFAULT_TEMPO, TimeSignature::default(), Key::default())
    }
}

impl Song {
    /// New song with a single empty verse
    pub fn new(
        title: impl Into<String>,
        tempo: u16,
        time_signature: TimeSignature,
        key: Key,
    ) -> Self {
        let mut song = Self {
            title: title.into(),
            tempo: tempo.clamp(MIN_TEMPO, MAX_TEMPO),
            time_signature,
            key,
            instrument: Instrument::default(),
            sections: Vec::new(),
            next_id: 1,
        };
        let verse = song.new_section(SectionType::Verse, DEFAULT_SECTION_MEASURES);
        song.sections.push(verse);
        song
    }

    pub(crate) fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Empty measure with `steps` slots of `duration` beats each
    pub(crate) fn new_measure(&mut self, steps: u8, duration: f32) -> Measure {
        let id = MeasureId(self.alloc_id());
        let beats = (0..steps)
            .map(|_| ChordSlot {
                id: SlotId(self.alloc_id()),
                chord: None,
                duration,
            })
            .collect();
        Measure { id, beats }
    }

    /// Build (but do not insert) an empty section in the song meter
    pub fn new_section(&mut self, section_type: SectionType, measures: usize) -> Section {
        let steps = self.time_signature.default_subdivision();
        let duration = self.time_signature.slot_duration(steps);
        let measures = measures.clamp(MIN_MEASURES, MAX_MEASURES);
        let id = SectionId(self.alloc_id());
        let measures = (0..measures)
            .map(|_| self.new_measure(steps, duration))
            .collect();
        Section {
            id,
            name: self.numbered_name(section_type),
            section_type,
            time_signature: None,
            subdivision: steps,
            measures,
        }
    }

    /// "Verse", then "Verse 2", "Verse 3", ...
    fn numbered_name(&self, section_type: SectionType) -> String {
        let existing = self
            .sections
            .iter()
            .filter(|s| s.section_type == section_type)
            .count();
        match existing {
            0 => section_type.name().to_string(),
            n => format!("{} {}", section_type.name(), n + 1),
        }
    }

    /// Deep copy of a section with fresh ids; chords are copied by value
    pub(crate) fn clone_section_fresh(&mut self, source: &Section) -> Section {
        let id = SectionId(self.alloc_id());
        let measures = source
            .measures
            .iter()
            .map(|measure| Measure {
                id: MeasureId(self.alloc_id()),
                beats: measure
                    .beats
                    .iter()
                    .map(|slot| ChordSlot {
                        id: SlotId(self.alloc_id()),
                        chord: slot.chord.clone(),
                        duration: slot.duration,
                    })
                    .collect(),
            })
            .collect();
        Section {
            id,
            name: source.name.clone(),
            section_type: source.section_type,
            time_signature: source.time_signature,
            subdivision: source.subdivision,
            measures,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id).collect()
    }

    pub fn slot(&self, at: SlotRef) -> Option<&ChordSlot> {
        self.section(at.section)?.slot(at.slot)
    }

    pub fn slot_mut(&mut self, at: SlotRef) -> Option<&mut ChordSlot> {
        self.section_mut(at.section)?.slot_mut(at.slot)
    }

    pub fn chord_at(&self, at: SlotRef) -> Option<&Chord> {
        self.slot(at)?.chord.as_ref()
    }

    /// Meter in effect for a section (its override or the song meter)
    pub fn effective_time_signature(&self, section: &Section) -> TimeSignature {
        section.time_signature.unwrap_or(self.time_signature)
    }

    /// Every slot in playback order
    pub fn slot_refs(&self) -> Vec<SlotRef> {
        self.sections
            .iter()
            .flat_map(|section| section.slots().map(move |slot| SlotRef::new(section.id, slot.id)))
            .collect()
    }

    pub fn total_measures(&self) -> usize {
        self.sections.iter().map(|s| s.measures.len()).sum()
    }

    /// Recompute slot durations of one section from its effective meter
    pub(crate) fn retime_section(&mut self, index: usize) {
        let song_meter = self.time_signature;
        let Some(section) = self.sections.get_mut(index) else {
            return;
        };
        let meter = section.time_signature.unwrap_or(song_meter);
        for measure in &mut section.measures {
            let duration = meter.slot_duration(measure.beats.len() as u8);
            for slot in &mut measure.beats {
                slot.duration = duration;
            }
        }
    }
}
