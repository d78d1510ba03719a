//! Transport state and controls

use serde::{Deserialize, Serialize};

use crate::song::{SlotRef, Song};

/// Transport playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What playback wraps around at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Stop after the last slot
    #[default]
    Off,
    /// Repeat the section holding the playhead
    Section,
    /// Repeat the whole song
    Song,
}

/// Playhead over the song's slots. Not part of undo history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub state: TransportState,
    /// Slot under the playhead
    pub playing: Option<SlotRef>,
    pub loop_mode: LoopMode,
}

impl Transport {
    pub fn new(loop_mode: LoopMode) -> Self {
        Self {
            loop_mode,
            ..Default::default()
        }
    }

    /// Start, or resume from a pause if the paused slot still exists
    pub fn play(&mut self, song: &Song) -> bool {
        let resume = self.playing.filter(|at| song.slot(*at).is_some());
        match resume.or_else(|| song.slot_refs().first().copied()) {
            Some(at) => self.play_from(song, at),
            None => false,
        }
    }

    pub fn play_from(&mut self, song: &Song, at: SlotRef) -> bool {
        if song.slot(at).is_none() {
            tracing::debug!("Cannot play from missing slot {:?}", at);
            return false;
        }
        self.playing = Some(at);
        self.state = TransportState::Playing;
        true
    }

    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.playing = None;
    }

    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.state = TransportState::Paused;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Move the playhead to the next slot, returns true if playback continues
    pub fn advance(&mut self, song: &Song) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(current) = self.playing else {
            return self.play(song);
        };

        let order = song.slot_refs();
        let Some(pos) = order.iter().position(|at| *at == current) else {
            tracing::debug!("Playhead slot {:?} no longer exists", current);
            self.stop();
            return false;
        };

        let next = order.get(pos + 1).copied();
        let target = match self.loop_mode {
            LoopMode::Off => next,
            LoopMode::Song => next.or_else(|| order.first().copied()),
            LoopMode::Section => next
                .filter(|at| at.section == current.section)
                .or_else(|| order.iter().find(|at| at.section == current.section).copied()),
        };

        match target {
            Some(at) => {
                self.playing = Some(at);
                true
            }
            None => {
                self.stop();
                false
            }
        }
    }

    /// Seconds a slot lasts at the song tempo
    pub fn slot_duration_secs(song: &Song, at: SlotRef) -> Option<f64> {
        let slot = song.slot(at)?;
        Some(slot.duration as f64 * 60.0 / song.tempo.max(1) as f64)
    }

    /// Format a position as MM:SS.ss
    pub fn format_time(secs: f64) -> String {
        let mins = (secs / 60.0) as u32;
        let secs_rem = secs % 60.0;
        format!("{:02}:{:05.2}", mins, secs_rem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{reduce, EditCommand};
    use crate::song::SectionType;

    fn two_sections() -> Song {
        let song = Song::default();
        let song = reduce(&song, &EditCommand::AddSection { section_type: SectionType::Chorus });
        reduce(
            &song,
            &EditCommand::SetSectionMeasures { section: song.sections[1].id, count: 1 },
        )
    }

    #[test]
    fn test_play_pause_stop() {
        let song = Song::default();
        let mut transport = Transport::default();
        assert!(!transport.advance(&song));

        assert!(transport.play(&song));
        assert_eq!(transport.playing, song.slot_refs().first().copied());
        transport.advance(&song);
        transport.pause();
        assert_eq!(transport.state, TransportState::Paused);
        assert!(!transport.advance(&song));

        transport.play(&song);
        assert_eq!(transport.playing, Some(song.slot_refs()[1]));
        transport.stop();
        assert_eq!(transport.playing, None);
    }

    #[test]
    fn test_walks_song_then_stops() {
        let song = two_sections();
        let total = song.slot_refs().len();
        let mut transport = Transport::default();
        transport.play(&song);
        let steps = std::iter::from_fn(|| transport.advance(&song).then_some(())).count();
        assert_eq!(steps, total - 1);
        assert_eq!(transport.state, TransportState::Stopped);
    }

    #[test]
    fn test_section_loop_wraps_within_section() {
        let song = two_sections();
        let chorus = &song.sections[1];
        let first = SlotRef::new(chorus.id, chorus.measures[0].beats[0].id);
        let last = SlotRef::new(chorus.id, chorus.measures[0].beats[3].id);

        let mut transport = Transport::new(LoopMode::Section);
        transport.play_from(&song, last);
        assert!(transport.advance(&song));
        assert_eq!(transport.playing, Some(first));
    }

    #[test]
    fn test_song_loop_wraps_to_start() {
        let song = two_sections();
        let last = *song.slot_refs().last().unwrap();
        let mut transport = Transport::new(LoopMode::Song);
        transport.play_from(&song, last);
        assert!(transport.advance(&song));
        assert_eq!(transport.playing, song.slot_refs().first().copied());
    }

    #[test]
    fn test_slot_duration_secs() {
        let song = reduce(&Song::default(), &EditCommand::SetTempo(60));
        let at = song.slot_refs()[0];
        assert_eq!(Transport::slot_duration_secs(&song, at), Some(1.0));
        assert_eq!(Transport::format_time(75.5), "01:15.50");
    }
}
