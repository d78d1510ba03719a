//! Editing session: document history plus the state that lives beside it

use crate::config::SessionConfig;
use crate::editor::{self, EditCommand};
use crate::gesture::{EditIntent, TapDetector, TapEvent};
use crate::history::History;
use crate::selection::Selection;
use crate::song::{SectionId, SlotRef, Song};
use crate::theory::Chord;
use crate::transport::Transport;

/// Owns the song history and the selection/transport state for one UI.
///
/// All document changes go through [`Session::dispatch`] or the preview
/// methods. Selection and transport are never recorded in history.
#[derive(Debug, Clone)]
pub struct Session {
    history: History<Song>,
    selection: Selection,
    transport: Transport,
    taps: TapDetector<SlotRef>,
    config: SessionConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let song = config.new_song();
        Self::with_song(song, config)
    }

    pub fn with_song(song: Song, config: SessionConfig) -> Self {
        let mut selection = Selection::default();
        selection.select_section(song.sections.first().map(|s| s.id));
        Self {
            history: History::with_limit(song, config.history_limit),
            selection,
            transport: Transport::default(),
            taps: TapDetector::new(config.double_tap_ms),
            config,
        }
    }

    pub fn song(&self) -> &Song {
        self.history.current()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Apply a command as one undoable step. Returns false on a no-op.
    pub fn dispatch(&mut self, command: &EditCommand) -> bool {
        self.history.settle();
        let before = self.song();
        let Some(next) = editor::apply(before, command) else {
            return false;
        };
        let before = before.clone();
        self.history.commit(next);
        self.selection.reconcile(&before, self.history.current());
        true
    }

    /// Apply a command as part of a continuous interaction; the whole
    /// interaction becomes one history entry on [`Session::settle`].
    pub fn preview(&mut self, command: &EditCommand) -> bool {
        let before = self.song();
        let Some(next) = editor::apply(before, command) else {
            return false;
        };
        let before = before.clone();
        self.history.preview(next);
        self.selection.reconcile(&before, self.history.current());
        true
    }

    pub fn settle(&mut self) -> bool {
        self.history.settle()
    }

    pub fn cancel_preview(&mut self) -> bool {
        let before = self.song().clone();
        if !self.history.cancel() {
            return false;
        }
        self.selection.reconcile(&before, self.history.current());
        true
    }

    pub fn is_previewing(&self) -> bool {
        self.history.is_previewing()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_section(&mut self, section: Option<SectionId>) {
        self.selection.select_section(section);
    }

    pub fn select_slot(&mut self, slot: Option<SlotRef>) {
        self.selection.select_slot(slot);
    }

    pub fn select_chord(&mut self, chord: Option<Chord>) {
        self.selection.select_chord(chord);
    }

    /// Put the chord picked on the wheel into `at`
    pub fn place_selected_chord(&mut self, at: SlotRef) -> bool {
        let Some(chord) = self.selection.chord.clone() else {
            return false;
        };
        self.dispatch(&EditCommand::SetSlotChord {
            slot: at,
            chord: Some(chord),
        })
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn play(&mut self) -> bool {
        let song = self.history.current();
        self.transport.play(song)
    }

    /// Step the playhead; returns false once playback has ended
    pub fn advance(&mut self) -> bool {
        let song = self.history.current();
        self.transport.advance(song)
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    pub fn handle_intent(&mut self, intent: EditIntent) -> bool {
        match intent.to_command(self.song()) {
            Some(command) => self.dispatch(&command),
            None => {
                tracing::debug!("Ignored {:?}", intent);
                false
            }
        }
    }

    /// Feed a tap on a slot; single taps select the slot, double taps
    /// place the selected chord there.
    pub fn tap(&mut self, at: SlotRef, now_ms: u64) -> Option<TapEvent<SlotRef>> {
        let event = self.taps.tap(at, now_ms);
        self.apply_tap(event);
        event
    }

    pub fn poll_taps(&mut self, now_ms: u64) -> Option<TapEvent<SlotRef>> {
        let event = self.taps.poll(now_ms);
        self.apply_tap(event);
        event
    }

    fn apply_tap(&mut self, event: Option<TapEvent<SlotRef>>) {
        let Some(event) = event else { return };
        let at = match event {
            TapEvent::Single(at) | TapEvent::Double(at) => at,
        };
        if self.song().slot(at).is_none() {
            tracing::debug!("Ignored tap on missing slot {:?}", at);
            return;
        }
        self.selection.select_slot(Some(at));
        if let TapEvent::Double(at) = event {
            self.place_selected_chord(at);
        }
    }
}
