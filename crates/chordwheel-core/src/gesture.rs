//! Gesture plumbing: tap disambiguation and drag intents

use serde::{Deserialize, Serialize};

use crate::editor::EditCommand;
use crate::song::{SlotRef, Song};

pub const DEFAULT_DOUBLE_TAP_MS: u64 = 350;

/// Result of tap disambiguation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent<T> {
    Single(T),
    Double(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapState<T> {
    Idle,
    /// A single tap is pending until the window closes
    Armed { at: u64, target: T },
}

/// Tells single taps from double taps with one timeout window.
///
/// Time is supplied by the caller in milliseconds; the detector never
/// reads a clock. A pending single fires from [`TapDetector::poll`] once
/// the window has elapsed, or immediately when a tap lands on another
/// target.
#[derive(Debug, Clone)]
pub struct TapDetector<T> {
    window_ms: u64,
    state: TapState<T>,
}

impl<T> Default for TapDetector<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_TAP_MS)
    }
}

impl<T> TapDetector<T> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            state: TapState::Idle,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn state(&self) -> &TapState<T> {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TapState::Armed { .. })
    }

    /// Drop any pending tap without firing it
    pub fn reset(&mut self) {
        self.state = TapState::Idle;
    }
}

impl<T: PartialEq> TapDetector<T> {
    pub fn tap(&mut self, target: T, now_ms: u64) -> Option<TapEvent<T>> {
        match std::mem::replace(&mut self.state, TapState::Idle) {
            TapState::Idle => {
                self.state = TapState::Armed { at: now_ms, target };
                None
            }
            TapState::Armed { at, target: pending }
                if pending == target && now_ms.saturating_sub(at) < self.window_ms =>
            {
                Some(TapEvent::Double(target))
            }
            TapState::Armed { target: pending, .. } => {
                self.state = TapState::Armed { at: now_ms, target };
                Some(TapEvent::Single(pending))
            }
        }
    }

    /// Fire the pending single tap if its window has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<TapEvent<T>> {
        match std::mem::replace(&mut self.state, TapState::Idle) {
            TapState::Armed { at, target } if now_ms.saturating_sub(at) >= self.window_ms => {
                Some(TapEvent::Single(target))
            }
            state => {
                self.state = state;
                None
            }
        }
    }
}

/// Drag-and-drop outcomes, independent of any pointer framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditIntent {
    /// Move the section at index `from` to index `to`
    ReorderRequested { from: usize, to: usize },
    ChordMoveRequested { from: SlotRef, to: SlotRef },
}

impl EditIntent {
    /// Translate into a command against `song`; `None` if it would do nothing
    pub fn to_command(&self, song: &Song) -> Option<EditCommand> {
        match *self {
            EditIntent::ReorderRequested { from, to } => {
                let len = song.sections.len();
                if from == to || from >= len || to >= len {
                    return None;
                }
                let mut order = song.section_ids();
                let moved = order.remove(from);
                order.insert(to, moved);
                Some(EditCommand::ReorderSections { order })
            }
            EditIntent::ChordMoveRequested { from, to } => {
                (from != to).then_some(EditCommand::MoveChord { from, to })
            }
        }
    }
}
