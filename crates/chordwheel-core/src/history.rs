//! Undo/redo history over whole-document revisions

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear history with a redo branch and a bounded undo depth.
///
/// Continuous interactions (a slider being dragged) go through
/// [`History::preview`] and are committed as one entry by
/// [`History::settle`].
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    current: T,
    future: Vec<T>,
    limit: usize,
    /// Revision in effect before the pending interaction started
    pending: Option<T>,
}

impl<T: Clone + PartialEq> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            current: initial,
            future: Vec::new(),
            limit,
            pending: None,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.pending_changed()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn is_previewing(&self) -> bool {
        self.pending.is_some()
    }

    /// Make `revision` current and drop the redo branch
    pub fn commit(&mut self, revision: T) {
        self.settle();
        let previous = std::mem::replace(&mut self.current, revision);
        self.push_past(previous);
        self.future.clear();
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        self.settle();
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let undone = std::mem::replace(&mut self.current, previous);
        self.future.push(undone);
        true
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        self.settle();
        let Some(next) = self.future.pop() else {
            return false;
        };
        let redone = std::mem::replace(&mut self.current, next);
        self.push_past(redone);
        true
    }

    /// Show an intermediate revision without recording it
    pub fn preview(&mut self, revision: T) {
        if self.pending.is_none() {
            self.pending = Some(self.current.clone());
        }
        self.current = revision;
    }

    /// Record the pending interaction as a single entry.
    ///
    /// Returns true if an entry was added; an interaction that ended where
    /// it started leaves history untouched.
    pub fn settle(&mut self) -> bool {
        let Some(origin) = self.pending.take() else {
            return false;
        };
        if origin == self.current {
            return false;
        }
        self.push_past(origin);
        self.future.clear();
        true
    }

    /// Abandon the pending interaction and restore its starting revision
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(origin) => {
                self.current = origin;
                true
            }
            None => false,
        }
    }

    fn pending_changed(&self) -> bool {
        self.pending.as_ref().is_some_and(|origin| *origin != self.current)
    }

    fn push_past(&mut self, revision: T) {
        self.past.push_back(revision);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_commit_returns_to_start() {
        let mut history = History::new(0);
        history.commit(1);
        assert!(history.undo());
        assert_eq!(*history.current(), 0);
        assert!(history.redo());
        assert_eq!(*history.current(), 1);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut history = History::new("a");
        history.commit("b");
        history.commit("c");
        history.undo();
        assert!(history.can_redo());
        history.commit("d");
        assert!(!history.can_redo());
        assert!(!history.redo());
        assert_eq!(*history.current(), "d");
        history.undo();
        assert_eq!(*history.current(), "b");
    }

    #[test]
    fn test_underflow_is_noop() {
        let mut history = History::new(5);
        assert!(!history.can_undo());
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(*history.current(), 5);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(0, 3);
        for i in 1..=5 {
            history.commit(i);
        }
        assert_eq!(history.undo_depth(), 3);
        while history.undo() {}
        assert_eq!(*history.current(), 2);
    }

    #[test]
    fn test_preview_settles_into_one_entry() {
        let mut history = History::new(100);
        history.preview(101);
        history.preview(105);
        history.preview(120);
        assert_eq!(*history.current(), 120);
        assert!(history.can_undo());
        assert_eq!(history.undo_depth(), 0);

        assert!(history.settle());
        assert_eq!(history.undo_depth(), 1);
        history.undo();
        assert_eq!(*history.current(), 100);
    }

    #[test]
    fn test_preview_back_to_start_records_nothing() {
        let mut history = History::new(7);
        history.preview(8);
        history.preview(7);
        assert!(!history.settle());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_cancel_restores_origin() {
        let mut history = History::new(1);
        history.commit(2);
        history.preview(3);
        history.preview(4);
        assert!(history.cancel());
        assert_eq!(*history.current(), 2);
        assert!(!history.is_previewing());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_undo_during_preview_settles_first() {
        let mut history = History::new(0);
        history.preview(9);
        assert!(history.undo());
        assert_eq!(*history.current(), 0);
        assert!(history.redo());
        assert_eq!(*history.current(), 9);
    }
}
