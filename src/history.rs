// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded linear undo/redo over full snapshots.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A ring buffer of immutable snapshots plus a cursor.
///
/// The entry under the cursor is always the live state. Entries after the cursor form the redo
/// tail and are dropped by the next [`History::push`].
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of zero is treated as one (the live entry is always retained).
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Records `snapshot` as the new live state.
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Drops all history and starts over from `snapshot`.
    pub fn reset(&mut self, snapshot: T) {
        self.entries.clear();
        self.entries.push_back(snapshot);
        self.cursor = 0;
    }

    /// Overwrites the live entry without creating an undo step.
    pub fn replace_current(&mut self, snapshot: T) {
        self.entries[self.cursor] = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{History, DEFAULT_HISTORY_CAPACITY};

    #[test]
    fn undo_then_redo_restores_state() {
        let mut history = History::new(vec![1]);
        history.push(vec![1, 2]);
        history.push(vec![1, 2, 3]);

        let before = history.current().clone();
        history.undo().expect("undo");
        assert_eq!(history.current(), &vec![1, 2]);
        assert_eq!(history.redo().expect("redo"), &before);
    }

    #[test]
    fn boundaries_are_noops() {
        let mut history = History::new("a");
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), 0);

        history.push("b");
        assert!(history.redo().is_none());
        assert_eq!(history.current(), &"b");
    }

    #[test]
    fn push_after_undo_drops_redo_tail() {
        let mut history = History::new(0);
        history.push(1);
        history.push(2);
        history.undo();
        history.undo();

        history.push(10);

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(&0));
    }

    #[rstest]
    #[case(DEFAULT_HISTORY_CAPACITY, 120)]
    #[case(3, 10)]
    #[case(1, 4)]
    fn capacity_evicts_oldest(#[case] capacity: usize, #[case] pushes: usize) {
        let mut history = History::with_capacity(0usize, capacity);
        for value in 1..=pushes {
            history.push(value);
        }

        assert_eq!(history.len(), capacity);
        let mut undone = 0;
        while history.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, capacity - 1);
        assert_eq!(history.current(), &(pushes + 1 - capacity));
    }

    #[test]
    fn reset_and_replace_current() {
        let mut history = History::new(1);
        history.push(2);
        history.replace_current(20);
        assert_eq!(history.current(), &20);
        assert_eq!(history.undo(), Some(&1));

        history.reset(7);
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.current(), &7);
    }
}
