//! Bounded history of prior states for multistep methods
//!
//! Each entry keeps the edge-pinned state a committed step started from,
//! together with `F(state)`, so a two-step method costs one spatial
//! evaluation per step once the history is warm. The stored state lets the
//! stepper notice a caller that advances the same state twice instead of
//! feeding back the returned one, which would pair the new step with a stale
//! rate.
//! The ring is owned by one stepper instance; independent problems never
//! share history.

use nalgebra::DVector;
use std::collections::VecDeque;

/// Committed state and its cached spatial-operator value
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub state: DVector<f64>,
    pub rate: DVector<f64>,
}

/// Ring of the most recent committed states, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl History {
    /// Ring keeping at most `capacity` prior states
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
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

    /// Whether `count` prior states are available
    pub fn has(&self, count: usize) -> bool {
        self.entries.len() >= count
    }

    /// Append a committed state, discarding the oldest when full
    pub fn push(&mut self, state: DVector<f64>, rate: DVector<f64>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry { state, rate });
    }

    /// `back(0)` is the most recent prior state
    pub fn back(&self, offset: usize) -> Option<&HistoryEntry> {
        let len = self.entries.len();
        if offset >= len {
            return None;
        }
        self.entries.get(len - 1 - offset)
    }

    /// Whether `state` is the start of the most recent committed step
    pub fn repeats(&self, state: &DVector<f64>) -> bool {
        self.back(0).is_some_and(|entry| entry.state == *state)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
