//! Bounded linear undo/redo over whole snapshots.
//!
//! The history holds `past`, `present`, and `future`. Each [`commit`]
//! pushes the current present onto `past` (dropping the oldest entry past
//! the capacity) and discards `future`. [`commit_silent`] swaps the present
//! without creating an undo step, for refreshes the user did not author
//! as an edit (such as re-parsing the source text).
//!
//! Pointer gestures open a batch: the first commit inside the batch
//! records one undo step, later ones only replace the present, so a whole
//! drag undoes in one go.
//!
//! [`commit`]: History::commit
//! [`commit_silent`]: History::commit_silent

use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    capacity: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Whether the open batch already produced its undo step.
    batch_dirty: bool,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            present: initial,
            future: VecDeque::new(),
            capacity,
            batch_depth: 0,
            batch_dirty: false,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Make `snapshot` the present as a new undo step.
    pub fn commit(&mut self, snapshot: T) {
        if self.batch_depth > 0 && self.batch_dirty {
            self.present = snapshot;
            return;
        }
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.past.push_back(previous);
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        self.future.clear();
        if self.batch_depth > 0 {
            self.batch_dirty = true;
        }
    }

    /// Replace the present without touching `past` or `future`.
    pub fn commit_silent(&mut self, snapshot: T) {
        self.present = snapshot;
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Group subsequent commits into a single undo step.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.batch_dirty = false;
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }
}
