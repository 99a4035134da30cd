//! Bounded per-actor queues of directional commands, decoupling whoever
//! produces inputs from the movement controller consuming them.

use std::collections::VecDeque;

use crate::types::Direction;

pub const MAX_INPUT_CAPACITY: usize = 10;

#[derive(Clone, Debug)]
pub struct InputQueue {
    pending: VecDeque<Direction>,
    capacity: usize,
    locked: bool,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_INPUT_CAPACITY);
        Self { pending: VecDeque::with_capacity(capacity), capacity, locked: false }
    }

    /// Queues a direction. Inputs beyond capacity, or while locked, are
    /// silently dropped rather than treated as errors.
    pub fn enqueue(&mut self, direction: Direction) {
        if self.locked || self.pending.len() >= self.capacity {
            return;
        }
        self.pending.push_back(direction);
    }

    pub fn has_inputs(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Consumes the oldest input. Callers check `has_inputs` first; an empty
    /// dequeue is a caller bug, not a recoverable condition.
    pub fn dequeue(&mut self) -> Direction {
        self.pending.pop_front().expect("dequeue from empty input queue; check has_inputs first")
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Forces effective capacity to zero and discards pending inputs.
    pub fn lock(&mut self) {
        self.locked = true;
        self.pending.clear();
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}
