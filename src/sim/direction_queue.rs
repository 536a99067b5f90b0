//! Buffered player steering
//!
//! Input arrives faster than ticks, so turns are queued and consumed one per
//! tick. Reversals are judged against the last queued heading, which stops a
//! quick UP-LEFT-DOWN burst from folding the snake onto itself.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::Direction;
use crate::consts::MAX_DIRECTION_QUEUE;

/// Heading every new game starts with
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Result of offering a direction to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    Accepted,
    /// Reversal or full buffer
    Rejected,
    /// Matches the effective heading; nothing queued (cosmetic spark only)
    SameDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionQueue {
    current: Direction,
    pending: VecDeque<Direction>,
}

impl Default for DirectionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionQueue {
    pub fn new() -> Self {
        Self {
            current: INITIAL_DIRECTION,
            pending: VecDeque::with_capacity(MAX_DIRECTION_QUEUE),
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Last queued direction, else the current one
    pub fn effective(&self) -> Direction {
        self.pending.back().copied().unwrap_or(self.current)
    }

    pub fn enqueue(&mut self, direction: Direction) -> EnqueueResult {
        let effective = self.effective();
        if direction == effective.opposite() || self.pending.len() >= MAX_DIRECTION_QUEUE {
            log::debug!("direction {} rejected (effective {})", direction.as_str(), effective.as_str());
            return EnqueueResult::Rejected;
        }
        if direction == effective {
            return EnqueueResult::SameDirection;
        }
        self.pending.push_back(direction);
        EnqueueResult::Accepted
    }

    /// Pop the oldest queued direction into `current`; call once per tick
    pub fn dequeue(&mut self) -> Direction {
        if let Some(next) = self.pending.pop_front() {
            self.current = next;
        }
        self.current
    }

    pub fn reset(&mut self) {
        self.reset_to(INITIAL_DIRECTION);
    }

    /// Empty the buffer and continue with `direction` (after a revival)
    pub fn reset_to(&mut self, direction: Direction) {
        self.current = direction;
        self.pending.clear();
    }
}
