//! Virtual-clock timer queue
//!
//! Scheduled actions are `(fire_at, action)` pairs ordered by fire time,
//! with insertion order breaking ties. Nothing here reads real time; the
//! owner advances the clock explicitly.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A scheduled action
#[derive(Debug, Clone)]
pub struct Timer<A> {
    pub fire_at: u64,
    seq: u64,
    pub action: A,
}

impl<A> PartialEq for Timer<A> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<A> Eq for Timer<A> {}

impl<A> PartialOrd for Timer<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Timer<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at, self.seq).cmp(&(other.fire_at, other.seq))
    }
}

/// Min-heap of pending timers
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    heap: BinaryHeap<Reverse<Timer<A>>>,
    next_seq: u64,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire at `fire_at` (milliseconds on the owner's clock)
    pub fn schedule(&mut self, fire_at: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Timer {
            fire_at,
            seq,
            action,
        }));
    }

    /// Pop the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<Timer<A>> {
        if self.heap.peek()?.0.fire_at <= now {
            self.heap.pop().map(|Reverse(timer)| timer)
        } else {
            None
        }
    }

    /// Fire time of the earliest pending timer
    pub fn next_fire_at(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(timer)| timer.fire_at)
    }

    /// Drop every pending timer. Returns how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.heap.len();
        self.heap.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
