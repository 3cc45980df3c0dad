//! Bounded history of recent scroll samples.

use std::collections::VecDeque;

use scrolldir_model::{Direction, Sample, TimestampMs};

/// Number of samples kept.
pub const HISTORY_LENGTH: usize = 32;

/// Ring buffer of the most recent samples, newest first.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
}

impl History {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_LENGTH),
        }
    }

    /// Record a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == HISTORY_LENGTH {
            self.samples.pop_back();
        }
        self.samples.push_front(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Samples from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Furthest position along `direction` among `start` and every sample
    /// not older than `cutoff`.
    ///
    /// The walk stops at the first sample older than `cutoff`, so an old
    /// extreme behind a newer one is ignored even if its timestamp is
    /// out of order.
    pub fn furthest_since(&self, direction: Direction, start: f64, cutoff: TimestampMs) -> f64 {
        self.samples
            .iter()
            .take_while(|s| s.timestamp >= cutoff)
            .fold(start, |acc, s| direction.furthest(acc, s.position))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
