//! Sliding window of request timestamps

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Request timestamps kept in non-decreasing order.
#[derive(Debug)]
pub struct SlidingWindow {
    span: Duration,
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new(span: Duration) -> Self {
        Self {
            span,
            timestamps: VecDeque::new(),
        }
    }

    /// Drop timestamps older than `now - span`.
    ///
    /// Stops at the first timestamp still inside the window.
    pub fn purge(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.span) else {
            return;
        };
        while self.timestamps.front().is_some_and(|&t| t < cutoff) {
            self.timestamps.pop_front();
        }
    }

    /// Append `now`, clamped so the sequence never goes backwards.
    pub fn record(&mut self, now: Instant) {
        let at = match self.timestamps.back() {
            Some(&last) if last > now => last,
            _ => now,
        };
        self.timestamps.push_back(at);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn span(&self) -> Duration {
        self.span
    }
}
