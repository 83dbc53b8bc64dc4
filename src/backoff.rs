//! Per-call retry state with exponential backoff.

use std::time::Duration;

/// Attempt counter and current delay for one logical request.
///
/// Created fresh for every call and dropped when the call resolves, so
/// concurrent calls never observe each other's state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            delay: initial_delay,
        }
    }

    /// Zero-based index of the attempt in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt may be started.
    pub fn has_remaining(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Whether the attempt in flight is the last one allowed.
    pub fn is_last(&self) -> bool {
        self.attempt.saturating_add(1) >= self.max_attempts
    }

    /// Moves to the next attempt and returns how long to wait before it.
    ///
    /// The returned delay is the current one; the stored delay doubles.
    pub fn advance(&mut self) -> Duration {
        let wait = self.delay;
        self.delay = self.delay.saturating_mul(2);
        self.attempt += 1;
        wait
    }
}
