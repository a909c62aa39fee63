//! Per-item use cooldown gate
//!
//! Tracks last-use and cooldown-end timestamps for one item instance and
//! decides whether an interaction attempt may proceed. While the cooldown is
//! running, attempts are silent no-ops so rapid re-clicking never spams
//! feedback.

use std::time::Duration;

use crate::core::types::GameTime;

/// Cooldown state for a single item instance.
///
/// `cooldown_end` is non-decreasing across any sequence of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCooldown {
    pub duration: Duration,
    pub last_use: GameTime,
    pub cooldown_end: GameTime,
}

impl UseCooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_use: GameTime::ZERO,
            cooldown_end: GameTime::ZERO,
        }
    }

    pub fn is_ready(&self, now: GameTime) -> bool {
        now >= self.cooldown_end
    }

    /// Check-and-set in one call: refuse without mutation while cooling
    /// down, otherwise start a new window.
    ///
    /// The caller is responsible for notifying the cooldown-display
    /// collaborator with the new `last_use`/`cooldown_end` pair after a
    /// `true` return.
    pub fn try_begin_use(&mut self, now: GameTime) -> bool {
        if now < self.cooldown_end {
            return false;
        }
        self.last_use = now;
        self.cooldown_end = now + self.duration;
        true
    }
}
