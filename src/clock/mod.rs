//! Session countdown clock.
//!
//! The clock never touches wall time. Whoever owns the session feeds it
//! `tick()` once per second; the clock decrements and reports `Expired`
//! exactly once when it reaches zero. This keeps both engines testable by
//! replaying event sequences.
//!
//! ```
//! use firm_games::clock::{ClockTick, SessionClock};
//!
//! let mut clock = SessionClock::new();
//! clock.start(2);
//! assert_eq!(clock.tick(), ClockTick::Running { remaining: 1 });
//! assert_eq!(clock.tick(), ClockTick::Expired);
//! assert_eq!(clock.tick(), ClockTick::Idle);
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle of a countdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    /// Never started.
    #[default]
    Idle,
    /// Counting down.
    Running,
    /// Temporarily halted; `resume()` continues from the same remaining time.
    Paused,
    /// Reached zero and fired `Expired`.
    Expired,
    /// Stopped without expiring.
    Cancelled,
}

/// Result of feeding one tick to the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockTick {
    /// Clock was not running; nothing changed.
    Idle,
    /// Decremented; still time left.
    Running { remaining: u32 },
    /// Just reached zero. Reported once per start.
    Expired,
}

/// One countdown per session.
#[derive(Clone, Debug, Default)]
pub struct SessionClock {
    duration: u32,
    remaining: u32,
    state: ClockState,
}

impl SessionClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `duration_seconds`.
    ///
    /// Any run already in progress is replaced.
    pub fn start(&mut self, duration_seconds: u32) {
        self.duration = duration_seconds;
        self.remaining = duration_seconds;
        self.state = if duration_seconds == 0 {
            ClockState::Expired
        } else {
            ClockState::Running
        };
    }

    /// Cancel the current run and start a fresh one.
    pub fn reset(&mut self, duration_seconds: u32) {
        self.cancel();
        self.start(duration_seconds);
    }

    /// Stop without firing `Expired`.
    pub fn cancel(&mut self) {
        if matches!(self.state, ClockState::Running | ClockState::Paused) {
            self.state = ClockState::Cancelled;
        }
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> ClockTick {
        if self.state != ClockState::Running {
            return ClockTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = ClockState::Expired;
            ClockTick::Expired
        } else {
            ClockTick::Running { remaining: self.remaining }
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}
