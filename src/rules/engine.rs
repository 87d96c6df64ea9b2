//! Session engine trait shared by the hazard and card-matching games.
//!
//! Engines are pure state machines:
//! - `on_input` applies one event (pointer, tick, dialog resolution)
//! - `snapshot` returns a cheap read-only copy of the state
//! - the terminal callback fires exactly once when the session ends
//!
//! Engines never sleep. When a transition must happen "after a short delay"
//! (quiz feedback, mismatched cards flipping back) the engine returns
//! `InputOutcome::Deferred` and the host feeds the event back later.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::GameKind;
use crate::persistence::ScoreDetails;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Every target completed before its countdown ran out.
    Succeeded,
    /// At least one countdown ran out.
    TimedOut,
}

/// Final result of a session, handed to the terminal callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerminalReport {
    pub kind: GameKind,
    pub outcome: SessionOutcome,
    pub score: u8,
    pub details: ScoreDetails,
}

/// Why an input was dropped without changing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Session (or current target) is not accepting input.
    NotActive,
    /// A blocking overlay (quiz, time-up notice) is open.
    Blocked,
    /// Card already matched.
    AlreadyMatched,
    /// Card already face up.
    AlreadyFlipped,
    /// Two cards are face up awaiting resolution.
    AwaitingResolution,
    /// Index or option slot does not exist.
    OutOfRange,
    /// Resolution event no longer matches the state it was scheduled for.
    Stale,
    /// Pointer could not be mapped onto the image.
    InvalidPointer,
}

/// Result of feeding one event to an engine.
#[derive(Clone, Debug, PartialEq)]
pub enum InputOutcome<E> {
    /// State changed.
    Applied,
    /// State unchanged.
    Ignored(IgnoreReason),
    /// State changed; deliver `event` after `after` to finish the transition.
    Deferred { event: E, after: Duration },
}

impl<E> InputOutcome<E> {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, InputOutcome::Ignored(_))
    }

    /// Convert the deferred event type.
    pub fn map_event<F, T>(self, f: F) -> InputOutcome<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            InputOutcome::Applied => InputOutcome::Applied,
            InputOutcome::Ignored(reason) => InputOutcome::Ignored(reason),
            InputOutcome::Deferred { event, after } => InputOutcome::Deferred { event: f(event), after },
        }
    }
}

/// Terminal callback type.
pub type TerminalCallback = Box<dyn FnMut(&TerminalReport) + Send>;

/// Session engine trait.
pub trait SessionEngine {
    /// Input events this engine understands.
    type Event;
    /// Read-only state copy.
    type Snapshot;

    /// Apply one event.
    fn on_input(&mut self, event: Self::Event) -> InputOutcome<Self::Event>;

    /// Current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Register the callback fired once on reaching a terminal state.
    ///
    /// Registering after the session already ended fires immediately.
    fn set_on_terminal(&mut self, callback: TerminalCallback);

    /// Final result, once the session has ended.
    fn terminal_report(&self) -> Option<TerminalReport>;

    fn is_terminal(&self) -> bool {
        self.terminal_report().is_some()
    }
}

/// Fires a terminal callback at most once.
#[derive(Default)]
pub struct TerminalNotifier {
    callback: Option<TerminalCallback>,
    fired: bool,
}

impl TerminalNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback; fire it now if `report` is already final.
    pub fn register(&mut self, mut callback: TerminalCallback, report: Option<TerminalReport>) {
        match report {
            Some(report) if !self.fired => {
                self.fired = true;
                callback(&report);
                self.callback = Some(callback);
            }
            _ => self.callback = Some(callback),
        }
    }

    /// Fire for `report`. Later calls are no-ops.
    pub fn notify(&mut self, report: &TerminalReport) {
        if self.fired {
            return;
        }
        if let Some(callback) = self.callback.as_mut() {
            self.fired = true;
            callback(report);
        }
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl std::fmt::Debug for TerminalNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalNotifier")
            .field("registered", &self.callback.is_some())
            .field("fired", &self.fired)
            .finish()
    }
}
