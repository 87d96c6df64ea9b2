//! Card-matching session.
//!
//! States: `Loading -> Active -> {Succeeded | TimedOut}`.
//!
//! A single countdown covers the whole session. Clicks flip cards one at a
//! time; once two are face up they either lock in as a match immediately or
//! stay up until a deferred `ResolveMismatch` flips them back.

use smallvec::SmallVec;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::deck::{build_deck, Card};
use crate::catalog::{GameKind, Pair};
use crate::clock::{ClockTick, SessionClock};
use crate::core::{EngineConfig, Permuter, Result};
use crate::persistence::ScoreDetails;
use crate::rules::{
    IgnoreReason, InputOutcome, SessionEngine, SessionOutcome, TerminalCallback, TerminalNotifier,
    TerminalReport,
};
use crate::scoring::score_for_effort;

/// Session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Deck built, waiting for the grid to render.
    Loading,
    Active,
    Succeeded,
    TimedOut,
}

impl MatchStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Succeeded | MatchStatus::TimedOut)
    }
}

/// Inputs to a matching session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    /// Grid rendered; start the countdown.
    Start,
    /// Click on the card at this deck index.
    Flip(usize),
    /// Flip two mismatched cards back (scheduled after the mismatch delay).
    ResolveMismatch,
    /// One second elapsed.
    Tick,
}

/// Read-only view of a matching session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub deck: Vec<Card>,
    pub flipped: SmallVec<[usize; 2]>,
    pub matched: Vec<usize>,
    pub click_count: u32,
    pub remaining_seconds: u32,
    pub status: MatchStatus,
    pub score: Option<u8>,
}

impl MatchSnapshot {
    /// Whether the card at `index` is currently face up.
    #[must_use]
    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.matched.contains(&index)
    }
}

type MatchOutcome = InputOutcome<MatchEvent>;

/// One play-through of a card-matching game.
pub struct MatchSession {
    pairs_count: usize,
    deck: Vec<Card>,
    flipped: SmallVec<[usize; 2]>,
    matched: FxHashSet<usize>,
    click_count: u32,
    clock: SessionClock,
    status: MatchStatus,
    config: EngineConfig,
    notifier: TerminalNotifier,
    report: Option<TerminalReport>,
}

impl MatchSession {
    /// Create a session, building and shuffling the deck from `pairs`.
    pub fn new(pairs: &[Pair], config: &EngineConfig, permuter: &mut dyn Permuter) -> Result<Self> {
        let deck = build_deck(pairs, permuter)?;
        let mut clock = SessionClock::new();
        clock.start(config.match_seconds);
        clock.cancel();

        Ok(Self {
            pairs_count: pairs.len(),
            deck,
            flipped: SmallVec::new(),
            matched: FxHashSet::default(),
            click_count: 0,
            clock,
            status: MatchStatus::Loading,
            config: config.clone(),
            notifier: TerminalNotifier::new(),
            report: None,
        })
    }

    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Minimum clicks to finish: one per card.
    #[must_use]
    pub fn ideal_clicks(&self) -> u32 {
        (self.pairs_count * 2) as u32
    }

    fn start(&mut self) -> MatchOutcome {
        if self.status != MatchStatus::Loading {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        self.status = MatchStatus::Active;
        self.clock.reset(self.config.match_seconds);
        debug!(cards = self.deck.len(), seconds = self.config.match_seconds, "match session active");
        InputOutcome::Applied
    }

    fn flip(&mut self, index: usize) -> MatchOutcome {
        if self.status != MatchStatus::Active {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        if index >= self.deck.len() {
            return InputOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if self.matched.contains(&index) {
            return InputOutcome::Ignored(IgnoreReason::AlreadyMatched);
        }
        if self.flipped.contains(&index) {
            return InputOutcome::Ignored(IgnoreReason::AlreadyFlipped);
        }
        if self.flipped.len() >= 2 {
            return InputOutcome::Ignored(IgnoreReason::AwaitingResolution);
        }

        self.click_count += 1;
        self.flipped.push(index);

        if self.flipped.len() < 2 {
            return InputOutcome::Applied;
        }

        let (first, second) = (self.flipped[0], self.flipped[1]);
        if self.deck[first].matches(&self.deck[second]) {
            debug!(pair = %self.deck[first].pair_id, "pair matched");
            self.matched.insert(first);
            self.matched.insert(second);
            self.flipped.clear();
            if self.matched.len() == self.deck.len() {
                self.finish(MatchStatus::Succeeded);
            }
            InputOutcome::Applied
        } else {
            debug!(first, second, "mismatch");
            InputOutcome::Deferred {
                event: MatchEvent::ResolveMismatch,
                after: self.config.mismatch_resolve_delay(),
            }
        }
    }

    fn resolve_mismatch(&mut self) -> MatchOutcome {
        if self.status != MatchStatus::Active || self.flipped.len() < 2 {
            return InputOutcome::Ignored(IgnoreReason::Stale);
        }
        self.flipped.clear();
        InputOutcome::Applied
    }

    fn tick(&mut self) -> MatchOutcome {
        if self.status != MatchStatus::Active {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        match self.clock.tick() {
            ClockTick::Idle => InputOutcome::Ignored(IgnoreReason::NotActive),
            ClockTick::Running { .. } => InputOutcome::Applied,
            ClockTick::Expired => {
                self.finish(MatchStatus::TimedOut);
                InputOutcome::Applied
            }
        }
    }

    fn finish(&mut self, status: MatchStatus) {
        self.status = status;
        self.clock.cancel();

        let failed = status == MatchStatus::TimedOut;
        let score = score_for_effort(self.ideal_clicks(), self.click_count, failed);
        let outcome = if failed { SessionOutcome::TimedOut } else { SessionOutcome::Succeeded };

        let report = TerminalReport {
            kind: GameKind::Matching,
            outcome,
            score,
            details: ScoreDetails::Matching {
                click_count: self.click_count,
                pairs_count: self.pairs_count,
                time_remaining: self.clock.remaining(),
                completed: !failed,
                failed,
            },
        };
        info!(score, clicks = self.click_count, ?outcome, "match session finished");
        self.notifier.notify(&report);
        self.report = Some(report);
    }
}

impl SessionEngine for MatchSession {
    type Event = MatchEvent;
    type Snapshot = MatchSnapshot;

    fn on_input(&mut self, event: MatchEvent) -> MatchOutcome {
        match event {
            MatchEvent::Start => self.start(),
            MatchEvent::Flip(index) => self.flip(index),
            MatchEvent::ResolveMismatch => self.resolve_mismatch(),
            MatchEvent::Tick => self.tick(),
        }
    }

    fn snapshot(&self) -> MatchSnapshot {
        let mut matched: Vec<usize> = self.matched.iter().copied().collect();
        matched.sort_unstable();
        MatchSnapshot {
            deck: self.deck.clone(),
            flipped: self.flipped.clone(),
            matched,
            click_count: self.click_count,
            remaining_seconds: self.clock.remaining(),
            status: self.status,
            score: self.report.as_ref().map(|r| r.score),
        }
    }

    fn set_on_terminal(&mut self, callback: TerminalCallback) {
        self.notifier.register(callback, self.report.clone());
    }

    fn terminal_report(&self) -> Option<TerminalReport> {
        self.report.clone()
    }
}

impl std::fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("status", &self.status)
            .field("flipped", &self.flipped)
            .field("matched", &self.matched.len())
            .field("click_count", &self.click_count)
            .finish_non_exhaustive()
    }
}
