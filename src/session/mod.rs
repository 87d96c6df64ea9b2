//! Game sessions built from catalog content.
//!
//! `GameSession` wraps either engine behind one `SessionEngine` so a host
//! (or the runtime driver) can run whichever game a firm has enabled.

use tracing::{debug, warn};

use crate::catalog::{CatalogSource, GameKind};
use crate::core::{EngineConfig, GameError, Result};
use crate::games::hazard::{HazardEvent, HazardSession, HazardSnapshot};
use crate::games::matching::{MatchEvent, MatchSession, MatchSnapshot};
use crate::rules::{IgnoreReason, InputOutcome, SessionEngine, TerminalCallback, TerminalReport};

/// Input for either engine.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Hazard(HazardEvent),
    Matching(MatchEvent),
}

impl From<HazardEvent> for GameEvent {
    fn from(event: HazardEvent) -> Self {
        GameEvent::Hazard(event)
    }
}

impl From<MatchEvent> for GameEvent {
    fn from(event: MatchEvent) -> Self {
        GameEvent::Matching(event)
    }
}

/// Snapshot of either engine.
#[derive(Clone, Debug)]
pub enum SessionSnapshot {
    Hazard(HazardSnapshot),
    Matching(MatchSnapshot),
}

/// One play-through of one game.
#[derive(Debug)]
pub enum GameSession {
    Hazard(HazardSession),
    Matching(MatchSession),
}

impl GameSession {
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            GameSession::Hazard(_) => GameKind::Hazard,
            GameSession::Matching(_) => GameKind::Matching,
        }
    }

    /// The one-second tick event for this engine.
    #[must_use]
    pub fn tick_event(&self) -> GameEvent {
        match self {
            GameSession::Hazard(_) => GameEvent::Hazard(HazardEvent::Tick),
            GameSession::Matching(_) => GameEvent::Matching(MatchEvent::Tick),
        }
    }
}

impl SessionEngine for GameSession {
    type Event = GameEvent;
    type Snapshot = SessionSnapshot;

    fn on_input(&mut self, event: GameEvent) -> InputOutcome<GameEvent> {
        match (self, event) {
            (GameSession::Hazard(s), GameEvent::Hazard(e)) => s.on_input(e).map_event(GameEvent::Hazard),
            (GameSession::Matching(s), GameEvent::Matching(e)) => s.on_input(e).map_event(GameEvent::Matching),
            (session, event) => {
                debug!(kind = %session.kind(), ?event, "event for the other game ignored");
                InputOutcome::Ignored(IgnoreReason::NotActive)
            }
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        match self {
            GameSession::Hazard(s) => SessionSnapshot::Hazard(s.snapshot()),
            GameSession::Matching(s) => SessionSnapshot::Matching(s.snapshot()),
        }
    }

    fn set_on_terminal(&mut self, callback: TerminalCallback) {
        match self {
            GameSession::Hazard(s) => s.set_on_terminal(callback),
            GameSession::Matching(s) => s.set_on_terminal(callback),
        }
    }

    fn terminal_report(&self) -> Option<TerminalReport> {
        match self {
            GameSession::Hazard(s) => s.terminal_report(),
            GameSession::Matching(s) => s.terminal_report(),
        }
    }
}

/// Build a session for `kind` from `firm_name`'s catalog entry.
///
/// Fails with `CatalogEmpty` when the firm or game is missing, the game is
/// not active, or it has nothing to play. Catalog read failures pass through.
pub async fn load_session(
    catalog: &dyn CatalogSource,
    firm_name: &str,
    kind: GameKind,
    config: &EngineConfig,
) -> Result<GameSession> {
    let firm = catalog.get_firm_by_name(firm_name).await?.ok_or_else(|| {
        warn!(firm = firm_name, "firm not found");
        GameError::CatalogEmpty(format!("firm '{}' not found", firm_name.trim()))
    })?;

    let entry = firm
        .game(kind)
        .ok_or_else(|| GameError::CatalogEmpty(format!("{} has no {kind} entry", firm.name)))?;
    if !entry.status.is_playable() {
        return Err(GameError::CatalogEmpty(format!("{kind} is {} for {}", entry.status.label(), firm.name)));
    }

    let rng = config.rng();
    let session = match kind {
        GameKind::Hazard => {
            let targets = entry.image_targets()?;
            GameSession::Hazard(HazardSession::new(targets, config, Box::new(rng.for_context("quiz")))?)
        }
        GameKind::Matching => {
            let mut deck_rng = rng.for_context("deck");
            GameSession::Matching(MatchSession::new(&entry.pairs, config, &mut deck_rng)?)
        }
    };
    debug!(firm = %firm.name, %kind, "session loaded");
    Ok(session)
}
