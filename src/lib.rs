//! # firm-games
//!
//! Timed mini-games for competing firms, with best-score persistence.
//!
//! ## Design Principles
//!
//! 1. **Engines are pure state machines**: input events in, snapshots out.
//!    No engine sleeps or reads the wall clock; ticks and delayed
//!    resolutions are events too, so every session can be replayed.
//!
//! 2. **Shuffles are injected**: decks and quiz options are ordered by a
//!    `Permuter`, seeded `GameRng` in production and fixed orders in tests.
//!
//! 3. **One write per session**: a terminal session commits its score
//!    through a `PersistenceGuard`, keeping only the best record per
//!    (player, firm, game).
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: per-image progress lives in `im`
//!   collections so snapshots are O(1) clones.
//!
//! - **Async at the edges**: catalog and score stores are `async_trait`
//!   interfaces; `runtime::SessionDriver` hosts a session on tokio.
//!
//! ## Modules
//!
//! - `core`: Identifiers, RNG, configuration, errors
//! - `clock`: Session countdown
//! - `scoring`: Effort-based score calculator
//! - `catalog`: Firm catalog types and source
//! - `rules`: `SessionEngine` trait shared by both games
//! - `games`: Hazard-spotting and card-matching engines
//! - `session`: Building a session from the catalog
//! - `persistence`: Score store, arbitration guard, leaderboards
//! - `runtime`: Tokio event loop for one session

pub mod core;
pub mod clock;
pub mod scoring;
pub mod catalog;
pub mod rules;
pub mod games;
pub mod session;
pub mod persistence;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::{
    CardId, FirmName, PairId, PlayerId, ZoneId,
    GameRng, GameRngState, Permuter, SequencePermuter,
    EngineConfig, QuizClockPolicy,
    GameError, Result,
};

pub use crate::clock::{ClockState, ClockTick, SessionClock};

pub use crate::scoring::{mean_with_failure_veto, score, score_for_effort, MAX_SCORE};

pub use crate::catalog::{
    active_games, find_firm, CatalogSource, Firm, GameEntry, GameKind, GameStatus,
    HazardZone, ImageTarget, InMemoryCatalog, Pair, QuizChallenge,
};

pub use crate::rules::{IgnoreReason, InputOutcome, SessionEngine, SessionOutcome, TerminalReport};

pub use crate::games::hazard::{HazardEvent, HazardSession, HazardSnapshot, PointerEvent, RenderedBox};
pub use crate::games::matching::{MatchEvent, MatchSession, MatchSnapshot};

pub use crate::session::{load_session, GameEvent, GameSession, SessionSnapshot};

pub use crate::persistence::{
    best_by_player, firm_leaderboard, InMemoryScoreStore, PersistenceGuard, SaveOutcome,
    ScoreDetails, ScoreKey, ScoreRecord, ScoreStore,
};

pub use crate::runtime::{DriverHandle, DriverReport, SessionDriver};
