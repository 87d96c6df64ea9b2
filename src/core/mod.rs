//! Core types: identifiers, RNG, configuration, errors.
//!
//! Everything here is game-agnostic. Both session engines and the score
//! store build on these types.

pub mod ids;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{CardId, FirmName, PairId, PlayerId, ZoneId, MIN_PLAYER_ID_LEN};
pub use rng::{GameRng, GameRngState, Permuter, SequencePermuter};
pub use config::{EngineConfig, QuizClockPolicy};
pub use error::{GameError, Result};
