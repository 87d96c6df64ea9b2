//! Firm catalog: the read-only content both engines are built from.
//!
//! The catalog is owned by an external store. Sessions copy what they need
//! at creation time and never write back.

pub mod types;
pub mod source;

pub use types::{
    Firm, GameEntry, GameKind, GameStatus, HazardZone, ImageTarget, Pair, QuizChallenge,
    StoredAsset, StoredZone, QUIZ_OPTION_COUNT,
};
pub use source::{active_games, find_firm, CatalogSource, InMemoryCatalog};
