//! Score persistence.
//!
//! - `store`: records, keys and the async `ScoreStore` interface
//! - `guard`: best-score arbitration, at most one write per session
//! - `leaderboard`: per-firm listings

mod guard;
mod leaderboard;
mod store;

pub use guard::{PersistenceGuard, SaveOutcome};
pub use leaderboard::{best_by_player, firm_leaderboard};
pub use store::{
    InMemoryScoreStore, ScoreDetails, ScoreFilter, ScoreKey, ScoreRecord, ScoreStore, StoredScore,
};
