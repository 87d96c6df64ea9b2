//! Best-score arbitration with a once-per-session write guard.
//!
//! A new score is written only when the key has no record yet, or the new
//! score beats every stored one. Older records are deleted first so at most
//! one record per key survives.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::store::{ScoreDetails, ScoreKey, ScoreRecord, ScoreStore};
use crate::core::Result;

/// What `commit` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// First record for the key.
    Created { id: String },
    /// Beat the previous best; older records removed.
    Replaced { id: String, previous: u8 },
    /// Not higher than the stored best; nothing written.
    Kept { best: u8 },
    /// This session already saved (or is saving).
    AlreadySaved,
}

impl SaveOutcome {
    /// Whether a new record was written.
    #[must_use]
    pub fn wrote(&self) -> bool {
        matches!(self, SaveOutcome::Created { .. } | SaveOutcome::Replaced { .. })
    }
}

/// Per-session test-and-set flag around score arbitration.
///
/// The flag is raised before any store call and lowered again only when the
/// lookup or the create fails, which permits one retry.
#[derive(Debug, Default)]
pub struct PersistenceGuard {
    taken: AtomicBool,
}

impl PersistenceGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `false` if it was already raised.
    pub fn try_acquire(&self) -> bool {
        self.taken
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.taken.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.taken.load(Ordering::Acquire)
    }

    /// Arbitrate and, if warranted, store `score` under `key`.
    ///
    /// Lookup and create failures lower the guard and are returned. A failed
    /// delete of an older record is logged and the write still goes ahead.
    pub async fn commit(
        &self,
        store: &dyn ScoreStore,
        key: &ScoreKey,
        score: u8,
        details: ScoreDetails,
    ) -> Result<SaveOutcome> {
        if !self.try_acquire() {
            debug!(player = %key.player_id, game = %key.game, "score already saved for this session");
            return Ok(SaveOutcome::AlreadySaved);
        }

        let existing = match store.list_scores(&key.filter()).await {
            Ok(existing) => existing,
            Err(err) => {
                self.release();
                warn!(player = %key.player_id, error = %err, "score lookup failed");
                return Err(err);
            }
        };

        let best = existing.iter().map(|s| s.record.score).max();
        if let Some(best) = best {
            if score <= best {
                info!(player = %key.player_id, game = %key.game, score, best, "keeping earlier score");
                return Ok(SaveOutcome::Kept { best });
            }
        }

        for old in &existing {
            if let Err(err) = store.delete_score(&old.id).await {
                warn!(id = %old.id, error = %err, "failed to delete old score");
            }
        }

        let id = match store.create_score(ScoreRecord::new(key, score, details)).await {
            Ok(id) => id,
            Err(err) => {
                self.release();
                warn!(player = %key.player_id, error = %err, "score write failed");
                return Err(err);
            }
        };

        info!(player = %key.player_id, firm = %key.firm_name, game = %key.game, score, "score saved");
        Ok(match best {
            Some(previous) => SaveOutcome::Replaced { id, previous },
            None => SaveOutcome::Created { id },
        })
    }
}
