//! Read-side views over stored scores.

use rustc_hash::FxHashMap;

use super::store::{ScoreFilter, ScoreRecord, ScoreStore};
use crate::core::Result;

/// Every record for `firm` (case-insensitive, trimmed), newest first.
pub async fn firm_leaderboard(store: &dyn ScoreStore, firm: &str) -> Result<Vec<ScoreRecord>> {
    let wanted = firm.trim().to_lowercase();
    let mut records: Vec<ScoreRecord> = store
        .list_scores(&ScoreFilter::all())
        .await?
        .into_iter()
        .map(|s| s.record)
        .filter(|r| r.firm_name.trim().to_lowercase() == wanted)
        .collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// Highest record per (player, game), best score first.
///
/// Ties keep the newer record. Output ties are ordered by player then game.
#[must_use]
pub fn best_by_player(records: &[ScoreRecord]) -> Vec<ScoreRecord> {
    let mut best: FxHashMap<(&str, &str), &ScoreRecord> = FxHashMap::default();
    for record in records {
        best.entry((record.player_id.as_str(), record.game_name.as_str()))
            .and_modify(|current| {
                if (record.score, record.created_at) > (current.score, current.created_at) {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    let mut out: Vec<ScoreRecord> = best.into_values().cloned().collect();
    out.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.player_id.cmp(&b.player_id))
            .then_with(|| a.game_name.cmp(&b.game_name))
    });
    out
}
