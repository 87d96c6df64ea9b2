//! Score records and the score store interface.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::catalog::GameKind;
use crate::core::{FirmName, GameError, PlayerId, Result};

/// Engine-specific breakdown stored next to a score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum ScoreDetails {
    Hazard {
        image_count: usize,
        /// Per-image scores, 0 for timed-out or failed images.
        image_scores: Vec<u8>,
        click_counts: Vec<u32>,
        completed_images: Vec<usize>,
        has_failed: bool,
    },
    Matching {
        click_count: u32,
        pairs_count: usize,
        /// Seconds left on the clock when the session ended.
        time_remaining: u32,
        completed: bool,
        failed: bool,
    },
}

/// The (player, firm, game) triple a best score is kept for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub player_id: PlayerId,
    pub firm_name: FirmName,
    pub game: GameKind,
}

impl ScoreKey {
    #[must_use]
    pub fn new(player_id: PlayerId, firm_name: FirmName, game: GameKind) -> Self {
        Self { player_id, firm_name, game }
    }

    /// Build a key from raw login input.
    pub fn parse(player_id: &str, firm_name: &str, game: GameKind) -> Result<Self> {
        Ok(Self::new(PlayerId::parse(player_id)?, FirmName::parse(firm_name)?, game))
    }

    /// Filter selecting every record stored under this key.
    #[must_use]
    pub fn filter(&self) -> ScoreFilter {
        ScoreFilter {
            player_id: Some(self.player_id.as_str().to_string()),
            firm_name: Some(self.firm_name.as_str().to_string()),
            game_name: Some(self.game.catalog_name().to_string()),
        }
    }
}

/// One stored score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_id: String,
    pub firm_name: String,
    pub game_name: String,
    pub score: u8,
    pub details: ScoreDetails,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    #[must_use]
    pub fn new(key: &ScoreKey, score: u8, details: ScoreDetails) -> Self {
        Self {
            player_id: key.player_id.as_str().to_string(),
            firm_name: key.firm_name.as_str().to_string(),
            game_name: key.game.catalog_name().to_string(),
            score,
            details,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A record together with the id the store assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    pub id: String,
    #[serde(flatten)]
    pub record: ScoreRecord,
}

/// Exact-match filter for `list_scores`. `None` fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    pub player_id: Option<String>,
    pub firm_name: Option<String>,
    pub game_name: Option<String>,
}

impl ScoreFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn matches(&self, record: &ScoreRecord) -> bool {
        let field = |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);
        field(&self.player_id, &record.player_id)
            && field(&self.firm_name, &record.firm_name)
            && field(&self.game_name, &record.game_name)
    }
}

/// Score store interface.
///
/// There is no update operation; replacing a score is delete then create.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn list_scores(&self, filter: &ScoreFilter) -> Result<Vec<StoredScore>>;

    /// Store `record` and return its new id.
    async fn create_score(&self, record: ScoreRecord) -> Result<String>;

    async fn delete_score(&self, id: &str) -> Result<()>;
}

/// Score store held in memory, with switchable failures for tests.
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    records: Mutex<Vec<StoredScore>>,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    creates: AtomicUsize,
}

impl InMemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record.
    pub async fn records(&self) -> Vec<StoredScore> {
        self.records.lock().await.clone()
    }

    /// Insert a record directly, bypassing arbitration.
    pub async fn seed(&self, record: ScoreRecord) -> String {
        let id = Uuid::new_v4().to_string();
        self.records.lock().await.push(StoredScore { id: id.clone(), record });
        id
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `create_score` calls.
    #[must_use]
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn list_scores(&self, filter: &ScoreFilter) -> Result<Vec<StoredScore>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(GameError::ScoreLookupFailed("score store unreachable".into()));
        }
        let records = self.records.lock().await;
        Ok(records.iter().filter(|s| filter.matches(&s.record)).cloned().collect())
    }

    async fn create_score(&self, record: ScoreRecord) -> Result<String> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(GameError::ScoreWriteFailed("create rejected".into()));
        }
        let id = Uuid::new_v4().to_string();
        self.records.lock().await.push(StoredScore { id: id.clone(), record });
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn delete_score(&self, id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(GameError::ScoreWriteFailed(format!("delete of {id} rejected")));
        }
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|s| s.id != id);
        if records.len() == before {
            return Err(GameError::ScoreWriteFailed(format!("no score with id {id}")));
        }
        Ok(())
    }
}
