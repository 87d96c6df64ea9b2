//! Score arbitration and persistence integration tests.

use std::sync::Arc;

use firm_games::catalog::GameKind;
use firm_games::persistence::{
    best_by_player, firm_leaderboard, InMemoryScoreStore, PersistenceGuard, SaveOutcome, ScoreDetails,
    ScoreFilter, ScoreKey, ScoreStore,
};
use proptest::prelude::*;

fn key(player: &str, game: GameKind) -> ScoreKey {
    ScoreKey::parse(player, "Acme", game).unwrap()
}

fn details(score: u8) -> ScoreDetails {
    ScoreDetails::Hazard {
        image_count: 1,
        image_scores: vec![score],
        click_counts: vec![4],
        completed_images: vec![0],
        has_failed: score == 0,
    }
}

/// One fresh session finishing with `score`.
async fn play(store: &InMemoryScoreStore, key: &ScoreKey, score: u8) -> SaveOutcome {
    PersistenceGuard::new().commit(store, key, score, details(score)).await.unwrap()
}

async fn stored_scores(store: &InMemoryScoreStore, key: &ScoreKey) -> Vec<u8> {
    store
        .list_scores(&key.filter())
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.record.score)
        .collect()
}

// =============================================================================
// Best-score Arbitration
// =============================================================================

/// Test the 40 / 30 / 70 sequence: create, keep, replace.
#[tokio::test]
async fn test_best_score_sequence() {
    let store = InMemoryScoreStore::new();
    let k = key("p-01", GameKind::Hazard);

    assert!(matches!(play(&store, &k, 40).await, SaveOutcome::Created { .. }));
    assert_eq!(stored_scores(&store, &k).await, vec![40]);

    assert_eq!(play(&store, &k, 30).await, SaveOutcome::Kept { best: 40 });
    assert_eq!(stored_scores(&store, &k).await, vec![40]);

    assert!(matches!(play(&store, &k, 70).await, SaveOutcome::Replaced { previous: 40, .. }));
    assert_eq!(stored_scores(&store, &k).await, vec![70]);
    assert_eq!(store.create_count(), 2);
}

/// Test that a first-play zero is recorded and then beaten.
#[tokio::test]
async fn test_zero_first_play() {
    let store = InMemoryScoreStore::new();
    let k = key("p-01", GameKind::Matching);
    assert!(play(&store, &k, 0).await.wrote());
    assert_eq!(play(&store, &k, 0).await, SaveOutcome::Kept { best: 0 });
    assert!(play(&store, &k, 1).await.wrote());
    assert_eq!(stored_scores(&store, &k).await, vec![1]);
}

/// Test that keys differing in player or game are independent.
#[tokio::test]
async fn test_keys_are_independent() {
    let store = InMemoryScoreStore::new();
    play(&store, &key("p-01", GameKind::Hazard), 90).await;
    play(&store, &key("p-01", GameKind::Matching), 10).await;
    play(&store, &key("p-02", GameKind::Hazard), 20).await;

    assert_eq!(store.list_scores(&ScoreFilter::all()).await.unwrap().len(), 3);
    assert_eq!(stored_scores(&store, &key("p-01", GameKind::Matching)).await, vec![10]);
}

/// Test that legacy duplicates are collapsed by the next higher score.
#[tokio::test]
async fn test_legacy_duplicates_collapsed() {
    let store = InMemoryScoreStore::new();
    let k = key("p-01", GameKind::Hazard);
    let record = |score| firm_games::persistence::ScoreRecord::new(&k, score, details(score));
    store.seed(record(20)).await;
    store.seed(record(50)).await;

    assert_eq!(play(&store, &k, 50).await, SaveOutcome::Kept { best: 50 });
    assert!(matches!(play(&store, &k, 60).await, SaveOutcome::Replaced { previous: 50, .. }));
    assert_eq!(stored_scores(&store, &k).await, vec![60]);
}

// =============================================================================
// Guard
// =============================================================================

/// Test that racing commits on one session's guard write once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commits_single_write() {
    let store = Arc::new(InMemoryScoreStore::new());
    let guard = Arc::new(PersistenceGuard::new());
    let k = key("p-01", GameKind::Hazard);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let guard = Arc::clone(&guard);
            let k = k.clone();
            tokio::spawn(async move { guard.commit(store.as_ref(), &k, 55, details(55)).await.unwrap() })
        })
        .collect();

    let mut wrote = 0;
    for task in tasks {
        let outcome = task.await.unwrap();
        if outcome.wrote() {
            wrote += 1;
        } else {
            assert_eq!(outcome, SaveOutcome::AlreadySaved);
        }
    }
    assert_eq!(wrote, 1);
    assert_eq!(store.create_count(), 1);
    assert!(guard.is_set());
}

/// Test that a failed create lowers the guard so a retry can succeed.
#[tokio::test]
async fn test_create_failure_allows_retry() {
    let store = InMemoryScoreStore::new();
    let guard = PersistenceGuard::new();
    let k = key("p-01", GameKind::Hazard);

    store.set_fail_create(true);
    let err = guard.commit(&store, &k, 80, details(80)).await.unwrap_err();
    assert!(err.is_persistence());
    assert!(!guard.is_set());

    store.set_fail_create(false);
    assert!(guard.commit(&store, &k, 80, details(80)).await.unwrap().wrote());
    assert!(guard.is_set());
}

/// Test that a kept score still consumes the guard.
#[tokio::test]
async fn test_kept_score_holds_guard() {
    let store = InMemoryScoreStore::new();
    let k = key("p-01", GameKind::Hazard);
    play(&store, &k, 90).await;

    let guard = PersistenceGuard::new();
    assert_eq!(guard.commit(&store, &k, 10, details(10)).await.unwrap(), SaveOutcome::Kept { best: 90 });
    assert!(guard.is_set());
    assert_eq!(guard.commit(&store, &k, 95, details(95)).await.unwrap(), SaveOutcome::AlreadySaved);
}

// =============================================================================
// Leaderboards
// =============================================================================

/// Test the leaderboard after a few sessions.
#[tokio::test]
async fn test_leaderboard_after_sessions() {
    let store = InMemoryScoreStore::new();
    play(&store, &key("ali", GameKind::Hazard), 40).await;
    play(&store, &key("ali", GameKind::Hazard), 70).await;
    play(&store, &key("bob", GameKind::Hazard), 85).await;
    play(&store, &ScoreKey::parse("cem", "Globex", GameKind::Hazard).unwrap(), 100).await;

    let board = firm_leaderboard(&store, " acme ").await.unwrap();
    assert_eq!(board.len(), 2);

    let best = best_by_player(&board);
    let rows: Vec<_> = best.iter().map(|r| (r.player_id.as_str(), r.score)).collect();
    assert_eq!(rows, vec![("bob", 85), ("ali", 70)]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Test that any run of sessions leaves one record holding the maximum.
    #[test]
    fn prop_single_record_holds_max(scores in prop::collection::vec(0u8..=100, 1..12)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let stored = runtime.block_on(async {
            let store = InMemoryScoreStore::new();
            let k = key("p-01", GameKind::Hazard);
            for &score in &scores {
                play(&store, &k, score).await;
            }
            stored_scores(&store, &k).await
        });
        prop_assert_eq!(stored.len(), 1);
        prop_assert_eq!(stored[0], *scores.iter().max().unwrap());
    }
}
