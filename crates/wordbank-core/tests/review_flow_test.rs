//! Integration tests for the review flow.
//!
//! Drives ingestion, selection, answers and snapshots through the public API
//! with a fixed clock and seeded randomness.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_test::{assert_err, assert_ok};
use wordbank_core::{
    Choice, ListRegistry, LookupCache, Lookup, Normalizer, Outcome, ReviewConfig, SnapshotStore,
    SqliteSnapshotStore, WordbankResult,
};

/// Every word normalizes to its lowercase self with frequency 5.
struct IdentityNormalizer;

#[async_trait]
impl Normalizer for IdentityNormalizer {
    async fn normalize(&self, raw: &str) -> WordbankResult<Option<Lookup>> {
        Ok(Some(Lookup::new(raw.to_lowercase(), 5.0)))
    }

    fn provider_name(&self) -> &str {
        "identity"
    }
}

fn config() -> ReviewConfig {
    ReviewConfig {
        repeat_init_secs: 100,
        repeat_mult: 4.0,
        repeat_max_secs: 10_000,
        wrong_cooldown_secs: 50,
        min_available: 2,
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[tokio::test]
async fn test_failed_word_is_not_chosen_again_immediately() {
    let cache = LookupCache::new(Arc::new(IdentityNormalizer));
    let store = Arc::new(SqliteSnapshotStore::in_memory().unwrap());
    let registry = ListRegistry::new(store);

    let list = registry.get_or_create("alice").await;
    let mut list = list.lock().await;
    let report = list.ingest("A\nB\nC\n", &cache).await;
    assert_eq!(report.added.len(), 3);

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let first = list.choose_at(&config(), at(0), &mut rng);
        let first = first.word().unwrap().to_string();
        assert!(["a", "b", "c"].contains(&first.as_str()));
        assert_ok!(list.record_result_at(Outcome::Failure, at(0)));

        let next = list.choose_at(&config(), at(0), &mut rng);
        assert!(!next.is_terminal());
        assert_ne!(next.word(), Some(first.as_str()));

        // Let every cooldown expire before the next round.
        let mut fresh = wordbank_core::WordList::new("alice");
        fresh.ingest("A\nB\nC\n", &cache).await;
        *list = fresh;
    }
}

#[tokio::test]
async fn test_successes_push_review_out() {
    let cache = LookupCache::new(Arc::new(IdentityNormalizer));
    let mut list = wordbank_core::WordList::new("alice");
    list.ingest("only\n", &cache).await;
    let mut rng = StdRng::seed_from_u64(1);

    // First success: due after 100s. Second: after 400s. Then 1600s.
    let mut answered_at = 0;
    for interval in [100, 400, 1600] {
        assert_eq!(
            list.choose_at(&config(), at(answered_at), &mut rng),
            Choice::Word("only".to_string())
        );
        assert_ok!(list.record_result_at(Outcome::Success, at(answered_at)));

        assert_eq!(
            list.choose_at(&config(), at(answered_at + interval), &mut rng),
            Choice::NothingDue
        );
        answered_at += interval + 1;
    }

    assert_eq!(
        list.choose_at(&config(), at(answered_at), &mut rng),
        Choice::Word("only".to_string())
    );
    assert_eq!(list.stats().to_string(), "repeat: 1");
}

#[tokio::test]
async fn test_answers_without_a_shown_word_are_rejected() {
    let mut list = wordbank_core::WordList::new("alice");
    assert_eq!(list.choose(&config()), Choice::Empty);
    assert_err!(list.record_result(Outcome::Success));
    assert_err!(list.delete_current());
    assert!(list.is_empty());
    assert!(list.banned_words().is_empty());
}

#[tokio::test]
async fn test_snapshot_restores_lists_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordbank.db");

    {
        let store = Arc::new(SqliteSnapshotStore::new(&path).unwrap());
        let cache = LookupCache::new(Arc::new(IdentityNormalizer));
        let registry = ListRegistry::new(store.clone());

        for (user, words) in [("alice", "cat\ndog\n"), ("bob", "tree\n")] {
            let list = registry.get_or_create(user).await;
            let mut list = list.lock().await;
            list.ingest(words, &cache).await;
            list.choose(&config());
            assert_ok!(list.delete_current());
        }

        assert!(registry.snapshot_all().await.is_complete());
        assert_eq!(cache.persist(store.as_ref()).await.unwrap(), 3);
    }

    let store = Arc::new(SqliteSnapshotStore::new(&path).unwrap());
    let registry = ListRegistry::new(store.clone());
    let report = registry.restore_all().await.unwrap();
    assert_eq!(report.restored, 2);
    assert_eq!(store.list_usernames().unwrap(), vec!["alice", "bob"]);

    let alice = registry.get("alice").await.unwrap();
    let alice = alice.lock().await;
    assert_eq!(alice.len(), 1);
    assert_eq!(alice.banned_words().len(), 1);
    assert!(alice.current_word().is_none());

    let bob = registry.get("bob").await.unwrap();
    let bob = bob.lock().await;
    assert!(bob.is_empty());
    assert_eq!(bob.banned_words()[0].value(), "tree");

    let cache = LookupCache::new(Arc::new(IdentityNormalizer));
    assert_eq!(cache.restore(store.as_ref()).await.unwrap(), 3);
    let known: HashSet<String> = cache.snapshot().await.into_keys().collect();
    assert!(known.contains("tree"));
}
