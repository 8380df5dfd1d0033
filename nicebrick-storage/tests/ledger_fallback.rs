//! Vote ledger behaviour against a store that fails on demand.

use std::sync::Arc;

use nicebrick_core::{NiceResult, StorageError, VoteKind, VoteTally};
use nicebrick_storage::VoteLedger;
use nicebrick_test_utils::{fixtures, generators, FailingKvStore};
use proptest::prelude::*;

#[tokio::test]
async fn test_reads_degrade_when_store_goes_away() -> NiceResult<()> {
    let store = Arc::new(FailingKvStore::new());
    let ledger = VoteLedger::new(store.clone());
    let day = fixtures::golden_date()?;

    ledger
        .cast_vote(fixtures::subject(1)?, &day, 3, VoteKind::Like)
        .await?;
    let live = ledger.get_tally(&day, 3).await;
    assert_eq!(live.value, VoteTally::new(1, 0));
    assert!(!live.degraded);

    store.set_fail_reads(true);
    let degraded = ledger.get_tally(&day, 3).await;
    assert!(degraded.degraded);
    assert_eq!(degraded.value, VoteTally::default());

    store.set_fail_reads(false);
    assert_eq!(ledger.get_tally(&day, 3).await.value, VoteTally::new(1, 0));
    Ok(())
}

#[tokio::test]
async fn test_write_failure_is_reported_not_simulated() -> NiceResult<()> {
    let store = Arc::new(FailingKvStore::new());
    store.set_fail_writes(true);
    let ledger = VoteLedger::new(store.clone());
    let day = fixtures::golden_date()?;

    let result = ledger
        .cast_vote(fixtures::subject(1)?, &day, 0, VoteKind::Dislike)
        .await;
    assert!(matches!(result, Err(StorageError::Unavailable { .. })));
    assert_eq!(store.write_count(), 0);

    store.set_fail_writes(false);
    let outcome = ledger
        .cast_vote(fixtures::subject(1)?, &day, 0, VoteKind::Dislike)
        .await?;
    assert!(!outcome.already_voted);
    assert_eq!(outcome.tally, VoteTally::new(0, 1));
    Ok(())
}

#[tokio::test]
async fn test_failed_counter_write_leaves_vote_retryable() -> NiceResult<()> {
    let store = Arc::new(FailingKvStore::new());
    let ledger = VoteLedger::new(store.clone());
    let day = fixtures::golden_date()?;
    let subject = fixtures::subject(11)?;

    store.set_fail_counter_writes(true);
    let result = ledger.cast_vote(subject, &day, 4, VoteKind::Like).await;
    assert!(matches!(result, Err(StorageError::Unavailable { .. })));

    let status = ledger.status(subject, &day, 4).await.value;
    assert!(!status.has_voted);
    assert_eq!(status.tally, VoteTally::default());

    store.set_fail_counter_writes(false);
    let retry = ledger.cast_vote(subject, &day, 4, VoteKind::Like).await?;
    assert!(!retry.already_voted);
    assert_eq!(retry.tally, VoteTally::new(1, 0));

    let status = ledger.status(subject, &day, 4).await.value;
    assert!(status.has_voted);
    assert_eq!(status.tally.likes, 1);
    Ok(())
}

#[tokio::test]
async fn test_repeat_vote_performs_no_counter_write() -> NiceResult<()> {
    let store = Arc::new(FailingKvStore::new());
    let ledger = VoteLedger::new(store.clone());
    let day = fixtures::golden_date()?;
    let subject = fixtures::subject(7)?;

    ledger.cast_vote(subject, &day, 1, VoteKind::Like).await?;
    let after_first = store.write_count();
    ledger.cast_vote(subject, &day, 1, VoteKind::Like).await?;
    // A repeat is one rejected record, with no separate counter write.
    assert_eq!(store.write_count(), after_first + 1);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_votes_count_once_per_subject(
        subjects in proptest::collection::vec(1u64..20, 1..30),
        kind in generators::arb_vote_kind(),
        date in generators::arb_date_key(),
        index in 0usize..25,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let ledger = VoteLedger::new(fixtures::shared_store());
        let distinct: std::collections::HashSet<u64> = subjects.iter().copied().collect();

        let tally = runtime.block_on(async {
            for id in &subjects {
                let subject = fixtures::subject(*id)?;
                ledger.cast_vote(subject, &date, index, kind).await?;
            }
            Ok::<_, nicebrick_core::NiceError>(ledger.get_tally(&date, index).await.value)
        }).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(tally.count(kind), distinct.len() as u64);
        prop_assert_eq!(tally.total(), distinct.len() as u64);
    }
}
