//! In-process store for local development and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

use super::{KvStore, StoreResult};

/// DashMap-backed [`KvStore`].
///
/// Every write goes through a DashMap entry guard, which holds the shard
/// lock for the duration of the update, so `incr` and `sadd` are atomic.
/// `record_vote` keeps the voter set guard while it bumps the counter.
/// State lives only as long as the value; it is not shared across processes.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    counters: DashMap<String, u64>,
    sets: DashMap<String, HashSet<String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members in the set under `key`.
    pub fn set_len(&self, key: &str) -> usize {
        self.sets.get(key).map(|set| set.len()).unwrap_or(0)
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<u64>> {
        Ok(self.counters.get(key).map(|value| *value))
    }

    async fn incr(&self, key: &str) -> StoreResult<u64> {
        let mut entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut entry = self.sets.entry(key.to_string()).or_default();
        Ok(entry.insert(member.to_string()))
    }

    async fn record_vote(
        &self,
        voters_key: &str,
        member: &str,
        counter_key: &str,
    ) -> StoreResult<bool> {
        let mut voters = self.sets.entry(voters_key.to_string()).or_default();
        if !voters.insert(member.to_string()) {
            return Ok(false);
        }
        *self.counters.entry(counter_key.to_string()).or_insert(0) += 1;
        Ok(true)
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.contains(member))
            .unwrap_or(false))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_absent_is_none() -> StoreResult<()> {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_incr_creates_and_counts() -> StoreResult<()> {
        let store = InMemoryKvStore::new();
        assert_eq!(store.incr("k").await?, 1);
        assert_eq!(store.incr("k").await?, 2);
        assert_eq!(store.get("k").await?, Some(2));
        assert_eq!(store.get("other").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_sadd_reports_new_members_only() -> StoreResult<()> {
        let store = InMemoryKvStore::new();
        assert!(store.sadd("s", "1").await?);
        assert!(!store.sadd("s", "1").await?);
        assert!(store.sadd("s", "2").await?);
        assert!(store.sismember("s", "1").await?);
        assert!(!store.sismember("s", "3").await?);
        assert!(!store.sismember("nope", "1").await?);
        assert_eq!(store.set_len("s"), 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sadd_single_winner() {
        let store = Arc::new(InMemoryKvStore::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.sadd("s", "7").await }));
        }
        let mut winners = 0;
        for handle in handles {
            if let Ok(Ok(true)) = handle.await {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_incr_no_lost_updates() -> StoreResult<()> {
        let store = Arc::new(InMemoryKvStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.incr("c").await }));
        }
        for handle in handles {
            let _ = handle.await;
        }
        assert_eq!(store.get("c").await?, Some(50));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_vote_counts_new_members_only() -> StoreResult<()> {
        let store = InMemoryKvStore::new();
        assert!(store.record_vote("v", "1", "likes").await?);
        assert!(!store.record_vote("v", "1", "likes").await?);
        assert!(!store.record_vote("v", "1", "dislikes").await?);
        assert!(store.record_vote("v", "2", "dislikes").await?);
        assert_eq!(store.get("likes").await?, Some(1));
        assert_eq!(store.get("dislikes").await?, Some(1));
        assert_eq!(store.set_len("v"), 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_vote_counts_once() -> StoreResult<()> {
        let store = Arc::new(InMemoryKvStore::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.record_vote("v", "7", "likes").await
            }));
        }
        let mut winners = 0;
        for handle in handles {
            if let Ok(Ok(true)) = handle.await {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.get("likes").await?, Some(1));
        Ok(())
    }
}
