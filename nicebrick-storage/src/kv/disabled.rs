//! Store used when no backend is configured.

use async_trait::async_trait;
use nicebrick_core::StorageError;

use super::{KvStore, StoreResult};

/// A store that is never reachable.
///
/// Reads through the ledger degrade to zero tallies, writes fail with
/// [`StorageError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledKvStore;

impl DisabledKvStore {
    fn unavailable<T>() -> StoreResult<T> {
        Err(StorageError::unavailable("disabled", "no store is configured"))
    }
}

#[async_trait]
impl KvStore for DisabledKvStore {
    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<u64>> {
        Self::unavailable()
    }

    async fn incr(&self, _key: &str) -> StoreResult<u64> {
        Self::unavailable()
    }

    async fn sadd(&self, _key: &str, _member: &str) -> StoreResult<bool> {
        Self::unavailable()
    }

    async fn record_vote(
        &self,
        _voters_key: &str,
        _member: &str,
        _counter_key: &str,
    ) -> StoreResult<bool> {
        Self::unavailable()
    }

    async fn sismember(&self, _key: &str, _member: &str) -> StoreResult<bool> {
        Self::unavailable()
    }

    async fn ping(&self) -> StoreResult<()> {
        Self::unavailable()
    }
}
