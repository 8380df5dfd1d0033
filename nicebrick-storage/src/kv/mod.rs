//! External key-value store contract.
//!
//! Counters and sets with atomic updates. The ledger writes through
//! [`KvStore::record_vote`], which adds a voter and bumps a counter as one
//! unit, and reads through `get` and `sismember`.

use async_trait::async_trait;
use nicebrick_core::StorageError;

pub mod disabled;
pub mod memory;
pub mod postgres;

pub use disabled::DisabledKvStore;
pub use memory::InMemoryKvStore;
pub use postgres::{DbConfig, PgKvStore};

/// Result type for store primitives.
pub type StoreResult<T> = Result<T, StorageError>;

/// Atomic counter/set store.
///
/// # Atomicity
///
/// - `incr` must be atomic with respect to concurrent `incr` calls on the
///   same key.
/// - `sadd` must be an atomic add-if-absent: of any number of concurrent
///   calls with the same `(key, member)`, exactly one observes `true`.
/// - `record_vote` must apply both of its updates or neither: a member is
///   never left in the voter set without its counter increment.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Read a counter. Absent keys read as `None`.
    async fn get(&self, key: &str) -> StoreResult<Option<u64>>;

    /// Increment a counter by one, creating it at zero first if absent.
    /// Returns the new value.
    async fn incr(&self, key: &str) -> StoreResult<u64>;

    /// Add `member` to the set under `key`. Returns `true` if it was not
    /// already present.
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Add `member` to the set under `voters_key` and, only if it was not
    /// already present, increment `counter_key`, in one atomic step.
    ///
    /// Returns `true` if the member was added.
    async fn record_vote(
        &self,
        voters_key: &str,
        member: &str,
        counter_key: &str,
    ) -> StoreResult<bool>;

    /// Whether `member` is in the set under `key`.
    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
