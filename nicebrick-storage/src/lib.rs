//! Nicebrick Storage
//!
//! The external-store contract and the two stateful components built on it:
//! the idempotent vote ledger and the TTL artifact cache.

pub mod artifact_cache;
pub mod kv;
pub mod ledger;

pub use artifact_cache::{
    ArtifactCache, ArtifactRead, CacheStats, CachedArtifact, Clock, SystemClock,
};
pub use kv::{
    DbConfig, DisabledKvStore, InMemoryKvStore, KvStore, PgKvStore, StoreResult,
};
pub use ledger::{LedgerRead, VoteLedger};
