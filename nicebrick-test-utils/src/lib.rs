//! Nicebrick Test Utilities
//!
//! Centralized test infrastructure for the nicebrick workspace:
//! - Proptest generators for core types
//! - Controllable stand-ins for the store, the clock and the renderer
//! - Fixtures for common scenarios

pub use nicebrick_core::{
    ContentCatalog, DateKey, Fingerprint, HexColor, Identity, NiceError, NiceResult,
    RenderError, StorageError, SubjectId, VoteKind, VoteTally,
};
pub use nicebrick_render::{BearBrickOptions, BearBrickRenderer, SvgBearBrickRenderer};
pub use nicebrick_storage::{Clock, InMemoryKvStore, KvStore, StoreResult};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// CLOCK
// ============================================================================

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Clock starting at 2024-01-01T00:00:00Z.
    pub fn at_epoch() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default())
    }

    pub fn advance(&self, by: Duration) {
        let step = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        if let Ok(mut now) = self.now.lock() {
            *now += step;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}

// ============================================================================
// STORE
// ============================================================================

/// In-memory store whose reads and writes can be made to fail on demand.
///
/// Failures are all-or-nothing: a rejected `record_vote` touches neither the
/// voter set nor the counter.
#[derive(Debug, Default)]
pub struct FailingKvStore {
    inner: InMemoryKvStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_counter_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FailingKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every operation fails.
    pub fn broken() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail only writes that increment a counter (`incr`, `record_vote`).
    pub fn set_fail_counter_writes(&self, fail: bool) {
        self.fail_counter_writes.store(fail, Ordering::SeqCst);
    }

    /// Accepted write calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("failing", "reads disabled"));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("failing", "writes disabled"));
        }
        Ok(())
    }

    fn check_counter_write(&self) -> StoreResult<()> {
        self.check_write()?;
        if self.fail_counter_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("failing", "counter writes disabled"));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for FailingKvStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<u64>> {
        self.check_read()?;
        self.inner.get(key).await
    }

    async fn incr(&self, key: &str) -> StoreResult<u64> {
        self.check_counter_write()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.incr(key).await
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check_write()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.sadd(key, member).await
    }

    async fn record_vote(
        &self,
        voters_key: &str,
        member: &str,
        counter_key: &str,
    ) -> StoreResult<bool> {
        self.check_counter_write()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.record_vote(voters_key, member, counter_key).await
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check_read()?;
        self.inner.sismember(key, member).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_read()
    }
}

// ============================================================================
// RENDERERS
// ============================================================================

/// Wraps the SVG renderer and counts calls.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BearBrickRenderer for CountingRenderer {
    fn render(&self, options: &BearBrickOptions) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SvgBearBrickRenderer.render(options)
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// A renderer that always fails, or always returns empty output.
#[derive(Debug, Clone, Copy)]
pub enum FailingRenderer {
    Error,
    Empty,
}

impl BearBrickRenderer for FailingRenderer {
    fn render(&self, _options: &BearBrickOptions) -> Result<String, RenderError> {
        match self {
            FailingRenderer::Error => Err(RenderError::Failed {
                renderer: self.name().to_string(),
                reason: "configured to fail".to_string(),
            }),
            FailingRenderer::Empty => Ok(String::new()),
        }
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for nicebrick types.

    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Generate a positive SubjectId.
    pub fn arb_subject_id() -> impl Strategy<Value = SubjectId> {
        (1u64..10_000_000).prop_filter_map("positive", |id| SubjectId::new(id).ok())
    }

    /// Generate a DateKey between 2020-01-01 and roughly 2030.
    pub fn arb_date_key() -> impl Strategy<Value = DateKey> {
        (0i64..3650).prop_filter_map("representable date", |days| {
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .map(|start| DateKey::from_date(start + chrono::Duration::days(days)))
        })
    }

    /// Generate a normalized HexColor.
    pub fn arb_hex_color() -> impl Strategy<Value = HexColor> {
        "#?[0-9a-fA-F]{6}".prop_filter_map("valid hex", |s| HexColor::parse("color", &s).ok())
    }

    /// Generate a VoteKind variant.
    pub fn arb_vote_kind() -> impl Strategy<Value = VoteKind> {
        prop_oneof![Just(VoteKind::Like), Just(VoteKind::Dislike)]
    }

    /// Generate an optional user-provided name.
    pub fn arb_name() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[a-zA-Z0-9 _.<>&]{1,24}".prop_map(|s| s))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built values for common scenarios.

    use super::*;

    /// Subject id with known golden indices (4 on 2024-01-01 for 25 entries).
    pub const GOLDEN_SUBJECT: u64 = 12345;
    pub const GOLDEN_DATE: &str = "2024-01-01";

    pub fn subject(id: u64) -> NiceResult<SubjectId> {
        Ok(SubjectId::new(id)?)
    }

    pub fn date(key: &str) -> NiceResult<DateKey> {
        Ok(DateKey::parse(key)?)
    }

    pub fn golden_date() -> NiceResult<DateKey> {
        date(GOLDEN_DATE)
    }

    /// A five-entry catalog.
    pub fn small_catalog() -> NiceResult<ContentCatalog> {
        Ok(ContentCatalog::from_lines(
            "alpha\nbravo\ncharlie\ndelta\necho\n",
        )?)
    }

    pub fn bearbrick_options(id: u64) -> NiceResult<BearBrickOptions> {
        Ok(BearBrickOptions::new(subject(id)?))
    }

    pub fn shared_store() -> Arc<InMemoryKvStore> {
        Arc::new(InMemoryKvStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at_epoch();
        let start = clock.now();
        clock.advance(Duration::from_secs(90));
        assert_eq!((clock.now() - start).num_seconds(), 90);
    }

    #[tokio::test]
    async fn test_failing_store_toggles() -> StoreResult<()> {
        let store = FailingKvStore::new();
        assert_eq!(store.incr("k").await?, 1);
        store.set_fail_writes(true);
        assert!(store.incr("k").await.is_err());
        assert_eq!(store.get("k").await?, Some(1));
        store.set_fail_reads(true);
        assert!(store.get("k").await.is_err());
        assert!(store.ping().await.is_err());
        assert_eq!(store.write_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_counter_writes_leave_sets_alone() -> StoreResult<()> {
        let store = FailingKvStore::new();
        store.set_fail_counter_writes(true);
        assert!(store.incr("c").await.is_err());
        assert!(store.record_vote("v", "1", "c").await.is_err());
        assert!(!store.sismember("v", "1").await?);
        assert!(store.sadd("s", "1").await?);

        store.set_fail_counter_writes(false);
        assert!(store.record_vote("v", "1", "c").await?);
        assert_eq!(store.get("c").await?, Some(1));
        Ok(())
    }

    #[test]
    fn test_failing_renderer_variants() -> NiceResult<()> {
        let options = fixtures::bearbrick_options(1)?;
        assert!(FailingRenderer::Error.render(&options).is_err());
        assert!(matches!(
            FailingRenderer::Empty.render_checked(&options),
            Err(RenderError::EmptyOutput { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_counting_renderer_counts() -> NiceResult<()> {
        let renderer = CountingRenderer::new();
        let options = fixtures::bearbrick_options(1)?;
        renderer.render(&options)?;
        renderer.render(&options)?;
        assert_eq!(renderer.calls(), 2);
        Ok(())
    }
}
