//! TTL behaviour of the artifact cache under a controlled clock.

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use nicebrick_core::{Fingerprint, HexColor, NiceResult};
use nicebrick_storage::{ArtifactCache, Clock};
use nicebrick_test_utils::{fixtures, generators, ManualClock};
use proptest::prelude::*;

const TTL: Duration = Duration::from_secs(3600);

fn fingerprint(id: u64) -> NiceResult<Fingerprint> {
    Ok(Fingerprint::bearbrick(
        fixtures::subject(id)?,
        &HexColor::default_primary(),
        &HexColor::default_secondary(),
        Some("alice"),
        None,
    ))
}

#[test]
fn test_generator_runs_once_within_ttl_and_again_after_expiry() -> NiceResult<()> {
    let clock = ManualClock::at_epoch();
    let cache = ArtifactCache::<String>::with_clock(Arc::new(clock.clone()));
    let fp = fingerprint(12345)?;
    let calls = Cell::new(0);
    let generate = || {
        calls.set(calls.get() + 1);
        Ok::<_, nicebrick_core::RenderError>(format!("svg-{}", calls.get()))
    };

    let first = cache.get_or_generate(&fp, TTL, generate)?;
    clock.advance(Duration::from_secs(3599));
    let second = cache.get_or_generate(&fp, TTL, generate)?;
    assert_eq!(calls.get(), 1);
    assert!(second.was_cache_hit());
    assert_eq!(second.value(), first.value());

    clock.advance(Duration::from_secs(1));
    let third = cache.get_or_generate(&fp, TTL, generate)?;
    assert_eq!(calls.get(), 2);
    assert!(!third.was_cache_hit());
    assert_eq!(third.value(), "svg-2");
    assert_eq!(third.generated_at(), clock.now());
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[test]
fn test_failed_regeneration_keeps_stale_entry_unserved() -> NiceResult<()> {
    let clock = ManualClock::at_epoch();
    let cache = ArtifactCache::<String>::with_clock(Arc::new(clock.clone()));
    let fp = fingerprint(1)?;

    let stored = cache.get_or_generate(&fp, TTL, || Ok::<_, &str>("v1".to_string()));
    assert!(stored.is_ok());
    clock.advance(TTL);

    let failed = cache.get_or_generate(&fp, TTL, || Err::<String, _>("down"));
    assert_eq!(failed.err(), Some("down"));

    // The next successful generation replaces the stale value.
    let fresh = cache.get_or_generate(&fp, TTL, || Ok::<_, &str>("v2".to_string()));
    assert!(matches!(fresh, Ok(ref read) if read.value() == "v2"));
    Ok(())
}

proptest! {
    #[test]
    fn prop_distinct_inputs_never_share_an_entry(
        subject in generators::arb_subject_id(),
        primary in generators::arb_hex_color(),
        secondary in generators::arb_hex_color(),
        username in generators::arb_name(),
        other_username in generators::arb_name(),
    ) {
        prop_assume!(username != other_username);
        let cache = ArtifactCache::<u8>::new();
        let a = Fingerprint::bearbrick(subject, &primary, &secondary, username.as_deref(), None);
        let b = Fingerprint::bearbrick(subject, &primary, &secondary, other_username.as_deref(), None);
        let _ = cache.get_or_generate(&a, TTL, || Ok::<_, ()>(1));
        let read = cache.get_or_generate(&b, TTL, || Ok::<_, ()>(2));
        prop_assert!(matches!(read, Ok(ref r) if !r.was_cache_hit() && *r.value() == 2));
    }
}
