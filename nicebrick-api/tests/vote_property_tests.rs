//! Property-based tests for the vote and content endpoints.
//!
//! For any subject, date and sequence of votes:
//! - content selection is stable across calls and always within the catalog
//! - each subject contributes at most one vote per (date, index)
//! - the tally equals the number of distinct first votes per kind

use std::collections::HashMap;

use nicebrick_core::{fnv1a_hash, ContentCatalog};
use nicebrick_test_utils::generators::{arb_date_key, arb_subject_id, arb_vote_kind};
use proptest::prelude::*;
use serde_json::json;
use tokio::runtime::Runtime;

#[path = "support/app.rs"]
mod app_support;
use app_support::TestApp;

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn fail(e: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(e.to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_content_selection_is_stable(subject in arb_subject_id(), date in arb_date_key()) {
        let rt = test_runtime()?;
        let app = TestApp::new();
        let uri = format!("/api/content?subjectId={}&dateKey={}", subject, date);

        let (first, second) = rt.block_on(async {
            let first = app.get(&uri).await?.json()?;
            let second = app.get(&uri).await?.json()?;
            Ok::<_, app_support::TestError>((first, second))
        }).map_err(fail)?;

        let expected = fnv1a_hash(&format!("{}-{}", subject, date)) as usize
            % ContentCatalog::builtin().len();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first["index"].as_u64(), Some(expected as u64));
    }

    #[test]
    fn prop_each_subject_votes_once(
        votes in prop::collection::vec((1u64..6, arb_vote_kind()), 1..24),
        index in 0u64..25,
    ) {
        let rt = test_runtime()?;
        let app = TestApp::new();

        let mut first_votes = HashMap::new();
        for (subject, kind) in &votes {
            first_votes.entry(*subject).or_insert(*kind);
        }
        let expected_likes = first_votes.values().filter(|k| k.as_str() == "like").count() as u64;
        let expected_dislikes = first_votes.len() as u64 - expected_likes;

        let tally = rt.block_on(async {
            for (subject, kind) in &votes {
                let res = app.post_json("/api/vote", json!({
                    "subjectId": subject,
                    "index": index,
                    "voteKind": kind.as_str(),
                    "dateKey": "2024-06-01",
                })).await?;
                assert_eq!(res.status, 200);
            }
            app.get(&format!("/api/vote?dateKey=2024-06-01&index={}", index)).await?.json()
        }).map_err(fail)?;

        prop_assert_eq!(tally["likes"].as_u64(), Some(expected_likes));
        prop_assert_eq!(tally["dislikes"].as_u64(), Some(expected_dislikes));
    }
}
