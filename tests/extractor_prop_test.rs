//! Property tests for the response extractor: arbitrary reply text must
//! never panic, and the quality score only leaves its default when the
//! marker is present.

use devgenied::analysis::extractor::{extract, DEFAULT_QUALITY_SCORE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn extract_is_total(input in ".{0,400}") {
        let got = extract(&input);
        prop_assert!(got.bugs.iter().all(|b| !b.is_empty()));
        prop_assert!(got.suggestions.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn score_stays_default_without_marker(input in "[^:]{0,200}") {
        // No colon means no "Code Quality Score:" anchor can match.
        prop_assert_eq!(extract(&input).quality_score, DEFAULT_QUALITY_SCORE);
    }

    #[test]
    fn score_follows_the_marker(score in 0i64..1000) {
        let input = format!("Code Quality Score: {score}");
        prop_assert_eq!(extract(&input).quality_score, score);
    }
}
