// Property tests for the difficulty curves.

use proptest::prelude::*;
use tap_dash::sim::difficulty::{budget_ms, level_for_score, target_size};

proptest! {
    #[test]
    fn level_matches_closed_form(score in 0u32..1_000_000) {
        prop_assert_eq!(level_for_score(score), 1 + score / 10);
    }

    #[test]
    fn level_is_monotone_nondecreasing(score in 0u32..1_000_000) {
        prop_assert!(level_for_score(score + 1) >= level_for_score(score));
    }

    #[test]
    fn budget_is_monotone_and_floored(level in 1u32..10_000) {
        prop_assert!(budget_ms(level + 1) <= budget_ms(level));
        prop_assert!(budget_ms(level) >= 650);
        prop_assert!(budget_ms(level) <= 1300);
    }

    #[test]
    fn size_is_monotone_and_floored(level in 1u32..10_000) {
        prop_assert!(target_size(level + 1) <= target_size(level));
        prop_assert!(target_size(level) >= 40.0);
        prop_assert!(target_size(level) <= 80.0);
    }
}
