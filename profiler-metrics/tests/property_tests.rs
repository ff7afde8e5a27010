//! Property-based tests for the accuracy fold and the table accuracy average.

use proptest::prelude::*;

use profiler_metrics::computer::accuracy::{average_ratio, format_proportion};
use profiler_metrics::metrics::{
    accuracy_ratio, dominant_category, AccuracyCategory, ACCURACY_RATIO_THRESHOLD,
};

fn counts_strategy() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::weighted(0.9, 0..1_000i64), 10)
}

fn paired(counts: &[Option<i64>]) -> Vec<(AccuracyCategory, Option<i64>)> {
    AccuracyCategory::PRIORITY
        .into_iter()
        .zip(counts.iter().copied())
        .collect()
}

proptest! {
    #[test]
    fn ratio_is_zero_or_at_least_threshold(
        counts in counts_strategy(),
        extra in 0..1_000i64,
    ) {
        let max = counts.iter().flatten().copied().max().unwrap_or(0);
        let total = max + extra;
        prop_assume!(total > 0);

        let outcome = accuracy_ratio(Some(total), paired(&counts), ACCURACY_RATIO_THRESHOLD)
            .unwrap();
        prop_assert!(outcome.ratio == 0.0 || outcome.ratio >= ACCURACY_RATIO_THRESHOLD);
        prop_assert!(outcome.ratio <= 1.0);
        if outcome.ratio > 0.0 {
            prop_assert_eq!(outcome.ratio, max as f64 / total as f64);
            prop_assert!(outcome.dominant.is_some());
        } else {
            prop_assert!(outcome.dominant.is_none());
        }
    }

    #[test]
    fn ties_go_to_the_earliest_category(
        counts in counts_strategy(),
    ) {
        let Some(winner) = dominant_category(paired(&counts)) else {
            prop_assert!(counts.iter().flatten().all(|c| *c == 0));
            return Ok(());
        };
        let max = counts.iter().flatten().copied().max().unwrap();
        prop_assert_eq!(winner.count, max);

        let first = counts.iter().position(|c| *c == Some(max)).unwrap();
        prop_assert_eq!(winner.category, AccuracyCategory::PRIORITY[first]);
    }

    #[test]
    fn non_positive_total_is_undefined(
        counts in counts_strategy(),
        total in -100..=0i64,
    ) {
        prop_assert!(accuracy_ratio(Some(total), paired(&counts), ACCURACY_RATIO_THRESHOLD).is_none());
        prop_assert!(accuracy_ratio(None, paired(&counts), ACCURACY_RATIO_THRESHOLD).is_none());
    }

    #[test]
    fn average_stays_within_bounds(
        ratios in prop::collection::vec(prop::option::of(0.0..=1.0f64), 0..20),
    ) {
        let average = average_ratio(ratios.iter().copied());
        prop_assert!((0.0..=1.0 + f64::EPSILON).contains(&average));
        if ratios.iter().all(Option::is_none) {
            prop_assert_eq!(average, 0.0);
        }
        let formatted = format_proportion(average);
        prop_assert!(formatted.ends_with('%'));
        prop_assert_eq!(formatted.split('.').nth(1).map(|d| d.len()), Some(3));
    }
}

#[test]
fn threshold_boundary_is_inclusive() {
    let counts = paired(&[Some(50), None, None, None, None, None, None, None, None, None]);
    let outcome = accuracy_ratio(Some(100), counts, ACCURACY_RATIO_THRESHOLD).unwrap();
    assert_eq!(outcome.ratio, 0.5);
    assert_eq!(
        outcome.dominant.map(|d| d.category),
        Some(AccuracyCategory::Address)
    );
}
