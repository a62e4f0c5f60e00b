//! Property-Based Tests — Metrics Registry Invariants
//!
//! Uses `proptest` to verify that histogram bucket placement and
//! request counting hold across random inputs.

use proptest::prelude::*;

use hello_metrics::adapters::metrics::MetricsRegistry;

// ── Histogram Properties ────────────────────────────────────

proptest! {
    /// A sample is counted in exactly the buckets whose bound is >= it.
    #[test]
    fn sample_counted_in_buckets_at_or_above_value(value in -4.0f64..4.0) {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.observe(value);

        for (upper_bound, cumulative) in metrics.bucket_counts() {
            let expected = u64::from(value <= upper_bound);
            prop_assert_eq!(
                cumulative, expected,
                "bucket le={} holds {} for value {}", upper_bound, cumulative, value
            );
        }
        prop_assert_eq!(metrics.sample_count(), 1);
    }

    /// Cumulative bucket counts never decrease with the upper bound.
    #[test]
    fn bucket_counts_are_cumulative(values in prop::collection::vec(-5.0f64..5.0, 0..200)) {
        let metrics = MetricsRegistry::new().unwrap();
        for value in &values {
            metrics.observe(*value);
        }

        let buckets = metrics.bucket_counts();
        for pair in buckets.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0, "bounds must ascend");
            prop_assert!(pair[0].1 <= pair[1].1, "counts must be cumulative");
        }
        prop_assert_eq!(metrics.sample_count(), values.len() as u64);

        let sum: f64 = values.iter().sum();
        prop_assert!((metrics.sample_sum() - sum).abs() < 1e-6);
    }
}

// ── Counter Properties ──────────────────────────────────────

proptest! {
    /// Every increment lands in its own (code, method) series.
    #[test]
    fn counter_totals_match_increments(
        requests in prop::collection::vec(
            (prop::sample::select(vec![200u16, 404, 500]),
             prop::sample::select(vec!["GET", "POST", "HEAD"])),
            0..100,
        ),
    ) {
        let metrics = MetricsRegistry::new().unwrap();
        for (code, method) in &requests {
            metrics.increment(*code, method);
        }

        for code in [200u16, 404, 500] {
            for method in ["GET", "POST", "HEAD"] {
                let expected = requests
                    .iter()
                    .filter(|(c, m)| *c == code && *m == method)
                    .count() as u64;
                prop_assert_eq!(metrics.request_count(code, method), expected);
            }
        }
    }
}
