//! Property-based tests for the `BookingWindow` overlap rule.

use super::BookingWindow;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

// Strategy for generating instants within a few years of the epoch used
// by the fixtures. Seconds granularity keeps shrinking fast.
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1_600_000_000i64..1_800_000_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

// Strategy for generating valid (start <= end) windows.
fn window_strategy() -> impl Strategy<Value = BookingWindow> {
    (instant_strategy(), instant_strategy()).prop_map(|(a, b)| {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        BookingWindow::new(start, end).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 10000,
        .. ProptestConfig::default()
    })]

    // Overlap is symmetric
    #[test]
    fn overlap_is_symmetric(a in window_strategy(), b in window_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Overlap holds exactly when s1 <= e2 && e1 >= s2
    #[test]
    fn overlap_matches_closed_interval_characterization(
        a in window_strategy(),
        b in window_strategy(),
    ) {
        let expected = a.start() <= b.end() && a.end() >= b.start();
        prop_assert_eq!(a.overlaps(&b), expected);
    }

    // Every window overlaps itself
    #[test]
    fn overlap_is_reflexive(a in window_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    // A window contains an instant iff the single-instant window at that
    // point overlaps it
    #[test]
    fn contains_agrees_with_overlap(a in window_strategy(), t in instant_strategy()) {
        let point = BookingWindow::new(t, t).unwrap();
        prop_assert_eq!(a.contains(t), a.overlaps(&point));
    }

    // Construction never yields an inverted interval
    #[test]
    fn windows_are_ordered(a in window_strategy()) {
        prop_assert!(a.start() <= a.end());
    }
}
