//! Property-based tests for recurrence expansion and interval overlap.
//!
//! These verify invariants that should hold for *any* valid input, not just
//! the specific examples in `recurrence_tests.rs` and `conflict_tests.rs`.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;
use room_booking::weekday::weekday_from_index;
use room_booking::{generate_recurring_dates, ClockTime, RecurrenceConfig, TimeRange};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any day in 2024-2027.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..(4 * 365)).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn arb_weeks() -> impl Strategy<Value = u32> {
    1u32..=12
}

fn arb_days() -> impl Strategy<Value = Vec<Weekday>> {
    prop::collection::vec(0u8..=6, 0..=7).prop_map(|idx| {
        let mut days: Vec<Weekday> = idx.into_iter().filter_map(weekday_from_index).collect();
        days.dedup();
        days
    })
}

fn arb_config() -> impl Strategy<Value = RecurrenceConfig> {
    prop_oneof![
        arb_weeks().prop_map(RecurrenceConfig::daily),
        arb_weeks().prop_map(RecurrenceConfig::weekly),
        (arb_days(), arb_weeks()).prop_map(|(days, w)| RecurrenceConfig::custom(&days, w)),
    ]
}

/// A time on the half-hour grid between 08:00 and 18:00.
fn arb_mark() -> impl Strategy<Value = ClockTime> {
    (16u16..=36)
        .prop_map(|half_hours| ClockTime::from_hm(half_hours / 2, (half_hours % 2) * 30).unwrap())
}

fn arb_range() -> impl Strategy<Value = TimeRange> {
    (arb_mark(), arb_mark())
        .prop_filter("non-empty", |(a, b)| a != b)
        .prop_map(|(a, b)| TimeRange::new(a.min(b), a.max(b)).unwrap())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Output is strictly ascending and inside the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_strictly_ascending_within_window(start in arb_date(), cfg in arb_config()) {
        let dates = generate_recurring_dates(start, &cfg);
        let window_end = start
            .checked_add_days(Days::new(u64::from(cfg.repeat_weeks) * 7))
            .unwrap();

        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1], "not ascending: {} then {}", pair[0], pair[1]);
        }
        for d in &dates {
            prop_assert!(
                *d >= start && *d < window_end,
                "{} outside [{}, {})",
                d,
                start,
                window_end
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Daily keeps exactly the weekdays, five per week
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn daily_yields_five_weekdays_per_week(start in arb_date(), weeks in arb_weeks()) {
        let dates = generate_recurring_dates(start, &RecurrenceConfig::daily(weeks));

        prop_assert_eq!(dates.len() as u32, weeks * 5);
        for d in &dates {
            prop_assert!(!matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Weekly yields one date per week on the anchor's weekday
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekly_keeps_anchor_weekday(start in arb_date(), weeks in arb_weeks()) {
        let dates = generate_recurring_dates(start, &RecurrenceConfig::weekly(weeks));

        prop_assert_eq!(dates.len() as u32, weeks);
        prop_assert_eq!(dates[0], start);
        for d in &dates {
            prop_assert_eq!(d.weekday(), start.weekday());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Custom keeps exactly the chosen weekdays, once per week each
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn custom_matches_chosen_days(start in arb_date(), days in arb_days(), weeks in arb_weeks()) {
        let mut distinct = days.clone();
        distinct.sort_by_key(|d| d.num_days_from_sunday());
        distinct.dedup();

        let dates = generate_recurring_dates(start, &RecurrenceConfig::custom(&days, weeks));

        prop_assert_eq!(dates.len(), distinct.len() * weeks as usize);
        for d in &dates {
            prop_assert!(distinct.contains(&d.weekday()));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Overlap is symmetric and matches the half-open definition
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric_and_half_open(a in arb_range(), b in arb_range()) {
        let expected = a.start < b.end && b.start < a.end;

        prop_assert_eq!(a.overlaps(&b), expected);
        prop_assert_eq!(b.overlaps(&a), expected);
        if a.end == b.start || b.end == a.start {
            prop_assert!(!a.overlaps(&b), "back-to-back ranges must not overlap");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Expansion is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_deterministic(start in arb_date(), cfg in arb_config()) {
        prop_assert_eq!(
            generate_recurring_dates(start, &cfg),
            generate_recurring_dates(start, &cfg)
        );
    }
}
