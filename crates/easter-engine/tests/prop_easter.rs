//! Property-based tests for the computus and the BYEASTER transform using proptest.
//!
//! These tests verify invariants that should hold for *any* year, offset set
//! and candidate, not just the specific examples in the other test files.

use chrono::{Datelike, NaiveDate, Weekday};
use easter_engine::calendar::days_in_year;
use easter_engine::easter::gregorian_easter_sunday;
use easter_engine::{easter_sunday, EasterOffsetRule, Frequency};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_gregorian_year() -> impl Strategy<Value = i32> {
    1584i32..=2200
}

fn arb_any_year() -> impl Strategy<Value = i32> {
    1i32..=4000
}

fn arb_limit_freq() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Monthly),
        Just(Frequency::Weekly),
        Just(Frequency::Daily),
        Just(Frequency::Hourly),
        Just(Frequency::Minutely),
        Just(Frequency::Secondly),
    ]
}

fn arb_freq() -> impl Strategy<Value = Frequency> {
    prop_oneof![Just(Frequency::Yearly), arb_limit_freq()]
}

/// A date anywhere in the given year.
fn arb_date_in(year: i32) -> impl Strategy<Value = NaiveDate> {
    (1u32..=days_in_year(year) as u32)
        .prop_map(move |ordinal| NaiveDate::from_yo_opt(year, ordinal).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    arb_any_year().prop_flat_map(arb_date_in)
}

fn arb_offsets() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-600i32..=600, 0..8)
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Gregorian Easter is a Sunday between March 22 and April 25
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn gregorian_easter_is_sunday_in_window(year in arb_gregorian_year()) {
        let easter = easter_sunday(year).unwrap();
        prop_assert_eq!(easter.weekday(), Weekday::Sun);
        prop_assert_eq!(easter.year(), year);
        let md = (easter.month(), easter.day());
        prop_assert!((3, 22) <= md && md <= (4, 25), "{} out of window", easter);
        prop_assert_eq!(easter, gregorian_easter_sunday(year).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 2: the result is a Sunday on both sides of the cutover
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn easter_is_always_a_sunday(year in arb_any_year()) {
        prop_assert_eq!(easter_sunday(year).unwrap().weekday(), Weekday::Sun);
    }
}

// ---------------------------------------------------------------------------
// Property 3: an empty offset set is the identity
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn empty_rule_is_identity(
        dates in prop::collection::vec(arb_date(), 0..20),
        freq in arb_freq(),
    ) {
        let rule = EasterOffsetRule::new([], freq);
        prop_assert_eq!(rule.transform(dates.clone()), dates);
    }
}

// ---------------------------------------------------------------------------
// Property 4: yearly offset 0 always yields that year's Easter Sunday
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn yearly_offset_zero_is_easter(date in arb_date()) {
        let rule = EasterOffsetRule::new([0], Frequency::Yearly);
        let result = rule.transform(vec![date]);
        prop_assert_eq!(result, vec![easter_sunday(date.year()).unwrap()]);
    }
}

// ---------------------------------------------------------------------------
// Property 5: expanded dates stay in the candidate's year and sit at their offset
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_stays_in_year(date in arb_date(), offsets in arb_offsets()) {
        let rule = EasterOffsetRule::new(offsets, Frequency::Yearly);
        let easter = easter_sunday(date.year()).unwrap();

        let result = rule.transform(vec![date]);
        prop_assert!(result.len() <= rule.offsets().len());
        for expanded in result {
            prop_assert_eq!(expanded.year(), date.year());
            let offset = (expanded - easter).num_days() as i32;
            prop_assert!(rule.offsets().contains(&offset));
            prop_assert!((-366..=366).contains(&offset));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: limiting keeps a subsequence whose offsets are all configured
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn limiting_is_an_ordered_filter(
        dates in prop::collection::vec(arb_date(), 0..30),
        offsets in arb_offsets(),
        freq in arb_limit_freq(),
    ) {
        let rule = EasterOffsetRule::new(offsets, freq);
        let result = rule.transform(dates.clone());

        let expected: Vec<NaiveDate> = if rule.is_active() {
            dates
                .iter()
                .copied()
                .filter(|d| {
                    let easter = easter_sunday(d.year()).unwrap();
                    let offset = d.ordinal() as i32 - easter.ordinal() as i32;
                    rule.offsets().contains(&offset)
                })
                .collect()
        } else {
            dates
        };
        prop_assert_eq!(result, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 7: the last applicable offset is excluded one day further
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn window_upper_bound_is_exact(year in arb_gregorian_year()) {
        let easter_day = easter_sunday(year).unwrap().ordinal() as i64;
        let last = (days_in_year(year) - easter_day) as i32;
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();

        let inside = EasterOffsetRule::new([last], Frequency::Yearly);
        let outside = EasterOffsetRule::new([last + 1], Frequency::Yearly);

        prop_assert_eq!(
            inside.transform(vec![jan_first]),
            vec![NaiveDate::from_ymd_opt(year, 12, 31).unwrap()]
        );
        prop_assert!(outside.transform(vec![jan_first]).is_empty());
    }
}
