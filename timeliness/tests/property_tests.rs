//! Property-based tests for parsing and restriction evaluation.
//!
//! ## Test Categories
//!
//! ### 1. Parsing
//! - Every real calendar date and clock time resolves to itself
//! - Out-of-range components never resolve
//! - Bounded matching rejects surrounding text that unbounded matching skips
//!
//! ### 2. Restrictions
//! - A violation is reported exactly when the predicate does not hold
//! - Date granularity ignores the time of day on either side

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use timeliness::core::{ErrorMessages, MemoryRecord, ViolationKey};
use timeliness::parser::{parse, resolve, DefaultResolver};
use timeliness::restrictions::{RestrictionEvaluator, RestrictionKind, RestrictionSpec};
use timeliness::temporal::{Kind, RawValue, Temporal};

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=31).prop_filter_map("real calendar date", |(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// Year, month and a day number past the end of that month.
fn impossible_day_strategy() -> impl Strategy<Value = (i32, u32, u32)> {
    (1000i32..=9998, prop::sample::select(vec![2u32, 4, 6, 9, 11]))
        .prop_flat_map(|(y, m)| (Just(y), Just(m), (days_in_month(y, m) + 1)..=31))
}

fn time_strategy() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

fn datetime_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (date_strategy(), time_strategy()).prop_map(|(date, time)| date.and_time(time))
}

fn violation_keys(
    value: Temporal,
    kind: Kind,
    restrictions: &RestrictionSpec,
) -> Vec<ViolationKey> {
    let resolver = DefaultResolver::new();
    let messages = ErrorMessages::default();
    let record = MemoryRecord::new();
    RestrictionEvaluator::new(&resolver, &messages)
        .evaluate("value", &value, kind, &record, restrictions)
        .into_iter()
        .map(|violation| violation.key)
        .collect()
}

proptest! {
    /// ISO dates resolve to the same calendar date, whatever the padding.
    #[test]
    fn test_real_dates_resolve(date in date_strategy(), padded in any::<bool>()) {
        let text = if padded {
            date.format("%Y-%m-%d").to_string()
        } else {
            format!("{}-{}-{}", date.year(), date.month(), date.day())
        };

        prop_assert_eq!(
            resolve(&RawValue::from(text.as_str()), Kind::Date, true),
            Some(Temporal::Date(date))
        );
    }

    /// Day numbers past the end of the month never resolve, leap years included.
    #[test]
    fn test_impossible_days_do_not_resolve((year, month, day) in impossible_day_strategy()) {
        prop_assert!(NaiveDate::from_ymd_opt(year, month, day).is_none());
        let text = format!("{year}-{month:02}-{day:02}");

        prop_assert!(parse(&text, Kind::Date, true).is_some());
        prop_assert!(resolve(&RawValue::from(text.as_str()), Kind::Date, true).is_none());
    }

    /// Clock times resolve on the dummy date.
    #[test]
    fn test_real_times_resolve(time in time_strategy()) {
        let text = time.format("%H:%M:%S").to_string();
        prop_assert_eq!(
            resolve(&RawValue::from(text.as_str()), Kind::Time, true),
            Some(Temporal::Time(time))
        );
    }

    /// Hours of 24 and above are rejected.
    #[test]
    fn test_out_of_range_hours_do_not_resolve(hour in 24u32..=99, minute in 0u32..60) {
        let text = format!("{hour:02}:{minute:02}");
        prop_assert!(resolve(&RawValue::from(text.as_str()), Kind::Time, true).is_none());
    }

    /// Datetimes survive a round trip through their canonical rendering.
    #[test]
    fn test_datetimes_resolve(datetime in datetime_strategy()) {
        let text = Temporal::DateTime(datetime).to_string();
        prop_assert_eq!(
            resolve(&RawValue::from(text.as_str()), Kind::DateTime, true),
            Some(Temporal::DateTime(datetime))
        );
    }

    /// Leading text defeats bounded matching only.
    #[test]
    fn test_bounded_rejects_leading_text(date in date_strategy(), prefix in "[a-z]{1,8} ") {
        let text = format!("{prefix}{}", date.format("%Y-%m-%d"));

        prop_assert!(parse(&text, Kind::Date, true).is_none());
        prop_assert_eq!(
            resolve(&RawValue::from(text.as_str()), Kind::Date, false),
            Some(Temporal::Date(date))
        );
    }

    /// Each restriction is violated exactly when its predicate fails.
    #[test]
    fn test_violations_match_predicates(value in datetime_strategy(), bound in datetime_strategy()) {
        let mut restrictions = RestrictionSpec::new();
        for kind in RestrictionKind::ALL {
            restrictions = restrictions.with(kind, bound);
        }

        let expected: Vec<ViolationKey> = RestrictionKind::ALL
            .into_iter()
            .filter(|kind| !kind.holds(&value, &bound))
            .map(ViolationKey::from)
            .collect();

        prop_assert_eq!(
            violation_keys(Temporal::DateTime(value), Kind::DateTime, &restrictions),
            expected
        );
    }

    /// On the same day, inclusive date restrictions hold whatever the times.
    #[test]
    fn test_date_granularity_ignores_time(
        date in date_strategy(),
        value_time in time_strategy(),
        bound_time in time_strategy()
    ) {
        let restrictions = RestrictionSpec::new()
            .on_or_before(date.and_time(bound_time))
            .on_or_after(date.and_time(bound_time));

        prop_assert!(violation_keys(
            Temporal::DateTime(date.and_time(value_time)),
            Kind::Date,
            &restrictions
        )
        .is_empty());
    }
}

mod edge_case_tests {
    use super::*;

    #[test]
    fn test_two_digit_year_pivot() {
        let year = |text: &str| parse(text, Kind::Date, true).map(|t| t.year());

        assert_eq!(year("1/2/00"), Some(2000));
        assert_eq!(year("1/2/29"), Some(2029));
        assert_eq!(year("1/2/30"), Some(1930));
        assert_eq!(year("1/2/99"), Some(1999));
    }

    #[test]
    fn test_leap_days() {
        for (text, valid) in [
            ("1980-02-29", true),
            ("1981-02-29", false),
            ("2000-02-29", true),
            ("1900-02-29", false),
        ] {
            assert_eq!(
                resolve(&RawValue::from(text), Kind::Date, true).is_some(),
                valid,
                "{text}"
            );
        }
    }
}
