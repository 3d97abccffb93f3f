//! 30/360 day counting and interval merging.
//!
//! Contribution time is measured with the commercial 30/360 convention, not
//! calendar days. Overlapping employer periods are merged before counting so
//! simultaneous employment is not counted twice.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::DateInterval;

/// Returns true when `date` is the last day of February.
fn is_february_end(date: NaiveDate) -> bool {
    date.month() == 2 && date.succ_opt().is_some_and(|next| next.month() == 3)
}

/// Counts the days from `start` to `end` inclusive under the 30/360 convention.
///
/// The start day is clamped to 30. An end day of 31 becomes 30 only when the
/// start day was 30 or later, and a period ending on the last day of February
/// ends on day 30. The result is
/// `(Δyears × 360) + (Δmonths × 30) + (endDay − startDay) + 1`.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::day360;
/// use chrono::NaiveDate;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(day360(d(2020, 1, 1), d(2020, 1, 31)), 31);
/// assert_eq!(day360(d(2020, 1, 1), d(2020, 2, 29)), 60);
/// assert_eq!(day360(d(2020, 1, 1), d(2020, 12, 30)), 360);
/// ```
pub fn day360(start: NaiveDate, end: NaiveDate) -> i64 {
    let start_day = i64::from(start.day().min(30));
    let end_day = match end.day() {
        31 if start_day >= 30 => 30,
        _ if is_february_end(end) => 30,
        day => i64::from(day),
    };

    i64::from(end.year() - start.year()) * 360
        + (i64::from(end.month()) - i64::from(start.month())) * 30
        + (end_day - start_day)
        + 1
}

/// Merges overlapping or contiguous intervals into a minimal disjoint cover.
///
/// Intervals are sorted by start date; an interval is folded into the running
/// one when it starts no later than the day after the running end, and the
/// running end extends to the later of the two ends.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::merge_intervals;
/// use pension_engine::models::DateInterval;
/// use chrono::NaiveDate;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let merged = merge_intervals(&[
///     DateInterval::new(d(2020, 2, 1), d(2020, 2, 28)).unwrap(),
///     DateInterval::new(d(2020, 1, 1), d(2020, 1, 31)).unwrap(),
/// ]);
/// assert_eq!(merged, vec![DateInterval::new(d(2020, 1, 1), d(2020, 2, 28)).unwrap()]);
/// ```
pub fn merge_intervals(intervals: &[DateInterval]) -> Vec<DateInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<DateInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(current) if touches(current, &interval) => {
                current.end = current.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// True when `next` starts on or before the day after `current` ends.
fn touches(current: &DateInterval, next: &DateInterval) -> bool {
    match current.end.checked_add_days(Days::new(1)) {
        Some(grace) => next.start <= grace,
        None => true,
    }
}

/// Sums [`day360`] over already-merged intervals.
pub fn total_days360(intervals: &[DateInterval]) -> i64 {
    intervals.iter().map(|i| day360(i.start, i.end)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(start: NaiveDate, end: NaiveDate) -> DateInterval {
        DateInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_day360_full_january_is_31() {
        assert_eq!(day360(date(2020, 1, 1), date(2020, 1, 31)), 31);
    }

    #[test]
    fn test_day360_january_through_leap_february_is_60() {
        assert_eq!(day360(date(2020, 1, 1), date(2020, 2, 29)), 60);
    }

    #[test]
    fn test_day360_february_end_in_common_year() {
        assert_eq!(day360(date(2021, 2, 1), date(2021, 2, 28)), 30);
    }

    #[test]
    fn test_day360_single_day() {
        assert_eq!(day360(date(2020, 6, 15), date(2020, 6, 15)), 1);
    }

    #[test]
    fn test_day360_start_on_31st_clamps_both_ends() {
        // start 31 -> 30, end 31 -> 30 because start is on/after day 30
        assert_eq!(day360(date(2020, 1, 31), date(2020, 3, 31)), 61);
    }

    #[test]
    fn test_day360_across_years() {
        assert_eq!(day360(date(2010, 1, 1), date(2019, 12, 30)), 3600);
    }

    #[test]
    fn test_merge_contiguous_months() {
        let merged = merge_intervals(&[
            interval(date(2020, 1, 1), date(2020, 1, 31)),
            interval(date(2020, 2, 1), date(2020, 2, 28)),
        ]);
        assert_eq!(merged, vec![interval(date(2020, 1, 1), date(2020, 2, 28))]);
    }

    #[test]
    fn test_merge_keeps_gap_of_more_than_one_day() {
        let input = vec![
            interval(date(2020, 1, 1), date(2020, 1, 31)),
            interval(date(2020, 2, 2), date(2020, 2, 28)),
        ];
        assert_eq!(merge_intervals(&input), input);
    }

    #[test]
    fn test_merge_contained_interval_keeps_outer_end() {
        let merged = merge_intervals(&[
            interval(date(2010, 1, 1), date(2015, 12, 31)),
            interval(date(2012, 3, 1), date(2012, 9, 30)),
        ]);
        assert_eq!(merged, vec![interval(date(2010, 1, 1), date(2015, 12, 31))]);
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_intervals(&[]).is_empty());
    }

    #[test]
    fn test_overlap_counted_once() {
        let merged = merge_intervals(&[
            interval(date(2020, 1, 1), date(2020, 6, 30)),
            interval(date(2020, 4, 1), date(2020, 12, 30)),
        ]);
        assert_eq!(total_days360(&merged), 360);
    }

    fn arb_interval() -> impl Strategy<Value = DateInterval> {
        (0i64..8000, 0i64..2000).prop_map(|(offset, len)| {
            let start = date(2000, 1, 1) + chrono::Duration::days(offset);
            interval(start, start + chrono::Duration::days(len))
        })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(intervals in prop::collection::vec(arb_interval(), 0..20)) {
            let once = merge_intervals(&intervals);
            let twice = merge_intervals(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merged_intervals_are_disjoint_and_sorted(
            intervals in prop::collection::vec(arb_interval(), 0..20)
        ) {
            let merged = merge_intervals(&intervals);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].end.succ_opt().unwrap() < pair[1].start);
            }
        }

        #[test]
        fn prop_day360_is_positive_for_ordered_dates(i in arb_interval()) {
            prop_assert!(day360(i.start, i.end) >= 1);
        }
    }
}
