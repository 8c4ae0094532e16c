//! Date bucketing
//!
//! Partitions time-stamped records into local calendar days for a period.
//! Bounded periods zero-fill every day; `All` yields only the days present.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::Dated;

/// Aggregation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    /// Monday to Sunday
    Week,
    Month,
    Year,
    /// The last `n` days ending at the anchor
    Rolling(u32),
    All,
}

/// Longest rolling window; larger day counts are capped to it
pub const MAX_WINDOW_DAYS: u32 = 36_525;

/// First day of the `days`-day window ending at `anchor`; `None` for zero.
///
/// Windows reaching past the earliest representable date start there.
pub fn window_start(anchor: NaiveDate, days: u32) -> Option<NaiveDate> {
    if days == 0 {
        return None;
    }
    let back = u64::from(days.min(MAX_WINDOW_DAYS) - 1);
    Some(anchor.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN))
}

/// Inclusive day range; empty when `start > end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range containing no days
    fn empty(anchor: NaiveDate) -> Self {
        match anchor.succ_opt() {
            Some(next) => DateRange { start: next, end: anchor },
            None => DateRange {
                start: anchor,
                end: anchor.pred_opt().unwrap_or(anchor),
            },
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days in the range
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.end - self.start).num_days() + 1) as usize
        }
    }

    /// Every day in the range, chronological
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take_while(move |d| *d <= self.end)
    }
}

impl Period {
    /// Day range covered by the period around `anchor`; `None` for `All`
    pub fn range(&self, anchor: NaiveDate) -> Option<DateRange> {
        let range = match self {
            Period::Day => DateRange { start: anchor, end: anchor },
            Period::Week => {
                let offset = u64::from(anchor.weekday().num_days_from_monday());
                let start = anchor.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                DateRange { start, end }
            }
            Period::Month => {
                let start = anchor.with_day(1).unwrap_or(anchor);
                let next = if anchor.month() == 12 {
                    NaiveDate::from_ymd_opt(anchor.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(anchor.year(), anchor.month() + 1, 1)
                };
                let end = next.and_then(|d| d.pred_opt()).unwrap_or(anchor);
                DateRange { start, end }
            }
            Period::Year => DateRange {
                start: NaiveDate::from_ymd_opt(anchor.year(), 1, 1).unwrap_or(anchor),
                end: NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap_or(anchor),
            },
            Period::Rolling(n) => match window_start(anchor, *n) {
                Some(start) => DateRange { start, end: anchor },
                None => DateRange::empty(anchor),
            },
            Period::All => return None,
        };
        Some(range)
    }
}

/// Records belonging to one local calendar day
#[derive(Debug, Clone)]
pub struct DayBucket<'a, T> {
    pub day: NaiveDate,
    pub items: Vec<&'a T>,
}

impl<'a, T> DayBucket<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partition `records` into per-day buckets, chronological.
///
/// Bounded periods produce a bucket for every day of the period, empty or
/// not. `Period::All` produces buckets only for days that have records.
/// Records keep their input order within a bucket.
pub fn bucket<'a, T, Tz>(
    records: &'a [T],
    period: Period,
    anchor: NaiveDate,
    tz: &Tz,
) -> Vec<DayBucket<'a, T>>
where
    T: Dated,
    Tz: TimeZone,
{
    let range = period.range(anchor);

    let mut by_day: BTreeMap<NaiveDate, Vec<&'a T>> = BTreeMap::new();
    for record in records {
        let day = record.local_day(tz);
        if range.map_or(true, |r| r.contains(day)) {
            by_day.entry(day).or_default().push(record);
        }
    }

    match range {
        Some(range) => range
            .days()
            .map(|day| DayBucket {
                day,
                items: by_day.remove(&day).unwrap_or_default(),
            })
            .collect(),
        None => by_day
            .into_iter()
            .map(|(day, items)| DayBucket { day, items })
            .collect(),
    }
}

/// Reverse a chronological bucket sequence for newest-first views
pub fn newest_first<T>(mut buckets: Vec<T>) -> Vec<T> {
    buckets.reverse();
    buckets
}

/// Records whose local day falls inside the period
pub fn filter_period<'a, T, Tz>(
    records: &'a [T],
    period: Period,
    anchor: NaiveDate,
    tz: &Tz,
) -> Vec<&'a T>
where
    T: Dated,
    Tz: TimeZone,
{
    match period.range(anchor) {
        Some(range) => records
            .iter()
            .filter(|r| range.contains(r.local_day(tz)))
            .collect(),
        None => records.iter().collect(),
    }
}

/// Records logged on one local day
pub fn on_day<'a, T, Tz>(records: &'a [T], day: NaiveDate, tz: &Tz) -> Vec<&'a T>
where
    T: Dated,
    Tz: TimeZone,
{
    filter_period(records, Period::Day, day, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    struct Stamp(DateTime<Utc>);

    impl Dated for Stamp {
        fn timestamp(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> Stamp {
        Stamp(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_monday_and_zero_fills() {
        // 2024-05-15 is a Wednesday
        let records = vec![at(2024, 5, 13, 9), at(2024, 5, 15, 9), at(2024, 5, 15, 20)];
        let buckets = bucket(&records, Period::Week, day(2024, 5, 15), &Utc);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].day, day(2024, 5, 13));
        assert_eq!(buckets[6].day, day(2024, 5, 19));
        assert_eq!(buckets[0].items.len(), 1);
        assert_eq!(buckets[1].items.len(), 0);
        assert_eq!(buckets[2].items.len(), 2);
    }

    #[test]
    fn test_month_and_year_lengths() {
        let empty: Vec<Stamp> = Vec::new();
        assert_eq!(bucket(&empty, Period::Month, day(2024, 2, 10), &Utc).len(), 29);
        assert_eq!(bucket(&empty, Period::Month, day(2023, 12, 31), &Utc).len(), 31);
        assert_eq!(bucket(&empty, Period::Year, day(2024, 7, 1), &Utc).len(), 366);
        assert_eq!(bucket(&empty, Period::Day, day(2024, 7, 1), &Utc).len(), 1);
    }

    #[test]
    fn test_rolling_window_and_newest_first() {
        let records = vec![at(2024, 5, 1, 9), at(2024, 5, 10, 9)];
        let buckets = bucket(&records, Period::Rolling(7), day(2024, 5, 10), &Utc);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].day, day(2024, 5, 4));
        assert_eq!(buckets.iter().map(|b| b.items.len()).sum::<usize>(), 1);

        let reversed = newest_first(buckets);
        assert_eq!(reversed[0].day, day(2024, 5, 10));
        assert_eq!(reversed[0].items.len(), 1);
    }

    #[test]
    fn test_rolling_zero_is_empty() {
        let records = vec![at(2024, 5, 10, 9)];
        assert!(bucket(&records, Period::Rolling(0), day(2024, 5, 10), &Utc).is_empty());
    }

    #[test]
    fn test_oversized_rolling_window_is_capped() {
        let empty: Vec<Stamp> = Vec::new();
        let buckets = bucket(&empty, Period::Rolling(4_000_000_000), day(2024, 5, 10), &Utc);
        assert_eq!(buckets.len(), MAX_WINDOW_DAYS as usize);
        assert_eq!(buckets.last().unwrap().day, day(2024, 5, 10));

        let range = Period::Rolling(u32::MAX).range(day(2024, 5, 10)).unwrap();
        assert_eq!(range.len(), MAX_WINDOW_DAYS as usize);
    }

    #[test]
    fn test_window_clamps_to_earliest_date() {
        let anchor = NaiveDate::MIN + chrono::Duration::days(4);
        let range = Period::Rolling(30).range(anchor).unwrap();
        assert_eq!(range.start, NaiveDate::MIN);
        assert_eq!(range.len(), 5);

        let week = Period::Week.range(NaiveDate::MIN).unwrap();
        assert_eq!(week.start, NaiveDate::MIN);
        assert_eq!(window_start(anchor, 0), None);
    }

    #[test]
    fn test_all_only_has_present_days() {
        let records = vec![at(2024, 5, 10, 9), at(2024, 1, 2, 9), at(2024, 5, 10, 23)];
        let buckets = bucket(&records, Period::All, day(2030, 1, 1), &Utc);

        let days: Vec<NaiveDate> = buckets.iter().map(|b| b.day).collect();
        assert_eq!(days, vec![day(2024, 1, 2), day(2024, 5, 10)]);
        assert_eq!(buckets[1].items.len(), 2);

        let empty: Vec<Stamp> = Vec::new();
        assert!(bucket(&empty, Period::All, day(2024, 1, 1), &Utc).is_empty());
    }

    #[test]
    fn test_local_day_boundaries() {
        // 23:00 UTC is already the next day at UTC+2
        let records = vec![at(2024, 5, 10, 23)];
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();

        let buckets = bucket(&records, Period::Day, day(2024, 5, 11), &tz);
        assert_eq!(buckets[0].items.len(), 1);

        let buckets = bucket(&records, Period::Day, day(2024, 5, 10), &tz);
        assert!(buckets[0].is_empty());
    }
}
