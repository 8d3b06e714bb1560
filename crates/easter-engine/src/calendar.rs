//! Ordinal-day arithmetic over proleptic Gregorian dates.
//!
//! Offsets from Easter are applied by computing a target ordinal day and
//! converting `(year, ordinal)` back to a date, never by mutating calendar
//! fields in place. Julian-calendar dates enter the system only through
//! [`julian_to_gregorian`].

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
};

/// Julian Day Number of 0000-12-31 (proleptic Gregorian), i.e. day 0 for
/// `NaiveDate::from_num_days_from_ce_opt`.
const JDN_CE_EPOCH: i64 = 1_721_425;

/// A date or date-time flowing through a recurrence transform.
///
/// Implementors keep their own precision: a date-only value stays date-only,
/// a date-time keeps its time of day (and zone) when moved to another day.
pub trait CandidateDate: Sized {
    /// The calendar day this value falls on (local day for zoned values).
    fn date(&self) -> NaiveDate;

    /// The same value moved to `date`, or `None` when no instant on that day
    /// can be produced.
    fn with_date(&self, date: NaiveDate) -> Option<Self>;
}

impl CandidateDate for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }

    fn with_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date)
    }
}

impl CandidateDate for NaiveDateTime {
    fn date(&self) -> NaiveDate {
        NaiveDateTime::date(self)
    }

    fn with_date(&self, date: NaiveDate) -> Option<Self> {
        Some(date.and_time(self.time()))
    }
}

impl<Tz: TimeZone> CandidateDate for DateTime<Tz> {
    fn date(&self) -> NaiveDate {
        self.date_naive()
    }

    fn with_date(&self, date: NaiveDate) -> Option<Self> {
        let tz = self.timezone();
        let local = date.and_time(self.time());
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt),
            // Fall-back overlap: the earlier instant.
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            // Spring-forward gap: read the wall time with the offset in force
            // before the gap, which moves it forward by the gap length.
            LocalResult::None => {
                let day_before = local.checked_sub_signed(Duration::days(1))?;
                let offset = tz.offset_from_local_datetime(&day_before).earliest()?;
                let shift = Duration::seconds(i64::from(offset.fix().local_minus_utc()));
                let utc = local.checked_sub_signed(shift)?;
                Some(tz.from_utc_datetime(&utc))
            }
        }
    }
}

/// Whether `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year`: 365, or 366 for leap years.
pub fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Ordinal position of `date` counted from January 1 of `year` (1-based).
///
/// Equals `date.ordinal()` when `date` lies in `year`; values below 1 or
/// above [`days_in_year`] mean the date falls in a neighbouring year.
/// Returns `None` only when January 1 of `year` is not representable.
pub fn day_of_year_in(date: NaiveDate, year: i32) -> Option<i64> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    Some((date - jan_first).num_days() + 1)
}

/// The date at 1-based `ordinal` within `year`.
///
/// `None` unless `1 <= ordinal <= days_in_year(year)`.
pub fn from_day_of_year(year: i32, ordinal: i64) -> Option<NaiveDate> {
    let ordinal = u32::try_from(ordinal).ok()?;
    NaiveDate::from_yo_opt(year, ordinal)
}

/// Convert a Julian-calendar date to the equivalent proleptic Gregorian date.
///
/// Goes through the Julian Day Number, so it is valid for any year whose
/// result fits in `NaiveDate`.
pub fn julian_to_gregorian(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || day == 0 {
        return None;
    }
    let a = (14 - i64::from(month)) / 12;
    let y = i64::from(year) + 4800 - a;
    let m = i64::from(month) + 12 * a - 3;
    let jdn = i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32_083;

    let days_from_ce = i32::try_from(jdn - JDN_CE_EPOCH).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn julian_reform_day_maps_to_gregorian_reform_day() {
        // Thursday 4 October 1582 (Julian) was followed by Friday 15 October (Gregorian).
        assert_eq!(julian_to_gregorian(1582, 10, 5), Some(ymd(1582, 10, 15)));
        assert_eq!(julian_to_gregorian(1582, 10, 4), Some(ymd(1582, 10, 14)));
    }

    #[test]
    fn julian_offset_is_thirteen_days_in_modern_era() {
        assert_eq!(julian_to_gregorian(2024, 4, 22), Some(ymd(2024, 5, 5)));
        assert_eq!(julian_to_gregorian(1900, 3, 1), Some(ymd(1900, 3, 14)));
    }

    #[test]
    fn julian_rejects_impossible_month() {
        assert_eq!(julian_to_gregorian(2024, 13, 1), None);
        assert_eq!(julian_to_gregorian(2024, 4, 0), None);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2100), 365);
    }

    #[test]
    fn ordinal_round_trip_within_year() {
        assert_eq!(day_of_year_in(ymd(2024, 3, 31), 2024), Some(91));
        assert_eq!(from_day_of_year(2024, 91), Some(ymd(2024, 3, 31)));
        assert_eq!(from_day_of_year(2024, 366), Some(ymd(2024, 12, 31)));
        assert_eq!(from_day_of_year(2023, 366), None);
        assert_eq!(from_day_of_year(2023, 0), None);
    }

    #[test]
    fn ordinal_outside_year_is_signed() {
        assert_eq!(day_of_year_in(ymd(2023, 12, 31), 2024), Some(0));
        assert_eq!(day_of_year_in(ymd(2025, 1, 1), 2024), Some(367));
    }

    #[test]
    fn zoned_candidate_keeps_wall_clock_time() {
        let tz = chrono::FixedOffset::east_opt(3600).unwrap();
        let dt = tz.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap();
        let moved = dt.with_date(ymd(2024, 3, 31)).unwrap();
        assert_eq!(moved, tz.with_ymd_and_hms(2024, 3, 31, 9, 30, 0).unwrap());
    }

    #[test]
    fn zoned_candidate_in_dst_gap_moves_forward() {
        use chrono_tz::Europe::Budapest;

        let dt = Budapest.with_ymd_and_hms(2024, 1, 10, 2, 30, 0).unwrap();
        let moved = dt.with_date(ymd(2024, 3, 31)).unwrap();
        assert_eq!(moved, Budapest.with_ymd_and_hms(2024, 3, 31, 3, 30, 0).unwrap());
    }

    #[test]
    fn zoned_candidate_in_overlap_takes_earlier_instant() {
        use chrono_tz::Europe::Budapest;

        // 02:30 occurs twice on 2024-10-27; the CEST (+02:00) reading comes first.
        let dt = Budapest.with_ymd_and_hms(2024, 1, 10, 2, 30, 0).unwrap();
        let moved = dt.with_date(ymd(2024, 10, 27)).unwrap();
        assert_eq!(moved.offset().fix().local_minus_utc(), 7200);
    }
}
