//! Easter Sunday computus.
//!
//! Years up to and including [`GREGORIAN_CUTOVER_YEAR`] use the Julian
//! algorithm, later years the Gregorian (Meeus/Jones/Butcher) algorithm. Both
//! return a proleptic Gregorian [`NaiveDate`]; the Julian result is converted
//! before it is returned, so the value carries no trace of which algorithm
//! produced it.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::calendar;
use crate::error::{EasterError, Result};

/// Last year computed with the Julian algorithm.
pub const GREGORIAN_CUTOVER_YEAR: i32 = 1583;

/// Offsets with a larger magnitude are discarded by the BYEASTER transform.
pub const MAX_OFFSET_MAGNITUDE: i32 = 366;

/// Days between the earliest possible Easter Sunday (March 22) and December 31.
const MAX_DAYS_AFTER_EASTER: i32 = 284;

/// Which Easter algorithm applies to a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Computus {
    Julian,
    Gregorian,
}

impl Computus {
    /// The algorithm used for `year` under the fixed cutover.
    pub fn for_year(year: i32) -> Self {
        if year <= GREGORIAN_CUTOVER_YEAR {
            Computus::Julian
        } else {
            Computus::Gregorian
        }
    }

    /// Easter Sunday of `year` using this algorithm, regardless of the cutover.
    pub fn easter_sunday(self, year: i32) -> Result<NaiveDate> {
        match self {
            Computus::Julian => julian_easter_sunday(year),
            Computus::Gregorian => gregorian_easter_sunday(year),
        }
    }
}

/// Easter Sunday of `year`.
///
/// # Errors
/// Returns `EasterError::UnrepresentableYear` if the date falls outside the
/// range of `NaiveDate`.
pub fn easter_sunday(year: i32) -> Result<NaiveDate> {
    Computus::for_year(year).easter_sunday(year)
}

/// Easter Sunday of `year` in the Julian calendar, expressed as a proleptic
/// Gregorian date.
pub fn julian_easter_sunday(year: i32) -> Result<NaiveDate> {
    let y = i64::from(year);
    let a = y % 4;
    let b = y % 7;
    let c = y % 19;
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let x = d + e + 114;

    let (month, day) = month_and_day(x);
    day.and_then(|day| calendar::julian_to_gregorian(year, month, day))
        .ok_or(EasterError::UnrepresentableYear(year))
}

/// Easter Sunday of `year` in the proleptic Gregorian calendar.
pub fn gregorian_easter_sunday(year: i32) -> Result<NaiveDate> {
    let y = i64::from(year);
    let a = y % 19;
    let b = y / 100;
    let c = y % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let j = c % 4;
    let k = (32 + 2 * e + 2 * i - h - j) % 7;
    let l = (a + 11 * h + 22 * k) / 451;
    let x = h + k - 7 * l + 114;

    let (month, day) = month_and_day(x);
    day.and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or(EasterError::UnrepresentableYear(year))
}

/// Range of meaningful offsets after Easter within a single year.
///
/// Distinct from [`MAX_OFFSET_MAGNITUDE`], which is the looser discard bound
/// applied by the transform.
pub fn valid_offset_range() -> RangeInclusive<i32> {
    0..=MAX_DAYS_AFTER_EASTER
}

/// Split the computus value `x` into (month, day). Month 3 is March, anything
/// else April; a non-positive day (only reachable for negative years) is `None`.
fn month_and_day(x: i64) -> (u32, Option<u32>) {
    let month = if x / 31 == 3 { 3 } else { 4 };
    let day = u32::try_from(x % 31 + 1).ok().filter(|d| *d > 0);
    (month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutover_is_inclusive_for_julian() {
        assert_eq!(Computus::for_year(1583), Computus::Julian);
        assert_eq!(Computus::for_year(1584), Computus::Gregorian);
        assert_eq!(Computus::for_year(-44), Computus::Julian);
    }

    #[test]
    fn month_split() {
        // x = 114 is the smallest value: March 22.
        assert_eq!(month_and_day(114), (3, Some(22)));
        assert_eq!(month_and_day(124), (4, Some(1)));
    }

    #[test]
    fn offset_range_bounds() {
        assert_eq!(valid_offset_range(), 0..=284);
        assert!(MAX_OFFSET_MAGNITUDE > *valid_offset_range().end());
    }
}
