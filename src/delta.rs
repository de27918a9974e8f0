//! Per-component offsets and flexible date arithmetic.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::consts::MONTHS_PER_YEAR;
use crate::encoding::compose;
use crate::{Error, FlexibleDate, Result};

/// A signed `(years, months, days)` offset.
///
/// Components are never normalized into one another: 13 months stays
/// 13 months. Ordering compares the `(years, months, days)` tuple, so one
/// year is greater than any number of months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexibleDateDelta {
    pub years:  i32,
    pub months: i32,
    pub days:   i32,
}

impl FlexibleDateDelta {
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self { years, months, days }
    }

    pub const fn of_years(years: i32) -> Self {
        Self::new(years, 0, 0)
    }

    pub const fn of_months(months: i32) -> Self {
        Self::new(0, months, 0)
    }

    pub const fn of_days(days: i32) -> Self {
        Self::new(0, 0, days)
    }

    pub const fn is_zero(self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

impl fmt::Display for FlexibleDateDelta {
    /// Lists non-zero components, days first: `3 days, 2 months, 1 year`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0 years");
        }
        let parts = [(self.days, "day"), (self.months, "month"), (self.years, "year")];
        let mut first = true;
        for (n, unit) in parts.into_iter().filter(|(n, _)| *n != 0) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            let plural = if n.unsigned_abs() == 1 { "" } else { "s" };
            write!(f, "{n} {unit}{plural}")?;
        }
        Ok(())
    }
}

impl FlexibleDateDelta {
    pub fn checked_neg(self) -> Option<Self> {
        Some(Self::new(self.years.checked_neg()?, self.months.checked_neg()?, self.days.checked_neg()?))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.years.checked_add(other.years)?,
            self.months.checked_add(other.months)?,
            self.days.checked_add(other.days)?,
        ))
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.years.checked_sub(other.years)?,
            self.months.checked_sub(other.months)?,
            self.days.checked_sub(other.days)?,
        ))
    }
}

impl Neg for FlexibleDateDelta {
    type Output = Self;

    /// # Panics
    /// If a component is `i32::MIN`; use [`FlexibleDateDelta::checked_neg`] to avoid that.
    fn neg(self) -> Self {
        self.checked_neg()
            .unwrap_or_else(|| panic!("overflow negating delta ({self:?})"))
    }
}

impl Add for FlexibleDateDelta {
    type Output = Self;

    /// # Panics
    /// If a component overflows `i32`.
    fn add(self, other: Self) -> Self {
        self.checked_add(other)
            .unwrap_or_else(|| panic!("overflow adding deltas ({self:?} + {other:?})"))
    }
}

impl Sub for FlexibleDateDelta {
    type Output = Self;

    /// # Panics
    /// If a component overflows `i32`.
    fn sub(self, other: Self) -> Self {
        self.checked_sub(other)
            .unwrap_or_else(|| panic!("overflow subtracting deltas ({self:?} - {other:?})"))
    }
}

impl FlexibleDate {
    /// Applies `delta` one component at a time: years, then months, then days.
    ///
    /// Months carry into years but never clamp the day, so Jan 31 plus one
    /// month is an error rather than Feb 28.
    ///
    /// # Errors
    /// - `MissingField` when the delta has months and this date has no month,
    ///   or the delta has days and this date has no day.
    /// - `InvalidDate` or `OutOfRange` when an intermediate or final value is
    ///   not a valid flexible date.
    pub fn checked_add(self, delta: FlexibleDateDelta) -> Result<Self> {
        self.shift(delta, 1, "add")
    }

    /// Same as `checked_add(-delta)`, without overflow for `i32::MIN` components.
    ///
    /// # Errors
    /// See [`FlexibleDate::checked_add`].
    pub fn checked_sub(self, delta: FlexibleDateDelta) -> Result<Self> {
        self.shift(delta, -1, "subtract")
    }

    /// Component-wise difference `self - other`.
    ///
    /// Months are only compared when both sides have a month and days only
    /// when both have a day; no borrowing happens between components.
    pub fn since(self, other: Self) -> FlexibleDateDelta {
        let years = i32::from(self.year()) - i32::from(other.year());
        let months = match (self.month(), other.month()) {
            (Some(a), Some(b)) => i32::from(a) - i32::from(b),
            _ => 0,
        };
        let days = match (self.day(), other.day()) {
            (Some(a), Some(b)) => i32::from(a) - i32::from(b),
            _ => 0,
        };
        FlexibleDateDelta::new(years, months, days)
    }

    fn shift(self, delta: FlexibleDateDelta, sign: i64, operation: &'static str) -> Result<Self> {
        self.apply(delta, sign, operation).inspect_err(|error| {
            tracing::debug!(date = self.value(), %delta, operation, %error, "Cannot apply delta to flexible date");
        })
    }

    /// Applies `sign * delta`; components are widened so negation cannot overflow.
    fn apply(self, delta: FlexibleDateDelta, sign: i64, operation: &'static str) -> Result<Self> {
        let (years, months, days) = (
            sign * i64::from(delta.years),
            sign * i64::from(delta.months),
            sign * i64::from(delta.days),
        );
        let mut year = i64::from(self.year()) + years;
        let mut month = self.month().map_or(0, i64::from);
        let day = self.day().map_or(0, i64::from);

        if months != 0 {
            let index = i64::from(self.require_month()?) - 1 + months;
            year += index.div_euclid(MONTHS_PER_YEAR);
            month = index.rem_euclid(MONTHS_PER_YEAR) + 1;
        }
        let shifted = Self::try_from(compose(year, month, day))?;

        if days == 0 {
            return Ok(shifted);
        }
        shifted.require_day()?;
        let moved = TimeDelta::try_days(days)
            .and_then(|days| shifted.date().ok()?.checked_add_signed(days))
            .ok_or_else(|| shifted.incompatible(operation, delta))?;
        Self::try_from(moved)
    }

    /// Shifts an exact date by a fixed duration.
    ///
    /// # Errors
    /// `Incompatible` unless this date has day precision; `OutOfRange` if the
    /// result leaves the supported years.
    pub fn checked_add_duration(self, duration: TimeDelta) -> Result<Self> {
        let date = self.date().map_err(|_| self.incompatible("add", duration))?;
        let moved = date
            .checked_add_signed(duration)
            .ok_or_else(|| self.incompatible("add", duration))?;
        Self::try_from(moved)
    }

    pub(crate) fn incompatible(self, operation: &'static str, other: impl fmt::Display) -> Error {
        Error::Incompatible {
            value: self.value(),
            operation,
            other: other.to_string(),
        }
    }
}

impl Add<FlexibleDateDelta> for FlexibleDate {
    type Output = Result<Self>;

    fn add(self, delta: FlexibleDateDelta) -> Result<Self> {
        self.checked_add(delta)
    }
}

impl Add<FlexibleDate> for FlexibleDateDelta {
    type Output = Result<FlexibleDate>;

    fn add(self, date: FlexibleDate) -> Result<FlexibleDate> {
        date.checked_add(self)
    }
}

impl Sub<FlexibleDateDelta> for FlexibleDate {
    type Output = Result<Self>;

    fn sub(self, delta: FlexibleDateDelta) -> Result<Self> {
        self.checked_sub(delta)
    }
}

impl Sub for FlexibleDate {
    type Output = FlexibleDateDelta;

    fn sub(self, other: Self) -> FlexibleDateDelta {
        self.since(other)
    }
}

impl Sub<NaiveDate> for FlexibleDate {
    type Output = Result<FlexibleDateDelta>;

    fn sub(self, other: NaiveDate) -> Result<FlexibleDateDelta> {
        Ok(self.since(Self::try_from(other)?))
    }
}

impl Sub<FlexibleDate> for NaiveDate {
    type Output = Result<TimeDelta>;

    /// Exact duration, borrowing any missing month or day from `self`
    fn sub(self, other: FlexibleDate) -> Result<TimeDelta> {
        Ok(self.signed_duration_since(other.fill_from(&self)?))
    }
}

impl Add<TimeDelta> for FlexibleDate {
    type Output = Result<Self>;

    fn add(self, duration: TimeDelta) -> Result<Self> {
        self.checked_add_duration(duration)
    }
}

impl Sub<TimeDelta> for FlexibleDate {
    type Output = Result<Self>;

    fn sub(self, duration: TimeDelta) -> Result<Self> {
        self.checked_add_duration(-duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use crate::test_utils::{delta, fd, native};
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case(20_100_115, delta(1, 2, 0), 20_110_315)]
    #[case(20_100_115, delta(1, 0, 0), 20_110_115)]
    #[case(20_100_000, delta(1, 0, 0), 20_110_000)]
    #[case(20_100_000, delta(-10, 0, 0), 20_000_000)]
    #[case(20_101_115, delta(0, 3, 0), 20_110_215)]
    #[case(20_100_315, delta(0, -3, 0), 20_091_215)]
    #[case(20_100_115, delta(0, -13, 0), 20_081_215)]
    #[case(20_100_400, delta(0, 10, 0), 20_110_200)]
    #[case(20_100_400, delta(0, -4, 0), 20_091_200)]
    #[case(20_100_228, delta(0, 0, 1), 20_100_301)]
    #[case(20_120_228, delta(0, 0, 1), 20_120_229)]
    #[case(20_101_231, delta(0, 0, 1), 20_110_101)]
    #[case(20_100_301, delta(0, 0, -1), 20_100_228)]
    #[case(20_100_115, delta(0, 1, -3), 20_100_212)]
    #[case(20_100_415, delta(0, 0, 0), 20_100_415)]
    fn test_checked_add(#[case] start: u32, #[case] offset: FlexibleDateDelta, #[case] expected: u32) {
        assert_eq!(fd(start).checked_add(offset), Ok(fd(expected)));
        assert_eq!(fd(start) + offset, Ok(fd(expected)));
        assert_eq!(offset + fd(start), Ok(fd(expected)));
    }

    #[test]
    fn test_month_overflow_does_not_clamp() {
        assert_eq!(
            fd(20_100_131).checked_add(delta(0, 1, 0)),
            Err(Error::InvalidDate {
                year:  2010,
                month: 2,
                day:   31,
            })
        );
        assert_matches!(fd(20_100_531) + delta(0, 1, 0), Err(Error::InvalidDate { month: 6, .. }));
    }

    #[test]
    fn test_leap_day_plus_year() {
        assert_matches!(fd(20_120_229) + delta(1, 0, 0), Err(Error::InvalidDate { year: 2013, .. }));
        assert_eq!(fd(20_120_229) + delta(4, 0, 0), Ok(fd(20_160_229)));
    }

    #[test]
    fn test_months_need_a_month() {
        assert_eq!(
            fd(20_100_000) + delta(0, 1, 0),
            Err(Error::MissingField {
                value: 20_100_000,
                field: Field::Month,
            })
        );
    }

    #[test]
    fn test_days_need_a_day() {
        assert_matches!(
            fd(20_100_400) + delta(0, 0, 1),
            Err(Error::MissingField { field: Field::Day, .. })
        );
        assert_matches!(
            fd(20_100_000) + delta(0, 0, 1),
            Err(Error::MissingField { field: Field::Day, .. })
        );
    }

    #[test]
    fn test_result_out_of_range() {
        assert_matches!(fd(99_991_231) + delta(0, 0, 1), Err(Error::OutOfRange(_)));
        assert_matches!(fd(10_000_000) - delta(1, 0, 0), Err(Error::OutOfRange(_)));
        assert_matches!(fd(99_991_200) + delta(0, 1, 0), Err(Error::OutOfRange(_)));
        assert_matches!(fd(20_100_101) + delta(0, 0, i32::MAX), Err(_));
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(fd(20_110_315) - delta(1, 2, 0), Ok(fd(20_100_115)));
        assert_eq!(fd(20_100_301).checked_sub(delta(0, 0, 1)), Ok(fd(20_100_228)));
    }

    #[test]
    fn test_checked_sub_extreme_components() {
        assert_matches!(
            fd(20_100_415).checked_sub(FlexibleDateDelta::of_days(i32::MIN)),
            Err(Error::Incompatible { operation: "subtract", .. })
        );
        assert_matches!(
            fd(20_100_415).checked_sub(FlexibleDateDelta::of_years(i32::MIN)),
            Err(Error::OutOfRange(_))
        );
        assert_matches!(
            fd(20_100_415).checked_sub(FlexibleDateDelta::of_months(i32::MIN)),
            Err(Error::OutOfRange(_))
        );
        assert_matches!(fd(20_100_415) - delta(i32::MIN, i32::MIN, i32::MIN), Err(_));
    }

    #[test]
    fn test_receiver_is_unchanged() {
        let start = fd(20_100_115);
        let _ = start + delta(1, 1, 1);
        assert_eq!(start, fd(20_100_115));
    }

    #[rstest]
    #[case(20_100_000, 20_050_615, delta(5, 0, 0))]
    #[case(20_100_415, 20_100_301, delta(0, 1, 14))]
    #[case(20_100_305, 20_100_228, delta(0, 1, -23))]
    #[case(20_100_400, 20_090_615, delta(1, -2, 0))]
    #[case(20_050_615, 20_100_000, delta(-5, 0, 0))]
    #[case(20_100_415, 20_100_415, delta(0, 0, 0))]
    fn test_date_difference(#[case] a: u32, #[case] b: u32, #[case] expected: FlexibleDateDelta) {
        assert_eq!(fd(a) - fd(b), expected);
        assert_eq!(fd(a).since(fd(b)), expected);
    }

    #[test]
    fn test_difference_with_native_date() {
        assert_eq!(fd(20_100_415) - native(2009, 4, 10), Ok(delta(1, 0, 5)));
        assert_eq!(fd(20_100_000) - native(2009, 4, 10), Ok(delta(1, 0, 0)));
        assert_matches!(fd(20_100_000) - native(500, 1, 1), Err(Error::OutOfRange(_)));
    }

    #[test]
    fn test_native_minus_flexible() {
        assert_eq!(native(2010, 4, 20) - fd(20_100_415), Ok(TimeDelta::days(5)));
        assert_eq!(native(2010, 4, 20) - fd(20_100_400), Ok(TimeDelta::zero()));
        assert_eq!(native(2010, 4, 20) - fd(20_090_000), Ok(TimeDelta::days(365)));
        assert_matches!(native(2010, 3, 31) - fd(20_100_200), Err(Error::InvalidDate { .. }));
    }

    #[test]
    fn test_duration_arithmetic() {
        assert_eq!(fd(20_100_415) + TimeDelta::days(20), Ok(fd(20_100_505)));
        assert_eq!(fd(20_100_415) - TimeDelta::days(15), Ok(fd(20_100_331)));
        assert_eq!(fd(20_100_415) + TimeDelta::hours(23), Ok(fd(20_100_415)));
        assert_matches!(
            fd(20_100_400) + TimeDelta::days(1),
            Err(Error::Incompatible { operation: "add", .. })
        );
    }

    #[test]
    fn test_delta_arithmetic() {
        assert_eq!(delta(1, 2, 3) + delta(4, 5, 6), delta(5, 7, 9));
        assert_eq!(delta(1, 2, 3) - delta(4, 5, 6), delta(-3, -3, -3));
        assert_eq!(-delta(1, -2, 3), delta(-1, 2, -3));
        assert_eq!(FlexibleDateDelta::of_months(13), delta(0, 13, 0));
        assert!(FlexibleDateDelta::default().is_zero());
    }

    #[test]
    fn test_checked_delta_arithmetic() {
        let max = FlexibleDateDelta::of_years(i32::MAX);
        assert_eq!(max.checked_add(FlexibleDateDelta::of_years(1)), None);
        assert_eq!(max.checked_add(FlexibleDateDelta::of_years(-1)), Some(delta(i32::MAX - 1, 0, 0)));
        assert_eq!(FlexibleDateDelta::of_days(i32::MIN).checked_neg(), None);
        assert_eq!(delta(1, -2, 3).checked_neg(), Some(delta(-1, 2, -3)));
        assert_eq!(FlexibleDateDelta::of_months(i32::MIN).checked_sub(FlexibleDateDelta::of_months(1)), None);
        assert_eq!(delta(1, 2, 3).checked_sub(delta(1, 1, 1)), Some(delta(0, 1, 2)));
    }

    #[test]
    #[should_panic(expected = "overflow adding deltas")]
    fn test_delta_add_overflow_panics() {
        let _ = FlexibleDateDelta::of_years(i32::MAX) + FlexibleDateDelta::of_years(1);
    }

    #[test]
    #[should_panic(expected = "overflow negating delta")]
    fn test_delta_neg_overflow_panics() {
        let _ = -FlexibleDateDelta::of_days(i32::MIN);
    }

    #[test]
    fn test_delta_ordering_is_lexicographic() {
        assert!(FlexibleDateDelta::of_years(1) > FlexibleDateDelta::of_months(12));
        assert!(FlexibleDateDelta::of_months(1) > FlexibleDateDelta::of_days(400));
        assert!(delta(1, 0, 5) < delta(1, 1, 0));
        assert!(delta(-1, 0, 0) < FlexibleDateDelta::default());
    }

    #[rstest]
    #[case(delta(0, 0, 0), "0 years")]
    #[case(delta(1, 0, 0), "1 year")]
    #[case(delta(2, 0, 0), "2 years")]
    #[case(delta(0, -1, 0), "-1 month")]
    #[case(delta(0, 0, -3), "-3 days")]
    #[case(delta(1, 2, 3), "3 days, 2 months, 1 year")]
    #[case(delta(5, 0, 1), "1 day, 5 years")]
    fn test_delta_display(#[case] offset: FlexibleDateDelta, #[case] expected: &str) {
        assert_eq!(offset.to_string(), expected);
    }

    #[test]
    fn test_delta_serde() {
        let json = serde_json::to_string(&delta(1, -2, 3)).unwrap();
        assert_eq!(json, r#"{"years":1,"months":-2,"days":3}"#);

        let parsed: FlexibleDateDelta = serde_json::from_str(r#"{"months":4}"#).unwrap();
        assert_eq!(parsed, FlexibleDateDelta::of_months(4));
    }
}
