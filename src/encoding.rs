//! Canonical `YYYYMMDD` encoding of a partial date.
//!
//! A zero in the month or day digits means the component is unspecified.

use chrono::{Datelike, NaiveDate};

use crate::consts::{MAX_MONTH, MAX_VALUE, MIN_VALUE, MONTH_FACTOR, YEAR_FACTOR};
use crate::prelude::*;
use crate::{Error, Result};

/// An optional component of a flexible date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
}

/// How much of a flexible date is known.
/// Ordered from least to most precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Precision {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
}

/// The three digit groups of a canonical value; zero marks an unspecified component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Components {
    pub year:  u16,
    pub month: u8,
    pub day:   u8,
}

impl Components {
    /// Splits a value already known to be at most `MAX_VALUE`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn split(value: u32) -> Self {
        Self {
            year:  (value / YEAR_FACTOR) as u16,
            month: ((value / MONTH_FACTOR) % MONTH_FACTOR) as u8,
            day:   (value % MONTH_FACTOR) as u8,
        }
    }

    /// Exact calendar date, if both month and day are specified and form a real date
    pub fn calendar_date(self) -> Option<NaiveDate> {
        ymd(i64::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

/// Builds an encoding from raw components without validating it
pub(crate) fn compose(year: i64, month: i64, day: i64) -> i64 {
    year * i64::from(YEAR_FACTOR) + month * i64::from(MONTH_FACTOR) + day
}

/// Full-precision encoding of a calendar date
pub(crate) fn encode_date(date: NaiveDate) -> i64 {
    compose(i64::from(date.year()), i64::from(date.month()), i64::from(date.day()))
}

pub(crate) fn ymd(year: i64, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Checks every invariant of the canonical encoding.
///
/// # Errors
/// `OutOfRange` outside `MIN_VALUE..=MAX_VALUE`, `InvalidMonth` for a month
/// above 12, `InvalidDate` when a day is present but the date does not exist.
pub(crate) fn validate(value: i64) -> Result<u32> {
    let value = u32::try_from(value)
        .ok()
        .filter(|v| (MIN_VALUE..=MAX_VALUE).contains(v))
        .ok_or(Error::OutOfRange(value))?;

    let parts = Components::split(value);
    if parts.month > MAX_MONTH {
        return Err(Error::InvalidMonth {
            value,
            month: u32::from(parts.month),
        });
    }
    if parts.day != 0 && parts.calendar_date().is_none() {
        return Err(Error::InvalidDate {
            year:  i64::from(parts.year),
            month: u32::from(parts.month),
            day:   u32::from(parts.day),
        });
    }
    Ok(value)
}
