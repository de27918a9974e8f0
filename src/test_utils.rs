//! Shorthand constructors shared by the unit tests.

use chrono::NaiveDate;

use crate::{FlexibleDate, FlexibleDateDelta};

/// Builds a flexible date from a canonical value known to be valid
pub fn fd(value: u32) -> FlexibleDate {
    FlexibleDate::new(value).unwrap_or_else(|e| panic!("invalid test value {value}: {e}"))
}

pub fn native(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

pub const fn delta(years: i32, months: i32, days: i32) -> FlexibleDateDelta {
    FlexibleDateDelta::new(years, months, days)
}
