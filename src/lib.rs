mod consts;
mod delta;
mod encoding;
mod parser;
mod prelude;
mod span;
#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use delta::FlexibleDateDelta;
pub use encoding::{Field, Precision};
pub use parser::parse_flexible_date;
pub use span::FlexibleDateSpan;

use crate::encoding::{Components, encode_date, validate, ymd};
use crate::prelude::*;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A date known to year, month or day precision.
///
/// Stored as a single canonical integer `YYYYMMDD` where `MM` and `DD` may be
/// `00` for "unspecified". Two flexible dates order by that integer, so
/// `2010` sorts before `April 2010`, which sorts before `Apr 1, 2010`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct FlexibleDate(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input text matches none of the recognized formats.
    #[error("{0:?} is not a valid format for a flexible date")]
    Format(String),

    /// Canonical value outside `MIN_VALUE..=MAX_VALUE`.
    #[error("flexible date value {0} is out of range (must be {min}-{max})", min = MIN_VALUE, max = MAX_VALUE)]
    OutOfRange(i64),

    #[error("invalid month {month} in flexible date value {value}")]
    InvalidMonth { value: u32, month: u32 },

    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    InvalidDate { year: i64, month: u32, day: u32 },

    /// A component needed by an accessor or operation is unspecified.
    #[error("flexible date {value} has no {field}")]
    MissingField { value: u32, field: Field },

    /// The operands cannot be combined.
    #[error("cannot {operation} flexible date {value} and {other}")]
    Incompatible {
        value:     u32,
        operation: &'static str,
        other:     String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl FlexibleDate {
    /// Creates a flexible date from a canonical `YYYYMMDD` value.
    ///
    /// # Errors
    /// `OutOfRange`, `InvalidMonth` or `InvalidDate` when the value breaks an
    /// encoding invariant.
    pub fn new(value: u32) -> Result<Self> {
        validate(i64::from(value)).map(Self)
    }

    /// Parses anything with a textual form: free-form date text, a bare
    /// year, a canonical integer or a native date.
    ///
    /// # Errors
    /// `Format` when no rule reads the input, or any construction error for
    /// the value it produces.
    pub fn parse(input: impl fmt::Display) -> Result<Self> {
        let text = input.to_string();
        if let Some(value) = parser::encoded_value(&text).filter(|v| MIN_VALUE < *v && *v < MAX_VALUE) {
            return Self::new(value);
        }
        Self::new(parse_flexible_date(&text)?)
    }

    /// The canonical `YYYYMMDD` value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    const fn components(self) -> Components {
        Components::split(self.0)
    }

    /// Returns the year (always present)
    pub const fn year(self) -> u16 {
        self.components().year
    }

    /// Returns the month if specified
    pub const fn month(self) -> Option<u8> {
        match self.components().month {
            0 => None,
            month => Some(month),
        }
    }

    /// Returns the day if specified
    pub const fn day(self) -> Option<u8> {
        match self.components().day {
            0 => None,
            day => Some(day),
        }
    }

    /// Returns the month, failing when it is unspecified.
    ///
    /// # Errors
    /// `MissingField` for a year-only date.
    pub fn require_month(self) -> Result<u8> {
        self.month().ok_or_else(|| self.missing(Field::Month))
    }

    /// Returns the day, failing when it is unspecified.
    ///
    /// # Errors
    /// `MissingField` unless the date has day precision.
    pub fn require_day(self) -> Result<u8> {
        self.day().ok_or_else(|| self.missing(Field::Day))
    }

    pub const fn precision(self) -> Precision {
        match (self.month(), self.day()) {
            (_, Some(_)) => Precision::Day,
            (Some(_), None) => Precision::Month,
            (None, None) => Precision::Year,
        }
    }

    /// Earliest calendar date this value can stand for: an unspecified
    /// month or day counts as 1.
    ///
    /// # Errors
    /// `InvalidDate` if the promoted date does not exist, which construction rules out.
    pub fn as_full_date(self) -> Result<NaiveDate> {
        let month = self.month().map_or(1, u32::from);
        let day = self.day().map_or(1, u32::from);
        ymd(i64::from(self.year()), month, day).ok_or(Error::InvalidDate {
            year: i64::from(self.year()),
            month,
            day,
        })
    }

    /// The exact calendar date.
    ///
    /// # Errors
    /// `MissingField` unless both month and day are specified.
    pub fn date(self) -> Result<NaiveDate> {
        self.require_month()?;
        self.require_day()?;
        self.as_full_date()
    }

    /// Orders this value against a native date by comparing
    /// `(year, month, day)` component by component.
    ///
    /// Unlike comparisons between two flexible dates this is not an integer
    /// comparison: reaching a component this value lacks is an error.
    ///
    /// # Errors
    /// `Incompatible` when the years (or years and months) are equal and the
    /// next component is unspecified here.
    pub fn cmp_date(self, other: &NaiveDate) -> Result<Ordering> {
        let mine = [Some(i64::from(self.year())), self.month().map(i64::from), self.day().map(i64::from)];
        let theirs = [i64::from(other.year()), i64::from(other.month()), i64::from(other.day())];
        for (mine, theirs) in mine.into_iter().zip(theirs) {
            let Some(mine) = mine else {
                return Err(Error::Incompatible {
                    value:     self.0,
                    operation: "compare",
                    other:     other.to_string(),
                });
            };
            match mine.cmp(&theirs) {
                Ordering::Equal => {},
                ord => return Ok(ord),
            }
        }
        Ok(Ordering::Equal)
    }

    /// Completes missing month and day from `other`
    pub(crate) fn fill_from(self, other: &NaiveDate) -> Result<NaiveDate> {
        let month = self.month().map_or_else(|| other.month(), u32::from);
        let day = self.day().map_or_else(|| other.day(), u32::from);
        ymd(i64::from(self.year()), month, day).ok_or(Error::InvalidDate {
            year: i64::from(self.year()),
            month,
            day,
        })
    }

    pub(crate) const fn missing(self, field: Field) -> Error {
        Error::MissingField { value: self.0, field }
    }
}

impl fmt::Display for FlexibleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision() {
            Precision::Day => {
                let date = self.as_full_date().map_err(|_| fmt::Error)?;
                write!(f, "{}", date.format(FULL_DATE_FORMAT))
            },
            Precision::Month => {
                let date = self.as_full_date().map_err(|_| fmt::Error)?;
                write!(f, "{}", date.format(MONTH_YEAR_FORMAT))
            },
            Precision::Year => write!(f, "{}", self.year()),
        }
    }
}

impl FromStr for FlexibleDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for FlexibleDate {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for FlexibleDate {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        validate(value).map(Self)
    }
}

impl TryFrom<NaiveDate> for FlexibleDate {
    type Error = Error;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        validate(encode_date(date)).map(Self)
    }
}

impl TryFrom<NaiveDateTime> for FlexibleDate {
    type Error = Error;

    fn try_from(datetime: NaiveDateTime) -> Result<Self, Self::Error> {
        Self::try_from(datetime.date())
    }
}

impl PartialEq<NaiveDate> for FlexibleDate {
    fn eq(&self, other: &NaiveDate) -> bool {
        self.date().is_ok_and(|date| date == *other)
    }
}

impl PartialEq<FlexibleDate> for NaiveDate {
    fn eq(&self, other: &FlexibleDate) -> bool {
        other == self
    }
}

impl PartialOrd<NaiveDate> for FlexibleDate {
    fn partial_cmp(&self, other: &NaiveDate) -> Option<Ordering> {
        self.cmp_date(other).ok()
    }
}

impl PartialOrd<FlexibleDate> for NaiveDate {
    fn partial_cmp(&self, other: &FlexibleDate) -> Option<Ordering> {
        other.cmp_date(self).ok().map(Ordering::reverse)
    }
}

impl PartialEq<NaiveDateTime> for FlexibleDate {
    /// Equal only to midnight of the exact date
    fn eq(&self, other: &NaiveDateTime) -> bool {
        self.date().is_ok_and(|date| date.and_time(NaiveTime::MIN) == *other)
    }
}

impl PartialEq<FlexibleDate> for NaiveDateTime {
    fn eq(&self, other: &FlexibleDate) -> bool {
        other == self
    }
}

impl PartialOrd<NaiveDateTime> for FlexibleDate {
    /// Orders by calendar date only; the time of day is ignored.
    fn partial_cmp(&self, other: &NaiveDateTime) -> Option<Ordering> {
        self.cmp_date(&other.date()).ok()
    }
}

impl PartialOrd<FlexibleDate> for NaiveDateTime {
    fn partial_cmp(&self, other: &FlexibleDate) -> Option<Ordering> {
        other.cmp_date(&self.date()).ok().map(Ordering::reverse)
    }
}

impl serde::Serialize for FlexibleDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FlexibleDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Value(i64),
            Text(String),
        }

        let date = match Repr::deserialize(deserializer)? {
            Repr::Value(value) => Self::try_from(value),
            Repr::Text(text) => Self::parse(text),
        };
        date.map_err(serde::de::Error::custom)
    }
}
