//! Turns free-form date text into the canonical encoding.

use chrono::{NaiveDate, NaiveDateTime};

use crate::consts::{
    BARE_YEAR_LEN, DATE_PATTERNS, DatePattern, ENCODED_LEN, MAX_VALUE, MAX_YEAR, MIN_VALUE, MIN_YEAR,
    MONTH_FACTOR, NO_DAY_PLACEHOLDER, PatternKind, YEAR_FACTOR,
};
use crate::encoding::encode_date;
use crate::{Error, Result};

/// Parses `input` into a canonical `YYYYMMDD` value.
///
/// Tried in order: a bare four-digit year, an already encoded eight-digit
/// value, then every entry of [`DATE_PATTERNS`]. The returned value has the
/// right shape but is not yet checked against the calendar; build a
/// [`FlexibleDate`](crate::FlexibleDate) from it for that.
///
/// # Errors
/// `Error::Format` with the original input when no rule matches.
pub fn parse_flexible_date(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        tracing::debug!(input, "Empty flexible date input");
        return Err(Error::Format(input.to_owned()));
    }

    if let Some(year) = bare_year(trimmed) {
        tracing::trace!(input, year, "Parsed bare year");
        return Ok(u32::from(year) * YEAR_FACTOR);
    }

    if let Some(value) = encoded_value(trimmed).filter(|v| (MIN_VALUE..=MAX_VALUE).contains(v)) {
        tracing::trace!(input, value, "Accepted canonical value");
        return Ok(value);
    }

    for pattern in &DATE_PATTERNS {
        let Some(date) = match_pattern(trimmed, pattern) else {
            continue;
        };
        let mut value = encode_date(date);
        if pattern.kind == PatternKind::NoDay {
            value = value / i64::from(MONTH_FACTOR) * i64::from(MONTH_FACTOR);
        }
        tracing::trace!(input, pattern = pattern.format, value, "Matched date pattern");
        return u32::try_from(value).map_err(|_| Error::OutOfRange(value));
    }

    tracing::debug!(input, "Input matches no flexible date format");
    Err(Error::Format(input.to_owned()))
}

/// A four-digit year such as `"2010"`
fn bare_year(s: &str) -> Option<u16> {
    if s.len() != BARE_YEAR_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
}

/// Eight ASCII digits read as a number, without any range check
pub(crate) fn encoded_value(s: &str) -> Option<u32> {
    if s.len() != ENCODED_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn match_pattern(input: &str, pattern: &DatePattern) -> Option<NaiveDate> {
    match pattern.kind {
        PatternKind::Timestamp => NaiveDateTime::parse_from_str(input, pattern.format)
            .ok()
            .map(|dt| dt.date()),
        PatternKind::Date => NaiveDate::parse_from_str(input, pattern.format).ok(),
        PatternKind::NoDay => {
            NaiveDate::parse_from_str(&format!("{input}{NO_DAY_PLACEHOLDER}"), pattern.format).ok()
        },
    }
}
