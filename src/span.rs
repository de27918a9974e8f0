use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    FULL_DATE_FORMAT, SPAN_DAY_FORMAT, SPAN_DAY_YEAR_FORMAT, SPAN_MONTH_FORMAT, SPAN_MONTH_YEAR_FORMAT,
    SPAN_SEPARATOR,
};
use crate::{FlexibleDate, Precision};

/// A stretch of time between two flexible dates, rendered with as little
/// repetition as the shared components allow (`Jan 1-15, 2010`).
/// The end is not required to come after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlexibleDateSpan {
    start: FlexibleDate,
    end:   Option<FlexibleDate>,
}

impl FlexibleDateSpan {
    /// Creates a span; pass `None` as `end` for a single point in time
    pub fn new(start: FlexibleDate, end: impl Into<Option<FlexibleDate>>) -> Self {
        Self {
            start,
            end: end.into(),
        }
    }

    pub const fn single(start: FlexibleDate) -> Self {
        Self { start, end: None }
    }

    pub const fn start(&self) -> FlexibleDate {
        self.start
    }

    pub const fn end(&self) -> Option<FlexibleDate> {
        self.end
    }

    /// True when the span renders as its start alone
    pub fn is_single(&self) -> bool {
        self.end.is_none_or(|end| end == self.start)
    }
}

impl fmt::Display for FlexibleDateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start;
        let Some(end) = self.end.filter(|end| *end != start) else {
            return write!(f, "{start}");
        };

        let same_year = start.year() == end.year();
        let (start_format, end_format) = match end.precision() {
            Precision::Day if same_year && start.month() == end.month() => (SPAN_DAY_FORMAT, SPAN_DAY_YEAR_FORMAT),
            Precision::Day if same_year => (SPAN_DAY_FORMAT, FULL_DATE_FORMAT),
            Precision::Day => (FULL_DATE_FORMAT, FULL_DATE_FORMAT),
            Precision::Month if same_year => (SPAN_MONTH_FORMAT, SPAN_MONTH_YEAR_FORMAT),
            Precision::Month => (SPAN_MONTH_YEAR_FORMAT, SPAN_MONTH_YEAR_FORMAT),
            Precision::Year => return write!(f, "{}{SPAN_SEPARATOR}{}", start.year(), end.year()),
        };

        // Missing components of either end count as 1 for name lookups
        let from = start.as_full_date().map_err(|_| fmt::Error)?;
        let to = end.as_full_date().map_err(|_| fmt::Error)?;
        write!(f, "{}{SPAN_SEPARATOR}{}", from.format(start_format), to.format(end_format))
    }
}
