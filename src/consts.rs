/// Smallest valid canonical value (year 1000, month and day unspecified)
pub const MIN_VALUE: u32 = 10_000_000;

/// Largest valid canonical value (December 31, 9999)
pub const MAX_VALUE: u32 = 99_991_231;

/// Smallest year a flexible date can hold
pub const MIN_YEAR: u16 = 1000;
/// Largest year a flexible date can hold
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Number of months in a year, used for month-delta carry
pub const MONTHS_PER_YEAR: i64 = 12;

/// Multiplier placing a year in the `YYYY____` digits of the encoding
pub const YEAR_FACTOR: u32 = 10_000;
/// Multiplier placing a month in the `____MM__` digits of the encoding
pub const MONTH_FACTOR: u32 = 100;

/// Number of characters in a bare-year shorthand
pub const BARE_YEAR_LEN: usize = 4;
/// Number of characters in a canonical value written out in full
pub const ENCODED_LEN: usize = 8;

/// Placeholder appended to input before trying a no-day pattern
pub const NO_DAY_PLACEHOLDER: &str = " (01)";

/// How a matched pattern should be turned into a canonical value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Pattern carries a time of day that is discarded
    Timestamp,
    /// Pattern yields a full calendar date
    Date,
    /// Pattern carries a placeholder day that is zeroed after matching
    NoDay,
}

/// A `strftime`-style pattern tried by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePattern {
    pub format: &'static str,
    pub kind:   PatternKind,
}

/// Patterns tried in order for textual input.
/// Earlier entries win, so the most specific formats come first.
pub const DATE_PATTERNS: [DatePattern; 10] = [
    DatePattern { format: "%Y-%m-%d %H:%M:%S%.f", kind: PatternKind::Timestamp },
    DatePattern { format: "%Y-%m-%d %H:%M:%S", kind: PatternKind::Timestamp },
    DatePattern { format: "%Y-%m-%d", kind: PatternKind::Date },
    DatePattern { format: "%Y-%b-%d", kind: PatternKind::Date },
    DatePattern { format: "%Y-%B-%d", kind: PatternKind::Date },
    DatePattern { format: "%Y-%b (%d)", kind: PatternKind::NoDay },
    DatePattern { format: "%Y-%B (%d)", kind: PatternKind::NoDay },
    DatePattern { format: "%Y-%m (%d)", kind: PatternKind::NoDay },
    DatePattern { format: "%b %Y (%d)", kind: PatternKind::NoDay },
    DatePattern { format: "%B %Y (%d)", kind: PatternKind::NoDay },
];

/// Display format for a date with a day: `Apr 15, 2010`
pub const FULL_DATE_FORMAT: &str = "%b %-d, %Y";
/// Display format for a date without a day: `April 2010`
pub const MONTH_YEAR_FORMAT: &str = "%B %Y";

/// Span start with a day and no year: `Jan 1`
pub const SPAN_DAY_FORMAT: &str = "%b %-d";
/// Span end sharing its month with the start: `15, 2010`
pub const SPAN_DAY_YEAR_FORMAT: &str = "%-d, %Y";
/// Span end or start with month precision: `Jan 2010`
pub const SPAN_MONTH_YEAR_FORMAT: &str = "%b %Y";
/// Span start with month precision inside one year: `Jan`
pub const SPAN_MONTH_FORMAT: &str = "%b";

/// Separator between the two ends of a rendered span
pub const SPAN_SEPARATOR: char = '-';
