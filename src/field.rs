use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

pub const MIN_YEAR: i32 = -999_999;
pub const MAX_YEAR: i32 = 999_999;

/// A named date-time field, as produced by an ISO 8601 parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    DayOfWeek,
    DayOfYear,
    Hour,
    Minute,
    Second,
    /// Fraction of second. Range-checked as a nanosecond count; as parser text it is the
    /// digits after the decimal point.
    Nano,
    /// Unit for truncating or rounding a time, in nanoseconds. It must divide a day evenly.
    RoundingUnit,
    /// Total seconds of a time-zone offset from UTC.
    OffsetSeconds,
    TimeZoneRegion,
}

impl Field {
    /// Inclusive range of valid values, or `None` for fields that aren't numeric.
    pub fn range(self) -> Option<(i64, i64)> {
        match self {
            Field::Year => Some((MIN_YEAR as i64, MAX_YEAR as i64)),
            Field::Month => Some((1, 12)),
            Field::Day => Some((1, 31)),
            Field::DayOfWeek => Some((1, 7)),
            Field::DayOfYear => Some((1, 366)),
            Field::Hour => Some((0, 23)),
            Field::Minute => Some((0, 59)),
            Field::Second => Some((0, 59)),
            Field::Nano => Some((0, 999_999_999)),
            Field::RoundingUnit => Some((1, 86_400_000_000_000)),
            Field::OffsetSeconds => Some((-18 * 3600, 18 * 3600)),
            Field::TimeZoneRegion => None,
        }
    }

    pub(crate) fn check(self, value: i64) -> Result<i64> {
        match self.range() {
            Some((min, max)) if value < min || value > max => Err(Error::FieldOutOfRange {
                field: self,
                value,
                min,
                max,
            }),
            _ => Ok(value),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month-of-year",
            Field::Day => "day-of-month",
            Field::DayOfWeek => "day-of-week",
            Field::DayOfYear => "day-of-year",
            Field::Hour => "hour-of-day",
            Field::Minute => "minute-of-hour",
            Field::Second => "second-of-minute",
            Field::Nano => "nano-of-second",
            Field::RoundingUnit => "rounding unit in nanoseconds",
            Field::OffsetSeconds => "offset-seconds",
            Field::TimeZoneRegion => "time-zone region",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access to already-extracted field text, such as the result of parsing
/// `2007-12-03T10:15:30.25`.
///
/// The value types validate whatever they read from here; a lookup never has to.
pub trait FieldLookup {
    fn field(&self, field: Field) -> Option<&str>;
}

impl<T: FieldLookup + ?Sized> FieldLookup for &T {
    fn field(&self, field: Field) -> Option<&str> {
        (**self).field(field)
    }
}

/// A plain map of field texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    fields: HashMap<Field, String>,
}

impl ParsedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, text: impl Into<String>) -> Self {
        self.fields.insert(field, text.into());
        self
    }

    pub fn insert(&mut self, field: Field, text: impl Into<String>) -> &mut Self {
        self.fields.insert(field, text.into());
        self
    }
}

impl FieldLookup for ParsedFields {
    fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }
}

pub(crate) fn required<L: FieldLookup + ?Sized>(lookup: &L, field: Field) -> Result<&str> {
    lookup.field(field).ok_or(Error::MissingField(field))
}

pub(crate) fn required_int<L: FieldLookup + ?Sized>(lookup: &L, field: Field) -> Result<i64> {
    parse_int(field, required(lookup, field)?)
}

pub(crate) fn optional_int<L: FieldLookup + ?Sized>(lookup: &L, field: Field) -> Result<i64> {
    match lookup.field(field) {
        Some(text) => parse_int(field, text),
        None => Ok(0),
    }
}

/// Converts fraction-of-second digits ("25" for .25) into nanoseconds.
pub(crate) fn optional_fraction<L: FieldLookup + ?Sized>(lookup: &L) -> Result<i64> {
    let text = match lookup.field(Field::Nano) {
        Some(text) => text,
        None => return Ok(0),
    };
    if text.is_empty() || text.len() > 9 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_text(Field::Nano, text));
    }
    let digits = parse_int(Field::Nano, text)?;
    Ok(digits * 10_i64.pow(9 - text.len() as u32))
}

fn parse_int(field: Field, text: &str) -> Result<i64> {
    text.parse::<i64>().map_err(|_| invalid_text(field, text))
}

fn invalid_text(field: Field, text: &str) -> Error {
    Error::InvalidFieldText {
        field,
        text: text.to_string(),
    }
}
