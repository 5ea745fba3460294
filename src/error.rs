use thiserror::Error;

use crate::field::Field;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field or combination of fields is not valid for the value being built.
    Validation,
    /// A reduction (min/max) was asked for over zero values.
    EmptyInput,
    /// The result falls outside the representable year / epoch range.
    Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid {field}: {value} is not in the range {min} to {max}")]
    FieldOutOfRange {
        field: Field,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid date {year}-{month:02}-{day:02}: the day is not valid for the month")]
    InvalidDate { year: i32, month: u8, day: u8 },

    #[error("the end instant must not be before the start instant")]
    EndBeforeStart,

    #[error("unknown time-zone region: {0:?}")]
    UnknownTimeZoneRegion(String),

    #[error("missing field: {0}")]
    MissingField(Field),

    #[error("invalid text for {field}: {text:?}")]
    InvalidFieldText { field: Field, text: String },

    #[error("{0} requires at least one value")]
    EmptyInput(&'static str),

    #[error("{0} overflowed the supported range")]
    Overflow(&'static str),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::Overflow(_) => ErrorKind::Overflow,
            _ => ErrorKind::Validation,
        }
    }
}
