use std::cmp::min;
use std::fmt;

use crate::clock::Clock;
use crate::div_rem::FloorDivMod;
use crate::error::{Error, Result};
use crate::field::{self, Field, FieldLookup, MAX_YEAR, MIN_YEAR};
use crate::gregorian::{self, CycleDate};
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::period::Period;
use crate::time_zone::TimeZone;

pub const DAYS_PER_WEEK: i64 = 7;
pub const MONTHS_PER_YEAR: i64 = 12;

/// Epoch day of -999999-01-01.
const MIN_EPOCH_DAY: i64 = -365_961_663;
/// Epoch day of +999999-12-31.
const MAX_EPOCH_DAY: i64 = 364_522_971;

/// A day of the week, numbered from Monday = 1 to Sunday = 7 as in ISO 8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn of(value: u8) -> Result<Self> {
        match value {
            1..=7 => Ok(Self::ALL[value as usize - 1]),
            _ => Err(Error::FieldOutOfRange {
                field: Field::DayOfWeek,
                value: value as i64,
                min: 1,
                max: 7,
            }),
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn plus(self, days: i64) -> Self {
        let (_, index) = (self as i64 - 1 + days).floor_div_mod(DAYS_PER_WEEK);
        Self::ALL[index as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A date without a time-zone in the ISO-8601 calendar system, such as `2007-12-03`.
///
/// Stored as a count of days since 1970-01-01; year, month and day are computed from that on
/// demand. Years range from -999,999 to 999,999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDate {
    epoch_day: i64,
}

impl LocalDate {
    pub const MIN: LocalDate = LocalDate {
        epoch_day: MIN_EPOCH_DAY,
    };
    pub const MAX: LocalDate = LocalDate {
        epoch_day: MAX_EPOCH_DAY,
    };
    pub const EPOCH: LocalDate = LocalDate { epoch_day: 0 };

    /// Fails if any field is out of range, or if the day doesn't exist in the given month.
    pub fn of(year: i32, month: u8, day: u8) -> Result<Self> {
        check_year(year)?;
        Field::Month.check(month as i64)?;
        Field::Day.check(day as i64)?;
        if day > gregorian::days_in_month(year as i64, month) {
            return Err(Error::InvalidDate { year, month, day });
        }
        Ok(Self::of_valid(year, month, day))
    }

    pub fn of_year_day(year: i32, day_of_year: u16) -> Result<Self> {
        check_year(year)?;
        Field::DayOfYear.check(day_of_year as i64)?;
        if day_of_year > gregorian::days_in_year(year as i64) {
            return Err(Error::FieldOutOfRange {
                field: Field::DayOfYear,
                value: day_of_year as i64,
                min: 1,
                max: 365,
            });
        }
        Ok(Self::of_valid(year, 1, 1).plus_days_unchecked(day_of_year as i64 - 1))
    }

    pub fn of_epoch_day(epoch_day: i64) -> Result<Self> {
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::Overflow("LocalDate::of_epoch_day"));
        }
        Ok(LocalDate { epoch_day })
    }

    pub fn from_fields<L: FieldLookup + ?Sized>(fields: &L) -> Result<Self> {
        let year = field::required_int(fields, Field::Year)?;
        let month = field::required_int(fields, Field::Month)?;
        let day = field::required_int(fields, Field::Day)?;
        let year = Field::Year.check(year)? as i32;
        let month = Field::Month.check(month)? as u8;
        let day = Field::Day.check(day)? as u8;
        Self::of(year, month, day)
    }

    pub fn now(clock: &(impl Clock + ?Sized), zone: &(impl TimeZone + ?Sized)) -> Result<Self> {
        Ok(LocalDateTime::now(clock, zone)?.date())
    }

    pub fn min_of<I: IntoIterator<Item = LocalDate>>(dates: I) -> Result<Self> {
        dates
            .into_iter()
            .min()
            .ok_or(Error::EmptyInput("LocalDate::min_of"))
    }

    pub fn max_of<I: IntoIterator<Item = LocalDate>>(dates: I) -> Result<Self> {
        dates
            .into_iter()
            .max()
            .ok_or(Error::EmptyInput("LocalDate::max_of"))
    }

    fn of_valid(year: i32, month: u8, day: u8) -> Self {
        LocalDate {
            epoch_day: CycleDate::from_date(year as i64, month, day).to_epoch_day(),
        }
    }

    /// Builds the date, moving the day back to the last day of the month if it doesn't exist.
    fn resolve_previous_valid(year: i32, month: u8, day: u8) -> Self {
        let day = min(day, gregorian::days_in_month(year as i64, month));
        Self::of_valid(year, month, day)
    }

    fn fields(&self) -> (i32, u8, u8) {
        let (year, month, day) = CycleDate::from_epoch_day(self.epoch_day).to_date();
        (year as i32, month, day)
    }

    pub fn to_epoch_day(&self) -> i64 {
        self.epoch_day
    }

    pub fn year(&self) -> i32 {
        self.fields().0
    }

    pub fn month(&self) -> u8 {
        self.fields().1
    }

    pub fn day(&self) -> u8 {
        self.fields().2
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        // 1970-01-01 was a Thursday.
        DayOfWeek::Thursday.plus(self.epoch_day)
    }

    pub fn day_of_year(&self) -> u16 {
        let first = Self::of_valid(self.year(), 1, 1);
        (self.epoch_day - first.epoch_day + 1) as u16
    }

    pub fn is_leap_year(&self) -> bool {
        gregorian::is_leap_year(self.year() as i64)
    }

    pub fn length_of_month(&self) -> u8 {
        let (year, month, _) = self.fields();
        gregorian::days_in_month(year as i64, month)
    }

    pub fn length_of_year(&self) -> u16 {
        gregorian::days_in_year(self.year() as i64)
    }

    /// Changes the year, clamping the day to the end of the month (so Feb 29 can become Feb 28).
    pub fn with_year(&self, year: i32) -> Result<Self> {
        check_year(year)?;
        let (_, month, day) = self.fields();
        Ok(Self::resolve_previous_valid(year, month, day))
    }

    /// Changes the month, clamping the day to the end of the new month.
    pub fn with_month(&self, month: u8) -> Result<Self> {
        Field::Month.check(month as i64)?;
        let (year, _, day) = self.fields();
        Ok(Self::resolve_previous_valid(year, month, day))
    }

    /// Unlike `with_year` and `with_month`, a day that doesn't exist in the month is an error.
    pub fn with_day(&self, day: u8) -> Result<Self> {
        let (year, month, _) = self.fields();
        Self::of(year, month, day)
    }

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        let (year, month, day) = self.fields();
        let year = (year as i64)
            .checked_add(years)
            .ok_or(Error::Overflow("LocalDate::plus_years"))?;
        let year = year_in_range(year, "LocalDate::plus_years")?;
        Ok(Self::resolve_previous_valid(year, month, day))
    }

    pub fn plus_months(&self, months: i64) -> Result<Self> {
        let (year, month, day) = self.fields();
        let month_count = year as i64 * MONTHS_PER_YEAR + (month as i64 - 1);
        let month_count = month_count
            .checked_add(months)
            .ok_or(Error::Overflow("LocalDate::plus_months"))?;
        let (year, month0) = month_count.floor_div_mod(MONTHS_PER_YEAR);
        let year = year_in_range(year, "LocalDate::plus_months")?;
        Ok(Self::resolve_previous_valid(year, month0 as u8 + 1, day))
    }

    pub fn plus_weeks(&self, weeks: i64) -> Result<Self> {
        let days = weeks
            .checked_mul(DAYS_PER_WEEK)
            .ok_or(Error::Overflow("LocalDate::plus_weeks"))?;
        self.plus_days(days)
    }

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        let epoch_day = self
            .epoch_day
            .checked_add(days)
            .ok_or(Error::Overflow("LocalDate::plus_days"))?;
        Self::of_epoch_day(epoch_day)
    }

    fn plus_days_unchecked(&self, days: i64) -> Self {
        LocalDate {
            epoch_day: self.epoch_day + days,
        }
    }

    /// Adds the years and months of the period as a single month count (clamping the day once),
    /// then the days.
    pub fn plus_period(&self, period: Period) -> Result<Self> {
        self.plus_months(period.to_total_months())?
            .plus_days(period.days() as i64)
    }

    pub fn minus_years(&self, years: i64) -> Result<Self> {
        self.plus_years(negate(years, "LocalDate::minus_years")?)
    }

    pub fn minus_months(&self, months: i64) -> Result<Self> {
        self.plus_months(negate(months, "LocalDate::minus_months")?)
    }

    pub fn minus_weeks(&self, weeks: i64) -> Result<Self> {
        self.plus_weeks(negate(weeks, "LocalDate::minus_weeks")?)
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        self.plus_days(negate(days, "LocalDate::minus_days")?)
    }

    pub fn minus_period(&self, period: Period) -> Result<Self> {
        self.plus_period(period.negated()?)
    }

    pub fn at_time(&self, time: LocalTime) -> LocalDateTime {
        LocalDateTime::new(*self, time)
    }

    pub fn is_before(&self, other: &LocalDate) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &LocalDate) -> bool {
        self > other
    }
}

fn check_year(year: i32) -> Result<()> {
    Field::Year.check(year as i64).map(|_| ())
}

fn year_in_range(year: i64, op: &'static str) -> Result<i32> {
    if (MIN_YEAR as i64..=MAX_YEAR as i64).contains(&year) {
        Ok(year as i32)
    } else {
        Err(Error::Overflow(op))
    }
}

pub(crate) fn negate(value: i64, op: &'static str) -> Result<i64> {
    value.checked_neg().ok_or(Error::Overflow(op))
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.fields();
        if year > 9999 {
            write!(f, "+{}", year)?;
        } else if year < 0 {
            write!(f, "-{:04}", -(year as i64))?;
        } else {
            write!(f, "{:04}", year)?;
        }
        write!(f, "-{:02}-{:02}", month, day)
    }
}
