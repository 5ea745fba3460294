// A Duration tracks actual time elapsed, whereas a Period counts calendar slots like
// "5 months". One is how far the car has traveled, the other is how many houses it passed on
// the way. Adding one month to January 31 and to February 1 moves the date by a different
// number of days, so a Period can't be converted to a Duration without knowing where it starts.

use std::fmt;

use crate::error::{Error, Result};
use crate::local_date::{DAYS_PER_WEEK, MONTHS_PER_YEAR};

/// A date-based amount of time such as "2 years, 3 months and 4 days". The fields are kept as
/// given; `P1Y` and `P12M` are distinct periods until normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

impl Period {
    pub const ZERO: Period = Period {
        years: 0,
        months: 0,
        days: 0,
    };

    pub fn of(years: i32, months: i32, days: i32) -> Self {
        Period {
            years,
            months,
            days,
        }
    }

    pub fn of_years(years: i32) -> Self {
        Self::of(years, 0, 0)
    }

    pub fn of_months(months: i32) -> Self {
        Self::of(0, months, 0)
    }

    pub fn of_weeks(weeks: i32) -> Result<Self> {
        let days = weeks
            .checked_mul(DAYS_PER_WEEK as i32)
            .ok_or(Error::Overflow("Period::of_weeks"))?;
        Ok(Self::of(0, 0, days))
    }

    pub fn of_days(days: i32) -> Self {
        Self::of(0, 0, days)
    }

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    pub fn with_years(&self, years: i32) -> Self {
        Period { years, ..*self }
    }

    pub fn with_months(&self, months: i32) -> Self {
        Period { months, ..*self }
    }

    pub fn with_days(&self, days: i32) -> Self {
        Period { days, ..*self }
    }

    pub fn plus_years(&self, years: i32) -> Result<Self> {
        let years = self
            .years
            .checked_add(years)
            .ok_or(Error::Overflow("Period::plus_years"))?;
        Ok(self.with_years(years))
    }

    pub fn plus_months(&self, months: i32) -> Result<Self> {
        let months = self
            .months
            .checked_add(months)
            .ok_or(Error::Overflow("Period::plus_months"))?;
        Ok(self.with_months(months))
    }

    pub fn plus_days(&self, days: i32) -> Result<Self> {
        let days = self
            .days
            .checked_add(days)
            .ok_or(Error::Overflow("Period::plus_days"))?;
        Ok(self.with_days(days))
    }

    pub fn plus(&self, other: Period) -> Result<Self> {
        self.plus_years(other.years)?
            .plus_months(other.months)?
            .plus_days(other.days)
    }

    pub fn negated(&self) -> Result<Self> {
        let negate = |value: i32| value.checked_neg().ok_or(Error::Overflow("Period::negated"));
        Ok(Period {
            years: negate(self.years)?,
            months: negate(self.months)?,
            days: negate(self.days)?,
        })
    }

    /// Years and months as a single month count.
    pub fn to_total_months(&self) -> i64 {
        self.years as i64 * MONTHS_PER_YEAR + self.months as i64
    }

    /// Moves whole years out of the months field so that the months end up in -11..=11 with
    /// the same sign as the years. Days are left alone since months have no fixed length.
    pub fn normalized(&self) -> Result<Self> {
        let total = self.to_total_months();
        let years = i32::try_from(total / MONTHS_PER_YEAR)
            .map_err(|_| Error::Overflow("Period::normalized"))?;
        Ok(Period {
            years,
            months: (total % MONTHS_PER_YEAR) as i32,
            days: self.days,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}
