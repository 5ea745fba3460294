// The gregorian calendar works in cycles of 400 years. Each cycle starts with a leap year.
// From then every 4th year is a leap year, except for every 100th year. So the year
// 1600 is a leap year but 1700, 1800 and 1900 are not. This means that each cycle
// has 100-3=97 leap years and 303 normal years. 97*366 + 303*365 = 146097 days.
//
// Epoch days count from 1970-01-01, which is not aligned with a cycle. Having the leap day
// somewhere in the middle of a year also makes the decomposition awkward. So we shift the
// zero point to 2000-03-01, right after the last leap day of the preceding cycle, and let
// every "year" run from March 1 to the end of February:
// - 2000-03-01 to 2001-02-28
// - 2001-03-01 to 2002-02-28
// - 2002-03-01 to 2003-02-28
// - 2003-03-01 to 2004-02-29
//
// The leap day is then always the last day of a year, the leap year is always the last year of
// a quadrennium and the leap century is always the last century of a cycle. Each of those
// extra days just falls out as an "overflow" of the last period, which clamped_div_rem
// absorbs without any further branching.

use num_integer::Integer;

use crate::div_rem::{ClampedDivRem, FloorDivMod};

const CYCLE_DAYS: i64 = 97 * 366 + 303 * 365;
const CENTURY_DAYS: u32 = 24 * 366 + 76 * 365;
#[allow(clippy::identity_op)]
const QUADRENNIUM_DAYS: u16 = 3 * 365 + 1 * 366;
const YEAR_DAYS: u16 = 365;
const CYCLE_YEARS: i64 = 400;
const CENTURY_YEARS: u16 = 100;
const QUADRENNIUM_YEARS: u16 = 4;

/// Days from 1970-01-01 to 2000-03-01.
const ZERO_POINT_EPOCH_DAY: i64 = 11_017;
const ZERO_POINT_YEAR: i64 = 2000;

/// Day offsets of each month within a March-based year. Index 0 = March. The sentinel keeps
/// `month_from_day_offset` in bounds for February 29 (offset 365).
const MONTH_STARTS: [u16; 13] = [
    0, 31, 61, 92, 122, 153, 184, 214, 245, 275, 306, 337,
    u16::MAX,
];

fn month_from_day_offset(day: u16) -> u8 {
    let mut month = (day / 30) as u8;
    if day < MONTH_STARTS[month as usize] {
        // Overshot; every month is at least 30 days long so we're off by one at most.
        month -= 1;
    }
    month
}

/// A day decomposed into the March-based 400-year cycle structure described above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CycleDate {
    /// 400-year cycles since 2000-03-01.
    cycle: i64,
    /// Centuries into the cycle (0-3).
    century: u8,
    /// Quadrennia into the century (0-24).
    quadrennium: u8,
    /// Years into the quadrennium (0-3).
    year: u8,
    /// Days into the March-based year (0-365).
    day: u16,
}

impl CycleDate {
    pub(crate) fn from_epoch_day(epoch_day: i64) -> Self {
        let (cycle, days_into_cycle) = (epoch_day - ZERO_POINT_EPOCH_DAY).floor_div_mod(CYCLE_DAYS);
        let days_into_cycle = days_into_cycle as u32; // < 2^18

        // The first three centuries lack the leap day of their last quadrennium; the fourth
        // keeps it and so is one day longer.
        let (century, days_into_century) = days_into_cycle.clamped_div_rem(CENTURY_DAYS, 3_u8);
        let days_into_century = days_into_century as u16; // < 2^16

        // A short century only shortens its last quadrennium, so a plain division is enough.
        let (quadrennium, days_into_quadrennium) = days_into_century.div_rem(&QUADRENNIUM_DAYS);

        let (year, day) = days_into_quadrennium.clamped_div_rem(YEAR_DAYS, 3_u8);

        CycleDate {
            cycle,
            century,
            quadrennium: quadrennium as u8,
            year,
            day,
        }
    }

    pub(crate) fn to_epoch_day(self) -> i64 {
        self.cycle * CYCLE_DAYS
            + self.century as i64 * CENTURY_DAYS as i64
            + self.quadrennium as i64 * QUADRENNIUM_DAYS as i64
            + self.year as i64 * YEAR_DAYS as i64
            + self.day as i64
            + ZERO_POINT_EPOCH_DAY
    }

    /// `month` must be 1-12 and `day` 1-31; whether the day exists in the month is the
    /// caller's business.
    pub(crate) fn from_date(year: i64, month: u8, day: u8) -> Self {
        debug_assert!((1..=12).contains(&month));
        debug_assert!((1..=31).contains(&day));

        // January and February belong to the previous March-based year.
        let (year, month) = if month <= 2 {
            (year - 1, month + 9)
        } else {
            (year, month - 3)
        };

        let (cycle, years_into_cycle) = (year - ZERO_POINT_YEAR).floor_div_mod(CYCLE_YEARS);
        let years_into_cycle = years_into_cycle as u16;
        let (century, years_into_century) = years_into_cycle.div_rem(&CENTURY_YEARS);
        let (quadrennium, years_into_quadrennium) =
            years_into_century.div_rem(&QUADRENNIUM_YEARS);

        CycleDate {
            cycle,
            century: century as u8,
            quadrennium: quadrennium as u8,
            year: years_into_quadrennium as u8,
            day: MONTH_STARTS[month as usize] + day as u16 - 1,
        }
    }

    pub(crate) fn to_date(self) -> (i64, u8, u8) {
        let mut year = ZERO_POINT_YEAR
            + CYCLE_YEARS * self.cycle
            + CENTURY_YEARS as i64 * self.century as i64
            + QUADRENNIUM_YEARS as i64 * self.quadrennium as i64
            + self.year as i64;

        let month = month_from_day_offset(self.day);
        let day = (self.day - MONTH_STARTS[month as usize]) as u8;

        // Back to January-based months.
        let mut month = month + 3;
        if month > 12 {
            month -= 12;
            year += 1;
        }
        (year, month, day + 1)
    }
}

pub(crate) fn is_leap_year(year: i64) -> bool {
    year.is_multiple_of(&4) && (!year.is_multiple_of(&100) || year.is_multiple_of(&400))
}

pub(crate) fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub(crate) fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}
