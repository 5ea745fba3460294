use std::fmt;

use crate::clock::Clock;
use crate::div_rem::{narrow, FloorDivMod};
use crate::duration::Duration;
use crate::error::{Error, Result};
use crate::field::FieldLookup;
use crate::instant::Instant;
use crate::local_date::{DayOfWeek, LocalDate};
use crate::local_time::{
    LocalTime, HOURS_PER_DAY, MINUTES_PER_DAY, NANOS_PER_SECOND, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::period::Period;
use crate::time_zone::TimeZone;

/// A date-time without a time-zone, such as `2007-12-03T10:15:30`.
///
/// Ordered by date first, then by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime {
    date: LocalDate,
    time: LocalTime,
}

impl LocalDateTime {
    pub const MIN: LocalDateTime = LocalDateTime {
        date: LocalDate::MIN,
        time: LocalTime::MIN,
    };
    pub const MAX: LocalDateTime = LocalDateTime {
        date: LocalDate::MAX,
        time: LocalTime::MAX,
    };

    pub fn new(date: LocalDate, time: LocalTime) -> Self {
        LocalDateTime { date, time }
    }

    pub fn of(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nano: u32,
    ) -> Result<Self> {
        Ok(LocalDateTime {
            date: LocalDate::of(year, month, day)?,
            time: LocalTime::of(hour, minute, second, nano)?,
        })
    }

    /// The local date-time seen on a wall clock in `zone` at `instant`.
    pub fn of_instant(instant: Instant, zone: &(impl TimeZone + ?Sized)) -> Result<Self> {
        let local_second = instant.epoch_second() + zone.offset_at(instant) as i64;
        let (epoch_day, second_of_day) = local_second.floor_div_mod(SECONDS_PER_DAY);
        Ok(LocalDateTime {
            date: LocalDate::of_epoch_day(epoch_day)?,
            time: LocalTime::of_second_of_day(second_of_day, instant.nano())?,
        })
    }

    pub fn now(clock: &(impl Clock + ?Sized), zone: &(impl TimeZone + ?Sized)) -> Result<Self> {
        Self::of_instant(clock.now(), zone)
    }

    pub fn from_fields<L: FieldLookup + ?Sized>(fields: &L) -> Result<Self> {
        Ok(LocalDateTime {
            date: LocalDate::from_fields(fields)?,
            time: LocalTime::from_fields(fields)?,
        })
    }

    pub fn min_of<I: IntoIterator<Item = LocalDateTime>>(date_times: I) -> Result<Self> {
        date_times
            .into_iter()
            .min()
            .ok_or(Error::EmptyInput("LocalDateTime::min_of"))
    }

    pub fn max_of<I: IntoIterator<Item = LocalDateTime>>(date_times: I) -> Result<Self> {
        date_times
            .into_iter()
            .max()
            .ok_or(Error::EmptyInput("LocalDateTime::max_of"))
    }

    pub fn date(&self) -> LocalDate {
        self.date
    }

    pub fn time(&self) -> LocalTime {
        self.time
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u8 {
        self.date.month()
    }

    pub fn day(&self) -> u8 {
        self.date.day()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.date.day_of_week()
    }

    pub fn day_of_year(&self) -> u16 {
        self.date.day_of_year()
    }

    pub fn hour(&self) -> u8 {
        self.time.hour()
    }

    pub fn minute(&self) -> u8 {
        self.time.minute()
    }

    pub fn second(&self) -> u8 {
        self.time.second()
    }

    pub fn nano(&self) -> u32 {
        self.time.nano()
    }

    pub fn with_date(&self, date: LocalDate) -> Self {
        LocalDateTime { date, ..*self }
    }

    pub fn with_time(&self, time: LocalTime) -> Self {
        LocalDateTime { time, ..*self }
    }

    pub fn with_year(&self, year: i32) -> Result<Self> {
        Ok(self.with_date(self.date.with_year(year)?))
    }

    pub fn with_month(&self, month: u8) -> Result<Self> {
        Ok(self.with_date(self.date.with_month(month)?))
    }

    pub fn with_day(&self, day: u8) -> Result<Self> {
        Ok(self.with_date(self.date.with_day(day)?))
    }

    pub fn with_hour(&self, hour: u8) -> Result<Self> {
        Ok(self.with_time(self.time.with_hour(hour)?))
    }

    pub fn with_minute(&self, minute: u8) -> Result<Self> {
        Ok(self.with_time(self.time.with_minute(minute)?))
    }

    pub fn with_second(&self, second: u8) -> Result<Self> {
        Ok(self.with_time(self.time.with_second(second)?))
    }

    pub fn with_nano(&self, nano: u32) -> Result<Self> {
        Ok(self.with_time(self.time.with_nano(nano)?))
    }

    pub fn plus_period(&self, period: Period) -> Result<Self> {
        Ok(self.with_date(self.date.plus_period(period)?))
    }

    pub fn minus_period(&self, period: Period) -> Result<Self> {
        Ok(self.with_date(self.date.minus_period(period)?))
    }

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        Ok(self.with_date(self.date.plus_years(years)?))
    }

    pub fn plus_months(&self, months: i64) -> Result<Self> {
        Ok(self.with_date(self.date.plus_months(months)?))
    }

    pub fn plus_weeks(&self, weeks: i64) -> Result<Self> {
        Ok(self.with_date(self.date.plus_weeks(weeks)?))
    }

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        Ok(self.with_date(self.date.plus_days(days)?))
    }

    pub fn minus_years(&self, years: i64) -> Result<Self> {
        Ok(self.with_date(self.date.minus_years(years)?))
    }

    pub fn minus_months(&self, months: i64) -> Result<Self> {
        Ok(self.with_date(self.date.minus_months(months)?))
    }

    pub fn minus_weeks(&self, weeks: i64) -> Result<Self> {
        Ok(self.with_date(self.date.minus_weeks(weeks)?))
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        Ok(self.with_date(self.date.minus_days(days)?))
    }

    pub fn plus_duration(&self, duration: Duration) -> Result<Self> {
        self.plus_with_overflow(0, 0, duration.seconds(), duration.nanos() as i64, 1)
    }

    pub fn minus_duration(&self, duration: Duration) -> Result<Self> {
        self.plus_with_overflow(0, 0, duration.seconds(), duration.nanos() as i64, -1)
    }

    pub fn plus_hours(&self, hours: i64) -> Result<Self> {
        self.plus_with_overflow(hours, 0, 0, 0, 1)
    }

    pub fn plus_minutes(&self, minutes: i64) -> Result<Self> {
        self.plus_with_overflow(0, minutes, 0, 0, 1)
    }

    pub fn plus_seconds(&self, seconds: i64) -> Result<Self> {
        self.plus_with_overflow(0, 0, seconds, 0, 1)
    }

    pub fn plus_nanos(&self, nanos: i64) -> Result<Self> {
        self.plus_with_overflow(0, 0, 0, nanos, 1)
    }

    pub fn minus_hours(&self, hours: i64) -> Result<Self> {
        self.plus_with_overflow(hours, 0, 0, 0, -1)
    }

    pub fn minus_minutes(&self, minutes: i64) -> Result<Self> {
        self.plus_with_overflow(0, minutes, 0, 0, -1)
    }

    pub fn minus_seconds(&self, seconds: i64) -> Result<Self> {
        self.plus_with_overflow(0, 0, seconds, 0, -1)
    }

    pub fn minus_nanos(&self, nanos: i64) -> Result<Self> {
        self.plus_with_overflow(0, 0, 0, nanos, -1)
    }

    /// Adds (sign = 1) or subtracts (sign = -1) an amount of time, carrying whole days into the
    /// date. Each unit is split into whole days and an intra-day remainder before the sign is
    /// applied, so none of the intermediate values can exceed a few days' worth of seconds
    /// beyond the day counts. Everything is floored, which keeps the second-of-day and nano
    /// non-negative for negative amounts too.
    fn plus_with_overflow(
        &self,
        hours: i64,
        minutes: i64,
        seconds: i64,
        nanos: i64,
        sign: i64,
    ) -> Result<Self> {
        let (hours, minutes, seconds, nanos, sign) = (
            hours as i128,
            minutes as i128,
            seconds as i128,
            nanos as i128,
            sign as i128,
        );

        let (hour_days, hours) = hours.floor_div_mod(HOURS_PER_DAY as i128);
        let (minute_days, minutes) = minutes.floor_div_mod(MINUTES_PER_DAY as i128);
        let (second_days, seconds) = seconds.floor_div_mod(SECONDS_PER_DAY as i128);
        let mut total_days = (hour_days + minute_days + second_days) * sign;

        let current_second_of_day = self.time.to_second_of_day() as i128;
        let current_nano = self.time.nano() as i128;
        let mut total_seconds = (seconds
            + minutes * SECONDS_PER_MINUTE as i128
            + hours * SECONDS_PER_HOUR as i128)
            * sign
            + current_second_of_day;

        let total_nanos = nanos * sign + current_nano;
        let (carry_seconds, new_nano) = total_nanos.floor_div_mod(NANOS_PER_SECOND as i128);
        total_seconds += carry_seconds;

        let (carry_days, new_second_of_day) = total_seconds.floor_div_mod(SECONDS_PER_DAY as i128);
        total_days += carry_days;

        let time = if new_second_of_day == current_second_of_day && new_nano == current_nano {
            self.time
        } else {
            LocalTime::of_second_of_day(new_second_of_day as i64, new_nano as u32)?
        };
        let total_days = narrow(total_days, "LocalDateTime::plus_with_overflow")?;
        Ok(LocalDateTime {
            date: self.date.plus_days(total_days)?,
            time,
        })
    }

    /// Truncates the time, leaving the date as it is.
    pub fn truncated_to(&self, unit: Duration) -> Result<Self> {
        Ok(self.with_time(self.time.truncated_to(unit)?))
    }

    /// Rounds the time, leaving the date as it is. Rounding past 23:59 wraps to midnight of the
    /// same date.
    pub fn rounded_to(&self, unit: Duration) -> Result<Self> {
        Ok(self.with_time(self.time.rounded_to(unit)?))
    }

    /// Converts to epoch seconds by taking the zone's offset at the instant the date-time would
    /// be if it were UTC. Inside a transition this picks one of the candidate offsets rather
    /// than resolving the gap or overlap.
    pub fn to_epoch_second(&self, zone: &(impl TimeZone + ?Sized)) -> Result<i64> {
        let local_second =
            self.date.to_epoch_day() * SECONDS_PER_DAY + self.time.to_second_of_day();
        let approximation = Instant::of(local_second, self.time.nano() as i64)?;
        Ok(local_second - zone.offset_at(approximation) as i64)
    }

    pub fn to_instant(&self, zone: &(impl TimeZone + ?Sized)) -> Result<Instant> {
        Instant::of(self.to_epoch_second(zone)?, self.time.nano() as i64)
    }

    pub fn is_before(&self, other: &LocalDateTime) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &LocalDateTime) -> bool {
        self > other
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, ParsedFields};
    use crate::time_zone::TimeZoneOffset;

    fn dt(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nano: u32,
    ) -> LocalDateTime {
        LocalDateTime::of(year, month, day, hour, minute, second, nano).unwrap()
    }

    #[test]
    fn carry_across_midnight() {
        let t = dt(2020, 12, 31, 23, 59, 59, 999_999_999);
        assert_eq!(t.plus_nanos(1).unwrap(), dt(2021, 1, 1, 0, 0, 0, 0));
        assert_eq!(t.plus_seconds(1).unwrap(), dt(2021, 1, 1, 0, 0, 0, 999_999_999));
        assert_eq!(t.plus_hours(25).unwrap(), dt(2021, 1, 2, 0, 59, 59, 999_999_999));
        assert_eq!(
            dt(2021, 1, 1, 0, 0, 0, 0).minus_nanos(1).unwrap(),
            dt(2020, 12, 31, 23, 59, 59, 999_999_999)
        );
        assert_eq!(
            dt(2021, 1, 1, 0, 30, 0, 0).minus_minutes(31).unwrap(),
            dt(2020, 12, 31, 23, 59, 0, 0)
        );
        assert_eq!(
            dt(2021, 3, 1, 12, 0, 0, 0).minus_hours(24 * 365 + 13).unwrap(),
            dt(2020, 2, 29, 23, 0, 0, 0)
        );
    }

    #[test]
    fn negative_amounts() {
        let t = dt(2000, 1, 1, 0, 0, 0, 0);
        assert_eq!(t.plus_seconds(-1).unwrap(), dt(1999, 12, 31, 23, 59, 59, 0));
        assert_eq!(t.minus_seconds(-1).unwrap(), dt(2000, 1, 1, 0, 0, 1, 0));
        assert_eq!(
            t.plus_nanos(-1_000_000_001).unwrap(),
            dt(1999, 12, 31, 23, 59, 58, 999_999_999)
        );
        assert_eq!(t.plus_minutes(-1440).unwrap(), dt(1999, 12, 31, 0, 0, 0, 0));
    }

    #[test]
    fn extreme_amounts_overflow_instead_of_wrapping() {
        let t = dt(2000, 1, 1, 0, 0, 0, 0);
        assert_eq!(
            t.minus_hours(i64::MIN).map_err(|e| e.kind()),
            Err(crate::error::ErrorKind::Overflow)
        );
        assert!(t.plus_seconds(i64::MAX).is_err());
        assert!(t.minus_nanos(i64::MIN).is_ok());
        assert!(LocalDateTime::MAX.plus_nanos(1).is_err());
        assert!(LocalDateTime::MIN.minus_nanos(1).is_err());
    }

    #[test]
    fn time_is_kept_when_unchanged() {
        let t = dt(2000, 1, 1, 10, 0, 0, 5);
        assert_eq!(t.plus_hours(48).unwrap(), dt(2000, 1, 3, 10, 0, 0, 5));
        assert_eq!(t.minus_nanos(5).unwrap(), dt(2000, 1, 1, 10, 0, 0, 0));
    }

    #[test]
    fn plus_duration_carries_into_the_date() {
        let t = dt(2021, 6, 30, 23, 0, 0, 0);
        assert_eq!(t.plus_duration(Duration::of_hours(2)).unwrap(), dt(2021, 7, 1, 1, 0, 0, 0));
        assert_eq!(
            t.minus_duration(Duration::of_millis(-3_600_500)).unwrap(),
            dt(2021, 7, 1, 0, 0, 0, 500_000_000)
        );
        assert_eq!(
            dt(2021, 7, 1, 0, 0, 0, 0).minus_duration(Duration::of_nanos(1)).unwrap(),
            dt(2021, 6, 30, 23, 59, 59, 999_999_999)
        );
    }

    #[test]
    fn plus_months_clamps() {
        let t = dt(2020, 1, 31, 8, 0, 0, 0);
        assert_eq!(t.plus_months(1).unwrap(), dt(2020, 2, 29, 8, 0, 0, 0));
        assert_eq!(
            dt(2021, 1, 31, 8, 0, 0, 0).plus_months(1).unwrap(),
            dt(2021, 2, 28, 8, 0, 0, 0)
        );
        assert_eq!(
            t.plus_period(Period::of(1, 1, 1)).unwrap(),
            dt(2021, 3, 1, 8, 0, 0, 0)
        );
        assert_eq!(
            dt(2020, 2, 29, 0, 0, 0, 0).minus_years(1).unwrap(),
            dt(2019, 2, 28, 0, 0, 0, 0)
        );
    }

    #[test]
    fn instant_round_trip() {
        let t = dt(2007, 12, 3, 10, 15, 30, 0);
        assert_eq!(t.to_epoch_second(&TimeZoneOffset::UTC).unwrap(), 1_196_676_930);

        let paris = TimeZoneOffset::of_total_seconds(3600).unwrap();
        assert_eq!(t.to_epoch_second(&paris).unwrap(), 1_196_673_330);
        let instant = t.to_instant(&paris).unwrap();
        assert_eq!(LocalDateTime::of_instant(instant, &paris).unwrap(), t);

        let before_epoch = Instant::of(-1, 500).unwrap();
        assert_eq!(
            LocalDateTime::of_instant(before_epoch, &TimeZoneOffset::UTC).unwrap(),
            dt(1969, 12, 31, 23, 59, 59, 500)
        );
    }

    #[test]
    fn extremes_of_the_range() {
        assert_eq!(
            LocalDateTime::of_instant(Instant::MAX, &TimeZoneOffset::UTC).unwrap(),
            LocalDateTime::MAX
        );
        assert_eq!(
            LocalDateTime::MIN.to_instant(&TimeZoneOffset::UTC).unwrap(),
            Instant::MIN
        );
        let east = TimeZoneOffset::of_total_seconds(3600).unwrap();
        assert_eq!(
            LocalDateTime::of_instant(Instant::MAX, &east),
            Err(Error::Overflow("LocalDate::of_epoch_day"))
        );
    }

    #[test]
    fn truncate_and_round_keep_the_date() {
        let t = dt(2021, 12, 31, 23, 59, 45, 0);
        assert_eq!(
            t.truncated_to(Duration::of_minutes(1)).unwrap(),
            dt(2021, 12, 31, 23, 59, 0, 0)
        );
        assert_eq!(
            t.rounded_to(Duration::of_minutes(1)).unwrap(),
            dt(2021, 12, 31, 0, 0, 0, 0)
        );
    }

    #[test]
    fn ordering_and_display() {
        let a = dt(2021, 1, 1, 23, 0, 0, 0);
        let b = dt(2021, 1, 2, 1, 0, 0, 0);
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert_eq!(LocalDateTime::min_of([b, a]).unwrap(), a);
        assert_eq!(LocalDateTime::max_of([b, a]).unwrap(), b);
        assert!(LocalDateTime::min_of(Vec::new()).is_err());
        assert_eq!(a.to_string(), "2021-01-01T23:00");
        assert_eq!(dt(2007, 12, 3, 10, 15, 30, 0).to_string(), "2007-12-03T10:15:30");
    }

    #[test]
    fn from_fields() {
        let fields = ParsedFields::new()
            .with(Field::Year, "2007")
            .with(Field::Month, "12")
            .with(Field::Day, "03")
            .with(Field::Hour, "10")
            .with(Field::Minute, "15");
        assert_eq!(
            LocalDateTime::from_fields(&fields).unwrap(),
            dt(2007, 12, 3, 10, 15, 0, 0)
        );
    }

    #[test]
    fn with_fields() {
        let t = dt(2020, 2, 29, 10, 0, 0, 0);
        assert_eq!(t.with_year(2021).unwrap(), dt(2021, 2, 28, 10, 0, 0, 0));
        assert_eq!(t.with_minute(30).unwrap(), dt(2020, 2, 29, 10, 30, 0, 0));
        assert!(t.with_hour(24).is_err());
        assert!(t.with_day(30).is_err());
    }
}
