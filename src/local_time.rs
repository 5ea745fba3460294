use std::fmt;

use crate::clock::Clock;
use crate::div_rem::FloorDivMod;
use crate::duration::Duration;
use crate::error::{Error, Result};
use crate::field::{self, Field, FieldLookup};
use crate::local_date_time::LocalDateTime;
use crate::time_zone::TimeZone;

pub const HOURS_PER_DAY: i64 = 24;
pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = MINUTES_PER_HOUR * HOURS_PER_DAY;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;
pub const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * HOURS_PER_DAY;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = NANOS_PER_SECOND * SECONDS_PER_MINUTE;
pub const NANOS_PER_HOUR: i64 = NANOS_PER_SECOND * SECONDS_PER_HOUR;
pub const NANOS_PER_DAY: i64 = NANOS_PER_SECOND * SECONDS_PER_DAY;

/// A time without a time-zone, such as `10:15:30`, stored as nanoseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime {
    nano_of_day: i64,
}

impl LocalTime {
    pub const MIN: LocalTime = LocalTime { nano_of_day: 0 };
    pub const MIDNIGHT: LocalTime = LocalTime::MIN;
    pub const NOON: LocalTime = LocalTime {
        nano_of_day: 12 * NANOS_PER_HOUR,
    };
    pub const MAX: LocalTime = LocalTime {
        nano_of_day: NANOS_PER_DAY - 1,
    };

    pub fn of(hour: u8, minute: u8, second: u8, nano: u32) -> Result<Self> {
        let hour = Field::Hour.check(hour as i64)?;
        let minute = Field::Minute.check(minute as i64)?;
        let second = Field::Second.check(second as i64)?;
        let nano = Field::Nano.check(nano as i64)?;
        Ok(LocalTime {
            nano_of_day: hour * NANOS_PER_HOUR
                + minute * NANOS_PER_MINUTE
                + second * NANOS_PER_SECOND
                + nano,
        })
    }

    pub fn of_second_of_day(second_of_day: i64, nano: u32) -> Result<Self> {
        if !(0..SECONDS_PER_DAY).contains(&second_of_day) {
            return Err(Error::FieldOutOfRange {
                field: Field::Second,
                value: second_of_day,
                min: 0,
                max: SECONDS_PER_DAY - 1,
            });
        }
        let nano = Field::Nano.check(nano as i64)?;
        Ok(LocalTime {
            nano_of_day: second_of_day * NANOS_PER_SECOND + nano,
        })
    }

    pub fn of_nano_of_day(nano_of_day: i64) -> Result<Self> {
        if !(0..NANOS_PER_DAY).contains(&nano_of_day) {
            return Err(Error::FieldOutOfRange {
                field: Field::Nano,
                value: nano_of_day,
                min: 0,
                max: NANOS_PER_DAY - 1,
            });
        }
        Ok(LocalTime { nano_of_day })
    }

    /// Hour and minute are required; second and the fraction of second default to zero.
    pub fn from_fields<L: FieldLookup + ?Sized>(fields: &L) -> Result<Self> {
        let hour = Field::Hour.check(field::required_int(fields, Field::Hour)?)?;
        let minute = Field::Minute.check(field::required_int(fields, Field::Minute)?)?;
        let second = Field::Second.check(field::optional_int(fields, Field::Second)?)?;
        let nano = field::optional_fraction(fields)?;
        Self::of(hour as u8, minute as u8, second as u8, nano as u32)
    }

    pub fn now(clock: &(impl Clock + ?Sized), zone: &(impl TimeZone + ?Sized)) -> Result<Self> {
        Ok(LocalDateTime::now(clock, zone)?.time())
    }

    pub fn min_of<I: IntoIterator<Item = LocalTime>>(times: I) -> Result<Self> {
        times
            .into_iter()
            .min()
            .ok_or(Error::EmptyInput("LocalTime::min_of"))
    }

    pub fn max_of<I: IntoIterator<Item = LocalTime>>(times: I) -> Result<Self> {
        times
            .into_iter()
            .max()
            .ok_or(Error::EmptyInput("LocalTime::max_of"))
    }

    pub fn hour(&self) -> u8 {
        (self.nano_of_day / NANOS_PER_HOUR) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.nano_of_day / NANOS_PER_MINUTE % MINUTES_PER_HOUR) as u8
    }

    pub fn second(&self) -> u8 {
        (self.nano_of_day / NANOS_PER_SECOND % SECONDS_PER_MINUTE) as u8
    }

    pub fn nano(&self) -> u32 {
        (self.nano_of_day % NANOS_PER_SECOND) as u32
    }

    pub fn to_second_of_day(&self) -> i64 {
        self.nano_of_day / NANOS_PER_SECOND
    }

    pub fn to_nano_of_day(&self) -> i64 {
        self.nano_of_day
    }

    pub fn with_hour(&self, hour: u8) -> Result<Self> {
        Self::of(hour, self.minute(), self.second(), self.nano())
    }

    pub fn with_minute(&self, minute: u8) -> Result<Self> {
        Self::of(self.hour(), minute, self.second(), self.nano())
    }

    pub fn with_second(&self, second: u8) -> Result<Self> {
        Self::of(self.hour(), self.minute(), second, self.nano())
    }

    pub fn with_nano(&self, nano: u32) -> Result<Self> {
        Self::of(self.hour(), self.minute(), self.second(), nano)
    }

    // The plus/minus operations below wrap around midnight and never fail; the number of days
    // crossed is discarded. LocalDateTime keeps track of it instead.

    pub fn plus_hours(&self, hours: i64) -> Self {
        self.plus_wrapping(hours.floor_div_mod(HOURS_PER_DAY).1 * NANOS_PER_HOUR)
    }

    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus_wrapping(minutes.floor_div_mod(MINUTES_PER_DAY).1 * NANOS_PER_MINUTE)
    }

    pub fn plus_seconds(&self, seconds: i64) -> Self {
        self.plus_wrapping(seconds.floor_div_mod(SECONDS_PER_DAY).1 * NANOS_PER_SECOND)
    }

    pub fn plus_nanos(&self, nanos: i64) -> Self {
        self.plus_wrapping(nanos.floor_div_mod(NANOS_PER_DAY).1)
    }

    pub fn plus_duration(&self, duration: Duration) -> Self {
        self.plus_seconds(duration.seconds())
            .plus_nanos(duration.nanos() as i64)
    }

    pub fn minus_hours(&self, hours: i64) -> Self {
        self.plus_wrapping(-(hours.floor_div_mod(HOURS_PER_DAY).1 * NANOS_PER_HOUR))
    }

    pub fn minus_minutes(&self, minutes: i64) -> Self {
        self.plus_wrapping(-(minutes.floor_div_mod(MINUTES_PER_DAY).1 * NANOS_PER_MINUTE))
    }

    pub fn minus_seconds(&self, seconds: i64) -> Self {
        self.plus_wrapping(-(seconds.floor_div_mod(SECONDS_PER_DAY).1 * NANOS_PER_SECOND))
    }

    pub fn minus_nanos(&self, nanos: i64) -> Self {
        self.plus_wrapping(-nanos.floor_div_mod(NANOS_PER_DAY).1)
    }

    pub fn minus_duration(&self, duration: Duration) -> Self {
        self.minus_seconds(duration.seconds())
            .minus_nanos(duration.nanos() as i64)
    }

    /// `nanos` must be within one day either way.
    fn plus_wrapping(&self, nanos: i64) -> Self {
        let (_, nano_of_day) = (self.nano_of_day + nanos).floor_div_mod(NANOS_PER_DAY);
        LocalTime { nano_of_day }
    }

    /// Truncates to a multiple of `unit` since midnight. The unit must be positive, no longer
    /// than a day and divide a day evenly.
    pub fn truncated_to(&self, unit: Duration) -> Result<Self> {
        let unit = unit_nanos(unit)?;
        Ok(LocalTime {
            nano_of_day: self.nano_of_day / unit * unit,
        })
    }

    /// Rounds half-up to the nearest multiple of `unit` since midnight, wrapping past the end
    /// of the day to midnight.
    pub fn rounded_to(&self, unit: Duration) -> Result<Self> {
        let unit = unit_nanos(unit)?;
        let (quotient, remainder) = self.nano_of_day.floor_div_mod(unit);
        let rounded = if remainder * 2 >= unit {
            (quotient + 1) * unit
        } else {
            quotient * unit
        };
        Ok(LocalTime {
            nano_of_day: rounded % NANOS_PER_DAY,
        })
    }

    pub fn is_before(&self, other: &LocalTime) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &LocalTime) -> bool {
        self > other
    }
}

fn unit_nanos(unit: Duration) -> Result<i64> {
    let nanos = unit.to_nanos();
    if nanos <= 0 || nanos > NANOS_PER_DAY as i128 || NANOS_PER_DAY as i128 % nanos != 0 {
        let value = i64::try_from(nanos).unwrap_or(if nanos < 0 { i64::MIN } else { i64::MAX });
        return Err(Error::FieldOutOfRange {
            field: Field::RoundingUnit,
            value,
            min: 1,
            max: NANOS_PER_DAY,
        });
    }
    Ok(nanos as i64)
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())?;
        let (second, nano) = (self.second(), self.nano());
        if second != 0 || nano != 0 {
            write!(f, ":{:02}", second)?;
            if nano != 0 {
                let fraction = format!("{:09}", nano);
                write!(f, ".{}", fraction.trim_end_matches('0'))?;
            }
        }
        Ok(())
    }
}
