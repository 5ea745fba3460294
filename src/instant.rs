use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::clock::Clock;
use crate::div_rem::{narrow, FloorDivMod};
use crate::duration::Duration;
use crate::error::{Error, Result};
use crate::local_date::negate;
use crate::local_date_time::LocalDateTime;
use crate::local_time::NANOS_PER_SECOND;
use crate::time_zone::TimeZoneOffset;

/// Epoch second of -999999-01-01T00:00:00Z.
const MIN_EPOCH_SECOND: i64 = -31_619_087_683_200;
/// Epoch second of +999999-12-31T23:59:59Z.
const MAX_EPOCH_SECOND: i64 = 31_494_784_780_799;

/// A point on the time-line, as seconds and nanoseconds since 1970-01-01T00:00:00Z.
///
/// Seconds follow POSIX time, so every day is 86,400 seconds long and leap seconds don't
/// exist. The range is bounded by the years -999999 and +999999 at UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_second: i64,
    // 0..1_000_000_000, counted forwards from epoch_second even when it's negative.
    nano: u32,
}

impl Instant {
    pub const EPOCH: Instant = Instant {
        epoch_second: 0,
        nano: 0,
    };
    pub const MIN: Instant = Instant {
        epoch_second: MIN_EPOCH_SECOND,
        nano: 0,
    };
    pub const MAX: Instant = Instant {
        epoch_second: MAX_EPOCH_SECOND,
        nano: 999_999_999,
    };

    /// `nano_adjustment` may be negative or larger than a second; it's carried into the
    /// seconds before the range check.
    pub fn of(epoch_second: i64, nano_adjustment: i64) -> Result<Self> {
        let (carry, nano) = nano_adjustment.floor_div_mod(NANOS_PER_SECOND);
        let epoch_second = epoch_second
            .checked_add(carry)
            .ok_or(Error::Overflow("Instant::of"))?;
        Self::checked(epoch_second, nano as u32, "Instant::of")
    }

    pub fn of_epoch_millis(epoch_millis: i64) -> Result<Self> {
        let (seconds, millis) = epoch_millis.floor_div_mod(1000);
        Self::checked(seconds, millis as u32 * 1_000_000, "Instant::of_epoch_millis")
    }

    pub fn now(clock: &(impl Clock + ?Sized)) -> Self {
        clock.now()
    }

    pub fn min_of<I: IntoIterator<Item = Instant>>(instants: I) -> Result<Self> {
        instants
            .into_iter()
            .min()
            .ok_or(Error::EmptyInput("Instant::min_of"))
    }

    pub fn max_of<I: IntoIterator<Item = Instant>>(instants: I) -> Result<Self> {
        instants
            .into_iter()
            .max()
            .ok_or(Error::EmptyInput("Instant::max_of"))
    }

    fn checked(epoch_second: i64, nano: u32, op: &'static str) -> Result<Self> {
        if !(MIN_EPOCH_SECOND..=MAX_EPOCH_SECOND).contains(&epoch_second) {
            return Err(Error::Overflow(op));
        }
        Ok(Instant { epoch_second, nano })
    }

    fn from_epoch_nanos(nanos: i128, op: &'static str) -> Result<Self> {
        let (seconds, nano) = nanos.floor_div_mod(NANOS_PER_SECOND as i128);
        Self::checked(narrow(seconds, op)?, nano as u32, op)
    }

    pub fn epoch_second(&self) -> i64 {
        self.epoch_second
    }

    pub fn nano(&self) -> u32 {
        self.nano
    }

    pub fn to_epoch_nanos(&self) -> i128 {
        self.epoch_second as i128 * NANOS_PER_SECOND as i128 + self.nano as i128
    }

    /// Floored, so one nanosecond before the epoch is millisecond -1.
    pub fn to_epoch_millis(&self) -> i64 {
        // The instant range keeps this well inside i64.
        self.to_epoch_nanos().floor_div_mod(1_000_000).0 as i64
    }

    pub fn plus_seconds(&self, seconds: i64) -> Result<Self> {
        self.plus_nanos_i128(seconds as i128 * NANOS_PER_SECOND as i128, "Instant::plus_seconds")
    }

    pub fn plus_millis(&self, millis: i64) -> Result<Self> {
        self.plus_nanos_i128(millis as i128 * 1_000_000, "Instant::plus_millis")
    }

    pub fn plus_nanos(&self, nanos: i64) -> Result<Self> {
        self.plus_nanos_i128(nanos as i128, "Instant::plus_nanos")
    }

    pub fn plus_duration(&self, duration: Duration) -> Result<Self> {
        self.plus_nanos_i128(duration.to_nanos(), "Instant::plus_duration")
    }

    pub fn minus_seconds(&self, seconds: i64) -> Result<Self> {
        self.plus_nanos_i128(
            -(seconds as i128) * NANOS_PER_SECOND as i128,
            "Instant::minus_seconds",
        )
    }

    pub fn minus_millis(&self, millis: i64) -> Result<Self> {
        self.plus_nanos_i128(-(millis as i128) * 1_000_000, "Instant::minus_millis")
    }

    pub fn minus_nanos(&self, nanos: i64) -> Result<Self> {
        self.plus_nanos(negate(nanos, "Instant::minus_nanos")?)
    }

    pub fn minus_duration(&self, duration: Duration) -> Result<Self> {
        self.plus_nanos_i128(-duration.to_nanos(), "Instant::minus_duration")
    }

    fn plus_nanos_i128(&self, nanos: i128, op: &'static str) -> Result<Self> {
        Self::from_epoch_nanos(self.to_epoch_nanos() + nanos, op)
    }

    /// The duration from this instant until `end`.
    pub fn until(&self, end: Instant) -> Duration {
        Duration::between(*self, end)
    }

    pub fn is_before(&self, other: &Instant) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &Instant) -> bool {
        self > other
    }
}

impl TryFrom<SystemTime> for Instant {
    type Error = Error;

    fn try_from(time: SystemTime) -> Result<Self> {
        let nanos = match time.duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_nanos() as i128,
            Err(e) => -(e.duration().as_nanos() as i128),
        };
        Self::from_epoch_nanos(nanos, "Instant::try_from")
    }
}

impl From<Instant> for SystemTime {
    fn from(instant: Instant) -> Self {
        let offset = std::time::Duration::new(instant.epoch_second.unsigned_abs(), 0);
        let whole = if instant.epoch_second < 0 {
            UNIX_EPOCH - offset
        } else {
            UNIX_EPOCH + offset
        };
        whole + std::time::Duration::from_nanos(instant.nano as u64)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let utc = LocalDateTime::of_instant(*self, &TimeZoneOffset::UTC).map_err(|_| fmt::Error)?;
        write!(f, "{}Z", utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_carries_nanos() {
        let i = Instant::of(0, -1).unwrap();
        assert_eq!(i.epoch_second(), -1);
        assert_eq!(i.nano(), 999_999_999);
        assert_eq!(Instant::of(5, 2_000_000_001).unwrap(), Instant::of(7, 1).unwrap());
        assert_eq!(Instant::of_epoch_millis(-1).unwrap().to_epoch_millis(), -1);
        assert_eq!(Instant::of(-1, 999_999_999).unwrap().to_epoch_millis(), -1);
    }

    #[test]
    fn range() {
        assert!(Instant::of(MAX_EPOCH_SECOND, 999_999_999).is_ok());
        assert!(Instant::of(MAX_EPOCH_SECOND, 1_000_000_000).is_err());
        assert!(Instant::of(MIN_EPOCH_SECOND, 0).is_ok());
        assert_eq!(Instant::of(MIN_EPOCH_SECOND, -1), Err(Error::Overflow("Instant::of")));
        assert!(Instant::of(i64::MAX, 1_000_000_000).is_err());
        assert!(Instant::MAX.plus_nanos(1).is_err());
        assert!(Instant::MIN.minus_nanos(1).is_err());
        assert!(Instant::MIN.minus_nanos(i64::MIN).is_err());
        assert!(Instant::EPOCH.plus_seconds(i64::MAX).is_err());
    }

    #[test]
    fn arithmetic() {
        let i = Instant::of(10, 500_000_000).unwrap();
        assert_eq!(i.plus_millis(600).unwrap(), Instant::of(11, 100_000_000).unwrap());
        assert_eq!(i.minus_seconds(11).unwrap(), Instant::of(-1, 500_000_000).unwrap());
        assert_eq!(i.minus_nanos(500_000_001).unwrap(), Instant::of(9, 999_999_999).unwrap());
        assert_eq!(
            i.plus_duration(Duration::of_millis(-10_500)).unwrap(),
            Instant::EPOCH
        );
        assert_eq!(i.minus_duration(Duration::of_hours(1)).unwrap().epoch_second(), -3590);
        assert_eq!(Instant::EPOCH.until(i), Duration::of_millis(10_500));
        assert!(Instant::EPOCH.is_before(&i));
        assert!(i.is_after(&Instant::EPOCH));
        assert!(!i.is_after(&i));
    }

    #[test]
    fn min_max_of() {
        let a = Instant::of(1, 0).unwrap();
        let b = Instant::of(-1, 0).unwrap();
        assert_eq!(Instant::min_of([a, b, Instant::EPOCH]).unwrap(), b);
        assert_eq!(Instant::max_of([a, b, Instant::EPOCH]).unwrap(), a);
        assert_eq!(
            Instant::max_of(Vec::new()),
            Err(Error::EmptyInput("Instant::max_of"))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Instant::EPOCH.to_string(), "1970-01-01T00:00Z");
        assert_eq!(
            Instant::of(1_196_676_930, 0).unwrap().to_string(),
            "2007-12-03T10:15:30Z"
        );
        assert_eq!(Instant::of(-1, 0).unwrap().to_string(), "1969-12-31T23:59:59Z");
        assert_eq!(Instant::MIN.to_string(), "-999999-01-01T00:00Z");
        assert_eq!(Instant::MAX.to_string(), "+999999-12-31T23:59:59.999999999Z");
    }

    #[test]
    fn system_time() {
        let i = Instant::of(1_196_676_930, 5).unwrap();
        let time: SystemTime = i.into();
        assert_eq!(Instant::try_from(time).unwrap(), i);

        let before = Instant::of(-10, 250_000_000).unwrap();
        let time: SystemTime = before.into();
        assert_eq!(Instant::try_from(time).unwrap(), before);
    }
}
