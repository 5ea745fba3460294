use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::div_rem::{narrow, FloorDivMod};
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::local_time::{NANOS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// An exact amount of time, as whole seconds plus a nanosecond adjustment.
///
/// The nanoseconds are always in `0..1_000_000_000` and carry the sign of the seconds by
/// flooring, so -0.5s is stored as `{ seconds: -1, nanos: 500_000_000 }`. That makes the derived
/// ordering the numeric one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        seconds: 0,
        nanos: 0,
    };

    /// # Panics
    ///
    /// If `days` doesn't fit in `i64` seconds. The same goes for the other fixed-unit
    /// constructors, as with [`std::time::Duration::new`].
    pub fn of_days(days: i64) -> Self {
        Self::of_unit(days, SECONDS_PER_DAY, "Duration::of_days")
    }

    pub fn of_hours(hours: i64) -> Self {
        Self::of_unit(hours, SECONDS_PER_HOUR, "Duration::of_hours")
    }

    pub fn of_minutes(minutes: i64) -> Self {
        Self::of_unit(minutes, SECONDS_PER_MINUTE, "Duration::of_minutes")
    }

    /// `nano_adjustment` may be any value, including negative; it's carried into the seconds.
    ///
    /// # Panics
    ///
    /// If the carry takes the seconds out of `i64`.
    pub fn of_seconds(seconds: i64, nano_adjustment: i64) -> Self {
        let (carry, nanos) = nano_adjustment.floor_div_mod(NANOS_PER_SECOND);
        match seconds.checked_add(carry) {
            Some(seconds) => Duration {
                seconds,
                nanos: nanos as u32,
            },
            None => overflow("Duration::of_seconds"),
        }
    }

    fn of_unit(count: i64, seconds_per_unit: i64, op: &'static str) -> Self {
        match count.checked_mul(seconds_per_unit) {
            Some(seconds) => Self::of_seconds(seconds, 0),
            None => overflow(op),
        }
    }

    pub fn of_millis(millis: i64) -> Self {
        let (seconds, millis) = millis.floor_div_mod(1000);
        Duration {
            seconds,
            nanos: millis as u32 * 1_000_000,
        }
    }

    pub fn of_nanos(nanos: i64) -> Self {
        Self::of_seconds(0, nanos)
    }

    /// The duration from `start` to `end`, negative if `end` comes first.
    pub fn between(start: Instant, end: Instant) -> Self {
        // The instant range is far narrower than i64 seconds, so this can't fail.
        let nanos = end.to_epoch_nanos() - start.to_epoch_nanos();
        let (seconds, nanos) = nanos.floor_div_mod(NANOS_PER_SECOND as i128);
        Duration {
            seconds: seconds as i64,
            nanos: nanos as u32,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    pub fn to_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    /// Truncated towards negative infinity.
    pub fn to_millis(&self) -> i128 {
        self.to_nanos().floor_div_mod(1_000_000).0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    pub fn is_positive(&self) -> bool {
        !self.is_negative() && !self.is_zero()
    }

    pub fn negated(&self) -> Result<Self> {
        Self::from_nanos_i128(-self.to_nanos(), "Duration::negated")
    }

    pub fn abs(&self) -> Result<Self> {
        if self.is_negative() {
            self.negated()
        } else {
            Ok(*self)
        }
    }

    pub fn checked_add(&self, other: Duration) -> Result<Self> {
        Self::from_nanos_i128(self.to_nanos() + other.to_nanos(), "Duration::checked_add")
    }

    pub fn checked_sub(&self, other: Duration) -> Result<Self> {
        Self::from_nanos_i128(self.to_nanos() - other.to_nanos(), "Duration::checked_sub")
    }

    pub fn plus_seconds(&self, seconds: i64) -> Result<Self> {
        self.checked_add(Self::of_seconds(seconds, 0))
    }

    pub fn plus_nanos(&self, nanos: i64) -> Result<Self> {
        self.checked_add(Self::of_nanos(nanos))
    }

    fn from_nanos_i128(nanos: i128, op: &'static str) -> Result<Self> {
        let (seconds, nanos) = nanos.floor_div_mod(NANOS_PER_SECOND as i128);
        Ok(Duration {
            seconds: narrow(seconds, op)?,
            nanos: nanos as u32,
        })
    }
}

fn overflow(op: &'static str) -> ! {
    panic!("{}", Error::Overflow(op))
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        match self.checked_add(rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        match self.checked_sub(rhs) {
            Ok(difference) => difference,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        match self.negated() {
            Ok(negated) => negated,
            Err(e) => panic!("{}", e),
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        let total = self.to_nanos();
        let negative = total < 0;
        let magnitude = total.unsigned_abs();
        let nanos_per_second = NANOS_PER_SECOND as u128;
        let nanos = magnitude % nanos_per_second;
        let seconds = magnitude / nanos_per_second;
        let hours = seconds / SECONDS_PER_HOUR as u128;
        let minutes = seconds / SECONDS_PER_MINUTE as u128 % 60;
        let seconds = seconds % 60;
        let sign = if negative { "-" } else { "" };

        f.write_str("PT")?;
        if hours != 0 {
            write!(f, "{}{}H", sign, hours)?;
        }
        if minutes != 0 {
            write!(f, "{}{}M", sign, minutes)?;
        }
        if seconds != 0 || nanos != 0 {
            write!(f, "{}{}", sign, seconds)?;
            if nanos != 0 {
                let fraction = format!("{:09}", nanos);
                write!(f, ".{}", fraction.trim_end_matches('0'))?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl From<Duration> for std::time::Duration {
    /// Negative durations saturate to zero.
    fn from(duration: Duration) -> Self {
        if duration.is_negative() {
            std::time::Duration::ZERO
        } else {
            std::time::Duration::new(duration.seconds as u64, duration.nanos)
        }
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = Error;

    fn try_from(duration: std::time::Duration) -> Result<Self> {
        let seconds = i64::try_from(duration.as_secs())
            .map_err(|_| Error::Overflow("Duration::try_from"))?;
        Ok(Duration {
            seconds,
            nanos: duration.subsec_nanos(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_by_flooring() {
        let d = Duration::of_seconds(0, -1);
        assert_eq!(d.seconds(), -1);
        assert_eq!(d.nanos(), 999_999_999);
        assert_eq!(Duration::of_seconds(3, 1_500_000_000), Duration::of_seconds(4, 500_000_000));
        assert_eq!(Duration::of_millis(-1500), Duration::of_seconds(-2, 500_000_000));
        assert_eq!(Duration::of_nanos(-1).to_nanos(), -1);
        assert_eq!(Duration::of_millis(-1).to_millis(), -1);
        assert!(Duration::of_nanos(-1) < Duration::ZERO);
        assert!(Duration::of_nanos(1) > Duration::ZERO);
    }

    #[test]
    fn signs() {
        assert!(Duration::of_nanos(-1).is_negative());
        assert!(!Duration::of_nanos(-1).is_positive());
        assert!(Duration::of_nanos(1).is_positive());
        assert!(!Duration::ZERO.is_positive());
        assert!(!Duration::ZERO.is_negative());
        assert_eq!(Duration::of_millis(-1500).abs().unwrap(), Duration::of_millis(1500));
        assert_eq!(-Duration::of_hours(2), Duration::of_minutes(-120));
    }

    #[test]
    fn arithmetic() {
        let d = Duration::of_seconds(1, 600_000_000) + Duration::of_millis(500);
        assert_eq!(d, Duration::of_seconds(2, 100_000_000));
        assert_eq!(d - Duration::of_days(1), Duration::of_seconds(-86_398, 100_000_000));
        assert_eq!(Duration::ZERO.plus_nanos(-5).unwrap().to_nanos(), -5);
        assert_eq!(Duration::ZERO.plus_seconds(60).unwrap(), Duration::of_minutes(1));
        assert!(Duration::of_seconds(i64::MAX, 0)
            .checked_add(Duration::of_seconds(1, 0))
            .is_err());
        assert!(Duration::of_seconds(i64::MIN, 0).negated().is_err());
    }

    #[test]
    fn between_instants() {
        let a = Instant::of(10, 0).unwrap();
        let b = Instant::of(12, 500_000_000).unwrap();
        assert_eq!(Duration::between(a, b), Duration::of_millis(2500));
        assert_eq!(Duration::between(b, a), Duration::of_millis(-2500));
        assert_eq!(
            Duration::between(Instant::MIN, Instant::MAX).to_nanos(),
            Instant::MAX.to_epoch_nanos() - Instant::MIN.to_epoch_nanos()
        );
    }

    #[test]
    fn display() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::of_seconds(3723, 0).to_string(), "PT1H2M3S");
        assert_eq!(Duration::of_hours(25).to_string(), "PT25H");
        assert_eq!(Duration::of_millis(1500).to_string(), "PT1.5S");
        assert_eq!(Duration::of_millis(-1500).to_string(), "PT-1.5S");
        assert_eq!(Duration::of_minutes(-61).to_string(), "PT-1H-1M");
        assert_eq!(Duration::of_nanos(1).to_string(), "PT0.000000001S");
    }

    #[test]
    fn std_conversion() {
        let std_duration: std::time::Duration = Duration::of_millis(1500).into();
        assert_eq!(std_duration, std::time::Duration::from_millis(1500));
        let std_duration: std::time::Duration = Duration::of_millis(-1).into();
        assert_eq!(std_duration, std::time::Duration::ZERO);
        assert_eq!(
            Duration::try_from(std::time::Duration::from_nanos(2_000_000_001)).unwrap(),
            Duration::of_seconds(2, 1)
        );
    }

    #[test]
    fn constructors_at_the_edge() {
        assert_eq!(Duration::of_seconds(i64::MAX, 999_999_999).seconds(), i64::MAX);
        let min = Duration::of_seconds(i64::MIN + 1, -1);
        assert_eq!((min.seconds(), min.nanos()), (i64::MIN, 999_999_999));
        assert_eq!(Duration::of_days(i64::MAX / SECONDS_PER_DAY).nanos(), 0);
    }

    #[test]
    #[should_panic(expected = "Duration::of_seconds overflowed")]
    fn nano_carry_past_max_seconds() {
        Duration::of_seconds(i64::MAX, 1_000_000_000);
    }

    #[test]
    #[should_panic(expected = "Duration::of_seconds overflowed")]
    fn nano_carry_past_min_seconds() {
        Duration::of_seconds(i64::MIN, -1);
    }

    #[test]
    #[should_panic(expected = "Duration::of_days overflowed")]
    fn too_many_days() {
        Duration::of_days(i64::MAX / SECONDS_PER_DAY + 1);
    }

    #[test]
    #[should_panic(expected = "Duration::of_hours overflowed")]
    fn too_many_hours() {
        Duration::of_hours(i64::MIN);
    }
}
