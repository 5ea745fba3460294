use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::field::{self, Field, FieldLookup};
use crate::instant::Instant;
use crate::local_time::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::zoneinfo::{ZoneDatabase, ZoneRules};

/// Anything that can tell the offset from UTC in effect at a given instant.
pub trait TimeZone {
    /// Seconds east of UTC in effect at `instant`.
    fn offset_at(&self, instant: Instant) -> i32;

    fn id(&self) -> String;

    /// The value of the POSIX `TZ` environment variable naming this zone to the C library.
    fn to_native(&self) -> String;
}

impl<Z: TimeZone + ?Sized> TimeZone for &Z {
    fn offset_at(&self, instant: Instant) -> i32 {
        (**self).offset_at(instant)
    }

    fn id(&self) -> String {
        (**self).id()
    }

    fn to_native(&self) -> String {
        (**self).to_native()
    }
}

impl<Z: TimeZone + ?Sized> TimeZone for Arc<Z> {
    fn offset_at(&self, instant: Instant) -> i32 {
        (**self).offset_at(instant)
    }

    fn id(&self) -> String {
        (**self).id()
    }

    fn to_native(&self) -> String {
        (**self).to_native()
    }
}

/// A fixed offset from UTC, between -18:00 and +18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeZoneOffset {
    total_seconds: i32,
}

impl TimeZoneOffset {
    pub const UTC: TimeZoneOffset = TimeZoneOffset { total_seconds: 0 };

    pub fn of_total_seconds(total_seconds: i32) -> Result<Self> {
        Field::OffsetSeconds.check(total_seconds as i64)?;
        Ok(TimeZoneOffset { total_seconds })
    }

    /// The components must not have mixed signs, so `(-5, -30, 0)` is -05:30 and
    /// `(-5, 30, 0)` is an error.
    pub fn of(hours: i32, minutes: i32, seconds: i32) -> Result<Self> {
        let sign = [hours, minutes, seconds]
            .into_iter()
            .map(i32::signum)
            .find(|&s| s != 0)
            .unwrap_or(0);
        for (field, value, limit) in [
            (Field::Hour, hours, 18),
            (Field::Minute, minutes, 59),
            (Field::Second, seconds, 59),
        ] {
            let (min, max) = if sign < 0 { (-limit, 0) } else { (0, limit) };
            if value < min || value > max {
                return Err(Error::FieldOutOfRange {
                    field,
                    value: value as i64,
                    min: min as i64,
                    max: max as i64,
                });
            }
        }
        Self::of_total_seconds(
            hours * SECONDS_PER_HOUR as i32 + minutes * SECONDS_PER_MINUTE as i32 + seconds,
        )
    }

    pub fn total_seconds(&self) -> i32 {
        self.total_seconds
    }
}

impl TimeZone for TimeZoneOffset {
    fn offset_at(&self, _instant: Instant) -> i32 {
        self.total_seconds
    }

    fn id(&self) -> String {
        self.to_string()
    }

    fn to_native(&self) -> String {
        if self.total_seconds == 0 {
            return "UTC0".to_string();
        }
        // Quoted names may only hold alphanumerics and signs, and POSIX offsets count westwards.
        let total = self.total_seconds.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
        let (sign, west_sign) = if self.total_seconds < 0 {
            ('-', "")
        } else {
            ('+', "-")
        };
        let mut name = format!("{}{:02}{:02}", sign, hours, minutes);
        let mut offset = format!("{}{}", west_sign, hours);
        if minutes != 0 || seconds != 0 {
            offset.push_str(&format!(":{:02}", minutes));
        }
        if seconds != 0 {
            name.push_str(&format!("{:02}", seconds));
            offset.push_str(&format!(":{:02}", seconds));
        }
        format!("<{}>{}", name, offset)
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let total = self.total_seconds.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
        write!(f, "{}{:02}:{:02}", sign, hours, minutes)?;
        if seconds != 0 {
            write!(f, ":{:02}", seconds)?;
        }
        Ok(())
    }
}

/// A geographical region with its own offset history, such as `Europe/Paris`, backed by the
/// compiled time-zone database.
#[derive(Debug, Clone)]
pub struct TimeZoneRegion {
    id: String,
    rules: Arc<ZoneRules>,
}

impl TimeZoneRegion {
    pub(crate) fn new(id: String, rules: Arc<ZoneRules>) -> Self {
        TimeZoneRegion { id, rules }
    }

    /// Looks the region up in [`ZoneDatabase::global`]. Offsets such as `+01:00` and `Z` are
    /// not regions and are rejected.
    pub fn of(id: &str) -> Result<Self> {
        ZoneDatabase::global().region(id)
    }

    pub fn from_fields<L: FieldLookup + ?Sized>(fields: &L) -> Result<Self> {
        Self::of(field::required(fields, Field::TimeZoneRegion)?)
    }

    pub fn all_identifiers() -> Vec<String> {
        ZoneDatabase::global().all_identifiers()
    }

    pub fn identifiers_for_country(country_code: &str) -> Vec<String> {
        ZoneDatabase::global().identifiers_for_country(country_code)
    }
}

impl PartialEq for TimeZoneRegion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TimeZoneRegion {}

impl TimeZone for TimeZoneRegion {
    fn offset_at(&self, instant: Instant) -> i32 {
        self.rules.offset_at(instant.epoch_second())
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn to_native(&self) -> String {
        format!(":{}", self.id)
    }
}

impl fmt::Display for TimeZoneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
