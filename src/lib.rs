pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::Duration;
pub use error::{Error, ErrorKind, Result};
pub use field::{Field, FieldLookup, ParsedFields, MAX_YEAR, MIN_YEAR};
pub use instant::Instant;
pub use interval::Interval;
pub use local_date::{DayOfWeek, LocalDate};
pub use local_date_time::LocalDateTime;
pub use local_time::LocalTime;
pub use period::Period;
pub use time_zone::{TimeZone, TimeZoneOffset, TimeZoneRegion};
pub use zoneinfo::ZoneDatabase;

mod clock;
mod div_rem;
mod duration;
mod error;
mod field;
mod gregorian;
mod instant;
mod interval;
mod local_date;
mod local_date_time;
mod local_time;
mod period;
mod posix_tz;
mod time_zone;
mod zoneinfo;
