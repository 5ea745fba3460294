use std::sync::Arc;
use std::time::SystemTime;

use crate::instant::Instant;

/// A source of the current instant. Everything that needs "now" takes a clock so that tests
/// can substitute a fixed one.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Reads the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        // A system clock outside the years -999999..=999999 is broken beyond repair, so pin it
        // to the nearest end of the range.
        let now = SystemTime::now();
        Instant::try_from(now).unwrap_or_else(|_| {
            if now > SystemTime::UNIX_EPOCH {
                Instant::MAX
            } else {
                Instant::MIN
            }
        })
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock() {
        let instant = Instant::of(1_196_676_930, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(Instant::now(&clock), instant);

        let shared: Arc<dyn Clock> = Arc::new(clock);
        assert_eq!(shared.now(), instant);
    }

    #[test]
    fn system_clock_is_after_2020() {
        let now = SystemClock.now();
        assert!(now.epoch_second() > 1_577_836_800);
    }
}
