use std::fmt;

use crate::duration::Duration;
use crate::error::{Error, Result};
use crate::instant::Instant;

/// A half-open span of time `[start, end)`: the start is included, the end is not.
///
/// A zero-length interval (start == end) contains no instant and no other interval, not even
/// itself, but it still abuts itself and anything touching its single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Instant,
    end: Instant,
}

impl Interval {
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        if end < start {
            return Err(Error::EndBeforeStart);
        }
        Ok(Interval { start, end })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn with_start(&self, start: Instant) -> Result<Self> {
        Self::new(start, self.end)
    }

    pub fn with_end(&self, end: Instant) -> Result<Self> {
        Self::new(self.start, end)
    }

    pub fn duration(&self) -> Duration {
        Duration::between(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two share at least one instant. Intervals that only touch don't overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if one interval ends exactly where the other starts.
    pub fn abuts(&self, other: &Interval) -> bool {
        other.end == self.start || self.end == other.start
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.start < self.end && other.end <= self.end
    }

    pub fn contains_instant(&self, instant: Instant) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The interval between two disjoint intervals, or `None` if they overlap or abut.
    pub fn gap(&self, other: &Interval) -> Option<Interval> {
        if self.start > other.end {
            Some(Interval {
                start: other.end,
                end: self.start,
            })
        } else if other.start > self.end {
            Some(Interval {
                start: self.end,
                end: other.start,
            })
        } else {
            None
        }
    }

    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// The smallest interval spanning both, whether or not they meet.
    pub fn cover(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Like `cover`, but only for overlapping intervals.
    pub fn union(&self, other: &Interval) -> Option<Interval> {
        self.overlaps(other).then(|| self.cover(other))
    }

    /// Like `cover`, but only for abutting intervals.
    pub fn join(&self, other: &Interval) -> Option<Interval> {
        self.abuts(other).then(|| self.cover(other))
    }

    pub fn is_equal_to(&self, other: &Interval) -> bool {
        self == other
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}
