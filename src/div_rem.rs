use std::cmp::min;

use num_integer::Integer;
use num_traits::{NumCast, PrimInt};

use crate::error::{Error, Result};

// Everything that carries between units (days <-> seconds <-> nanoseconds) must round towards
// negative infinity, so that e.g. -1 second is "day -1, second 86399" and not "day 0, second -1".
// Integer::div_mod_floor gives us that; plain `/` and `%` truncate towards zero and must not be
// used on values that can be negative.

/// Floor division that also returns the floor remainder, which always has the sign of the
/// divisor.
pub(crate) trait FloorDivMod: Integer + Copy {
    fn floor_div_mod(self, divisor: Self) -> (Self, Self) {
        self.div_mod_floor(&divisor)
    }
}

impl<T: Integer + Copy> FloorDivMod for T {}

pub(crate) trait ClampedDivRem<Q: Ord>: Sized {
    /// Divides a non-negative value, but never lets the quotient exceed `max_quotient`. Whatever
    /// the clamp leaves over stays in the remainder. This is how the long last year of a
    /// quadrennium (or the long last century of a cycle) absorbs its leap day.
    fn clamped_div_rem(self, divisor: Self, max_quotient: Q) -> (Q, Self);
}

impl<T, Q> ClampedDivRem<Q> for T
where
    T: PrimInt,
    Q: Ord + Into<T> + NumCast + Copy,
{
    fn clamped_div_rem(self, divisor: T, max_quotient: Q) -> (Q, T) {
        debug_assert!(self >= T::zero());
        let quotient = min(self / divisor, max_quotient.into());
        let remainder = self - quotient * divisor;
        // quotient <= max_quotient, so the cast back only fails for negative input.
        let quotient = <Q as NumCast>::from(quotient).unwrap_or(max_quotient);
        (quotient, remainder)
    }
}

/// Narrows a widened intermediate result back to `i64`, failing with an overflow for `op`.
pub(crate) fn narrow(value: i128, op: &'static str) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::Overflow(op))
}
