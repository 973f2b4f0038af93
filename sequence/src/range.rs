//! Arithmetic progressions.

use crate::Generator;
use core::iter::Empty;
use thiserror::Error;

/// Errors returned when constructing a [`Range`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("xrange() arg 3 must not be zero")]
    ZeroIncrement,
}

/// The progression `start, start + increment, ..., start + (count - 1) * increment`.
///
/// A `Range` is an immutable value: iterating it has no side effects and
/// [`split`](Generator::split) produces two new ranges that share nothing with
/// the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    start: i64,
    count: u64,
    increment: i64,
}

impl Range {
    /// Creates the progression of `count` values beginning at `start`.
    ///
    /// Callers are expected to pass a non-zero `increment` and a `count` whose last
    /// element fits in an `i64` (as [`xrange`] guarantees).
    pub const fn new(start: i64, count: u64, increment: i64) -> Self {
        Self {
            start,
            count,
            increment,
        }
    }

    /// The progression covering the half-open interval between `start` and `stop`.
    ///
    /// `increment` must be non-zero.
    pub(crate) fn half_open(start: i64, stop: i64, increment: i64) -> Self {
        debug_assert_ne!(increment, 0);
        let (start_w, stop_w, increment_w) = (start as i128, stop as i128, increment as i128);
        let count = if increment > 0 {
            (stop_w - start_w - 1).div_euclid(increment_w) + 1
        } else {
            (start_w - stop_w - 1).div_euclid(-increment_w) + 1
        };
        let count = u64::try_from(count.max(0)).unwrap_or(u64::MAX);
        Self::new(start, count, increment)
    }

    /// The first value of the progression (even if the range is empty).
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// The number of values.
    pub const fn len(&self) -> u64 {
        self.count
    }

    /// Whether the progression has no values.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The step between consecutive values.
    pub const fn increment(&self) -> i64 {
        self.increment
    }

    /// The value at `index`, if it exists.
    pub fn get(&self, index: u64) -> Option<i64> {
        if index >= self.count {
            return None;
        }
        i64::try_from(self.start as i128 + self.increment as i128 * index as i128).ok()
    }

    /// The final value, if any.
    pub fn last(&self) -> Option<i64> {
        self.get(self.count.checked_sub(1)?)
    }

    /// The same values in reverse order.
    ///
    /// Returns `None` if the reversed increment cannot be represented.
    pub fn reversed(&self) -> Option<Self> {
        let increment = self.increment.checked_neg()?;
        match self.last() {
            Some(last) => Some(Self::new(last, self.count, increment)),
            None => Some(Self::new(self.start, 0, increment)),
        }
    }
}

/// Half-open progression factory with the argument conventions of `xrange`.
///
/// With only `first`, the progression runs from `0` up to (excluding) `first`.
/// With `second`, it runs from `first` up to (excluding) `second`. `increment`
/// defaults to `1` and may be negative, but not zero.
///
/// ```
/// use kiln_sequence::{xrange, Generator};
///
/// let down = xrange(5, Some(2), Some(-1)).unwrap();
/// assert_eq!(down.len(), 3);
/// assert_eq!(down.iter().collect::<Vec<_>>(), vec![5, 4, 3]);
/// ```
pub fn xrange(first: i64, second: Option<i64>, increment: Option<i64>) -> Result<Range, Error> {
    let (start, stop) = match second {
        None => (0, first),
        Some(stop) => (first, stop),
    };
    let increment = increment.unwrap_or(1);
    if increment == 0 {
        return Err(Error::ZeroIncrement);
    }
    Ok(Range::half_open(start, stop, increment))
}

/// Iterator over the values of a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    next: i64,
    remaining: u64,
    increment: i64,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.next;
        self.remaining -= 1;

        // Never step past the final value.
        if self.remaining > 0 {
            self.next += self.increment;
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl Generator for Range {
    type Item = i64;
    type Iter = RangeIter;
    type Child = Range;
    type Children = Empty<Range>;

    fn iter(&self) -> RangeIter {
        RangeIter {
            next: self.start,
            remaining: self.count,
            increment: self.increment,
        }
    }

    fn can_split(&self) -> bool {
        self.count > 1
    }

    fn split(&self) -> Option<(Self, Self)> {
        if !self.can_split() {
            return None;
        }
        let low = self.count / 2;
        let high = self.count - low;

        // The first value of the right half is an element of this range, so it fits.
        let pivot = (self.start as i128 + self.increment as i128 * low as i128) as i64;
        Some((
            Self::new(self.start, low, self.increment),
            Self::new(pivot, high, self.increment),
        ))
    }

    fn children(&self) -> Empty<Range> {
        core::iter::empty()
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.count)
    }
}
