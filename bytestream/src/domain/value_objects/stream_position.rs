//! Logical byte offset within a stream.

use core::fmt;

/// A byte offset into a logical stream.
///
/// Equals the number of bytes consumed (input) or emitted (output) since the
/// stream was created. It only moves backward through an explicit
/// repositioning such as `seek_backward` or `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamPosition(u64);

impl StreamPosition {
    /// The start of every stream.
    pub const START: Self = Self(0);

    /// Create a position from a raw byte offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytestream::StreamPosition;
    ///
    /// let pos = StreamPosition::new(12);
    /// assert_eq!(pos.value(), 12);
    /// ```
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying byte offset.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Position `count` bytes further along the stream, or None on overflow.
    #[inline]
    pub const fn forward(self, count: usize) -> Option<Self> {
        match self.0.checked_add(count as u64) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Position `count` bytes earlier, or None if that would precede the start.
    #[inline]
    pub const fn backward(self, count: usize) -> Option<Self> {
        match self.0.checked_sub(count as u64) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Signed distance from `self` to `other` as (is_forward, bytes).
    pub(crate) const fn distance_to(self, other: Self) -> (bool, u64) {
        if other.0 >= self.0 {
            (true, other.0 - self.0)
        } else {
            (false, self.0 - other.0)
        }
    }
}

impl fmt::Display for StreamPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<u64> for StreamPosition {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<StreamPosition> for u64 {
    fn from(pos: StreamPosition) -> Self {
        pos.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_backward() {
        let pos = StreamPosition::START.forward(10).unwrap();
        assert_eq!(pos.value(), 10);
        assert_eq!(pos.backward(4), Some(StreamPosition::new(6)));
        assert_eq!(pos.backward(10), Some(StreamPosition::START));
        assert_eq!(pos.backward(11), None);
    }

    #[test]
    fn test_forward_overflow() {
        let pos = StreamPosition::new(u64::MAX - 1);
        assert_eq!(pos.forward(1), Some(StreamPosition::new(u64::MAX)));
        assert_eq!(pos.forward(5), None);
    }

    #[test]
    fn test_distance() {
        let a = StreamPosition::new(3);
        let b = StreamPosition::new(9);
        assert_eq!(a.distance_to(b), (true, 6));
        assert_eq!(b.distance_to(a), (false, 6));
        assert_eq!(a.distance_to(a), (true, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", StreamPosition::new(42)), "@42");
    }
}
