//! Stream identity used to scope markers.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a single stream instance.
///
/// Every stream draws a fresh id when it is created, and every marker it
/// hands out carries that id. Ids are never reused within a process, so a
/// marker can never be honored by a stream other than the one that made it,
/// including a later stream built over the same backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u64);

impl StreamId {
    /// Allocate a new, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the underlying value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = StreamId::next();
        let b = StreamId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_display() {
        let id = StreamId(7);
        assert_eq!(format!("{}", id), "Stream(7)");
    }
}
