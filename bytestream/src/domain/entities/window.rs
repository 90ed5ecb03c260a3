//! Buffer windows and the primitives backing stores use to install them.

use crate::domain::error::ContractViolation;
use core::ops::Range;

/// A borrowed view into backing-store memory.
///
/// A window is three indices into the memory its backing store currently
/// exposes: `first` (start of the window), `next` (next byte to read or
/// write) and `end` (one past the last byte). The stream never holds a
/// reference into that memory; it slices it by these indices on every access,
/// so the borrow of the backing store is what keeps the bytes alive.
///
/// `first <= next <= end` holds for every reachable value; every method that
/// moves `next` checks it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    first: usize,
    next: usize,
    end: usize,
}

impl Window {
    /// The empty window installed by `nullify_buffer`.
    pub const EMPTY: Self = Self { first: 0, next: 0, end: 0 };

    /// Build a window covering `start..start + len`, or None on overflow.
    pub const fn new(start: usize, len: usize) -> Option<Self> {
        match start.checked_add(len) {
            Some(end) => Some(Self { first: start, next: start, end }),
            None => None,
        }
    }

    /// Index of the first byte of the window.
    #[inline]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// Index of the next byte to read or write.
    #[inline]
    pub const fn next(&self) -> usize {
        self.next
    }

    /// Index one past the last byte of the window.
    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Total window length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.first
    }

    /// Check if the window holds no bytes at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.first == self.end
    }

    /// Bytes between `next` and `end`.
    #[inline]
    pub const fn available(&self) -> usize {
        self.end - self.next
    }

    /// Bytes between `first` and `next`.
    #[inline]
    pub const fn consumed(&self) -> usize {
        self.next - self.first
    }

    /// Index range of the bytes still available.
    #[inline]
    pub const fn remaining(&self) -> Range<usize> {
        self.next..self.end
    }

    /// Index range of the bytes already consumed.
    #[inline]
    pub const fn used(&self) -> Range<usize> {
        self.first..self.next
    }

    /// Move `next` forward by `count` bytes.
    pub(crate) fn advance(&mut self, count: usize) -> Result<(), ContractViolation> {
        if count > self.available() {
            return Err(ContractViolation::ConsumeBeyondWindow {
                requested: count,
                available: self.available(),
            });
        }
        self.next += count;
        Ok(())
    }

    /// Move `next` backward by `count` bytes.
    pub(crate) fn retreat(&mut self, count: usize) -> Result<(), ContractViolation> {
        if count > self.consumed() {
            return Err(ContractViolation::ConsumeBeyondWindow {
                requested: count,
                available: self.consumed(),
            });
        }
        self.next -= count;
        Ok(())
    }

    /// Place `next` so that `count` bytes remain before `end`.
    pub(crate) fn leave_available(&mut self, count: usize) -> Result<(), ContractViolation> {
        if count > self.len() {
            return Err(ContractViolation::ConsumeBeyondWindow {
                requested: count,
                available: self.len(),
            });
        }
        self.next = self.end - count;
        Ok(())
    }
}

/// The install/clear primitives handed to backing-store hooks.
///
/// A hook must call exactly one of [`set_buffer`](Self::set_buffer) or
/// [`nullify_buffer`](Self::nullify_buffer) before returning. The stream
/// validates the result against the backing store's memory once the hook
/// returns.
#[derive(Debug, Default)]
pub struct WindowSlot {
    installed: Option<Install>,
}

#[derive(Debug, Clone, Copy)]
enum Install {
    Buffer { start: usize, len: usize },
    Nullified,
}

impl WindowSlot {
    pub(crate) const fn new() -> Self {
        Self { installed: None }
    }

    /// Install `memory[start..start + len]` as the new window.
    ///
    /// The stream starts reading (or writing) at `start`.
    pub fn set_buffer(&mut self, start: usize, len: usize) {
        self.installed = Some(Install::Buffer { start, len });
    }

    /// Install an empty window, signalling that no more data (or room) exists.
    pub fn nullify_buffer(&mut self) {
        self.installed = Some(Install::Nullified);
    }

    /// Check whether a hook has installed anything yet.
    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Turn the hook's choice into a window over `memory_len` bytes.
    pub(crate) fn take(self, memory_len: usize) -> Result<Window, ContractViolation> {
        match self.installed {
            None => Err(ContractViolation::WindowNotInstalled),
            Some(Install::Nullified) => Ok(Window::EMPTY),
            Some(Install::Buffer { start, len }) => match Window::new(start, len) {
                Some(window) if window.end() <= memory_len => Ok(window),
                _ => Err(ContractViolation::WindowOutOfBounds {
                    start,
                    len,
                    memory: memory_len,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(w: &Window) {
        assert!(w.first() <= w.next());
        assert!(w.next() <= w.end());
        assert_eq!(w.available() + w.consumed(), w.len());
    }

    #[test]
    fn test_window_accounting() {
        let mut w = Window::new(4, 8).unwrap();
        assert_invariant(&w);
        assert_eq!(w.available(), 8);

        w.advance(3).unwrap();
        assert_invariant(&w);
        assert_eq!(w.consumed(), 3);
        assert_eq!(w.remaining(), 7..12);
        assert_eq!(w.used(), 4..7);

        w.retreat(2).unwrap();
        assert_invariant(&w);
        assert_eq!(w.next(), 5);
    }

    #[test]
    fn test_window_rejects_overrun() {
        let mut w = Window::new(0, 4).unwrap();
        w.advance(4).unwrap();
        assert_eq!(
            w.advance(1),
            Err(ContractViolation::ConsumeBeyondWindow { requested: 1, available: 0 })
        );
        assert!(w.retreat(5).is_err());
        assert_invariant(&w);
    }

    #[test]
    fn test_leave_available() {
        let mut w = Window::new(10, 6).unwrap();
        w.leave_available(2).unwrap();
        assert_eq!(w.next(), 14);
        assert_eq!(w.available(), 2);
        assert!(w.leave_available(7).is_err());
    }

    #[test]
    fn test_window_new_overflow() {
        assert!(Window::new(usize::MAX, 1).is_none());
    }

    #[test]
    fn test_slot_validation() {
        let slot = WindowSlot::new();
        assert_eq!(slot.take(16), Err(ContractViolation::WindowNotInstalled));

        let mut slot = WindowSlot::new();
        slot.nullify_buffer();
        assert_eq!(slot.take(16), Ok(Window::EMPTY));

        let mut slot = WindowSlot::new();
        slot.set_buffer(8, 8);
        assert_eq!(slot.take(16), Ok(Window::new(8, 8).unwrap()));

        let mut slot = WindowSlot::new();
        slot.set_buffer(8, 9);
        assert_eq!(
            slot.take(16),
            Err(ContractViolation::WindowOutOfBounds { start: 8, len: 9, memory: 16 })
        );
    }
}
