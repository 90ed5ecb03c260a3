//! WindowSource port - read-side refill hooks.
//!
//! This port defines what an input stream needs from its backing store: a
//! way to step to the next window of data, and optionally to step back or to
//! jump straight to an offset.

use crate::domain::{entities::WindowSlot, value_objects::StreamPosition};
use core::error::Error;

bitflags::bitflags! {
    /// Optional hooks a [`WindowSource`] implements.
    ///
    /// The stream consults these flags before calling an optional hook, so a
    /// source that does not advertise a capability never has the
    /// corresponding hook invoked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceCapabilities: u8 {
        /// `fetch_previous_window` is implemented; enables `seek_backward`.
        const PREVIOUS_WINDOW = 0b0000_0001;
        /// `seek_window` is implemented; enables O(1) `reset`.
        const RANDOM_ACCESS = 0b0000_0010;
    }
}

/// Port for supplying read windows to a `ByteInputStream`.
///
/// ```text
/// ┌─────────────────────┐
/// │  ByteInputStream    │
/// └──────────┬──────────┘
///            │ refills through
///            ▼
/// ┌─────────────────────┐
/// │  WindowSource Port  │  ◄── This trait
/// └──────────┬──────────┘
///            │ implemented by
///            ▼
/// ┌─────────────────────┐
/// │  Backing stores     │
/// │ (pages, segments)   │
/// └─────────────────────┘
/// ```
///
/// Windows are ranges of [`memory`](Self::memory). A window stays valid until
/// the next hook call on the same source; the source may reuse or replace
/// the memory freely inside a hook.
///
/// # Examples
///
/// ```
/// use bytestream::{ByteInputStream, WindowSlot, WindowSource};
///
/// /// Hands out one fixed chunk of bytes, then reports end-of-stream.
/// struct Once {
///     data: &'static [u8],
///     done: bool,
/// }
///
/// impl WindowSource for Once {
///     type Error = core::convert::Infallible;
///
///     fn memory(&self) -> &[u8] {
///         self.data
///     }
///
///     fn fetch_next_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
///         if self.done {
///             slot.nullify_buffer();
///         } else {
///             self.done = true;
///             slot.set_buffer(0, self.data.len());
///         }
///         Ok(())
///     }
/// }
///
/// let mut stream = ByteInputStream::new(Once { data: b"hello", done: false });
/// let mut buf = [0u8; 8];
/// assert_eq!(stream.read_bytes(&mut buf).unwrap(), 5);
/// assert_eq!(stream.read_bytes(&mut buf).unwrap(), 0);
/// ```
pub trait WindowSource {
    /// The error type reported by the backing store.
    type Error: Error + 'static;

    /// The memory the currently installed window indexes into.
    fn memory(&self) -> &[u8];

    /// Install the window that follows the current one.
    ///
    /// Must call exactly one of `slot.set_buffer` (a non-empty window) or
    /// `slot.nullify_buffer` (end-of-stream).
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails to produce the data. The
    /// stream treats this as fatal and does not retry.
    fn fetch_next_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error>;

    /// Optional hooks this source implements.
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::empty()
    }

    /// Install the window that precedes the current one.
    ///
    /// Only called when [`SourceCapabilities::PREVIOUS_WINDOW`] is advertised.
    /// After end-of-stream the "current" window is the empty one past the
    /// last window, so this must install the last window of the stream.
    fn fetch_previous_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        slot.nullify_buffer();
        Ok(())
    }

    /// Install a window containing stream offset `offset`.
    ///
    /// Returns how many bytes into the installed window `offset` lies. An
    /// offset equal to the stream length may be served by an empty window.
    /// Only called when [`SourceCapabilities::RANDOM_ACCESS`] is advertised.
    fn seek_window(
        &mut self,
        offset: StreamPosition,
        slot: &mut WindowSlot,
    ) -> Result<usize, Self::Error> {
        let _ = offset;
        slot.nullify_buffer();
        Ok(0)
    }
}
