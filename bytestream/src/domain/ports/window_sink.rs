//! WindowSink port - write-side flush hooks.

use crate::domain::entities::WindowSlot;
use core::{error::Error, ops::Range};

/// Port for receiving written windows from a `ByteOutputStream`.
///
/// The mirror of `WindowSource`: the sink exposes writable memory, the
/// stream fills a window of it, and the sink is asked to persist the filled
/// part and offer new room.
pub trait WindowSink {
    /// The error type reported by the backing store.
    type Error: Error + 'static;

    /// The memory the currently installed window indexes into.
    fn memory_mut(&mut self) -> &mut [u8];

    /// Persist `memory[committed]` and install the next writable window.
    ///
    /// `committed` is the part of the current window the stream has filled;
    /// it is empty before the first window is installed. When
    /// `min_requested` is non-zero the new window should hold at least that
    /// many bytes; a smaller window is a contract violation the stream
    /// reports. When it is zero no new room is needed and the sink may either
    /// offer what is left of the current window or nullify.
    ///
    /// Must call exactly one of `slot.set_buffer` or `slot.nullify_buffer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails to persist the data.
    fn flush_window(
        &mut self,
        committed: Range<usize>,
        min_requested: usize,
        slot: &mut WindowSlot,
    ) -> Result<(), Self::Error>;

    /// Finish the current page so the next window starts a fresh one.
    ///
    /// Called right after a flush. The default implementation is a no-op,
    /// which suits sinks without page structure.
    fn hard_page_break(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once, after the final flush, when the stream is closed.
    ///
    /// The default implementation is a no-op.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
