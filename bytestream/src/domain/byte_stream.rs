//! Capabilities shared by every stream flavor.

use crate::domain::{
    entities::ByteStreamMarker,
    error::{ContractViolation, StreamError},
    value_objects::{StreamId, StreamPosition},
};

/// Position tracking and the marker protocol.
///
/// Implemented by both input and output streams. `new_marker` and `mark`
/// come for free from `stream_id`, `offset` and `is_closed`.
pub trait ByteStream {
    /// The backing store's error type.
    type Error;

    /// Identity of this stream instance.
    fn stream_id(&self) -> StreamId;

    /// Bytes consumed (input) or emitted (output) so far.
    fn offset(&self) -> StreamPosition;

    /// Check whether the stream has been closed.
    fn is_closed(&self) -> bool;

    /// Create an unset marker scoped to this stream.
    ///
    /// The marker must be passed to [`mark`](Self::mark) before it can be
    /// used with `reset`.
    fn new_marker(&self) -> ByteStreamMarker {
        ByteStreamMarker::unset(self.stream_id())
    }

    /// Record the current position in `marker`, forgetting any earlier one.
    ///
    /// # Errors
    ///
    /// Fails with a contract violation if the marker belongs to another
    /// stream or this stream is closed.
    fn mark(&self, marker: &mut ByteStreamMarker) -> Result<(), StreamError<Self::Error>> {
        if self.is_closed() {
            return Err(ContractViolation::StreamClosed.into());
        }
        marker.record(self.stream_id(), self.offset())?;
        Ok(())
    }
}

/// Streams that can be repositioned to a marked offset.
pub trait MarkableStream: ByteStream {
    /// Skip `count` bytes forward.
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::PrematureEnd`] if the stream ends
    /// before `count` bytes were skipped.
    fn seek_forward(&mut self, count: usize) -> Result<(), StreamError<Self::Error>>;

    /// Move `count` bytes backward.
    ///
    /// # Errors
    ///
    /// Fails with a contract violation if the backing store cannot step
    /// backward or `count` exceeds the current offset.
    fn seek_backward(&mut self, count: usize) -> Result<(), StreamError<Self::Error>>;

    /// Reposition the stream to the offset recorded in `marker`.
    ///
    /// The provided implementation replays sequentially: one forward or one
    /// backward seek covering the whole distance, costing O(distance).
    /// Streams over random-access storage override it with direct
    /// positioning; the observable result is the same.
    ///
    /// # Errors
    ///
    /// Fails with a contract violation for a foreign or unset marker, and
    /// with whatever the underlying seek reports.
    fn reset(&mut self, marker: &ByteStreamMarker) -> Result<(), StreamError<Self::Error>> {
        if self.is_closed() {
            return Err(ContractViolation::StreamClosed.into());
        }
        let target = marker.resolve(self.stream_id())?;
        replay_to(self, target)
    }
}

/// Seek sequentially until `stream` sits at `target`.
pub(crate) fn replay_to<S: MarkableStream + ?Sized>(
    stream: &mut S,
    target: StreamPosition,
) -> Result<(), StreamError<S::Error>> {
    let (forward, mut distance) = stream.offset().distance_to(target);
    // Seek counts are usize; a 32-bit target may need several steps.
    while distance > 0 {
        let step = usize::try_from(distance).unwrap_or(usize::MAX);
        if forward {
            stream.seek_forward(step)?;
        } else {
            stream.seek_backward(step)?;
        }
        distance -= step as u64;
    }
    Ok(())
}
