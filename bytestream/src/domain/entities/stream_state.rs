//! Stream lifecycle state.

/// The lifecycle state of a stream.
///
/// Streams move through these states:
/// - Active: more data (or room) may exist behind the current window
/// - Exhausted: the backing store installed an empty window; reads return
///   zero without asking it again until the stream is explicitly repositioned
/// - Closed: the stream was released; every operation and marker is refused
/// - Failed: a repositioning broke partway and the window could not be put
///   back; everything but `close` is refused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamState {
    /// More data may be available.
    #[default]
    Active,
    /// The backing store has no further data.
    Exhausted,
    /// The stream has been closed.
    Closed,
    /// The stream lost its position and only accepts `close`.
    Failed,
}

impl StreamState {
    /// Check if the stream has reached end-of-stream.
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, StreamState::Exhausted)
    }

    /// Check if the stream has been closed.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        matches!(self, StreamState::Closed)
    }

    /// Check if the stream lost its position.
    #[inline]
    pub const fn is_failed(&self) -> bool {
        matches!(self, StreamState::Failed)
    }
}
