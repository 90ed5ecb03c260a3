//! Stream errors.
//!
//! Two tiers exist. A [`ContractViolation`] is caller misuse or an
//! incompatible stream/backing-store pairing: it is fatal, never retried and
//! never folded into an end-of-stream result. [`StreamError::Storage`] carries
//! a failure reported by the backing store from one of its hooks.
//!
//! End-of-stream is not an error at all; it is signalled by a zero or short
//! byte count, or by `None` from `get_read_pointer`.

use crate::domain::value_objects::{StreamId, StreamPosition};
use core::fmt;

/// A broken precondition of the stream contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContractViolation {
    /// `get_read_pointer` asked for more bytes than a non-empty window holds.
    ///
    /// Contiguity across windows is never promised, so the caller must take
    /// what is left of the current window first.
    ReadPointerSpansWindow {
        /// Bytes requested.
        requested: usize,
        /// Bytes left in the current window.
        available: usize,
    },

    /// A fresh window was shorter than the contiguous run the caller needs.
    ShortWindow {
        /// Bytes requested.
        requested: usize,
        /// Bytes in the window the backing store installed.
        actual: usize,
    },

    /// Tried to consume more bytes than the current window holds.
    ConsumeBeyondWindow {
        /// Bytes the caller tried to consume.
        requested: usize,
        /// Bytes left in the current window.
        available: usize,
    },

    /// The stream ran out before an operation with a minimum-bytes contract.
    PrematureEnd {
        /// Bytes the operation required.
        requested: usize,
        /// Bytes that were actually available.
        actual: usize,
    },

    /// The backing store cannot fetch previous windows.
    BackwardSeekUnsupported,

    /// A backward seek would move before the start of the stream.
    SeekBeforeStart {
        /// Bytes to seek backward.
        requested: usize,
        /// Current stream offset.
        offset: StreamPosition,
    },

    /// A marker created by one stream was handed to another.
    ForeignMarker {
        /// The stream that created the marker.
        marker: StreamId,
        /// The stream it was handed to.
        stream: StreamId,
    },

    /// A marker was used for `reset` before `mark` recorded a position.
    UnsetMarker,

    /// A backing store installed a window outside the memory it exposes.
    WindowOutOfBounds {
        /// First byte of the window.
        start: usize,
        /// Window length.
        len: usize,
        /// Length of the exposed memory.
        memory: usize,
    },

    /// A backing store hook returned without installing or clearing a window.
    WindowNotInstalled,

    /// A sink offered less room than a write pointer needs.
    SinkWindowTooSmall {
        /// Bytes requested.
        requested: usize,
        /// Bytes the sink provided.
        provided: usize,
    },

    /// The stream offset cannot represent another `count` bytes.
    OffsetOverflow {
        /// Offset before the move.
        offset: StreamPosition,
        /// Bytes the stream tried to move forward.
        count: usize,
    },

    /// The stream has been closed.
    StreamClosed,

    /// A repositioning failed partway and the window could not be restored.
    StreamFailed,
}

impl ContractViolation {
    /// Advance `offset` by `count`, failing instead of wrapping.
    pub(crate) fn advance(offset: StreamPosition, count: usize) -> Result<StreamPosition, Self> {
        offset.forward(count).ok_or(Self::OffsetOverflow { offset, count })
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadPointerSpansWindow { requested, available } => write!(
                f,
                "Read pointer of {} bytes requested but only {} remain in the window",
                requested, available
            ),
            Self::ShortWindow { requested, actual } => write!(
                f,
                "Backing store supplied a {}-byte window, {} contiguous bytes required",
                actual, requested
            ),
            Self::ConsumeBeyondWindow { requested, available } => write!(
                f,
                "Cannot consume {} bytes, only {} available in the window",
                requested, available
            ),
            Self::PrematureEnd { requested, actual } => write!(
                f,
                "Stream ended after {} of {} required bytes",
                actual, requested
            ),
            Self::BackwardSeekUnsupported => {
                write!(f, "Backing store does not support backward seeks")
            }
            Self::SeekBeforeStart { requested, offset } => write!(
                f,
                "Cannot seek {} bytes backward from {}",
                requested, offset
            ),
            Self::ForeignMarker { marker, stream } => write!(
                f,
                "Marker belongs to {} and cannot be used with {}",
                marker, stream
            ),
            Self::UnsetMarker => write!(f, "Marker has not been marked"),
            Self::WindowOutOfBounds { start, len, memory } => write!(
                f,
                "Window {}..+{} exceeds {} bytes of backing memory",
                start, len, memory
            ),
            Self::WindowNotInstalled => {
                write!(f, "Backing store hook installed no window")
            }
            Self::SinkWindowTooSmall { requested, provided } => write!(
                f,
                "Sink provided {} writable bytes, {} required",
                provided, requested
            ),
            Self::OffsetOverflow { offset, count } => {
                write!(f, "Offset {} cannot advance by {} bytes", offset, count)
            }
            Self::StreamClosed => write!(f, "Stream is closed"),
            Self::StreamFailed => {
                write!(f, "Stream failed during a reposition and must be closed")
            }
        }
    }
}

impl core::error::Error for ContractViolation {}

/// Errors returned by stream operations.
#[derive(Debug)]
pub enum StreamError<E> {
    /// Caller misuse or incompatible backing store; never recoverable.
    Contract(ContractViolation),
    /// Failure reported by the backing store.
    Storage(E),
}

impl<E> StreamError<E> {
    /// Check whether this is a contract violation.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Get the contract violation, if this is one.
    pub const fn violation(&self) -> Option<ContractViolation> {
        match self {
            Self::Contract(v) => Some(*v),
            Self::Storage(_) => None,
        }
    }
}

impl<E> From<ContractViolation> for StreamError<E> {
    fn from(violation: ContractViolation) -> Self {
        log_warn!("stream contract violation: {}", violation);
        Self::Contract(violation)
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract(v) => write!(f, "Stream contract violation: {}", v),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for StreamError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Contract(v) => Some(v),
            Self::Storage(e) => Some(e),
        }
    }
}
