//! Domain entities.
//!
//! These carry the mutable state a stream tracks between calls: the current
//! buffer window, the stream lifecycle and the mementos handed to callers.

mod marker;
mod stream_state;
mod window;

pub use marker::ByteStreamMarker;
pub use stream_state::StreamState;
pub use window::{Window, WindowSlot};
