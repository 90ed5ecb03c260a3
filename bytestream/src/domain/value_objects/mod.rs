//! Value objects for the domain layer.
//!
//! Small immutable types that give offsets, identities and page geometry
//! their own names so they cannot be mixed up with plain integers.

mod page;
mod stream_id;
mod stream_position;

pub use page::{PageConfig, PageConfigError, PageNumber};
pub use stream_id::StreamId;
pub use stream_position::StreamPosition;
