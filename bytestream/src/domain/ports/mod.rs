//! Ports define the interfaces between the streams and the outside world.
//!
//! These are **secondary (driven) ports**: the streams depend on them and the
//! backing stores implement them.

mod page_store;
mod window_sink;
mod window_source;

pub use page_store::PageStore;
pub use window_sink::WindowSink;
pub use window_source::{SourceCapabilities, WindowSource};
