//! Adapter layer - Concrete backing stores implementing the domain's ports.
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - ByteInputStream (service)     │
//!     │  - ByteOutputStream (service)    │
//!     │  - WindowSource / WindowSink     │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - ByteArraySource / Sink        │
//!     │  - SegmentChainSource / Sink     │
//!     │  - PagedSource / Sink            │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ uses
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  PageStore (device, memory)      │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`ByteArraySource`/`ByteArraySink`**: Borrowed memory, no allocation
//! - **`SegmentChainSource`/`SegmentChainSink`**: Owned segment chains (requires `alloc`)
//! - **`PagedSource`/`PagedSink`**: One page per window over a `PageStore` (requires `alloc`)
//! - **`MemoryPageStore`**: `Vec`-backed `PageStore` (requires `alloc`)

mod byte_array;
mod error;

#[cfg(feature = "alloc")]
mod memory_page_store;

#[cfg(feature = "alloc")]
mod paged;

#[cfg(feature = "alloc")]
mod segment_chain;

pub use byte_array::{ByteArraySink, ByteArraySource};
pub use error::MemoryStoreError;

#[cfg(feature = "alloc")]
pub use memory_page_store::MemoryPageStore;

#[cfg(feature = "alloc")]
pub use paged::{PagedSink, PagedSource};

#[cfg(feature = "alloc")]
pub use segment_chain::{SegmentChainSink, SegmentChainSource};
