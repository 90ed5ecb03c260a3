//! Domain layer - the stream contract, free of any concrete storage.
//!
//! The domain layer contains:
//! - **Value Objects**: `StreamPosition`, `StreamId`, `PageNumber`, `PageConfig`
//! - **Entities**: `Window`, `WindowSlot`, `ByteStreamMarker`, `StreamState`
//! - **Ports**: `WindowSource`, `WindowSink`, `PageStore`
//! - **Services**: `ByteInputStream`, `ByteOutputStream`
//! - **Errors**: `StreamError`, `ContractViolation`
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Streams                   │  │
//!     │  │  - ByteInputStream         │  │
//!     │  │  - ByteOutputStream        │  │
//!     │  └────────────────────────────┘  │
//!     │              │                   │
//!     │              ▼                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - WindowSource          │  │
//!     │  │    - WindowSink            │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - SegmentChainSource/Sink       │
//!     │  - PagedSource/Sink              │
//!     │  - ByteArraySource/Sink          │
//!     └──────────────────────────────────┘
//! ```
//!
//! Every operation either completes or returns an error; nothing blocks or
//! suspends on its own. A stream is meant for one thread of control at a
//! time, and a backing store shared between streams synchronizes itself.

pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

mod byte_stream;
mod input_stream;
mod output_stream;

// Re-export commonly used types
pub use byte_stream::{ByteStream, MarkableStream};
pub use entities::{ByteStreamMarker, StreamState, Window, WindowSlot};
pub use error::{ContractViolation, StreamError};
pub use input_stream::ByteInputStream;
pub use output_stream::ByteOutputStream;
pub use ports::{PageStore, SourceCapabilities, WindowSink, WindowSource};
pub use value_objects::{PageConfig, PageConfigError, PageNumber, StreamId, StreamPosition};
