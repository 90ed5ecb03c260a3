//! Buffered byte streams over discontiguous buffer windows.
//!
//! This crate is the stream-buffering layer a storage engine builds its
//! record readers, index scans, run merges and log replay on. A logical byte
//! stream is presented to callers while the physical bytes arrive in
//! *windows* supplied by a backing store: device pages, decompression
//! outputs, in-memory segment chains.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! The stream contract itself, with no knowledge of concrete storage:
//! - **Value Objects**: `StreamPosition`, `StreamId`, `PageNumber`, `PageConfig`
//! - **Entities**: `Window`, `WindowSlot`, `ByteStreamMarker`, `StreamState`
//! - **Ports**: `WindowSource`, `WindowSink`, `PageStore`
//! - **Services**: `ByteInputStream`, `ByteOutputStream`
//!
//! ## Adapter Layer (`adapters`)
//! Reference backing stores implementing the ports:
//! - **`ByteArraySource`/`ByteArraySink`**: borrowed fixed memory
//! - **`SegmentChainSource`/`SegmentChainSink`**: in-memory segment chains (requires `alloc`)
//! - **`PagedSource`/`PagedSink`**: one page per window over a `PageStore` (requires `alloc`)
//!
//! ## Infrastructure Layer (`infrastructure`)
//! `embedded_io` `Read`/`BufRead`/`Write` implementations for the streams.
//!
//! # Quick Start
//!
//! ```
//! use bytestream::{ByteInputStream, SegmentChainSource};
//!
//! let source = SegmentChainSource::new(vec![b"ABCD".to_vec(), b"EFGH".to_vec()]);
//! let mut stream = ByteInputStream::new(source);
//!
//! let mut buf = [0u8; 6];
//! assert_eq!(stream.read_bytes(&mut buf).unwrap(), 6);
//! assert_eq!(&buf, b"ABCDEF");
//!
//! // Zero-copy access to whatever is left in the current window
//! let rest = stream.get_read_pointer(2).unwrap().unwrap();
//! assert_eq!(rest, b"GH");
//! stream.consume_read_pointer(2).unwrap();
//! assert_eq!(stream.read_bytes(&mut buf).unwrap(), 0);
//! ```
//!
//! # Features
//!
//! - `alloc`: Enable `Vec`-backed backing stores
//! - `std`: Enable standard library support in `embedded-io`
//! - `log`: Enable logging through the `log` crate

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod macros;

// Core layers
pub mod domain;
pub mod adapters;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    ByteInputStream, ByteOutputStream, ByteStream, ByteStreamMarker, ContractViolation,
    MarkableStream, PageConfig, PageConfigError, PageNumber, PageStore, SourceCapabilities,
    StreamError, StreamId, StreamPosition, StreamState, Window, WindowSink, WindowSlot,
    WindowSource,
};

pub use adapters::{ByteArraySink, ByteArraySource};

#[cfg(feature = "alloc")]
pub use adapters::{
    MemoryPageStore, MemoryStoreError, PagedSink, PagedSource, SegmentChainSink,
    SegmentChainSource,
};

// Re-export bytemuck so callers can derive `Pod` for `read_value`/`write_value`
pub use bytemuck;

// Re-export embedded_io for convenience
pub use embedded_io;
