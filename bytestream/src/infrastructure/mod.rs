//! Infrastructure layer - integration with the wider I/O ecosystem.
//!
//! The streams implement the blocking `embedded_io` traits:
//! - `ByteInputStream`: `Read` and `BufRead`
//! - `ByteOutputStream`: `Write`
//!
//! `StreamError` implements `embedded_io::Error`; storage failures map to
//! `ErrorKind::Other` and contract violations to `InvalidInput`, except a
//! full sink (`WriteZero`) and a forward-only source (`Unsupported`).

mod embedded_io_impl;
