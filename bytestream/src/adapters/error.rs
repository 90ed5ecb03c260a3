//! Adapter-level errors.

use crate::domain::PageNumber;
use core::fmt;

/// Errors reported by [`MemoryPageStore`](super::MemoryPageStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreError {
    /// The page starts past the end of the stored bytes.
    PageOutOfRange {
        /// The requested page.
        page: PageNumber,
        /// Length of the store in bytes.
        len: u64,
    },
    /// A page buffer does not match the configured page size.
    PageSizeMismatch {
        /// The configured page size.
        expected: usize,
        /// The size of the buffer provided.
        actual: usize,
    },
}

impl fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageOutOfRange { page, len } => {
                write!(f, "{} is out of range for a store of {} bytes", page, len)
            }
            Self::PageSizeMismatch { expected, actual } => write!(
                f,
                "Page buffer is {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl core::error::Error for MemoryStoreError {}
