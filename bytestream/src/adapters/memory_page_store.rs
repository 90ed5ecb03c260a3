//! In-memory page store (heap-allocated).

use crate::{
    adapters::error::MemoryStoreError,
    domain::{PageConfig, PageNumber, PageStore},
};
use alloc::vec::Vec;

/// A [`PageStore`] over a growable byte vector.
///
/// Useful as a stand-in for a device in tests, and as scratch storage for
/// spilled runs that never leave memory.
///
/// # Examples
///
/// ```
/// use bytestream::{MemoryPageStore, PageConfig, PageNumber, PageStore};
///
/// let config = PageConfig::from_page_size(4).unwrap();
/// let mut store = MemoryPageStore::from_bytes(config, b"ABCDEF".to_vec());
///
/// let mut page = [0u8; 4];
/// store.read_page(PageNumber::new(1), &mut page).unwrap();
/// assert_eq!(&page[..2], b"EF");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryPageStore {
    config: PageConfig,
    data: Vec<u8>,
    reads: usize,
    writes: usize,
}

impl MemoryPageStore {
    /// Create an empty store.
    pub fn new(config: PageConfig) -> Self {
        Self::from_bytes(config, Vec::new())
    }

    /// Create a store holding `data`.
    pub fn from_bytes(config: PageConfig, data: Vec<u8>) -> Self {
        Self {
            config,
            data,
            reads: 0,
            writes: 0,
        }
    }

    /// The page geometry of this store.
    pub fn config(&self) -> PageConfig {
        self.config
    }

    /// The stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the store and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of `read_page` calls served.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of `write_page` calls served.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Byte offset of `page`, checked against the current length.
    fn page_offset(&self, page: PageNumber) -> Result<usize, MemoryStoreError> {
        let out_of_range = MemoryStoreError::PageOutOfRange {
            page,
            len: self.data.len() as u64,
        };
        let start = usize::try_from(self.config.page_start(page).value()).map_err(|_| out_of_range)?;
        if start > self.data.len() {
            return Err(out_of_range);
        }
        Ok(start)
    }
}

impl PageStore for MemoryPageStore {
    type Error = MemoryStoreError;

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_page(&mut self, page: PageNumber, dest: &mut [u8]) -> Result<(), Self::Error> {
        let expected = self.config.page_size();
        if dest.len() != expected {
            return Err(MemoryStoreError::PageSizeMismatch {
                expected,
                actual: dest.len(),
            });
        }
        let start = self.page_offset(page)?;
        let end = (start + expected).min(self.data.len());
        dest[..end - start].copy_from_slice(&self.data[start..end]);
        self.reads += 1;
        Ok(())
    }

    fn write_page(&mut self, page: PageNumber, src: &[u8]) -> Result<(), Self::Error> {
        let expected = self.config.page_size();
        if src.len() > expected {
            return Err(MemoryStoreError::PageSizeMismatch {
                expected,
                actual: src.len(),
            });
        }
        let start = self.page_offset(page)?;
        let end = start + src.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(src);
        self.writes += 1;
        Ok(())
    }
}
