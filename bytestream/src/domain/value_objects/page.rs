//! Page addressing for paged backing stores.

use super::StreamPosition;
use core::fmt;

/// Index of a fixed-size page within a paged store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page of a store.
    pub const FIRST: Self = Self(0);

    /// Create a page number.
    ///
    /// ```
    /// use bytestream::PageNumber;
    ///
    /// assert_eq!(PageNumber::new(3).value(), 3);
    /// ```
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The page after this one, or None on overflow.
    #[inline]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The page before this one, or None for the first page.
    #[inline]
    pub const fn prev(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}

impl From<u32> for PageNumber {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Page geometry shared by a paged source or sink and its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    page_size: usize,
}

impl PageConfig {
    /// Build a configuration for pages of `page_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PageConfigError::ZeroPageSize`] for a zero page size; a
    /// stream over zero-length windows could never make progress.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytestream::{PageConfig, PageConfigError};
    ///
    /// let config = PageConfig::from_page_size(4096).unwrap();
    /// assert_eq!(config.page_size(), 4096);
    /// assert_eq!(PageConfig::from_page_size(0), Err(PageConfigError::ZeroPageSize));
    /// ```
    pub const fn from_page_size(page_size: usize) -> Result<Self, PageConfigError> {
        if page_size == 0 {
            return Err(PageConfigError::ZeroPageSize);
        }
        Ok(Self { page_size })
    }

    /// Get the page size in bytes.
    #[inline]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Stream offset of the first byte of `page`.
    #[inline]
    pub const fn page_start(&self, page: PageNumber) -> StreamPosition {
        StreamPosition::new(page.value() as u64 * self.page_size as u64)
    }

    /// Split a stream offset into (page, offset within page).
    ///
    /// Returns None when the page index does not fit a [`PageNumber`].
    pub const fn locate(&self, offset: StreamPosition) -> Option<(PageNumber, usize)> {
        let page = offset.value() / self.page_size as u64;
        if page > u32::MAX as u64 {
            return None;
        }
        let within = (offset.value() % self.page_size as u64) as usize;
        Some((PageNumber::new(page as u32), within))
    }

    /// Number of pages needed to hold `len` bytes.
    pub const fn pages_for(&self, len: u64) -> u64 {
        len.div_ceil(self.page_size as u64)
    }
}

/// Errors that can occur when creating a [`PageConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageConfigError {
    /// Page size is zero.
    ZeroPageSize,
}

impl fmt::Display for PageConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "Page size cannot be zero"),
        }
    }
}

impl core::error::Error for PageConfigError {}
