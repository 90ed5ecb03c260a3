//! PageStore port - page-granular device I/O.
//!
//! Paged sources and sinks sit on this port; a device reader or a file of
//! fixed-size pages implements it.

use crate::domain::value_objects::PageNumber;
use core::error::Error;

/// Port for fixed-size page storage.
///
/// The page size itself is not part of the port; it is agreed between the
/// store and its paged stream through a `PageConfig`.
pub trait PageStore {
    /// The error type for storage operations.
    type Error: Error + 'static;

    /// Logical length of the stored byte stream.
    ///
    /// Every page before the last is full; the last page holds the remainder.
    fn len(&self) -> u64;

    /// Check whether the store holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read page `page` into `dest`.
    ///
    /// `dest` is one page long; bytes past the end of the stream are
    /// unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be read.
    fn read_page(&mut self, page: PageNumber, dest: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `src` as the leading bytes of page `page`.
    ///
    /// A write ending past the current length extends it.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be written.
    fn write_page(&mut self, page: PageNumber, src: &[u8]) -> Result<(), Self::Error>;

    /// Flush cached writes to the underlying device.
    ///
    /// The default implementation is a no-op.
    fn sync(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
