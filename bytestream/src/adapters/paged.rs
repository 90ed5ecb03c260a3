//! Page-at-a-time streams over a [`PageStore`] (heap-allocated page buffer).
//!
//! One window is one page. The source reads a page into its buffer on every
//! refill; the sink fills its buffer and writes it through whenever the
//! stream flushes.

use crate::domain::{
    PageConfig, PageNumber, PageStore, SourceCapabilities, StreamPosition, WindowSink, WindowSlot,
    WindowSource,
};
use alloc::vec::Vec;
use core::ops::Range;

/// Reads a [`PageStore`] one page per window.
///
/// The last page may be partial; its window covers only the bytes below
/// [`PageStore::len`].
///
/// # Examples
///
/// ```
/// use bytestream::{ByteInputStream, MemoryPageStore, PageConfig, PagedSource};
///
/// let config = PageConfig::from_page_size(4).unwrap();
/// let store = MemoryPageStore::from_bytes(config, b"ABCDEFGHIJ".to_vec());
/// let mut stream = ByteInputStream::new(PagedSource::new(store, config));
///
/// let mut buf = [0u8; 16];
/// assert_eq!(stream.read_bytes(&mut buf).unwrap(), 10);
/// assert_eq!(&buf[..10], b"ABCDEFGHIJ");
/// ```
#[derive(Debug)]
pub struct PagedSource<P: PageStore> {
    store: P,
    config: PageConfig,
    page: Vec<u8>,
    /// Page index of the installed window; `None` before the first.
    current: Option<u64>,
}

impl<P: PageStore> PagedSource<P> {
    /// Create a source reading `store` in pages of `config.page_size()`.
    pub fn new(store: P, config: PageConfig) -> Self {
        Self {
            store,
            config,
            page: alloc::vec![0; config.page_size()],
            current: None,
        }
    }

    /// Get a reference to the page store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Consume the source and return the page store.
    pub fn into_store(self) -> P {
        self.store
    }

    /// The page geometry.
    pub fn config(&self) -> PageConfig {
        self.config
    }

    fn page_count(&self) -> u64 {
        self.config.pages_for(self.store.len())
    }

    /// Read page `index` and install its valid bytes, or nullify past the end.
    /// The cursor only moves once the page is in.
    fn load(&mut self, index: u64, slot: &mut WindowSlot) -> Result<(), P::Error> {
        let len = self.store.len();
        let start = index.saturating_mul(self.config.page_size() as u64);
        let number = match u32::try_from(index) {
            Ok(number) if start < len => PageNumber::new(number),
            _ => {
                self.current = Some(index);
                slot.nullify_buffer();
                return Ok(());
            }
        };

        self.store.read_page(number, &mut self.page)?;
        self.current = Some(index);
        let valid = (len - start).min(self.config.page_size() as u64) as usize;
        log_trace!("read {} ({} bytes)", number, valid);
        slot.set_buffer(0, valid);
        Ok(())
    }
}

impl<P: PageStore> WindowSource for PagedSource<P> {
    type Error = P::Error;

    fn memory(&self) -> &[u8] {
        &self.page
    }

    fn fetch_next_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        let next = self.current.map_or(0, |i| i + 1).min(self.page_count());
        self.load(next, slot)
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::PREVIOUS_WINDOW | SourceCapabilities::RANDOM_ACCESS
    }

    fn fetch_previous_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        match self.current {
            Some(i) if i > 0 => self.load(i - 1, slot),
            _ => {
                self.current = None;
                slot.nullify_buffer();
                Ok(())
            }
        }
    }

    fn seek_window(
        &mut self,
        offset: StreamPosition,
        slot: &mut WindowSlot,
    ) -> Result<usize, Self::Error> {
        match self.config.locate(offset) {
            Some((page, within)) if offset.value() < self.store.len() => {
                self.load(u64::from(page.value()), slot)?;
                Ok(within)
            }
            _ => {
                self.current = Some(self.page_count());
                slot.nullify_buffer();
                Ok(0)
            }
        }
    }
}

/// Writes a stream into a [`PageStore`], one page per window.
///
/// Writes start at the first page. Each flush writes the filled part of the
/// current page through to the store, so a page flushed several times is
/// rewritten each time. Pages stay dense: a write pointer never spans a
/// page boundary, and asking for more contiguous room than the current page
/// has left fails with
/// [`ContractViolation::SinkWindowTooSmall`](crate::ContractViolation::SinkWindowTooSmall).
///
/// A hard page break syncs the store; the stream layout is unchanged.
#[derive(Debug)]
pub struct PagedSink<P: PageStore> {
    store: P,
    config: PageConfig,
    page: Vec<u8>,
    number: PageNumber,
    filled: usize,
    persisted: usize,
}

impl<P: PageStore> PagedSink<P> {
    /// Create a sink writing `store` in pages of `config.page_size()`.
    pub fn new(store: P, config: PageConfig) -> Self {
        Self {
            store,
            config,
            page: alloc::vec![0; config.page_size()],
            number: PageNumber::FIRST,
            filled: 0,
            persisted: 0,
        }
    }

    /// Get a reference to the page store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Consume the sink and return the page store.
    pub fn into_store(self) -> P {
        self.store
    }

    /// The page geometry.
    pub fn config(&self) -> PageConfig {
        self.config
    }

    /// The page currently being filled.
    pub fn current_page(&self) -> PageNumber {
        self.number
    }
}

impl<P: PageStore> WindowSink for PagedSink<P> {
    type Error = P::Error;

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.page
    }

    fn flush_window(
        &mut self,
        committed: Range<usize>,
        _min_requested: usize,
        slot: &mut WindowSlot,
    ) -> Result<(), Self::Error> {
        let page_size = self.config.page_size();
        if !committed.is_empty() {
            self.filled = committed.end.min(page_size);
        }
        if self.filled > self.persisted {
            self.store.write_page(self.number, &self.page[..self.filled])?;
            log_trace!("wrote {} ({} bytes)", self.number, self.filled);
            self.persisted = self.filled;
        }

        if self.filled == page_size {
            match self.number.next() {
                Some(next) => {
                    self.number = next;
                    self.filled = 0;
                    self.persisted = 0;
                }
                None => {
                    log_warn!("page store full at {}", self.number);
                    slot.nullify_buffer();
                    return Ok(());
                }
            }
        }

        slot.set_buffer(self.filled, page_size - self.filled);
        Ok(())
    }

    fn hard_page_break(&mut self) -> Result<(), Self::Error> {
        self.store.sync()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.store.sync()
    }
}
