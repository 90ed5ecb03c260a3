//! Byte-array backing stores (borrowed memory, no allocation).

use crate::domain::{
    PageConfig, PageConfigError, SourceCapabilities, StreamPosition, WindowSink, WindowSlot,
    WindowSource,
};
use core::{convert::Infallible, ops::Range};

/// Reads a borrowed byte slice in fixed-size windows.
///
/// Windows are aligned to multiples of the window size, so stepping back and
/// jumping to an offset always land on the same windows a forward scan sees.
///
/// # Examples
///
/// ```
/// use bytestream::{ByteArraySource, ByteInputStream};
///
/// let source = ByteArraySource::new(b"ABCDEFGHIJKL", 4).unwrap();
/// let mut stream = ByteInputStream::new(source);
///
/// let window = stream.get_read_pointer(1).unwrap().unwrap();
/// assert_eq!(window, b"ABCD");
/// ```
#[derive(Debug, Clone)]
pub struct ByteArraySource<'a> {
    data: &'a [u8],
    config: PageConfig,
    current: Range<usize>,
}

impl<'a> ByteArraySource<'a> {
    /// Expose `data` in windows of `window_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PageConfigError::ZeroPageSize`] for a zero window size.
    pub fn new(data: &'a [u8], window_size: usize) -> Result<Self, PageConfigError> {
        Ok(Self {
            data,
            config: PageConfig::from_page_size(window_size)?,
            current: 0..0,
        })
    }

    /// The underlying bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Window size in bytes.
    pub fn window_size(&self) -> usize {
        self.config.page_size()
    }

    fn install(&mut self, start: usize, slot: &mut WindowSlot) {
        let end = start.saturating_add(self.config.page_size()).min(self.data.len());
        self.current = start..end;
        if start < end {
            slot.set_buffer(start, end - start);
        } else {
            slot.nullify_buffer();
        }
    }
}

impl WindowSource for ByteArraySource<'_> {
    type Error = Infallible;

    fn memory(&self) -> &[u8] {
        self.data
    }

    fn fetch_next_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        self.install(self.current.end, slot);
        Ok(())
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::PREVIOUS_WINDOW | SourceCapabilities::RANDOM_ACCESS
    }

    fn fetch_previous_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        let prev_end = self.current.start;
        if prev_end == 0 {
            self.current = 0..0;
            slot.nullify_buffer();
            return Ok(());
        }
        let size = self.config.page_size();
        self.install((prev_end - 1) / size * size, slot);
        Ok(())
    }

    fn seek_window(
        &mut self,
        offset: StreamPosition,
        slot: &mut WindowSlot,
    ) -> Result<usize, Self::Error> {
        let len = self.data.len();
        let target = usize::try_from(offset.value()).map_or(len, |o| o.min(len));
        if target == len {
            self.current = len..len;
            slot.nullify_buffer();
            return Ok(0);
        }
        let size = self.config.page_size();
        let start = target / size * size;
        self.install(start, slot);
        Ok(target - start)
    }
}

/// Writes into a borrowed, fixed-size byte buffer.
///
/// The whole unwritten tail is offered as one window. Once the buffer is
/// full the sink installs an empty window and further writes fail with
/// [`ContractViolation::SinkWindowTooSmall`](crate::ContractViolation::SinkWindowTooSmall).
///
/// # Examples
///
/// ```
/// use bytestream::{ByteArraySink, ByteOutputStream};
///
/// let mut buf = [0u8; 16];
/// let mut out = ByteOutputStream::new(ByteArraySink::new(&mut buf));
/// out.write_bytes(b"record").unwrap();
/// out.close().unwrap();
/// assert_eq!(out.sink().written(), b"record");
/// ```
#[derive(Debug)]
pub struct ByteArraySink<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> ByteArraySink<'a> {
    /// Write into `buffer`, starting at its first byte.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, len: 0 }
    }

    /// The bytes flushed so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Number of bytes flushed so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether nothing has been flushed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Room left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.len
    }
}

impl WindowSink for ByteArraySink<'_> {
    type Error = Infallible;

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut *self.buffer
    }

    fn flush_window(
        &mut self,
        committed: Range<usize>,
        _min_requested: usize,
        slot: &mut WindowSlot,
    ) -> Result<(), Self::Error> {
        if !committed.is_empty() {
            self.len = committed.end.min(self.buffer.len());
        }
        match self.remaining() {
            0 => slot.nullify_buffer(),
            room => slot.set_buffer(self.len, room),
        }
        Ok(())
    }
}
