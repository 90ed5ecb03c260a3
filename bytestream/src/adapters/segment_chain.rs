//! In-memory segment chains (heap-allocated).
//!
//! A segment chain is the simplest discontiguous stream: a list of owned
//! buffers read back to back. Each segment is exactly one window.

use crate::domain::{
    PageConfig, PageConfigError, SourceCapabilities, StreamPosition, WindowSink, WindowSlot,
    WindowSource,
};
use alloc::vec::Vec;
use core::{convert::Infallible, ops::Range};

/// Reads a chain of owned segments, one window per segment.
///
/// Empty segments are dropped on construction, so every window the source
/// installs is non-empty.
#[derive(Debug, Clone, Default)]
pub struct SegmentChainSource {
    segments: Vec<Vec<u8>>,
    /// Stream offset of the first byte of each segment.
    starts: Vec<u64>,
    len: u64,
    /// `None` before the first window; `Some(segments.len())` past the end.
    current: Option<usize>,
}

impl SegmentChainSource {
    /// Build a source over `segments`, read in order.
    pub fn new(segments: Vec<Vec<u8>>) -> Self {
        let segments: Vec<Vec<u8>> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        let mut starts = Vec::with_capacity(segments.len());
        let mut len = 0u64;
        for segment in &segments {
            starts.push(len);
            len += segment.len() as u64;
        }

        Self {
            segments,
            starts,
            len,
            current: None,
        }
    }

    /// Total length of the chain in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check whether the chain holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The non-empty segments, in stream order.
    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// Consume the source and return its segments.
    pub fn into_segments(self) -> Vec<Vec<u8>> {
        self.segments
    }

    fn install(&mut self, index: usize, slot: &mut WindowSlot) {
        self.current = Some(index);
        match self.segments.get(index) {
            Some(segment) => slot.set_buffer(0, segment.len()),
            None => slot.nullify_buffer(),
        }
    }
}

impl WindowSource for SegmentChainSource {
    type Error = Infallible;

    fn memory(&self) -> &[u8] {
        self.current
            .and_then(|i| self.segments.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn fetch_next_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        let next = self.current.map_or(0, |i| i + 1).min(self.segments.len());
        self.install(next, slot);
        Ok(())
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::PREVIOUS_WINDOW | SourceCapabilities::RANDOM_ACCESS
    }

    fn fetch_previous_window(&mut self, slot: &mut WindowSlot) -> Result<(), Self::Error> {
        match self.current {
            Some(i) if i > 0 => self.install(i - 1, slot),
            _ => {
                self.current = None;
                slot.nullify_buffer();
            }
        }
        Ok(())
    }

    fn seek_window(
        &mut self,
        offset: StreamPosition,
        slot: &mut WindowSlot,
    ) -> Result<usize, Self::Error> {
        let target = offset.value();
        if target >= self.len {
            self.install(self.segments.len(), slot);
            return Ok(0);
        }
        // Last segment starting at or before the target
        let index = self.starts.partition_point(|&start| start <= target) - 1;
        self.install(index, slot);
        Ok((target - self.starts[index]) as usize)
    }
}

impl From<Vec<u8>> for SegmentChainSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(alloc::vec![bytes])
    }
}

/// Collects written bytes into a growing chain of segments.
///
/// Each window is the unfilled tail of the current segment. A segment is
/// sealed when it is full, when a write pointer asks for more contiguous
/// room than it has left, or on a hard page break. New segments are
/// `segment_size` bytes, or larger when a write pointer needs it.
///
/// # Examples
///
/// ```
/// use bytestream::{ByteOutputStream, SegmentChainSink};
///
/// let mut out = ByteOutputStream::new(SegmentChainSink::new(4).unwrap());
/// out.write_bytes(b"ABCDEF").unwrap();
/// out.close().unwrap();
///
/// let segments = out.into_sink().into_segments();
/// assert_eq!(segments, vec![b"ABCD".to_vec(), b"EF".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentChainSink {
    config: PageConfig,
    sealed: Vec<Vec<u8>>,
    current: Vec<u8>,
    filled: usize,
}

impl SegmentChainSink {
    /// Create a sink allocating segments of `segment_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PageConfigError::ZeroPageSize`] for a zero segment size.
    pub fn new(segment_size: usize) -> Result<Self, PageConfigError> {
        Ok(Self {
            config: PageConfig::from_page_size(segment_size)?,
            sealed: Vec::new(),
            current: Vec::new(),
            filled: 0,
        })
    }

    /// Default size of a new segment.
    pub fn segment_size(&self) -> usize {
        self.config.page_size()
    }

    /// Bytes flushed so far, across all segments.
    pub fn len(&self) -> u64 {
        self.sealed.iter().map(|s| s.len() as u64).sum::<u64>() + self.filled as u64
    }

    /// Check whether nothing has been flushed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the sink and return the flushed bytes as segments.
    ///
    /// Bytes the stream never flushed are not included.
    pub fn into_segments(mut self) -> Vec<Vec<u8>> {
        self.seal();
        self.sealed
    }

    /// Consume the sink and read its flushed bytes back.
    pub fn into_source(self) -> SegmentChainSource {
        SegmentChainSource::new(self.into_segments())
    }

    fn seal(&mut self) {
        let mut segment = core::mem::take(&mut self.current);
        if self.filled > 0 {
            segment.truncate(self.filled);
            self.sealed.push(segment);
        }
        self.filled = 0;
    }

    fn start_segment(&mut self, min_requested: usize) {
        self.seal();
        let size = self.config.page_size().max(min_requested);
        self.current = alloc::vec![0; size];
        log_trace!("new segment of {} bytes", size);
    }
}

impl WindowSink for SegmentChainSink {
    type Error = Infallible;

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.current
    }

    fn flush_window(
        &mut self,
        committed: Range<usize>,
        min_requested: usize,
        slot: &mut WindowSlot,
    ) -> Result<(), Self::Error> {
        if !committed.is_empty() {
            self.filled = committed.end.min(self.current.len());
        }

        let room = self.current.len() - self.filled;
        if min_requested > room {
            self.start_segment(min_requested);
        }

        match self.current.len() - self.filled {
            0 => slot.nullify_buffer(),
            room => slot.set_buffer(self.filled, room),
        }
        Ok(())
    }

    fn hard_page_break(&mut self) -> Result<(), Self::Error> {
        self.seal();
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.seal();
        Ok(())
    }
}
