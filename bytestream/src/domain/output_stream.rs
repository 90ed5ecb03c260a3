//! ByteOutputStream - buffered writes into backing-store windows.

use crate::domain::{
    byte_stream::ByteStream,
    entities::{StreamState, Window, WindowSlot},
    error::{ContractViolation, StreamError},
    ports::WindowSink,
    value_objects::{StreamId, StreamPosition},
};
use bytemuck::Pod;

/// A buffered, writable byte stream over windows supplied by a [`WindowSink`].
///
/// Bytes are written into the sink's memory in place. Whenever the current
/// window fills up, the filled part is handed to the sink with
/// `flush_window` and a new window is installed.
///
/// Call [`close`](Self::close) before releasing the stream; bytes still in
/// the current window are only guaranteed to reach the sink after `flush` or
/// `close`.
///
/// # Examples
///
/// ```
/// use bytestream::{ByteInputStream, ByteOutputStream, SegmentChainSink};
///
/// let mut out = ByteOutputStream::new(SegmentChainSink::new(4).unwrap());
/// out.write_bytes(b"hello, ").unwrap();
///
/// let room = out.get_write_pointer(5).unwrap();
/// room[..5].copy_from_slice(b"world");
/// out.consume_write_pointer(5).unwrap();
/// out.close().unwrap();
///
/// let mut input = ByteInputStream::new(out.into_sink().into_source());
/// let mut buf = [0u8; 12];
/// assert_eq!(input.read_bytes(&mut buf).unwrap(), 12);
/// assert_eq!(&buf, b"hello, world");
/// ```
#[derive(Debug)]
pub struct ByteOutputStream<S: WindowSink> {
    sink: S,
    cursor: WriteCursor,
}

/// Position bookkeeping, kept apart from the sink so that `into_sink` can
/// move the sink out while dropping still reports lost bytes.
#[derive(Debug)]
struct WriteCursor {
    window: Window,
    offset: StreamPosition,
    state: StreamState,
    id: StreamId,
}

impl Drop for WriteCursor {
    fn drop(&mut self) {
        if !self.state.is_closed() && self.window.consumed() > 0 {
            log_warn!(
                "{} dropped with {} unflushed bytes at {}",
                self.id,
                self.window.consumed(),
                self.offset
            );
        }
    }
}

impl<S: WindowSink> ByteOutputStream<S> {
    /// Create a stream over `sink`.
    ///
    /// The sink is not asked for a window until the first write.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            cursor: WriteCursor {
                window: Window::EMPTY,
                offset: StreamPosition::START,
                state: StreamState::Active,
                id: StreamId::next(),
            },
        }
    }

    /// Get a reference to the backing store.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the stream and return the backing store.
    ///
    /// Bytes written since the last flush are not handed to the sink; close
    /// the stream first to keep them. Releasing unflushed bytes, here or by
    /// dropping the stream, logs a warning.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The current buffer window.
    #[inline]
    pub fn window(&self) -> Window {
        self.cursor.window
    }

    /// Writable bytes left in the current window.
    #[inline]
    pub fn bytes_available(&self) -> usize {
        self.cursor.window.available()
    }

    /// Bytes written into the current window but not yet flushed.
    #[inline]
    pub fn bytes_pending(&self) -> usize {
        self.cursor.window.consumed()
    }

    /// Lifecycle state of the stream.
    #[inline]
    pub fn state(&self) -> StreamState {
        self.cursor.state
    }

    /// Write all of `src`, moving to new windows as needed.
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::SinkWindowTooSmall`] if the sink runs
    /// out of room, and with [`StreamError::Storage`] if a flush fails.
    pub fn write_bytes(&mut self, src: &[u8]) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;

        let mut written = 0;
        while written < src.len() {
            if self.cursor.window.available() == 0 {
                self.flush_and_request(1)?;
                if self.cursor.window.available() == 0 {
                    return Err(ContractViolation::SinkWindowTooSmall {
                        requested: 1,
                        provided: 0,
                    }
                    .into());
                }
            }

            let n = (src.len() - written).min(self.cursor.window.available());
            let offset = ContractViolation::advance(self.cursor.offset, n)?;
            let dest = &mut self.window_bytes_mut()?[..n];
            dest.copy_from_slice(&src[written..written + n]);
            self.cursor.window.advance(n)?;
            self.cursor.offset = offset;
            written += n;
        }

        Ok(())
    }

    /// Write the raw bytes of `value`.
    pub fn write_value<T: Pod>(&mut self, value: &T) -> Result<(), StreamError<S::Error>> {
        self.write_bytes(bytemuck::bytes_of(value))
    }

    /// Borrow at least `count` writable bytes in place.
    ///
    /// The slice may be longer than `count`. Nothing counts as written until
    /// [`consume_write_pointer`](Self::consume_write_pointer) is called. When
    /// the current window is too small it is flushed and the sink is asked
    /// for a window of at least `count` bytes (at least one byte when
    /// `count` is zero).
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::SinkWindowTooSmall`] if the sink
    /// cannot offer that much contiguous room.
    pub fn get_write_pointer(&mut self, count: usize) -> Result<&mut [u8], StreamError<S::Error>> {
        self.ensure_open()?;

        let available = self.cursor.window.available();
        if available == 0 || available < count {
            let requested = count.max(1);
            self.flush_and_request(requested)?;
            let provided = self.cursor.window.available();
            if provided < requested {
                return Err(ContractViolation::SinkWindowTooSmall { requested, provided }.into());
            }
        }

        Ok(self.window_bytes_mut()?)
    }

    /// Mark `count` bytes obtained from `get_write_pointer` as written.
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::ConsumeBeyondWindow`] if `count`
    /// exceeds the writable bytes in the current window.
    pub fn consume_write_pointer(&mut self, count: usize) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        let offset = ContractViolation::advance(self.cursor.offset, count)?;
        self.cursor.window.advance(count)?;
        self.cursor.offset = offset;
        Ok(())
    }

    /// Hand every byte written so far to the sink.
    ///
    /// The sink decides whether the rest of the current window stays usable.
    pub fn flush(&mut self) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        self.flush_and_request(0)
    }

    /// Flush and start the next write on a fresh window.
    ///
    /// Sinks with page structure finish their current page; others treat this
    /// as a plain flush.
    pub fn hard_page_break(&mut self) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        self.flush_and_request(0)?;
        self.sink.hard_page_break().map_err(StreamError::Storage)?;
        self.cursor.window = Window::EMPTY;
        log_trace!("{} hard page break at {}", self.cursor.id, self.cursor.offset);
        Ok(())
    }

    /// Flush, close the sink and refuse further writes.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), StreamError<S::Error>> {
        if self.cursor.state.is_closed() {
            return Ok(());
        }
        self.flush_and_request(0)?;
        self.sink.close().map_err(StreamError::Storage)?;
        self.cursor.window = Window::EMPTY;
        self.cursor.state = StreamState::Closed;
        log_debug!("{} closed after {} bytes", self.cursor.id, self.cursor.offset.value());
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ContractViolation> {
        if self.cursor.state.is_closed() {
            return Err(ContractViolation::StreamClosed);
        }
        Ok(())
    }

    fn window_bytes_mut(&mut self) -> Result<&mut [u8], ContractViolation> {
        let window = self.cursor.window;
        let memory = self.sink.memory_mut();
        let memory_len = memory.len();
        memory
            .get_mut(window.remaining())
            .ok_or(ContractViolation::WindowOutOfBounds {
                start: window.first(),
                len: window.len(),
                memory: memory_len,
            })
    }

    /// Commit the filled part of the window and adopt whatever the sink
    /// installs next.
    fn flush_and_request(&mut self, min_requested: usize) -> Result<(), StreamError<S::Error>> {
        let committed = self.cursor.window.used();
        log_trace!(
            "{} flushing {} bytes, requesting {}",
            self.cursor.id,
            committed.len(),
            min_requested
        );

        let mut slot = WindowSlot::new();
        self.sink
            .flush_window(committed, min_requested, &mut slot)
            .map_err(StreamError::Storage)?;
        self.cursor.window = slot.take(self.sink.memory_mut().len())?;
        Ok(())
    }
}

impl<S: WindowSink> ByteStream for ByteOutputStream<S> {
    type Error = S::Error;

    fn stream_id(&self) -> StreamId {
        self.cursor.id
    }

    fn offset(&self) -> StreamPosition {
        self.cursor.offset
    }

    fn is_closed(&self) -> bool {
        self.cursor.state.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::Range;

    // Fixed-size windows; committed bytes are collected per flush
    struct MockSink {
        buffer: Vec<u8>,
        window_size: usize,
        committed: Vec<Vec<u8>>,
        flushes: usize,
        page_breaks: usize,
        closed: bool,
    }

    impl MockSink {
        fn new(window_size: usize) -> Self {
            Self {
                buffer: vec![0; window_size],
                window_size,
                committed: Vec::new(),
                flushes: 0,
                page_breaks: 0,
                closed: false,
            }
        }

        fn bytes(&self) -> Vec<u8> {
            self.committed.concat()
        }
    }

    impl WindowSink for MockSink {
        type Error = core::convert::Infallible;

        fn memory_mut(&mut self) -> &mut [u8] {
            &mut self.buffer
        }

        fn flush_window(
            &mut self,
            committed: Range<usize>,
            min_requested: usize,
            slot: &mut WindowSlot,
        ) -> Result<(), Self::Error> {
            self.flushes += 1;
            if !committed.is_empty() {
                self.committed.push(self.buffer[committed.clone()].to_vec());
            }
            if min_requested == 0 && committed.end < self.window_size {
                slot.set_buffer(committed.end, self.window_size - committed.end);
            } else {
                slot.set_buffer(0, self.window_size);
            }
            Ok(())
        }

        fn hard_page_break(&mut self) -> Result<(), Self::Error> {
            self.page_breaks += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_write_spans_windows() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        out.write_bytes(b"ABCDEFGHIJ").unwrap();
        assert_eq!(out.offset().value(), 10);
        assert_eq!(out.bytes_pending(), 2);

        out.close().unwrap();
        let sink = out.into_sink();
        assert!(sink.closed);
        assert_eq!(sink.bytes(), b"ABCDEFGHIJ");
        assert_eq!(sink.committed.len(), 3);
    }

    #[test]
    fn test_write_pointer_round_trip() {
        let mut out = ByteOutputStream::new(MockSink::new(8));
        let room = out.get_write_pointer(3).unwrap();
        assert_eq!(room.len(), 8);
        room[..3].copy_from_slice(b"xyz");
        out.consume_write_pointer(3).unwrap();

        assert_eq!(out.offset().value(), 3);
        assert_eq!(out.bytes_available(), 5);

        out.close().unwrap();
        assert_eq!(out.into_sink().bytes(), b"xyz");
    }

    #[test]
    fn test_write_pointer_flushes_short_window() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        out.write_bytes(b"AB").unwrap();

        // Only 2 bytes left: the window is flushed and a fresh one installed
        let room = out.get_write_pointer(3).unwrap();
        assert!(room.len() >= 3);
        room[..3].copy_from_slice(b"CDE");
        out.consume_write_pointer(3).unwrap();
        out.close().unwrap();

        let sink = out.into_sink();
        assert_eq!(sink.committed, vec![b"AB".to_vec(), b"CDE".to_vec()]);
    }

    #[test]
    fn test_write_pointer_larger_than_sink() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        let err = out.get_write_pointer(5).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(ContractViolation::SinkWindowTooSmall { requested: 5, provided: 4 })
        );
    }

    #[test]
    fn test_consume_beyond_window() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        out.get_write_pointer(1).unwrap();
        let err = out.consume_write_pointer(5).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(ContractViolation::ConsumeBeyondWindow { requested: 5, available: 4 })
        );
    }

    #[test]
    fn test_flush_keeps_remaining_room() {
        let mut out = ByteOutputStream::new(MockSink::new(8));
        out.write_bytes(b"abc").unwrap();
        out.flush().unwrap();
        assert_eq!(out.bytes_pending(), 0);
        assert_eq!(out.bytes_available(), 5);

        out.write_bytes(b"de").unwrap();
        out.close().unwrap();
        assert_eq!(out.into_sink().committed, vec![b"abc".to_vec(), b"de".to_vec()]);
    }

    #[test]
    fn test_hard_page_break() {
        let mut out = ByteOutputStream::new(MockSink::new(8));
        out.write_bytes(b"abc").unwrap();
        out.hard_page_break().unwrap();
        assert_eq!(out.bytes_available(), 0);
        assert_eq!(out.sink().page_breaks, 1);

        out.write_bytes(b"d").unwrap();
        out.close().unwrap();
        assert_eq!(out.into_sink().bytes(), b"abcd");
    }

    #[test]
    fn test_write_value() {
        #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
        #[repr(C)]
        struct Header {
            magic: u32,
            len: u32,
        }

        let mut out = ByteOutputStream::new(MockSink::new(3));
        out.write_value(&Header { magic: 0xfeed_f00d, len: 7 }).unwrap();
        out.close().unwrap();

        let bytes = out.into_sink().bytes();
        let header: Header = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(header.magic, 0xfeed_f00d);
        assert_eq!(header.len, 7);
    }

    #[test]
    fn test_mark_records_output_offset() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        out.write_bytes(b"12345").unwrap();
        let mut marker = out.new_marker();
        out.mark(&mut marker).unwrap();
        assert_eq!(marker.position(), Some(StreamPosition::new(5)));
    }

    #[test]
    fn test_closed_stream_refuses_writes() {
        let mut out = ByteOutputStream::new(MockSink::new(4));
        out.close().unwrap();
        out.close().unwrap();
        assert_eq!(
            out.write_bytes(b"x").unwrap_err().violation(),
            Some(ContractViolation::StreamClosed)
        );
        assert_eq!(
            out.get_write_pointer(1).unwrap_err().violation(),
            Some(ContractViolation::StreamClosed)
        );
    }

    #[test]
    fn test_sink_out_of_room() {
        struct Full;

        impl WindowSink for Full {
            type Error = core::convert::Infallible;

            fn memory_mut(&mut self) -> &mut [u8] {
                &mut []
            }

            fn flush_window(
                &mut self,
                _committed: Range<usize>,
                _min_requested: usize,
                slot: &mut WindowSlot,
            ) -> Result<(), Self::Error> {
                slot.nullify_buffer();
                Ok(())
            }
        }

        let mut out = ByteOutputStream::new(Full);
        assert_eq!(
            out.write_bytes(b"x").unwrap_err().violation(),
            Some(ContractViolation::SinkWindowTooSmall { requested: 1, provided: 0 })
        );
    }

    #[cfg(feature = "log")]
    mod unflushed_warning {
        use super::*;
        use std::sync::Mutex;

        static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

        struct Capture;

        impl log::Log for Capture {
            fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
                metadata.level() <= log::Level::Warn
            }

            fn log(&self, record: &log::Record<'_>) {
                if self.enabled(record.metadata()) {
                    WARNINGS.lock().unwrap().push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        static CAPTURE: Capture = Capture;

        fn warned(prefix: &str) -> bool {
            WARNINGS.lock().unwrap().iter().any(|m| m.starts_with(prefix))
        }

        #[test]
        fn test_dropping_unflushed_bytes_warns() {
            let _ = log::set_logger(&CAPTURE);
            log::set_max_level(log::LevelFilter::Warn);

            let mut out = ByteOutputStream::new(MockSink::new(8));
            out.write_bytes(b"abc").unwrap();
            let dropped = format!("{} dropped with 3 unflushed bytes", out.stream_id());
            drop(out);
            assert!(warned(&dropped));

            let mut out = ByteOutputStream::new(MockSink::new(8));
            out.write_bytes(b"abcd").unwrap();
            let released = format!("{} dropped with 4 unflushed bytes", out.stream_id());
            let sink = out.into_sink();
            assert!(sink.committed.is_empty());
            assert!(warned(&released));

            let mut out = ByteOutputStream::new(MockSink::new(8));
            out.write_bytes(b"ab").unwrap();
            out.close().unwrap();
            let closed = format!("{} dropped", out.stream_id());
            drop(out);
            assert!(!warned(&closed));
        }
    }
}
