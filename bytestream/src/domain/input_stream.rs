//! ByteInputStream - buffered reads over backing-store windows.
//!
//! The stream keeps a window into whatever memory its [`WindowSource`]
//! currently exposes and asks the source for the next (or previous) window
//! whenever the current one runs dry. Callers either copy bytes out with
//! [`read_bytes`](ByteInputStream::read_bytes) or borrow them in place with
//! [`get_read_pointer`](ByteInputStream::get_read_pointer) and
//! [`consume_read_pointer`](ByteInputStream::consume_read_pointer); both
//! paths observe exactly the same bytes.

use crate::domain::{
    byte_stream::{replay_to, ByteStream, MarkableStream},
    entities::{ByteStreamMarker, StreamState, Window, WindowSlot},
    error::{ContractViolation, StreamError},
    ports::{SourceCapabilities, WindowSource},
    value_objects::{StreamId, StreamPosition},
};
use bytemuck::Pod;

/// A buffered, readable view of a possibly discontiguous byte sequence.
///
/// # Type Parameters
///
/// - `S`: The backing store supplying windows
///
/// # Examples
///
/// ```
/// use bytestream::{ByteInputStream, ByteStream, MarkableStream, SegmentChainSource};
///
/// let source = SegmentChainSource::new(vec![b"ABCD".to_vec(), b"EFGH".to_vec()]);
/// let mut stream = ByteInputStream::new(source);
///
/// let mut marker = stream.new_marker();
/// stream.seek_forward(3).unwrap();
/// stream.mark(&mut marker).unwrap();
///
/// let mut buf = [0u8; 3];
/// stream.read_bytes(&mut buf).unwrap();
/// assert_eq!(&buf, b"DEF");
///
/// stream.reset(&marker).unwrap();
/// stream.read_bytes(&mut buf).unwrap();
/// assert_eq!(&buf, b"DEF");
/// ```
#[derive(Debug)]
pub struct ByteInputStream<S: WindowSource> {
    source: S,
    window: Window,
    offset: StreamPosition,
    state: StreamState,
    id: StreamId,
}

impl<S: WindowSource> ByteInputStream<S> {
    /// Create a stream over `source`.
    ///
    /// No window is fetched until the first read.
    pub fn new(source: S) -> Self {
        Self {
            source,
            window: Window::EMPTY,
            offset: StreamPosition::START,
            state: StreamState::Active,
            id: StreamId::next(),
        }
    }

    /// Get a reference to the backing store.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the stream and return the backing store.
    pub fn into_source(self) -> S {
        self.source
    }

    /// The current buffer window.
    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Bytes remaining in the current window.
    #[inline]
    pub fn bytes_available(&self) -> usize {
        self.window.available()
    }

    /// Bytes already consumed from the current window.
    #[inline]
    pub fn bytes_consumed(&self) -> usize {
        self.window.consumed()
    }

    /// Lifecycle state of the stream.
    #[inline]
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Read up to `buf.len()` bytes, refilling across windows as needed.
    ///
    /// Returns the number of bytes copied; 0 means end-of-stream (or an
    /// empty `buf`).
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Storage`] if a refill fails and a contract
    /// violation if the stream is closed or the source installs an invalid
    /// window.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, StreamError<S::Error>> {
        let count = buf.len();
        self.read_into(Some(buf), count)
    }

    /// Read `size_of::<T>()` bytes straight into `value`.
    ///
    /// Returns the number of bytes read. Anything short of
    /// `size_of::<T>()` means the stream was truncated and leaves `value`
    /// partially overwritten; callers must treat it as an error. Use
    /// [`take_value`](Self::take_value) to have that check done for you.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytestream::{ByteInputStream, SegmentChainSource};
    ///
    /// let source = SegmentChainSource::new(vec![vec![1, 0], vec![0, 0]]);
    /// let mut stream = ByteInputStream::new(source);
    ///
    /// let mut value = 0u32;
    /// assert_eq!(stream.read_value(&mut value).unwrap(), 4);
    /// assert_eq!(value, u32::from_ne_bytes([1, 0, 0, 0]));
    /// ```
    pub fn read_value<T: Pod>(&mut self, value: &mut T) -> Result<usize, StreamError<S::Error>> {
        let bytes = bytemuck::bytes_of_mut(value);
        let count = bytes.len();
        self.read_into(Some(bytes), count)
    }

    /// Read a whole `T`, failing if the stream ends first.
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::PrematureEnd`] on a short read.
    pub fn take_value<T: Pod>(&mut self) -> Result<T, StreamError<S::Error>> {
        let mut value = <T as bytemuck::Zeroable>::zeroed();
        let actual = self.read_value(&mut value)?;
        let requested = core::mem::size_of::<T>();
        if actual < requested {
            return Err(ContractViolation::PrematureEnd { requested, actual }.into());
        }
        Ok(value)
    }

    /// Borrow the bytes of the current window without copying.
    ///
    /// - If the window holds at least `count` bytes, they are returned with
    ///   no refill.
    /// - If the window is empty, exactly one refill is attempted; `Ok(None)`
    ///   means end-of-stream.
    ///
    /// The returned slice holds at least `count` bytes and possibly more, and
    /// the stream position does not move; call
    /// [`consume_read_pointer`](Self::consume_read_pointer) afterwards.
    ///
    /// Contiguity is never promised across windows. Asking for more bytes
    /// than a non-empty window holds is a contract violation, as is a refill
    /// that comes back shorter than `count`.
    pub fn get_read_pointer(&mut self, count: usize) -> Result<Option<&[u8]>, StreamError<S::Error>> {
        self.ensure_open()?;

        let available = self.window.available();
        if available == 0 || available < count {
            if available != 0 {
                return Err(ContractViolation::ReadPointerSpansWindow {
                    requested: count,
                    available,
                }
                .into());
            }
            if !self.state.is_exhausted() {
                self.refill()?;
            }
            let actual = self.window.available();
            if actual == 0 {
                return Ok(None);
            }
            if actual < count {
                return Err(ContractViolation::ShortWindow { requested: count, actual }.into());
            }
        }

        Ok(Some(self.window_bytes()?))
    }

    /// Advance past `count` bytes previously returned by `get_read_pointer`.
    ///
    /// # Errors
    ///
    /// Fails with [`ContractViolation::ConsumeBeyondWindow`] if `count`
    /// exceeds what the current window holds.
    pub fn consume_read_pointer(&mut self, count: usize) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        let offset = ContractViolation::advance(self.offset, count)?;
        self.window.advance(count)?;
        self.offset = offset;
        Ok(())
    }

    /// Release the window and refuse every further operation.
    ///
    /// Markers created by this stream become unusable. Closing twice is a
    /// no-op.
    pub fn close(&mut self) {
        if !self.state.is_closed() {
            log_debug!("{} closed at {}", self.id, self.offset);
        }
        self.window = Window::EMPTY;
        self.state = StreamState::Closed;
    }

    fn ensure_open(&self) -> Result<(), ContractViolation> {
        match self.state {
            StreamState::Closed => Err(ContractViolation::StreamClosed),
            StreamState::Failed => Err(ContractViolation::StreamFailed),
            StreamState::Active | StreamState::Exhausted => Ok(()),
        }
    }

    fn window_bytes(&self) -> Result<&[u8], ContractViolation> {
        let memory = self.source.memory();
        memory
            .get(self.window.remaining())
            .ok_or(ContractViolation::WindowOutOfBounds {
                start: self.window.first(),
                len: self.window.len(),
                memory: memory.len(),
            })
    }

    /// Run a source hook and adopt the window it installs.
    fn install<F>(&mut self, hook: F) -> Result<(), StreamError<S::Error>>
    where
        F: FnOnce(&mut S, &mut WindowSlot) -> Result<(), S::Error>,
    {
        let mut slot = WindowSlot::new();
        hook(&mut self.source, &mut slot).map_err(StreamError::Storage)?;
        self.window = slot.take(self.source.memory().len())?;
        Ok(())
    }

    fn refill(&mut self) -> Result<(), StreamError<S::Error>> {
        self.install(|source, slot| source.fetch_next_window(slot))?;
        log_trace!("{} refilled {} bytes at {}", self.id, self.window.len(), self.offset);
        if self.window.available() == 0 {
            log_debug!("{} exhausted at {}", self.id, self.offset);
            self.state = StreamState::Exhausted;
        }
        Ok(())
    }

    /// Copy (or, with no target, discard) up to `count` bytes.
    fn read_into(
        &mut self,
        mut target: Option<&mut [u8]>,
        count: usize,
    ) -> Result<usize, StreamError<S::Error>> {
        self.ensure_open()?;

        let mut copied = 0;
        while copied < count {
            if self.window.available() == 0 {
                if self.state.is_exhausted() {
                    break;
                }
                self.refill()?;
                if self.window.available() == 0 {
                    break;
                }
            }

            let n = (count - copied).min(self.window.available());
            let offset = ContractViolation::advance(self.offset, n)?;
            if let Some(dest) = target.as_deref_mut() {
                let src = &self.window_bytes()?[..n];
                dest[copied..copied + n].copy_from_slice(src);
            }
            self.window.advance(n)?;
            self.offset = offset;
            copied += n;
        }

        Ok(copied)
    }

    /// Jump straight to `target` through the source's random access hook.
    fn position_at(&mut self, target: StreamPosition) -> Result<(), StreamError<S::Error>> {
        let mut slot = WindowSlot::new();
        let skip = self
            .source
            .seek_window(target, &mut slot)
            .map_err(StreamError::Storage)?;
        let mut window = slot.take(self.source.memory().len())?;
        window.advance(skip)?;

        log_trace!("{} positioned at {} ({} bytes into window)", self.id, target, skip);
        self.window = window;
        self.offset = target;
        self.state = StreamState::Active;
        Ok(())
    }

    /// Step back through previous windows until `remaining` more bytes sit
    /// before the cursor. `count` is the whole seek, for error reporting.
    fn rewind_windows(
        &mut self,
        mut remaining: usize,
        count: usize,
    ) -> Result<(), StreamError<S::Error>> {
        loop {
            self.install(|source, slot| source.fetch_previous_window(slot))?;
            let len = self.window.len();
            if remaining <= len {
                self.window.leave_available(remaining)?;
                return Ok(());
            }
            if len == 0 {
                // The source ran out of history the offset says exists.
                return Err(ContractViolation::PrematureEnd {
                    requested: count,
                    actual: count - remaining,
                }
                .into());
            }
            remaining -= len;
        }
    }

    /// Put the stream back at its unchanged offset after the source moved
    /// and then failed.
    ///
    /// A random-access source is simply positioned again. Anything else, or
    /// a second failure, leaves the stream [`StreamState::Failed`].
    fn recover(&mut self, state: StreamState) {
        let offset = self.offset;
        if self
            .source
            .capabilities()
            .contains(SourceCapabilities::RANDOM_ACCESS)
            && self.position_at(offset).is_ok()
        {
            log_debug!("{} restored to {}", self.id, offset);
            self.state = state;
            return;
        }
        log_warn!("{} lost its window at {}", self.id, offset);
        self.window = Window::EMPTY;
        self.state = StreamState::Failed;
    }
}

impl<S: WindowSource> ByteStream for ByteInputStream<S> {
    type Error = S::Error;

    fn stream_id(&self) -> StreamId {
        self.id
    }

    fn offset(&self) -> StreamPosition {
        self.offset
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

impl<S: WindowSource> MarkableStream for ByteInputStream<S> {
    fn seek_forward(&mut self, count: usize) -> Result<(), StreamError<S::Error>> {
        let actual = self.read_into(None, count)?;
        if actual < count {
            return Err(ContractViolation::PrematureEnd { requested: count, actual }.into());
        }
        Ok(())
    }

    fn seek_backward(&mut self, count: usize) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        if count == 0 {
            return Ok(());
        }
        if !self
            .source
            .capabilities()
            .contains(SourceCapabilities::PREVIOUS_WINDOW)
        {
            return Err(ContractViolation::BackwardSeekUnsupported.into());
        }
        let target = self
            .offset
            .backward(count)
            .ok_or(ContractViolation::SeekBeforeStart {
                requested: count,
                offset: self.offset,
            })?;

        let consumed = self.window.consumed();
        if count <= consumed {
            self.window.retreat(count)?;
        } else {
            let state = self.state;
            if let Err(err) = self.rewind_windows(count - consumed, count) {
                self.recover(state);
                return Err(err);
            }
        }

        self.offset = target;
        self.state = StreamState::Active;
        Ok(())
    }

    fn reset(&mut self, marker: &ByteStreamMarker) -> Result<(), StreamError<S::Error>> {
        self.ensure_open()?;
        let target = marker.resolve(self.id)?;
        if target == self.offset {
            return Ok(());
        }
        if self
            .source
            .capabilities()
            .contains(SourceCapabilities::RANDOM_ACCESS)
        {
            let state = self.state;
            let result = self.position_at(target);
            if result.is_err() {
                self.recover(state);
            }
            result
        } else {
            replay_to(self, target)
        }
    }
}
