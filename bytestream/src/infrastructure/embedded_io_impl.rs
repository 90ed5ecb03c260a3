//! Implementations of embedded_io traits for the byte streams.
//!
//! These let a `ByteInputStream` or `ByteOutputStream` stand in wherever an
//! `embedded_io` reader or writer is expected: a decoder, a `BufRead`
//! line scanner, a formatting writer.

use crate::domain::{
    ByteInputStream, ByteOutputStream, ByteStream, ContractViolation, StreamError, WindowSink,
    WindowSource,
};
use embedded_io::{BufRead, ErrorKind, ErrorType, Read, Write};

// Implement embedded_io::Error so our streams can be used with embedded_io
impl<E: core::error::Error + 'static> embedded_io::Error for StreamError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) => ErrorKind::Other,
            Self::Contract(ContractViolation::SinkWindowTooSmall { .. }) => ErrorKind::WriteZero,
            Self::Contract(ContractViolation::BackwardSeekUnsupported) => ErrorKind::Unsupported,
            Self::Contract(_) => ErrorKind::InvalidInput,
        }
    }
}

impl<S: WindowSource> ErrorType for ByteInputStream<S> {
    type Error = StreamError<S::Error>;
}

impl<S: WindowSource> Read for ByteInputStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_bytes(buf)
    }
}

impl<S: WindowSource> BufRead for ByteInputStream<S> {
    /// The rest of the current window, refilling once if it is empty.
    ///
    /// An empty slice means end-of-stream.
    fn fill_buf(&mut self) -> Result<&[u8], Self::Error> {
        Ok(self.get_read_pointer(0)?.unwrap_or(&[]))
    }

    /// Consume `amt` bytes of the slice returned by `fill_buf`.
    ///
    /// `consume` cannot report errors: consuming more than `fill_buf`
    /// returned leaves the stream where it was and logs the violation.
    fn consume(&mut self, amt: usize) {
        let _ = self.consume_read_pointer(amt);
    }
}

impl<S: WindowSink> ErrorType for ByteOutputStream<S> {
    type Error = StreamError<S::Error>;
}

impl<S: WindowSink> Write for ByteOutputStream<S> {
    /// Write as much of `buf` as the sink takes.
    ///
    /// A short count is returned once some bytes went in; the error only
    /// surfaces when nothing could be written.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let start = self.offset().value();
        match self.write_bytes(buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => match self.offset().value() - start {
                0 => Err(err),
                written => Ok(written as usize),
            },
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        ByteOutputStream::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ByteArraySink, SegmentChainSink, SegmentChainSource};
    use embedded_io::Error as _;

    fn source() -> ByteInputStream<SegmentChainSource> {
        ByteInputStream::new(SegmentChainSource::new(vec![
            b"line one\nli".to_vec(),
            b"ne two\n".to_vec(),
        ]))
    }

    #[test]
    fn test_read_exact_spans_windows() {
        let mut stream = source();
        let mut buf = [0u8; 14];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"line one\nline ");
    }

    #[test]
    fn test_fill_buf_and_consume() {
        let mut stream = source();
        assert_eq!(stream.fill_buf().unwrap(), b"line one\nli");
        stream.consume(9);
        assert_eq!(stream.fill_buf().unwrap(), b"li");
        stream.consume(2);
        assert_eq!(stream.fill_buf().unwrap(), b"ne two\n");
        stream.consume(7);
        assert!(stream.fill_buf().unwrap().is_empty());
    }

    #[test]
    fn test_overlong_consume_is_ignored() {
        let mut stream = source();
        stream.fill_buf().unwrap();
        stream.consume(100);
        assert_eq!(stream.bytes_consumed(), 0);
    }

    #[test]
    fn test_write_all_and_flush() {
        let mut out = ByteOutputStream::new(SegmentChainSink::new(3).unwrap());
        out.write_all(b"hello").unwrap();
        Write::flush(&mut out).unwrap();
        assert_eq!(out.sink().len(), 5);
    }

    #[test]
    fn test_short_write_reports_accepted_bytes() {
        let mut buf = [0u8; 4];
        let mut out = ByteOutputStream::new(ByteArraySink::new(&mut buf));
        assert_eq!(out.write(b"ab").unwrap(), 2);
        assert_eq!(out.write(b"cdef").unwrap(), 2);
        assert_eq!(out.write(b"g").unwrap_err().kind(), ErrorKind::WriteZero);
        out.close().unwrap();
        assert_eq!(out.into_sink().written(), b"abcd");
    }

    #[test]
    fn test_full_sink_maps_to_write_zero() {
        let mut buf = [0u8; 2];
        let mut out = ByteOutputStream::new(ByteArraySink::new(&mut buf));
        let err = out.write_all(b"abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
    }
}
