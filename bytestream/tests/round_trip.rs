//! Write-then-read tests through the shipped backing stores
//!
//! These tests cover:
//! - Fixed-size records written with `write_value` and read with `take_value`
//! - Paged stores with partial last pages and repeated flushes
//! - Segment chains with hard page breaks
//! - The `embedded_io` bridge end to end

use bytemuck::{Pod, Zeroable};
use bytestream::{
    ByteInputStream, ByteOutputStream, ByteStream, ContractViolation, MarkableStream,
    MemoryPageStore, PageConfig, PagedSink, PagedSource, SegmentChainSink,
};
use embedded_io::{BufRead, Read, Write};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Record {
    key: u64,
    value: u32,
    flags: u32,
}

fn records(count: u64) -> Vec<Record> {
    (0..count)
        .map(|i| Record {
            key: i * 7,
            value: (i as u32).wrapping_mul(2_654_435_761),
            flags: (i % 3) as u32,
        })
        .collect()
}

#[test]
fn test_records_through_paged_store() -> anyhow::Result<()> {
    init_logger();
    let config = PageConfig::from_page_size(64)?;
    let written = records(25);

    let mut out = ByteOutputStream::new(PagedSink::new(MemoryPageStore::new(config), config));
    for record in &written {
        out.write_value(record)?;
    }
    out.close()?;
    let store = out.into_sink().into_store();
    assert_eq!(store.as_bytes().len(), 25 * core::mem::size_of::<Record>());

    // 400 bytes in 64-byte pages: records straddle page boundaries
    let mut input = ByteInputStream::new(PagedSource::new(store, config));
    let mut read = Vec::new();
    for _ in 0..written.len() {
        read.push(input.take_value::<Record>()?);
    }
    assert_eq!(read, written);

    let err = input.take_value::<Record>().unwrap_err();
    assert_eq!(
        err.violation(),
        Some(ContractViolation::PrematureEnd { requested: 16, actual: 0 })
    );
    Ok(())
}

#[test]
fn test_paged_reset_after_reading_to_end() -> anyhow::Result<()> {
    init_logger();
    let config = PageConfig::from_page_size(8)?;
    let mut out = ByteOutputStream::new(PagedSink::new(MemoryPageStore::new(config), config));
    out.write_bytes(b"header:")?;
    let mut body = out.new_marker();
    out.mark(&mut body)?;
    out.write_bytes(b"payload bytes")?;
    out.close()?;
    assert_eq!(body.position().map(|p| p.value()), Some(7));

    let store = out.into_sink().into_store();
    let mut input = ByteInputStream::new(PagedSource::new(store, config));
    input.seek_forward(7)?;
    let mut marker = input.new_marker();
    input.mark(&mut marker)?;

    let mut all = Vec::new();
    let mut buf = [0u8; 5];
    loop {
        let n = input.read_bytes(&mut buf)?;
        if n == 0 {
            break;
        }
        all.extend_from_slice(&buf[..n]);
    }
    assert_eq!(all, b"payload bytes");
    assert!(input.state().is_exhausted());

    input.reset(&marker)?;
    let mut again = [0u8; 7];
    assert_eq!(input.read_bytes(&mut again)?, 7);
    assert_eq!(&again, b"payload");
    Ok(())
}

#[test]
fn test_segment_chain_with_page_breaks() -> anyhow::Result<()> {
    init_logger();
    let mut out = ByteOutputStream::new(SegmentChainSink::new(16)?);
    for block in [&b"first"[..], b"second block", b"3"] {
        out.write_bytes(block)?;
        out.hard_page_break()?;
    }
    out.close()?;

    let source = out.into_sink().into_source();
    assert_eq!(source.segments().len(), 3);

    // One segment per block: each block is a single contiguous window
    let mut input = ByteInputStream::new(source);
    let mut blocks = Vec::new();
    while let Some(window) = input.get_read_pointer(0)? {
        let block = String::from_utf8(window.to_vec())?;
        input.consume_read_pointer(block.len())?;
        blocks.push(block);
    }
    assert_eq!(blocks, ["first", "second block", "3"]);
    Ok(())
}

#[test]
fn test_write_pointer_builds_contiguous_frames() -> anyhow::Result<()> {
    init_logger();
    let mut out = ByteOutputStream::new(SegmentChainSink::new(8)?);
    for frame in 0u8..5 {
        let len = usize::from(frame) + 3;
        let room = out.get_write_pointer(len)?;
        room[0] = frame;
        room[1..len].fill(0xaa);
        out.consume_write_pointer(len)?;
    }
    out.close()?;
    assert_eq!(out.offset().value(), 3 + 4 + 5 + 6 + 7);

    let mut input = ByteInputStream::new(out.into_sink().into_source());
    for frame in 0u8..5 {
        let len = usize::from(frame) + 3;
        let mut buf = vec![0u8; len];
        assert_eq!(input.read_bytes(&mut buf)?, len);
        assert_eq!(buf[0], frame);
        assert!(buf[1..].iter().all(|&b| b == 0xaa));
    }
    Ok(())
}

#[test]
fn test_embedded_io_round_trip() -> anyhow::Result<()> {
    init_logger();
    let mut out = ByteOutputStream::new(SegmentChainSink::new(5)?);
    out.write_all(b"alpha\nbeta\ngamma\n")?;
    Write::flush(&mut out)?;
    out.close()?;

    let mut input = ByteInputStream::new(out.into_sink().into_source());
    let mut line = Vec::new();
    let mut lines = Vec::new();
    loop {
        let window = input.fill_buf()?;
        if window.is_empty() {
            break;
        }
        let take = match window.iter().position(|&b| b == b'\n') {
            Some(end) => {
                line.extend_from_slice(&window[..end]);
                lines.push(String::from_utf8(core::mem::take(&mut line))?);
                end + 1
            }
            None => {
                line.extend_from_slice(window);
                window.len()
            }
        };
        input.consume(take);
    }
    assert_eq!(lines, ["alpha", "beta", "gamma"]);

    let mut empty = [0u8; 4];
    assert_eq!(input.read(&mut empty)?, 0);
    Ok(())
}
