//! Unibin file format:
//!
//! ```text
//!     +---------+
//!     | Header  |
//!     +---------+
//!     | Block 1 |
//!     +---------+
//!     |   ...   |
//!     +---------+
//!     | Block n |
//!     +---------+
//! ```
//!
//! Header format:
//!
//! ```text
//!     +------------------------------------------------+
//!     | "UNIBIN" 6b | version 1b | checksum type 1b    |
//!     +------------------------------------------------+
//! ```
//!
//! Block format:
//!
//! ```text
//!     +---------------------------------------------------------------+
//!     | ty: 1b | payload len: 2b (BE) | payload | checksum: 0/1/2b    |
//!     +---------------------------------------------------------------+
//! ```
//!
//! The checksum covers the type, the length and the payload. Its width is
//! given by the checksum type in the header.
use std::io::Write;

use bytes::BufMut;

use crate::{
    buffer::Buffer,
    checksum::ChecksumType,
    column::LogColumn,
    error::{Error, Result},
    types::BlockType,
};

pub mod writer;

pub const HEADER_MARKER: &[u8; 6] = b"UNIBIN";
pub const HEADER_SIZE: usize = HEADER_MARKER.len() + 2;
pub const BLOCK_HEADER_SIZE: usize = 3;
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;
pub const MAX_COLUMNS: usize = u8::MAX as usize;

pub fn write_header(sink: &mut impl Write, version: u8, checksum: ChecksumType) -> Result<()> {
    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.put_slice(HEADER_MARKER);
    header.put_u8(version);
    header.put_u8(checksum.into());

    tracing::debug!("write header, version: {}, checksum: {:?}", version, checksum);
    sink.write_all(&header)?;
    Ok(())
}

/// Wraps `payload` into a block and writes it to `sink` with a single call.
/// Nothing reaches the sink if the payload is too long.
pub fn write_block(
    sink: &mut impl Write,
    ty: BlockType,
    payload: &[u8],
    checksum: ChecksumType,
) -> Result<()> {
    let len = u16::try_from(payload.len()).map_err(|_| {
        Error::TooLong(format!(
            "block payload of {} bytes, max: {}",
            payload.len(),
            MAX_PAYLOAD_LEN
        ))
    })?;

    let mut buf = Buffer::new(BLOCK_HEADER_SIZE + payload.len() + checksum.width())?;
    {
        let mut header = &mut buf.as_mut_slice()[..BLOCK_HEADER_SIZE];
        header.put_u8(ty as u8);
        header.put_u16(len);
    }
    buf.read_into(BLOCK_HEADER_SIZE, payload)?;
    buf.update_checksum(checksum)?;

    tracing::debug!(
        "write block, type: {:?}, payload len: {}, checksum: {:?}",
        ty,
        payload.len(),
        checksum
    );
    buf.write_to(sink)
}

pub fn write_block_from_buffer(
    sink: &mut impl Write,
    ty: BlockType,
    payload: &Buffer<'_>,
    checksum: ChecksumType,
) -> Result<()> {
    write_block(sink, ty, payload.as_slice(), checksum)
}

/// Writes `text` as a comment block. No terminator is added.
pub fn write_comment_block(
    sink: &mut impl Write,
    text: &str,
    checksum: ChecksumType,
) -> Result<()> {
    write_block(sink, BlockType::Comment, text.as_bytes(), checksum)
}

/// Writes the column count followed by every column as a log header block.
pub fn write_log_header_block(
    sink: &mut impl Write,
    columns: &[LogColumn],
    checksum: ChecksumType,
) -> Result<()> {
    let payload = encode_log_header(columns)?;
    write_block_from_buffer(sink, BlockType::LogHeader, &payload, checksum)
}

/// Payload of a log header block.
pub fn encode_log_header(columns: &[LogColumn]) -> Result<Buffer<'static>> {
    let count = u8::try_from(columns.len()).map_err(|_| {
        Error::TooLong(format!(
            "{} columns, max: {}",
            columns.len(),
            MAX_COLUMNS
        ))
    })?;

    let capacity = 1 + columns.iter().map(|c| c.encoded_len()).sum::<usize>();
    let mut buf = Buffer::new(0)?;
    buf.reserve(capacity)?;

    let mut loc = buf.front();
    loc.update_and_grow_from_slice(&[count])?;
    for column in columns {
        column.write_to(&mut loc)?;
    }
    drop(loc);

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        types::{DataType, Transform},
    };

    /// Sink that accepts at most `limit` bytes.
    struct LimitedSink {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.limit - self.data.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn header() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_header(&mut out, 1, ChecksumType::Sum)?;
        assert_eq!(out, b"UNIBIN\x01\x01");

        let mut out = Vec::new();
        write_header(&mut out, 42, ChecksumType::Fletcher16)?;
        assert_eq!(out, b"UNIBIN\x2A\x03");
        Ok(())
    }

    #[test]
    fn header_short_write() {
        let mut sink = LimitedSink {
            data: vec![],
            limit: 5,
        };
        let err = write_header(&mut sink, 1, ChecksumType::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
    }

    #[test]
    fn comment_block_with_sum() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_header(&mut out, 1, ChecksumType::Sum)?;
        write_comment_block(&mut out, "hi", ChecksumType::Sum)?;

        let chk = (1_u32 + 0 + 2 + b'h' as u32 + b'i' as u32) % 256;
        let mut expected = b"UNIBIN\x01\x01".to_vec();
        expected.extend_from_slice(&[1, 0x00, 0x02, b'h', b'i', chk as u8]);
        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn block_with_fletcher16_validates() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_block(&mut out, BlockType::Event, b"payload", ChecksumType::Fletcher16)?;
        assert_eq!(out.len(), 3 + 7 + 2);
        assert_eq!(&out[..3], &[4, 0, 7]);

        Buffer::view(&mut out).validate_checksum(ChecksumType::Fletcher16)?;
        Ok(())
    }

    #[test]
    fn payload_too_long() {
        let payload = vec![0_u8; MAX_PAYLOAD_LEN + 1];
        let mut out = Vec::new();
        let err = write_block(&mut out, BlockType::LogEntry, &payload, ChecksumType::Sum)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLong);
        assert!(out.is_empty());

        let payload = vec![0_u8; MAX_PAYLOAD_LEN];
        write_block(&mut out, BlockType::LogEntry, &payload, ChecksumType::None).unwrap();
        assert_eq!(&out[..3], &[3, 0xFF, 0xFF]);
        assert_eq!(out.len(), MAX_PAYLOAD_LEN + 3);
    }

    #[test]
    fn block_short_write() {
        let mut sink = LimitedSink {
            data: vec![],
            limit: 4,
        };
        let err =
            write_comment_block(&mut sink, "a longer comment", ChecksumType::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
    }

    #[test]
    fn log_header_block() -> anyhow::Result<()> {
        let columns = [
            LogColumn::named("lat", DataType::Float),
            LogColumn::named("lon", DataType::Float),
        ];
        let mut out = Vec::new();
        write_log_header_block(&mut out, &columns, ChecksumType::None)?;

        let payload = b"\x02\x03lat\x08\x00\x03lon\x08\x00";
        let mut expected = vec![BlockType::LogHeader as u8, 0, payload.len() as u8];
        expected.extend_from_slice(payload);
        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn log_header_errors() {
        let columns = vec![LogColumn::named("c", DataType::U8); MAX_COLUMNS + 1];
        let mut out = Vec::new();
        let err = write_log_header_block(&mut out, &columns, ChecksumType::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLong);

        let mut column = LogColumn::named("c", DataType::U8);
        column.set_transform(Transform::IfThenElse);
        let err = write_log_header_block(&mut out, &[column], ChecksumType::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
        assert!(out.is_empty());

        let columns = vec![LogColumn::named("c", DataType::U8); MAX_COLUMNS];
        write_log_header_block(&mut out, &columns, ChecksumType::None).unwrap();
        assert_eq!(out[3], 255);
    }
}
