use std::io;

use crate::{
    error::{Error, Result},
    value::Value,
};

use super::{Buffer, BufferLocation};

/// Reference point of [`BufferWriter::seek`], as with `lseek(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

/// Cursor that encodes values into a [`Buffer`].
///
/// All multi-byte integers are written in network byte order (big-endian).
/// Floating point values are written as their native IEEE-754 bytes.
///
/// With `grow` enabled, writes and seeks past the end of the buffer extend
/// it; otherwise they fail with `InvalidArgument` and leave the position
/// where it was. A failed write may still have grown the buffer.
#[derive(Debug)]
pub struct BufferWriter<'b, 'a> {
    loc: BufferLocation<'b, 'a>,
    grow: bool,
}

impl<'b, 'a> BufferWriter<'b, 'a> {
    pub fn new(buffer: &'b mut Buffer<'a>, index: usize, grow: bool) -> Result<Self> {
        if index > buffer.size() && !grow {
            return Err(Error::InvalidArgument(format!(
                "start offset {} is past the end of a {} byte buffer",
                index,
                buffer.size()
            )));
        }

        Ok(Self {
            loc: BufferLocation::new(buffer, index),
            grow,
        })
    }

    pub fn grow(&self) -> bool {
        self.grow
    }

    pub fn buffer(&self) -> &Buffer<'a> {
        self.loc.buffer()
    }

    pub fn tell(&self) -> usize {
        self.loc.index()
    }

    /// Moves the cursor and returns the new position.
    ///
    /// Seeking past the end of a growable buffer reserves space up to the
    /// byte before the target, like a sparse file; the following write
    /// extends it the rest of the way.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.loc.index(),
            Whence::End => self.loc.buffer().size(),
        };

        let target = i64::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(offset))
            .filter(|target| *target >= 0)
            .and_then(|target| usize::try_from(target).ok())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid seek target, offset: {}, whence: {:?}",
                    offset, whence
                ))
            })?;

        let size = self.loc.buffer().size();
        if target > size {
            if !self.grow {
                return Err(Error::InvalidArgument(format!(
                    "seek target {} is past the end of a {} byte buffer",
                    target, size
                )));
            }
            self.loc.buffer_mut().resize(target - 1)?;
        }

        self.loc.set_index(target);
        Ok(target)
    }

    /// Makes sure `len` bytes fit at the cursor, growing the buffer if
    /// allowed, so that multi-part encoders either write everything or
    /// nothing.
    fn make_room(&mut self, len: usize) -> Result<()> {
        if self.grow {
            let end = self.loc.index().checked_add(len).ok_or_else(|| {
                Error::TooLong(format!(
                    "write end overflows, index: {}, len: {}",
                    self.loc.index(),
                    len
                ))
            })?;
            return self.loc.buffer_mut().resize_if_smaller(end);
        }

        if len > self.loc.remaining() {
            return Err(Error::InvalidArgument(format!(
                "write out of bounds, index: {}, len: {}, size: {}",
                self.loc.index(),
                len,
                self.loc.buffer().size()
            )));
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.grow {
            self.loc.update_and_grow_from_slice(bytes)
        } else {
            self.loc.update_from_slice(bytes)
        }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_s8(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_s16(&mut self, value: i16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_s32(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_s64(&mut self, value: i64) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_bytes(&value.to_ne_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_bytes(&value.to_ne_bytes())
    }

    /// Writes the string followed by a NUL terminator.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.make_room(value.len() + 1)?;
        self.write_bytes(value.as_bytes())?;
        self.write_u8(0)
    }

    /// Writes a 1-byte length prefix and the bytes.
    pub fn write_short_blob(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u8::try_from(bytes.len()).map_err(|_| {
            Error::TooLong(format!("short blob of {} bytes, max: 255", bytes.len()))
        })?;
        self.make_room(bytes.len() + 1)?;
        self.write_u8(len)?;
        self.write_bytes(bytes)
    }

    /// Writes a 2-byte big-endian length prefix and the bytes.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::TooLong(format!("blob of {} bytes, max: 65535", bytes.len()))
        })?;
        self.make_room(bytes.len() + 2)?;
        self.write_u16(len)?;
        self.write_bytes(bytes)
    }

    /// Writes a UNIX timestamp in seconds as a single 64-bit value.
    pub fn write_timestamp(&mut self, secs: i64) -> Result<()> {
        self.write_s64(secs)
    }

    /// Writes seconds and microseconds as two 32-bit values.
    pub fn write_timeval(&mut self, secs: u32, usecs: u32) -> Result<()> {
        let mut bytes = [0_u8; 8];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&usecs.to_be_bytes());
        self.write_bytes(&bytes)
    }

    pub fn write_value(&mut self, value: &Value<'_>) -> Result<()> {
        match *value {
            Value::Boolean(v) => self.write_u8(v as u8),
            Value::U8(v) => self.write_u8(v),
            Value::S8(v) => self.write_s8(v),
            Value::U16(v) => self.write_u16(v),
            Value::S16(v) => self.write_s16(v),
            Value::U32(v) => self.write_u32(v),
            Value::S32(v) => self.write_s32(v),
            Value::U64(v) => self.write_u64(v),
            Value::S64(v) => self.write_s64(v),
            Value::Float(v) => self.write_f32(v),
            Value::Double(v) => self.write_f64(v),
            Value::Char(v) => self.write_u8(v),
            Value::String(v) => self.write_string(v),
            Value::ShortBlob(v) => self.write_short_blob(v),
            Value::Blob(v) => self.write_blob(v),
            Value::UnixTimestamp(v) => self.write_timestamp(v),
            Value::Timeval { secs, usecs } => self.write_timeval(secs, usecs),
        }
    }
}

impl io::Write for BufferWriter<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = if self.grow {
            buf.len()
        } else {
            buf.len().min(self.loc.remaining())
        };
        self.write_bytes(&buf[..len])
            .map_err(io::Error::other)?;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
