use crate::error::{Error, Result};

use super::Buffer;

/// A position inside a [`Buffer`].
///
/// The location borrows the buffer exclusively, so no other reference into
/// its storage can survive a reallocation caused by a growing write.
#[derive(Debug)]
pub struct BufferLocation<'b, 'a> {
    buffer: &'b mut Buffer<'a>,
    index: usize,
}

impl<'b, 'a> BufferLocation<'b, 'a> {
    pub fn new(buffer: &'b mut Buffer<'a>, index: usize) -> Self {
        Self { buffer, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn buffer(&self) -> &Buffer<'a> {
        &*self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer<'a> {
        &mut *self.buffer
    }

    /// Bytes between the location and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.size().saturating_sub(self.index)
    }

    /// Copies `src` at the location and moves past it. The buffer is not
    /// grown; writing past its end fails and leaves the location unchanged.
    pub fn update_from_slice(&mut self, src: &[u8]) -> Result<()> {
        if self.index > self.buffer.size() || src.len() > self.remaining() {
            return Err(Error::InvalidArgument(format!(
                "write out of bounds, index: {}, len: {}, size: {}",
                self.index,
                src.len(),
                self.buffer.size()
            )));
        }
        self.buffer.read_into(self.index, src)?;
        self.index += src.len();
        Ok(())
    }

    /// Like [`BufferLocation::update_from_slice`] but grows the buffer first
    /// when `src` does not fit.
    pub fn update_and_grow_from_slice(&mut self, src: &[u8]) -> Result<()> {
        let end = self.index.checked_add(src.len()).ok_or_else(|| {
            Error::TooLong(format!(
                "write end overflows, index: {}, len: {}",
                self.index,
                src.len()
            ))
        })?;
        self.buffer.resize_if_smaller(end)?;
        self.update_from_slice(src)
    }

    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.update_from_slice(&[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_advances() -> anyhow::Result<()> {
        let mut buf = Buffer::new(6)?;
        let mut loc = buf.front();
        loc.update_from_slice(b"abc")?;
        loc.put_u8(b'd')?;
        assert_eq!(loc.index(), 4);
        assert_eq!(loc.remaining(), 2);
        assert!(loc.update_from_slice(b"xyz").is_err());
        assert_eq!(loc.index(), 4);
        assert_eq!(&buf.as_slice()[..4], b"abcd");
        Ok(())
    }

    #[test]
    fn update_and_grow() -> anyhow::Result<()> {
        let mut buf = Buffer::new(0)?;
        let mut loc = buf.location(0);
        loc.update_and_grow_from_slice(b"spam")?;
        loc.update_and_grow_from_slice(b"eggs")?;
        assert_eq!(loc.index(), 8);
        assert_eq!(buf.as_slice(), b"spameggs");
        Ok(())
    }

    #[test]
    fn grow_on_view_fails() {
        let mut data = [0_u8; 2];
        let mut buf = Buffer::view(&mut data);
        let mut loc = buf.location(1);
        assert!(loc.update_and_grow_from_slice(b"ab").is_err());
        assert_eq!(loc.index(), 1);
    }
}
