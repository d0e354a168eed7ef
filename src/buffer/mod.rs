use std::io::Write;

use crate::{
    checksum::{Checksum, ChecksumType},
    error::{Error, Result},
};

mod dump;
mod location;
mod writer;

pub use dump::{dump_bytes, HexDump};
pub use location::BufferLocation;
pub use writer::{BufferWriter, Whence};

/// Backing memory of a [`Buffer`].
///
/// An owned allocation is a `Vec` whose length is the allocated capacity of
/// the buffer; the logical size is tracked by the buffer itself. A borrowed
/// view has a fixed size and is never grown, shrunk or freed.
#[derive(Debug)]
enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }
}

/// A contiguous byte region of logical `size` inside an allocation of
/// `capacity >= size` bytes.
///
/// Growing an owned buffer doubles its capacity starting from the current
/// size until the request fits, so repeated small appends reallocate only a
/// logarithmic number of times. Shrinking keeps the allocation around for
/// reuse; [`Buffer::truncate`] releases it.
///
/// ```text
///   0                  size             capacity
///   +-------------------+-----------------+
///   |  logical content  |  spare (stale)  |
///   +-------------------+-----------------+
/// ```
#[derive(Debug)]
pub struct Buffer<'a> {
    storage: Storage<'a>,
    size: usize,
}

impl Buffer<'static> {
    /// Allocates an owned buffer of `size` zeroed bytes.
    pub fn new(size: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(size).map_err(|e| {
            Error::OutOfMemory(format!("failed to allocate {} bytes: {}", size, e))
        })?;
        bytes.resize(size, 0);

        Ok(Self {
            storage: Storage::Owned(bytes),
            size,
        })
    }

    /// Allocates an owned buffer holding a copy of the logical content of `src`.
    pub fn copy(src: &Buffer<'_>) -> Result<Self> {
        Self::from_slice(src.as_slice())
    }

    pub fn from_slice(src: &[u8]) -> Result<Self> {
        let mut buf = Self::new(src.len())?;
        buf.as_mut_slice().copy_from_slice(src);
        Ok(buf)
    }
}

impl<'a> Buffer<'a> {
    /// Wraps externally owned memory. The view has a fixed size.
    pub fn view(data: &'a mut [u8]) -> Self {
        let size = data.len();
        Self {
            storage: Storage::Borrowed(data),
            size,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.bytes().len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage.bytes()[..self.size]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let size = self.size;
        &mut self.storage.bytes_mut()[..size]
    }

    pub fn fill(&mut self, byte: u8) {
        self.as_mut_slice().fill(byte);
    }

    pub fn clear(&mut self) {
        self.fill(0);
    }

    /// Sets the logical size to `new_size`.
    ///
    /// Shrinking never reallocates. Growing past the capacity doubles the
    /// capacity starting from the current size until it fits `new_size`
    /// (clamped to `new_size` on overflow). Bytes exposed by growing are not
    /// guaranteed to be zero.
    ///
    /// A failed reallocation leaves the buffer empty with no capacity; it
    /// must not be reused.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        self.ensure_owned("resize")?;

        if new_size > self.capacity() {
            let mut capacity = if self.size == 0 { new_size } else { self.size };
            while capacity < new_size {
                capacity = capacity.checked_mul(2).unwrap_or(new_size);
            }
            self.realloc(capacity)?;
        }

        self.size = new_size;
        Ok(())
    }

    pub fn resize_if_smaller(&mut self, min_size: usize) -> Result<()> {
        if self.size >= min_size {
            return Ok(());
        }
        self.resize(min_size)
    }

    /// Makes sure at least `capacity` bytes are allocated without touching
    /// the logical size.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.ensure_owned("reserve")?;
        self.realloc(capacity)
    }

    /// Releases the allocated memory beyond the logical size.
    pub fn truncate(&mut self) -> Result<()> {
        if self.capacity() == self.size {
            return Ok(());
        }
        let size = self.size;
        match &mut self.storage {
            Storage::Owned(bytes) => {
                bytes.truncate(size);
                bytes.shrink_to_fit();
                Ok(())
            }
            // a view always has capacity == size
            Storage::Borrowed(_) => Ok(()),
        }
    }

    fn ensure_owned(&self, op: &str) -> Result<()> {
        if self.is_owned() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "cannot {} a buffer that views borrowed memory",
                op
            )))
        }
    }

    fn realloc(&mut self, capacity: usize) -> Result<()> {
        let Storage::Owned(bytes) = &mut self.storage else {
            return Err(Error::InvalidArgument(
                "cannot reallocate borrowed memory".to_string(),
            ));
        };

        tracing::trace!(
            "reallocate buffer, size: {}, capacity: {} -> {}",
            self.size,
            bytes.len(),
            capacity
        );

        let additional = capacity.saturating_sub(bytes.len());
        if let Err(e) = bytes.try_reserve_exact(additional) {
            self.storage = Storage::Owned(Vec::new());
            self.size = 0;
            return Err(Error::OutOfMemory(format!(
                "failed to grow buffer to {} bytes: {}",
                capacity, e
            )));
        }
        bytes.resize(capacity, 0);
        Ok(())
    }

    /// Copies `src` into the buffer starting at `index`. The destination
    /// range must lie inside the logical size.
    pub fn read_into(&mut self, index: usize, src: &[u8]) -> Result<()> {
        let end = index
            .checked_add(src.len())
            .filter(|end| *end <= self.size)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "copy out of bounds, index: {}, len: {}, size: {}",
                    index,
                    src.len(),
                    self.size
                ))
            })?;
        self.as_mut_slice()[index..end].copy_from_slice(src);
        Ok(())
    }

    /// Overwrites the content with that of a buffer of the same size.
    pub fn update_from(&mut self, src: &Buffer<'_>) -> Result<()> {
        if src.size() != self.size {
            return Err(Error::InvalidArgument(format!(
                "buffer sizes differ, dest: {}, src: {}",
                self.size,
                src.size()
            )));
        }
        self.as_mut_slice().copy_from_slice(src.as_slice());
        Ok(())
    }

    pub fn location<'b>(&'b mut self, index: usize) -> BufferLocation<'b, 'a> {
        BufferLocation::new(self, index)
    }

    pub fn front<'b>(&'b mut self) -> BufferLocation<'b, 'a> {
        self.location(0)
    }

    /// Checksum of the logical content without its last `skip` bytes.
    pub fn checksum(&self, ty: ChecksumType, skip: usize) -> Result<Checksum> {
        if skip > self.size {
            return Err(Error::InvalidArgument(format!(
                "cannot skip {} bytes of a {} byte buffer",
                skip, self.size
            )));
        }
        Ok(ty.compute(&self.as_slice()[..self.size - skip]))
    }

    /// Stores the checksum of everything but the trailing checksum bytes
    /// into those trailing bytes.
    pub fn update_checksum(&mut self, ty: ChecksumType) -> Result<Checksum> {
        let width = ty.width();
        if self.size < width {
            return Err(Error::InvalidArgument(format!(
                "buffer of {} bytes cannot hold a {} byte checksum",
                self.size, width
            )));
        }

        let chk = self.checksum(ty, width)?;
        let size = self.size;
        self.as_mut_slice()[size - width..].copy_from_slice(&chk);
        Ok(chk)
    }

    pub fn validate_checksum(&self, ty: ChecksumType) -> Result<()> {
        let width = ty.width();
        if width == 0 {
            return Ok(());
        }
        if self.size < width {
            return Err(Error::InvalidArgument(format!(
                "buffer of {} bytes cannot hold a {} byte checksum",
                self.size, width
            )));
        }

        let expected = self.checksum(ty, width)?;
        let found = &self.as_slice()[self.size - width..];
        if expected.as_slice() != found {
            return Err(Error::ChecksumMismatch {
                expected: expected.to_vec(),
                found: found.to_vec(),
            });
        }
        Ok(())
    }

    /// Writes the whole logical content to `sink`; a short write is an error.
    pub fn write_to(&self, sink: &mut impl Write) -> Result<()> {
        sink.write_all(self.as_slice())?;
        Ok(())
    }
}

impl AsRef<[u8]> for Buffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for Buffer<'_> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}
