//! Writer over a pre-sized buffer.

use super::{Scalar, Writer};
use crate::{
    encoding::{self, check, Encoding},
    error::{Access, Error},
    varint, HashFn, CHECKSUM_SIZE,
};
use bytes::{Bytes, BytesMut};
use std::cell::RefCell;
use tracing::trace;

/// Size of the per-thread slab that [StaticWriter::pool] carves buffers from.
pub const POOL_SIZE: usize = 100 * 1024;

thread_local! {
    static POOL: RefCell<BytesMut> = RefCell::new(BytesMut::new());
}

/// Writes directly into a buffer of known size.
///
/// The caller must know the exact encoded size up front (usually from
/// [crate::Struct::size]). Writing past the end fails with [Error::OutOfBounds].
#[derive(Debug)]
pub struct StaticWriter {
    data: BytesMut,
    offset: usize,
}

impl StaticWriter {
    /// Creates a writer over a freshly allocated, zeroed buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self::from_buf(BytesMut::zeroed(size))
    }

    /// Creates a writer over an existing buffer. The cursor starts at 0.
    pub fn from_buf(data: BytesMut) -> Self {
        Self { data, offset: 0 }
    }

    /// Creates a writer over `size` zeroed bytes taken from the thread's pool.
    ///
    /// Requests larger than [POOL_SIZE] are allocated directly. When the pool cannot
    /// satisfy a request, it is replaced with a new slab (buffers already handed out
    /// keep the old one alive).
    pub fn pool(size: usize) -> Self {
        if size > POOL_SIZE {
            return Self::new(size);
        }
        let data = POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < size {
                trace!(size, remaining = pool.len(), "allocated pool");
                *pool = BytesMut::zeroed(POOL_SIZE);
            }
            pool.split_to(size)
        });
        Self::from_buf(data)
    }

    /// Returns the buffer, requiring that every byte has been written.
    ///
    /// Fails with [Error::OutOfBounds] if the cursor is not at the end of the buffer.
    pub fn render(self) -> Result<Bytes, Error> {
        if self.offset != self.data.len() {
            return Err(Error::OutOfBounds(Access::Write, self.offset));
        }
        Ok(self.data.freeze())
    }

    /// Returns the buffer truncated to the cursor.
    pub fn slice(mut self) -> Bytes {
        self.data.truncate(self.offset);
        self.data.freeze()
    }

    fn advance(&mut self, end: usize) {
        self.offset = end;
    }
}

impl Writer for StaticWriter {
    fn offset(&self) -> usize {
        self.offset
    }

    fn seek(&mut self, off: isize) -> Result<(), Error> {
        match self.offset.checked_add_signed(off) {
            Some(offset) if offset <= self.data.len() => {
                self.offset = offset;
                Ok(())
            }
            _ => Err(Error::OutOfBounds(Access::Write, self.offset)),
        }
    }

    fn write_scalar(&mut self, scalar: Scalar) -> Result<(), Error> {
        let end = scalar.write(&mut self.data, self.offset)?;
        self.advance(end);
        Ok(())
    }

    fn write_varint(&mut self, value: u64) -> Result<(), Error> {
        let end = varint::write(&mut self.data, value, self.offset)?;
        self.advance(end);
        Ok(())
    }

    fn write_varint2(&mut self, value: u64) -> Result<(), Error> {
        let end = varint::write2(&mut self.data, value, self.offset)?;
        self.advance(end);
        Ok(())
    }

    fn write_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        check(self.data.len(), self.offset, value.len(), Access::Write)?;
        let end = self.offset + value.len();
        self.data[self.offset..end].copy_from_slice(value);
        self.advance(end);
        Ok(())
    }

    fn write_string(&mut self, value: &str, encoding: Encoding) -> Result<(), Error> {
        let end = encoding::write_str(&mut self.data, value, encoding, self.offset)?;
        self.advance(end);
        Ok(())
    }

    fn write_checksum(&mut self, hash: HashFn) -> Result<(), Error> {
        check(self.data.len(), self.offset, CHECKSUM_SIZE, Access::Write)?;
        let digest = hash(&self.data[..self.offset]);
        let checksum = digest
            .get(..CHECKSUM_SIZE)
            .ok_or(Error::InvalidDigest(digest.len(), self.offset))?;
        self.write_bytes(checksum)
    }

    fn fill(&mut self, value: u8, size: usize) -> Result<(), Error> {
        check(self.data.len(), self.offset, size, Access::Write)?;
        let end = self.offset + size;
        self.data[self.offset..end].fill(value);
        self.advance(end);
        Ok(())
    }
}
