//! Bounds-checked cursor over an immutable input buffer.

use crate::{
    encoding::{self, check, Encoding},
    error::{Access, Error},
    varint, HashFn, CHECKSUM_SIZE, HASH_SIZE,
};
use bytes::Bytes;
use paste::paste;

/// A cursor over an immutable buffer.
///
/// Every read is checked against the end of the buffer and fails with
/// [Error::OutOfBounds] instead of reading past it. Reads that return raw bytes either copy
/// them or return a view sharing the reader's storage (see [Reader::with_zero_copy]). Views
/// are reference counted, so they stay valid after the reader is dropped, but keep the whole
/// source allocation alive for as long as they are held.
///
/// The reader also maintains a stack of scopes (see [Reader::start]) used to measure,
/// extract or checksum the bytes read since a given point.
#[derive(Clone, Debug, Default)]
pub struct Reader {
    data: Bytes,
    offset: usize,
    zero_copy: bool,
    stack: Vec<usize>,
}

// Generates little- and big-endian readers for one scalar type.
macro_rules! read_endian {
    ($name:ident, $type:ty, $width:expr) => {
        paste! {
            #[doc = concat!("Reads a little-endian `", stringify!($name), "`.")]
            #[inline]
            pub fn [<read_ $name _le>](&mut self) -> Result<$type, Error> {
                self.scalar($width, encoding::[<read_ $name _le>])
            }

            #[doc = concat!("Reads a big-endian `", stringify!($name), "`.")]
            #[inline]
            pub fn [<read_ $name _be>](&mut self) -> Result<$type, Error> {
                self.scalar($width, encoding::[<read_ $name _be>])
            }
        }
    };
}

impl Reader {
    /// Creates a reader that copies any bytes it returns.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            zero_copy: false,
            stack: Vec::new(),
        }
    }

    /// Creates a reader that returns views into `data` instead of copies.
    pub fn with_zero_copy(data: impl Into<Bytes>) -> Self {
        Self {
            zero_copy: true,
            ..Self::new(data)
        }
    }

    /// Asserts that `size` more bytes are available.
    pub fn check(&self, size: usize) -> Result<(), Error> {
        check(self.data.len(), self.offset, size, Access::Read)
    }

    /// Total size of the underlying buffer.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes left to read.
    pub fn left(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the cursor by `off` bytes (positive or negative).
    pub fn seek(&mut self, off: isize) -> Result<(), Error> {
        match self.offset.checked_add_signed(off) {
            Some(target) if target <= self.data.len() => {
                self.offset = target;
                Ok(())
            }
            _ => Err(Error::OutOfBounds(Access::Read, self.offset)),
        }
    }

    /// Opens a scope at the current position and returns it.
    pub fn start(&mut self) -> usize {
        self.stack.push(self.offset);
        self.offset
    }

    /// Closes the innermost scope and returns the number of bytes read since it was opened.
    ///
    /// Fails with [Error::OutOfBounds] (leaving the scope open) if the cursor was moved back
    /// before the start of the scope.
    pub fn end(&mut self) -> Result<usize, Error> {
        let start = self.pop()?;
        Ok(self.offset - start)
    }

    /// Closes the innermost scope and returns the bytes read since it was opened.
    ///
    /// The bytes are a view into the buffer if `zero_copy` is set or the reader was created
    /// with [Reader::with_zero_copy], and a copy otherwise.
    pub fn extract(&mut self, zero_copy: bool) -> Result<Bytes, Error> {
        let start = self.pop()?;
        Ok(self.take(start, self.offset, zero_copy))
    }

    /// Releases the buffer and resets the cursor and scope stack.
    pub fn destroy(&mut self) {
        self.data = Bytes::new();
        self.offset = 0;
        self.stack.clear();
    }

    fn pop(&mut self) -> Result<usize, Error> {
        let start = self.scope()?.ok_or(Error::EmptyScope(self.offset))?;
        self.stack.pop();
        Ok(start)
    }

    // Start of the innermost scope, which must not lie past the cursor.
    fn scope(&self) -> Result<Option<usize>, Error> {
        match self.stack.last() {
            Some(&start) if start > self.offset => {
                Err(Error::OutOfBounds(Access::Read, self.offset))
            }
            start => Ok(start.copied()),
        }
    }

    fn take(&self, start: usize, end: usize, zero_copy: bool) -> Bytes {
        if self.zero_copy || zero_copy {
            self.data.slice(start..end)
        } else {
            Bytes::copy_from_slice(&self.data[start..end])
        }
    }

    #[inline]
    fn scalar<T>(
        &mut self,
        width: usize,
        read: impl FnOnce(&[u8], usize) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let value = read(&self.data[..], self.offset)?;
        self.offset += width;
        Ok(value)
    }

    /// Reads a `u8`.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.scalar(1, encoding::read_u8)
    }

    /// Reads an `i8`.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        self.scalar(1, encoding::read_i8)
    }

    read_endian!(u16, u16, 2);
    read_endian!(u24, u32, 3);
    read_endian!(u32, u32, 4);
    read_endian!(u40, u64, 5);
    read_endian!(u48, u64, 6);
    read_endian!(u56, u64, 7);
    read_endian!(u64, u64, 8);
    read_endian!(i16, i16, 2);
    read_endian!(i24, i32, 3);
    read_endian!(i32, i32, 4);
    read_endian!(i40, i64, 5);
    read_endian!(i48, i64, 6);
    read_endian!(i56, i64, 7);
    read_endian!(i64, i64, 8);
    read_endian!(f32, f32, 4);
    read_endian!(f64, f64, 8);

    /// Reads a marker-byte varint (see [varint::read]).
    pub fn read_varint(&mut self) -> Result<u64, Error> {
        let (value, size) = varint::read(&self.data, self.offset)?;
        self.offset += size;
        Ok(value)
    }

    /// Reads a base-128 varint (see [varint::read2]).
    pub fn read_varint2(&mut self) -> Result<u64, Error> {
        let (value, size) = varint::read2(&self.data, self.offset)?;
        self.offset += size;
        Ok(value)
    }

    /// Reads a marker-byte varint that denotes a length.
    pub fn read_length(&mut self) -> Result<usize, Error> {
        let offset = self.offset;
        let len = self.read_varint()?;
        usize::try_from(len).map_err(|_| Error::OutOfRange(offset))
    }

    /// Reads `size` raw bytes.
    pub fn read_bytes(&mut self, size: usize, zero_copy: bool) -> Result<Bytes, Error> {
        self.check(size)?;
        let start = self.offset;
        self.offset += size;
        Ok(self.take(start, self.offset, zero_copy))
    }

    /// Reads varint-prefixed raw bytes.
    pub fn read_var_bytes(&mut self, zero_copy: bool) -> Result<Bytes, Error> {
        let size = self.read_length()?;
        self.read_bytes(size, zero_copy)
    }

    /// Carves out a reader over the next `size` bytes and skips past them.
    ///
    /// The child shares storage with this reader and is positioned at the same absolute
    /// offset, so offsets reported by either reader agree.
    pub fn read_child(&mut self, size: usize) -> Result<Reader, Error> {
        self.check(size)?;
        let end = self.offset + size;
        let child = Reader {
            data: self.data.slice(..end),
            offset: self.offset,
            zero_copy: self.zero_copy,
            stack: Vec::new(),
        };
        self.offset = end;
        Ok(child)
    }

    /// Reads `size` bytes as text.
    pub fn read_string(&mut self, size: usize, encoding: Encoding) -> Result<String, Error> {
        let value = encoding::read_str(&self.data, self.offset, size, encoding)?;
        self.offset += size;
        Ok(value)
    }

    /// Reads varint-prefixed text.
    ///
    /// If `limit` is not zero, a declared length above it fails with [Error::LimitExceeded].
    pub fn read_var_string(&mut self, encoding: Encoding, limit: usize) -> Result<String, Error> {
        let size = self.read_length()?;
        if limit != 0 && size > limit {
            return Err(Error::LimitExceeded {
                len: size,
                limit,
                offset: self.offset,
            });
        }
        self.read_string(size, encoding)
    }

    /// Reads text up to a NUL byte and skips past the terminator.
    pub fn read_null_string(&mut self, encoding: Encoding) -> Result<String, Error> {
        let size = self.data[self.offset..]
            .iter()
            .position(|b| *b == 0)
            .ok_or(Error::MissingTerminator(self.offset))?;
        let value = self.read_string(size, encoding)?;
        self.offset += 1;
        Ok(value)
    }

    /// Reads a 32-byte hash.
    pub fn read_hash(&mut self) -> Result<[u8; HASH_SIZE], Error> {
        self.check(HASH_SIZE)?;
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&self.data[self.offset..self.offset + HASH_SIZE]);
        self.offset += HASH_SIZE;
        Ok(hash)
    }

    /// Reads a 32-byte hash rendered as text.
    pub fn read_hash_str(&mut self, encoding: Encoding) -> Result<String, Error> {
        self.read_string(HASH_SIZE, encoding)
    }

    /// Hashes the bytes from the innermost open scope (or the start of the buffer) up to
    /// the cursor and returns the first 4 bytes of the digest as a little-endian `u32`.
    pub fn create_checksum(&self, hash: HashFn) -> Result<u32, Error> {
        let start = self.scope()?.unwrap_or(0);
        let digest = hash(&self.data[start..self.offset]);
        if digest.len() < CHECKSUM_SIZE {
            return Err(Error::InvalidDigest(digest.len(), self.offset));
        }
        encoding::read_u32_le(&digest, 0)
    }

    /// Computes the checksum (see [Reader::create_checksum]) and compares it against the
    /// next 4 bytes.
    pub fn verify_checksum(&mut self, hash: HashFn) -> Result<u32, Error> {
        let checksum = self.create_checksum(hash)?;
        let expected = self.read_u32_le()?;
        if checksum != expected {
            return Err(Error::ChecksumMismatch(self.offset));
        }
        Ok(checksum)
    }
}
