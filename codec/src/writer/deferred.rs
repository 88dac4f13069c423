//! Writer that records operations and renders them into a single allocation.

use super::{Scalar, StaticWriter, Writer};
use crate::{
    encoding::Encoding,
    error::{Access, Error},
    varint, HashFn, CHECKSUM_SIZE,
};
use bytes::Bytes;
use tracing::debug;

/// A recorded write.
#[derive(Clone, Debug)]
enum Op {
    Seek(isize),
    Scalar(Scalar),
    Varint(u64),
    Varint2(u64),
    Bytes(Bytes),
    Str(String, Encoding),
    Checksum(HashFn),
    Fill(u8, usize),
}

impl Op {
    /// Replays the operation onto `writer`.
    fn apply(&self, writer: &mut StaticWriter) -> Result<(), Error> {
        match self {
            Op::Seek(off) => writer.seek(*off),
            Op::Scalar(scalar) => writer.write_scalar(*scalar),
            Op::Varint(value) => writer.write_varint(*value),
            Op::Varint2(value) => writer.write_varint2(*value),
            Op::Bytes(value) => writer.write_bytes(value),
            Op::Str(value, encoding) => writer.write_string(value, *encoding),
            Op::Checksum(hash) => writer.write_checksum(*hash),
            Op::Fill(value, size) => writer.fill(*value, *size),
        }
    }
}

/// Writes without knowing the final size in advance.
///
/// Each call is validated and recorded along with the number of bytes it will occupy.
/// [BufferWriter::render] then allocates exactly that many bytes and replays the
/// recorded calls in order.
#[derive(Clone, Debug, Default)]
pub struct BufferWriter {
    ops: Vec<Op>,
    offset: usize,
}

impl BufferWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: Op, size: usize) -> Result<(), Error> {
        self.offset = self
            .offset
            .checked_add(size)
            .ok_or(Error::OutOfBounds(Access::Write, self.offset))?;
        self.ops.push(op);
        Ok(())
    }

    /// Allocates the final buffer and replays every recorded write into it.
    ///
    /// # Panics
    ///
    /// Panics if the replayed writes do not end exactly at the recorded size.
    pub fn render(self) -> Result<Bytes, Error> {
        let size = self.offset;
        let mut writer = StaticWriter::new(size);
        for op in &self.ops {
            op.apply(&mut writer)?;
        }
        assert_eq!(
            writer.offset(),
            size,
            "replayed writes did not fill the buffer"
        );
        debug!(ops = self.ops.len(), size, "rendered buffer");
        writer.render()
    }
}

impl Writer for BufferWriter {
    fn offset(&self) -> usize {
        self.offset
    }

    fn seek(&mut self, off: isize) -> Result<(), Error> {
        let offset = self
            .offset
            .checked_add_signed(off)
            .ok_or(Error::OutOfBounds(Access::Write, self.offset))?;
        self.ops.push(Op::Seek(off));
        self.offset = offset;
        Ok(())
    }

    fn write_scalar(&mut self, scalar: Scalar) -> Result<(), Error> {
        scalar.validate(self.offset)?;
        self.push(Op::Scalar(scalar), scalar.size())
    }

    fn write_varint(&mut self, value: u64) -> Result<(), Error> {
        self.push(Op::Varint(value), varint::size(value))
    }

    fn write_varint2(&mut self, value: u64) -> Result<(), Error> {
        self.push(Op::Varint2(value), varint::size2(value))
    }

    fn write_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        self.push(Op::Bytes(Bytes::copy_from_slice(value)), value.len())
    }

    fn write_string(&mut self, value: &str, encoding: Encoding) -> Result<(), Error> {
        encoding.validate(value, self.offset)?;
        self.push(Op::Str(value.to_owned(), encoding), encoding.byte_len(value))
    }

    fn write_checksum(&mut self, hash: HashFn) -> Result<(), Error> {
        self.push(Op::Checksum(hash), CHECKSUM_SIZE)
    }

    fn fill(&mut self, value: u8, size: usize) -> Result<(), Error> {
        self.push(Op::Fill(value, size), size)
    }
}
