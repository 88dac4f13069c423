//! Writers that produce encoded buffers.
//!
//! Two strategies implement the same [Writer] interface:
//!
//! - [StaticWriter] writes into a buffer whose final size is known before the first write.
//! - [BufferWriter] records every write and its size, then allocates the buffer once and
//!   replays the recorded operations when rendered.
//!
//! For the same sequence of calls both produce identical bytes.

use crate::{
    encoding::{self, int_to_uint, Encoding, Endian},
    error::Error,
    HashFn, HASH_SIZE,
};
use paste::paste;

mod deferred;
mod fixed;

pub use deferred::BufferWriter;
pub use fixed::{StaticWriter, POOL_SIZE};

/// A fixed-width value together with its layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    U8(u8),
    I8(i8),
    U16(u16, Endian),
    U24(u32, Endian),
    U32(u32, Endian),
    U40(u64, Endian),
    U48(u64, Endian),
    U56(u64, Endian),
    U64(u64, Endian),
    I16(i16, Endian),
    I24(i32, Endian),
    I32(i32, Endian),
    I40(i64, Endian),
    I48(i64, Endian),
    I56(i64, Endian),
    I64(i64, Endian),
    F32(f32, Endian),
    F64(f64, Endian),
}

impl Scalar {
    /// Number of bytes the value occupies.
    pub fn size(&self) -> usize {
        match self {
            Scalar::U8(_) | Scalar::I8(_) => 1,
            Scalar::U16(..) | Scalar::I16(..) => 2,
            Scalar::U24(..) | Scalar::I24(..) => 3,
            Scalar::U32(..) | Scalar::I32(..) | Scalar::F32(..) => 4,
            Scalar::U40(..) | Scalar::I40(..) => 5,
            Scalar::U48(..) | Scalar::I48(..) => 6,
            Scalar::U56(..) | Scalar::I56(..) => 7,
            Scalar::U64(..) | Scalar::I64(..) | Scalar::F64(..) => 8,
        }
    }

    /// Returns the raw (unsigned) bits and byte order of the value.
    ///
    /// Fails with [Error::OutOfRange] at `offset` if the value does not fit its width.
    fn bits(&self, offset: usize) -> Result<(u64, Endian), Error> {
        let size = self.size();
        let (bits, endian) = match *self {
            Scalar::U8(v) => (u64::from(v), Endian::Little),
            Scalar::I8(v) => (u64::from(v as u8), Endian::Little),
            Scalar::U16(v, e) => (u64::from(v), e),
            Scalar::U24(v, e) | Scalar::U32(v, e) => (u64::from(v), e),
            Scalar::U40(v, e) | Scalar::U48(v, e) | Scalar::U56(v, e) | Scalar::U64(v, e) => {
                (v, e)
            }
            Scalar::I16(v, e) => (int_to_uint(v.into(), size, offset)?, e),
            Scalar::I24(v, e) | Scalar::I32(v, e) => (int_to_uint(v.into(), size, offset)?, e),
            Scalar::I40(v, e) | Scalar::I48(v, e) | Scalar::I56(v, e) | Scalar::I64(v, e) => {
                (int_to_uint(v, size, offset)?, e)
            }
            Scalar::F32(v, e) => (u64::from(v.to_bits()), e),
            Scalar::F64(v, e) => (v.to_bits(), e),
        };
        if size < 8 && bits >> (8 * size) != 0 {
            return Err(Error::OutOfRange(offset));
        }
        Ok((bits, endian))
    }

    /// Checks that the value fits its width without writing it.
    pub fn validate(&self, offset: usize) -> Result<(), Error> {
        self.bits(offset).map(|_| ())
    }

    /// Writes the value into `data` at `off`, returning the next offset.
    pub fn write(&self, data: &mut [u8], off: usize) -> Result<usize, Error> {
        let (bits, endian) = self.bits(off)?;
        encoding::write_uint(data, bits, off, self.size(), endian)
    }
}

// Generates little- and big-endian writers for one scalar type.
macro_rules! write_endian {
    ($name:ident, $variant:ident, $type:ty) => {
        paste! {
            #[doc = concat!("Writes a little-endian `", stringify!($name), "`.")]
            fn [<write_ $name _le>](&mut self, value: $type) -> Result<(), Error> {
                self.write_scalar(Scalar::$variant(value, Endian::Little))
            }

            #[doc = concat!("Writes a big-endian `", stringify!($name), "`.")]
            fn [<write_ $name _be>](&mut self, value: $type) -> Result<(), Error> {
                self.write_scalar(Scalar::$variant(value, Endian::Big))
            }
        }
    };
}

/// Interface shared by [StaticWriter] and [BufferWriter].
///
/// Every method mirrors a [crate::Reader] method and advances the cursor by exactly the
/// number of bytes the value occupies once encoded.
pub trait Writer {
    /// Number of bytes written so far (the cursor position).
    fn offset(&self) -> usize;

    /// Moves the cursor by `off` bytes (positive or negative).
    fn seek(&mut self, off: isize) -> Result<(), Error>;

    /// Writes a fixed-width value.
    fn write_scalar(&mut self, scalar: Scalar) -> Result<(), Error>;

    /// Writes a marker-byte varint (see [crate::varint::write]).
    fn write_varint(&mut self, value: u64) -> Result<(), Error>;

    /// Writes a base-128 varint (see [crate::varint::write2]).
    fn write_varint2(&mut self, value: u64) -> Result<(), Error>;

    /// Writes raw bytes.
    fn write_bytes(&mut self, value: &[u8]) -> Result<(), Error>;

    /// Writes `value` as text, without a length prefix.
    fn write_string(&mut self, value: &str, encoding: Encoding) -> Result<(), Error>;

    /// Hashes everything written so far and writes the first 4 bytes of the digest.
    fn write_checksum(&mut self, hash: HashFn) -> Result<(), Error>;

    /// Writes `size` copies of `value`.
    fn fill(&mut self, value: u8, size: usize) -> Result<(), Error>;

    /// Writes a `u8`.
    fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write_scalar(Scalar::U8(value))
    }

    /// Writes an `i8`.
    fn write_i8(&mut self, value: i8) -> Result<(), Error> {
        self.write_scalar(Scalar::I8(value))
    }

    write_endian!(u16, U16, u16);
    write_endian!(u24, U24, u32);
    write_endian!(u32, U32, u32);
    write_endian!(u40, U40, u64);
    write_endian!(u48, U48, u64);
    write_endian!(u56, U56, u64);
    write_endian!(u64, U64, u64);
    write_endian!(i16, I16, i16);
    write_endian!(i24, I24, i32);
    write_endian!(i32, I32, i32);
    write_endian!(i40, I40, i64);
    write_endian!(i48, I48, i64);
    write_endian!(i56, I56, i64);
    write_endian!(i64, I64, i64);
    write_endian!(f32, F32, f32);
    write_endian!(f64, F64, f64);

    /// Writes raw bytes preceded by their length as a marker-byte varint.
    fn write_var_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        self.write_varint(value.len() as u64)?;
        self.write_bytes(value)
    }

    /// Writes `value[start..end]`.
    fn copy(&mut self, value: &[u8], start: usize, end: usize) -> Result<(), Error> {
        let slice = value
            .get(start..end)
            .ok_or(Error::OutOfBounds(crate::Access::Read, start))?;
        self.write_bytes(slice)
    }

    /// Writes text preceded by its encoded length as a marker-byte varint.
    fn write_var_string(&mut self, value: &str, encoding: Encoding) -> Result<(), Error> {
        encoding.validate(value, self.offset())?;
        self.write_varint(encoding.byte_len(value) as u64)?;
        self.write_string(value, encoding)
    }

    /// Writes text followed by a NUL byte.
    fn write_null_string(&mut self, value: &str, encoding: Encoding) -> Result<(), Error> {
        self.write_string(value, encoding)?;
        self.write_u8(0)
    }

    /// Writes a 32-byte hash.
    fn write_hash(&mut self, value: &[u8]) -> Result<(), Error> {
        if value.len() != HASH_SIZE {
            return Err(Error::InvalidHash(value.len(), self.offset()));
        }
        self.write_bytes(value)
    }

    /// Writes a 32-byte hash given as 64 hex characters.
    fn write_hash_hex(&mut self, value: &str) -> Result<(), Error> {
        if !encoding::is_hash_hex(value) {
            return Err(Error::InvalidHash(value.len() / 2, self.offset()));
        }
        self.write_string(value, Encoding::Hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, Reader};
    use bytes::Bytes;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn checksum(data: &[u8]) -> Vec<u8> {
        let sum = data.iter().fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(*b));
        sum.to_le_bytes().to_vec()
    }

    // Applies the same sequence of calls to any writer.
    fn write_all(writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_u8(0xab)?;
        writer.write_i8(-3)?;
        writer.write_u16_le(0x0102)?;
        writer.write_u24_be(0x030405)?;
        writer.write_u32_le(0xdeadbeef)?;
        writer.write_u40_be(0x01_0203_0405)?;
        writer.write_u48_le(0x0102_0304_0506)?;
        writer.write_u56_be(0x01_0203_0405_0607)?;
        writer.write_u64_le(u64::MAX)?;
        writer.write_i16_be(-2)?;
        writer.write_i24_le(-0x7f_ffff)?;
        writer.write_i32_be(i32::MIN)?;
        writer.write_i40_le(-1)?;
        writer.write_i48_be(0x7fff_ffff_ffff)?;
        writer.write_i56_le(-(1 << 55))?;
        writer.write_i64_be(i64::MIN)?;
        writer.write_f32_le(1.5)?;
        writer.write_f64_be(-0.25)?;
        writer.write_varint(0xfd)?;
        writer.write_varint2(0x4080)?;
        writer.write_var_bytes(&[1, 2, 3])?;
        writer.write_bytes(&[])?;
        writer.copy(&[9, 8, 7, 6], 1, 3)?;
        writer.write_var_string("anything", Encoding::Ascii)?;
        writer.write_string("é", Encoding::Latin1)?;
        writer.write_null_string("nul", Encoding::Utf8)?;
        writer.write_hash(&[7; HASH_SIZE])?;
        writer.write_hash_hex(&"ab".repeat(HASH_SIZE))?;
        writer.fill(0xee, 3)?;
        writer.seek(2)?;
        writer.write_u8(1)?;
        writer.seek(-4)?;
        writer.write_u8(2)?;
        writer.seek(3)?;
        writer.write_checksum(checksum)?;
        Ok(())
    }

    fn measure() -> usize {
        let mut writer = BufferWriter::new();
        write_all(&mut writer).unwrap();
        writer.offset()
    }

    #[test]
    fn test_writers_equivalent() {
        let size = measure();

        let mut deferred = BufferWriter::new();
        write_all(&mut deferred).unwrap();
        let deferred = deferred.render().unwrap();

        let mut fixed = StaticWriter::new(size);
        write_all(&mut fixed).unwrap();
        let fixed = fixed.render().unwrap();

        assert_eq!(deferred.len(), size);
        assert_eq!(deferred, fixed);

        // Pooled buffers produce the same bytes
        let mut pooled = StaticWriter::pool(size);
        write_all(&mut pooled).unwrap();
        assert_eq!(pooled.render().unwrap(), fixed);
    }

    #[test]
    fn test_writers_readable() {
        let mut writer = BufferWriter::new();
        write_all(&mut writer).unwrap();
        let mut reader = Reader::new(writer.render().unwrap());

        assert_eq!(reader.read_u8().unwrap(), 0xab);
        assert_eq!(reader.read_i8().unwrap(), -3);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0102);
        assert_eq!(reader.read_u24_be().unwrap(), 0x030405);
        assert_eq!(reader.read_u32_le().unwrap(), 0xdeadbeef);
        assert_eq!(reader.read_u40_be().unwrap(), 0x01_0203_0405);
        assert_eq!(reader.read_u48_le().unwrap(), 0x0102_0304_0506);
        assert_eq!(reader.read_u56_be().unwrap(), 0x01_0203_0405_0607);
        assert_eq!(reader.read_u64_le().unwrap(), u64::MAX);
        assert_eq!(reader.read_i16_be().unwrap(), -2);
        assert_eq!(reader.read_i24_le().unwrap(), -0x7f_ffff);
        assert_eq!(reader.read_i32_be().unwrap(), i32::MIN);
        assert_eq!(reader.read_i40_le().unwrap(), -1);
        assert_eq!(reader.read_i48_be().unwrap(), 0x7fff_ffff_ffff);
        assert_eq!(reader.read_i56_le().unwrap(), -(1 << 55));
        assert_eq!(reader.read_i64_be().unwrap(), i64::MIN);
        assert_eq!(reader.read_f32_le().unwrap(), 1.5);
        assert_eq!(reader.read_f64_be().unwrap(), -0.25);
        assert_eq!(reader.read_varint().unwrap(), 0xfd);
        assert_eq!(reader.read_varint2().unwrap(), 0x4080);
        assert_eq!(reader.read_var_bytes(false).unwrap(), &[1, 2, 3][..]);
        assert_eq!(reader.read_bytes(2, false).unwrap(), &[8, 7][..]);
        assert_eq!(
            reader.read_var_string(Encoding::Ascii, 8).unwrap(),
            "anything"
        );
        assert_eq!(reader.read_string(1, Encoding::Latin1).unwrap(), "é");
        assert_eq!(reader.read_null_string(Encoding::Utf8).unwrap(), "nul");
        assert_eq!(reader.read_hash().unwrap(), [7; HASH_SIZE]);
        assert_eq!(
            reader.read_hash_str(Encoding::Hex).unwrap(),
            "ab".repeat(HASH_SIZE)
        );
        // Fill overwritten after seeking back, then the zeroed gap
        assert_eq!(reader.read_bytes(3, false).unwrap(), &[0xee, 0xee, 2][..]);
        assert_eq!(reader.read_bytes(3, false).unwrap(), &[0, 0, 1][..]);
        reader.verify_checksum(checksum).unwrap();
        assert_eq!(reader.left(), 0);
    }

    fn replay(writer: &mut impl Writer, ops: &[(Scalar, u64, Vec<u8>)]) {
        for (scalar, value, payload) in ops {
            writer.write_scalar(*scalar).unwrap();
            writer.write_varint(*value).unwrap();
            writer.write_varint2(*value).unwrap();
            writer.write_var_bytes(payload).unwrap();
            writer.write_checksum(checksum).unwrap();
        }
    }

    #[test]
    fn test_random_equivalence() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut ops = Vec::new();
            for _ in 0..rng.gen_range(0..32) {
                let value: u64 = rng.gen::<u64>() >> rng.gen_range(0..64);
                let payload: Vec<u8> = (0..rng.gen_range(0..8)).map(|_| rng.gen()).collect();
                let endian = if rng.gen() { Endian::Little } else { Endian::Big };
                let scalar = match rng.gen_range(0..4) {
                    0 => Scalar::U8(value as u8),
                    1 => Scalar::I32(value as i32, endian),
                    2 => Scalar::U56(value >> 8, endian),
                    _ => Scalar::F64(value as f64, endian),
                };
                ops.push((scalar, value, payload));
            }

            let mut deferred = BufferWriter::new();
            replay(&mut deferred, &ops);
            let size = deferred.offset();
            let deferred = deferred.render().unwrap();
            assert_eq!(deferred.len(), size);

            let mut fixed = StaticWriter::new(size);
            replay(&mut fixed, &ops);
            assert_eq!(fixed.render().unwrap(), deferred);
        }
    }

    #[test]
    fn test_scalar_range() {
        assert_eq!(
            Scalar::U24(0x100_0000, Endian::Little).validate(3),
            Err(Error::OutOfRange(3))
        );
        assert_eq!(
            Scalar::I40(1 << 39, Endian::Big).validate(0),
            Err(Error::OutOfRange(0))
        );
        assert!(Scalar::I40(-(1 << 39), Endian::Big).validate(0).is_ok());
        assert!(Scalar::U64(u64::MAX, Endian::Big).validate(0).is_ok());

        let mut buf = [0u8; 2];
        assert_eq!(Scalar::I16(-2, Endian::Big).write(&mut buf, 0), Ok(2));
        assert_eq!(buf, [0xff, 0xfe]);
        assert_eq!(
            Scalar::U8(1).write(&mut buf, 2),
            Err(Error::OutOfBounds(Access::Write, 2))
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let mut writer = BufferWriter::new();
        writer.write_u8(1).unwrap();
        assert_eq!(writer.write_hash(&[0; 31]), Err(Error::InvalidHash(31, 1)));
        assert_eq!(
            writer.write_hash_hex("abcd"),
            Err(Error::InvalidHash(2, 1))
        );
        assert_eq!(
            writer.write_var_string("ü", Encoding::Ascii),
            Err(Error::InvalidText(Encoding::Ascii, 1))
        );
        assert_eq!(
            writer.copy(&[1, 2, 3], 2, 4),
            Err(Error::OutOfBounds(Access::Read, 2))
        );
        // Nothing recorded by the failed calls
        assert_eq!(writer.offset(), 1);
        assert_eq!(writer.render().unwrap(), Bytes::from_static(&[1]));
    }
}
