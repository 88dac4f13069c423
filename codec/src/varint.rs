//! Variable-length integer encoding and decoding
//!
//! Two independent schemes are provided:
//!
//! - [read]/[write]/[size] implement the marker-byte ("CompactSize") scheme. Values below `0xfd`
//!   are stored in a single byte. Larger values are stored as a marker byte followed by a
//!   little-endian field: `0xfd` for 2 bytes, `0xfe` for 4 bytes and `0xff` for 8 bytes. The
//!   smallest class that fits is always used, and decoding rejects anything larger.
//! - [read2]/[write2]/[size2] implement the base-128 scheme. Each byte carries 7 bits of data
//!   and a "continuation" bit (the most significant bit) indicating that more bytes follow.
//!   Groups are stored most-significant first, and every continuation subtracts one from the
//!   remaining value so that each integer has exactly one encoding.
//!
//! Decoders return the value together with the number of bytes consumed.

use crate::{
    encoding::{self, check},
    error::{Access, Error},
};

const DATA_BITS_PER_BYTE: u32 = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Maximum number of bytes of a base-128 encoded `u64`.
pub const MAX_SIZE2: usize = 10;

const MARKER_U16: u8 = 0xfd;
const MARKER_U32: u8 = 0xfe;
const MARKER_U64: u8 = 0xff;

/// Calculates the number of bytes needed to encode `value` with the marker-byte scheme.
pub fn size(value: u64) -> usize {
    if value < u64::from(MARKER_U16) {
        1
    } else if value <= u64::from(u16::MAX) {
        3
    } else if value <= u64::from(u32::MAX) {
        5
    } else {
        9
    }
}

/// Encodes `value` with the marker-byte scheme at `off`, returning the next offset.
pub fn write(data: &mut [u8], value: u64, off: usize) -> Result<usize, Error> {
    check(data.len(), off, size(value), Access::Write)?;
    match size(value) {
        1 => encoding::write_u8(data, value as u8, off),
        3 => {
            let off = encoding::write_u8(data, MARKER_U16, off)?;
            encoding::write_u16_le(data, value as u16, off)
        }
        5 => {
            let off = encoding::write_u8(data, MARKER_U32, off)?;
            encoding::write_u32_le(data, value as u32, off)
        }
        _ => {
            let off = encoding::write_u8(data, MARKER_U64, off)?;
            encoding::write_u64_le(data, value, off)
        }
    }
}

/// Decodes a marker-byte varint at `off`, returning `(value, size)`.
pub fn read(data: &[u8], off: usize) -> Result<(u64, usize), Error> {
    let marker = encoding::read_u8(data, off)?;
    let (value, size) = match marker {
        MARKER_U16 => (u64::from(encoding::read_u16_le(data, off + 1)?), 3),
        MARKER_U32 => (u64::from(encoding::read_u32_le(data, off + 1)?), 5),
        MARKER_U64 => (encoding::read_u64_le(data, off + 1)?, 9),
        value => return Ok((u64::from(value), 1)),
    };

    // Reject values that fit in a smaller class.
    if self::size(value) != size {
        return Err(Error::NonCanonicalVarint(off));
    }
    Ok((value, size))
}

/// Calculates the number of bytes needed to encode `value` with the base-128 scheme.
pub fn size2(value: u64) -> usize {
    let mut value = value;
    let mut size = 1;
    while value > u64::from(DATA_BITS_MASK) {
        value = (value >> DATA_BITS_PER_BYTE) - 1;
        size += 1;
    }
    size
}

/// Encodes `value` with the base-128 scheme at `off`, returning the next offset.
pub fn write2(data: &mut [u8], value: u64, off: usize) -> Result<usize, Error> {
    let size = size2(value);
    check(data.len(), off, size, Access::Write)?;

    // Groups are produced least-significant first and stored in reverse.
    let mut value = value;
    for (i, byte) in data[off..off + size].iter_mut().rev().enumerate() {
        let continuation = if i == 0 { 0 } else { CONTINUATION_BIT_MASK };
        *byte = (value as u8 & DATA_BITS_MASK) | continuation;
        value = (value >> DATA_BITS_PER_BYTE).wrapping_sub(1);
    }
    Ok(off + size)
}

/// Decodes a base-128 varint at `off`, returning `(value, size)`.
///
/// Fails with [Error::OutOfRange] if the encoded value does not fit in a `u64`.
pub fn read2(data: &[u8], off: usize) -> Result<(u64, usize), Error> {
    let mut value: u64 = 0;
    let mut pos = off;
    loop {
        let byte = encoding::read_u8(data, pos)?;
        pos += 1;

        if value > (u64::MAX >> DATA_BITS_PER_BYTE) {
            return Err(Error::OutOfRange(off));
        }
        value = (value << DATA_BITS_PER_BYTE) | u64::from(byte & DATA_BITS_MASK);

        // If the continuation bit is not set, return.
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok((value, pos - off));
        }
        value = value.checked_add(1).ok_or(Error::OutOfRange(off))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = vec![0u8; size(value)];
        assert_eq!(write(&mut buf, value, 0).unwrap(), buf.len());
        buf
    }

    fn encode2(value: u64) -> Vec<u8> {
        let mut buf = vec![0u8; size2(value)];
        assert_eq!(write2(&mut buf, value, 0).unwrap(), buf.len());
        buf
    }

    #[test]
    fn test_varint_vectors() {
        let cases: [(u64, &str); 8] = [
            (0, "00"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xffff, "fdffff"),
            (0x10000, "fe00000100"),
            (0xffffffff, "feffffffff"),
            (0x100000000, "ff0000000001000000"),
            (u64::MAX, "ffffffffffffffffff"),
        ];
        for (value, expected) in cases {
            let buf = encode(value);
            assert_eq!(hex::encode(&buf), expected);
            assert_eq!(read(&buf, 0).unwrap(), (value, buf.len()));
        }
    }

    #[test]
    fn test_varint2_vectors() {
        let cases: [(u64, &str); 10] = [
            (0, "00"),
            (0x7f, "7f"),
            (0x80, "8000"),
            (0x1234, "a334"),
            (0xffff, "82fe7f"),
            (0x123456, "c7e756"),
            (0x80123456, "86ffc7e756"),
            (0xffffffff, "8efefefe7f"),
            (0x7fffffffffffffff, "fefefefefefefefe7f"),
            (u64::MAX, "80fefefefefefefefe7f"),
        ];
        for (value, expected) in cases {
            let buf = encode2(value);
            assert_eq!(hex::encode(&buf), expected);
            assert_eq!(read2(&buf, 0).unwrap(), (value, buf.len()));
        }
        assert_eq!(size2(u64::MAX), MAX_SIZE2);
    }

    #[test]
    fn test_size_agreement() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            // Spread values across all magnitudes.
            let value = rng.gen::<u64>() >> rng.gen_range(0..64);
            let mut buf = vec![0u8; 16];
            let end = write(&mut buf, value, 3).unwrap();
            assert_eq!(read(&buf, 3).unwrap(), (value, size(value)));
            assert_eq!(end - 3, size(value));

            let end = write2(&mut buf, value, 2).unwrap();
            assert_eq!(read2(&buf, 2).unwrap(), (value, size2(value)));
            assert_eq!(end - 2, size2(value));
        }
    }

    #[test]
    fn test_varint_non_canonical() {
        assert_eq!(
            read(&[0xfd, 0xfc, 0x00], 0),
            Err(Error::NonCanonicalVarint(0))
        );
        assert_eq!(
            read(&[0x00, 0xfe, 0xff, 0xff, 0x00, 0x00], 1),
            Err(Error::NonCanonicalVarint(1))
        );
        assert_eq!(
            read(&[0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0], 0),
            Err(Error::NonCanonicalVarint(0))
        );
    }

    #[test]
    fn test_varint_insufficient_buffer() {
        assert_eq!(read(&[], 0), Err(Error::OutOfBounds(Access::Read, 0)));
        assert_eq!(
            read(&[0xfe, 0x00, 0x00], 0),
            Err(Error::OutOfBounds(Access::Read, 1))
        );
        assert_eq!(read2(&[0x80], 0), Err(Error::OutOfBounds(Access::Read, 1)));

        let mut buf = [0u8; 2];
        assert_eq!(
            write(&mut buf, 0xfd, 0),
            Err(Error::OutOfBounds(Access::Write, 0))
        );
        assert_eq!(
            write2(&mut buf, 0x4080, 0),
            Err(Error::OutOfBounds(Access::Write, 0))
        );
        // Nothing written on failure
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn test_varint2_overflow() {
        // One more than u64::MAX
        let buf = hex::decode("80fefefefefefefeff00").unwrap();
        assert_eq!(read2(&buf, 0), Err(Error::OutOfRange(0)));

        // Too many groups
        let buf = [0xff; 11];
        assert_eq!(read2(&buf, 0), Err(Error::OutOfRange(0)));
    }
}
