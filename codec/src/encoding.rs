//! Fixed-width scalar encoding and text conversion.
//!
//! Every function here operates on a plain byte slice at an explicit offset and never touches
//! memory outside `[0, data.len())`. Readers return the decoded value; writers return the offset
//! immediately after the bytes they wrote.
//!
//! Integers are supported for every width from 1 to 8 bytes, signed and unsigned, in both byte
//! orders. Widths that have no native Rust type (24, 40, 48 and 56 bits) are carried in the next
//! larger native type and range-checked on write.

use crate::{
    error::{Access, Error},
    HASH_SIZE,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use paste::paste;
use std::fmt;

/// Byte order of a multi-byte scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Text encoding applied when converting between strings and bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One byte per character, restricted to 7-bit ASCII.
    Ascii,
    /// UTF-8.
    Utf8,
    /// One byte per character, restricted to `U+0000..=U+00FF`.
    #[default]
    Latin1,
    /// Lowercase hexadecimal, two characters per byte.
    Hex,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Ascii => "ascii",
            Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
            Encoding::Hex => "hex",
        };
        f.write_str(name)
    }
}

impl Encoding {
    /// Returns the number of bytes `value` occupies once encoded.
    ///
    /// The result is only meaningful for strings accepted by [Encoding::validate].
    pub fn byte_len(self, value: &str) -> usize {
        match self {
            Encoding::Ascii | Encoding::Latin1 => value.chars().count(),
            Encoding::Utf8 => value.len(),
            Encoding::Hex => value.len() / 2,
        }
    }

    /// Checks that `value` can be represented in this encoding.
    ///
    /// `offset` is the cursor position reported if the check fails.
    pub fn validate(self, value: &str, offset: usize) -> Result<(), Error> {
        let valid = match self {
            Encoding::Ascii => value.is_ascii(),
            Encoding::Utf8 => true,
            Encoding::Latin1 => value.chars().all(|c| u32::from(c) <= 0xff),
            Encoding::Hex => {
                value.len() % 2 == 0 && value.bytes().all(|b| b.is_ascii_hexdigit())
            }
        };
        if !valid {
            return Err(Error::InvalidText(self, offset));
        }
        Ok(())
    }
}

/// Asserts that `size` bytes starting at `off` lie within a buffer of length `len`.
#[inline]
pub(crate) fn check(len: usize, off: usize, size: usize, access: Access) -> Result<(), Error> {
    match off.checked_add(size) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds(access, off)),
    }
}

// Integers span 1 to 8 bytes.
#[inline]
fn check_width(width: usize, off: usize) -> Result<(), Error> {
    match width {
        1..=8 => Ok(()),
        _ => Err(Error::OutOfRange(off)),
    }
}

/// Reads an unsigned integer of `width` bytes.
///
/// Fails with [Error::OutOfRange] unless `width` is between 1 and 8.
pub fn read_uint(data: &[u8], off: usize, width: usize, endian: Endian) -> Result<u64, Error> {
    check_width(width, off)?;
    check(data.len(), off, width, Access::Read)?;
    let bytes = &data[off..off + width];
    let value = match endian {
        Endian::Little => bytes
            .iter()
            .rev()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        Endian::Big => bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
    };
    Ok(value)
}

/// Reads a two's complement signed integer of `width` bytes (1 to 8).
pub fn read_int(data: &[u8], off: usize, width: usize, endian: Endian) -> Result<i64, Error> {
    let value = read_uint(data, off, width, endian)?;
    let shift = 64 - 8 * width as u32;
    Ok(((value << shift) as i64) >> shift)
}

/// Writes an unsigned integer into `width` bytes (1 to 8).
///
/// Fails with [Error::OutOfRange] if `width` is not supported or `value` does not fit.
pub fn write_uint(
    data: &mut [u8],
    value: u64,
    off: usize,
    width: usize,
    endian: Endian,
) -> Result<usize, Error> {
    check_width(width, off)?;
    check(data.len(), off, width, Access::Write)?;
    if width < 8 && value >> (8 * width) != 0 {
        return Err(Error::OutOfRange(off));
    }
    let dst = &mut data[off..off + width];
    for (i, byte) in dst.iter_mut().enumerate() {
        let shift = match endian {
            Endian::Little => 8 * i,
            Endian::Big => 8 * (width - 1 - i),
        };
        *byte = (value >> shift) as u8;
    }
    Ok(off + width)
}

/// Writes a two's complement signed integer into `width` bytes (1 to 8).
///
/// Fails with [Error::OutOfRange] if `width` is not supported or `value` does not fit.
pub fn write_int(
    data: &mut [u8],
    value: i64,
    off: usize,
    width: usize,
    endian: Endian,
) -> Result<usize, Error> {
    write_uint(data, int_to_uint(value, width, off)?, off, width, endian)
}

/// Truncates `value` to its `width`-byte two's complement representation.
pub(crate) fn int_to_uint(value: i64, width: usize, off: usize) -> Result<u64, Error> {
    check_width(width, off)?;
    if width == 8 {
        return Ok(value as u64);
    }
    let bits = 8 * width as u32;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(Error::OutOfRange(off));
    }
    Ok((value as u64) & ((1u64 << bits) - 1))
}

/// Reads a single byte.
#[inline]
pub fn read_u8(data: &[u8], off: usize) -> Result<u8, Error> {
    data.get(off)
        .copied()
        .ok_or(Error::OutOfBounds(Access::Read, off))
}

/// Writes a single byte.
#[inline]
pub fn write_u8(data: &mut [u8], value: u8, off: usize) -> Result<usize, Error> {
    let dst = data
        .get_mut(off)
        .ok_or(Error::OutOfBounds(Access::Write, off))?;
    *dst = value;
    Ok(off + 1)
}

/// Reads a single signed byte.
#[inline]
pub fn read_i8(data: &[u8], off: usize) -> Result<i8, Error> {
    read_u8(data, off).map(|v| v as i8)
}

/// Writes a single signed byte.
#[inline]
pub fn write_i8(data: &mut [u8], value: i8, off: usize) -> Result<usize, Error> {
    write_u8(data, value as u8, off)
}

// Generates `read_{u,i}N_{le,be}` and `write_{u,i}N_{le,be}` for one width.
macro_rules! impl_width {
    ($bits:literal, $utype:ty, $itype:ty) => {
        paste! {
            #[doc = concat!("Reads a little-endian ", stringify!($bits), "-bit unsigned integer.")]
            #[inline]
            pub fn [<read_u $bits _le>](data: &[u8], off: usize) -> Result<$utype, Error> {
                read_uint(data, off, $bits / 8, Endian::Little).map(|v| v as $utype)
            }

            #[doc = concat!("Reads a big-endian ", stringify!($bits), "-bit unsigned integer.")]
            #[inline]
            pub fn [<read_u $bits _be>](data: &[u8], off: usize) -> Result<$utype, Error> {
                read_uint(data, off, $bits / 8, Endian::Big).map(|v| v as $utype)
            }

            #[doc = concat!("Reads a little-endian ", stringify!($bits), "-bit signed integer.")]
            #[inline]
            pub fn [<read_i $bits _le>](data: &[u8], off: usize) -> Result<$itype, Error> {
                read_int(data, off, $bits / 8, Endian::Little).map(|v| v as $itype)
            }

            #[doc = concat!("Reads a big-endian ", stringify!($bits), "-bit signed integer.")]
            #[inline]
            pub fn [<read_i $bits _be>](data: &[u8], off: usize) -> Result<$itype, Error> {
                read_int(data, off, $bits / 8, Endian::Big).map(|v| v as $itype)
            }

            #[doc = concat!("Writes a little-endian ", stringify!($bits), "-bit unsigned integer.")]
            #[inline]
            pub fn [<write_u $bits _le>](
                data: &mut [u8],
                value: $utype,
                off: usize,
            ) -> Result<usize, Error> {
                write_uint(data, value.into(), off, $bits / 8, Endian::Little)
            }

            #[doc = concat!("Writes a big-endian ", stringify!($bits), "-bit unsigned integer.")]
            #[inline]
            pub fn [<write_u $bits _be>](
                data: &mut [u8],
                value: $utype,
                off: usize,
            ) -> Result<usize, Error> {
                write_uint(data, value.into(), off, $bits / 8, Endian::Big)
            }

            #[doc = concat!("Writes a little-endian ", stringify!($bits), "-bit signed integer.")]
            #[inline]
            pub fn [<write_i $bits _le>](
                data: &mut [u8],
                value: $itype,
                off: usize,
            ) -> Result<usize, Error> {
                write_int(data, value.into(), off, $bits / 8, Endian::Little)
            }

            #[doc = concat!("Writes a big-endian ", stringify!($bits), "-bit signed integer.")]
            #[inline]
            pub fn [<write_i $bits _be>](
                data: &mut [u8],
                value: $itype,
                off: usize,
            ) -> Result<usize, Error> {
                write_int(data, value.into(), off, $bits / 8, Endian::Big)
            }
        }
    };
}

impl_width!(16, u16, i16);
impl_width!(24, u32, i32);
impl_width!(32, u32, i32);
impl_width!(40, u64, i64);
impl_width!(48, u64, i64);
impl_width!(56, u64, i64);
impl_width!(64, u64, i64);

/// Reads a little-endian IEEE-754 single.
pub fn read_f32_le(data: &[u8], off: usize) -> Result<f32, Error> {
    read_u32_le(data, off).map(f32::from_bits)
}

/// Reads a big-endian IEEE-754 single.
pub fn read_f32_be(data: &[u8], off: usize) -> Result<f32, Error> {
    read_u32_be(data, off).map(f32::from_bits)
}

/// Reads a little-endian IEEE-754 double.
pub fn read_f64_le(data: &[u8], off: usize) -> Result<f64, Error> {
    read_u64_le(data, off).map(f64::from_bits)
}

/// Reads a big-endian IEEE-754 double.
pub fn read_f64_be(data: &[u8], off: usize) -> Result<f64, Error> {
    read_u64_be(data, off).map(f64::from_bits)
}

/// Writes a little-endian IEEE-754 single.
pub fn write_f32_le(data: &mut [u8], value: f32, off: usize) -> Result<usize, Error> {
    write_u32_le(data, value.to_bits(), off)
}

/// Writes a big-endian IEEE-754 single.
pub fn write_f32_be(data: &mut [u8], value: f32, off: usize) -> Result<usize, Error> {
    write_u32_be(data, value.to_bits(), off)
}

/// Writes a little-endian IEEE-754 double.
pub fn write_f64_le(data: &mut [u8], value: f64, off: usize) -> Result<usize, Error> {
    write_u64_le(data, value.to_bits(), off)
}

/// Writes a big-endian IEEE-754 double.
pub fn write_f64_be(data: &mut [u8], value: f64, off: usize) -> Result<usize, Error> {
    write_u64_be(data, value.to_bits(), off)
}

/// Encodes `value` into `data` at `off`.
///
/// The caller is expected to have validated `value` with [Encoding::validate].
pub fn write_str(
    data: &mut [u8],
    value: &str,
    encoding: Encoding,
    off: usize,
) -> Result<usize, Error> {
    encoding.validate(value, off)?;
    let len = encoding.byte_len(value);
    check(data.len(), off, len, Access::Write)?;
    let dst = &mut data[off..off + len];
    match encoding {
        Encoding::Utf8 => dst.copy_from_slice(value.as_bytes()),
        Encoding::Ascii | Encoding::Latin1 => {
            for (byte, c) in dst.iter_mut().zip(value.chars()) {
                *byte = u32::from(c) as u8;
            }
        }
        Encoding::Hex => {
            hex::decode_to_slice(value, dst).map_err(|_| Error::InvalidHex(off))?;
        }
    }
    Ok(off + len)
}

/// Decodes `len` bytes at `off` as text.
pub fn read_str(data: &[u8], off: usize, len: usize, encoding: Encoding) -> Result<String, Error> {
    check(data.len(), off, len, Access::Read)?;
    let src = &data[off..off + len];
    let value = match encoding {
        Encoding::Ascii => src.iter().map(|b| char::from(b & 0x7f)).collect(),
        Encoding::Latin1 => src.iter().map(|b| char::from(*b)).collect(),
        Encoding::Utf8 => std::str::from_utf8(src)
            .map_err(|e| Error::InvalidText(encoding, off + e.valid_up_to()))?
            .to_owned(),
        Encoding::Hex => hex::encode(src),
    };
    Ok(value)
}

/// Decodes a lowercase or uppercase hex string.
///
/// Rejects odd-length strings and non-hex characters.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, Error> {
    hex::decode(value).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => Error::InvalidHex(index),
        _ => Error::InvalidHex(value.len()),
    })
}

/// Decodes a standard (padded) base64 string.
///
/// Rejects strings longer than the canonical encoding of the decoded bytes.
pub fn decode_base64(value: &str) -> Result<Vec<u8>, Error> {
    let data = BASE64.decode(value).map_err(|e| match e {
        base64::DecodeError::InvalidByte(index, _)
        | base64::DecodeError::InvalidLastSymbol(index, _) => Error::InvalidBase64(index),
        _ => Error::InvalidBase64(value.len()),
    })?;
    if value.len() > base64_len(data.len()) {
        return Err(Error::InvalidBase64(value.len()));
    }
    Ok(data)
}

/// Length of the padded base64 encoding of `size` bytes.
fn base64_len(size: usize) -> usize {
    size.div_ceil(3) * 4
}

/// Encodes bytes as standard (padded) base64.
pub fn encode_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Returns `true` if `value` is the hex form of a hash.
pub(crate) fn is_hash_hex(value: &str) -> bool {
    value.len() == 2 * HASH_SIZE
}
