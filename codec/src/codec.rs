//! Core serialization traits

use crate::{
    encoding::{decode_base64, decode_hex, encode_base64},
    error::Error,
    reader::Reader,
    writer::{BufferWriter, StaticWriter, Writer},
};
use bytes::Bytes;
use tracing::trace;

/// A type that can be written to a [Writer] and read back from a [Reader].
///
/// The `Cfg` associated type configures the read process. For example, it can be used to
/// bound the length of collections when decoding untrusted data. Use `()` for types that do
/// not require configuration (and get [StructExt] for free).
pub trait Struct: Sized {
    /// Configuration passed to [Struct::read_cfg].
    type Cfg;

    /// The exact encoded size of this value, if it can be computed without encoding it.
    ///
    /// When known, [Struct::encode] writes directly into a pooled buffer of this size.
    /// Otherwise it falls back to a [BufferWriter].
    fn size(&self) -> Option<usize> {
        None
    }

    /// Writes this value.
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error>;

    /// Reads a value, consuming the bytes it occupies.
    fn read_cfg(reader: &mut Reader, cfg: &Self::Cfg) -> Result<Self, Error>;

    /// Encodes this value into a new buffer.
    fn encode(&self) -> Result<Bytes, Error> {
        match self.size() {
            Some(size) => {
                trace!(size, "encoding with static writer");
                let mut writer = StaticWriter::pool(size);
                self.write(&mut writer)?;
                writer.render()
            }
            None => {
                let mut writer = BufferWriter::new();
                self.write(&mut writer)?;
                trace!(size = writer.offset(), "encoding with buffer writer");
                writer.render()
            }
        }
    }

    /// Decodes a value from `data`, requiring that every byte is consumed.
    fn decode_cfg(data: impl Into<Bytes>, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut reader = Reader::new(data);
        let value = Self::read_cfg(&mut reader, cfg)?;
        match reader.left() {
            0 => Ok(value),
            left => Err(Error::ExtraData(left, reader.offset())),
        }
    }

    /// Encodes this value as lowercase hex.
    fn to_hex(&self) -> Result<String, Error> {
        Ok(hex::encode(self.encode()?))
    }

    /// Decodes a value from hex (see [Struct::decode_cfg]).
    fn from_hex_cfg(value: &str, cfg: &Self::Cfg) -> Result<Self, Error> {
        Self::decode_cfg(decode_hex(value)?, cfg)
    }

    /// Encodes this value as standard base64.
    fn to_base64(&self) -> Result<String, Error> {
        Ok(encode_base64(&self.encode()?))
    }

    /// Decodes a value from base64 (see [Struct::decode_cfg]).
    fn from_base64_cfg(value: &str, cfg: &Self::Cfg) -> Result<Self, Error> {
        Self::decode_cfg(decode_base64(value)?, cfg)
    }
}

/// Extension trait providing ergonomic read and decode methods for types requiring no
/// configuration.
pub trait StructExt: Struct<Cfg = ()> {
    /// Reads a value using the default `()` config.
    fn read(reader: &mut Reader) -> Result<Self, Error> {
        Self::read_cfg(reader, &())
    }

    /// Decodes a value using the default `()` config.
    fn decode(data: impl Into<Bytes>) -> Result<Self, Error> {
        Self::decode_cfg(data, &())
    }

    /// Decodes a value from hex using the default `()` config.
    fn from_hex(value: &str) -> Result<Self, Error> {
        Self::from_hex_cfg(value, &())
    }

    /// Decodes a value from base64 using the default `()` config.
    fn from_base64(value: &str) -> Result<Self, Error> {
        Self::from_base64_cfg(value, &())
    }
}

impl<T: Struct<Cfg = ()>> StructExt for T {}
