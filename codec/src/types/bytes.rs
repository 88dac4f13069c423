//! [Struct] implementations for byte and text types.
//!
//! Both are prefixed with their length as a marker-byte varint. The length is checked against
//! the [RangeCfg] before any bytes are read.

use crate::{varint, Encoding, Error, RangeCfg, Reader, Struct, Writer};
use bytes::Bytes;

impl Struct for Bytes {
    type Cfg = RangeCfg;

    #[inline]
    fn size(&self) -> Option<usize> {
        Some(varint::size(self.len() as u64) + self.len())
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_var_bytes(self)
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, cfg: &RangeCfg) -> Result<Self, Error> {
        let offset = reader.offset();
        let len = cfg.check(reader.read_length()?, offset)?;
        reader.read_bytes(len, false)
    }
}

/// Strings are encoded as UTF-8.
impl Struct for String {
    type Cfg = RangeCfg;

    #[inline]
    fn size(&self) -> Option<usize> {
        Some(varint::size(self.len() as u64) + self.len())
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_var_string(self, Encoding::Utf8)
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, cfg: &RangeCfg) -> Result<Self, Error> {
        let offset = reader.offset();
        let len = cfg.check(reader.read_length()?, offset)?;
        reader.read_string(len, Encoding::Utf8)
    }
}
