//! [Struct] implementation for [Vec].

use crate::{varint, Error, RangeCfg, Reader, Struct, Writer};

impl<T: Struct> Struct for Vec<T> {
    type Cfg = (RangeCfg, T::Cfg);

    #[inline]
    fn size(&self) -> Option<usize> {
        self.iter().try_fold(varint::size(self.len() as u64), |acc, item| {
            item.size().map(|size| acc + size)
        })
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_varint(self.len() as u64)?;
        for item in self {
            item.write(writer)?;
        }
        Ok(())
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, (range, cfg): &Self::Cfg) -> Result<Self, Error> {
        let offset = reader.offset();
        let len = range.check(reader.read_length()?, offset)?;

        // Reserve no more than what is left. Zero-sized items (`[u8; 0]`) consume no input,
        // so `range` alone bounds how many of them are read.
        let mut vec = Vec::with_capacity(len.min(reader.left()));
        for _ in 0..len {
            vec.push(T::read_cfg(reader, cfg)?);
        }
        Ok(vec)
    }
}
