//! [Struct] implementations for Rust primitive types.
//!
//! All multi-byte integers and floats are little-endian. Structures that need big-endian
//! fields call the `_be` methods of [Writer] and [Reader] directly.

use crate::{Error, Reader, Struct, StructExt, Writer};

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Struct for $type {
            type Cfg = ();

            #[inline]
            fn size(&self) -> Option<usize> {
                Some(std::mem::size_of::<$type>())
            }

            #[inline]
            fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
                writer.$write_method(*self)
            }

            #[inline]
            fn read_cfg(reader: &mut Reader, _: &()) -> Result<Self, Error> {
                reader.$read_method()
            }
        }
    };
}

impl_numeric!(u8, read_u8, write_u8);
impl_numeric!(u16, read_u16_le, write_u16_le);
impl_numeric!(u32, read_u32_le, write_u32_le);
impl_numeric!(u64, read_u64_le, write_u64_le);
impl_numeric!(i8, read_i8, write_i8);
impl_numeric!(i16, read_i16_le, write_i16_le);
impl_numeric!(i32, read_i32_le, write_i32_le);
impl_numeric!(i64, read_i64_le, write_i64_le);
impl_numeric!(f32, read_f32_le, write_f32_le);
impl_numeric!(f64, read_f64_le, write_f64_le);

// Bool implementation
impl Struct for bool {
    type Cfg = ();

    #[inline]
    fn size(&self) -> Option<usize> {
        Some(1)
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_u8(u8::from(*self))
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, _: &()) -> Result<Self, Error> {
        let offset = reader.offset();
        match u8::read(reader)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool(offset)),
        }
    }
}

// Constant-size array implementation
impl<const N: usize> Struct for [u8; N] {
    type Cfg = ();

    #[inline]
    fn size(&self) -> Option<usize> {
        Some(N)
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        writer.write_bytes(self)
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, _: &()) -> Result<Self, Error> {
        let bytes = reader.read_bytes(N, false)?;
        let mut dst = [0; N];
        dst.copy_from_slice(&bytes);
        Ok(dst)
    }
}

// Option implementation
impl<T: Struct> Struct for Option<T> {
    type Cfg = T::Cfg;

    #[inline]
    fn size(&self) -> Option<usize> {
        match self {
            Some(inner) => inner.size().map(|size| 1 + size),
            None => Some(1),
        }
    }

    #[inline]
    fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
        self.is_some().write(writer)?;
        match self {
            Some(inner) => inner.write(writer),
            None => Ok(()),
        }
    }

    #[inline]
    fn read_cfg(reader: &mut Reader, cfg: &Self::Cfg) -> Result<Self, Error> {
        if bool::read(reader)? {
            Ok(Some(T::read_cfg(reader, cfg)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Access;
    use bytes::Bytes;
    use paste::paste;

    macro_rules! impl_num_test {
        ($type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let expected_len = std::mem::size_of::<$type>();
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let encoded = value.encode().unwrap();
                        assert_eq!(encoded.len(), expected_len);
                        assert_eq!(value.size(), Some(expected_len));
                        let decoded = <$type>::decode(encoded).unwrap();
                        assert_eq!(*value, decoded);
                    }
                }
            }
        };
    }
    impl_num_test!(u8);
    impl_num_test!(u16);
    impl_num_test!(u32);
    impl_num_test!(u64);
    impl_num_test!(i8);
    impl_num_test!(i16);
    impl_num_test!(i32);
    impl_num_test!(i64);
    impl_num_test!(f32);
    impl_num_test!(f64);

    #[test]
    fn test_conformity() {
        assert_eq!(true.encode().unwrap(), &[0x01][..]);
        assert_eq!(false.encode().unwrap(), &[0x00][..]);
        assert_eq!((-1i8).encode().unwrap(), &[0xFF][..]);
        assert_eq!(0xABCDu16.encode().unwrap(), &[0xCD, 0xAB][..]);
        assert_eq!((-2i16).encode().unwrap(), &[0xFE, 0xFF][..]);
        assert_eq!(0xABCDEF01u32.encode().unwrap(), &[0x01, 0xEF, 0xCD, 0xAB][..]);
        assert_eq!(
            0x0123456789ABCDEFu64.encode().unwrap(),
            &[0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01][..]
        );
        assert_eq!(1.0f32.encode().unwrap(), 1.0f32.to_le_bytes()[..]);
        assert_eq!((-1.0f64).encode().unwrap(), (-1.0f64).to_le_bytes()[..]);
        assert_eq!([1u8, 2, 3].encode().unwrap(), &[0x01, 0x02, 0x03][..]);
        assert_eq!(Some(42u32).encode().unwrap(), &[0x01, 0x2A, 0x00, 0x00, 0x00][..]);
        assert_eq!(None::<u32>.encode().unwrap(), &[0][..]);
    }

    #[test]
    fn test_bool() {
        assert!(bool::decode(Bytes::from_static(&[1])).unwrap());
        assert!(!bool::decode(Bytes::from_static(&[0])).unwrap());
        assert_eq!(
            bool::decode(Bytes::from_static(&[2])),
            Err(Error::InvalidBool(0))
        );
    }

    #[test]
    fn test_array() {
        let values = [1u8, 2, 3];
        let decoded = <[u8; 3]>::decode(values.encode().unwrap()).unwrap();
        assert_eq!(values, decoded);
        assert_eq!(
            <[u8; 4]>::decode(Bytes::from_static(&[1, 2, 3])),
            Err(Error::OutOfBounds(Access::Read, 0))
        );
        assert_eq!(<[u8; 0]>::decode(Bytes::new()).unwrap(), [0u8; 0]);
    }

    #[test]
    fn test_option() {
        for value in [Some(42u32), None] {
            let encoded = value.encode().unwrap();
            assert_eq!(Some(encoded.len()), value.size());
            assert_eq!(Option::<u32>::decode(encoded).unwrap(), value);
        }
        assert_eq!(
            Option::<u32>::decode(Bytes::from_static(&[3])),
            Err(Error::InvalidBool(0))
        );
    }
}
