//! [Struct] implementations for tuples.

use crate::{Error, Reader, Struct, Writer};
use paste::paste;

// Tuple implementation
// Each element must have the same configuration type for reading.
macro_rules! impl_struct_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<C, $( [<T $index>]: Struct<Cfg = C> ),*> Struct for ( $( [<T $index>], )* ) {
                type Cfg = C;

                #[inline]
                fn size(&self) -> Option<usize> {
                    Some(0 $( + self.$index.size()? )*)
                }

                #[inline]
                fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
                    $( self.$index.write(writer)?; )*
                    Ok(())
                }

                #[inline]
                fn read_cfg(reader: &mut Reader, cfg: &C) -> Result<Self, Error> {
                    Ok(( $( [<T $index>]::read_cfg(reader, cfg)?, )* ))
                }
            }
        }
    };
}

// Generate implementations for tuple sizes 1 through 12
impl_struct_for_tuple!(0);
impl_struct_for_tuple!(0, 1);
impl_struct_for_tuple!(0, 1, 2);
impl_struct_for_tuple!(0, 1, 2, 3);
impl_struct_for_tuple!(0, 1, 2, 3, 4);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_struct_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
