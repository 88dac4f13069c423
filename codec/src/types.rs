//! [crate::Struct] implementations for common types.

pub mod bytes;
pub mod primitives;
pub mod tuple;
pub mod vec;
