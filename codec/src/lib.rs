//! Read and write binary wire formats.
//!
//! # Overview
//!
//! A cursor-based serialization library designed to efficiently and safely:
//! - Encode structured data with byte-exact control over layout
//! - Decode untrusted binary input without ever reading out of bounds
//!
//! The building blocks are a bounds-checked [Reader], two [Writer] strategies that produce
//! identical bytes ([StaticWriter] when the encoded size is known up front, [BufferWriter]
//! when it is not), the fixed-width and variable-length integer codecs in [encoding] and
//! [varint], and the [Struct] trait that ties them together.
//!
//! # Supported Layouts
//!
//! - Integers of 1 to 8 bytes, signed and unsigned, little- and big-endian
//! - `f32` and `f64`, little- and big-endian
//! - Two varint schemes: marker-byte ([varint::read]) and base-128 ([varint::read2])
//! - Raw and length-prefixed bytes, text in several [Encoding]s, NUL-terminated text
//! - 32-byte hashes and 4-byte checksums over a scoped range
//!
//! # Example
//!
//! ```
//! use bufio_codec::{Encoding, Error, Reader, Struct, StructExt, Writer};
//!
//! #[derive(Debug, PartialEq)]
//! struct Item {
//!     name: String,
//!     value: u64,
//!     tags: Vec<u8>,
//! }
//!
//! impl Struct for Item {
//!     type Cfg = ();
//!
//!     fn write(&self, writer: &mut impl Writer) -> Result<(), Error> {
//!         writer.write_var_string(&self.name, Encoding::Ascii)?;
//!         writer.write_u64_le(self.value)?;
//!         writer.write_var_bytes(&self.tags)
//!     }
//!
//!     fn read_cfg(reader: &mut Reader, _: &()) -> Result<Self, Error> {
//!         let name = reader.read_var_string(Encoding::Ascii, 64)?;
//!         let value = reader.read_u64_le()?;
//!         let tags = reader.read_var_bytes(false)?.to_vec();
//!         Ok(Self { name, value, tags })
//!     }
//! }
//!
//! let item = Item { name: "anything".into(), value: 66, tags: vec![1, 2] };
//! let hex = item.to_hex().unwrap();
//! assert_eq!(hex, "08616e797468696e674200000000000000020102");
//! assert_eq!(Item::from_hex(&hex).unwrap(), item);
//! ```
//!
//! # Checksums
//!
//! Checksums are computed by a caller-supplied [HashFn]; only the first [CHECKSUM_SIZE]
//! bytes of the digest are used.
//!
//! ```
//! use bufio_codec::{BufferWriter, Reader, Writer};
//!
//! fn digest(data: &[u8]) -> Vec<u8> {
//!     let sum = data.iter().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as u32));
//!     sum.to_le_bytes().to_vec()
//! }
//!
//! let mut writer = BufferWriter::new();
//! writer.write_u32_be(0xdeadbeef).unwrap();
//! writer.write_checksum(digest).unwrap();
//! let data = writer.render().unwrap();
//!
//! let mut reader = Reader::new(data);
//! reader.start();
//! assert_eq!(reader.read_u32_be().unwrap(), 0xdeadbeef);
//! reader.verify_checksum(digest).unwrap();
//! ```

pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod types;
pub mod varint;
pub mod writer;

// Re-export main types and traits
pub use codec::{Struct, StructExt};
pub use config::RangeCfg;
pub use encoding::{Encoding, Endian};
pub use error::{Access, Error};
pub use reader::Reader;
pub use writer::{BufferWriter, Scalar, StaticWriter, Writer, POOL_SIZE};

/// Size of a hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Size of a checksum in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Hash function used to compute checksums.
///
/// The digest must be at least [CHECKSUM_SIZE] bytes long.
pub type HashFn = fn(&[u8]) -> Vec<u8>;
