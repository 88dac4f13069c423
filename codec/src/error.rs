//! Error types for codec operations

use crate::encoding::Encoding;
use std::fmt;
use thiserror::Error;

/// Direction of a buffer access that crossed a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Error type for codec operations.
///
/// Every variant records the cursor offset at which the failure was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("out of bounds {0} (offset={1})")]
    OutOfBounds(Access, usize),
    #[error("checksum mismatch (offset={0})")]
    ChecksumMismatch(usize),
    #[error("string exceeds limit: {len} > {limit} (offset={offset})")]
    LimitExceeded {
        len: usize,
        limit: usize,
        offset: usize,
    },
    #[error("invalid length: {0} (offset={1})")]
    InvalidLength(usize, usize), // length, offset
    #[error("no NUL terminator (offset={0})")]
    MissingTerminator(usize),
    #[error("invalid hex string (offset={0})")]
    InvalidHex(usize),
    #[error("invalid base64 string (offset={0})")]
    InvalidBase64(usize),
    #[error("invalid {0} text (offset={1})")]
    InvalidText(Encoding, usize),
    #[error("cannot end without a scope (offset={0})")]
    EmptyScope(usize),
    #[error("value out of range (offset={0})")]
    OutOfRange(usize),
    #[error("non-canonical varint (offset={0})")]
    NonCanonicalVarint(usize),
    #[error("invalid hash length: {0} (offset={1})")]
    InvalidHash(usize, usize), // length, offset
    #[error("digest too short: {0} bytes (offset={1})")]
    InvalidDigest(usize, usize), // length, offset
    #[error("invalid bool (offset={0})")]
    InvalidBool(usize),
    #[error("extra data found: {0} bytes (offset={1})")]
    ExtraData(usize, usize), // left, offset
}

impl Error {
    /// Returns the offset at which the error occurred.
    pub fn offset(&self) -> usize {
        match *self {
            Error::OutOfBounds(_, offset)
            | Error::ChecksumMismatch(offset)
            | Error::LimitExceeded { offset, .. }
            | Error::InvalidLength(_, offset)
            | Error::MissingTerminator(offset)
            | Error::InvalidHex(offset)
            | Error::InvalidBase64(offset)
            | Error::InvalidText(_, offset)
            | Error::EmptyScope(offset)
            | Error::OutOfRange(offset)
            | Error::NonCanonicalVarint(offset)
            | Error::InvalidHash(_, offset)
            | Error::InvalidDigest(_, offset)
            | Error::InvalidBool(offset)
            | Error::ExtraData(_, offset) => offset,
        }
    }
}
