// src/core/header.rs
//! Versioned 28-byte header written in front of every encrypted file
//!
//! | offset | size | field             |
//! |--------|------|-------------------|
//! | 0      | 4    | preamble `CYO\0`  |
//! | 4      | 2    | version major     |
//! | 6      | 2    | version minor     |
//! | 8      | 8    | plaintext length  |
//! | 16     | 8    | reserved (0)      |
//! | 24     | 4    | sentinel `ZZZZ`   |
//!
//! All integers are little-endian. A header whose preamble matches but whose
//! major version differs is rejected as unsupported; every other defect is
//! reported as the same opaque [`HeaderError::Corrupt`].

use std::io::{Read, Write};

use crate::consts::{
    HEADER_LENGTH, HEADER_PREAMBLE, HEADER_RESERVED, HEADER_SENTINEL, HEADER_VERSION_MAJOR,
    HEADER_VERSION_MINOR,
};
use crate::error::{HeaderError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub preamble: [u8; 4],
    pub version_major: u16,
    pub version_minor: u16,
    /// `-1` until the plaintext has been measured
    pub plaintext_length: i64,
    pub reserved: u64,
    pub sentinel: [u8; 4],
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            preamble: *HEADER_PREAMBLE,
            version_major: HEADER_VERSION_MAJOR,
            version_minor: HEADER_VERSION_MINOR,
            plaintext_length: -1,
            reserved: HEADER_RESERVED,
            sentinel: *HEADER_SENTINEL,
        }
    }
}

impl FileHeader {
    /// Current-version header for a plaintext of `plaintext_length` bytes
    pub fn new(plaintext_length: u64) -> Self {
        Self {
            plaintext_length: i64::try_from(plaintext_length).unwrap_or(-1),
            ..Self::default()
        }
    }

    /// Plaintext length once known; `None` while uninitialized
    pub fn plaintext_len(&self) -> Option<u64> {
        u64::try_from(self.plaintext_length).ok()
    }

    pub fn to_bytes(&self) -> Result<[u8; HEADER_LENGTH], HeaderError> {
        if self.plaintext_length < 0 {
            return Err(HeaderError::UninitializedLength);
        }

        let mut buf = Vec::with_capacity(HEADER_LENGTH);
        buf.extend_from_slice(&self.preamble);
        buf.extend_from_slice(&self.version_major.to_le_bytes());
        buf.extend_from_slice(&self.version_minor.to_le_bytes());
        buf.extend_from_slice(&self.plaintext_length.to_le_bytes());
        buf.extend_from_slice(&self.reserved.to_le_bytes());
        buf.extend_from_slice(&self.sentinel);

        <[u8; HEADER_LENGTH]>::try_from(buf.as_slice())
            .map_err(|_| HeaderError::UnexpectedLength(buf.len()))
    }

    /// Serialize in front of the ciphertext; fails while the length is unset
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LENGTH]) -> Result<Self, HeaderError> {
        let header = Self {
            preamble: field(bytes, 0),
            version_major: u16::from_le_bytes(field(bytes, 4)),
            version_minor: u16::from_le_bytes(field(bytes, 6)),
            plaintext_length: i64::from_le_bytes(field(bytes, 8)),
            reserved: u64::from_le_bytes(field(bytes, 16)),
            sentinel: field(bytes, 24),
        };
        header.validate()?;
        Ok(header)
    }

    /// Read and validate exactly one header; a short read counts as corrupt
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self, HeaderError> {
        let mut bytes = [0u8; HEADER_LENGTH];
        reader
            .read_exact(&mut bytes)
            .map_err(|_| HeaderError::Corrupt)?;
        Self::from_bytes(&bytes)
    }

    fn validate(&self) -> Result<(), HeaderError> {
        if self.preamble != *HEADER_PREAMBLE {
            return Err(HeaderError::Corrupt);
        }
        if self.version_major != HEADER_VERSION_MAJOR {
            return Err(HeaderError::UnsupportedVersion {
                major: self.version_major,
                minor: self.version_minor,
            });
        }
        if self.plaintext_length < 0
            || self.reserved != HEADER_RESERVED
            || self.sentinel != *HEADER_SENTINEL
        {
            return Err(HeaderError::Corrupt);
        }
        Ok(())
    }
}

#[inline]
fn field<const N: usize>(bytes: &[u8; HEADER_LENGTH], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}
