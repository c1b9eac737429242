// src/error.rs
//! Public error type for the entire crate

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Which way a stream was being transformed when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// File header failures. `Corrupt` never says which field was wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("file header is invalid or corrupt")]
    Corrupt,

    #[error("unsupported version: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("file header has uninitialized length")]
    UninitializedLength,

    #[error("file header has unexpected length {0}")]
    UnexpectedLength(usize),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The cipher provider does not match the fixed AES-256/CBC/PKCS7 setup
    #[error("cipher configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("unable to {direction} file: {reason}")]
    Transform { direction: Direction, reason: String },

    #[error("output file already exists: {}", .0.display())]
    PathConflict(PathBuf),

    #[error("cannot derive the plaintext name of {}", .0.display())]
    UnsupportedName(PathBuf),

    #[error("transformed file has unexpected length {actual}, expected {expected}")]
    Corruption { expected: u64, actual: u64 },

    #[error("folder cannot contain both plaintext and encrypted files")]
    BatchModeConflict,

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("salt error: {0}")]
    Salt(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
