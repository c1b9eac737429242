// src/lib.rs
//! cyo-encrypt: password-based file and folder encryption
//!
//! Files are encrypted with AES-256-CBC under a key and IV derived from the
//! user's password and an installation-wide salt, and written as
//! `<name>.encrypted` behind a 28-byte header. Decryption reverses it. The
//! direction is always decided by the file name.

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod error;
pub mod file_ops;
pub mod password;
pub mod salt;

pub use config::load as load_config;
pub use crate::core::{
    BatchOptions, BatchResult, FileEncryptor, FileHeader, FileOutcome, FolderEncryptor, KeyCache,
    KeyMaterial, Mode,
};
pub use error::{CoreError, HeaderError, Result};
pub use file_ops::{encrypt_or_decrypt, Outcome};
pub use password::{FixedPassword, PasswordSource};
pub use salt::{load_or_create as load_or_create_salt, SaltSource};
