// src/file_ops.rs
//! Top-level entry point: one path in, file or directory handled
//!
//! A directory goes to the folder walker; anything else is treated as a
//! single file and goes to the file codec.

use std::path::Path;

use crate::aliases::Salt1024;
use crate::core::{BatchOptions, BatchResult, FileEncryptor, FileOutcome, FolderEncryptor};
use crate::error::Result;
use crate::password::PasswordSource;

/// What [`encrypt_or_decrypt`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    File(FileOutcome),
    Folder(BatchResult),
}

impl Outcome {
    /// False when any file in a batch failed
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::File(_) => true,
            Outcome::Folder(batch) => batch.is_success(),
        }
    }
}

/// Encrypt or decrypt `path`, direction decided per file by its name
pub fn encrypt_or_decrypt(
    path: &Path,
    salt: &Salt1024,
    options: BatchOptions,
    password: &mut dyn PasswordSource,
) -> Result<Outcome> {
    if path.is_dir() {
        let batch = FolderEncryptor::new(salt, options).encrypt_or_decrypt(path, password)?;
        return Ok(Outcome::Folder(batch));
    }

    let outcome = FileEncryptor::new(salt)
        .remember_key(options.remember_key)
        .encrypt_or_decrypt(path, password)?;
    Ok(Outcome::File(outcome))
}
