// src/core/util.rs
//! Small pure helpers shared by the codec, key cache and folder walker
//!
//! Mode detection and every derived file name live here so the naming
//! rules exist in exactly one place.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::consts::{ENCRYPTED_EXTENSION, HEADER_LENGTH, KEY_CACHE_SUFFIX};
use crate::core::crypto::ciphertext_len;
use crate::error::{CoreError, Result};

/// What a file's name says should happen to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypting,
    Decrypting,
}

impl Mode {
    /// Past-tense verb for log lines and tallies
    pub fn past_tense(self) -> &'static str {
        match self {
            Mode::Encrypting => "encrypted",
            Mode::Decrypting => "decrypted",
        }
    }
}

/// True when the name ends in the `.encrypted` marker
pub fn is_encrypted_path(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .ends_with(ENCRYPTED_EXTENSION.as_bytes())
}

pub fn detect_mode(path: &Path) -> Mode {
    if is_encrypted_path(path) {
        Mode::Decrypting
    } else {
        Mode::Encrypting
    }
}

/// `(base, output)` for a source path.
///
/// The base path is the plaintext name: the source itself when encrypting,
/// the source minus the marker when decrypting. Names are handled as raw
/// OS strings, so a decrypted file gets back exactly the name it had.
pub fn resolve_paths(path: &Path, mode: Mode) -> Result<(PathBuf, PathBuf)> {
    match mode {
        Mode::Encrypting => {
            let mut encrypted = OsString::from(path.as_os_str());
            encrypted.push(ENCRYPTED_EXTENSION);
            Ok((path.to_path_buf(), PathBuf::from(encrypted)))
        }
        Mode::Decrypting => {
            let base = strip_marker(path)
                .ok_or_else(|| CoreError::UnsupportedName(path.to_path_buf()))?;
            Ok((base.clone(), base))
        }
    }
}

#[cfg(unix)]
fn strip_marker(path: &Path) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let stem = path
        .as_os_str()
        .as_bytes()
        .strip_suffix(ENCRYPTED_EXTENSION.as_bytes())?;
    Some(PathBuf::from(OsStr::from_bytes(stem)))
}

// Elsewhere only UTF-8 names can be cut without loss
#[cfg(not(unix))]
fn strip_marker(path: &Path) -> Option<PathBuf> {
    path.to_str()?
        .strip_suffix(ENCRYPTED_EXTENSION)
        .map(PathBuf::from)
}

/// Hidden side-car next to `base`: `<dir>/.<filename>.cyoencrypt`
pub fn side_car_path(base: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = base.file_name() {
        name.push(file_name);
    }
    name.push(KEY_CACHE_SUFFIX);
    match base.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// True for key-cache side-car files
pub fn is_side_car(path: &Path) -> bool {
    path.file_name()
        .map(|n| {
            let n = n.as_encoded_bytes();
            n.starts_with(b".") && n.ends_with(KEY_CACHE_SUFFIX.as_bytes())
        })
        .unwrap_or(false)
}

/// On-disk size of an encrypted file holding `plaintext_len` bytes
pub const fn encrypted_file_len(plaintext_len: u64) -> u64 {
    HEADER_LENGTH as u64 + ciphertext_len(plaintext_len)
}
