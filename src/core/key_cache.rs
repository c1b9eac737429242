// src/core/key_cache.rs
//! Cached key material in a hidden side-car file
//!
//! When asked to remember the key, encryption writes the derived IV and key
//! to `.<filename>.cyoencrypt` beside the file so the next encryption of the
//! same path can skip the password. Decryption removes the side-car.
//!
//! The payload is AES-encrypted, but under a key derived from the side-car's
//! own file name and the installation salt. Anyone with the salt and
//! filesystem access can recover it. This keeps the cached key out of plain
//! sight; it is obfuscation, not confidentiality.
//!
//! Payload layout before encryption (integers little-endian):
//! `"CYO\x01" | ivLen: i32 | iv | keyLen: i32 | key`

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aliases::Salt1024;
use crate::consts::{IV_SIZE, KEY_CACHE_PAYLOAD_SIZE, KEY_CACHE_PREAMBLE, KEY_SIZE};
use crate::core::crypto::{ciphertext_len, CipherEngine, KeyMaterial};
use crate::core::util::side_car_path;
use crate::error::{Direction, Result};

/// Result of trying to persist a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    AlreadyExists(PathBuf),
}

pub struct KeyCache<'a> {
    salt: &'a Salt1024,
}

impl<'a> KeyCache<'a> {
    pub fn new(salt: &'a Salt1024) -> Self {
        Self { salt }
    }

    /// Encrypted side-car size, the only size accepted on read
    pub const fn expected_size() -> u64 {
        ciphertext_len(KEY_CACHE_PAYLOAD_SIZE as u64)
    }

    /// Persist `material` for `base`. An existing side-car is left alone.
    pub fn save_key(&self, base: &Path, material: &KeyMaterial) -> Result<SaveOutcome> {
        let path = side_car_path(base);
        if path.exists() {
            warn!("key file already exists: {}", path.display());
            return Ok(SaveOutcome::AlreadyExists(path));
        }

        let payload = encode_payload(material);
        let engine = CipherEngine::new(&self.protecting_key(&path)?)?;
        let mut ciphertext = Vec::with_capacity(Self::expected_size() as usize);
        engine.transform(Cursor::new(payload.as_slice()), &mut ciphertext, Direction::Encrypt)?;

        let mut file = open_hidden(&path)?;
        file.write_all(&ciphertext)?;
        file.sync_all()?;

        info!("key saved");
        Ok(SaveOutcome::Saved(path))
    }

    /// Cached material for `base`, or `None` when absent or unusable
    pub fn get_saved_key(&self, base: &Path) -> Option<KeyMaterial> {
        let path = side_car_path(base);
        match self.read_saved_key(&path) {
            Ok(material) => material,
            Err(e) => {
                debug!("ignoring unreadable key file {}: {e}", path.display());
                None
            }
        }
    }

    /// Remove the side-car for `base` if there is one. Never fails.
    pub fn delete_saved_key(&self, base: &Path) -> bool {
        let path = side_car_path(base);
        if !path.exists() {
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("key deleted");
                true
            }
            Err(e) => {
                warn!("unable to delete key file {}: {e}", path.display());
                false
            }
        }
    }

    fn read_saved_key(&self, path: &Path) -> Result<Option<KeyMaterial>> {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(None),
        };
        if size != Self::expected_size() {
            debug!("key file {} has unexpected size {size}", path.display());
            return Ok(None);
        }

        let ciphertext = fs::read(path)?;
        let engine = CipherEngine::new(&self.protecting_key(path)?)?;
        let mut payload = Vec::with_capacity(KEY_CACHE_PAYLOAD_SIZE);
        engine.transform(Cursor::new(ciphertext), &mut payload, Direction::Decrypt)?;

        Ok(decode_payload(&payload))
    }

    /// Key material derived from the side-car's own file name
    fn protecting_key(&self, path: &Path) -> Result<KeyMaterial> {
        let name = path
            .file_name()
            .map(|n| n.as_encoded_bytes())
            .unwrap_or_default();
        KeyMaterial::derive(name, self.salt.expose_secret())
    }
}

fn encode_payload(material: &KeyMaterial) -> Vec<u8> {
    let mut payload = Vec::with_capacity(KEY_CACHE_PAYLOAD_SIZE);
    payload.extend_from_slice(KEY_CACHE_PREAMBLE);
    payload.extend_from_slice(&(IV_SIZE as i32).to_le_bytes());
    payload.extend_from_slice(material.iv.expose_secret());
    payload.extend_from_slice(&(KEY_SIZE as i32).to_le_bytes());
    payload.extend_from_slice(material.key.expose_secret());
    payload
}

fn decode_payload(payload: &[u8]) -> Option<KeyMaterial> {
    if payload.len() != KEY_CACHE_PAYLOAD_SIZE {
        return None;
    }
    let (preamble, rest) = payload.split_at(KEY_CACHE_PREAMBLE.len());
    if preamble != KEY_CACHE_PREAMBLE {
        return None;
    }

    let (iv_len, rest) = rest.split_at(4);
    if i32::from_le_bytes(iv_len.try_into().ok()?) != IV_SIZE as i32 {
        return None;
    }
    let (iv, rest) = rest.split_at(IV_SIZE);

    let (key_len, key) = rest.split_at(4);
    if i32::from_le_bytes(key_len.try_into().ok()?) != KEY_SIZE as i32 {
        return None;
    }

    Some(KeyMaterial::new(iv.try_into().ok()?, key.try_into().ok()?))
}

/// Create the side-car without following an existing file; hidden on Windows,
/// owner-only on Unix where the leading dot already hides it
fn open_hidden(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        options.attributes(FILE_ATTRIBUTE_HIDDEN);
    }
    options.open(path)
}
