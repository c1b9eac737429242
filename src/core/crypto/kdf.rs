// src/core/crypto/kdf.rs
//! Deterministic IV and key derivation from (password, salt)
//!
//! Nothing here is random: the same password and salt always give the same
//! IV and key, which is what lets a file be decrypted from the password alone.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Digest, Sha512};

use crate::aliases::{Aes256Key32, Iv16};
use crate::consts::{IV_FILL_BYTE, IV_SIZE, KDF_ITERATIONS, KEY_SIZE};
use crate::error::{CoreError, Result};

/// IV + key pair fed to the cipher
pub struct KeyMaterial {
    pub iv: Iv16,
    pub key: Aes256Key32,
}

impl KeyMaterial {
    /// Derive both halves from a password and the installation salt
    pub fn derive(password: &[u8], salt: &[u8]) -> Result<Self> {
        Ok(Self {
            iv: create_iv(password, salt),
            key: create_key(password, salt)?,
        })
    }

    pub fn new(iv: [u8; IV_SIZE], key: [u8; KEY_SIZE]) -> Self {
        Self {
            iv: Iv16::new(iv),
            key: Aes256Key32::new(key),
        }
    }
}

/// SHA-512 of `password || salt`, folded cyclically by XOR into 16 bytes of 0x55
pub fn create_iv(password: &[u8], salt: &[u8]) -> Iv16 {
    let mut hasher = Sha512::new();
    hasher.update(password);
    hasher.update(salt);
    let digest = hasher.finalize();

    let mut iv = Iv16::new([IV_FILL_BYTE; IV_SIZE]);
    for (index, byte) in digest.iter().enumerate() {
        iv.expose_secret_mut()[index % IV_SIZE] ^= byte;
    }
    iv
}

/// PBKDF2-HMAC-SHA512, 1000 iterations, truncated to 32 bytes
pub fn create_key(password: &[u8], salt: &[u8]) -> Result<Aes256Key32> {
    let mut key = Aes256Key32::new([0u8; KEY_SIZE]);
    pbkdf2::<Hmac<Sha512>>(password, salt, KDF_ITERATIONS, key.expose_secret_mut())
        .map_err(|e| CoreError::Configuration(format!("PBKDF2 failed: {e}")))?;
    Ok(key)
}
