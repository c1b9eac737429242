// src/core/crypto/mod.rs
//! Pure cryptographic operations with no file naming or side effects
//!
//! Key derivation and the fixed AES-256-CBC/PKCS7 stream transform.
mod cipher;
mod kdf;

pub use cipher::{ciphertext_len, CipherEngine, CipherMode, Padding, CIPHER_MODE, PADDING};
pub use kdf::{create_iv, create_key, KeyMaterial};
