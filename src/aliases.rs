// src/aliases.rs
//! Secret buffer types built on secure-gate
//!
//! These are the canonical types used throughout cyo-encrypt. Every one of
//! them zeroizes on drop and needs an explicit `expose_secret()` to read.

pub use secure_gate::{Dynamic, Fixed};

use crate::consts::{BLOCK_SIZE, IV_SIZE, KEY_SIZE, SALT_SIZE};

// Fixed-size secrets
pub type Iv16 = Fixed<[u8; IV_SIZE]>; // derived CBC initialization vector
pub type Aes256Key32 = Fixed<[u8; KEY_SIZE]>; // derived AES-256 key
pub type Block16 = Fixed<[u8; BLOCK_SIZE]>; // one plaintext block in flight
pub type Salt1024 = Fixed<[u8; SALT_SIZE]>; // installation-wide salt

// Dynamic secrets
pub type PasswordBytes = Dynamic<Vec<u8>>; // UTF-8 password, never persisted
