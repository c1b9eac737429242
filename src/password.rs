// src/password.rs
//! Password acquisition seam
//!
//! The codec asks for a password only when it needs fresh key material, so
//! a cached key never triggers a prompt. Interactive prompting lives in the
//! binary; the library ships the fixed-password source used by callers that
//! already hold the secret.

use std::path::Path;

use crate::aliases::PasswordBytes;
use crate::error::Result;

pub trait PasswordSource {
    /// Password bytes for `path`; may prompt, confirm or fail
    fn password(&mut self, path: &Path) -> Result<PasswordBytes>;
}

/// A password supplied up front
pub struct FixedPassword {
    bytes: PasswordBytes,
}

impl FixedPassword {
    pub fn new(password: &str) -> Self {
        Self {
            bytes: PasswordBytes::new(password.as_bytes().to_vec()),
        }
    }
}

impl PasswordSource for FixedPassword {
    fn password(&mut self, _path: &Path) -> Result<PasswordBytes> {
        Ok(PasswordBytes::new(self.bytes.expose_secret().clone()))
    }
}
