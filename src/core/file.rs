// src/core/file.rs
//! Single-file encryption/decryption
//!
//! One call takes one file from plaintext to `<name>.encrypted` or back:
//! detect the mode from the name, resolve the output path (never
//! overwriting), obtain key material, transform behind the header, verify
//! the output length, then delete the source and update the key cache.
//!
//! A failed transform may leave a partial output file behind. Only an `Ok`
//! return means the output is complete.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aliases::Salt1024;
use crate::consts::HEADER_LENGTH;
use crate::core::crypto::{ciphertext_len, CipherEngine, KeyMaterial};
use crate::core::header::FileHeader;
use crate::core::key_cache::KeyCache;
use crate::core::util::{detect_mode, resolve_paths, Mode};
use crate::error::{CoreError, Direction, HeaderError, Result};
use crate::password::PasswordSource;

/// What a successful call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub mode: Mode,
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bytes in the output file, header included
    pub output_len: u64,
    /// Key material came from the side-car rather than a password
    pub used_saved_key: bool,
    /// Source could not be removed; the output is still authoritative
    pub source_retained: bool,
}

pub struct FileEncryptor<'a> {
    salt: &'a Salt1024,
    remember_key: bool,
    quiet: bool,
}

impl<'a> FileEncryptor<'a> {
    pub fn new(salt: &'a Salt1024) -> Self {
        Self {
            salt,
            remember_key: false,
            quiet: false,
        }
    }

    /// Cache the key beside the file on encryption, and reuse a cached one
    pub fn remember_key(mut self, remember: bool) -> Self {
        self.remember_key = remember;
        self
    }

    /// Log per-file success at debug instead of info
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Encrypt a plaintext file or decrypt a `.encrypted` one
    pub fn encrypt_or_decrypt(
        &self,
        path: &Path,
        password: &mut dyn PasswordSource,
    ) -> Result<FileOutcome> {
        let mode = detect_mode(path);
        let (base, output) = resolve_paths(path, mode)?;
        if output.exists() {
            return Err(CoreError::PathConflict(output));
        }

        let cache = KeyCache::new(self.salt);
        let (material, used_saved_key) = self.resolve_key_material(&cache, &base, mode, password)?;

        let output_len = self.transform_file(path, &output, mode, &material)?;

        if !self.quiet {
            info!("Successfully {}", mode.past_tense());
        } else {
            debug!("{} {}", mode.past_tense(), path.display());
        }

        let source_retained = !delete_source(path);

        match mode {
            Mode::Encrypting if self.remember_key && !used_saved_key => {
                if let Err(e) = cache.save_key(&base, &material) {
                    warn!("unable to save key for {}: {e}", base.display());
                }
            }
            Mode::Encrypting => {}
            Mode::Decrypting => {
                cache.delete_saved_key(&base);
            }
        }

        Ok(FileOutcome {
            mode,
            source: path.to_path_buf(),
            output,
            output_len,
            used_saved_key,
            source_retained,
        })
    }

    fn resolve_key_material(
        &self,
        cache: &KeyCache<'_>,
        base: &Path,
        mode: Mode,
        password: &mut dyn PasswordSource,
    ) -> Result<(KeyMaterial, bool)> {
        if mode == Mode::Encrypting && self.remember_key {
            if let Some(material) = cache.get_saved_key(base) {
                debug!("using saved key for {}", base.display());
                return Ok((material, true));
            }
        }

        let password = password.password(base)?;
        let material = KeyMaterial::derive(password.expose_secret(), self.salt.expose_secret())?;
        Ok((material, false))
    }

    fn transform_file(
        &self,
        input_path: &Path,
        output_path: &Path,
        mode: Mode,
        material: &KeyMaterial,
    ) -> Result<u64> {
        let engine = CipherEngine::new(material)?;

        let input_len = fs::metadata(input_path)?.len();
        let mut input = BufReader::new(File::open(input_path)?);

        // The header is checked before the output exists, so a foreign file
        // leaves nothing behind
        let header = match mode {
            Mode::Encrypting => FileHeader::new(input_len),
            Mode::Decrypting => FileHeader::parse(&mut input)?,
        };

        let output_file = create_new(output_path)?;
        let mut output = BufWriter::new(&output_file);

        let expected_len = match mode {
            Mode::Encrypting => {
                header.write(&mut output)?;
                engine.transform(&mut input, &mut output, Direction::Encrypt)?;
                HEADER_LENGTH as u64 + ciphertext_len(input_len)
            }
            Mode::Decrypting => {
                engine.transform(&mut input, &mut output, Direction::Decrypt)?;
                header.plaintext_len().ok_or(HeaderError::Corrupt)?
            }
        };

        output.flush()?;
        drop(output);
        let actual_len = output_file.metadata()?.len();

        if actual_len != expected_len {
            return Err(CoreError::Corruption {
                expected: expected_len,
                actual: actual_len,
            });
        }
        Ok(actual_len)
    }
}

/// Create the output, failing with `PathConflict` if it appeared meanwhile
fn create_new(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => CoreError::PathConflict(path.to_path_buf()),
            _ => CoreError::Io(e),
        })
}

/// Best-effort removal of the source; true when it is gone
fn delete_source(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("unable to delete original file {}: {e}", path.display());
            false
        }
    }
}
