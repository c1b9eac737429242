// src/salt.rs
//! Installation-wide salt discovery and bootstrap
//!
//! The salt is created once and never changes. Losing it makes every file
//! encrypted under it permanently unrecoverable, so creation is loud.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::{info, warn};

use crate::aliases::Salt1024;
use crate::config::Config;
use crate::consts::{SALT_FILENAME, SALT_SIZE, SALT_SUBFOLDER};
use crate::error::{CoreError, Result};

/// Where the salt in use came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaltSource {
    Configured(PathBuf),
    DataDir(PathBuf),
    ExecutableDir(PathBuf),
    Created(PathBuf),
}

/// Fresh random salt from the OS-seeded generator
pub fn create_salt() -> Salt1024 {
    let mut salt = Salt1024::new([0u8; SALT_SIZE]);
    rand::rng().fill_bytes(salt.expose_secret_mut());
    salt
}

/// Read a salt file, which must hold exactly [`SALT_SIZE`] bytes
pub fn load_salt(path: &Path) -> Result<Salt1024> {
    let bytes = fs::read(path)?;
    if bytes.len() != SALT_SIZE {
        return Err(CoreError::Salt(format!(
            "{} holds {} bytes, expected {SALT_SIZE}",
            path.display(),
            bytes.len()
        )));
    }
    let mut salt = Salt1024::new([0u8; SALT_SIZE]);
    salt.expose_secret_mut().copy_from_slice(&bytes);
    Ok(salt)
}

/// Write a new salt file; refuses to replace an existing one
pub fn save_salt(path: &Path, salt: &Salt1024) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(salt.expose_secret())?;
    file.sync_all()?;
    Ok(())
}

/// Data-dir location the salt is created at when none exists
pub fn default_salt_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(SALT_SUBFOLDER).join(SALT_FILENAME))
}

fn executable_salt_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(SALT_SUBFOLDER).join(SALT_FILENAME))
}

/// Resolve the salt: configured file, data dir, next to the executable,
/// and finally a newly created one in the data dir.
pub fn load_or_create(config: &Config) -> Result<(Salt1024, SaltSource)> {
    if let Some(path) = &config.paths.salt_file {
        return Ok((load_salt(path)?, SaltSource::Configured(path.clone())));
    }

    let data_path = default_salt_path();
    if let Some(path) = data_path.as_ref().filter(|p| p.exists()) {
        return Ok((load_salt(path)?, SaltSource::DataDir(path.clone())));
    }

    if let Some(path) = executable_salt_path().filter(|p| p.exists()) {
        return Ok((load_salt(&path)?, SaltSource::ExecutableDir(path)));
    }

    let path = data_path
        .ok_or_else(|| CoreError::Salt("no data directory to create the salt in".into()))?;
    info!("{SALT_FILENAME} not found, creating...");
    let salt = create_salt();
    save_salt(&path, &salt)?;

    warn!("IMPORTANT: ensure this file is securely backed up: {}", path.display());
    warn!("If it's lost, decryption will not be possible and encrypted files will not be recoverable!");

    Ok((salt, SaltSource::Created(path)))
}
