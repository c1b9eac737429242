// tests/common.rs
//! Shared test utilities: logging setup, a fixed salt, scratch files

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cyo_encrypt::aliases::Salt1024;
use cyo_encrypt::consts::SALT_SIZE;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

/// Test-friendly logging; call at the start of any test that wants logs
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent
}

/// Deterministic salt: byte `i` is `i * 3`
pub fn test_salt() -> Salt1024 {
    let mut bytes = [0u8; SALT_SIZE];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (i * 3) as u8;
    }
    Salt1024::new(bytes)
}

/// Write `contents` to `dir/name`, creating parent folders
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// `path` with `.encrypted` appended
pub fn encrypted(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".encrypted");
    PathBuf::from(s)
}

/// Every regular file under `dir`, sorted, relative to it
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
