// src/config/defaults.rs
use crate::config::app::{Batch, Paths};
use std::path::PathBuf;

pub const CONFIG_ENV_VAR: &str = "CYO_CONFIG";
pub const SALT_FILE_ENV_VAR: &str = "CYO_SALT_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "cyo-encrypt.toml";

pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1000;

pub fn default_paths() -> Paths {
    Paths {
        salt_file: None,
        report_dir: PathBuf::from("."),
    }
}

pub fn default_batch() -> Batch {
    Batch {
        progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        exclude: Vec::new(),
    }
}
