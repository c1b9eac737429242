// src/config/app.rs
use super::defaults::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub batch: Batch,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Explicit salt file; when unset the salt is discovered
    pub salt_file: Option<PathBuf>,
    /// Where batch failure reports are written
    pub report_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Batch {
    pub progress_interval_ms: u64,
    /// Directory names always skipped, merged with any given on the command line
    pub exclude: Vec<String>,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Batch {
    fn default() -> Self {
        default_batch()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once, falling back to defaults if the file is missing
pub fn load() -> Result<&'static Config> {
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }

    let config_path =
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = if Path::new(&config_path).exists() {
        load_from(Path::new(&config_path))?
    } else {
        warn!("{config_path} not found, using built-in defaults");
        Config::default()
    };

    if let Some(salt_file) = std::env::var_os(SALT_FILE_ENV_VAR) {
        conf.paths.salt_file = Some(PathBuf::from(salt_file));
    }

    Ok(CONFIG.get_or_init(|| conf))
}

/// Parse a specific config file, bypassing the global cache
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("unable to read {}: {e}", path.display()))
    })?;
    Ok(toml::from_str(&content)?)
}
