// src/config/mod.rs
//! Configuration system for cyo-encrypt
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, load_from, Batch, Config, Paths};
pub use defaults::{CONFIG_ENV_VAR, DEFAULT_PROGRESS_INTERVAL_MS, SALT_FILE_ENV_VAR};

mod app;
mod defaults;
