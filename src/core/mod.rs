// src/core/mod.rs
pub mod crypto;
pub mod file;
pub mod folder;
pub mod header;
pub mod key_cache;
pub mod util;

pub use crypto::{ciphertext_len, CipherEngine, KeyMaterial};
pub use file::{FileEncryptor, FileOutcome};
pub use folder::{BatchOptions, BatchResult, FolderEncryptor};
pub use header::FileHeader;
pub use key_cache::{KeyCache, SaveOutcome};
pub use util::{
    detect_mode, encrypted_file_len, is_encrypted_path, is_side_car, resolve_paths, side_car_path,
    Mode,
};

pub use crate::error::Result;
