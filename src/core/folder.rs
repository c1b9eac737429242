// src/core/folder.rs
//! Batch encryption/decryption of a directory tree
//!
//! A batch is all-plaintext or all-encrypted; a mix is refused before any
//! file is touched. Files are then processed one at a time and each outcome
//! stands alone, so one failure never aborts the rest. Failed paths are
//! listed in a uniquely named report file.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::aliases::Salt1024;
use crate::config::DEFAULT_PROGRESS_INTERVAL_MS;
use crate::consts::{REPORT_PREFIX, REPORT_SUFFIX};
use crate::core::file::FileEncryptor;
use crate::core::util::{is_encrypted_path, is_side_car, Mode};
use crate::error::{CoreError, Result};
use crate::password::PasswordSource;

/// Pre-validated batch options
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub recurse: bool,
    /// Directory names whose contents are skipped
    pub exclude: Vec<String>,
    pub remember_key: bool,
    pub report_dir: PathBuf,
    pub progress_interval: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            recurse: false,
            exclude: Vec::new(),
            remember_key: false,
            report_dir: PathBuf::from("."),
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
        }
    }
}

/// Tally of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// `None` when the directory held no files
    pub mode: Option<Mode>,
    pub completed: usize,
    pub failed: Vec<PathBuf>,
    /// Failure list written to disk, if any file failed
    pub report: Option<PathBuf>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct FolderEncryptor<'a> {
    salt: &'a Salt1024,
    options: BatchOptions,
}

impl<'a> FolderEncryptor<'a> {
    pub fn new(salt: &'a Salt1024, options: BatchOptions) -> Self {
        Self { salt, options }
    }

    pub fn encrypt_or_decrypt(
        &self,
        root: &Path,
        password: &mut dyn PasswordSource,
    ) -> Result<BatchResult> {
        let files = collect_files(root, self.options.recurse, &self.options.exclude)?;
        if files.is_empty() {
            info!("No files found!");
            return Ok(BatchResult::default());
        }

        let mode = ensure_uniform_mode(&files)?;
        Ok(self.process_files(&files, mode, password))
    }

    fn process_files(
        &self,
        files: &[PathBuf],
        mode: Mode,
        password: &mut dyn PasswordSource,
    ) -> BatchResult {
        let encryptor = FileEncryptor::new(self.salt)
            .remember_key(self.options.remember_key)
            .quiet(true);

        let mut result = BatchResult {
            mode: Some(mode),
            ..BatchResult::default()
        };
        let mut remaining = files.len();
        let mut last_progress = Instant::now();

        for file in files {
            match encryptor.encrypt_or_decrypt(file, password) {
                Ok(_) => result.completed += 1,
                Err(e) => {
                    warn!("FAILED {}: {e}", file.display());
                    result.failed.push(file.clone());
                }
            }

            remaining -= 1;
            if last_progress.elapsed() >= self.options.progress_interval {
                info!(remaining, "files remaining");
                last_progress = Instant::now();
            }
        }

        let plural = if result.completed != 1 { "s" } else { "" };
        info!(
            "{} file{plural} successfully {}",
            result.completed,
            mode.past_tense()
        );

        if !result.failed.is_empty() {
            match write_report(&self.options.report_dir, &result.failed) {
                Ok(path) => {
                    let plural = if result.failed.len() != 1 { "s" } else { "" };
                    warn!(
                        "{} error{plural} - see {}",
                        result.failed.len(),
                        path.display()
                    );
                    result.report = Some(path);
                }
                Err(e) => warn!("unable to write error report: {e}"),
            }
        }

        result
    }
}

/// Absolute paths of the files under `root`, minus excluded directories and
/// key-cache side-cars. Only the top level unless `recurse`.
pub fn collect_files(root: &Path, recurse: bool, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root)?;
    let max_depth = if recurse { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).max_depth(max_depth).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_side_car(path) || is_excluded(&root, path, exclude) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

/// True when a directory between `root` and the file matches an excluded name
fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let Some(dir) = path.parent() else {
        return false;
    };
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative.components().any(|c| match c {
        Component::Normal(name) => exclude.iter().any(|e| name == e.as_str()),
        _ => false,
    })
}

/// The single mode shared by every file, or `BatchModeConflict`
pub fn ensure_uniform_mode(files: &[PathBuf]) -> Result<Mode> {
    let mut plaintext = false;
    let mut encrypted = false;

    for file in files {
        if is_encrypted_path(file) {
            encrypted = true;
        } else {
            plaintext = true;
        }
        if encrypted && plaintext {
            return Err(CoreError::BatchModeConflict);
        }
    }

    Ok(if encrypted {
        Mode::Decrypting
    } else {
        Mode::Encrypting
    })
}

/// Write failed paths, one per line, to a fresh `errors_<random>.txt`
fn write_report(dir: &Path, failed: &[PathBuf]) -> std::io::Result<PathBuf> {
    let mut report = tempfile::Builder::new()
        .prefix(REPORT_PREFIX)
        .suffix(REPORT_SUFFIX)
        .tempfile_in(dir)?;

    for path in failed {
        writeln!(report, "{}", path.display())?;
    }
    report.flush()?;

    let (_, path) = report.keep().map_err(|e| e.error)?;
    Ok(path)
}
