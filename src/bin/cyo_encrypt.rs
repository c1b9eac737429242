// src/bin/cyo_encrypt.rs
//! cyo-encrypt: encrypt or decrypt a file, or every file in a folder
//!
//! Exit codes: 0 success, 1 operation failure, 2 usage or setup error,
//! 3 password confirmation mismatch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use subtle::ConstantTimeEq;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cyo_encrypt::aliases::{PasswordBytes, Salt1024};
use cyo_encrypt::{
    encrypt_or_decrypt, load_config, load_or_create_salt, BatchOptions, CoreError, FixedPassword,
    PasswordSource,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_PASSWORD_MISMATCH: u8 = 3;

#[derive(Parser)]
#[command(
    name = "cyo-encrypt",
    version,
    about = "Encrypt or decrypt a file, or every file in a folder"
)]
struct Cli {
    /// File or folder to process; `.encrypted` files are decrypted, everything else encrypted
    path: PathBuf,

    /// Password; prompted for when omitted
    password: Option<String>,

    /// Don't ask for the password twice
    #[arg(long)]
    no_confirm: bool,

    /// Include subfolders
    #[arg(short, long)]
    recurse: bool,

    /// Folder names to skip, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Cache the key next to each encrypted file so re-encryption needs no password
    #[arg(long)]
    remember_key: bool,
}

/// Asks once per run, then hands out the same password
struct PromptPassword {
    confirm: bool,
    cached: Option<PasswordBytes>,
    mismatched: bool,
}

impl PromptPassword {
    fn new(confirm: bool) -> Self {
        Self {
            confirm,
            cached: None,
            mismatched: false,
        }
    }

    fn prompt(&self) -> std::io::Result<Option<String>> {
        let password = rpassword::prompt_password("Enter password: ")?;
        if self.confirm {
            let again = rpassword::prompt_password("Confirm password: ")?;
            if again.as_bytes().ct_eq(password.as_bytes()).unwrap_u8() == 0 {
                return Ok(None);
            }
        }
        Ok(Some(password))
    }
}

impl PasswordSource for PromptPassword {
    fn password(&mut self, _path: &Path) -> cyo_encrypt::Result<PasswordBytes> {
        if self.mismatched {
            return Err(CoreError::PasswordMismatch);
        }
        if self.cached.is_none() {
            match self.prompt()? {
                Some(password) => self.cached = Some(PasswordBytes::new(password.into_bytes())),
                None => {
                    self.mismatched = true;
                    return Err(CoreError::PasswordMismatch);
                }
            }
        }
        match &self.cached {
            Some(bytes) => Ok(PasswordBytes::new(bytes.expose_secret().clone())),
            None => Err(CoreError::PasswordMismatch),
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<ExitCode> {
    if !cli.path.exists() {
        error!("{} does not exist", cli.path.display());
        return Ok(ExitCode::from(EXIT_USAGE));
    }
    let path = std::path::absolute(&cli.path)
        .with_context(|| format!("unable to resolve {}", cli.path.display()))?;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("unable to load configuration: {e}");
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let (salt, source) = match load_or_create_salt(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("unable to load salt: {e}");
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };
    info!(?source, "salt loaded");

    let mut exclude = config.batch.exclude.clone();
    exclude.extend(cli.exclude);

    let options = BatchOptions {
        recurse: cli.recurse,
        exclude,
        remember_key: cli.remember_key,
        report_dir: config.paths.report_dir.clone(),
        progress_interval: Duration::from_millis(config.batch.progress_interval_ms),
    };

    let code = match cli.password {
        Some(password) => process(&path, &salt, options, &mut FixedPassword::new(&password)),
        None => {
            let mut prompt = PromptPassword::new(!cli.no_confirm);
            let code = process(&path, &salt, options, &mut prompt);
            if prompt.mismatched {
                ExitCode::from(EXIT_PASSWORD_MISMATCH)
            } else {
                code
            }
        }
    };
    Ok(code)
}

fn process(
    path: &Path,
    salt: &Salt1024,
    options: BatchOptions,
    password: &mut dyn PasswordSource,
) -> ExitCode {
    match encrypt_or_decrypt(path, salt, options, password) {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FAILURE),
        Err(CoreError::PasswordMismatch) => {
            error!("{}", CoreError::PasswordMismatch);
            ExitCode::from(EXIT_PASSWORD_MISMATCH)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
