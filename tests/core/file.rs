// tests/core/file.rs
use std::fs;
use std::path::Path;

use cyo_encrypt::aliases::PasswordBytes;
use cyo_encrypt::core::{side_car_path, FileEncryptor, KeyCache, KeyMaterial, Mode};
use cyo_encrypt::error::{CoreError, Result};
use cyo_encrypt::{FixedPassword, PasswordSource};
use tempfile::tempdir;

use crate::common::{encrypted, list_files, setup, test_salt, write_file};

/// Fails the test if a password is ever requested
struct NoPassword;

impl PasswordSource for NoPassword {
    fn password(&mut self, path: &Path) -> Result<PasswordBytes> {
        panic!("password requested for {}", path.display());
    }
}

/// Counts how often a password is requested
struct CountingPassword {
    calls: usize,
}

impl PasswordSource for CountingPassword {
    fn password(&mut self, _path: &Path) -> Result<PasswordBytes> {
        self.calls += 1;
        Ok(PasswordBytes::new(b"pw".to_vec()))
    }
}

#[test]
fn test_encrypt_then_decrypt_restores_file() {
    setup();
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let contents = b"The quick brown fox jumps over the lazy dog";
    let plain = write_file(dir.path(), "fox.txt", contents);
    let codec = FileEncryptor::new(&salt);

    let outcome = codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("secret"))
        .unwrap();
    assert_eq!(outcome.mode, Mode::Encrypting);
    assert_eq!(outcome.output, encrypted(&plain));
    assert!(!plain.exists());
    assert_ne!(fs::read(&outcome.output).unwrap(), contents);

    let outcome = codec
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("secret"))
        .unwrap();
    assert_eq!(outcome.mode, Mode::Decrypting);
    assert_eq!(outcome.output_len, contents.len() as u64);
    assert_eq!(fs::read(&plain).unwrap(), contents);
    assert_eq!(list_files(dir.path()), vec!["fox.txt"]);
}

#[test]
fn test_empty_file_encrypts_to_header_plus_one_block() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "empty", b"");
    let codec = FileEncryptor::new(&salt);

    let outcome = codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(outcome.output_len, 44);
    assert_eq!(fs::metadata(encrypted(&plain)).unwrap().len(), 44);

    codec
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(fs::read(&plain).unwrap(), b"");
}

#[test]
fn test_block_aligned_file_gains_a_full_padding_block() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "aligned.bin", &[7u8; 64]);

    let outcome = FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(outcome.output_len, 108);
}

#[test]
fn test_existing_output_is_never_overwritten() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "a.txt", b"new");
    let existing = write_file(dir.path(), "a.txt.encrypted", b"old");

    let err = FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&plain, &mut NoPassword)
        .unwrap_err();
    assert!(matches!(err, CoreError::PathConflict(p) if p == existing));
    assert_eq!(fs::read(&plain).unwrap(), b"new");
    assert_eq!(fs::read(&existing).unwrap(), b"old");
}

#[test]
fn test_decrypt_refuses_to_replace_plaintext() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "b.txt", b"secret");
    let codec = FileEncryptor::new(&salt);
    codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();
    write_file(dir.path(), "b.txt", b"someone else");

    let err = codec
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("pw"))
        .unwrap_err();
    assert!(matches!(err, CoreError::PathConflict(_)));
    assert_eq!(fs::read(&plain).unwrap(), b"someone else");
    assert!(encrypted(&plain).exists());
}

#[test]
fn test_wrong_password_keeps_encrypted_file() {
    setup();
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "c.txt", &[0x42; 100]);
    let codec = FileEncryptor::new(&salt);
    codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("right"))
        .unwrap();

    let result = codec.encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("wrong"));
    assert!(result.is_err());
    assert!(encrypted(&plain).exists());
}

#[test]
fn test_plain_header_garbage_is_rejected() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let bogus = write_file(dir.path(), "d.txt.encrypted", &[0x11; 64]);

    let err = FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&bogus, &mut FixedPassword::new("pw"))
        .unwrap_err();
    assert_eq!(err.to_string(), "file header is invalid or corrupt");
    assert!(bogus.exists());
    assert!(!dir.path().join("d.txt").exists());

    // Nothing was left behind, so a second attempt hits the same header error
    let err = FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&bogus, &mut FixedPassword::new("pw"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Header(_)));
}

#[test]
fn test_header_length_mismatch_is_corruption() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "h.txt", &[0x33; 40]);
    let codec = FileEncryptor::new(&salt);
    codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();

    let enc = encrypted(&plain);
    let mut bytes = fs::read(&enc).unwrap();
    assert_eq!(bytes[8], 40);
    bytes[8] = 41;
    fs::write(&enc, &bytes).unwrap();

    let err = codec
        .encrypt_or_decrypt(&enc, &mut FixedPassword::new("pw"))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Corruption {
            expected: 41,
            actual: 40
        }
    ));
    assert!(enc.exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_is_restored_exactly() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = dir.path().join(OsStr::from_bytes(b"r\xe9sum\xe9.txt"));
    fs::write(&plain, b"cv").unwrap();
    let codec = FileEncryptor::new(&salt).remember_key(true);

    let outcome = codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(outcome.output, encrypted(&plain));
    assert!(side_car_path(&plain).exists());

    codec
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(fs::read(&plain).unwrap(), b"cv");
    assert!(!encrypted(&plain).exists());
    assert!(!side_car_path(&plain).exists());
}

#[test]
fn test_remember_key_writes_side_car_and_decrypt_removes_it() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "e.txt", b"remember me");
    let codec = FileEncryptor::new(&salt).remember_key(true);

    codec
        .encrypt_or_decrypt(&plain, &mut FixedPassword::new("pw"))
        .unwrap();
    assert!(side_car_path(&plain).exists());

    codec
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("pw"))
        .unwrap();
    assert!(!side_car_path(&plain).exists());
    assert_eq!(list_files(dir.path()), vec!["e.txt"]);
}

#[test]
fn test_saved_key_skips_the_password() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "f.txt", b"cached");
    let material = KeyMaterial::derive(b"pw", salt.expose_secret()).unwrap();
    KeyCache::new(&salt).save_key(&plain, &material).unwrap();

    let outcome = FileEncryptor::new(&salt)
        .remember_key(true)
        .encrypt_or_decrypt(&plain, &mut NoPassword)
        .unwrap();
    assert!(outcome.used_saved_key);

    FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&encrypted(&plain), &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(fs::read(&plain).unwrap(), b"cached");
}

#[test]
fn test_saved_key_is_ignored_without_remember() {
    let dir = tempdir().unwrap();
    let salt = test_salt();
    let plain = write_file(dir.path(), "g.txt", b"x");
    let material = KeyMaterial::derive(b"other", salt.expose_secret()).unwrap();
    KeyCache::new(&salt).save_key(&plain, &material).unwrap();

    let mut counting = CountingPassword { calls: 0 };
    let outcome = FileEncryptor::new(&salt)
        .encrypt_or_decrypt(&plain, &mut counting)
        .unwrap();
    assert!(!outcome.used_saved_key);
    assert_eq!(counting.calls, 1);
}
