// src/consts.rs
//! Shared constants: cipher parameters, on-disk formats, naming

/// Installation salt size in bytes
pub const SALT_SIZE: usize = 1024;

/// AES block size in bytes (128-bit blocks)
pub const BLOCK_SIZE: usize = 16;

/// CBC IV size, always one block
pub const IV_SIZE: usize = BLOCK_SIZE;

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// PBKDF2-HMAC-SHA512 iteration count for file keys
// Changing this makes every existing file undecryptable
pub const KDF_ITERATIONS: u32 = 1000;

/// Byte every IV starts from before the SHA-512 digest is folded in
pub const IV_FILL_BYTE: u8 = 0x55;

/// Suffix that marks an encrypted file; the only mode signal
pub const ENCRYPTED_EXTENSION: &str = ".encrypted";

// ──────────────────────────────────────────────────────────────
// File header (28 bytes, little-endian)
// ──────────────────────────────────────────────────────────────
pub const HEADER_LENGTH: usize = 28;
pub const HEADER_PREAMBLE: &[u8; 4] = b"CYO\0";
pub const HEADER_VERSION_MAJOR: u16 = 3;
pub const HEADER_VERSION_MINOR: u16 = 0;
pub const HEADER_RESERVED: u64 = 0;
pub const HEADER_SENTINEL: &[u8; 4] = b"ZZZZ";

// ──────────────────────────────────────────────────────────────
// Key-cache side-car
// ──────────────────────────────────────────────────────────────
pub const KEY_CACHE_PREAMBLE: &[u8; 4] = b"CYO\x01";
pub const KEY_CACHE_SUFFIX: &str = ".cyoencrypt";

/// Plaintext side-car payload: preamble + ivLen + iv + keyLen + key
pub const KEY_CACHE_PAYLOAD_SIZE: usize = 4 + 4 + IV_SIZE + 4 + KEY_SIZE;

// ──────────────────────────────────────────────────────────────
// Salt discovery
// ──────────────────────────────────────────────────────────────
pub const SALT_SUBFOLDER: &str = "CyoEncrypt";
pub const SALT_FILENAME: &str = "CyoEncrypt.data";

/// Prefix and suffix of the batch failure report
pub const REPORT_PREFIX: &str = "errors_";
pub const REPORT_SUFFIX: &str = ".txt";
