// src/core/crypto/cipher.rs
//! AES-256 / CBC / PKCS7 streaming transform
//!
//! The configuration is fixed. CBC chaining and PKCS7 padding are driven by
//! hand over the raw block cipher so that memory stays at a couple of blocks
//! regardless of input size. Padding always appends something, so aligned
//! input gains a full extra block:
//! `ciphertext_len = BLOCK_SIZE * (plaintext_len / BLOCK_SIZE + 1)`.
//!
//! This primitive only copies bytes through the cipher. Checking the
//! resulting length against what a caller expects is the caller's job.

use std::io::{self, Read, Write};

use aes::cipher::{BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit, KeySizeUser};
use aes::{Aes256, Aes256Dec, Aes256Enc, Block as AesBlock};
use subtle::ConstantTimeEq;

use crate::aliases::Block16;
use crate::consts::{BLOCK_SIZE, IV_SIZE, KEY_SIZE};
use crate::core::crypto::kdf::KeyMaterial;
use crate::error::{CoreError, Direction, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Cbc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    Pkcs7,
}

// Mode and padding are fixed by construction: the transform below is CBC
// with PKCS7 and nothing else
pub const CIPHER_MODE: CipherMode = CipherMode::Cbc;
pub const PADDING: Padding = Padding::Pkcs7;

/// Fixed cipher setup bound to one IV/key pair
pub struct CipherEngine {
    encryptor: Aes256Enc,
    decryptor: Aes256Dec,
    iv: [u8; IV_SIZE],
}

impl CipherEngine {
    /// Build the engine, refusing anything but AES-256 with 128-bit blocks
    pub fn new(material: &KeyMaterial) -> Result<Self> {
        if <Aes256 as KeySizeUser>::key_size() != KEY_SIZE {
            return Err(CoreError::Configuration("not using maximum key size".into()));
        }
        if <Aes256 as BlockSizeUser>::block_size() != BLOCK_SIZE {
            return Err(CoreError::Configuration("unexpected block size".into()));
        }

        let key = material.key.expose_secret();
        let encryptor = Aes256Enc::new_from_slice(key)
            .map_err(|_| CoreError::Configuration("unexpected key size".into()))?;
        let decryptor = Aes256Dec::new_from_slice(key)
            .map_err(|_| CoreError::Configuration("unexpected key size".into()))?;

        Ok(Self {
            encryptor,
            decryptor,
            iv: *material.iv.expose_secret(),
        })
    }

    /// Stream all of `input` through the cipher into `output`.
    ///
    /// Returns the number of bytes written. Any I/O or padding failure is
    /// reported as [`CoreError::Transform`] naming the direction.
    pub fn transform<R, W>(&self, input: R, output: W, direction: Direction) -> Result<u64>
    where
        R: Read,
        W: Write,
    {
        let result = match direction {
            Direction::Encrypt => self.encrypt_stream(input, output),
            Direction::Decrypt => self.decrypt_stream(input, output),
        };
        result.map_err(|e| CoreError::Transform {
            direction,
            reason: e.to_string(),
        })
    }

    fn encrypt_stream<R: Read, W: Write>(&self, mut input: R, mut output: W) -> io::Result<u64> {
        let mut prev_block = self.iv;
        let mut block = Block16::new([0u8; BLOCK_SIZE]);
        let mut written = 0u64;

        loop {
            let n = read_block(&mut input, block.expose_secret_mut())?;

            let is_final = n < BLOCK_SIZE;
            if is_final {
                let pad = (BLOCK_SIZE - n) as u8;
                block.expose_secret_mut()[n..].fill(pad);
            }

            let mut aes_block = AesBlock::from(*block.expose_secret());
            xor_in_place(aes_block.as_mut_slice(), &prev_block);
            self.encryptor.encrypt_block(&mut aes_block);
            prev_block.copy_from_slice(aes_block.as_slice());

            output.write_all(&prev_block)?;
            written += BLOCK_SIZE as u64;

            if is_final {
                break;
            }
        }

        output.flush()?;
        Ok(written)
    }

    fn decrypt_stream<R: Read, W: Write>(&self, mut input: R, mut output: W) -> io::Result<u64> {
        let mut prev_block = self.iv;
        let mut ciphertext = [0u8; BLOCK_SIZE];
        // One block is held back: only the last one carries padding
        let mut pending: Option<Block16> = None;
        let mut written = 0u64;

        loop {
            let n = read_block(&mut input, &mut ciphertext)?;
            if n == 0 {
                break;
            }
            if n < BLOCK_SIZE {
                return Err(invalid_data("ciphertext length is not a multiple of the block size"));
            }

            if let Some(plain) = pending.take() {
                output.write_all(plain.expose_secret())?;
                written += BLOCK_SIZE as u64;
            }

            let mut aes_block = AesBlock::from(ciphertext);
            self.decryptor.decrypt_block(&mut aes_block);
            let mut plain = Block16::new([0u8; BLOCK_SIZE]);
            plain.expose_secret_mut().copy_from_slice(aes_block.as_slice());
            xor_in_place(plain.expose_secret_mut(), &prev_block);
            prev_block = ciphertext;
            pending = Some(plain);
        }

        let last = pending.ok_or_else(|| invalid_data("ciphertext is empty"))?;
        let data_len = unpadded_len(last.expose_secret())?;
        output.write_all(&last.expose_secret()[..data_len])?;
        written += data_len as u64;

        output.flush()?;
        Ok(written)
    }
}

/// Ciphertext size for a given plaintext size; always at least one block
#[inline]
pub const fn ciphertext_len(plaintext_len: u64) -> u64 {
    let block = BLOCK_SIZE as u64;
    block * (plaintext_len / block + 1)
}

/// Fill `buf` as far as the reader allows; short only at end of stream
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[inline(always)]
fn xor_in_place(block: &mut [u8], other: &[u8; BLOCK_SIZE]) {
    for (a, b) in block.iter_mut().zip(other.iter()) {
        *a ^= b;
    }
}

/// Length of real data in the final block, validating PKCS7
fn unpadded_len(block: &[u8; BLOCK_SIZE]) -> io::Result<usize> {
    let pad = block[BLOCK_SIZE - 1];
    if pad == 0 || pad as usize > BLOCK_SIZE {
        return Err(invalid_data("padding is invalid"));
    }

    // Padding bytes compared in constant time
    let start = BLOCK_SIZE - pad as usize;
    let expected = [pad; BLOCK_SIZE];
    if block[start..].ct_eq(&expected[start..]).unwrap_u8() != 1 {
        return Err(invalid_data("padding is invalid"));
    }
    Ok(start)
}

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}
