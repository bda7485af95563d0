//! # Payload Encryption
//!
//! Symmetric encryption at rest for stored marketplace payloads, using
//! AES-256-GCM. Each node holds its own cipher key; data handed to a node
//! via `store_data` is encrypted before it touches the record store, and
//! decrypted on its way back out of `request_data`.
//!
//! The wire format is deliberately boring: `nonce || ciphertext`, where the
//! nonce is 12 random bytes and the ciphertext carries GCM's 16-byte
//! authentication tag at its tail. Any tampering, with either half, fails
//! decryption.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    AeadCore, Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};

/// Errors from payload encryption and decryption.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The ciphertext is shorter than a nonce, so there is nothing to decrypt.
    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    CiphertextTooShort { len: usize, min: usize },

    /// AES-GCM refused the operation. For decryption this almost always
    /// means a wrong key or tampered data; GCM does not distinguish.
    #[error("AEAD operation failed (wrong key or tampered data)")]
    AeadFailure,
}

/// An AES-256-GCM cipher bound to a single 256-bit key.
///
/// Cloneable so a node can hand copies to worker tasks; the key is just
/// 32 bytes of `Copy` data under the hood.
#[derive(Clone)]
pub struct PayloadCipher {
    key: [u8; AES_KEY_LENGTH],
}

impl PayloadCipher {
    /// Create a cipher from an existing 256-bit key.
    pub fn new(key: [u8; AES_KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Generate a cipher with a fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let mut key = [0u8; AES_KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Encrypt a payload. Returns `nonce || ciphertext`.
    ///
    /// A fresh random nonce is drawn per call. With 96-bit nonces the
    /// birthday bound sits around 2^32 encryptions per key, far beyond
    /// anything a single node stores.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| EncryptionError::AeadFailure)?;

        let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt a `nonce || ciphertext` blob produced by [`encrypt`].
    ///
    /// [`encrypt`]: PayloadCipher::encrypt
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        if blob.len() < AES_NONCE_LENGTH {
            return Err(EncryptionError::CiphertextTooShort {
                len: blob.len(),
                min: AES_NONCE_LENGTH,
            });
        }
        let (nonce_bytes, ciphertext) = blob.split_at(AES_NONCE_LENGTH);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| EncryptionError::AeadFailure)
    }
}

impl std::fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key. Not in logs, not in panics, not anywhere.
        f.debug_struct("PayloadCipher").finish_non_exhaustive()
    }
}
