//! # Key Management
//!
//! Ed25519 keypair generation, address derivation, and basic key
//! operations. Every participant in the marketplace — node operators and
//! data users alike — is identified by one of these keypairs.
//!
//! ## Addresses
//!
//! A TROVE address is `trove1` followed by the first 40 hex characters of
//! the BLAKE3 hash of the public key. The address is the only identity the
//! ledger ever sees; private keys never appear in transactions, blocks, or
//! logs. If you add logging to this module, you will be asked to leave.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::config::{ADDRESS_BODY_LEN, ADDRESS_HRP};
use crate::crypto::hash::blake3_hash;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details
/// about key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,
}

/// An identity keypair wrapping an Ed25519 signing key.
///
/// This is the atomic unit of identity in the marketplace. Node addresses,
/// user authorization, and transaction signatures all trace back to one of
/// these.
///
/// `TroveKeypair` intentionally does NOT implement `Serialize` /
/// `Deserialize`. Serializing private keys should be a deliberate act, not
/// something that happens because someone shoved a keypair into a JSON
/// response. Use `secret_key_bytes()` / `from_bytes()` explicitly.
pub struct TroveKeypair {
    signing_key: SigningKey,
}

/// The public half of a TROVE identity, safe to share with the world.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrovePublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message. 64 bytes, deterministic for a
/// given (key, message) pair.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64
/// bytes when produced by our signing path. A malformed signature simply
/// fails verification — no panics, just `false`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroveSignature {
    bytes: Vec<u8>,
}

impl TroveKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    ///
    /// `OsRng` pulls from `/dev/urandom` on Unix. If that's compromised,
    /// marketplace keys are the least of your worries.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// **Warning**: a weak seed gives you a weak key. Use a proper CSPRNG
    /// or KDF to produce the seed bytes.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from raw 32-byte secret key material.
    /// In Ed25519 the secret key *is* the seed.
    pub fn from_bytes(secret_key_bytes: &[u8; 32]) -> Self {
        Self::from_seed(secret_key_bytes)
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    ///
    /// Convenience for loading keys from files on devnet. Please don't put
    /// raw hex keys in config files in production. But we're not going to
    /// pretend you won't do it anyway.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_bytes(&arr))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> TrovePublicKey {
        TrovePublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Returns the TROVE address derived from this keypair's public key.
    pub fn address(&self) -> String {
        self.public_key().address()
    }

    /// Sign a message and return a `TroveSignature`.
    ///
    /// Ed25519 signatures are deterministic — the same (key, message) pair
    /// always produces the same signature. No nonce management, no bad-RNG
    /// key leaks at signing time.
    pub fn sign(&self, message: &[u8]) -> TroveSignature {
        TroveSignature {
            bytes: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's own public key.
    pub fn verify(&self, message: &[u8], signature: &TroveSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Exports the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** This is the only secret standing
    /// between an attacker and full control of the identity. Don't log it.
    /// Don't store it in a file called `my_keys.txt` on your desktop.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Hex-encoded public key, for display.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key().as_bytes())
    }
}

impl Clone for TroveKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for TroveKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even
        // "partially" — a partial leak is still a leak.
        write!(f, "TroveKeypair(addr={})", self.address())
    }
}

// ---------------------------------------------------------------------------
// TrovePublicKey
// ---------------------------------------------------------------------------

impl TrovePublicKey {
    /// Create a public key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Try to create a public key from a byte slice, validating that the
    /// bytes represent an actual Ed25519 point. Low-order points and other
    /// degenerate cases are rejected.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Derive the TROVE address: `trove1` + first 40 hex chars of
    /// `BLAKE3(public key)`.
    ///
    /// The address is one-way. Knowing an address tells you nothing about
    /// the key, and the ledger never needs the key itself — transactions
    /// embed the public key at signing time.
    pub fn address(&self) -> String {
        let digest = blake3_hash(&self.bytes);
        let body = hex::encode(digest);
        format!("{}{}", ADDRESS_HRP, &body[..ADDRESS_BODY_LEN])
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `true` if valid, `false` otherwise. A boolean, not a
    /// `Result`: callers want a yes/no answer, and a detailed failure
    /// oracle is a gift to attackers.
    pub fn verify(&self, message: &[u8], signature: &TroveSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }

    /// Base58-encoded representation, for compact display.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }
}

impl Hash for TrovePublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for TrovePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TrovePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrovePublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// TroveSignature
// ---------------------------------------------------------------------------

impl TroveSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature string. 128 characters for a valid signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidSignature)?;
        if bytes.len() != 64 {
            return Err(KeyError::InvalidSignature);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for TroveSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TroveSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "TroveSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "TroveSignature({})", hex_str)
        }
    }
}
