//! # Cryptography
//!
//! The primitives backing the marketplace: hashing, Ed25519 identity keys
//! and authorization signatures, and AES-256-GCM payload encryption.
//!
//! ```text
//! hash.rs       — BLAKE3 (primary) and SHA-256 (tx-id compatibility)
//! keys.rs       — Ed25519 keypairs and address derivation
//! signatures.rs — canonical authorization messages for store/request
//! encryption.rs — symmetric encryption at rest for stored payloads
//! ```
//!
//! The original design this crate descends from authorized users with a
//! shared-secret hash comparison. That was a placeholder, not a scheme:
//! anyone who can verify can also forge. Here authorization is a real
//! Ed25519 signature — the user signs with their private key, the node
//! verifies with the user's public key, and nobody can repudiate anything.

pub mod encryption;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use encryption::{EncryptionError, PayloadCipher};
pub use hash::{blake3_hash, blake3_hash_multi, double_sha256, sha256};
pub use keys::{KeyError, TroveKeypair, TrovePublicKey, TroveSignature};
pub use signatures::{
    request_auth_bytes, store_auth_bytes, verify_request_auth, verify_store_auth,
};
