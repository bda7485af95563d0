//! # Hashing Utilities
//!
//! Two hash functions, and we refuse to support more without a very good
//! reason:
//!
//! - **BLAKE3** — The default. Fast on every platform, parallelizable,
//!   and a proper cryptographic hash. Used for block hashes, address
//!   derivation, and authorization messages.
//!
//! - **SHA-256** — Used (doubled) for transaction IDs, matching the
//!   convention of the wider "we chose SHA-256 in 2009 and now we're stuck
//!   with it" ecosystem that the external chain gateway speaks.
//!
//! There is no security reason to prefer SHA-256 over BLAKE3, only
//! compatibility. When building TROVE-native structures, always prefer
//! BLAKE3.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns a 32-byte digest as a `Vec<u8>`. Used primarily as the inner
/// half of [`double_sha256`]. For TROVE-internal hashing, prefer
/// [`blake3_hash`].
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// This construction is used for transaction IDs. The double hash protects
/// against length-extension attacks (which SHA-256 alone is vulnerable to,
/// though in practice this matters less than people think).
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
///
/// Returns a 32-byte digest as a fixed-size array. This is the workhorse
/// hash function of TROVE. The `blake3` crate automatically takes advantage
/// of SIMD instructions on supported platforms.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// Instead of allocating a buffer to concatenate inputs, the parts are fed
/// sequentially into the hasher. Same result, less allocation. Used for
/// hashing composite structures like block contents without a temporary
/// buffer.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
