//! Transaction verification: structural checks and cryptographic validation.
//!
//! Every transaction entering the pending pool and every transaction
//! proposed for a block must pass [`verify_transaction`]. The checks are
//! ordered from cheapest to most expensive (field comparisons before
//! signature verification) to fail fast on invalid transactions.

use chrono::Utc;
use thiserror::Error;

use super::builder::Transaction;
use super::types::TxKind;
use crate::config::{ADDRESS_BODY_LEN, ADDRESS_HRP, SIGNATURE_LENGTH};
use crate::crypto::keys::{TrovePublicKey, TroveSignature};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during transaction verification.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transaction ID does not match the double-SHA-256 of its
    /// signable bytes.
    #[error("transaction ID mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },

    /// The transaction is not signed.
    #[error("transaction is unsigned")]
    MissingSignature,

    /// The signature cannot be decoded from hex or has the wrong length.
    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },

    /// The Ed25519 signature does not verify against the sender's key.
    #[error("invalid signature: does not verify against sender {sender}")]
    InvalidSignature { sender: String },

    /// An address is not a well-formed TROVE address, or the embedded
    /// public key does not derive to the claimed sender address.
    #[error("invalid {role} address: {address}")]
    InvalidAddress { role: &'static str, address: String },

    /// A plain transfer with a zero amount moves nothing and is rejected.
    /// Marketplace settlements are exempt; they are fee-only by design.
    #[error("transfer amount must be > 0")]
    ZeroAmount,

    /// The sender and recipient are the same address.
    #[error("sender and recipient must differ: both are {address}")]
    SelfTransfer { address: String },

    /// The transaction timestamp is too far in the future.
    #[error("timestamp {timestamp_ms} is {delta_secs}s in the future (max allowed: {max_secs}s)")]
    TimestampTooFarInFuture {
        timestamp_ms: u64,
        delta_secs: i64,
        max_secs: i64,
    },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Maximum allowed clock skew for transaction timestamps, in seconds.
const MAX_FUTURE_SECONDS: i64 = 300;

/// Returns `true` if `address` is shaped like a TROVE address:
/// the `trove1` prefix followed by exactly 40 lowercase hex characters.
pub fn is_well_formed_address(address: &str) -> bool {
    match address.strip_prefix(ADDRESS_HRP) {
        Some(body) => {
            body.len() == ADDRESS_BODY_LEN
                && body.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        }
        None => false,
    }
}

/// Verifies a signed transaction for structural correctness and
/// cryptographic validity.
///
/// The checks, in order:
///
/// 1. **Amount** — plain transfers must move a positive amount; market
///    settlements are fee-only and exempt.
/// 2. **Self-transfer** — sender must differ from recipient.
/// 3. **Timestamp** — must not be more than 5 minutes in the future.
/// 4. **Addresses** — sender and recipient must be well-formed.
/// 5. **Transaction ID** — must equal `double_sha256(signable_bytes)`.
/// 6. **Signature present** — the transaction must be signed.
/// 7. **Key binding** — the embedded public key must derive to the
///    claimed sender address, closing off key substitution.
/// 8. **Signature valid** — Ed25519 verification over the signable bytes.
///
/// # Errors
///
/// Returns the first failing check as a [`TransactionError`].
pub fn verify_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    // 1. Plain transfers of nothing are noise; reject them.
    if tx.kind == TxKind::Transfer && tx.amount == 0 {
        return Err(TransactionError::ZeroAmount);
    }

    // 2. No self-transfers.
    if tx.sender == tx.recipient {
        return Err(TransactionError::SelfTransfer {
            address: tx.sender.clone(),
        });
    }

    // 3. Timestamp must not be unreasonably far in the future.
    let now_ms = Utc::now().timestamp_millis() as u64;
    let max_future_ms = now_ms + (MAX_FUTURE_SECONDS as u64 * 1_000);
    if tx.timestamp > max_future_ms {
        let delta_secs = (tx.timestamp as i64 - now_ms as i64) / 1_000;
        return Err(TransactionError::TimestampTooFarInFuture {
            timestamp_ms: tx.timestamp,
            delta_secs,
            max_secs: MAX_FUTURE_SECONDS,
        });
    }

    // 4. Both addresses must be well-formed.
    if !is_well_formed_address(&tx.sender) {
        return Err(TransactionError::InvalidAddress {
            role: "sender",
            address: tx.sender.clone(),
        });
    }
    if !is_well_formed_address(&tx.recipient) {
        return Err(TransactionError::InvalidAddress {
            role: "recipient",
            address: tx.recipient.clone(),
        });
    }

    // 5. Transaction ID integrity check.
    let expected_id = tx.compute_id();
    if tx.id != expected_id {
        return Err(TransactionError::IdMismatch {
            expected: expected_id,
            actual: tx.id.clone(),
        });
    }

    // 6. Signature must be present.
    let sig_hex = tx
        .signature
        .as_ref()
        .ok_or(TransactionError::MissingSignature)?;

    let sig_bytes = hex::decode(sig_hex).map_err(|e| TransactionError::MalformedSignature {
        reason: format!("hex decode failed: {}", e),
    })?;
    if sig_bytes.len() != SIGNATURE_LENGTH {
        return Err(TransactionError::MalformedSignature {
            reason: format!("expected {} bytes, got {}", SIGNATURE_LENGTH, sig_bytes.len()),
        });
    }
    let mut sig_arr = [0u8; SIGNATURE_LENGTH];
    sig_arr.copy_from_slice(&sig_bytes);
    let signature = TroveSignature::from_bytes(sig_arr);

    // 7. The embedded public key must map to the claimed sender address.
    let sender_pk_hex =
        tx.sender_public_key
            .as_ref()
            .ok_or_else(|| TransactionError::InvalidAddress {
                role: "sender",
                address: tx.sender.clone(),
            })?;
    let sender_pk =
        TrovePublicKey::from_hex(sender_pk_hex).map_err(|_| TransactionError::InvalidAddress {
            role: "sender",
            address: tx.sender.clone(),
        })?;
    if sender_pk.address() != tx.sender {
        return Err(TransactionError::InvalidAddress {
            role: "sender",
            address: tx.sender.clone(),
        });
    }

    // 8. Ed25519 verification over the canonical bytes.
    if !sender_pk.verify(&tx.signable_bytes(), &signature) {
        return Err(TransactionError::InvalidSignature {
            sender: tx.sender.clone(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
