//! Marketplace error types.

use thiserror::Error;

use crate::config::MAX_PAYLOAD_BYTES;
use crate::crypto::encryption::EncryptionError;
use crate::gateway::GatewayError;
use crate::ledger::LedgerError;

/// Errors surfaced by marketplace operations.
///
/// The first four variants are the node-level rejection checks. They are
/// mutually exclusive by construction: checks run in a fixed order and
/// the first failure wins, so a caller always learns exactly one reason.
#[derive(Debug, Error)]
pub enum MarketError {
    /// The user is not whitelisted, or their signature does not
    /// authorize the operation.
    #[error("authorization failed for {user}: {reason}")]
    Authorization { user: String, reason: String },

    /// The user cannot afford the operation's fee.
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: i64, required: u64 },

    /// The content policy flagged the payload as malicious.
    #[error("content rejected: {reason}")]
    Content { reason: String },

    /// The payload exceeds what a node will store.
    #[error("payload of {size} bytes exceeds the {max}-byte limit", max = MAX_PAYLOAD_BYTES)]
    PayloadTooLarge { size: usize },

    /// The data network has nothing stored under the requested key.
    #[error("no data available under key {key:?}")]
    DataUnavailable { key: String },

    /// A score update fell outside its valid range.
    #[error("score {value} outside valid range [{min}, {max}]")]
    ScoreOutOfRange { value: f64, min: f64, max: f64 },

    /// Payload encryption or decryption failed.
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    /// The chain gateway failed or refused the settlement.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The ledger rejected the settled transaction.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
