//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] enforces a disciplined construction flow:
//! set the required fields, call `.build()`, and get back an unsigned
//! [`Transaction`] with a deterministic ID derived from its contents.
//!
//! The builder does not sign (that happens in [`super::signing`]) and it
//! does not talk to any gateway. This separation keeps construction
//! testable without key material or a running chain endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::types::TxKind;
use crate::crypto::hash::double_sha256;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A TROVE ledger transaction.
///
/// The `id` field is the double-SHA-256 hash of the canonical serialization
/// of all fields *except* `signature`, `sender_public_key`, and
/// `gateway_id`. The ID is therefore stable across signing and gateway
/// submission: a node computes it locally before the gateway has ever seen
/// the transaction, and the gateway's own identifier lands in `gateway_id`
/// without disturbing it.
///
/// # Canonical Byte Format
///
/// Signing and ID computation use [`Transaction::signable_bytes`], which
/// deterministically serializes: kind, sender, recipient, amount, fee,
/// timestamp, payload. Signature and gateway metadata are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID: `hex(double_sha256(signable_bytes))`.
    pub id: String,

    /// Identifier assigned by the external chain gateway when it accepts
    /// the transaction. `None` until submission succeeds.
    pub gateway_id: Option<String>,

    /// The operation this transaction represents.
    pub kind: TxKind,

    /// Sender's TROVE address (`trove1` + 40 hex chars).
    pub sender: String,

    /// Recipient's TROVE address.
    pub recipient: String,

    /// Transfer amount in grains. Zero for marketplace settlements, which
    /// move value through the fee instead.
    pub amount: u64,

    /// Fee in grains. For marketplace settlements this is the priced cost
    /// of the operation and the entire economic content of the transaction.
    pub fee: u64,

    /// Optional marketplace payload digest or memo bytes. Store and
    /// request settlements record the BLAKE3 hash of the traded data here
    /// so the chain commits to *what* was traded without carrying it.
    pub payload: Option<Vec<u8>>,

    /// Unix timestamp in milliseconds when the transaction was created.
    pub timestamp: u64,

    /// Hex-encoded sender public key, embedded so verifiers need no
    /// separate key lookup. Set during signing.
    pub sender_public_key: Option<String>,

    /// Ed25519 signature over [`Transaction::signable_bytes`], hex-encoded.
    /// `None` for unsigned transactions fresh from the builder.
    pub signature: Option<String>,
}

impl Transaction {
    /// Returns the canonical byte representation used for signing and ID
    /// computation.
    ///
    /// The format is a deterministic concatenation of fields with null-byte
    /// separators and fixed-width little-endian integers. JSON/serde is
    /// intentionally avoided because field ordering is not guaranteed
    /// across serialization formats.
    ///
    /// Excluded fields: `id`, `gateway_id`, `sender_public_key`,
    /// `signature`.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        // Kind discriminant.
        buf.extend_from_slice(format!("{}", self.kind).as_bytes());
        buf.push(0x00);

        // Sender address.
        buf.extend_from_slice(self.sender.as_bytes());
        buf.push(0x00);

        // Recipient address.
        buf.extend_from_slice(self.recipient.as_bytes());
        buf.push(0x00);

        // Amount, fee, timestamp as little-endian u64.
        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf.extend_from_slice(&self.fee.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());

        // Payload (length-prefixed if present).
        if let Some(ref payload) = self.payload {
            buf.push(0x01);
            buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            buf.extend_from_slice(payload);
        } else {
            buf.push(0x00);
        }

        buf
    }

    /// Computes the transaction ID from the current field values.
    ///
    /// `id = hex(double_sha256(signable_bytes))`. Deterministic and
    /// independent of signature and gateway state.
    pub fn compute_id(&self) -> String {
        hex::encode(double_sha256(&self.signable_bytes()))
    }

    /// Records the identifier the chain gateway assigned on acceptance.
    pub fn with_gateway_id(mut self, gateway_id: impl Into<String>) -> Self {
        self.gateway_id = Some(gateway_id.into());
        self
    }

    /// Returns `true` if the transaction carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Returns `true` once a gateway has accepted the transaction.
    pub fn is_submitted(&self) -> bool {
        self.gateway_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for constructing unsigned [`Transaction`] instances.
///
/// # Usage
///
/// ```rust,no_run
/// use trove_protocol::transaction::{TransactionBuilder, TxKind};
///
/// let tx = TransactionBuilder::new(TxKind::Transfer)
///     .sender("trove1aaaa...")
///     .recipient("trove1bbbb...")
///     .amount(50_000)
///     .fee(10)
///     .build();
/// ```
///
/// The builder sets `timestamp` to the current UTC time by default; it can
/// be overridden for deterministic tests.
pub struct TransactionBuilder {
    kind: TxKind,
    sender: String,
    recipient: String,
    amount: u64,
    fee: u64,
    timestamp: Option<u64>,
    payload: Option<Vec<u8>>,
}

impl TransactionBuilder {
    /// Creates a new builder for the given transaction kind.
    ///
    /// Defaults: `amount` 0, `fee` 0, `timestamp` set at build time,
    /// no payload.
    pub fn new(kind: TxKind) -> Self {
        Self {
            kind,
            sender: String::new(),
            recipient: String::new(),
            amount: 0,
            fee: 0,
            timestamp: None,
            payload: None,
        }
    }

    /// Sets the sender's TROVE address.
    pub fn sender(mut self, address: &str) -> Self {
        self.sender = address.to_string();
        self
    }

    /// Sets the recipient's TROVE address.
    pub fn recipient(mut self, address: &str) -> Self {
        self.recipient = address.to_string();
        self
    }

    /// Sets the transfer amount in grains.
    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the transaction fee in grains.
    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    /// Sets the timestamp explicitly (Unix milliseconds).
    ///
    /// If not called, `build()` uses the current UTC time.
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attaches payload bytes, typically the digest of the traded data.
    pub fn payload(mut self, data: Vec<u8>) -> Self {
        self.payload = Some(data);
        self
    }

    /// Consumes the builder and produces an unsigned [`Transaction`].
    ///
    /// The transaction ID is computed from the signable bytes. The
    /// `signature`, `sender_public_key`, and `gateway_id` fields are
    /// `None`.
    pub fn build(self) -> Transaction {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);

        let mut tx = Transaction {
            id: String::new(),
            gateway_id: None,
            kind: self.kind,
            sender: self.sender,
            recipient: self.recipient,
            amount: self.amount,
            fee: self.fee,
            payload: self.payload,
            timestamp,
            sender_public_key: None,
            signature: None,
        };

        tx.id = tx.compute_id();
        tx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
