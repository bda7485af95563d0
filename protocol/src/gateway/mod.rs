//! # Gateway Module
//!
//! The seams between a marketplace node and the world outside it: the
//! external chain endpoint that accepts settlement transactions, and the
//! data network that payloads are fetched from.
//!
//! ## Architecture
//!
//! ```text
//! mod.rs   — ChainGateway and DataNetwork traits, wire types, errors
//! local.rs — In-process implementations for tests and the demo
//! ```
//!
//! ## Submission Flow
//!
//! Settlement against the external chain follows the classic UTXO dance:
//! fetch the sender's spendable outputs, build a base transaction from
//! the first available output, sign it, and submit. The gateway assigns
//! its own identifier on acceptance; that lands in the transaction's
//! `gateway_id` without disturbing the locally computed ID.
//!
//! Errors deliberately split infrastructure failures (the endpoint is
//! down) from policy rejections (the endpoint said no), because callers
//! retry the former and surface the latter.

pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::{InMemoryNetwork, LocalGateway};

use crate::crypto::keys::TroveKeypair;
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A spendable output on the external chain, as reported by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendableOutput {
    /// Gateway-scoped identifier of the output.
    pub output_id: String,
    /// Address the output is locked to.
    pub address: String,
    /// Value in grains.
    pub amount: u64,
}

/// An unsigned settlement transaction assembled by the gateway from a
/// spendable output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTransaction {
    /// The output being consumed.
    pub input: SpendableOutput,
    /// Address change returns to (the sender).
    pub change_address: String,
    /// Counterparty address.
    pub counterparty: String,
    /// The local transaction this settles, by its TROVE ID.
    pub settles: String,
}

/// A base transaction plus the sender's signature over it, ready for
/// submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// The signed base transaction.
    pub base: BaseTransaction,
    /// Hex Ed25519 signature over the base transaction's canonical bytes.
    pub signature: String,
    /// Hex public key of the signer.
    pub public_key: String,
}

impl BaseTransaction {
    /// Canonical bytes the sender signs before submission.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(self.input.output_id.as_bytes());
        buf.push(0x00);
        buf.extend_from_slice(&self.input.amount.to_le_bytes());
        buf.extend_from_slice(self.change_address.as_bytes());
        buf.push(0x00);
        buf.extend_from_slice(self.counterparty.as_bytes());
        buf.push(0x00);
        buf.extend_from_slice(self.settles.as_bytes());
        buf
    }

    /// Sign this base transaction with the sender's keypair.
    pub fn sign(self, keypair: &TroveKeypair) -> SignedSubmission {
        let signature = keypair.sign(&self.signable_bytes());
        SignedSubmission {
            signature: signature.to_hex(),
            public_key: keypair.public_key().to_hex(),
            base: self,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from gateway interactions.
///
/// `Unavailable` is an infrastructure fault worth retrying; `Rejected`
/// and `NoSpendableOutputs` are terminal for the operation at hand.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway endpoint could not be reached or did not answer.
    #[error("gateway unavailable: {reason}")]
    Unavailable { reason: String },

    /// The gateway understood the submission and refused it.
    #[error("gateway rejected submission: {reason}")]
    Rejected { reason: String },

    /// The sender holds no spendable outputs on the external chain.
    #[error("no spendable outputs for address {address}")]
    NoSpendableOutputs { address: String },
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A connection to the external chain that settles marketplace
/// transactions.
///
/// Object-safe so nodes can hold a `dyn ChainGateway` and tests can swap
/// in [`LocalGateway`] with failure injection.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Fetch the spendable outputs locked to `address`.
    async fn fetch_utxos(&self, address: &str) -> Result<Vec<SpendableOutput>, GatewayError>;

    /// Assemble an unsigned base transaction consuming `input`, paying
    /// toward `counterparty` with change back to `change_address`,
    /// settling the local transaction `settles`.
    async fn build_base_transaction(
        &self,
        input: SpendableOutput,
        change_address: &str,
        counterparty: &str,
        settles: &str,
    ) -> Result<BaseTransaction, GatewayError>;

    /// Submit a signed transaction. Returns the gateway-assigned
    /// identifier on acceptance.
    async fn submit(&self, submission: SignedSubmission) -> Result<String, GatewayError>;
}

/// Where marketplace payloads actually come from.
///
/// `request_data` resolves the user's query against this seam; the
/// in-memory implementation backs tests, and a production node would put
/// its content-addressed fetch layer behind it.
#[async_trait]
pub trait DataNetwork: Send + Sync {
    /// Retrieve the payload stored under `key`, or `None` if the network
    /// has nothing for it.
    async fn retrieve_data(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError>;
}

// ---------------------------------------------------------------------------
// Submission helper
// ---------------------------------------------------------------------------

/// Run the full settlement flow for a local transaction: fetch outputs,
/// take the first available one, build, sign, submit.
///
/// On success the transaction is returned with its `gateway_id` set.
/// On any error the transaction is returned unchanged inside the error
/// path, leaving the caller free to retry or discard.
pub async fn settle_transaction<G: ChainGateway + ?Sized>(
    gateway: &G,
    keypair: &TroveKeypair,
    tx: Transaction,
) -> Result<Transaction, GatewayError> {
    let sender = tx.sender.clone();
    let utxos = gateway.fetch_utxos(&sender).await?;
    let input = utxos
        .into_iter()
        .next()
        .ok_or(GatewayError::NoSpendableOutputs { address: sender })?;

    let base = gateway
        .build_base_transaction(input, &tx.sender, &tx.recipient, &tx.id)
        .await?;
    let gateway_id = gateway.submit(base.sign(keypair)).await?;
    Ok(tx.with_gateway_id(gateway_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_transaction_signable_bytes_are_field_sensitive() {
        let base = BaseTransaction {
            input: SpendableOutput {
                output_id: "utxo-1".to_string(),
                address: "trove1aaaa".to_string(),
                amount: 100,
            },
            change_address: "trove1aaaa".to_string(),
            counterparty: "trove1bbbb".to_string(),
            settles: "txid".to_string(),
        };
        let mut other = base.clone();
        other.counterparty = "trove1cccc".to_string();
        assert_ne!(base.signable_bytes(), other.signable_bytes());
    }

    #[test]
    fn sign_embeds_key_and_signature() {
        let kp = TroveKeypair::generate();
        let base = BaseTransaction {
            input: SpendableOutput {
                output_id: "utxo-1".to_string(),
                address: kp.address(),
                amount: 100,
            },
            change_address: kp.address(),
            counterparty: "trove1bbbb".to_string(),
            settles: "txid".to_string(),
        };
        let submission = base.clone().sign(&kp);
        assert_eq!(submission.public_key, kp.public_key().to_hex());
        assert_eq!(submission.signature.len(), 128);
        assert_eq!(submission.base, base);
    }
}
