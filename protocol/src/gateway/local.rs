//! In-process gateway and data network implementations.
//!
//! These back the integration tests and the demo binary. `LocalGateway`
//! keeps a UTXO set in memory and supports failure injection, so tests
//! can exercise both halves of the error split: take the gateway offline
//! to get `Unavailable`, or arm rejection to get `Rejected`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{
    BaseTransaction, ChainGateway, DataNetwork, GatewayError, SignedSubmission, SpendableOutput,
};
use crate::crypto::keys::{TrovePublicKey, TroveSignature};

// ---------------------------------------------------------------------------
// LocalGateway
// ---------------------------------------------------------------------------

/// An in-memory external chain.
///
/// Holds spendable outputs per address, accepts properly signed
/// submissions, and consumes the spent output on acceptance. Failure
/// injection flags simulate an unreachable or hostile endpoint.
#[derive(Default)]
pub struct LocalGateway {
    utxos: DashMap<String, Vec<SpendableOutput>>,
    offline: AtomicBool,
    rejecting: AtomicBool,
    accepted: Mutex<Vec<SignedSubmission>>,
}

impl LocalGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `address` with a fresh spendable output of `amount` grains.
    pub fn fund(&self, address: &str, amount: u64) -> SpendableOutput {
        let output = SpendableOutput {
            output_id: Uuid::new_v4().to_string(),
            address: address.to_string(),
            amount,
        };
        self.utxos
            .entry(address.to_string())
            .or_default()
            .push(output.clone());
        output
    }

    /// Simulate the endpoint going down (`true`) or coming back (`false`).
    /// While offline every call returns [`GatewayError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Arm or disarm policy rejection of submissions.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::Relaxed);
    }

    /// Submissions accepted so far, in order.
    pub fn accepted_submissions(&self) -> Vec<SignedSubmission> {
        self.accepted.lock().clone()
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(GatewayError::Unavailable {
                reason: "endpoint offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainGateway for LocalGateway {
    async fn fetch_utxos(&self, address: &str) -> Result<Vec<SpendableOutput>, GatewayError> {
        self.check_online()?;
        Ok(self
            .utxos
            .get(address)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn build_base_transaction(
        &self,
        input: SpendableOutput,
        change_address: &str,
        counterparty: &str,
        settles: &str,
    ) -> Result<BaseTransaction, GatewayError> {
        self.check_online()?;
        Ok(BaseTransaction {
            input,
            change_address: change_address.to_string(),
            counterparty: counterparty.to_string(),
            settles: settles.to_string(),
        })
    }

    async fn submit(&self, submission: SignedSubmission) -> Result<String, GatewayError> {
        self.check_online()?;
        if self.rejecting.load(Ordering::Relaxed) {
            return Err(GatewayError::Rejected {
                reason: "submission rejected by policy".to_string(),
            });
        }

        // Verify the submission signature against its embedded key.
        let public_key = TrovePublicKey::from_hex(&submission.public_key).map_err(|e| {
            GatewayError::Rejected {
                reason: format!("bad public key: {}", e),
            }
        })?;
        let signature = TroveSignature::from_hex(&submission.signature).map_err(|e| {
            GatewayError::Rejected {
                reason: format!("bad signature encoding: {}", e),
            }
        })?;
        if !public_key.verify(&submission.base.signable_bytes(), &signature) {
            return Err(GatewayError::Rejected {
                reason: "signature does not verify".to_string(),
            });
        }

        // Consume the spent output. A submission naming an output we no
        // longer hold is a double spend.
        let spent = submission.base.input.clone();
        let mut consumed = false;
        if let Some(mut outputs) = self.utxos.get_mut(&spent.address) {
            if let Some(pos) = outputs.iter().position(|o| o.output_id == spent.output_id) {
                outputs.remove(pos);
                consumed = true;
            }
        }
        if !consumed {
            return Err(GatewayError::Rejected {
                reason: format!("output {} already spent or unknown", spent.output_id),
            });
        }

        let gateway_id = Uuid::new_v4().to_string();
        debug!(%gateway_id, settles = %submission.base.settles, "submission accepted");
        self.accepted.lock().push(submission);
        Ok(gateway_id)
    }
}

// ---------------------------------------------------------------------------
// InMemoryNetwork
// ---------------------------------------------------------------------------

/// A data network backed by a concurrent map.
#[derive(Default)]
pub struct InMemoryNetwork {
    store: DashMap<String, Vec<u8>>,
    offline: AtomicBool,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a payload under `key`.
    pub fn publish(&self, key: &str, payload: Vec<u8>) {
        self.store.insert(key.to_string(), payload);
    }

    /// Simulate the network becoming unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }
}

#[async_trait]
impl DataNetwork for InMemoryNetwork {
    async fn retrieve_data(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(GatewayError::Unavailable {
                reason: "data network offline".to_string(),
            });
        }
        Ok(self.store.get(key).map(|entry| entry.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::TroveKeypair;
    use crate::gateway::settle_transaction;
    use crate::transaction::{sign_transaction, TransactionBuilder, TxKind};

    fn signed_market_tx(node: &TroveKeypair, user: &str) -> crate::transaction::Transaction {
        let mut tx = TransactionBuilder::new(TxKind::StoreData)
            .sender(&node.address())
            .recipient(user)
            .fee(10)
            .build();
        sign_transaction(&mut tx, node);
        tx
    }

    #[tokio::test]
    async fn settlement_consumes_first_output_and_assigns_id() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        let user = TroveKeypair::generate().address();

        gateway.fund(&node.address(), 1_000);
        gateway.fund(&node.address(), 2_000);

        let tx = signed_market_tx(&node, &user);
        let settled = settle_transaction(&gateway, &node, tx).await.unwrap();

        assert!(settled.is_submitted());
        // First output consumed, second still spendable.
        let remaining = gateway.fetch_utxos(&node.address()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].amount, 2_000);
        assert_eq!(gateway.accepted_submissions().len(), 1);
    }

    #[tokio::test]
    async fn settlement_fails_without_outputs() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        let tx = signed_market_tx(&node, &TroveKeypair::generate().address());

        match settle_transaction(&gateway, &node, tx).await {
            Err(GatewayError::NoSpendableOutputs { .. }) => {}
            other => panic!("expected NoSpendableOutputs, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn offline_gateway_is_unavailable() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        gateway.fund(&node.address(), 1_000);
        gateway.set_offline(true);

        let tx = signed_market_tx(&node, &TroveKeypair::generate().address());
        match settle_transaction(&gateway, &node, tx).await {
            Err(GatewayError::Unavailable { .. }) => {}
            other => panic!("expected Unavailable, got {:?}", other),
        }

        // Back online, the same flow succeeds.
        gateway.set_offline(false);
        let tx = signed_market_tx(&node, &TroveKeypair::generate().address());
        assert!(settle_transaction(&gateway, &node, tx).await.is_ok());
    }

    #[tokio::test]
    async fn rejecting_gateway_refuses_submission() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        gateway.fund(&node.address(), 1_000);
        gateway.set_rejecting(true);

        let tx = signed_market_tx(&node, &TroveKeypair::generate().address());
        match settle_transaction(&gateway, &node, tx).await {
            Err(GatewayError::Rejected { .. }) => {}
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn forged_submission_rejected() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        let impostor = TroveKeypair::generate();
        let output = gateway.fund(&node.address(), 1_000);

        let base = gateway
            .build_base_transaction(output, &node.address(), "trove1bbbb", "txid")
            .await
            .unwrap();
        // Signed by the wrong key.
        let submission = base.sign(&impostor);
        // Patch the claimed key to the node's so only the signature is wrong.
        let submission = SignedSubmission {
            public_key: node.public_key().to_hex(),
            ..submission
        };

        match gateway.submit(submission).await {
            Err(GatewayError::Rejected { .. }) => {}
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn double_spend_rejected() {
        let gateway = LocalGateway::new();
        let node = TroveKeypair::generate();
        let output = gateway.fund(&node.address(), 1_000);

        let base = gateway
            .build_base_transaction(output, &node.address(), "trove1bbbb", "tx-1")
            .await
            .unwrap();

        gateway.submit(base.clone().sign(&node)).await.unwrap();
        match gateway.submit(base.sign(&node)).await {
            Err(GatewayError::Rejected { .. }) => {}
            other => panic!("expected Rejected on double spend, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn network_roundtrip_and_miss() {
        let network = InMemoryNetwork::new();
        network.publish("weather/2026-08", b"sunny".to_vec());

        assert_eq!(
            network.retrieve_data("weather/2026-08").await.unwrap(),
            Some(b"sunny".to_vec())
        );
        assert_eq!(network.retrieve_data("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn offline_network_is_unavailable() {
        let network = InMemoryNetwork::new();
        network.set_offline(true);
        assert!(matches!(
            network.retrieve_data("anything").await,
            Err(GatewayError::Unavailable { .. })
        ));
    }
}
