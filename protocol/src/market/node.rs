//! # The Marketplace Node
//!
//! A `MarketNode` is one participant selling storage and retrieval of
//! data payloads. It owns a keypair (its ledger identity), an encryption
//! key (payloads are encrypted before they rest), a whitelist of users
//! it will trade with, and the scores that drive its economics.
//!
//! ## Check Ordering
//!
//! Rejection checks run in a fixed order and the first failure wins,
//! which keeps the errors mutually exclusive and the behavior
//! predictable under test:
//!
//! ```text
//! store_data:   whitelist -> signature -> content -> size
//! request_data: signature -> solvency -> whitelist
//! ```
//!
//! ## Locking
//!
//! Two locks with different jobs. The async operation guard serializes
//! whole marketplace operations, including their gateway awaits, so two
//! concurrent `store_data` calls cannot interleave their settlement and
//! crediting steps. The scalar state (balance, scores, whitelist,
//! records) sits behind a sync `parking_lot::Mutex` so that mining,
//! which is synchronous, can credit rewards without touching the async
//! world. The sync lock is never held across an await.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::MarketError;
use super::fees::{ByteFeeModel, FeeModel};
use super::policy::{AdminPolicy, AllowAll, ContentPolicy, OpenAdminPolicy};
use crate::config::{grow_reputation, MAX_PAYLOAD_BYTES};
use crate::crypto::encryption::PayloadCipher;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::{TroveKeypair, TrovePublicKey, TroveSignature};
use crate::crypto::signatures::{verify_request_auth, verify_store_auth};
use crate::gateway::{settle_transaction, ChainGateway, DataNetwork};
use crate::ledger::Ledger;
use crate::transaction::{sign_transaction, Transaction, TransactionBuilder, TxKind};

// ---------------------------------------------------------------------------
// MarketEnv
// ---------------------------------------------------------------------------

/// The shared collaborators every node in a marketplace talks to: the
/// settlement ledger, the external chain gateway, and the data network.
#[derive(Clone)]
pub struct MarketEnv {
    pub ledger: Arc<Ledger>,
    pub gateway: Arc<dyn ChainGateway>,
    pub network: Arc<dyn DataNetwork>,
}

// ---------------------------------------------------------------------------
// StoredRecord
// ---------------------------------------------------------------------------

/// A payload held by a node on behalf of a user. The plaintext never
/// rests here; `ciphertext` is the AES-GCM blob and `digest` commits to
/// what was stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Node-local record identifier.
    pub id: String,
    /// Address of the user who stored the payload.
    pub user: String,
    /// Plaintext size in bytes.
    pub size: usize,
    /// Hex BLAKE3 digest of the plaintext.
    pub digest: String,
    /// `nonce || ciphertext` under the node's payload cipher.
    pub ciphertext: Vec<u8>,
    /// Unix timestamp (milliseconds) when the record was accepted.
    pub stored_at: u64,
}

// ---------------------------------------------------------------------------
// MarketNode
// ---------------------------------------------------------------------------

struct NodeState {
    resilience: f64,
    reputation: f64,
    token_balance: i64,
    whitelist: HashSet<String>,
    records: Vec<StoredRecord>,
}

/// One marketplace participant.
pub struct MarketNode {
    address: String,
    keypair: TroveKeypair,
    cipher: PayloadCipher,
    env: MarketEnv,
    fee_model: Box<dyn FeeModel>,
    content_policy: Box<dyn ContentPolicy>,
    admin_policy: Box<dyn AdminPolicy>,
    /// Serializes whole operations, gateway awaits included.
    op_guard: tokio::sync::Mutex<()>,
    state: Mutex<NodeState>,
}

impl MarketNode {
    /// Create a node with the default fee model and open policies.
    pub fn new(keypair: TroveKeypair, resilience: f64, env: MarketEnv) -> Self {
        Self::with_policies(
            keypair,
            resilience,
            env,
            Box::new(ByteFeeModel::default()),
            Box::new(AllowAll),
            Box::new(OpenAdminPolicy),
        )
    }

    /// Create a node with explicit fee and policy choices.
    pub fn with_policies(
        keypair: TroveKeypair,
        resilience: f64,
        env: MarketEnv,
        fee_model: Box<dyn FeeModel>,
        content_policy: Box<dyn ContentPolicy>,
        admin_policy: Box<dyn AdminPolicy>,
    ) -> Self {
        Self {
            address: keypair.address(),
            keypair,
            cipher: PayloadCipher::generate(),
            env,
            fee_model,
            content_policy,
            admin_policy,
            op_guard: tokio::sync::Mutex::new(()),
            state: Mutex::new(NodeState {
                resilience: resilience.clamp(0.0, 1.0),
                reputation: 0.0,
                token_balance: 0,
                whitelist: HashSet::new(),
                records: Vec::new(),
            }),
        }
    }

    /// The node's ledger address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The node's public identity key.
    pub fn public_key(&self) -> TrovePublicKey {
        self.keypair.public_key()
    }

    // -- Marketplace operations ---------------------------------------------

    /// Accept a payload from a whitelisted user, for a fee.
    ///
    /// Checks, in order: the user is whitelisted, the signature
    /// authorizes storing exactly this data on this node, the content
    /// policy accepts the payload, and the payload fits the size limit.
    /// The settlement transaction is submitted to the gateway before any
    /// local state changes; a gateway failure propagates and the node is
    /// left exactly as it was.
    ///
    /// On success the node's balance grows by exactly the fee, its
    /// reputation grows one step, and the encrypted record is retained.
    /// Reputation pays out through mining rewards, never through store
    /// fees.
    pub async fn store_data(
        &self,
        data: &[u8],
        user: &TrovePublicKey,
        signature: &TroveSignature,
    ) -> Result<(StoredRecord, Transaction), MarketError> {
        let _op = self.op_guard.lock().await;
        let user_address = user.address();

        if !self.state.lock().whitelist.contains(&user_address) {
            return Err(MarketError::Authorization {
                user: user_address,
                reason: "not whitelisted".to_string(),
            });
        }
        if !verify_store_auth(user, data, &self.address, signature) {
            return Err(MarketError::Authorization {
                user: user_address,
                reason: "store authorization signature invalid".to_string(),
            });
        }
        if self.content_policy.is_malicious(data) {
            return Err(MarketError::Content {
                reason: "payload flagged by content policy".to_string(),
            });
        }
        if data.len() > MAX_PAYLOAD_BYTES {
            return Err(MarketError::PayloadTooLarge { size: data.len() });
        }

        let fee = self.fee_model.fee_for(data.len());
        let digest = hex::encode(blake3_hash(data));
        let ciphertext = self.cipher.encrypt(data)?;

        let mut tx = TransactionBuilder::new(TxKind::StoreData)
            .sender(&self.address)
            .recipient(&user_address)
            .fee(fee)
            .payload(blake3_hash(data).to_vec())
            .build();
        sign_transaction(&mut tx, &self.keypair);

        // Submit before touching local state. If the gateway or the
        // ledger refuses, nothing here has happened yet.
        let tx = self.process_transaction(tx).await?;

        let record = {
            let mut state = self.state.lock();
            state.token_balance += fee as i64;
            state.reputation = grow_reputation(state.reputation);

            let record = StoredRecord {
                id: Uuid::new_v4().to_string(),
                user: user_address,
                size: data.len(),
                digest,
                ciphertext,
                stored_at: Utc::now().timestamp_millis() as u64,
            };
            state.records.push(record.clone());
            record
        };

        info!(
            node = %self.address,
            user = %record.user,
            size = record.size,
            fee,
            tx = %tx.id,
            "payload stored"
        );
        Ok((record, tx))
    }

    /// Serve a payload from the data network to an authorized user, for
    /// a fee.
    ///
    /// Checks, in order: the signature authorizes this user to request
    /// from this node, the node can cover the fee it is about to incur,
    /// and the user is whitelisted. The settlement transaction is then
    /// submitted, the payload fetched from the network, screened by the
    /// content policy, and only after all of that does the fee leave the
    /// node's balance. Any failure on the way leaves the balance
    /// untouched.
    pub async fn request_data(
        &self,
        key: &str,
        size: usize,
        user: &TrovePublicKey,
        signature: &TroveSignature,
    ) -> Result<Vec<u8>, MarketError> {
        let _op = self.op_guard.lock().await;
        let user_address = user.address();

        if !verify_request_auth(user, &self.address, signature) {
            return Err(MarketError::Authorization {
                user: user_address,
                reason: "request authorization signature invalid".to_string(),
            });
        }

        let fee = self.fee_model.fee_for(size);
        {
            let state = self.state.lock();
            if state.token_balance < fee as i64 {
                return Err(MarketError::InsufficientBalance {
                    available: state.token_balance,
                    required: fee,
                });
            }
            if !state.whitelist.contains(&user_address) {
                return Err(MarketError::Authorization {
                    user: user_address,
                    reason: "not whitelisted".to_string(),
                });
            }
        }

        let mut tx = TransactionBuilder::new(TxKind::DataRequest)
            .sender(&self.address)
            .recipient(&user_address)
            .fee(fee)
            .payload(key.as_bytes().to_vec())
            .build();
        sign_transaction(&mut tx, &self.keypair);
        let tx = self.process_transaction(tx).await?;

        let payload = self
            .env
            .network
            .retrieve_data(key)
            .await?
            .ok_or_else(|| MarketError::DataUnavailable {
                key: key.to_string(),
            })?;

        if self.content_policy.is_malicious(&payload) {
            return Err(MarketError::Content {
                reason: "retrieved payload flagged by content policy".to_string(),
            });
        }

        self.state.lock().token_balance -= fee as i64;
        info!(
            node = %self.address,
            user = %user_address,
            key,
            fee,
            tx = %tx.id,
            "payload served"
        );
        Ok(payload)
    }

    /// Settle a signed transaction: gateway first, then the pending pool.
    async fn process_transaction(&self, tx: Transaction) -> Result<Transaction, MarketError> {
        let tx = settle_transaction(self.env.gateway.as_ref(), &self.keypair, tx).await?;
        self.env.ledger.add_transaction(tx.clone())?;
        debug!(node = %self.address, tx = %tx.id, "transaction settled and queued");
        Ok(tx)
    }

    // -- Whitelist ----------------------------------------------------------

    /// Add a user to the whitelist. Returns `true` if the user was not
    /// already present; adding twice is a no-op, not an error.
    ///
    /// `caller` must pass the node's admin policy.
    pub fn add_user_to_whitelist(&self, caller: &str, user: &str) -> Result<bool, MarketError> {
        self.check_admin(caller)?;
        Ok(self.state.lock().whitelist.insert(user.to_string()))
    }

    /// Remove a user from the whitelist. Returns `true` if the user was
    /// present; removing an absent user is a no-op, not an error.
    pub fn remove_user_from_whitelist(&self, caller: &str, user: &str) -> Result<bool, MarketError> {
        self.check_admin(caller)?;
        Ok(self.state.lock().whitelist.remove(user))
    }

    /// Returns `true` if `user` is currently whitelisted.
    pub fn is_whitelisted(&self, user: &str) -> bool {
        self.state.lock().whitelist.contains(user)
    }

    fn check_admin(&self, caller: &str) -> Result<(), MarketError> {
        if !self.admin_policy.can_mutate_whitelist(caller) {
            return Err(MarketError::Authorization {
                user: caller.to_string(),
                reason: "not permitted to administer the whitelist".to_string(),
            });
        }
        Ok(())
    }

    // -- Scores and balance -------------------------------------------------

    /// Set the resilience score. Must lie in `[0, 1]`.
    pub fn update_resilience_score(&self, value: f64) -> Result<(), MarketError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MarketError::ScoreOutOfRange {
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        self.state.lock().resilience = value;
        Ok(())
    }

    pub fn get_resilience_score(&self) -> f64 {
        self.state.lock().resilience
    }

    /// Set the reputation score directly. Must be finite and
    /// non-negative; normal growth goes through the crediting paths.
    pub fn update_reputation_score(&self, value: f64) -> Result<(), MarketError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MarketError::ScoreOutOfRange {
                value,
                min: 0.0,
                max: f64::MAX,
            });
        }
        self.state.lock().reputation = value;
        Ok(())
    }

    pub fn get_reputation_score(&self) -> f64 {
        self.state.lock().reputation
    }

    /// The node's marketplace balance in grains. Signed: fees and
    /// rewards credit it, served requests debit it.
    pub fn token_balance(&self) -> i64 {
        self.state.lock().token_balance
    }

    /// Credit a mining reward and grow reputation. Called synchronously
    /// from the mining path via the registry.
    pub fn credit_mining_reward(&self, reward: u64) {
        let mut state = self.state.lock();
        state.token_balance += reward as i64;
        state.reputation = grow_reputation(state.reputation);
    }

    /// Snapshot of the records this node holds.
    pub fn stored_records(&self) -> Vec<StoredRecord> {
        self.state.lock().records.clone()
    }

    /// Decrypt a stored record back to its plaintext. The record must
    /// have been produced by this node; another node's cipher key will
    /// not open it.
    pub fn open_record(&self, record: &StoredRecord) -> Result<Vec<u8>, MarketError> {
        Ok(self.cipher.decrypt(&record.ciphertext)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signatures::{authorize_request, authorize_store};
    use crate::gateway::{InMemoryNetwork, LocalGateway};
    use crate::market::fees::FlatFeeModel;
    use crate::market::policy::{DenyPatterns, OperatorAdminPolicy};

    struct Fixture {
        env: MarketEnv,
        gateway: Arc<LocalGateway>,
        network: Arc<InMemoryNetwork>,
    }

    fn fixture() -> Fixture {
        let gateway = Arc::new(LocalGateway::new());
        let network = Arc::new(InMemoryNetwork::new());
        let env = MarketEnv {
            ledger: Arc::new(Ledger::with_difficulty(1)),
            gateway: Arc::clone(&gateway) as Arc<dyn ChainGateway>,
            network: Arc::clone(&network) as Arc<dyn DataNetwork>,
        };
        Fixture { env, gateway, network }
    }

    fn funded_node(fx: &Fixture, resilience: f64) -> MarketNode {
        let node = MarketNode::new(TroveKeypair::generate(), resilience, fx.env.clone());
        fx.gateway.fund(node.address(), 1_000_000);
        fx.gateway.fund(node.address(), 1_000_000);
        fx.gateway.fund(node.address(), 1_000_000);
        node
    }

    #[tokio::test]
    async fn store_data_happy_path() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        let data = b"weather telemetry";
        let sig = authorize_store(&user, data, node.address());
        let (record, tx) = node.store_data(data, &user.public_key(), &sig).await.unwrap();

        assert_eq!(record.user, user.address());
        assert_eq!(record.size, data.len());
        assert!(tx.is_submitted());
        assert_eq!(node.token_balance(), tx.fee as i64);
        assert!(node.get_reputation_score() > 0.0);
        assert_eq!(fx.env.ledger.pending_len(), 1);

        // The record decrypts back to the original payload.
        assert_eq!(node.open_record(&record).unwrap(), data);
    }

    #[tokio::test]
    async fn store_data_rejects_unwhitelisted_before_signature_check() {
        // A non-whitelisted user is rejected the same way whether or not
        // their signature is valid.
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        let data = b"data";

        let good_sig = authorize_store(&user, data, node.address());
        let bad_sig = authorize_store(&user, b"other", node.address());

        for sig in [good_sig, bad_sig] {
            match node.store_data(data, &user.public_key(), &sig).await {
                Err(MarketError::Authorization { reason, .. }) => {
                    assert_eq!(reason, "not whitelisted")
                }
                other => panic!("expected Authorization, got {:?}", other),
            }
        }
        assert_eq!(node.token_balance(), 0);
        assert_eq!(fx.env.ledger.pending_len(), 0);
    }

    #[tokio::test]
    async fn store_data_rejects_bad_signature() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        // Signature over different data.
        let sig = authorize_store(&user, b"something else", node.address());
        match node.store_data(b"data", &user.public_key(), &sig).await {
            Err(MarketError::Authorization { reason, .. }) => {
                assert!(reason.contains("signature"))
            }
            other => panic!("expected Authorization, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn store_data_rejects_malicious_content() {
        let fx = fixture();
        let node = MarketNode::with_policies(
            TroveKeypair::generate(),
            0.8,
            fx.env.clone(),
            Box::new(ByteFeeModel::default()),
            Box::new(DenyPatterns::new([b"exploit".to_vec()])),
            Box::new(OpenAdminPolicy),
        );
        fx.gateway.fund(node.address(), 1_000);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        let data = b"an exploit payload";
        let sig = authorize_store(&user, data, node.address());
        match node.store_data(data, &user.public_key(), &sig).await {
            Err(MarketError::Content { .. }) => {}
            other => panic!("expected Content, got {:?}", other),
        }
        assert!(node.stored_records().is_empty());
    }

    #[tokio::test]
    async fn store_data_gateway_failure_rolls_back() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();
        fx.gateway.set_offline(true);

        let data = b"payload";
        let sig = authorize_store(&user, data, node.address());
        match node.store_data(data, &user.public_key(), &sig).await {
            Err(MarketError::Gateway(_)) => {}
            other => panic!("expected Gateway, got {:?}", other),
        }

        // Nothing moved: no balance, no reputation, no record, no
        // pending transaction.
        assert_eq!(node.token_balance(), 0);
        assert_eq!(node.get_reputation_score(), 0.0);
        assert!(node.stored_records().is_empty());
        assert_eq!(fx.env.ledger.pending_len(), 0);
    }

    #[tokio::test]
    async fn sequential_stores_credit_fee_each_and_grow_reputation() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        let data = b"same payload twice";
        let fee = ByteFeeModel::default().fee_for(data.len());

        let sig = authorize_store(&user, data, node.address());
        node.store_data(data, &user.public_key(), &sig).await.unwrap();
        let rep_after_first = node.get_reputation_score();
        assert_eq!(node.token_balance(), fee as i64);

        // Reputation is non-zero now; the credit must still be exactly
        // the fee, never a reputation-scaled amount.
        let sig = authorize_store(&user, data, node.address());
        node.store_data(data, &user.public_key(), &sig).await.unwrap();
        assert_eq!(node.token_balance(), 2 * fee as i64);
        assert!(node.get_reputation_score() > rep_after_first);
    }

    #[tokio::test]
    async fn established_node_still_credits_exactly_the_fee() {
        // Even a node with substantial reputation earns store fees at
        // face value; reputation scales mining rewards only.
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        node.update_reputation_score(5.0).unwrap();
        node.credit_mining_reward(1_000);
        let balance_before = node.token_balance();

        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        let data = b"tide tables";
        let sig = authorize_store(&user, data, node.address());
        let (_, tx) = node.store_data(data, &user.public_key(), &sig).await.unwrap();

        assert_eq!(tx.fee, ByteFeeModel::default().fee_for(data.len()));
        assert_eq!(node.token_balance(), balance_before + tx.fee as i64);
    }

    #[tokio::test]
    async fn request_data_happy_path() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();
        node.credit_mining_reward(10_000); // solvency
        let balance_before = node.token_balance();

        fx.network.publish("weather/today", b"sunny, 24C".to_vec());

        let sig = authorize_request(&user, node.address());
        let payload = node
            .request_data("weather/today", 10, &user.public_key(), &sig)
            .await
            .unwrap();

        assert_eq!(payload, b"sunny, 24C");
        let fee = ByteFeeModel::default().fee_for(10);
        assert_eq!(node.token_balance(), balance_before - fee as i64);
    }

    #[tokio::test]
    async fn insolvent_request_fails_and_balance_unchanged() {
        let fx = fixture();
        let node = MarketNode::with_policies(
            TroveKeypair::generate(),
            0.8,
            fx.env.clone(),
            Box::new(FlatFeeModel(1_000)),
            Box::new(AllowAll),
            Box::new(OpenAdminPolicy),
        );
        fx.gateway.fund(node.address(), 1_000_000);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();

        let sig = authorize_request(&user, node.address());
        match node.request_data("key", 10, &user.public_key(), &sig).await {
            Err(MarketError::InsufficientBalance {
                available: 0,
                required: 1_000,
            }) => {}
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(node.token_balance(), 0);
        assert_eq!(fx.env.ledger.pending_len(), 0);
    }

    #[tokio::test]
    async fn request_missing_key_keeps_balance() {
        let fx = fixture();
        let node = funded_node(&fx, 0.8);
        let user = TroveKeypair::generate();
        node.add_user_to_whitelist("op", &user.address()).unwrap();
        node.credit_mining_reward(10_000);
        let balance_before = node.token_balance();

        let sig = authorize_request(&user, node.address());
        match node.request_data("nope", 10, &user.public_key(), &sig).await {
            Err(MarketError::DataUnavailable { .. }) => {}
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
        assert_eq!(node.token_balance(), balance_before);
    }

    #[test]
    fn whitelist_add_remove_idempotent() {
        let fx = fixture();
        let node = MarketNode::new(TroveKeypair::generate(), 0.5, fx.env);

        assert!(node.add_user_to_whitelist("op", "trove1user").unwrap());
        assert!(!node.add_user_to_whitelist("op", "trove1user").unwrap());
        assert!(node.is_whitelisted("trove1user"));

        assert!(node.remove_user_from_whitelist("op", "trove1user").unwrap());
        assert!(!node.remove_user_from_whitelist("op", "trove1user").unwrap());
        assert!(!node.is_whitelisted("trove1user"));
    }

    #[test]
    fn whitelist_mutation_gated_by_admin_policy() {
        let fx = fixture();
        let node = MarketNode::with_policies(
            TroveKeypair::generate(),
            0.5,
            fx.env,
            Box::new(ByteFeeModel::default()),
            Box::new(AllowAll),
            Box::new(OperatorAdminPolicy::new(["trove1operator".to_string()])),
        );

        assert!(matches!(
            node.add_user_to_whitelist("trove1stranger", "trove1user"),
            Err(MarketError::Authorization { .. })
        ));
        assert!(node
            .add_user_to_whitelist("trove1operator", "trove1user")
            .unwrap());
    }

    #[test]
    fn resilience_score_validated() {
        let fx = fixture();
        let node = MarketNode::new(TroveKeypair::generate(), 0.5, fx.env);

        node.update_resilience_score(0.9).unwrap();
        assert_eq!(node.get_resilience_score(), 0.9);

        for bad in [-0.1, 1.1, f64::NAN] {
            assert!(matches!(
                node.update_resilience_score(bad),
                Err(MarketError::ScoreOutOfRange { .. })
            ));
        }
        assert_eq!(node.get_resilience_score(), 0.9);
    }

    #[test]
    fn reputation_score_must_be_finite_non_negative() {
        let fx = fixture();
        let node = MarketNode::new(TroveKeypair::generate(), 0.5, fx.env);

        node.update_reputation_score(2.5).unwrap();
        assert_eq!(node.get_reputation_score(), 2.5);

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                node.update_reputation_score(bad),
                Err(MarketError::ScoreOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn mining_credit_grows_balance_and_reputation() {
        let fx = fixture();
        let node = MarketNode::new(TroveKeypair::generate(), 0.5, fx.env);

        node.credit_mining_reward(50);
        assert_eq!(node.token_balance(), 50);
        let rep = node.get_reputation_score();
        assert!(rep > 0.0);

        node.credit_mining_reward(50);
        assert_eq!(node.token_balance(), 100);
        assert!(node.get_reputation_score() > rep);
    }
}
