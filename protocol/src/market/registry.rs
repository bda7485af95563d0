//! The node registry.
//!
//! An explicit, process-wide map from address to marketplace node. It is
//! passed by value wherever it is needed, mining included; there is no
//! hidden global to reach for, which keeps tests hermetic and makes the
//! dependency visible in every signature that has one.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

use super::node::MarketNode;
use crate::ledger::RewardLedger;

/// Address-indexed collection of the marketplace nodes in this process.
///
/// Cheap to clone; the map is shared.
#[derive(Clone, Default)]
pub struct Registry {
    nodes: Arc<DashMap<String, Arc<MarketNode>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its address. Replaces any previous entry
    /// for the same address.
    pub fn register(&self, node: Arc<MarketNode>) {
        self.nodes.insert(node.address().to_string(), node);
    }

    /// Look up a node by address.
    pub fn get(&self, address: &str) -> Option<Arc<MarketNode>> {
        self.nodes.get(address).map(|entry| Arc::clone(&entry))
    }

    /// Remove a node. Returns it if it was registered.
    pub fn deregister(&self, address: &str) -> Option<Arc<MarketNode>> {
        self.nodes.remove(address).map(|(_, node)| node)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Addresses of every registered node, in no particular order.
    pub fn addresses(&self) -> Vec<String> {
        self.nodes.iter().map(|entry| entry.key().clone()).collect()
    }
}

/// Mining pays out through the registry: the miner's reputation scales
/// the reward, and the reward lands on the miner's node balance. A miner
/// we have never heard of earns at the fresh-node rate and the credit
/// goes nowhere.
impl RewardLedger for Registry {
    fn reputation_of(&self, address: &str) -> f64 {
        self.get(address)
            .map(|node| node.get_reputation_score())
            .unwrap_or(0.0)
    }

    fn credit_mining_reward(&self, address: &str, reward: u64) {
        match self.get(address) {
            Some(node) => node.credit_mining_reward(reward),
            None => warn!(miner = address, reward, "mining reward for unregistered node dropped"),
        }
    }
}
