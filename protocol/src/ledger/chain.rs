//! # The Ledger
//!
//! Pending pool, chain storage, mining, and balance queries behind a
//! single shared handle.
//!
//! ## Locking
//!
//! All mutable state lives in one `RwLock<ChainState>`. The expensive
//! part of mining (the nonce search) runs entirely outside the lock on a
//! snapshot of the pool, so readers and writers keep flowing while a
//! block is being mined. The append at the end is atomic: the block goes
//! in and exactly the snapshotted transactions come out of the pool, so a
//! transaction added mid-search is never lost, it just waits for the next
//! block.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::block::Block;
use super::pow::{self, MineControl};
use super::LedgerError;
use crate::config::{mining_reward, INITIAL_DIFFICULTY};
use crate::transaction::{verify_transaction, Transaction};

// ---------------------------------------------------------------------------
// RewardLedger
// ---------------------------------------------------------------------------

/// Where block rewards go.
///
/// Mining is parameterized over this seam instead of reaching for any
/// global registry: the caller passes in whatever tracks miner balances
/// and reputations, and the ledger stays ignorant of marketplace
/// bookkeeping.
pub trait RewardLedger {
    /// Current reputation of the miner, used to scale the block reward.
    fn reputation_of(&self, address: &str) -> f64;

    /// Credit a freshly mined block's reward and apply reputation growth.
    fn credit_mining_reward(&self, address: &str, reward: u64);
}

/// Discards rewards entirely. Useful when mining for chain maintenance
/// rather than profit.
impl RewardLedger for () {
    fn reputation_of(&self, _address: &str) -> f64 {
        0.0
    }

    fn credit_mining_reward(&self, _address: &str, _reward: u64) {}
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

struct ChainState {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl ChainState {
    /// The chain always holds at least the genesis block.
    fn tip(&self) -> &Block {
        &self.chain[self.chain.len() - 1]
    }
}

/// The TROVE settlement ledger.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Ledger {
    state: RwLock<ChainState>,
    difficulty: usize,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a ledger holding only the genesis block, mining at the
    /// default difficulty.
    pub fn new() -> Self {
        Self::with_difficulty(INITIAL_DIFFICULTY)
    }

    /// Create a ledger mining at a specific difficulty. Tests use low
    /// difficulties to keep the nonce search fast.
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            state: RwLock::new(ChainState {
                chain: vec![Block::genesis()],
                pending: Vec::new(),
            }),
            difficulty,
        }
    }

    // -- Pending pool -------------------------------------------------------

    /// Verify a transaction and place it in the pending pool.
    ///
    /// Duplicate IDs are rejected: the pool holds each transaction at
    /// most once.
    pub fn add_transaction(&self, tx: Transaction) -> Result<(), LedgerError> {
        verify_transaction(&tx).map_err(|e| LedgerError::InvalidTransaction {
            id: tx.id.clone(),
            reason: e.to_string(),
        })?;

        let mut state = self.state.write();
        if state.pending.iter().any(|p| p.id == tx.id) {
            return Err(LedgerError::InvalidTransaction {
                id: tx.id,
                reason: "already in pending pool".to_string(),
            });
        }
        debug!(id = %tx.id, kind = %tx.kind, "transaction queued");
        state.pending.push(tx);
        Ok(())
    }

    /// Check a transaction against the current chain without touching the
    /// pool: full signature verification plus solvency, replaying the
    /// sender's settled balance. Deeper than pool admission, which does
    /// not gate on balance (funding may still be in flight on the
    /// external chain).
    pub fn verify_transaction(&self, tx: &Transaction) -> bool {
        if let Err(e) = verify_transaction(tx) {
            warn!(id = %tx.id, error = %e, "transaction failed verification");
            return false;
        }
        if tx.amount > 0 && tx.amount as i64 > self.balance_of(&tx.sender) {
            warn!(id = %tx.id, amount = tx.amount, "sender cannot cover amount");
            return false;
        }
        true
    }

    /// Number of transactions waiting to be mined.
    pub fn pending_len(&self) -> usize {
        self.state.read().pending.len()
    }

    // -- Mining -------------------------------------------------------------

    /// Mine the pending pool into a new block.
    ///
    /// Snapshot-mine-append: the pool and chain tip are snapshotted under
    /// the lock, the proof-of-work search runs outside it, and the
    /// result is appended atomically with removal of exactly the
    /// snapshotted transactions. On success the miner is credited its
    /// reputation-scaled reward through `rewards`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MiningAborted`] if `control` stops the search, and
    /// [`LedgerError::InvalidBlock`] if the chain advanced under us while
    /// the search ran (only possible with multiple concurrent miners on
    /// one ledger).
    pub fn mine_pending<R: RewardLedger>(
        &self,
        miner: &str,
        rewards: &R,
        control: &MineControl,
    ) -> Result<Block, LedgerError> {
        let (parent_hash, height, transactions) = {
            let state = self.state.read();
            let tip = state.tip();
            (tip.hash.clone(), tip.height + 1, state.pending.clone())
        };

        let mut block = Block::candidate(height, parent_hash, transactions, self.difficulty);
        pow::solve(&mut block, control)?;

        let mined_ids: HashSet<&str> = block.transactions.iter().map(|tx| tx.id.as_str()).collect();
        {
            let mut state = self.state.write();
            if state.tip().hash != block.previous_hash {
                return Err(LedgerError::InvalidBlock {
                    height: block.height,
                    reason: "chain advanced during mining".to_string(),
                });
            }
            state.pending.retain(|tx| !mined_ids.contains(tx.id.as_str()));
            state.chain.push(block.clone());
        }

        let reward = mining_reward(rewards.reputation_of(miner));
        rewards.credit_mining_reward(miner, reward);
        info!(
            height = block.height,
            hash = %block.hash,
            txs = block.tx_count(),
            miner,
            reward,
            "block mined"
        );
        Ok(block)
    }

    /// Append an externally produced block after full validation.
    ///
    /// The block must verify on its own (hash consistency and proof of
    /// work), link to the current tip, and sit at the next height. Any
    /// of its transactions still in the pending pool are removed.
    pub fn add_block(&self, block: Block) -> Result<(), LedgerError> {
        block.verify().map_err(|reason| LedgerError::InvalidBlock {
            height: block.height,
            reason,
        })?;

        let mut state = self.state.write();
        let tip = state.tip();
        if block.previous_hash != tip.hash {
            return Err(LedgerError::InvalidBlock {
                height: block.height,
                reason: format!(
                    "previous_hash {} does not match tip {}",
                    block.previous_hash, tip.hash
                ),
            });
        }
        if block.height != tip.height + 1 {
            return Err(LedgerError::InvalidBlock {
                height: block.height,
                reason: format!("expected height {}", tip.height + 1),
            });
        }

        let ids: HashSet<&str> = block.transactions.iter().map(|tx| tx.id.as_str()).collect();
        state.pending.retain(|tx| !ids.contains(tx.id.as_str()));
        state.chain.push(block);
        Ok(())
    }

    // -- Queries ------------------------------------------------------------

    /// Derive an address's settled balance by replaying the full chain.
    ///
    /// Signed: nothing stops the chain from recording more outflow than
    /// inflow for an address whose funding lives on the external chain,
    /// and a negative number is more honest than a saturated zero.
    /// Pending transactions do not count; only mined ones.
    pub fn balance_of(&self, address: &str) -> i64 {
        let state = self.state.read();
        let mut balance: i64 = 0;
        for block in &state.chain {
            for tx in &block.transactions {
                if tx.sender == address {
                    balance -= tx.amount as i64;
                }
                if tx.recipient == address {
                    balance += tx.amount as i64;
                }
            }
        }
        balance
    }

    /// Current chain height (genesis = 0).
    pub fn height(&self) -> u64 {
        self.state.read().tip().height
    }

    /// Snapshot of the full chain, genesis first.
    pub fn blocks(&self) -> Vec<Block> {
        self.state.read().chain.clone()
    }

    /// Verify every block and linkage in the chain. Returns the height of
    /// the first invalid block, or `Ok(())` for a sound chain.
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        let state = self.state.read();
        for (i, block) in state.chain.iter().enumerate() {
            block.verify().map_err(|reason| LedgerError::InvalidBlock {
                height: block.height,
                reason,
            })?;
            if i > 0 {
                let parent = &state.chain[i - 1];
                if block.previous_hash != parent.hash || block.height != parent.height + 1 {
                    return Err(LedgerError::InvalidBlock {
                        height: block.height,
                        reason: "broken chain linkage".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
