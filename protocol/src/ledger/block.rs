//! # Block Structure
//!
//! A block is the atomic unit of settlement. Each block carries an
//! ordered list of transactions, a link to its parent, and a
//! proof-of-work nonce.
//!
//! ## Hash Computation
//!
//! The block hash covers: `height || timestamp || previous_hash ||
//! difficulty || nonce || transactions`. Transactions are folded in via
//! their IDs, which already commit to every signable field.
//!
//! ## Proof of Work
//!
//! A block satisfies proof of work when the first `difficulty` hex
//! characters of its hash equal the corresponding prefix of the shared
//! target constant. The target is all zeros, so in practice this means
//! `difficulty` leading zero characters. The genesis block is exempt; it
//! is constructed, not mined.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{INITIAL_DIFFICULTY, MAX_DIFFICULTY, POW_TARGET_PREFIX};
use crate::crypto::hash::{blake3_hash, blake3_hash_multi};
use crate::transaction::Transaction;

/// Message anchored into the genesis block's parent-hash slot. The chain
/// has no parent at height zero, so the slot records the protocol's
/// birth certificate instead.
pub const GENESIS_MESSAGE: &[u8] = b"TROVE/2026: data wants to be traded, not taken";

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A TROVE ledger block.
///
/// Blocks are immutable once mined. The `hash` field is the BLAKE3 digest
/// of the block contents including the winning nonce; recomputing it is
/// how verification detects tampering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block height (0-indexed, genesis = 0).
    pub height: u64,
    /// Unix timestamp (milliseconds) when this block was assembled.
    pub timestamp: u64,
    /// Ordered transactions settled by this block.
    pub transactions: Vec<Transaction>,
    /// Hex hash of the parent block. For genesis, the hash of
    /// [`GENESIS_MESSAGE`].
    pub previous_hash: String,
    /// Number of target-prefix characters this block's hash must match.
    pub difficulty: usize,
    /// The proof-of-work nonce. Zero for genesis and unmined candidates.
    pub nonce: u64,
    /// Hex BLAKE3 hash of the block contents.
    pub hash: String,
}

impl Block {
    /// Construct the genesis block.
    ///
    /// Height 0, no transactions, nonce 0, and a parent-hash slot holding
    /// the hash of the birth message. Genesis is exempt from proof of
    /// work; it anchors the chain by construction.
    pub fn genesis() -> Self {
        let mut block = Block {
            height: 0,
            timestamp: 0,
            transactions: Vec::new(),
            previous_hash: hex::encode(blake3_hash(GENESIS_MESSAGE)),
            difficulty: INITIAL_DIFFICULTY,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Assemble an unmined candidate block on top of a parent.
    ///
    /// The hash is computed for nonce 0; the proof-of-work search in
    /// [`crate::ledger::pow`] iterates the nonce until the hash meets the
    /// difficulty target.
    pub fn candidate(
        height: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        difficulty: usize,
    ) -> Self {
        let mut block = Block {
            height,
            timestamp: Utc::now().timestamp_millis() as u64,
            transactions,
            previous_hash,
            difficulty,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the block hash from the current field values.
    ///
    /// Transactions contribute through their IDs, which are themselves
    /// hashes over every signable field, so the block hash transitively
    /// commits to the full transaction contents.
    pub fn compute_hash(&self) -> String {
        let height = self.height.to_le_bytes();
        let timestamp = self.timestamp.to_le_bytes();
        let difficulty = (self.difficulty as u64).to_le_bytes();
        let nonce = self.nonce.to_le_bytes();

        let mut parts: Vec<&[u8]> = vec![
            &height,
            &timestamp,
            self.previous_hash.as_bytes(),
            &difficulty,
            &nonce,
        ];
        for tx in &self.transactions {
            parts.push(tx.id.as_bytes());
        }
        hex::encode(blake3_hash_multi(&parts))
    }

    /// Returns `true` if the stored hash satisfies the proof-of-work
    /// condition for this block's difficulty.
    ///
    /// The condition: the first `difficulty` characters of the hash equal
    /// the first `difficulty` characters of the shared target prefix.
    pub fn meets_pow(&self) -> bool {
        let d = self.difficulty.min(MAX_DIFFICULTY);
        self.hash.as_bytes().get(..d) == POW_TARGET_PREFIX.as_bytes().get(..d)
    }

    /// Verify block integrity: hash consistency, proof of work, and
    /// genesis invariants.
    ///
    /// # Errors
    ///
    /// Returns a descriptive reason on the first failing check.
    pub fn verify(&self) -> Result<(), String> {
        let expected = self.compute_hash();
        if self.hash != expected {
            return Err(format!(
                "hash mismatch: stored={}, computed={}",
                self.hash, expected
            ));
        }

        if self.difficulty > MAX_DIFFICULTY {
            return Err(format!(
                "difficulty {} exceeds maximum {}",
                self.difficulty, MAX_DIFFICULTY
            ));
        }

        if self.height == 0 {
            // Genesis is constructed, not mined.
            if self.previous_hash != hex::encode(blake3_hash(GENESIS_MESSAGE)) {
                return Err("genesis block must anchor the birth message".to_string());
            }
            return Ok(());
        }

        if !self.meets_pow() {
            return Err(format!(
                "proof of work not satisfied: hash {} does not match {} target characters",
                self.hash, self.difficulty
            ));
        }

        Ok(())
    }

    /// Return the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{TransactionBuilder, TxKind};

    fn make_test_tx(n: u64) -> Transaction {
        TransactionBuilder::new(TxKind::Transfer)
            .sender("trove1aaaa")
            .recipient("trove1bbbb")
            .amount(100 + n)
            .fee(1)
            .timestamp(1_000_000)
            .build()
    }

    #[test]
    fn genesis_block_properties() {
        let genesis = Block::genesis();
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.timestamp, 0);
        assert_eq!(genesis.nonce, 0);
        assert!(genesis.transactions.is_empty());
        assert_eq!(
            genesis.previous_hash,
            hex::encode(blake3_hash(GENESIS_MESSAGE))
        );
    }

    #[test]
    fn genesis_verifies_without_pow() {
        // Genesis almost certainly fails the difficulty check, and must
        // verify anyway.
        let genesis = Block::genesis();
        assert!(genesis.verify().is_ok());
    }

    #[test]
    fn genesis_hash_is_deterministic() {
        assert_eq!(Block::genesis().hash, Block::genesis().hash);
    }

    #[test]
    fn candidate_links_to_parent() {
        let genesis = Block::genesis();
        let block = Block::candidate(1, genesis.hash.clone(), vec![make_test_tx(1)], 2);
        assert_eq!(block.height, 1);
        assert_eq!(block.previous_hash, genesis.hash);
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn nonce_changes_hash() {
        let mut block = Block::candidate(1, "aa".repeat(32), vec![], 2);
        let before = block.hash.clone();
        block.nonce = 1;
        assert_ne!(before, block.compute_hash());
    }

    #[test]
    fn transactions_change_hash() {
        let empty = Block::candidate(1, "aa".repeat(32), vec![], 2);
        let mut full = Block::candidate(1, "aa".repeat(32), vec![make_test_tx(1)], 2);
        // Normalize the timestamps so only the transaction list differs.
        full.timestamp = empty.timestamp;
        assert_ne!(empty.compute_hash(), full.compute_hash());
    }

    #[test]
    fn meets_pow_checks_prefix_length() {
        let mut block = Block::candidate(1, "aa".repeat(32), vec![], 3);
        block.hash = format!("000{}", "f".repeat(61));
        assert!(block.meets_pow());

        block.hash = format!("00{}", "f".repeat(62));
        assert!(!block.meets_pow());
    }

    #[test]
    fn tampered_hash_fails_verification() {
        let genesis = Block::genesis();
        let mut block = Block::candidate(1, genesis.hash, vec![], 1);
        block.hash = "0".repeat(64); // right prefix, wrong content hash
        assert!(block.verify().is_err());
    }

    #[test]
    fn unmined_candidate_fails_verification() {
        // A fresh candidate has a consistent hash but (with overwhelming
        // probability) no proof of work at difficulty 3.
        let genesis = Block::genesis();
        let block = Block::candidate(1, genesis.hash, vec![make_test_tx(1)], 3);
        if !block.meets_pow() {
            assert!(block.verify().is_err());
        }
    }

    #[test]
    fn block_serde_roundtrip() {
        let genesis = Block::genesis();
        let json = serde_json::to_string(&genesis).unwrap();
        let recovered: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(genesis, recovered);
    }
}
