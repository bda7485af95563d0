//! # Ledger Module
//!
//! The proof-of-work settlement layer. Marketplace operations produce
//! transactions; the ledger collects them in a pending pool, mines them
//! into blocks, and answers balance queries by replaying the chain.
//!
//! ## Architecture
//!
//! ```text
//! block.rs — Block structure, hashing, and the proof-of-work predicate
//! pow.rs   — The nonce search loop and its cancellation handle
//! chain.rs — Ledger: pending pool, mining, balances, block acceptance
//! ```
//!
//! ## Concurrency
//!
//! The `Ledger` is safe to share across tasks. Mining follows a
//! snapshot-mine-append protocol: the pending pool is snapshotted under
//! the lock, the nonce search runs outside it, and the mined block is
//! appended atomically with removal of exactly the snapshotted
//! transactions. A transaction added mid-search simply lands in the next
//! block.

pub mod block;
pub mod chain;
pub mod pow;

use thiserror::Error;

pub use block::Block;
pub use chain::{Ledger, RewardLedger};
pub use pow::MineControl;

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A block failed structural or proof-of-work validation.
    #[error("invalid block at height {height}: {reason}")]
    InvalidBlock { height: u64, reason: String },

    /// A transaction failed verification on its way into the pool.
    #[error("invalid transaction {id}: {reason}")]
    InvalidTransaction { id: String, reason: String },

    /// The nonce search was stopped before a solution was found, either
    /// by the cancellation flag or by exhausting the nonce budget.
    #[error("mining aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },
}
