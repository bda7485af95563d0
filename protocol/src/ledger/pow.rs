//! # Proof-of-Work Search
//!
//! The nonce loop. Given a candidate block, iterate the nonce until the
//! block hash satisfies the difficulty target, or until someone tells us
//! to stop.
//!
//! The search is CPU-bound and synchronous. Callers on an async runtime
//! should run it on a blocking thread (`tokio::task::spawn_blocking`) and
//! use a [`MineControl`] to cancel it; the loop checks the flag every
//! iteration, so cancellation latency is one hash.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::block::Block;
use super::LedgerError;

// ---------------------------------------------------------------------------
// MineControl
// ---------------------------------------------------------------------------

/// Cancellation handle for an in-flight nonce search.
///
/// Clone it, hand one copy to the miner and keep the other; calling
/// [`stop`](MineControl::stop) from any thread aborts the search at the
/// next iteration. An optional nonce budget bounds the search even when
/// nobody is watching.
#[derive(Clone, Debug, Default)]
pub struct MineControl {
    stop: Arc<AtomicBool>,
    max_nonce: Option<u64>,
}

impl MineControl {
    /// A control that never stops the search on its own.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A control that aborts the search after `max_nonce` attempts.
    pub fn with_budget(max_nonce: u64) -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            max_nonce: Some(max_nonce),
        }
    }

    /// Signal the search to abort. Takes effect within one iteration.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`stop`](MineControl::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Run the proof-of-work search on a candidate block.
///
/// Iterates the nonce from zero, recomputing the hash each step, until
/// [`Block::meets_pow`] holds. On success the block carries the winning
/// nonce and hash. On cancellation or budget exhaustion the block is left
/// at its last attempted nonce and [`LedgerError::MiningAborted`] is
/// returned.
pub fn solve(block: &mut Block, control: &MineControl) -> Result<(), LedgerError> {
    let mut attempts: u64 = 0;
    loop {
        if control.is_stopped() {
            debug!(height = block.height, attempts, "mining cancelled");
            return Err(LedgerError::MiningAborted { attempts });
        }
        if let Some(budget) = control.max_nonce {
            if attempts >= budget {
                debug!(height = block.height, attempts, "nonce budget exhausted");
                return Err(LedgerError::MiningAborted { attempts });
            }
        }

        block.nonce = attempts;
        block.hash = block.compute_hash();
        if block.meets_pow() {
            debug!(
                height = block.height,
                nonce = block.nonce,
                hash = %block.hash,
                "proof of work found"
            );
            return Ok(());
        }

        trace!(height = block.height, nonce = block.nonce, "nonce rejected");
        attempts += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::block::Block;

    fn candidate(difficulty: usize) -> Block {
        Block::candidate(1, "ab".repeat(32), vec![], difficulty)
    }

    #[test]
    fn solve_finds_valid_nonce() {
        let mut block = candidate(2);
        solve(&mut block, &MineControl::unbounded()).unwrap();
        assert!(block.meets_pow());
        assert!(block.verify().is_ok());
    }

    #[test]
    fn solved_hash_matches_contents() {
        let mut block = candidate(2);
        solve(&mut block, &MineControl::unbounded()).unwrap();
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn zero_difficulty_solves_immediately() {
        let mut block = candidate(0);
        solve(&mut block, &MineControl::unbounded()).unwrap();
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn pre_stopped_control_aborts_at_once() {
        let control = MineControl::unbounded();
        control.stop();

        let mut block = candidate(2);
        match solve(&mut block, &control) {
            Err(LedgerError::MiningAborted { attempts: 0 }) => {}
            other => panic!("expected MiningAborted, got {:?}", other),
        }
    }

    #[test]
    fn exhausted_budget_aborts() {
        // Difficulty 8 at a 1-nonce budget: no realistic chance of a
        // solution, so the budget must trip.
        let mut block = candidate(8);
        match solve(&mut block, &MineControl::with_budget(1)) {
            Err(LedgerError::MiningAborted { attempts: 1 }) => {}
            other => panic!("expected MiningAborted, got {:?}", other),
        }
    }

    #[test]
    fn cloned_control_stops_original_search() {
        let control = MineControl::unbounded();
        let handle = control.clone();
        handle.stop();
        assert!(control.is_stopped());
    }
}
