//! # Transaction Module
//!
//! Construction, signing, and verification for TROVE ledger transactions.
//! Every token transfer and every settled marketplace operation is
//! represented as a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — TxKind, the operation discriminant
//! builder.rs      — Transaction and the fluent TransactionBuilder
//! signing.rs      — Transaction signing with Ed25519 keypairs
//! verification.rs — Structural and cryptographic verification
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — Use [`TransactionBuilder`] to assemble the fields.
//! 2. **Sign** — Call [`sign_transaction`] with the sender's keypair.
//! 3. **Submit** — Hand the transaction to a chain gateway, which assigns
//!    its own `gateway_id`, then place it in the ledger's pending pool.
//! 4. **Verify** — The ledger runs [`verify_transaction`] before mining.
//!
//! ## Design Decisions
//!
//! - Transaction IDs are `double_sha256` of the canonical byte form
//!   (excluding signature and gateway metadata), so the ID is computable
//!   before submission and stable across both signing and gateway
//!   acceptance.
//! - Amounts are `u64` grains. No floating point anywhere near tokens.
//! - Marketplace settlement transactions carry `amount = 0` and express
//!   their economics entirely through the fee; only plain transfers
//!   require a positive amount.

pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use signing::sign_transaction;
pub use types::TxKind;
pub use verification::{verify_transaction, TransactionError};
