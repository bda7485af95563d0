// Copyright (c) 2026 Trove Labs. MIT License.
// See LICENSE for details.

//! # TROVE Protocol — Core Library
//!
//! TROVE is a small decentralized data-exchange marketplace: nodes trade
//! arbitrary data payloads for fungible tokens, gated by per-user signature
//! authorization and whitelisting, with transfers settled through a local
//! proof-of-work ledger.
//!
//! This is a single-process reference ledger, not a BFT protocol. There is
//! no gossip, no peer discovery, no fork choice. What there *is*: a real
//! chain of proof-of-work blocks, real Ed25519 authorization, real
//! AES-256-GCM encryption at rest, and a node-side transaction lifecycle
//! where every invariant (authorization, solvency, chain integrity) is
//! enforced before tokens move.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of the
//! marketplace:
//!
//! - **crypto** — Hashing, Ed25519 keys and authorization signatures,
//!   symmetric payload encryption. Don't roll your own.
//! - **transaction** — Transaction construction, signing, and verification.
//! - **ledger** — The core: blocks, proof-of-work mining, the pending pool,
//!   and balance derivation by chain replay.
//! - **market** — Per-node state machines: `store_data` / `request_data`,
//!   whitelists, fee models, content policy, and the node registry.
//! - **gateway** — The external chain gateway and data network seams.
//!   Opaque collaborators; the core only hands them work and reads back ids.
//! - **config** — Protocol constants and the incentive arithmetic.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance. Balances are derived by full chain
//!    replay, every time. O(n) and proud of it.
//! 2. Fail fast, fail loud. Policy rejections and infrastructure failures
//!    are distinct error types; neither is retried silently.
//! 3. If it touches tokens, it has tests.

pub mod config;
pub mod crypto;
pub mod gateway;
pub mod ledger;
pub mod market;
pub mod transaction;
