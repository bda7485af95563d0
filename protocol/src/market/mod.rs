//! # Marketplace Module
//!
//! The node-side transaction lifecycle: users buy and sell data payloads
//! against marketplace nodes, every operation gated by whitelisting and
//! a signature authorization, priced by a fee model, and settled through
//! the ledger.
//!
//! ## Architecture
//!
//! ```text
//! fees.rs     — FeeModel trait and the byte-priced default
//! policy.rs   — ContentPolicy (payload screening) and AdminPolicy
//!               (who may mutate whitelists)
//! registry.rs — Registry: address -> node map, also the reward sink
//!               for mining
//! node.rs     — MarketNode: store_data, request_data, whitelist and
//!               score management
//! error.rs    — MarketError
//! ```
//!
//! ## The Shape of an Operation
//!
//! Both marketplace operations run the same skeleton: authorization
//! checks fail fast in a fixed order, the settlement transaction is
//! submitted to the external chain gateway *before* anything irreversible
//! happens locally, and only then do balances move. A gateway failure
//! therefore never leaves a node half-updated.

pub mod error;
pub mod fees;
pub mod node;
pub mod policy;
pub mod registry;

pub use error::MarketError;
pub use fees::{ByteFeeModel, FeeModel, FlatFeeModel};
pub use node::{MarketEnv, MarketNode, StoredRecord};
pub use policy::{
    AdminPolicy, AllowAll, ContentPolicy, DenyPatterns, OpenAdminPolicy, OperatorAdminPolicy,
};
pub use registry::Registry;
