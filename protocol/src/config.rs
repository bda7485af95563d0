//! # Protocol Configuration & Constants
//!
//! Every magic number in TROVE lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! The incentive arithmetic (mining rewards, reputation growth) also lives
//! here so that the ledger and the market modules agree on it by
//! construction rather than by convention.

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Human-readable prefix for TROVE addresses. Short enough to type, long
/// enough to be unambiguous.
pub const ADDRESS_HRP: &str = "trove1";

/// Number of hex characters of the public-key hash that follow the prefix.
/// 40 hex chars = 160 bits of the BLAKE3 digest, same address width as
/// Bitcoin's HASH160. Collisions are not your problem at this size.
pub const ADDRESS_BODY_LEN: usize = 40;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// The full protocol version string, assembled at compile time so we don't
/// allocate for something this trivial at runtime.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Proof of Work
// ---------------------------------------------------------------------------

/// The fixed proof-of-work target prefix, shared by the whole ledger.
///
/// A block satisfies the proof-of-work condition when the first `difficulty`
/// hex characters of its content hash equal the first `difficulty` characters
/// of this constant. The prefix length is deliberately independent of any
/// particular difficulty value; difficulty only selects how much of it is
/// compared.
pub const POW_TARGET_PREFIX: &str = "00000000";

/// Upper bound on block difficulty: we can't compare more prefix characters
/// than the target constant has.
pub const MAX_DIFFICULTY: usize = POW_TARGET_PREFIX.len();

/// Difficulty recorded on the genesis block and used for every block the
/// reference ledger mines. 3 leading hex zeros ≈ 4096 expected nonce
/// attempts — instant on anything built this decade, but a real search.
pub const INITIAL_DIFFICULTY: usize = 3;

// ---------------------------------------------------------------------------
// Incentives
// ---------------------------------------------------------------------------

/// Base mining reward in grains (the smallest TROVE token unit), before
/// reputation scaling.
pub const BASE_MINING_REWARD: u64 = 50;

/// Multiplicative reputation growth factor applied after every successfully
/// processed transaction and every mined block.
pub const REPUTATION_GROWTH_FACTOR: f64 = 1.1;

/// Applies one step of reputation growth.
///
/// Reputation starts at zero for a freshly registered node, so a naive
/// `r * factor` would keep it pinned there forever. Growth is therefore
/// multiplicative on `1 + r`: `grow(r) = (r + 1) * factor - 1`. Strictly
/// increasing from zero, and for large `r` it converges to plain
/// multiplicative growth.
pub fn grow_reputation(reputation: f64) -> f64 {
    (reputation + 1.0) * REPUTATION_GROWTH_FACTOR - 1.0
}

/// Mining reward for a miner with the given reputation.
///
/// Proportional to `1 + reputation`: a fresh miner earns the base reward,
/// an established one earns more. Truncation toward zero is deliberate;
/// token amounts are integers and we never round up in the miner's favor.
pub fn mining_reward(reputation: f64) -> u64 {
    BASE_MINING_REWARD + (BASE_MINING_REWARD as f64 * reputation) as u64
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// Default flat component of the byte fee model, in grains.
pub const DEFAULT_FEE_BASE: u64 = 1;

/// Default per-byte component of the byte fee model, in grains. Larger
/// payloads pay more; this is what makes the solvency check in
/// `request_data` a real check instead of a comparison against zero.
pub const DEFAULT_FEE_PER_BYTE: u64 = 1;

// ---------------------------------------------------------------------------
// Payload Limits
// ---------------------------------------------------------------------------

/// Maximum payload size a node will accept for storage. 256 KiB should be
/// enough for anyone. (Famous last words; bump it in a future version.)
pub const MAX_PAYLOAD_BYTES: usize = 256 * 1024;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — deterministic signatures, no k-value footguns, fast
/// verification. The only sane choice in 2026.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// AES-256-GCM for payload encryption at rest. 256-bit keys, 96-bit
/// nonces, 128-bit authentication tags.
pub const SYMMETRIC_ALGORITHM: &str = "AES-256-GCM";

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits is the standard and the only
/// length you should use. 12 bytes. Not 16. Not 8. Twelve.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// Hash output length in bytes. Both BLAKE3 and SHA-256 produce 32 bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;
