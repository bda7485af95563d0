//! # Authorization Messages
//!
//! Canonical message construction for the two user-facing marketplace
//! operations. A user proves they authorized a `store_data` or
//! `request_data` call by signing the canonical bytes with their Ed25519
//! key; the node verifies against the user's public key.
//!
//! ## Canonical formats
//!
//! Both messages are domain-tagged, null-separated concatenations:
//!
//! ```text
//! store:   "trove-store"   || 0x00 || user_addr || 0x00 || node_addr || 0x00 || len(data) LE || data
//! request: "trove-request" || 0x00 || user_addr || 0x00 || node_addr || 0x00
//! ```
//!
//! The domain tag keeps a store authorization from ever verifying as a
//! request authorization (and vice versa), and binding the node address
//! into the message keeps a signature captured for one node from being
//! replayed against another.

use crate::crypto::keys::{TroveKeypair, TrovePublicKey, TroveSignature};

/// Domain tag for `store_data` authorizations.
const STORE_DOMAIN: &[u8] = b"trove-store";

/// Domain tag for `request_data` authorizations.
const REQUEST_DOMAIN: &[u8] = b"trove-request";

/// Canonical bytes a user signs to authorize storing `data` on the node
/// at `node_address`.
pub fn store_auth_bytes(user_address: &str, data: &[u8], node_address: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(STORE_DOMAIN.len() + user_address.len() + data.len() + 32);
    buf.extend_from_slice(STORE_DOMAIN);
    buf.push(0x00);
    buf.extend_from_slice(user_address.as_bytes());
    buf.push(0x00);
    buf.extend_from_slice(node_address.as_bytes());
    buf.push(0x00);
    // Length-prefix the data so no crafted payload can collide with the
    // separator structure.
    buf.extend_from_slice(&(data.len() as u64).to_le_bytes());
    buf.extend_from_slice(data);
    buf
}

/// Canonical bytes a user signs to authorize requesting data from the
/// node at `node_address`.
pub fn request_auth_bytes(user_address: &str, node_address: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(REQUEST_DOMAIN.len() + user_address.len() + 32);
    buf.extend_from_slice(REQUEST_DOMAIN);
    buf.push(0x00);
    buf.extend_from_slice(user_address.as_bytes());
    buf.push(0x00);
    buf.extend_from_slice(node_address.as_bytes());
    buf.push(0x00);
    buf
}

/// Sign a store authorization. Convenience for clients and tests.
pub fn authorize_store(user: &TroveKeypair, data: &[u8], node_address: &str) -> TroveSignature {
    user.sign(&store_auth_bytes(&user.address(), data, node_address))
}

/// Sign a request authorization. Convenience for clients and tests.
pub fn authorize_request(user: &TroveKeypair, node_address: &str) -> TroveSignature {
    user.sign(&request_auth_bytes(&user.address(), node_address))
}

/// Verify a store authorization signature against the user's public key.
pub fn verify_store_auth(
    user: &TrovePublicKey,
    data: &[u8],
    node_address: &str,
    signature: &TroveSignature,
) -> bool {
    user.verify(&store_auth_bytes(&user.address(), data, node_address), signature)
}

/// Verify a request authorization signature against the user's public key.
pub fn verify_request_auth(
    user: &TrovePublicKey,
    node_address: &str,
    signature: &TroveSignature,
) -> bool {
    user.verify(&request_auth_bytes(&user.address(), node_address), signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_auth_roundtrip() {
        let user = TroveKeypair::generate();
        let sig = authorize_store(&user, b"some data", "trove1node");
        assert!(verify_store_auth(
            &user.public_key(),
            b"some data",
            "trove1node",
            &sig
        ));
    }

    #[test]
    fn request_auth_roundtrip() {
        let user = TroveKeypair::generate();
        let sig = authorize_request(&user, "trove1node");
        assert!(verify_request_auth(&user.public_key(), "trove1node", &sig));
    }

    #[test]
    fn store_auth_binds_data() {
        let user = TroveKeypair::generate();
        let sig = authorize_store(&user, b"original", "trove1node");
        assert!(!verify_store_auth(
            &user.public_key(),
            b"tampered",
            "trove1node",
            &sig
        ));
    }

    #[test]
    fn auth_binds_node_address() {
        // A signature captured for one node must not replay against another.
        let user = TroveKeypair::generate();
        let sig = authorize_request(&user, "trove1node_a");
        assert!(!verify_request_auth(&user.public_key(), "trove1node_b", &sig));
    }

    #[test]
    fn domains_do_not_cross() {
        // A request authorization must never verify as a store authorization
        // for empty data, or anything else.
        let user = TroveKeypair::generate();
        let req_sig = authorize_request(&user, "trove1node");
        assert!(!verify_store_auth(&user.public_key(), b"", "trove1node", &req_sig));
    }

    #[test]
    fn wrong_user_rejected() {
        let user = TroveKeypair::generate();
        let impostor = TroveKeypair::generate();
        let sig = authorize_store(&impostor, b"data", "trove1node");
        assert!(!verify_store_auth(&user.public_key(), b"data", "trove1node", &sig));
    }
}
