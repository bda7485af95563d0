//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the keypair may not be
//! available at construction time. The signing data is the canonical
//! [`Transaction::signable_bytes`] output, which deterministically excludes
//! the signature and gateway metadata fields.

use super::builder::Transaction;
use crate::crypto::keys::TroveKeypair;

/// Signs a transaction in place using the provided keypair.
///
/// The procedure:
/// 1. Compute `signable_bytes()`, the canonical binary serialization of
///    all fields except `id`, `gateway_id`, and the signature fields.
/// 2. Produce an Ed25519 signature over those bytes.
/// 3. Store the hex-encoded signature in `tx.signature` and the signer's
///    hex-encoded public key in `tx.sender_public_key`.
///
/// The transaction `id` is not affected by signing. The caller is
/// responsible for ensuring the keypair matches `tx.sender`; verification
/// will catch a mismatch either way.
pub fn sign_transaction<'a>(tx: &'a mut Transaction, keypair: &TroveKeypair) -> &'a Transaction {
    let signable = tx.signable_bytes();
    let signature = keypair.sign(&signable);
    tx.signature = Some(signature.to_hex());
    tx.sender_public_key = Some(keypair.public_key().to_hex());
    tx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::TxKind;

    fn unsigned_tx() -> Transaction {
        TransactionBuilder::new(TxKind::Transfer)
            .sender("trove1aaaa")
            .recipient("trove1bbbb")
            .amount(500)
            .timestamp(1_700_000_000_000)
            .build()
    }

    #[test]
    fn sign_sets_signature_and_public_key() {
        let kp = TroveKeypair::generate();
        let mut tx = unsigned_tx();

        assert!(!tx.is_signed());
        sign_transaction(&mut tx, &kp);
        assert!(tx.is_signed());
        assert!(tx.sender_public_key.is_some());
    }

    #[test]
    fn signature_is_128_hex_chars() {
        // Ed25519 signatures are 64 bytes = 128 hex characters.
        let kp = TroveKeypair::generate();
        let mut tx = unsigned_tx();
        sign_transaction(&mut tx, &kp);

        let sig = tx.signature.as_ref().unwrap();
        assert_eq!(sig.len(), 128);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signing_does_not_change_id() {
        let kp = TroveKeypair::generate();
        let mut tx = unsigned_tx();
        let id_before = tx.id.clone();
        sign_transaction(&mut tx, &kp);
        assert_eq!(tx.id, id_before);
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = TroveKeypair::generate();
        let mut tx1 = unsigned_tx();
        let mut tx2 = unsigned_tx();

        sign_transaction(&mut tx1, &kp);
        sign_transaction(&mut tx2, &kp);

        assert_eq!(
            tx1.signature, tx2.signature,
            "Ed25519 signing is deterministic for the same keypair and message"
        );
    }

    #[test]
    fn different_keypairs_produce_different_signatures() {
        let mut tx1 = unsigned_tx();
        let mut tx2 = unsigned_tx();

        sign_transaction(&mut tx1, &TroveKeypair::generate());
        sign_transaction(&mut tx2, &TroveKeypair::generate());

        assert_ne!(tx1.signature, tx2.signature);
    }
}
