//! Core type definitions for TROVE transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant for the operation a transaction represents.
///
/// The kind determines which validation rules apply: plain transfers move
/// a positive amount of grains, while marketplace settlements carry a zero
/// amount and express their economics through the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    /// Simple value transfer between two addresses.
    Transfer,
    /// Settlement of a `store_data` marketplace operation.
    StoreData,
    /// Settlement of a `request_data` marketplace operation.
    DataRequest,
}

impl TxKind {
    /// Marketplace settlements are fee-only; their `amount` is zero.
    pub fn is_market(&self) -> bool {
        matches!(self, Self::StoreData | Self::DataRequest)
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "Transfer"),
            Self::StoreData => write!(f, "StoreData"),
            Self::DataRequest => write!(f, "DataRequest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(TxKind::Transfer.to_string(), "Transfer");
        assert_eq!(TxKind::StoreData.to_string(), "StoreData");
        assert_eq!(TxKind::DataRequest.to_string(), "DataRequest");
    }

    #[test]
    fn market_kinds() {
        assert!(!TxKind::Transfer.is_market());
        assert!(TxKind::StoreData.is_market());
        assert!(TxKind::DataRequest.is_market());
    }

    #[test]
    fn kind_serde_roundtrip() {
        for kind in [TxKind::Transfer, TxKind::StoreData, TxKind::DataRequest] {
            let json = serde_json::to_string(&kind).unwrap();
            let recovered: TxKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, recovered);
        }
    }
}
