//! Fee models.
//!
//! A fee model is a pure function from payload size to a fee in grains.
//! It must be deterministic: both `store_data` (to price the operation)
//! and `request_data` (to check solvency before charging) call it with
//! the same size and must get the same answer.

use crate::config::{DEFAULT_FEE_BASE, DEFAULT_FEE_PER_BYTE};

/// Prices a marketplace operation by the size of the data involved.
pub trait FeeModel: Send + Sync {
    /// Fee in grains for an operation over `data_size` bytes.
    fn fee_for(&self, data_size: usize) -> u64;
}

/// The default pricing: a flat base plus a per-byte rate.
///
/// Saturating arithmetic; a pathological size caps the fee at `u64::MAX`
/// instead of wrapping into a discount.
#[derive(Clone, Copy, Debug)]
pub struct ByteFeeModel {
    /// Flat component in grains.
    pub base: u64,
    /// Per-byte component in grains.
    pub per_byte: u64,
}

impl Default for ByteFeeModel {
    fn default() -> Self {
        Self {
            base: DEFAULT_FEE_BASE,
            per_byte: DEFAULT_FEE_PER_BYTE,
        }
    }
}

impl FeeModel for ByteFeeModel {
    fn fee_for(&self, data_size: usize) -> u64 {
        self.base
            .saturating_add(self.per_byte.saturating_mul(data_size as u64))
    }
}

/// Charges the same fee regardless of size. Handy in tests that want
/// predictable economics.
#[derive(Clone, Copy, Debug)]
pub struct FlatFeeModel(pub u64);

impl FeeModel for FlatFeeModel {
    fn fee_for(&self, _data_size: usize) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_fee_grows_with_size() {
        let model = ByteFeeModel { base: 10, per_byte: 2 };
        assert_eq!(model.fee_for(0), 10);
        assert_eq!(model.fee_for(5), 20);
        assert!(model.fee_for(100) > model.fee_for(99));
    }

    #[test]
    fn byte_fee_saturates() {
        let model = ByteFeeModel {
            base: u64::MAX,
            per_byte: u64::MAX,
        };
        assert_eq!(model.fee_for(usize::MAX), u64::MAX);
    }

    #[test]
    fn flat_fee_ignores_size() {
        let model = FlatFeeModel(7);
        assert_eq!(model.fee_for(0), 7);
        assert_eq!(model.fee_for(1_000_000), 7);
    }

    #[test]
    fn default_byte_fee_is_never_zero() {
        // Solvency checks rely on fees being real; a zero fee would make
        // them vacuous.
        assert!(ByteFeeModel::default().fee_for(0) > 0);
    }
}
