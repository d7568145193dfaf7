//! Transaction envelope construction with fee configuration

use crate::tx_builder::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Caller-chosen fee settings, all in MIST
///
/// Absent fields leave the corresponding transaction attribute unset so the
/// execution service applies its own default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfiguration {
    /// Maximum fee the author authorises
    #[serde(default)]
    pub budget: Option<u64>,

    /// Offered price per computation unit
    #[serde(default)]
    pub price: Option<u64>,

    /// Upper bound on coins merged by one consolidation transaction
    #[serde(default)]
    pub max_fee_object_count: Option<u64>,
}

impl FeeConfiguration {
    pub fn with_budget(budget: u64) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }
}

/// Create a fresh, empty transaction and apply the fee configuration to it
///
/// No validation happens here. Out-of-range values are left for the execution
/// service to reject.
pub fn create_transaction(config: &FeeConfiguration) -> Transaction {
    let mut tx = Transaction::new();

    if let Some(budget) = config.budget {
        tx.set_fee_budget(budget);
    }

    if let Some(price) = config.price {
        tx.set_fee_price(price);
    }

    tx
}
