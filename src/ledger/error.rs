//! Error types for coin ledger operations.

use thiserror::Error;

use crate::Amount;

/// Rejected ledger operation. A rejected operation leaves the ledger unchanged
/// and does not notify the balance observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("coin of {0}p is not an accepted denomination")]
    UnknownDenomination(u32),

    #[error("zero is not a valid coin value")]
    ZeroDenomination,

    #[error("price must be positive, got {0}")]
    InvalidPrice(Amount),

    #[error("insufficient credit: balance {balance}, price {price}")]
    InsufficientCredit { balance: Amount, price: Amount },
}
