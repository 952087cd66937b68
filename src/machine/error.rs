//! Error types for event processing.

use thiserror::Error;

use crate::Amount;
use crate::ledger::LedgerError;

/// Top-level error returned by [`Machine::apply`](super::Machine::apply).
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("coin rejected: {0}")]
    Coin(LedgerError),

    #[error("selection failed: {0}")]
    Select(#[from] SelectError),
}

/// Error while selecting a product.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("unknown product '{0}'")]
    UnknownProduct(String),

    #[error("'{product}' costs {price}, only {balance} paid")]
    NotEnoughCredit {
        product: String,
        balance: Amount,
        price: Amount,
    },

    #[error("'{0}' is sold out")]
    SoldOut(String),

    #[error("payment failed: {0}")]
    Payment(#[from] LedgerError),
}
