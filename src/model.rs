//! Core domain types for the vending machine.

use crate::Amount;
use crate::ledger::Refund;

/// A product on sale, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Amount,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Amount) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// A customer action, the possible inputs of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Drop a coin of the given value (in pence) into the slot.
    Insert(u32),
    /// Press the button of the named product.
    Select(String),
    /// Press the coin return button.
    Refund,
}

/// Result of an event the machine accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A coin was accepted.
    Credited { coin: u32, balance: Amount },
    /// One can of the product was dispensed and paid for.
    Dispensed { product: String, balance: Amount },
    /// Coins were handed back; the balance is now zero.
    Refunded(Refund),
}
