//! Coin ledger.
//!
//! The ledger owns the customer's input tray, the machine's reserve stock and
//! the running balance. It accepts coins, deducts prices, and pays refunds
//! from the input tray first and the reserve second.

use tracing::{debug, info, warn};

use crate::Amount;
use crate::coin::{Coin, CoinCounts, Denominations};

pub mod change;
pub use change::{Change, decompose};

mod error;
pub use error::LedgerError;

mod observer;
pub use observer::{BalanceObserver, NoopObserver};

/// Coins handed back by [`CoinLedger::refund`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refund {
    /// The balance was already zero.
    Empty,
    /// The whole balance was paid back.
    Complete(CoinCounts),
    /// No coin left in the reserve could cover the last part of the balance.
    /// `shortfall` was not paid back.
    Incomplete {
        coins: CoinCounts,
        shortfall: Amount,
    },
}

impl Refund {
    /// Coins handed back, empty for [`Refund::Empty`].
    pub fn coins(&self) -> CoinCounts {
        match self {
            Refund::Empty => CoinCounts::new(),
            Refund::Complete(coins) | Refund::Incomplete { coins, .. } => coins.clone(),
        }
    }

    pub fn shortfall(&self) -> Amount {
        match self {
            Refund::Incomplete { shortfall, .. } => *shortfall,
            _ => Amount::ZERO,
        }
    }
}

/// Tracks inserted coins, the reserve float and the customer's credit.
///
/// Every operation takes `&mut self` and runs to completion, so a ledger can
/// only serve one transaction at a time.
pub struct CoinLedger<O = NoopObserver> {
    denominations: Denominations,
    /// Coins inserted in the current transaction
    input: CoinCounts,
    /// Machine float, used for change and refilled by completed sales
    reserve: CoinCounts,
    balance: Amount,
    observer: O,
}

/// Public API
impl<O: BalanceObserver> CoinLedger<O> {
    /// Create a ledger with an empty input tray and zero balance.
    ///
    /// Fails if `denominations` includes a 0p coin or `reserve` holds a coin
    /// outside `denominations`.
    pub fn new(
        denominations: Denominations,
        reserve: CoinCounts,
        observer: O,
    ) -> Result<Self, LedgerError> {
        if denominations.contains(Coin::from_pence(0)) {
            return Err(LedgerError::ZeroDenomination);
        }
        if let Some((coin, _)) = reserve.iter().find(|(c, _)| !denominations.contains(*c)) {
            return Err(LedgerError::UnknownDenomination(coin.pence()));
        }

        Ok(Self {
            denominations,
            input: CoinCounts::new(),
            reserve,
            balance: Amount::ZERO,
            observer,
        })
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn input(&self) -> &CoinCounts {
        &self.input
    }

    pub fn reserve(&self) -> &CoinCounts {
        &self.reserve
    }

    pub fn denominations(&self) -> &Denominations {
        &self.denominations
    }

    /// Accept one coin into the input tray and credit its value.
    pub fn insert(&mut self, pence: u32) -> Result<Amount, LedgerError> {
        let coin = self
            .denominations
            .recognize(pence)
            .ok_or(LedgerError::UnknownDenomination(pence))?;

        self.input.add(coin, 1);
        self.balance += coin.value();
        debug!(coin = %coin, balance = %self.balance, "coin inserted");

        self.notify();
        Ok(self.balance)
    }

    /// Deduct the price of a dispensed item from the balance.
    ///
    /// Overpayment stays in the input tray as credit. When the balance reaches
    /// exactly zero, the input tray is moved into the reserve.
    pub fn deduct(&mut self, price: Amount) -> Result<Amount, LedgerError> {
        if !price.is_positive() {
            return Err(LedgerError::InvalidPrice(price));
        }
        if price > self.balance {
            return Err(LedgerError::InsufficientCredit {
                balance: self.balance,
                price,
            });
        }

        self.balance -= price;
        if self.balance.is_zero() {
            self.sweep_input();
        }
        debug!(price = %price, balance = %self.balance, "price deducted");

        self.notify();
        Ok(self.balance)
    }

    /// Pay back the whole balance and end the transaction.
    ///
    /// Change comes from the customer's own coins first; whatever is left in
    /// the input tray then joins the reserve, which pays the rest. If exact
    /// change is impossible, the cheapest reserve coin that covers the
    /// remainder is given instead.
    pub fn refund(&mut self) -> Refund {
        if self.balance.is_zero() {
            info!("nothing to refund");
            self.notify();
            return Refund::Empty;
        }

        let owed = self.balance;

        let from_input = decompose(self.balance, &mut self.input);
        self.balance = from_input.remainder;
        let mut coins = from_input.matched;

        self.sweep_input();

        let mut from_reserve = decompose(self.balance, &mut self.reserve);
        self.balance = from_reserve.remainder;
        coins.absorb(&mut from_reserve.matched);

        let mut shortfall = Amount::ZERO;
        if self.balance.is_positive() {
            match self.reserve.smallest_covering(self.balance) {
                Some(coin) => {
                    self.reserve.remove(coin, 1);
                    coins.add(coin, 1);
                    debug!(coin = %coin, remainder = %self.balance, "rounded refund up");
                }
                None => {
                    shortfall = self.balance;
                    warn!(owed = %owed, shortfall = %shortfall, "reserve cannot cover refund");
                }
            }
        }

        self.balance = Amount::ZERO;
        info!(owed = %owed, coins = %coins, "refund paid");
        self.notify();

        if shortfall.is_positive() {
            Refund::Incomplete { coins, shortfall }
        } else {
            Refund::Complete(coins)
        }
    }
}

/// Private API
impl<O: BalanceObserver> CoinLedger<O> {
    /// Move every input coin into the reserve.
    fn sweep_input(&mut self) {
        self.reserve.absorb(&mut self.input);
    }

    fn notify(&mut self) {
        self.observer.balance_changed(self.balance);
    }
}

impl CoinLedger<NoopObserver> {
    /// Ledger with the given reserve and no balance observer.
    pub fn with_reserve(
        denominations: Denominations,
        reserve: CoinCounts,
    ) -> Result<Self, LedgerError> {
        Self::new(denominations, reserve, NoopObserver)
    }
}
