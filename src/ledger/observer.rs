use tokio::sync::watch;

use crate::Amount;

/// Receives the new balance after every ledger operation that took effect.
pub trait BalanceObserver {
    fn balance_changed(&mut self, balance: Amount);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BalanceObserver for NoopObserver {
    fn balance_changed(&mut self, _balance: Amount) {}
}

impl<F> BalanceObserver for F
where
    F: FnMut(Amount),
{
    fn balance_changed(&mut self, balance: Amount) {
        self(balance)
    }
}

/// Publishes the balance to every `watch::Receiver`. Having no receivers left
/// is not an error for the ledger.
impl BalanceObserver for watch::Sender<Amount> {
    fn balance_changed(&mut self, balance: Amount) {
        self.send_replace(balance);
    }
}
