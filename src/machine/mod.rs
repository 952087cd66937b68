//! Vending machine.
//!
//! The machine drives the coin ledger from customer events: coins go straight
//! to the ledger, a product selection is checked against the catalog, the
//! credit and the can tubes before the price is deducted, and the coin return
//! button asks the ledger for a refund.
//! Also supports async stream of events.

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::config::{ConfigError, MachineConfig};
use crate::ledger::{BalanceObserver, CoinLedger, NoopObserver, Refund};
use crate::model::{Event, Outcome, Product};

mod error;
pub use error::{MachineError, SelectError};

pub mod panel;
pub use panel::Panel;

mod stock;
pub use stock::{Inventory, Tube};

/// A vending machine serving one customer at a time.
pub struct Machine<O = NoopObserver> {
    ledger: CoinLedger<O>,
    catalog: Vec<Product>,
    stock: Inventory,
}

/// Public API
impl<O: BalanceObserver> Machine<O> {
    /// Build a machine from a validated configuration. `observer` is told the
    /// balance after every coin, sale and refund.
    pub fn new(config: MachineConfig, observer: O) -> Result<Self, ConfigError> {
        config.validate()?;

        let stock = Inventory::load(&config.tubes);
        let ledger = CoinLedger::new(config.denominations, config.reserve, observer)?;

        Ok(Self {
            ledger,
            catalog: config.products,
            stock,
        })
    }

    /// Run the machine with the given event stream, returning the outcome of
    /// every accepted event in order.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Event> + Unpin) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = stream.next().await {
            // a rejected event never stops the machine
            if let Ok(outcome) = self.apply(event) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Apply a single customer event on top of the current machine state
    pub fn apply(&mut self, event: Event) -> Result<Outcome, MachineError> {
        match event {
            Event::Insert(coin) => {
                let result = self.ledger.insert(coin).map_err(MachineError::Coin);
                Self::log_result("insert", &coin.to_string(), &result);
                let balance = result?;
                Ok(Outcome::Credited { coin, balance })
            }
            Event::Select(product) => {
                let result = self.select(&product).map_err(MachineError::from);
                Self::log_result("select", &product, &result);
                let balance = result?;
                Ok(Outcome::Dispensed { product, balance })
            }
            Event::Refund => {
                let refund = self.refund();
                info!(
                    coins = %refund.coins(),
                    shortfall = %refund.shortfall(),
                    "refund applied"
                );
                Ok(Outcome::Refunded(refund))
            }
        }
    }

    /// Sell one can of `name`: check the catalog, the credit and the tubes,
    /// dispense, then deduct the price. Returns the remaining credit.
    pub fn select(&mut self, name: &str) -> Result<Amount, SelectError> {
        let price = self
            .product(name)
            .map(|product| product.price)
            .ok_or_else(|| SelectError::UnknownProduct(name.to_string()))?;

        let balance = self.ledger.balance();
        if balance < price {
            return Err(SelectError::NotEnoughCredit {
                product: name.to_string(),
                balance,
                price,
            });
        }

        if !self.stock.dispense(name) {
            return Err(SelectError::SoldOut(name.to_string()));
        }

        Ok(self.ledger.deduct(price)?)
    }

    /// Press the coin return button.
    pub fn refund(&mut self) -> Refund {
        self.ledger.refund()
    }

    pub fn ledger(&self) -> &CoinLedger<O> {
        &self.ledger
    }

    pub fn stock(&self) -> &Inventory {
        &self.stock
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.catalog.iter().find(|product| product.name == name)
    }

    /// What the customer currently sees on the front panel.
    pub fn panel(&self) -> Panel {
        panel::snapshot(self.ledger.balance(), self.catalog(), &self.stock)
    }
}

/// Private API
impl<O: BalanceObserver> Machine<O> {
    /// Small helper to log `apply` results
    fn log_result<E: std::fmt::Display>(
        event: &str,
        subject: &str,
        result: &Result<Amount, E>,
    ) {
        match result {
            Ok(balance) => {
                info!(subject = %subject, balance = %balance, "{event} applied");
            }
            Err(e) => {
                info!(subject = %subject, reason = %e, "{event} skipped");
            }
        }
    }
}

impl Machine<NoopObserver> {
    /// Machine with the reference configuration and no balance observer.
    pub fn reference() -> Result<Self, ConfigError> {
        Self::new(MachineConfig::default(), NoopObserver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::{Coin, CoinCounts};
    use crate::config::TubeLoad;
    use crate::ledger::LedgerError;

    // test utils

    fn pence(value: i64) -> Amount {
        Amount::from_pence(value)
    }

    fn counts(pairs: &[(u32, u32)]) -> CoinCounts {
        pairs
            .iter()
            .map(|&(value, count)| (Coin::from_pence(value), count))
            .collect()
    }

    fn machine() -> Machine {
        Machine::reference().unwrap()
    }

    fn insert(machine: &mut Machine, coins: &[u32]) {
        for &coin in coins {
            machine.apply(Event::Insert(coin)).unwrap();
        }
    }

    fn select(product: &str) -> Event {
        Event::Select(product.to_string())
    }

    #[test]
    fn new_machine_is_idle() {
        let machine = machine();
        assert_eq!(machine.ledger().balance(), Amount::ZERO);
        assert_eq!(machine.catalog().len(), 4);
        assert_eq!(
            machine.panel().text,
            "Insert coins and then select a product. All drinks cost £1.50"
        );
        assert!(machine.panel().lamps.iter().all(|lamp| !lamp.lit));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = MachineConfig::default();
        config.tubes.push(TubeLoad {
            product: "Ginger Fizz".to_string(),
            cans: 1,
        });
        assert!(matches!(
            Machine::new(config, NoopObserver),
            Err(ConfigError::UnknownTubeProduct { .. })
        ));
    }

    #[test]
    fn new_rejects_reserve_outside_denominations() {
        let config = MachineConfig::default().with_reserve(counts(&[(3, 1)]));
        assert!(matches!(
            Machine::new(config, NoopObserver),
            Err(ConfigError::Reserve(LedgerError::UnknownDenomination(3)))
        ));
    }

    // Insert

    #[test]
    fn insert_credits_balance() {
        let mut machine = machine();
        let outcome = machine.apply(Event::Insert(50)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Credited {
                coin: 50,
                balance: pence(50),
            }
        );
        assert_eq!(machine.panel().text, "Amount paid: £0.50");
    }

    #[test]
    fn insert_unknown_coin_fails() {
        let mut machine = machine();
        let result = machine.apply(Event::Insert(3));
        assert!(matches!(
            result,
            Err(MachineError::Coin(LedgerError::UnknownDenomination(3)))
        ));
    }

    // Select

    #[test]
    fn select_with_exact_credit_dispenses_and_keeps_coins() {
        let mut machine = machine();
        insert(&mut machine, &[50, 50, 50]);

        let outcome = machine.apply(select("Cola Roller")).unwrap();
        assert_eq!(
            outcome,
            Outcome::Dispensed {
                product: "Cola Roller".to_string(),
                balance: Amount::ZERO,
            }
        );
        assert_eq!(machine.stock().cans_of("Cola Roller"), 3);
        assert!(machine.ledger().input().is_empty());
        assert_eq!(machine.ledger().reserve().get(Coin::from_pence(50)), 9);
    }

    #[test]
    fn select_lights_lamps_only_with_enough_credit() {
        let mut machine = machine();
        insert(&mut machine, &[100]);
        assert!(machine.panel().lamps.iter().all(|lamp| !lamp.lit));

        insert(&mut machine, &[50]);
        assert!(machine.panel().lamps.iter().all(|lamp| lamp.lit));
    }

    #[test]
    fn select_without_enough_credit_fails() {
        let mut machine = machine();
        insert(&mut machine, &[100]);

        let result = machine.apply(select("Tropical Sun"));
        assert!(matches!(
            result,
            Err(MachineError::Select(SelectError::NotEnoughCredit { .. }))
        ));

        // nothing dispensed, credit kept
        assert_eq!(machine.stock().cans_of("Tropical Sun"), 6);
        assert_eq!(machine.ledger().balance(), pence(100));
    }

    #[test]
    fn select_unknown_product_fails() {
        let mut machine = machine();
        insert(&mut machine, &[200]);

        let result = machine.apply(select("Ginger Fizz"));
        assert!(matches!(
            result,
            Err(MachineError::Select(SelectError::UnknownProduct(name))) if name == "Ginger Fizz"
        ));
    }

    #[test]
    fn select_sold_out_fails_and_keeps_credit() {
        let mut config = MachineConfig::default();
        config.tubes = vec![TubeLoad {
            product: "Apple Spritz".to_string(),
            cans: 1,
        }];
        let mut machine = Machine::new(config, NoopObserver).unwrap();
        insert(&mut machine, &[200, 100]);

        machine.apply(select("Apple Spritz")).unwrap();
        assert_eq!(machine.ledger().balance(), pence(150));
        assert!(!machine.panel().lamps[0].lit);

        let result = machine.apply(select("Apple Spritz"));
        assert!(matches!(
            result,
            Err(MachineError::Select(SelectError::SoldOut(_)))
        ));
        assert_eq!(machine.ledger().balance(), pence(150));

        let result = machine.apply(select("Cola Roller"));
        assert!(matches!(
            result,
            Err(MachineError::Select(SelectError::SoldOut(_)))
        ));
    }

    #[test]
    fn overpayment_is_credit_for_next_purchase() {
        let mut machine = machine();
        insert(&mut machine, &[200, 100]);

        machine.apply(select("Apple Spritz")).unwrap();
        assert_eq!(machine.ledger().balance(), pence(150));
        assert_eq!(machine.ledger().input(), &counts(&[(100, 1), (200, 1)]));

        machine.apply(select("Apple Spritz")).unwrap();
        assert_eq!(machine.ledger().balance(), Amount::ZERO);
        assert!(machine.ledger().input().is_empty());
        assert_eq!(machine.stock().cans_of("Apple Spritz"), 2);
    }

    // Refund

    #[test]
    fn refund_after_purchase_returns_change() {
        let mut machine = machine();
        insert(&mut machine, &[200]);
        machine.apply(select("Blueberry Buzz")).unwrap();

        let outcome = machine.apply(Event::Refund).unwrap();
        assert_eq!(
            outcome,
            Outcome::Refunded(Refund::Complete(counts(&[(50, 1)])))
        );
        assert_eq!(machine.ledger().balance(), Amount::ZERO);
        assert_eq!(machine.ledger().reserve().get(Coin::from_pence(200)), 1);
        assert_eq!(machine.ledger().reserve().get(Coin::from_pence(50)), 5);
        assert_eq!(machine.panel().text, panel::idle_text(machine.catalog()));
    }

    #[test]
    fn refund_with_nothing_paid_is_empty() {
        let mut machine = machine();
        let outcome = machine.apply(Event::Refund).unwrap();
        assert_eq!(outcome, Outcome::Refunded(Refund::Empty));
    }

    #[test]
    fn observer_sees_every_balance() {
        let (sender, receiver) = tokio::sync::watch::channel(Amount::ZERO);
        let mut machine = Machine::new(MachineConfig::default(), sender).unwrap();

        machine.apply(Event::Insert(100)).unwrap();
        assert_eq!(*receiver.borrow(), pence(100));

        machine.apply(Event::Insert(100)).unwrap();
        machine.apply(select("Cola Roller")).unwrap();
        assert_eq!(*receiver.borrow(), pence(50));

        machine.apply(Event::Refund).unwrap();
        assert_eq!(*receiver.borrow(), Amount::ZERO);
    }

    //  Async run()

    #[tokio::test]
    async fn run_processes_all_events() {
        let mut machine = machine();
        let events = vec![
            Event::Insert(100),
            Event::Insert(50),
            select("Tropical Sun"),
            Event::Refund,
        ];

        let outcomes = machine.run(tokio_stream::iter(events)).await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[3], Outcome::Refunded(Refund::Empty));
        assert_eq!(machine.stock().cans_of("Tropical Sun"), 5);
    }

    #[tokio::test]
    async fn run_skips_failed_events_and_continues() {
        let mut machine = machine();
        let events = vec![
            Event::Insert(100),
            select("Cola Roller"), // Should fail with not enough credit
            Event::Insert(7),      // Should fail as unknown coin
            Event::Insert(100),    // Should still process
            Event::Refund,
        ];

        let outcomes = machine.run(tokio_stream::iter(events)).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[2],
            Outcome::Refunded(Refund::Complete(counts(&[(100, 2)])))
        );
    }
}
