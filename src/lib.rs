pub mod amount;
pub mod coin;
pub mod config;
pub mod csv;
pub mod ledger;
pub mod machine;
pub mod model;

pub use amount::Amount;
pub use coin::{Coin, CoinCounts, Denominations};
pub use config::MachineConfig;
pub use ledger::{CoinLedger, Refund};
pub use machine::Machine;
pub use model::{Event, Outcome, Product};
