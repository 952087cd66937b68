//! Machine configuration, supplied once before the first customer.

use std::collections::HashSet;

use thiserror::Error;

use crate::Amount;
use crate::coin::{Coin, CoinCounts, Denominations};
use crate::ledger::LedgerError;
use crate::model::Product;

/// Initial float of the reference machine, as `(pence, count)`.
pub const DEFAULT_RESERVE: [(u32, u32); 6] =
    [(1, 20), (2, 10), (5, 20), (10, 10), (20, 10), (50, 6)];

/// Price of every drink in the reference machine.
pub const DEFAULT_PRICE: Amount = Amount::from_pence(150);

pub const DEFAULT_PRODUCTS: [&str; 4] = [
    "Apple Spritz",
    "Blueberry Buzz",
    "Cola Roller",
    "Tropical Sun",
];

/// Tube loading of the reference machine, as `(product index, cans)`.
pub const DEFAULT_TUBES: [(usize, u32); 6] = [(0, 1), (0, 3), (1, 4), (2, 3), (2, 1), (3, 6)];

/// Errors detected while validating a [`MachineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no denominations configured")]
    NoDenominations,

    #[error("zero is not a valid coin value")]
    ZeroDenomination,

    #[error("reserve: {0}")]
    Reserve(#[from] LedgerError),

    #[error("product '{0}' is listed twice")]
    DuplicateProduct(String),

    #[error("product '{name}' has non-positive price {price}")]
    InvalidPrice { name: String, price: Amount },

    #[error("tube {index} is loaded with unknown product '{product}'")]
    UnknownTubeProduct { index: usize, product: String },
}

/// Contents of one can tube at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeLoad {
    pub product: String,
    pub cans: u32,
}

/// Everything a machine needs before it can serve customers.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub denominations: Denominations,
    pub reserve: CoinCounts,
    pub products: Vec<Product>,
    pub tubes: Vec<TubeLoad>,
}

impl MachineConfig {
    /// Replace the initial reserve, keeping everything else.
    pub fn with_reserve(mut self, reserve: CoinCounts) -> Self {
        self.reserve = reserve;
        self
    }

    /// Check the configuration is consistent.
    ///
    /// Reserve coins are checked against the denominations when the ledger is
    /// built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.denominations.is_empty() {
            return Err(ConfigError::NoDenominations);
        }
        if self.denominations.contains(Coin::from_pence(0)) {
            return Err(ConfigError::ZeroDenomination);
        }

        let mut names = HashSet::new();
        for product in &self.products {
            if !names.insert(product.name.as_str()) {
                return Err(ConfigError::DuplicateProduct(product.name.clone()));
            }
            if !product.price.is_positive() {
                return Err(ConfigError::InvalidPrice {
                    name: product.name.clone(),
                    price: product.price,
                });
            }
        }

        for (index, tube) in self.tubes.iter().enumerate() {
            if !names.contains(tube.product.as_str()) {
                return Err(ConfigError::UnknownTubeProduct {
                    index,
                    product: tube.product.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        let products: Vec<Product> = DEFAULT_PRODUCTS
            .iter()
            .map(|name| Product::new(*name, DEFAULT_PRICE))
            .collect();
        let tubes = DEFAULT_TUBES
            .iter()
            .map(|&(index, cans)| TubeLoad {
                product: products[index].name.clone(),
                cans,
            })
            .collect();

        Self {
            denominations: Denominations::default(),
            reserve: DEFAULT_RESERVE
                .iter()
                .map(|&(pence, count)| (Coin::from_pence(pence), count))
                .collect(),
            products,
            tubes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MachineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.products.len(), 4);
        assert_eq!(config.tubes.len(), 6);
        assert_eq!(config.reserve.get(Coin::from_pence(50)), 6);
        assert_eq!(config.reserve.get(Coin::from_pence(100)), 0);
    }

    #[test]
    fn default_tubes_reference_products() {
        let config = MachineConfig::default();
        let apple: u32 = config
            .tubes
            .iter()
            .filter(|t| t.product == "Apple Spritz")
            .map(|t| t.cans)
            .sum();
        assert_eq!(apple, 4);
    }

    #[test]
    fn duplicate_product_is_rejected() {
        let mut config = MachineConfig::default();
        config
            .products
            .push(Product::new("Cola Roller", Amount::from_pence(100)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateProduct(name)) if name == "Cola Roller"
        ));
    }

    #[test]
    fn free_product_is_rejected() {
        let mut config = MachineConfig::default();
        config.products[0].price = Amount::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn tube_with_unknown_product_is_rejected() {
        let mut config = MachineConfig::default();
        config.tubes.push(TubeLoad {
            product: "Ginger Fizz".to_string(),
            cans: 2,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownTubeProduct { index: 6, .. })
        ));
    }

    #[test]
    fn zero_denomination_is_rejected() {
        let config = MachineConfig {
            denominations: Denominations::new([0, 10].map(Coin::from_pence)),
            ..MachineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDenomination)
        ));
    }

    #[test]
    fn with_reserve_replaces_float() {
        let reserve: CoinCounts = [(Coin::from_pence(100), 2)].into_iter().collect();
        let config = MachineConfig::default().with_reserve(reserve.clone());
        assert_eq!(config.reserve, reserve);
    }
}
