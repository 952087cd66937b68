use crate::config::TubeLoad;

/// A can dispenser holding a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tube {
    product: String,
    cans: u32,
}

impl Tube {
    pub fn new(product: impl Into<String>, cans: u32) -> Self {
        Self {
            product: product.into(),
            cans,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn cans(&self) -> u32 {
        self.cans
    }

    /// Whether this tube can dispense a can of `product`.
    pub fn holds(&self, product: &str) -> bool {
        self.product == product && self.cans > 0
    }

    /// Drop one can, returning false if the tube is empty.
    pub fn dispense(&mut self) -> bool {
        if self.cans == 0 {
            return false;
        }
        self.cans -= 1;
        true
    }
}

/// All can tubes of a machine, searched in loading order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    tubes: Vec<Tube>,
}

impl Inventory {
    pub fn load(tubes: &[TubeLoad]) -> Self {
        Self {
            tubes: tubes
                .iter()
                .map(|load| Tube::new(load.product.clone(), load.cans))
                .collect(),
        }
    }

    pub fn in_stock(&self, product: &str) -> bool {
        self.tubes.iter().any(|tube| tube.holds(product))
    }

    /// Cans of `product` left across every tube.
    pub fn cans_of(&self, product: &str) -> u32 {
        self.tubes
            .iter()
            .filter(|tube| tube.product() == product)
            .map(Tube::cans)
            .sum()
    }

    /// Dispense one can from the first tube holding `product`.
    pub fn dispense(&mut self, product: &str) -> bool {
        self.tubes
            .iter_mut()
            .find(|tube| tube.holds(product))
            .is_some_and(Tube::dispense)
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }
}
