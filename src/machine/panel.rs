//! Front panel state: the text display and the product button lamps.

use crate::Amount;
use crate::model::Product;

use super::stock::Inventory;

pub const IDLE_PROMPT: &str = "Insert coins and then select a product";

/// Snapshot of what the customer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub text: String,
    /// One entry per product, in catalog order
    pub lamps: Vec<Lamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lamp {
    pub product: String,
    pub lit: bool,
}

/// Text shown while no credit is held. When every product has the same
/// price, the prompt announces it.
pub fn idle_text(catalog: &[Product]) -> String {
    let mut prices = catalog.iter().map(|product| product.price);
    match prices.next() {
        Some(price) if prices.all(|other| other == price) => {
            format!("{IDLE_PROMPT}. All drinks cost {price}")
        }
        _ => IDLE_PROMPT.to_string(),
    }
}

/// Text shown for the given balance.
pub fn display_text(balance: Amount, catalog: &[Product]) -> String {
    if balance.is_zero() {
        idle_text(catalog)
    } else {
        format!("Amount paid: {balance}")
    }
}

/// A button is lit when the credit covers its price and a can is available.
pub fn lamp_lit(product: &Product, balance: Amount, stock: &Inventory) -> bool {
    balance >= product.price && stock.in_stock(&product.name)
}

pub(super) fn snapshot(balance: Amount, catalog: &[Product], stock: &Inventory) -> Panel {
    Panel {
        text: display_text(balance, catalog),
        lamps: catalog
            .iter()
            .map(|product| Lamp {
                product: product.name.clone(),
                lit: lamp_lit(product, balance, stock),
            })
            .collect(),
    }
}
