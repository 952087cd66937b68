//! Coins, the accepted denomination set, and coin-count trays.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::Amount;

/// A coin, identified by its face value in pence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin(u32);

impl Coin {
    pub const fn from_pence(value: u32) -> Self {
        Coin(value)
    }

    pub const fn pence(self) -> u32 {
        self.0
    }

    pub fn value(self) -> Amount {
        Amount::from_pence(i64::from(self.0))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 100 && self.0 % 100 == 0 {
            write!(f, "£{}", self.0 / 100)
        } else if self.0 >= 100 {
            write!(f, "{}", self.value())
        } else {
            write!(f, "{}p", self.0)
        }
    }
}

/// The fixed set of coins a machine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denominations(BTreeSet<Coin>);

impl Denominations {
    /// UK circulation coins, 1p to £2.
    pub const STERLING: [u32; 8] = [1, 2, 5, 10, 20, 50, 100, 200];

    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Self {
        Denominations(coins.into_iter().collect())
    }

    pub fn contains(&self, coin: Coin) -> bool {
        self.0.contains(&coin)
    }

    /// Look up a raw pence value, returning the coin if it is accepted.
    pub fn recognize(&self, pence: u32) -> Option<Coin> {
        let coin = Coin::from_pence(pence);
        self.contains(coin).then_some(coin)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Denominations {
    fn default() -> Self {
        Self::new(Self::STERLING.into_iter().map(Coin::from_pence))
    }
}

/// Count of coins per denomination.
///
/// A coin absent from the tray has count zero; zero counts are never stored,
/// so iteration only yields coins actually present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinCounts(BTreeMap<Coin, u32>);

impl CoinCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coin: Coin) -> u32 {
        self.0.get(&coin).copied().unwrap_or(0)
    }

    pub fn add(&mut self, coin: Coin, count: u32) {
        if count > 0 {
            *self.0.entry(coin).or_insert(0) += count;
        }
    }

    /// Remove up to `count` coins, returning how many were actually removed.
    pub fn remove(&mut self, coin: Coin, count: u32) -> u32 {
        let Some(held) = self.0.get_mut(&coin) else {
            return 0;
        };
        let removed = count.min(*held);
        *held -= removed;
        if *held == 0 {
            self.0.remove(&coin);
        }
        removed
    }

    /// Move every coin of `other` into this tray, leaving `other` empty.
    pub fn absorb(&mut self, other: &mut CoinCounts) {
        for (coin, count) in std::mem::take(&mut other.0) {
            self.add(coin, count);
        }
    }

    /// Smallest coin present whose value is at least `amount`.
    pub fn smallest_covering(&self, amount: Amount) -> Option<Coin> {
        self.0.keys().copied().find(|coin| coin.value() >= amount)
    }

    /// Total value of all coins in the tray.
    pub fn total(&self) -> Amount {
        self.iter().map(|(coin, count)| coin.value() * count).sum()
    }

    /// Number of individual coins in the tray.
    pub fn coin_count(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coins in ascending order of value, with their counts.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Coin, u32)> + '_ {
        self.0.iter().map(|(&coin, &count)| (coin, count))
    }
}

impl FromIterator<(Coin, u32)> for CoinCounts {
    fn from_iter<I: IntoIterator<Item = (Coin, u32)>>(iter: I) -> Self {
        let mut counts = CoinCounts::new();
        for (coin, count) in iter {
            counts.add(coin, count);
        }
        counts
    }
}

/// Lists coins in ascending order, e.g. `1 x 20p; 2 x £1`.
impl fmt::Display for CoinCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (coin, count)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{count} x {coin}")?;
        }
        Ok(())
    }
}
