//! Greedy change decomposition.

use crate::Amount;
use crate::coin::CoinCounts;

/// Result of [`decompose`]: the coins taken and the part of the amount they
/// could not cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub matched: CoinCounts,
    pub remainder: Amount,
}

/// Take coins from `source` towards `amount`, highest value first.
///
/// A single descending pass: each coin present in `source` is visited once,
/// and at most `floor(amount / value)` of it is taken, capped by its count.
/// There is no backtracking, so an amount that a different combination could
/// pay exactly may be left with a non-zero remainder.
///
/// Matched coins are removed from `source`. A non-positive `amount` matches
/// nothing, and 0p coins are never taken.
pub fn decompose(amount: Amount, source: &mut CoinCounts) -> Change {
    let mut matched = CoinCounts::new();
    let mut owed = amount;

    // coins are collected up front since `source` is mutated while walking
    let mut coins: Vec<_> = source.iter().collect();

    while owed.is_positive() {
        let Some((coin, count)) = coins.pop() else {
            break;
        };
        // 0p coins never pay anything towards the amount
        let Some(fits) = owed.pence().checked_div(i64::from(coin.pence())) else {
            continue;
        };
        let wanted = u32::try_from(fits).unwrap_or(u32::MAX);
        let taken = wanted.min(count);
        if taken > 0 {
            owed -= coin.value() * taken;
            source.remove(coin, taken);
            matched.add(coin, taken);
        }
    }

    Change {
        matched,
        remainder: owed.max(Amount::ZERO),
    }
}
