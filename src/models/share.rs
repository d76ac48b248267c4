//! Tip share models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::Money;

/// One recipient's tip share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipShare {
    /// The recipient's name.
    pub name: String,
    /// Hours worked.
    pub hours: Decimal,
    /// Unrounded share in dollars (`hours * fraction`).
    pub raw: Decimal,
    /// The payable share, a whole number of nickels.
    pub amount: Money,
    /// Nickels added (positive) or removed (negative) to fix the rounding
    /// discrepancy.
    pub adjustment: i64,
}

/// Tip shares for a whole roster, in roster order.
///
/// Built by [`allocate_tips`](crate::calculation::allocate_tips), which
/// guarantees every amount is a non-negative whole number of nickels and the
/// amounts add up to `pool`. Deserializing checks the same invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTipShares")]
pub struct TipShares {
    /// The pool that was shared out.
    pub pool: Money,
    /// Total hours worked by the roster.
    pub total_hours: Decimal,
    /// Dollars per hour worked.
    pub fraction: Decimal,
    /// Signed nickel count by which rounding missed the pool, before correction.
    pub discrepancy_units: i64,
    pub(crate) shares: Vec<TipShare>,
}

impl TipShares {
    /// Shares in roster order.
    pub fn shares(&self) -> &[TipShare] {
        &self.shares
    }

    /// Iterates shares in roster order.
    pub fn iter(&self) -> std::slice::Iter<'_, TipShare> {
        self.shares.iter()
    }

    /// Number of shares.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if there are no shares.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Looks up a recipient's payable amount by name.
    pub fn amount_for(&self, name: &str) -> Option<Money> {
        self.shares.iter().find(|s| s.name == name).map(|s| s.amount)
    }

    /// Sum of the payable amounts.
    pub fn total(&self) -> Money {
        self.shares.iter().map(|s| s.amount).sum()
    }
}

/// Wire form of [`TipShares`] before its invariant is checked.
#[derive(Deserialize)]
struct UncheckedTipShares {
    pool: Money,
    total_hours: Decimal,
    fraction: Decimal,
    discrepancy_units: i64,
    shares: Vec<TipShare>,
}

impl TryFrom<UncheckedTipShares> for TipShares {
    type Error = EngineError;

    fn try_from(unchecked: UncheckedTipShares) -> Result<Self, Self::Error> {
        if let Some(share) = unchecked
            .shares
            .iter()
            .find(|s| s.amount < Money::ZERO || !s.amount.is_nickel_multiple())
        {
            return Err(EngineError::InvalidRecipient {
                name: share.name.clone(),
                message: format!("{} is not a payable share", share.amount),
            });
        }

        let total: Money = unchecked.shares.iter().map(|s| s.amount).sum();
        if total != unchecked.pool {
            return Err(EngineError::invariant(
                "allocate",
                format!("shares add up to {} but the pool is {}", total, unchecked.pool),
            ));
        }

        Ok(Self {
            pool: unchecked.pool,
            total_hours: unchecked.total_hours,
            fraction: unchecked.fraction,
            discrepancy_units: unchecked.discrepancy_units,
            shares: unchecked.shares,
        })
    }
}
