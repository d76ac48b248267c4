//! Distribution records.
//!
//! A [`DistributionRecord`] is what one recipient physically receives: a count
//! per denomination and the running total paid so far.

use serde::{Deserialize, Serialize};

use super::{DENOMINATION_COUNT, Denomination, Money};

/// Bills and coins handed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    /// The recipient's name.
    pub name: String,
    /// The tip share this record must add up to.
    pub share: Money,
    counts: [u32; DENOMINATION_COUNT],
    paid: Money,
}

impl DistributionRecord {
    /// Creates an empty record for a recipient owed `share`.
    pub fn new(name: impl Into<String>, share: Money) -> Self {
        Self {
            name: name.into(),
            share,
            counts: [0; DENOMINATION_COUNT],
            paid: Money::ZERO,
        }
    }

    /// Units of a denomination handed out so far.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts[denomination.index()]
    }

    /// Running total paid so far.
    pub fn paid(&self) -> Money {
        self.paid
    }

    /// Amount still owed.
    pub fn owed(&self) -> Money {
        self.share - self.paid
    }

    /// Returns true once the record adds up to the share.
    pub fn is_complete(&self) -> bool {
        self.paid == self.share
    }

    /// Hands over one unit of a denomination.
    pub(crate) fn give(&mut self, denomination: Denomination) {
        self.counts[denomination.index()] += 1;
        self.paid += denomination.value();
    }

    /// Swaps `units_out` of `from` for `units_in` of `to`.
    ///
    /// The caller guarantees both sides have the same value, so the running
    /// total is unchanged.
    pub(crate) fn swap(
        &mut self,
        from: Denomination,
        units_out: u32,
        to: Denomination,
        units_in: u32,
    ) {
        debug_assert_eq!(
            from.value() * i64::from(units_out),
            to.value() * i64::from(units_in)
        );
        self.counts[from.index()] -= units_out;
        self.counts[to.index()] += units_in;
    }

    /// Iterates non-zero `(denomination, count)` pairs, largest first.
    pub fn items(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.counts[d.index()]))
            .filter(|(_, n)| *n > 0)
    }

    /// Value of the bills and coins in the record, computed from the counts.
    pub fn counted_value(&self) -> Money {
        Denomination::ALL
            .into_iter()
            .map(|d| d.value() * i64::from(self.counts[d.index()]))
            .sum()
    }
}
