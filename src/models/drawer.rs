//! Cash drawer model.
//!
//! A [`CashDrawer`] holds one count per [`Denomination`], stored in table order.
//! Apart from bulk updates made by the refine/coarsen stages, counts only change
//! through [`CashDrawer::exchange`], which either succeeds completely or leaves
//! the drawer untouched.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, ExchangeError};

use super::{DENOMINATION_COUNT, Denomination, Money};

/// Most units of one denomination a drawer may hold.
///
/// A full drawer at this limit is worth under 40 million dollars, so breaking
/// it down entirely into nickels still fits each count in a `u32`.
pub const MAX_UNIT_COUNT: u32 = 1_000_000;

/// Counts of bills and coins, indexed by denomination.
///
/// # Example
///
/// ```
/// use tip_engine::models::{CashDrawer, Denomination, Money};
///
/// let mut drawer = CashDrawer::new([0, 0, 2, 0, 0, 0, 0, 0]);
/// assert_eq!(drawer.total(), Money::from_cents(1000));
///
/// drawer.exchange(Denomination::Five, Denomination::Loonie, 1).unwrap();
/// assert_eq!(drawer.count(Denomination::Loonie), 5);
/// assert_eq!(drawer.total(), Money::from_cents(1000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashDrawer {
    counts: [u32; DENOMINATION_COUNT],
}

impl CashDrawer {
    /// Creates a drawer from counts in table order (twenties first).
    pub const fn new(counts: [u32; DENOMINATION_COUNT]) -> Self {
        Self { counts }
    }

    /// An empty drawer.
    pub const fn empty() -> Self {
        Self {
            counts: [0; DENOMINATION_COUNT],
        }
    }

    /// Returns the number of units held of a denomination.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts[denomination.index()]
    }

    /// Replaces the count of a denomination.
    pub fn set_count(&mut self, denomination: Denomination, count: u32) {
        self.counts[denomination.index()] = count;
    }

    /// Adds units of a denomination.
    pub(crate) fn add(&mut self, denomination: Denomination, units: u32) {
        self.counts[denomination.index()] += units;
    }

    /// Removes units of a denomination, returning `false` (and changing nothing)
    /// if the drawer does not hold enough.
    pub(crate) fn remove(&mut self, denomination: Denomination, units: u32) -> bool {
        match self.counts[denomination.index()].checked_sub(units) {
            Some(left) => {
                self.counts[denomination.index()] = left;
                true
            }
            None => false,
        }
    }

    /// Checks every count against [`MAX_UNIT_COUNT`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OversizedDrawer`] for the first denomination
    /// over the limit.
    pub fn check_capacity(&self) -> EngineResult<()> {
        match self.iter().find(|(_, count)| *count > MAX_UNIT_COUNT) {
            Some((denomination, count)) => Err(EngineError::OversizedDrawer {
                denomination,
                count,
                limit: MAX_UNIT_COUNT,
            }),
            None => Ok(()),
        }
    }

    /// Returns all counts in table order.
    pub fn counts(&self) -> [u32; DENOMINATION_COUNT] {
        self.counts
    }

    /// Iterates `(denomination, count)` pairs, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.counts[d.index()]))
    }

    /// Total value of the drawer.
    pub fn total(&self) -> Money {
        self.iter()
            .map(|(d, count)| d.value() * i64::from(count))
            .sum()
    }

    /// Exchanges `n` units of `from` for the same value in `to`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::SameDenomination`] if `from == to`
    /// - [`ExchangeError::Insufficient`] if the drawer holds fewer than `n` of `from`
    /// - [`ExchangeError::OddSplit`] for an odd `n` of fives into toonies or
    ///   quarters into dimes
    /// - [`ExchangeError::RatioNotIntegral`] if `n` units of `from` are not a
    ///   whole number of `to`
    /// - [`ExchangeError::CountOverflow`] if the `to` count would not fit in a `u32`
    ///
    /// The drawer is unchanged on error.
    pub fn exchange(
        &mut self,
        from: Denomination,
        to: Denomination,
        n: u32,
    ) -> Result<(), ExchangeError> {
        if from == to {
            return Err(ExchangeError::SameDenomination { denomination: from });
        }

        let available = self.count(from);
        if n > available {
            return Err(ExchangeError::Insufficient {
                denomination: from,
                requested: n,
                available,
            });
        }

        let is_odd_split = matches!(
            (from, to),
            (Denomination::Five, Denomination::Toonie) | (Denomination::Quarter, Denomination::Dime)
        );
        if is_odd_split && n % 2 == 1 {
            return Err(ExchangeError::OddSplit { from, to, count: n });
        }

        let value = from.cents() * i64::from(n);
        if value % to.cents() != 0 {
            return Err(ExchangeError::RatioNotIntegral { from, to, count: n });
        }
        let target = u32::try_from(value / to.cents())
            .ok()
            .and_then(|received| self.counts[to.index()].checked_add(received))
            .ok_or(ExchangeError::CountOverflow { from, to, count: n })?;

        self.counts[from.index()] -= n;
        self.counts[to.index()] = target;
        Ok(())
    }

    /// Per-denomination signed difference `self - other`.
    pub fn compare(&self, other: &CashDrawer) -> DrawerDelta {
        let mut delta = [0i64; DENOMINATION_COUNT];
        for d in Denomination::ALL {
            delta[d.index()] = i64::from(self.count(d)) - i64::from(other.count(d));
        }
        DrawerDelta { delta }
    }
}

impl Index<Denomination> for CashDrawer {
    type Output = u32;

    fn index(&self, denomination: Denomination) -> &u32 {
        &self.counts[denomination.index()]
    }
}

/// Signed per-denomination difference between two drawers.
///
/// Comparing the original drawer against the working drawer gives the number
/// of each bill or coin that must be broken (positive) or obtained (negative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerDelta {
    delta: [i64; DENOMINATION_COUNT],
}

impl DrawerDelta {
    /// Difference for one denomination.
    pub fn get(&self, denomination: Denomination) -> i64 {
        self.delta[denomination.index()]
    }

    /// Iterates non-zero differences, largest denomination first.
    pub fn non_zero(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.delta[d.index()]))
            .filter(|(_, n)| *n != 0)
    }

    /// Net value of the difference.
    pub fn value(&self) -> Money {
        Denomination::ALL
            .into_iter()
            .map(|d| d.value() * self.delta[d.index()])
            .sum()
    }

    /// Returns true if both drawers held the same counts.
    pub fn is_zero(&self) -> bool {
        self.delta.iter().all(|n| *n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CashDrawer {
        // 2 twenties, 1 ten, 3 fives, 2 toonies, 4 loonies, 7 quarters, 5 dimes, 3 nickels
        CashDrawer::new([2, 1, 3, 2, 4, 7, 5, 3])
    }

    #[test]
    fn test_total() {
        // 40 + 10 + 15 + 4 + 4 + 1.75 + 0.50 + 0.15
        assert_eq!(sample().total(), Money::from_cents(7540));
        assert_eq!(CashDrawer::empty().total(), Money::ZERO);
    }

    #[test]
    fn test_exchange_down() {
        let mut drawer = sample();
        drawer
            .exchange(Denomination::Twenty, Denomination::Five, 1)
            .unwrap();
        assert_eq!(drawer.count(Denomination::Twenty), 1);
        assert_eq!(drawer.count(Denomination::Five), 7);
        assert_eq!(drawer.total(), sample().total());
    }

    #[test]
    fn test_exchange_up_requires_multiple() {
        let mut drawer = sample();
        drawer
            .exchange(Denomination::Dime, Denomination::Quarter, 5)
            .unwrap();
        assert_eq!(drawer.count(Denomination::Dime), 0);
        assert_eq!(drawer.count(Denomination::Quarter), 9);

        let mut drawer = sample();
        let err = drawer
            .exchange(Denomination::Quarter, Denomination::Loonie, 3)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::RatioNotIntegral { .. }));
        assert_eq!(drawer, sample());
    }

    #[test]
    fn test_exchange_more_than_available_fails_without_mutation() {
        let mut drawer = sample();
        for d in Denomination::ALL {
            for to in Denomination::ALL.into_iter().filter(|t| *t != d) {
                let err = drawer.exchange(d, to, drawer.count(d) + 1).unwrap_err();
                assert!(matches!(err, ExchangeError::Insufficient { .. }));
                assert_eq!(drawer, sample());
            }
        }
    }

    #[test]
    fn test_odd_fives_to_toonies_fails() {
        let mut drawer = sample();
        let err = drawer
            .exchange(Denomination::Five, Denomination::Toonie, 1)
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::OddSplit {
                from: Denomination::Five,
                to: Denomination::Toonie,
                count: 1
            }
        );
        assert_eq!(drawer, sample());

        drawer
            .exchange(Denomination::Five, Denomination::Toonie, 2)
            .unwrap();
        assert_eq!(drawer.count(Denomination::Toonie), 7);
    }

    #[test]
    fn test_odd_quarters_to_dimes_fails() {
        let mut drawer = sample();
        let err = drawer
            .exchange(Denomination::Quarter, Denomination::Dime, 3)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::OddSplit { count: 3, .. }));
        assert_eq!(drawer, sample());

        drawer
            .exchange(Denomination::Quarter, Denomination::Dime, 4)
            .unwrap();
        assert_eq!(drawer.count(Denomination::Quarter), 3);
        assert_eq!(drawer.count(Denomination::Dime), 15);
    }

    #[test]
    fn test_exchange_same_denomination_fails() {
        let mut drawer = sample();
        let err = drawer
            .exchange(Denomination::Dime, Denomination::Dime, 1)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::SameDenomination { .. }));
    }

    #[test]
    fn test_compare_reports_signed_delta() {
        let original = sample();
        let mut working = sample();
        working
            .exchange(Denomination::Ten, Denomination::Loonie, 1)
            .unwrap();

        let delta = original.compare(&working);
        assert_eq!(delta.get(Denomination::Ten), 1);
        assert_eq!(delta.get(Denomination::Loonie), -10);
        assert_eq!(delta.non_zero().count(), 2);
        assert_eq!(delta.value(), Money::ZERO);
        assert!(original.compare(&original).is_zero());
    }

    #[test]
    fn test_remove_refuses_overdraw() {
        let mut drawer = sample();
        assert!(!drawer.remove(Denomination::Nickel, 4));
        assert_eq!(drawer, sample());
        assert!(drawer.remove(Denomination::Nickel, 3));
        assert_eq!(drawer[Denomination::Nickel], 0);
    }

    #[test]
    fn test_exchange_overflowing_target_fails_without_mutation() {
        let mut drawer = CashDrawer::new([0, 0, 0, 0, 1, 0, 0, u32::MAX - 5]);
        let before = drawer;

        let err = drawer
            .exchange(Denomination::Loonie, Denomination::Nickel, 1)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::CountOverflow { .. }));
        assert_eq!(drawer, before);
    }

    #[test]
    fn test_check_capacity() {
        assert!(sample().check_capacity().is_ok());
        assert!(CashDrawer::new([MAX_UNIT_COUNT; DENOMINATION_COUNT]).check_capacity().is_ok());

        let mut drawer = sample();
        drawer.set_count(Denomination::Dime, MAX_UNIT_COUNT + 1);
        match drawer.check_capacity() {
            Err(EngineError::OversizedDrawer { denomination, count, limit }) => {
                assert_eq!(denomination, Denomination::Dime);
                assert_eq!(count, MAX_UNIT_COUNT + 1);
                assert_eq!(limit, MAX_UNIT_COUNT);
            }
            other => panic!("Expected OversizedDrawer, got {:?}", other),
        }
    }
}
