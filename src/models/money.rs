//! Fixed-point money.
//!
//! All amounts handled by the engine are whole cents. Decimal dollars only
//! appear for hours-weighted raw shares, before they are rounded to the nickel.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cents in one nickel, the smallest payable unit.
pub const NICKEL_CENTS: i64 = 5;

/// A monetary amount in Canadian cents.
///
/// # Example
///
/// ```
/// use tip_engine::models::Money;
///
/// let share = Money::from_cents(1235);
/// assert_eq!(share.to_string(), "12.35 CAD");
/// assert!(share.is_nickel_multiple());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// Creates a value from a number of cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the value can be paid in whole nickels.
    #[inline]
    pub const fn is_nickel_multiple(&self) -> bool {
        self.0 % NICKEL_CENTS == 0
    }

    /// Converts to decimal dollars with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Money {
    /// Formats as `"123.45 CAD"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02} CAD", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Money::from_cents(12345).to_string(), "123.45 CAD");
        assert_eq!(Money::from_cents(500).to_string(), "5.00 CAD");
        assert_eq!(Money::from_cents(5).to_string(), "0.05 CAD");
        assert_eq!(Money::ZERO.to_string(), "0.00 CAD");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Money::from_cents(-105).to_string(), "-1.05 CAD");
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(
            Money::from_cents(1003).to_decimal(),
            Decimal::from_str("10.03").unwrap()
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(250);
        let b = Money::from_cents(75);
        assert_eq!(a + b, Money::from_cents(325));
        assert_eq!(a - b, Money::from_cents(175));
        assert_eq!(b * 4, Money::from_cents(300));
        assert_eq!(-a, Money::from_cents(-250));

        let mut c = a;
        c += b;
        c -= Money::from_cents(25);
        assert_eq!(c, Money::from_cents(300));
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_cents(5), Money::from_cents(10), Money::from_cents(20)];
        let total: Money = values.iter().sum();
        assert_eq!(total, Money::from_cents(35));
    }

    #[test]
    fn test_nickel_multiple() {
        assert!(Money::from_cents(1005).is_nickel_multiple());
        assert!(!Money::from_cents(1003).is_nickel_multiple());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(335)).unwrap();
        assert_eq!(json, "335");
    }
}
