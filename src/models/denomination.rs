//! The fixed table of Canadian bills and coins.
//!
//! Denominations are processed from largest to smallest everywhere in the
//! engine; [`Denomination::ALL`] is that order and [`Denomination::index`] is
//! the position used by every per-denomination array.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;

use super::Money;

/// Number of denominations in the table.
pub const DENOMINATION_COUNT: usize = 8;

/// A Canadian bill or coin, from twenty dollars down to the nickel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    /// $20 bill.
    Twenty,
    /// $10 bill.
    Ten,
    /// $5 bill.
    Five,
    /// $2 coin.
    Toonie,
    /// $1 coin.
    Loonie,
    /// 25 cent coin.
    Quarter,
    /// 10 cent coin.
    Dime,
    /// 5 cent coin.
    Nickel,
}

impl Denomination {
    /// All denominations, largest first.
    pub const ALL: [Denomination; DENOMINATION_COUNT] = [
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::Toonie,
        Denomination::Loonie,
        Denomination::Quarter,
        Denomination::Dime,
        Denomination::Nickel,
    ];

    /// Face value in cents.
    pub const fn cents(self) -> i64 {
        match self {
            Denomination::Twenty => 2000,
            Denomination::Ten => 1000,
            Denomination::Five => 500,
            Denomination::Toonie => 200,
            Denomination::Loonie => 100,
            Denomination::Quarter => 25,
            Denomination::Dime => 10,
            Denomination::Nickel => 5,
        }
    }

    /// Face value as [`Money`].
    pub const fn value(self) -> Money {
        Money::from_cents(self.cents())
    }

    /// Position in [`Denomination::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The next smaller denomination in table order, or `None` for the nickel.
    pub fn next_smaller(self) -> Option<Denomination> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Looks up a denomination by face value in cents.
    pub fn from_cents(cents: i64) -> Option<Denomination> {
        Self::ALL.into_iter().find(|d| d.cents() == cents)
    }

    /// Plural lower-case name, e.g. `"toonies"`.
    pub const fn name(self) -> &'static str {
        match self {
            Denomination::Twenty => "twenties",
            Denomination::Ten => "tens",
            Denomination::Five => "fives",
            Denomination::Toonie => "toonies",
            Denomination::Loonie => "loonies",
            Denomination::Quarter => "quarters",
            Denomination::Dime => "dimes",
            Denomination::Nickel => "nickels",
        }
    }

    /// Capitalised plural label used in reports, e.g. `"Toonies"`.
    pub const fn label(self) -> &'static str {
        match self {
            Denomination::Twenty => "Twenties",
            Denomination::Ten => "Tens",
            Denomination::Five => "Fives",
            Denomination::Toonie => "Toonies",
            Denomination::Loonie => "Loonies",
            Denomination::Quarter => "Quarters",
            Denomination::Dime => "Dimes",
            Denomination::Nickel => "Nickels",
        }
    }

    /// Returns true for bills and dollar coins, false for the small coins.
    pub const fn is_dollar_or_more(self) -> bool {
        self.cents() >= 100
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Denomination {
    type Err = ExchangeError;

    /// Parses a dollar value such as `"5"`, `"0.25"` or `"0.1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ExchangeError::UnknownDenomination {
            value: s.to_string(),
        };
        let dollars = Decimal::from_str(s.trim()).map_err(|_| unknown())?;
        let cents = dollars * Decimal::ONE_HUNDRED;
        if !cents.fract().is_zero() {
            return Err(unknown());
        }
        let cents = cents.to_i64().ok_or_else(unknown)?;
        Denomination::from_cents(cents).ok_or_else(unknown)
    }
}

/// A roll of small coins that the bank swaps for larger money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRule {
    /// The coin in the roll.
    pub coin: Denomination,
    /// Coins per roll.
    pub coins_per_roll: u32,
    /// What one roll is exchanged for.
    pub exchanged_for: Denomination,
    /// How many units of `exchanged_for` one roll yields.
    pub units_per_roll: u32,
}

/// Roll exchange rates: 40 quarters for two fives, 50 dimes for one five,
/// 20 nickels for one loonie.
pub const ROLL_RULES: [RollRule; 3] = [
    RollRule {
        coin: Denomination::Quarter,
        coins_per_roll: 40,
        exchanged_for: Denomination::Five,
        units_per_roll: 2,
    },
    RollRule {
        coin: Denomination::Dime,
        coins_per_roll: 50,
        exchanged_for: Denomination::Five,
        units_per_roll: 1,
    },
    RollRule {
        coin: Denomination::Nickel,
        coins_per_roll: 20,
        exchanged_for: Denomination::Loonie,
        units_per_roll: 1,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_strictly_descending() {
        for pair in Denomination::ALL.windows(2) {
            assert!(pair[0].cents() > pair[1].cents());
        }
    }

    #[test]
    fn test_index_matches_table_position() {
        for (i, d) in Denomination::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn test_next_smaller() {
        assert_eq!(
            Denomination::Five.next_smaller(),
            Some(Denomination::Toonie)
        );
        assert_eq!(
            Denomination::Quarter.next_smaller(),
            Some(Denomination::Dime)
        );
        assert_eq!(Denomination::Nickel.next_smaller(), None);
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Denomination::from_cents(200), Some(Denomination::Toonie));
        assert_eq!(Denomination::from_cents(50), None);
    }

    #[test]
    fn test_parse_dollar_text() {
        assert_eq!("20".parse::<Denomination>(), Ok(Denomination::Twenty));
        assert_eq!("0.25".parse::<Denomination>(), Ok(Denomination::Quarter));
        assert_eq!("0.1".parse::<Denomination>(), Ok(Denomination::Dime));
        assert_eq!("0.05".parse::<Denomination>(), Ok(Denomination::Nickel));
    }

    #[test]
    fn test_parse_unknown_value_fails() {
        for text in ["0.50", "100", "0.01", "abc", "0.125"] {
            assert!(
                matches!(
                    text.parse::<Denomination>(),
                    Err(ExchangeError::UnknownDenomination { .. })
                ),
                "{} should not parse",
                text
            );
        }
    }

    #[test]
    fn test_roll_rules_keep_value() {
        for rule in ROLL_RULES {
            assert_eq!(
                rule.coin.cents() * i64::from(rule.coins_per_roll),
                rule.exchanged_for.cents() * i64::from(rule.units_per_roll)
            );
        }
    }

    #[test]
    fn test_display_uses_plural_name() {
        assert_eq!(Denomination::Loonie.to_string(), "loonies");
        assert_eq!(Denomination::Loonie.label(), "Loonies");
    }
}
