//! Drawer coarsening.
//!
//! Refining can leave far more small coins than anyone needs. Coarsening rolls
//! the surplus back up (40 quarters for two fives, 50 dimes for a five, 20
//! nickels for a loonie) while leaving every coin some recipient needs to make
//! exact change.

use tracing::debug;

use crate::models::{
    AuditStep, CashDrawer, DENOMINATION_COUNT, Denomination, ROLL_RULES, TipShares,
};

use super::RefinedDrawer;

/// A drawer that has been refined and then coarsened.
///
/// Only [`coarsen_drawer`] can build one, and it only accepts a
/// [`RefinedDrawer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoarsenedDrawer(CashDrawer);

impl CoarsenedDrawer {
    /// The coarsened drawer contents.
    pub fn drawer(&self) -> &CashDrawer {
        &self.0
    }

    /// Unwraps the coarsened drawer.
    pub fn into_inner(self) -> CashDrawer {
        self.0
    }
}

/// Small coins every recipient needs for the part of their share below a dollar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EssentialCoins {
    /// Quarters needed for `share mod 1.00`.
    pub quarters: u32,
    /// Dimes needed for `share mod 0.25`.
    pub dimes: u32,
    /// Nickels needed for `share mod 0.25 mod 0.10`.
    pub nickels: u32,
}

impl EssentialCoins {
    /// Sums the essential coins over every share.
    pub fn for_shares(shares: &TipShares) -> Self {
        let mut essential = EssentialCoins::default();
        for share in shares.iter() {
            let cents = share.amount.cents();
            let below_quarter = cents % 25;
            essential.quarters += ((cents % 100) / 25) as u32;
            essential.dimes += (below_quarter / 10) as u32;
            essential.nickels += ((below_quarter % 10) / 5) as u32;
        }
        essential
    }

    /// Essential count for one of the three small coins, zero otherwise.
    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Quarter => self.quarters,
            Denomination::Dime => self.dimes,
            Denomination::Nickel => self.nickels,
            _ => 0,
        }
    }
}

/// The result of coarsening a drawer.
#[derive(Debug, Clone)]
pub struct CoarsenResult {
    /// The coarsened drawer.
    pub drawer: CoarsenedDrawer,
    /// The essential coins that were held back.
    pub essential: EssentialCoins,
    /// Rolls exchanged per denomination, in table order.
    pub rolls: [u32; DENOMINATION_COUNT],
    /// The audit step recording this coarsening.
    pub audit_step: AuditStep,
}

/// Exchanges whole rolls of surplus quarters, dimes and nickels.
///
/// Rolls are counted only from coins above the essential count, so no coin
/// count can drop below what the shares need and the total is unchanged.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::{allocate_tips, coarsen_drawer, refine_drawer};
/// use tip_engine::models::{CashDrawer, Denomination, Recipient, Roster};
/// use rust_decimal::Decimal;
///
/// // 85 quarters (21.25) shared as 10.75 and 10.50: five essential quarters.
/// let drawer = CashDrawer::new([0, 0, 0, 0, 0, 85, 0, 0]);
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(43)),
///     Recipient::new("Bob", Decimal::from(42)),
/// ])
/// .unwrap();
/// let shares = allocate_tips(drawer.total(), &roster, 1).unwrap().shares;
///
/// let refined = refine_drawer(drawer, &shares, 2).unwrap().drawer;
/// let coarsened = coarsen_drawer(refined, &shares, 3);
///
/// assert_eq!(coarsened.rolls[Denomination::Quarter.index()], 2);
/// assert_eq!(coarsened.drawer.drawer().count(Denomination::Quarter), 5);
/// assert_eq!(coarsened.drawer.drawer().count(Denomination::Five), 4);
/// ```
pub fn coarsen_drawer(refined: RefinedDrawer, shares: &TipShares, step_number: u32) -> CoarsenResult {
    let before = refined.into_inner();
    let mut drawer = before;
    let essential = EssentialCoins::for_shares(shares);
    let mut rolls = [0u32; DENOMINATION_COUNT];

    // Rolls are all counted before any coin moves.
    for rule in ROLL_RULES {
        let surplus = drawer
            .count(rule.coin)
            .saturating_sub(essential.get(rule.coin));
        rolls[rule.coin.index()] = surplus / rule.coins_per_roll;
    }

    for rule in ROLL_RULES {
        let count = rolls[rule.coin.index()];
        if count == 0 {
            continue;
        }
        drawer.set_count(
            rule.coin,
            drawer.count(rule.coin) - count * rule.coins_per_roll,
        );
        drawer.add(rule.exchanged_for, count * rule.units_per_roll);
        debug!(
            coin = %rule.coin,
            rolls = count,
            exchanged_for = %rule.exchanged_for,
            "Exchanged coin rolls"
        );
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "coarsen".to_string(),
        rule_name: "Drawer Coarsening".to_string(),
        input: serde_json::json!({
            "drawer": before.counts(),
            "essential": {
                "quarters": essential.quarters,
                "dimes": essential.dimes,
                "nickels": essential.nickels
            }
        }),
        output: serde_json::json!({
            "drawer": drawer.counts(),
            "quarter_rolls": rolls[Denomination::Quarter.index()],
            "dime_rolls": rolls[Denomination::Dime.index()],
            "nickel_rolls": rolls[Denomination::Nickel.index()]
        }),
        reasoning: format!(
            "Held back {} quarters, {} dimes and {} nickels; exchanged {} quarter, {} dime and {} nickel roll(s)",
            essential.quarters,
            essential.dimes,
            essential.nickels,
            rolls[Denomination::Quarter.index()],
            rolls[Denomination::Dime.index()],
            rolls[Denomination::Nickel.index()]
        ),
    };

    CoarsenResult {
        drawer: CoarsenedDrawer(drawer),
        essential,
        rolls,
        audit_step,
    }
}
