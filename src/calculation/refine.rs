//! Drawer refinement.
//!
//! Refining breaks large bills and coins into smaller ones until every
//! recipient's share can be made from what is in the drawer. Each denomination
//! is first apportioned greedily across recipients; whatever nobody can absorb
//! is exchanged one step down the table.

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AuditStep, CashDrawer, Denomination, Money, TipShares};

/// A drawer that has been refined against a set of shares.
///
/// Only [`refine_drawer`] can build one, which makes refining before
/// coarsening a type-level requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinedDrawer(CashDrawer);

impl RefinedDrawer {
    /// The refined drawer contents.
    pub fn drawer(&self) -> &CashDrawer {
        &self.0
    }

    /// Unwraps the refined drawer.
    pub fn into_inner(self) -> CashDrawer {
        self.0
    }
}

/// The result of refining a drawer, including the drawer and audit step.
#[derive(Debug, Clone)]
pub struct RefineResult {
    /// The refined drawer.
    pub drawer: RefinedDrawer,
    /// The audit step recording this refinement.
    pub audit_step: AuditStep,
}

/// Breaks denominations down so every share in `shares` is payable.
///
/// Denominations are visited from twenties down to dimes; nickels are never
/// broken. For each denomination, recipients in roster order take as many
/// units as fit in what they are still owed. Leftover units are exchanged:
///
/// - fives become loonies (5 each), skipping toonies
/// - quarters become two and a half dimes each: `floor(2.5 * n)` dimes plus one
///   nickel when `n` is odd
/// - everything else becomes the next smaller denomination
///
/// The drawer total never changes.
///
/// # Errors
///
/// Returns [`EngineError::OversizedDrawer`](crate::error::EngineError::OversizedDrawer)
/// if any count is above [`MAX_UNIT_COUNT`](crate::models::MAX_UNIT_COUNT).
/// Below that limit every broken-down count still fits in a `u32`.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::{allocate_tips, refine_drawer};
/// use tip_engine::models::{CashDrawer, Denomination, Recipient, Roster};
/// use rust_decimal::Decimal;
///
/// let drawer = CashDrawer::new([1, 0, 0, 0, 0, 0, 0, 0]);
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(1)),
///     Recipient::new("Bob", Decimal::from(1)),
/// ])
/// .unwrap();
/// let shares = allocate_tips(drawer.total(), &roster, 1).unwrap().shares;
///
/// let refined = refine_drawer(drawer, &shares, 2).unwrap().drawer;
/// assert_eq!(refined.drawer().count(Denomination::Ten), 2);
/// assert_eq!(refined.drawer().total(), drawer.total());
/// ```
pub fn refine_drawer(
    drawer: CashDrawer,
    shares: &TipShares,
    step_number: u32,
) -> EngineResult<RefineResult> {
    drawer.check_capacity()?;

    let mut refined = drawer;
    let mut owed: Vec<Money> = shares.iter().map(|s| s.amount).collect();
    let mut broken = serde_json::Map::new();

    for denomination in Denomination::ALL {
        let Some(smaller) = denomination.next_smaller() else {
            break;
        };

        // Running count of units nobody has taken yet.
        let mut remaining = refined.count(denomination);
        for amount in owed.iter_mut() {
            if remaining == 0 {
                break;
            }
            let fits = amount.cents() / denomination.cents();
            let portion = remaining.min(u32::try_from(fits).unwrap_or(u32::MAX));
            remaining -= portion;
            *amount -= denomination.value() * i64::from(portion);
        }

        if remaining == 0 {
            continue;
        }

        let leftover = remaining;
        refined.set_count(denomination, refined.count(denomination) - leftover);
        match denomination {
            Denomination::Five => refined.add(Denomination::Loonie, 5 * leftover),
            Denomination::Quarter => {
                refined.add(Denomination::Dime, leftover * 5 / 2);
                refined.add(Denomination::Nickel, leftover % 2);
            }
            _ => {
                let ratio = denomination.cents() / smaller.cents();
                refined.add(smaller, leftover * ratio as u32);
            }
        }

        debug!(
            denomination = %denomination,
            leftover,
            "Broke leftover units into smaller denominations"
        );
        broken.insert(denomination.name().to_string(), leftover.into());
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "refine".to_string(),
        rule_name: "Drawer Refinement".to_string(),
        input: serde_json::json!({
            "drawer": drawer.counts(),
            "total_cents": drawer.total().cents()
        }),
        output: serde_json::json!({
            "drawer": refined.counts(),
            "broken": broken
        }),
        reasoning: if broken.is_empty() {
            "Every denomination could be apportioned as held; nothing was broken".to_string()
        } else {
            format!(
                "Broke leftover {} into smaller denominations",
                broken.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        },
    };

    Ok(RefineResult {
        drawer: RefinedDrawer(refined),
        audit_step,
    })
}
