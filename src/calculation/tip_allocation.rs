//! Tip allocation functionality.
//!
//! This module splits a pool between recipients in proportion to hours worked,
//! rounds every share to the nickel and then repairs the rounding discrepancy so
//! the shares add up to the pool exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Money, NICKEL_CENTS, Roster, TipShare, TipShares};

/// Nickels per dollar.
const NICKELS_PER_DOLLAR: i64 = 20;

/// The result of allocating a pool, including the shares and audit step.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// Each recipient's share.
    pub shares: TipShares,
    /// The audit step recording this allocation.
    pub audit_step: AuditStep,
}

/// Splits `pool` between the roster in proportion to hours worked.
///
/// Each raw share `hours * pool / total_hours` is rounded to the nearest nickel
/// using banker's rounding (a share exactly halfway between two nickels goes to
/// the even nickel count). If the rounded shares miss the pool by `k` nickels,
/// exactly `k` recipients are adjusted by one nickel each:
///
/// - short of the pool: the `k` recipients with the largest positive rounding
///   error (`raw - rounded`) gain a nickel
/// - over the pool: the `k` recipients with the most negative rounding error
///   lose a nickel
///
/// Recipients with equal rounding errors are taken in roster order.
///
/// # Errors
///
/// - [`EngineError::EmptyRoster`] if the roster is empty or everyone worked zero hours
/// - [`EngineError::UnalignedPool`] if `pool` is not a whole number of nickels
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::allocate_tips;
/// use tip_engine::models::{Money, Recipient, Roster};
/// use rust_decimal::Decimal;
///
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(1)),
///     Recipient::new("Bob", Decimal::from(1)),
///     Recipient::new("Carol", Decimal::from(1)),
/// ])
/// .unwrap();
///
/// let result = allocate_tips(Money::from_cents(1000), &roster, 1).unwrap();
/// let amounts: Vec<i64> = result.shares.iter().map(|s| s.amount.cents()).collect();
/// assert_eq!(amounts, vec![330, 335, 335]);
/// assert_eq!(result.shares.total(), Money::from_cents(1000));
/// ```
pub fn allocate_tips(pool: Money, roster: &Roster, step_number: u32) -> EngineResult<AllocationResult> {
    if roster.is_empty() {
        return Err(EngineError::EmptyRoster {
            message: "no recipients".to_string(),
        });
    }
    if !pool.is_nickel_multiple() {
        return Err(EngineError::UnalignedPool {
            cents: pool.cents(),
        });
    }

    let total_hours = roster.total_hours();
    if total_hours.is_zero() {
        return Err(EngineError::EmptyRoster {
            message: "total hours worked is zero".to_string(),
        });
    }

    let pool_dollars = pool.to_decimal();
    let fraction = pool_dollars / total_hours;

    let mut shares = Vec::with_capacity(roster.len());
    for recipient in roster {
        // Multiply before dividing so terminating shares stay exact.
        let (raw, nickels) = recipient
            .hours
            .checked_mul(pool_dollars)
            .and_then(|product| product.checked_div(total_hours))
            .and_then(|raw| Some((raw, round_to_nickels(raw)?)))
            .ok_or_else(|| {
                EngineError::invariant(
                    "allocate",
                    format!("share for '{}' is out of range", recipient.name),
                )
            })?;
        shares.push(TipShare {
            name: recipient.name.clone(),
            hours: recipient.hours,
            raw,
            amount: Money::from_cents(nickels * NICKEL_CENTS),
            adjustment: 0,
        });
    }

    let rounded_total: Money = shares.iter().map(|s| s.amount).sum();
    let discrepancy_units = (rounded_total - pool).cents() / NICKEL_CENTS;

    if discrepancy_units != 0 {
        correct_discrepancy(&mut shares, discrepancy_units)?;
    }

    let allocated: Money = shares.iter().map(|s| s.amount).sum();
    if allocated != pool {
        return Err(EngineError::invariant(
            "allocate",
            format!("shares add up to {} but the pool is {}", allocated, pool),
        ));
    }

    for share in &shares {
        debug!(
            recipient = %share.name,
            hours = %share.hours,
            raw = %share.raw,
            amount = %share.amount,
            adjustment = share.adjustment,
            "Tip share computed"
        );
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "tip_allocation".to_string(),
        rule_name: "Tip Allocation".to_string(),
        input: serde_json::json!({
            "pool_cents": pool.cents(),
            "total_hours": total_hours.to_string(),
            "recipients": roster.len()
        }),
        output: serde_json::json!({
            "fraction": fraction.round_dp(6).to_string(),
            "discrepancy_units": discrepancy_units,
            "shares": shares
                .iter()
                .map(|s| serde_json::json!({
                    "name": s.name,
                    "amount_cents": s.amount.cents(),
                    "adjustment": s.adjustment
                }))
                .collect::<Vec<_>>()
        }),
        reasoning: format!(
            "{} over {} hours is {} per hour; rounding to the nickel missed by {} nickel(s)",
            pool,
            total_hours.normalize(),
            fraction.round_dp(4).normalize(),
            discrepancy_units
        ),
    };

    Ok(AllocationResult {
        shares: TipShares {
            pool,
            total_hours,
            fraction,
            discrepancy_units,
            shares,
        },
        audit_step,
    })
}

/// Rounds a dollar amount to a whole number of nickels, half to even.
fn round_to_nickels(dollars: Decimal) -> Option<i64> {
    dollars
        .checked_mul(Decimal::from(NICKELS_PER_DOLLAR))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}

/// Moves `|units|` nickels onto (or off) the recipients rounding hurt (or
/// helped) the most.
fn correct_discrepancy(shares: &mut [TipShare], units: i64) -> EngineResult<()> {
    let count = usize::try_from(units.unsigned_abs()).unwrap_or(usize::MAX);
    if count > shares.len() {
        return Err(EngineError::invariant(
            "allocate",
            format!(
                "rounding missed by {} nickels across only {} recipients",
                units,
                shares.len()
            ),
        ));
    }

    let errors: Vec<Decimal> = shares.iter().map(|s| s.raw - s.amount.to_decimal()).collect();
    let mut order: Vec<usize> = (0..shares.len()).collect();

    // `sort_by` is stable, so equal errors keep roster order.
    if units < 0 {
        order.sort_by(|&a, &b| errors[b].cmp(&errors[a]));
    } else {
        order.sort_by(|&a, &b| errors[a].cmp(&errors[b]));
    }

    let step = if units < 0 { 1 } else { -1 };
    for &i in order.iter().take(count) {
        shares[i].amount += Money::from_cents(step * NICKEL_CENTS);
        shares[i].adjustment += step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipient;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn roster(entries: &[(&str, &str)]) -> Roster {
        Roster::new(
            entries
                .iter()
                .map(|(name, hours)| Recipient::new(*name, dec(hours)))
                .collect(),
        )
        .unwrap()
    }

    fn amounts(shares: &TipShares) -> Vec<i64> {
        shares.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn test_even_split_needs_no_correction() {
        let roster = roster(&[("Alice", "5"), ("Bob", "5")]);
        let result = allocate_tips(Money::from_cents(1000), &roster, 1).unwrap();

        assert_eq!(result.shares.fraction, dec("1"));
        assert_eq!(result.shares.discrepancy_units, 0);
        assert_eq!(amounts(&result.shares), vec![500, 500]);
    }

    #[test]
    fn test_over_distribution_removes_nickel_in_roster_order() {
        // 10.00 / 3 = 3.333..., rounds to 3.35 each (10.05), one nickel too many.
        let roster = roster(&[("Alice", "1"), ("Bob", "1"), ("Carol", "1")]);
        let result = allocate_tips(Money::from_cents(1000), &roster, 1).unwrap();

        assert_eq!(result.shares.discrepancy_units, 1);
        assert_eq!(amounts(&result.shares), vec![330, 335, 335]);
        assert_eq!(result.shares.shares()[0].adjustment, -1);
        assert_eq!(result.shares.total(), Money::from_cents(1000));
    }

    #[test]
    fn test_under_distribution_adds_nickel_to_most_shortchanged() {
        // 0.20 over 3 hours: raw 0.0667 each rounds to 0.05 each (0.15), one short.
        // Bob worked slightly more so he lost the most to rounding.
        let roster = roster(&[("Alice", "1"), ("Bob", "1.1"), ("Carol", "0.9")]);
        let result = allocate_tips(Money::from_cents(20), &roster, 1).unwrap();

        assert_eq!(result.shares.discrepancy_units, -1);
        assert_eq!(amounts(&result.shares), vec![5, 10, 5]);
        assert_eq!(result.shares.shares()[1].adjustment, 1);
    }

    #[test]
    fn test_tied_errors_adjust_exactly_k_recipients() {
        // 0.10 over four equal hours: 0.025 each rounds half-to-even to 0.00,
        // two nickels short with a four-way tie.
        let roster = roster(&[("A", "1"), ("B", "1"), ("C", "1"), ("D", "1")]);
        let result = allocate_tips(Money::from_cents(10), &roster, 1).unwrap();

        assert_eq!(result.shares.discrepancy_units, -2);
        assert_eq!(amounts(&result.shares), vec![5, 5, 0, 0]);
    }

    #[test]
    fn test_banker_rounding_on_exact_half() {
        // 0.15 split 1:1 is 0.075 each = 1.5 nickels, rounds to 2 nickels each.
        let roster = roster(&[("Alice", "1"), ("Bob", "1")]);
        let result = allocate_tips(Money::from_cents(15), &roster, 1).unwrap();

        assert_eq!(result.shares.discrepancy_units, 1);
        assert_eq!(amounts(&result.shares), vec![5, 10]);
    }

    #[test]
    fn test_pool_not_in_nickels_is_rejected() {
        let roster = roster(&[("Alice", "1"), ("Bob", "1"), ("Carol", "1")]);
        let result = allocate_tips(Money::from_cents(1003), &roster, 1);

        match result {
            Err(EngineError::UnalignedPool { cents }) => assert_eq!(cents, 1003),
            other => panic!("Expected UnalignedPool, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        let roster = Roster::new(vec![]).unwrap();
        let result = allocate_tips(Money::from_cents(1000), &roster, 1);
        assert!(matches!(result, Err(EngineError::EmptyRoster { .. })));
    }

    #[test]
    fn test_zero_total_hours_is_rejected() {
        let roster = roster(&[("Alice", "0"), ("Bob", "0")]);
        let result = allocate_tips(Money::from_cents(1000), &roster, 1);
        assert!(matches!(result, Err(EngineError::EmptyRoster { .. })));
    }

    #[test]
    fn test_zero_hour_recipient_gets_nothing() {
        let roster = roster(&[("Alice", "4"), ("Bob", "0"), ("Carol", "2")]);
        let result = allocate_tips(Money::from_cents(1230), &roster, 1).unwrap();

        assert_eq!(result.shares.amount_for("Bob"), Some(Money::ZERO));
        assert_eq!(result.shares.total(), Money::from_cents(1230));
    }

    #[test]
    fn test_hours_at_limit_share_a_large_pool_exactly() {
        let hours = Decimal::from(crate::models::MAX_HOURS).to_string();
        let roster = roster(&[("Alice", hours.as_str()), ("Bob", hours.as_str()), ("Carol", "0.01")]);
        let pool = Money::from_cents(1_000_000_000_005);
        let result = allocate_tips(pool, &roster, 1).unwrap();

        assert_eq!(result.shares.total(), pool);
        assert!(result.shares.iter().all(|s| s.amount.is_nickel_multiple()));
    }

    #[test]
    fn test_audit_step_records_discrepancy() {
        let roster = roster(&[("Alice", "1"), ("Bob", "1"), ("Carol", "1")]);
        let result = allocate_tips(Money::from_cents(1000), &roster, 3).unwrap();

        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.rule_id, "tip_allocation");
        assert_eq!(result.audit_step.output["discrepancy_units"], 1);
        assert_eq!(result.audit_step.input["pool_cents"], 1000);
    }
}
