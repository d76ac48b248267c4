//! Distribution correction.
//!
//! Breadth-first distribution is fair but can leave someone with a pocketful
//! of small coins. The corrector re-batches each recipient's coins into larger
//! ones of the same value and settles the difference with the drawer.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, CashDrawer, Denomination, DistributionRecord};

use super::Distribution;
use super::distribute::distribution_json;

/// One same-value re-batching applied per recipient.
struct Rebatch {
    from: Denomination,
    /// A recipient holding more than this many is re-batched.
    keep_at_most: u32,
    batch: u32,
    to: Denomination,
    units_per_batch: u32,
}

/// Applied in order, so nickels paired into dimes can go on to become quarters.
const REBATCHES: [Rebatch; 3] = [
    Rebatch {
        from: Denomination::Nickel,
        keep_at_most: 1,
        batch: 2,
        to: Denomination::Dime,
        units_per_batch: 1,
    },
    Rebatch {
        from: Denomination::Dime,
        keep_at_most: 4,
        batch: 5,
        to: Denomination::Quarter,
        units_per_batch: 2,
    },
    Rebatch {
        from: Denomination::Quarter,
        keep_at_most: 3,
        batch: 4,
        to: Denomination::Loonie,
        units_per_batch: 1,
    },
];

/// The final hand-out after correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    /// Records in roster order.
    pub records: Vec<DistributionRecord>,
    /// The drawer the records add up to.
    pub drawer: CashDrawer,
}

impl Payout {
    /// Takes a distribution as final without correcting it.
    pub fn uncorrected(distribution: Distribution) -> Self {
        let (records, drawer) = distribution.into_parts();
        Self { records, drawer }
    }
}

/// The result of correcting a distribution.
#[derive(Debug, Clone)]
pub struct CorrectResult {
    /// The corrected hand-out.
    pub payout: Payout,
    /// The audit step recording this correction.
    pub audit_step: AuditStep,
}

/// Re-batches surplus small coins for each recipient.
///
/// For every recipient, in order: pairs of nickels become dimes when they hold
/// more than one nickel, every five dimes become two quarters when they hold
/// more than four dimes, and every four quarters become a loonie when they hold
/// more than three quarters. Each conversion keeps the recipient's total and
/// is mirrored in the drawer.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if the drawer does not hold the
/// coins a recipient is handing back.
pub fn correct_distribution(
    distribution: Distribution,
    step_number: u32,
) -> EngineResult<CorrectResult> {
    let (mut records, before) = distribution.into_parts();
    let mut drawer = before;
    let mut conversions = Vec::new();

    for record in records.iter_mut() {
        for rule in &REBATCHES {
            let held = record.count(rule.from);
            if held <= rule.keep_at_most {
                continue;
            }
            let batches = held / rule.batch;
            let units_out = batches * rule.batch;
            let units_in = batches * rule.units_per_batch;

            if !drawer.remove(rule.from, units_out) {
                return Err(EngineError::invariant(
                    "correct",
                    format!(
                        "drawer holds {} {} but '{}' is returning {}",
                        drawer.count(rule.from),
                        rule.from,
                        record.name,
                        units_out
                    ),
                ));
            }
            drawer.add(rule.to, units_in);
            record.swap(rule.from, units_out, rule.to, units_in);

            debug!(
                recipient = %record.name,
                from = %rule.from,
                units_out,
                to = %rule.to,
                units_in,
                "Re-batched coins"
            );
            conversions.push(serde_json::json!({
                "name": record.name,
                "from": rule.from.name(),
                "units_out": units_out,
                "to": rule.to.name(),
                "units_in": units_in
            }));
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "correct".to_string(),
        rule_name: "Distribution Correction".to_string(),
        input: serde_json::json!({
            "drawer": before.counts()
        }),
        output: serde_json::json!({
            "drawer": drawer.counts(),
            "conversions": conversions,
            "records": distribution_json(&records)
        }),
        reasoning: if conversions.is_empty() {
            "No recipient held surplus small coins".to_string()
        } else {
            format!("Applied {} coin re-batching(s)", conversions.len())
        },
    };

    Ok(CorrectResult {
        payout: Payout { records, drawer },
        audit_step,
    })
}
