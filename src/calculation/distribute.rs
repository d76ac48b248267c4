//! Physical distribution of the drawer.
//!
//! Bills and coins are handed out one denomination at a time, largest first,
//! going round the roster one unit per recipient per pass. Spreading each
//! denomination across everyone keeps the first recipient from walking away
//! with all the fives.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, CashDrawer, Denomination, DistributionRecord, TipShares};

use super::{CoarsenedDrawer, RefinedDrawer};

mod private {
    pub trait Sealed {}
}

/// A drawer that has been through the pipeline far enough to be handed out.
///
/// Implemented only by [`RefinedDrawer`] and [`CoarsenedDrawer`], so a drawer
/// straight from input can never be distributed.
pub trait PayableDrawer: private::Sealed {
    /// The drawer contents.
    fn contents(&self) -> CashDrawer;

    /// Name of the stage that produced the drawer.
    fn stage(&self) -> &'static str;
}

impl private::Sealed for RefinedDrawer {}
impl private::Sealed for CoarsenedDrawer {}

impl PayableDrawer for RefinedDrawer {
    fn contents(&self) -> CashDrawer {
        *self.drawer()
    }

    fn stage(&self) -> &'static str {
        "refined"
    }
}

impl PayableDrawer for CoarsenedDrawer {
    fn contents(&self) -> CashDrawer {
        *self.drawer()
    }

    fn stage(&self) -> &'static str {
        "coarsened"
    }
}

/// How units of one denomination are spread over the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStrategy {
    /// One unit per recipient per pass, round the roster until the
    /// denomination runs out.
    BreadthFirst,
    /// Each recipient in turn takes as many units as fit in what they are
    /// owed. Always succeeds on a freshly refined drawer.
    DepthFirst,
}

impl DistributionStrategy {
    /// Identifier used in audit steps and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            DistributionStrategy::BreadthFirst => "breadth_first",
            DistributionStrategy::DepthFirst => "depth_first",
        }
    }
}

/// Bills and coins handed to each recipient, plus the drawer they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    records: Vec<DistributionRecord>,
    drawer: CashDrawer,
    strategy: DistributionStrategy,
}

impl Distribution {
    /// Records in roster order.
    pub fn records(&self) -> &[DistributionRecord] {
        &self.records
    }

    /// The working drawer the records were paid from.
    pub fn drawer(&self) -> &CashDrawer {
        &self.drawer
    }

    /// The strategy that produced the records.
    pub fn strategy(&self) -> DistributionStrategy {
        self.strategy
    }

    /// Splits into records and drawer.
    pub fn into_parts(self) -> (Vec<DistributionRecord>, CashDrawer) {
        (self.records, self.drawer)
    }
}

/// The result of distributing a drawer.
#[derive(Debug, Clone)]
pub struct DistributeResult {
    /// The per-recipient hand-out.
    pub distribution: Distribution,
    /// The audit step recording this distribution.
    pub audit_step: AuditStep,
}

/// Hands out the drawer breadth first so each recipient receives exactly
/// their share.
///
/// For each denomination, largest first, the roster is walked repeatedly in
/// order and every recipient still owed at least one unit receives one, until
/// the denomination runs out.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if units are left that nobody
/// can take or a recipient ends up short.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::{allocate_tips, coarsen_drawer, distribute, refine_drawer};
/// use tip_engine::models::{CashDrawer, Denomination, Recipient, Roster};
/// use rust_decimal::Decimal;
///
/// let drawer = CashDrawer::new([0, 0, 2, 0, 0, 0, 0, 0]);
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(5)),
///     Recipient::new("Bob", Decimal::from(5)),
/// ])
/// .unwrap();
/// let shares = allocate_tips(drawer.total(), &roster, 1).unwrap().shares;
/// let refined = refine_drawer(drawer, &shares, 2).unwrap().drawer;
/// let coarsened = coarsen_drawer(refined, &shares, 3).drawer;
///
/// let result = distribute(&coarsened, &shares, 4).unwrap();
/// for record in result.distribution.records() {
///     assert_eq!(record.count(Denomination::Five), 1);
///     assert!(record.is_complete());
/// }
/// ```
pub fn distribute<P: PayableDrawer>(
    drawer: &P,
    shares: &TipShares,
    step_number: u32,
) -> EngineResult<DistributeResult> {
    distribute_with(drawer, shares, DistributionStrategy::BreadthFirst, step_number)
}

/// Hands out the drawer using the given strategy.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if units are left that nobody
/// can take or a recipient ends up short.
pub fn distribute_with<P: PayableDrawer>(
    drawer: &P,
    shares: &TipShares,
    strategy: DistributionStrategy,
    step_number: u32,
) -> EngineResult<DistributeResult> {
    let contents = drawer.contents();
    let mut records: Vec<DistributionRecord> = shares
        .iter()
        .map(|s| DistributionRecord::new(s.name.clone(), s.amount))
        .collect();

    for denomination in Denomination::ALL {
        let available = contents.count(denomination);
        let loot = match strategy {
            DistributionStrategy::BreadthFirst => {
                hand_out_breadth_first(&mut records, denomination, available)
            }
            DistributionStrategy::DepthFirst => {
                hand_out_depth_first(&mut records, denomination, available)
            }
        };

        if loot > 0 {
            return Err(EngineError::invariant(
                "distribute",
                format!(
                    "{} {} left in the {} drawer that no recipient can take",
                    loot,
                    denomination,
                    drawer.stage()
                ),
            ));
        }
    }

    if let Some(short) = records.iter().find(|r| !r.is_complete()) {
        return Err(EngineError::invariant(
            "distribute",
            format!(
                "'{}' received {} of a {} share",
                short.name,
                short.paid(),
                short.share
            ),
        ));
    }

    for record in &records {
        debug!(
            recipient = %record.name,
            paid = %record.paid(),
            strategy = strategy.as_str(),
            "Distribution complete"
        );
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "distribute".to_string(),
        rule_name: "Distribution".to_string(),
        input: serde_json::json!({
            "drawer": contents.counts(),
            "drawer_stage": drawer.stage(),
            "strategy": strategy.as_str(),
            "recipients": records.len()
        }),
        output: distribution_json(&records),
        reasoning: format!(
            "Handed out {} from the {} drawer {} across {} recipient(s)",
            contents.total(),
            drawer.stage(),
            strategy.as_str().replace('_', " "),
            records.len()
        ),
    };

    Ok(DistributeResult {
        distribution: Distribution {
            records,
            drawer: contents,
            strategy,
        },
        audit_step,
    })
}

/// One unit per recipient per pass. Returns the units nobody could take.
fn hand_out_breadth_first(
    records: &mut [DistributionRecord],
    denomination: Denomination,
    mut loot: u32,
) -> u32 {
    while loot > 0 {
        let mut handed_out = false;
        for record in records.iter_mut() {
            if loot == 0 {
                break;
            }
            if record.owed() >= denomination.value() {
                record.give(denomination);
                loot -= 1;
                handed_out = true;
            }
        }
        if !handed_out {
            break;
        }
    }
    loot
}

/// Each recipient takes all the units that fit. Returns the units nobody could take.
fn hand_out_depth_first(
    records: &mut [DistributionRecord],
    denomination: Denomination,
    mut loot: u32,
) -> u32 {
    for record in records.iter_mut() {
        while loot > 0 && record.owed() >= denomination.value() {
            record.give(denomination);
            loot -= 1;
        }
    }
    loot
}

/// Builds a `Distribution` directly, for the corrector's tests.
#[cfg(test)]
pub(crate) fn distribution_from_parts(
    records: Vec<DistributionRecord>,
    drawer: CashDrawer,
) -> Distribution {
    Distribution {
        records,
        drawer,
        strategy: DistributionStrategy::BreadthFirst,
    }
}

/// JSON summary of the records for audit steps.
pub(crate) fn distribution_json(records: &[DistributionRecord]) -> serde_json::Value {
    serde_json::Value::Array(
        records
            .iter()
            .map(|r| {
                let items: serde_json::Map<String, serde_json::Value> = r
                    .items()
                    .map(|(d, n)| (d.name().to_string(), n.into()))
                    .collect();
                serde_json::json!({
                    "name": r.name,
                    "paid_cents": r.paid().cents(),
                    "items": items
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{CoarsenResult, allocate_tips, coarsen_drawer, refine_drawer};
    use crate::models::{Money, Recipient, Roster};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn stage(drawer: CashDrawer, hours: &[(&str, &str)]) -> (TipShares, RefinedDrawer, CoarsenResult) {
        let roster = Roster::new(
            hours
                .iter()
                .map(|(name, h)| Recipient::new(*name, dec(h)))
                .collect(),
        )
        .unwrap();
        let shares = allocate_tips(drawer.total(), &roster, 1).unwrap().shares;
        let refined = refine_drawer(drawer, &shares, 2).unwrap().drawer;
        let coarsened = coarsen_drawer(refined, &shares, 3);
        (shares, refined, coarsened)
    }

    fn run(drawer: CashDrawer, hours: &[(&str, &str)]) -> EngineResult<Distribution> {
        let (shares, _, coarsened) = stage(drawer, hours);
        distribute(&coarsened.drawer, &shares, 4).map(|r| r.distribution)
    }

    #[test]
    fn test_breadth_first_spreads_fives() {
        // 40.00 split evenly four ways: each gets two fives out of eight.
        let drawer = CashDrawer::new([0, 0, 8, 0, 0, 0, 0, 0]);
        let distribution =
            run(drawer, &[("A", "1"), ("B", "1"), ("C", "1"), ("D", "1")]).unwrap();

        for record in distribution.records() {
            assert_eq!(record.count(Denomination::Five), 2);
            assert_eq!(record.paid(), Money::from_cents(1000));
        }
        assert_eq!(distribution.strategy(), DistributionStrategy::BreadthFirst);
    }

    #[test]
    fn test_every_record_matches_its_share() {
        let drawer = CashDrawer::new([2, 3, 1, 4, 6, 19, 23, 17]);
        let distribution = run(
            drawer,
            &[("A", "12.5"), ("B", "7"), ("C", "3.75"), ("D", "9.25")],
        )
        .unwrap();

        let total: Money = distribution.records().iter().map(|r| r.paid()).sum();
        assert_eq!(total, drawer.total());
        for record in distribution.records() {
            assert_eq!(record.counted_value(), record.share);
        }
        // D is owed 27.60 and ends up with the bulk of the small coins.
        let d = &distribution.records()[3];
        assert_eq!(d.share, Money::from_cents(2760));
        assert_eq!(d.count(Denomination::Nickel), 17);
    }

    #[test]
    fn test_records_keep_roster_order() {
        let drawer = CashDrawer::new([0, 1, 0, 0, 0, 0, 0, 0]);
        let distribution = run(drawer, &[("Zed", "1"), ("Amy", "1")]).unwrap();

        let names: Vec<&str> = distribution
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }

    #[test]
    fn test_stranded_units_are_an_invariant_violation() {
        // Shares 0.95, 0.95 and 0.50 from five quarters, eleven dimes and a
        // nickel: going round the roster leaves one dime nobody can take.
        let drawer = CashDrawer::new([0, 0, 0, 0, 1, 1, 11, 1]);
        let (shares, _, coarsened) = stage(drawer, &[("A", "9"), ("B", "9"), ("C", "5")]);
        assert_eq!(coarsened.drawer.drawer().count(Denomination::Quarter), 5);

        match distribute(&coarsened.drawer, &shares, 4) {
            Err(EngineError::InvariantViolation { stage, message }) => {
                assert_eq!(stage, "distribute");
                assert!(message.contains("dimes"), "message was: {}", message);
                assert!(message.contains("coarsened"), "message was: {}", message);
            }
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_first_pays_where_breadth_first_strands() {
        let drawer = CashDrawer::new([0, 0, 0, 0, 1, 1, 11, 1]);
        let (shares, _, coarsened) = stage(drawer, &[("A", "9"), ("B", "9"), ("C", "5")]);

        let result =
            distribute_with(&coarsened.drawer, &shares, DistributionStrategy::DepthFirst, 4)
                .unwrap();
        let records = result.distribution.records();
        assert_eq!(records[0].count(Denomination::Quarter), 3);
        assert_eq!(records[0].count(Denomination::Dime), 2);
        assert_eq!(records[1].count(Denomination::Quarter), 2);
        assert_eq!(records[1].count(Denomination::Dime), 4);
        assert_eq!(records[1].count(Denomination::Nickel), 1);
        assert_eq!(records[2].count(Denomination::Dime), 5);
        assert!(records.iter().all(|r| r.is_complete()));
        assert_eq!(result.audit_step.input["strategy"], "depth_first");
    }

    #[test]
    fn test_depth_first_on_refined_drawer_pays_exactly() {
        // Coarsening here rolls twenty nickels into a loonie, which strands it.
        let drawer = CashDrawer::new([0, 0, 0, 1, 0, 1, 3, 21]);
        let (shares, refined, coarsened) =
            stage(drawer, &[("A", "6"), ("B", "6"), ("C", "11")]);
        assert_eq!(coarsened.rolls[Denomination::Nickel.index()], 1);
        assert!(distribute(&coarsened.drawer, &shares, 4).is_err());

        let result =
            distribute_with(&refined, &shares, DistributionStrategy::DepthFirst, 4).unwrap();
        assert_eq!(result.distribution.drawer(), refined.drawer());
        assert_eq!(result.audit_step.input["drawer_stage"], "refined");
        for record in result.distribution.records() {
            assert_eq!(record.counted_value(), record.share);
        }
    }

    #[test]
    fn test_audit_step_lists_records() {
        let drawer = CashDrawer::new([0, 0, 2, 0, 0, 0, 0, 0]);
        let (shares, _, coarsened) = stage(drawer, &[("Alice", "5"), ("Bob", "5")]);

        let result = distribute(&coarsened.drawer, &shares, 4).unwrap();
        assert_eq!(result.audit_step.rule_id, "distribute");
        assert_eq!(result.audit_step.output[0]["name"], "Alice");
        assert_eq!(result.audit_step.output[0]["items"]["fives"], 1);
    }
}
