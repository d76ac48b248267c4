//! The tip run orchestrator.
//!
//! A [`TipRun`] drives a drawer and roster through allocation, refinement,
//! coarsening, distribution and correction, and collects every stage's audit
//! step into a [`TipReport`].

use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, AuditWarning, CashDrawer, Period, Roster, TipReport, TipShares};

use super::{
    CoarsenedDrawer, DistributeResult, DistributionStrategy, Payout, PayableDrawer, RefinedDrawer,
    allocate_tips, coarsen_drawer, correct_distribution, distribute_with, refine_drawer,
};

/// A single tip run over one drawer and one roster.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::TipRun;
/// use tip_engine::models::{CashDrawer, Denomination, Period, Recipient, Roster};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let drawer = CashDrawer::new([0, 0, 2, 0, 0, 0, 0, 0]);
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(5)),
///     Recipient::new("Bob", Decimal::from(5)),
/// ])
/// .unwrap();
/// let period = Period {
///     start_date: NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
/// };
///
/// let report = TipRun::new(drawer, roster, period)
///     .report_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
///     .execute()
///     .unwrap();
///
/// assert_eq!(report.distributed_total(), report.pool);
/// assert_eq!(report.distribution[0].count(Denomination::Five), 1);
/// assert!(report.exchanges.is_zero());
/// ```
#[derive(Debug, Clone)]
pub struct TipRun {
    drawer: CashDrawer,
    roster: Roster,
    period: Period,
    report_date: NaiveDate,
    apply_correction: bool,
}

impl TipRun {
    /// Creates a run dated today in local time, with correction enabled.
    pub fn new(drawer: CashDrawer, roster: Roster, period: Period) -> Self {
        Self {
            drawer,
            roster,
            period,
            report_date: Local::now().date_naive(),
            apply_correction: true,
        }
    }

    /// Sets the date printed on the report.
    pub fn report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = date;
        self
    }

    /// Enables or disables the distribution correction pass.
    pub fn apply_correction(mut self, apply: bool) -> Self {
        self.apply_correction = apply;
        self
    }

    /// Runs every stage and builds the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot share the pool (see
    /// [`allocate_tips`]) or a stage breaks one of the pipeline invariants.
    pub fn execute(&self) -> EngineResult<TipReport> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let mut audit_steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<AuditWarning> = Vec::new();
        let mut step_number: u32 = 1;

        info!(
            run_id = %run_id,
            recipients = self.roster.len(),
            pool = %self.drawer.total(),
            "Starting tip run"
        );

        for recipient in self.roster.iter().filter(|r| r.hours.is_zero()) {
            warn!(recipient = %recipient.name, "Recipient has no hours");
            warnings.push(AuditWarning {
                code: "ZERO_HOURS".to_string(),
                message: format!("{} worked no hours and receives nothing", recipient.name),
                severity: "low".to_string(),
            });
        }

        let allocation = allocate_tips(self.drawer.total(), &self.roster, step_number)?;
        let shares = allocation.shares;
        audit_steps.push(allocation.audit_step);
        step_number += 1;
        info!(
            run_id = %run_id,
            fraction = %shares.fraction,
            discrepancy_units = shares.discrepancy_units,
            "Allocated tip shares"
        );

        let refine_result = refine_drawer(self.drawer, &shares, step_number)?;
        let refined = refine_result.drawer;
        audit_steps.push(refine_result.audit_step);
        step_number += 1;
        info!(run_id = %run_id, drawer = ?refined.drawer().counts(), "Refined drawer");

        let coarsen_result = coarsen_drawer(refined, &shares, step_number);
        let coarsened = coarsen_result.drawer;
        audit_steps.push(coarsen_result.audit_step);
        step_number += 1;
        info!(run_id = %run_id, drawer = ?coarsened.drawer().counts(), "Coarsened drawer");

        let distribute_result =
            distribute_with_fallback(refined, coarsened, &shares, step_number, &mut warnings)?;
        let strategy = distribute_result.distribution.strategy();
        audit_steps.push(distribute_result.audit_step);
        step_number += 1;
        info!(run_id = %run_id, strategy = strategy.as_str(), "Distributed drawer");

        let payout = if self.apply_correction {
            let correct_result = correct_distribution(distribute_result.distribution, step_number)?;
            audit_steps.push(correct_result.audit_step);
            info!(run_id = %run_id, "Corrected distribution");
            correct_result.payout
        } else {
            Payout::uncorrected(distribute_result.distribution)
        };

        let Payout { records, drawer } = payout;
        if drawer.total() != self.drawer.total() {
            return Err(EngineError::invariant(
                "pipeline",
                format!(
                    "final drawer holds {} but the pool was {}",
                    drawer.total(),
                    self.drawer.total()
                ),
            ));
        }

        let exchanges = self.drawer.compare(&drawer);
        let duration_us = start_time.elapsed().as_micros() as u64;

        info!(
            run_id = %run_id,
            pool = %shares.pool,
            exchanges = exchanges.non_zero().count(),
            duration_us,
            "Tip run completed successfully"
        );

        Ok(TipReport {
            run_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            report_date: self.report_date,
            period: self.period,
            total_hours: self.roster.total_hours(),
            pool: shares.pool,
            shares,
            distribution: records,
            original_drawer: self.drawer,
            final_drawer: drawer,
            exchanges,
            audit_trace: AuditTrace {
                steps: audit_steps,
                warnings,
                duration_us,
            },
        })
    }
}

/// Which drawer a distribution attempt hands out.
#[derive(Debug, Clone, Copy)]
enum Source {
    Coarsened,
    Refined,
}

/// Tried in order after the breadth-first hand-out of the coarsened drawer.
const FALLBACKS: [(Source, DistributionStrategy); 3] = [
    (Source::Coarsened, DistributionStrategy::DepthFirst),
    (Source::Refined, DistributionStrategy::BreadthFirst),
    (Source::Refined, DistributionStrategy::DepthFirst),
];

/// Distributes the coarsened drawer, falling back to a depth-first hand-out
/// and then to the refined drawer when units get stranded.
///
/// The last attempt reproduces the refiner's own apportionment, so it only
/// fails if refinement itself is broken.
fn distribute_with_fallback(
    refined: RefinedDrawer,
    coarsened: CoarsenedDrawer,
    shares: &TipShares,
    step_number: u32,
    warnings: &mut Vec<AuditWarning>,
) -> EngineResult<DistributeResult> {
    let mut last_error =
        match distribute_with(&coarsened, shares, DistributionStrategy::BreadthFirst, step_number) {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };

    for (source, strategy) in FALLBACKS {
        let stage = match source {
            Source::Coarsened => coarsened.stage(),
            Source::Refined => refined.stage(),
        };
        warn!(
            error = %last_error,
            retry_stage = stage,
            retry_strategy = strategy.as_str(),
            "Distribution failed, retrying"
        );
        warnings.push(AuditWarning {
            code: "DISTRIBUTION_FALLBACK".to_string(),
            message: format!(
                "{}; retrying {} over the {} drawer",
                last_error,
                strategy.as_str().replace('_', " "),
                stage
            ),
            severity: "medium".to_string(),
        });

        let result = match source {
            Source::Coarsened => distribute_with(&coarsened, shares, strategy, step_number),
            Source::Refined => distribute_with(&refined, shares, strategy, step_number),
        };
        match result {
            Ok(result) => return Ok(result),
            Err(err) => last_error = err,
        }
    }

    Err(last_error)
}
