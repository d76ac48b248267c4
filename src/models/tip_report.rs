//! Tip report models.
//!
//! This module contains the [`TipReport`] type and its audit structures, which
//! capture everything a run produced: shares, per-recipient hand-outs, the
//! drawer before and after, and the stage-by-stage audit trace.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CashDrawer, DistributionRecord, DrawerDelta, Money, Period, TipShares};

/// A single step in the audit trace recording one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the stage, e.g. `"refine"`.
    pub rule_id: String,
    /// The human-readable name of the stage.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of what the stage did.
    pub reasoning: String,
}

/// A warning generated during a run.
///
/// Warnings indicate something worth a second look that did not stop the run,
/// such as recipients with zero hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a run.
///
/// # Example
///
/// ```
/// use tip_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// One step per pipeline stage, in execution order.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the run.
    pub warnings: Vec<AuditWarning>,
    /// The total run duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a tip run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The date printed on the report.
    pub report_date: NaiveDate,
    /// The period the tips were collected over.
    pub period: Period,
    /// Total hours worked by everyone.
    pub total_hours: Decimal,
    /// Value of the original drawer.
    pub pool: Money,
    /// Each recipient's share.
    pub shares: TipShares,
    /// What each recipient physically receives, in roster order.
    pub distribution: Vec<DistributionRecord>,
    /// The drawer as it was read.
    pub original_drawer: CashDrawer,
    /// The drawer after refining, coarsening and correction.
    pub final_drawer: CashDrawer,
    /// `original_drawer - final_drawer`: positive means break or exchange,
    /// negative means obtain.
    pub exchanges: DrawerDelta,
    /// Complete audit trace of the run.
    pub audit_trace: AuditTrace,
}

impl TipReport {
    /// Sum of what the distribution records hand out.
    pub fn distributed_total(&self) -> Money {
        self.distribution.iter().map(|r| r.paid()).sum()
    }
}
