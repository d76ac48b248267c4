//! Core data models for the tip engine.
//!
//! This module contains all the domain models used throughout the engine.

mod denomination;
mod distribution;
mod drawer;
mod money;
mod period;
mod recipient;
mod share;
mod tip_report;

pub use denomination::{DENOMINATION_COUNT, Denomination, ROLL_RULES, RollRule};
pub use distribution::DistributionRecord;
pub use drawer::{CashDrawer, DrawerDelta, MAX_UNIT_COUNT};
pub use money::{Money, NICKEL_CENTS};
pub use period::Period;
pub use recipient::{MAX_HOURS, Recipient, Roster};
pub use share::{TipShare, TipShares};
pub use tip_report::{AuditStep, AuditTrace, AuditWarning, TipReport};
