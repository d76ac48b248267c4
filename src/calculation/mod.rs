//! Calculation logic for the tip engine.
//!
//! This module contains every stage of a tip run: tip allocation by hours
//! worked, drawer refinement, drawer coarsening, breadth-first distribution and
//! distribution correction, plus the [`TipRun`] orchestrator that chains them.
//!
//! The stages pass typed values along, so they can only run in order:
//! [`allocate_tips`] yields [`TipShares`](crate::models::TipShares),
//! [`refine_drawer`] yields a [`RefinedDrawer`], [`coarsen_drawer`] takes that
//! and yields a [`CoarsenedDrawer`], [`distribute`] yields a [`Distribution`]
//! and [`correct_distribution`] yields the final [`Payout`].

mod coarsen;
mod correction;
mod distribute;
mod pipeline;
mod refine;
mod tip_allocation;

pub use coarsen::{CoarsenResult, CoarsenedDrawer, EssentialCoins, coarsen_drawer};
pub use correction::{CorrectResult, Payout, correct_distribution};
pub use distribute::{
    DistributeResult, Distribution, DistributionStrategy, PayableDrawer, distribute,
    distribute_with,
};
pub use pipeline::TipRun;
pub use refine::{RefineResult, RefinedDrawer, refine_drawer};
pub use tip_allocation::{AllocationResult, allocate_tips};
