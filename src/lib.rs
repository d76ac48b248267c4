//! Tip pool allocation and cash drawer distribution for Canadian currency.
//!
//! This crate splits a drawer of bills and coins among recipients in
//! proportion to hours worked. Shares are rounded to the nearest nickel and
//! corrected so they add up to the drawer exactly. The drawer is then refined,
//! coarsened and handed out so that every recipient physically receives their
//! exact share with as few small coins as practical.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod report;
