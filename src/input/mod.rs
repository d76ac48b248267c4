//! Input record parsing.
//!
//! The drawer and roster are read from plain-text records. Parse failures
//! carry the 1-based line number that failed.

mod drawer_record;
mod roster_record;

pub use drawer_record::{parse_drawer_record, read_drawer_record};
pub use roster_record::{ROSTER_DATE_FORMAT, parse_roster_record, read_roster_record};
