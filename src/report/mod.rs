//! Report rendering and output.
//!
//! A [`TipReport`](crate::models::TipReport) is rendered as plain text for the
//! screen and the report file, or as JSON with the full audit trace.

mod format;
mod writer;

pub use format::{render_json, render_report};
pub use writer::{report_file_name, write_report};
