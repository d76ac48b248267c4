//! Configuration types for a tip run.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from a YAML configuration file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default drawer record file name.
pub const DEFAULT_DRAWER_PATH: &str = "money.txt";

/// Default roster record file name.
pub const DEFAULT_ROSTER_PATH: &str = "roster.txt";

/// Where to read input records from and what to do with the report.
///
/// Every field is optional in the YAML file; missing fields take their
/// default.
///
/// # Example
///
/// ```
/// use tip_engine::config::TipConfig;
///
/// let config: TipConfig = serde_yaml::from_str("output_dir: reports\n").unwrap();
/// assert_eq!(config.output_dir.to_str(), Some("reports"));
/// assert_eq!(config.drawer_path.to_str(), Some("money.txt"));
/// assert!(config.apply_correction);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TipConfig {
    /// The drawer record: eight denomination counts, one per line.
    pub drawer_path: PathBuf,
    /// The roster record: period dates, then name and hours lines.
    pub roster_path: PathBuf,
    /// Directory the report file is written into.
    pub output_dir: PathBuf,
    /// Whether to re-batch surplus small coins after distribution.
    pub apply_correction: bool,
    /// Whether to write the report file as well as printing it.
    pub write_report: bool,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            drawer_path: PathBuf::from(DEFAULT_DRAWER_PATH),
            roster_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            output_dir: PathBuf::from("."),
            apply_correction: true,
            write_report: true,
        }
    }
}
