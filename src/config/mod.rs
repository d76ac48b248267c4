//! Configuration loading for the tip engine.
//!
//! This module loads a tip run configuration from a YAML file: where the
//! drawer and roster records live, where the report goes, and whether the
//! correction pass runs.
//!
//! # Example
//!
//! ```no_run
//! use tip_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./tip-engine.yaml").unwrap();
//! println!("Reports go to {}", config.config().output_dir.display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_DRAWER_PATH, DEFAULT_ROSTER_PATH, TipConfig};
