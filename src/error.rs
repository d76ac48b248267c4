//! Error types for the tip engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while reading records, allocating
//! tips and distributing the drawer.

use thiserror::Error;

use crate::models::Denomination;

/// Failure of a single drawer exchange.
///
/// An exchange that fails never mutates the drawer, so callers may log the
/// error and continue, or propagate it with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Source and target denomination are identical.
    #[error("Cannot exchange {denomination} for itself")]
    SameDenomination {
        /// The denomination given on both sides.
        denomination: Denomination,
    },

    /// A value does not name any denomination in the table.
    #[error("Unknown denomination: {value}")]
    UnknownDenomination {
        /// The value that was looked up.
        value: String,
    },

    /// More units were requested than the drawer holds.
    #[error("Cannot exchange {requested} of {denomination}: only {available} available")]
    Insufficient {
        /// The source denomination.
        denomination: Denomination,
        /// The number of units requested.
        requested: u32,
        /// The number of units in the drawer.
        available: u32,
    },

    /// An odd number of fives or quarters cannot become toonies or dimes.
    #[error("Cannot split an odd number ({count}) of {from} into {to}")]
    OddSplit {
        /// The source denomination.
        from: Denomination,
        /// The target denomination.
        to: Denomination,
        /// The odd unit count.
        count: u32,
    },

    /// The target count would no longer fit in the drawer.
    #[error("Exchanging {count} of {from} would overflow the count of {to}")]
    CountOverflow {
        /// The source denomination.
        from: Denomination,
        /// The target denomination.
        to: Denomination,
        /// The unit count requested.
        count: u32,
    },

    /// The value being exchanged is not a whole number of target units.
    #[error("{count} of {from} is not a whole number of {to}")]
    RatioNotIntegral {
        /// The source denomination.
        from: Denomination,
        /// The target denomination.
        to: Denomination,
        /// The unit count requested.
        count: u32,
    },
}

/// The main error type for the tip engine.
///
/// # Example
///
/// ```
/// use tip_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tips.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tips.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input record file could not be read.
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// The path that could not be read.
        path: String,
    },

    /// The drawer record is malformed.
    #[error("Drawer record line {line}: {message}")]
    DrawerRecord {
        /// The 1-based line number that failed.
        line: usize,
        /// A description of what was wrong.
        message: String,
    },

    /// The roster record is malformed.
    #[error("Roster record line {line}: {message}")]
    RosterRecord {
        /// The 1-based line number that failed.
        line: usize,
        /// A description of what was wrong.
        message: String,
    },

    /// A recipient cannot take part in the allocation.
    #[error("Invalid recipient '{name}': {message}")]
    InvalidRecipient {
        /// The recipient name.
        name: String,
        /// A description of what made the recipient invalid.
        message: String,
    },

    /// The roster has no recipients or no hours to share by.
    #[error("Roster cannot share a pool: {message}")]
    EmptyRoster {
        /// A description of the problem.
        message: String,
    },

    /// The pool cannot be paid in whole nickels.
    #[error("Pool of {cents} cents is not a whole number of nickels")]
    UnalignedPool {
        /// The pool value in cents.
        cents: i64,
    },

    /// The drawer holds more units of a denomination than the engine handles.
    #[error("Drawer holds {count} of {denomination}, more than the limit of {limit}")]
    OversizedDrawer {
        /// The denomination over the limit.
        denomination: Denomination,
        /// The count held.
        count: u32,
        /// The largest count allowed.
        limit: u32,
    },

    /// A drawer exchange failed and the caller chose to treat it as fatal.
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    /// A pipeline stage broke one of its guarantees.
    #[error("Invariant violated during {stage}: {message}")]
    InvariantViolation {
        /// The pipeline stage that detected the violation.
        stage: String,
        /// A description of the violation.
        message: String,
    },

    /// The report could not be written.
    #[error("Failed to write report '{path}': {message}")]
    ReportWrite {
        /// The destination path.
        path: String,
        /// A description of the I/O failure.
        message: String,
    },

    /// The report could not be serialized to JSON.
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Builds an [`EngineError::InvariantViolation`] for the given stage.
    pub fn invariant(stage: &str, message: impl Into<String>) -> Self {
        EngineError::InvariantViolation {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
