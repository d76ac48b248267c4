//! Roster record parsing.
//!
//! A roster record starts with the period start and end dates in
//! `yyyy/mm/dd` form, one per line, followed by alternating recipient name and
//! hours-worked lines. A blank line or the end of the text ends the roster.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_HOURS, Period, Recipient, Roster};

/// Date format of the period lines. Month and day may be unpadded.
pub const ROSTER_DATE_FORMAT: &str = "%Y/%m/%d";

/// Parses roster record text into the tip period and roster.
///
/// Hours are rounded to two decimal places.
///
/// # Errors
///
/// Returns [`EngineError::RosterRecord`] naming the 1-based line for a
/// missing or malformed date, an end date before the start date, a name with
/// no hours line, hours that are not a number between zero and
/// [`MAX_HOURS`], or a name that appears twice.
///
/// # Examples
///
/// ```
/// use tip_engine::input::parse_roster_record;
/// use rust_decimal::Decimal;
///
/// let (period, roster) =
///     parse_roster_record("2026/10/5\n2026/10/18\nAlice\n32.5\nBob\n20\n").unwrap();
///
/// assert_eq!(period.days(), 14);
/// assert_eq!(roster.len(), 2);
/// assert_eq!(roster.total_hours(), Decimal::new(525, 1));
/// ```
pub fn parse_roster_record(text: &str) -> EngineResult<(Period, Roster)> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let start_date = parse_date(lines.next(), 1, "start")?;
    let end_date = parse_date(lines.next(), 2, "end")?;
    if end_date < start_date {
        return Err(EngineError::RosterRecord {
            line: 2,
            message: format!("period ends ({}) before it starts ({})", end_date, start_date),
        });
    }

    let mut recipients: Vec<Recipient> = Vec::new();
    while let Some((name_line, raw_name)) = lines.next() {
        let name = raw_name.trim();
        if name.is_empty() {
            break;
        }
        if recipients.iter().any(|r| r.name == name) {
            return Err(EngineError::RosterRecord {
                line: name_line,
                message: format!("'{}' appears more than once", name),
            });
        }

        let (hours_line, raw_hours) = lines.next().ok_or_else(|| EngineError::RosterRecord {
            line: name_line + 1,
            message: format!("missing hours for '{}'", name),
        })?;
        let hours = parse_hours(raw_hours.trim(), hours_line, name)?;
        debug!(recipient = name, hours = %hours, "Parsed roster entry");
        recipients.push(Recipient::new(name, hours));
    }

    let period = Period {
        start_date,
        end_date,
    };
    Ok((period, Roster::new(recipients)?))
}

/// Reads and parses a roster record file.
///
/// # Errors
///
/// Returns [`EngineError::InputNotFound`] if the file cannot be read, or any
/// error from [`parse_roster_record`].
pub fn read_roster_record<P: AsRef<Path>>(path: P) -> EngineResult<(Period, Roster)> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|_| EngineError::InputNotFound {
        path: path.display().to_string(),
    })?;
    parse_roster_record(&text)
}

fn parse_date(entry: Option<(usize, &str)>, line: usize, which: &str) -> EngineResult<NaiveDate> {
    let (_, raw) = entry.ok_or_else(|| EngineError::RosterRecord {
        line,
        message: format!("missing period {} date", which),
    })?;
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, ROSTER_DATE_FORMAT).map_err(|e| EngineError::RosterRecord {
        line,
        message: format!("'{}' is not a valid period {} date (yyyy/mm/dd): {}", raw, which, e),
    })
}

fn parse_hours(raw: &str, line: usize, name: &str) -> EngineResult<Decimal> {
    let hours = Decimal::from_str(raw).map_err(|_| EngineError::RosterRecord {
        line,
        message: format!("'{}' is not a valid number of hours for '{}'", raw, name),
    })?;
    if hours < Decimal::ZERO {
        return Err(EngineError::RosterRecord {
            line,
            message: format!("'{}' has negative hours ({})", name, hours),
        });
    }
    if hours > Decimal::from(MAX_HOURS) {
        return Err(EngineError::RosterRecord {
            line,
            message: format!(
                "'{}' has {} hours, more than the {} hour limit",
                name, hours, MAX_HOURS
            ),
        });
    }
    Ok(hours.round_dp(2))
}
