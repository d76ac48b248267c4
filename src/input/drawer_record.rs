//! Drawer record parsing.
//!
//! A drawer record is eight non-negative integers, one per line: twenties,
//! tens, fives, toonies, loonies, quarters, dimes, nickels.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{CashDrawer, DENOMINATION_COUNT, Denomination, MAX_UNIT_COUNT};

/// Parses drawer record text.
///
/// Each count may be surrounded by whitespace. Blank lines after the eighth
/// count are ignored; anything else after it is an error.
///
/// # Errors
///
/// Returns [`EngineError::DrawerRecord`] naming the 1-based line when a count
/// is missing, is not a non-negative integer, or is above [`MAX_UNIT_COUNT`].
///
/// # Examples
///
/// ```
/// use tip_engine::input::parse_drawer_record;
/// use tip_engine::models::Denomination;
///
/// let drawer = parse_drawer_record("1\n0\n2\n0\n3\n4\n0\n6\n").unwrap();
/// assert_eq!(drawer.count(Denomination::Five), 2);
/// assert_eq!(drawer.total().cents(), 20_00 + 10_00 + 3_00 + 1_00 + 30);
/// ```
pub fn parse_drawer_record(text: &str) -> EngineResult<CashDrawer> {
    let mut counts = [0u32; DENOMINATION_COUNT];
    let mut lines = text.lines();

    for (index, denomination) in Denomination::ALL.into_iter().enumerate() {
        let line = index + 1;
        let raw = lines.next().ok_or_else(|| EngineError::DrawerRecord {
            line,
            message: format!("missing count of {}", denomination),
        })?;
        let raw = raw.trim();
        let count = raw.parse::<u32>().map_err(|_| EngineError::DrawerRecord {
            line,
            message: format!("'{}' is not a valid count of {}", raw, denomination),
        })?;
        if count > MAX_UNIT_COUNT {
            return Err(EngineError::DrawerRecord {
                line,
                message: format!(
                    "{} {} is more than the limit of {}",
                    count, denomination, MAX_UNIT_COUNT
                ),
            });
        }
        counts[index] = count;
    }

    if let Some((offset, extra)) = lines
        .enumerate()
        .find(|(_, l)| !l.trim().is_empty())
    {
        return Err(EngineError::DrawerRecord {
            line: DENOMINATION_COUNT + offset + 1,
            message: format!("unexpected content after the nickel count: '{}'", extra.trim()),
        });
    }

    let drawer = CashDrawer::new(counts);
    debug!(counts = ?counts, total = %drawer.total(), "Parsed drawer record");
    Ok(drawer)
}

/// Reads and parses a drawer record file.
///
/// # Errors
///
/// Returns [`EngineError::InputNotFound`] if the file cannot be read, or any
/// error from [`parse_drawer_record`].
pub fn read_drawer_record<P: AsRef<Path>>(path: P) -> EngineResult<CashDrawer> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|_| EngineError::InputNotFound {
        path: path.display().to_string(),
    })?;
    parse_drawer_record(&text)
}
