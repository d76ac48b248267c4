//! Plain-text report rendering.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Denomination, TipReport};

/// Renders a report as the plain text printed to screen and saved to file.
///
/// The header carries the report and period dates, total hours and total
/// tips. Each recipient gets a line with their amount followed by one line
/// per denomination they receive. The report ends with the bills and coins
/// that must be broken, exchanged or obtained to turn the original drawer into
/// the final one.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::TipRun;
/// use tip_engine::input::{parse_drawer_record, parse_roster_record};
/// use tip_engine::report::render_report;
/// use chrono::NaiveDate;
///
/// let drawer = parse_drawer_record("0\n1\n0\n0\n0\n0\n0\n0\n").unwrap();
/// let (period, roster) =
///     parse_roster_record("2026/10/5\n2026/10/18\nAlice\n5\nBob\n5\n").unwrap();
/// let report = TipRun::new(drawer, roster, period)
///     .report_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
///     .execute()
///     .unwrap();
///
/// let text = render_report(&report);
/// assert!(text.starts_with("TIP REPORT\n----------\n"));
/// assert!(text.contains("Alice gets 5.00 CAD in tips.\nFives: 1\n"));
/// assert!(text.contains("Number of tens to break: 1\n"));
/// assert!(text.contains("Number of fives to obtain: 2\n"));
/// ```
pub fn render_report(report: &TipReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report_text(&mut out, report);
    out
}

fn write_report_text(out: &mut String, report: &TipReport) -> std::fmt::Result {
    writeln!(out, "TIP REPORT")?;
    writeln!(out, "----------")?;
    writeln!(out)?;
    writeln!(out, "Report date: {}", spaced_date(report.report_date))?;
    writeln!(out, "Period start date: {}", spaced_date(report.period.start_date))?;
    writeln!(out, "Period end date: {}", spaced_date(report.period.end_date))?;
    writeln!(out)?;
    writeln!(out, "Total hours: {}", display_hours(report.total_hours))?;
    writeln!(out, "Total tips: {}", report.pool)?;
    writeln!(out)?;

    for record in &report.distribution {
        writeln!(out, "{} gets {} in tips.", record.name, record.share)?;
        for (denomination, count) in record.items() {
            writeln!(out, "{}: {}", denomination.label(), count)?;
        }
        writeln!(out)?;
    }

    for (denomination, delta) in report.exchanges.non_zero() {
        writeln!(
            out,
            "Number of {} to {}: {}",
            denomination.name(),
            exchange_verb(denomination, delta),
            delta.unsigned_abs()
        )?;
    }

    Ok(())
}

/// Wording for a change in drawer count: bills and dollar coins are broken,
/// small coins are exchanged, and anything the final drawer holds more of
/// must be obtained.
fn exchange_verb(denomination: Denomination, delta: i64) -> &'static str {
    if delta < 0 {
        "obtain"
    } else if denomination.is_dollar_or_more() {
        "break"
    } else {
        "exchange"
    }
}

/// `yyyy / m / d`, unpadded.
fn spaced_date(date: NaiveDate) -> String {
    format!("{} / {} / {}", date.year(), date.month(), date.day())
}

/// Hours to two places without trailing zeros.
fn display_hours(hours: Decimal) -> Decimal {
    hours.round_dp(2).normalize()
}

/// Serializes a report, audit trace included, as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`EngineError::Serialization`](crate::error::EngineError::Serialization)
/// if serialization fails.
pub fn render_json(report: &TipReport) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
