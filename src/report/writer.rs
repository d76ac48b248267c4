//! Report file output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::TipReport;

use super::render_report;

const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// File name encoding the report date and both period dates.
///
/// # Examples
///
/// ```
/// use tip_engine::calculation::TipRun;
/// use tip_engine::input::{parse_drawer_record, parse_roster_record};
/// use tip_engine::report::report_file_name;
/// use chrono::NaiveDate;
///
/// let drawer = parse_drawer_record("0\n0\n1\n0\n0\n0\n0\n0\n").unwrap();
/// let (period, roster) = parse_roster_record("2026/9/28\n2026/10/11\nAlice\n8\n").unwrap();
/// let report = TipRun::new(drawer, roster, period)
///     .report_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
///     .execute()
///     .unwrap();
///
/// assert_eq!(report_file_name(&report), "Report_20261019_20260928_20261011.txt");
/// ```
pub fn report_file_name(report: &TipReport) -> String {
    format!(
        "Report_{}_{}_{}.txt",
        report.report_date.format(FILE_DATE_FORMAT),
        report.period.start_date.format(FILE_DATE_FORMAT),
        report.period.end_date.format(FILE_DATE_FORMAT)
    )
}

/// Writes the rendered report into `dir`, creating the directory if needed.
///
/// Returns the path written. An existing report for the same dates is
/// overwritten.
///
/// # Errors
///
/// Returns [`EngineError::ReportWrite`] if the directory cannot be created or
/// the file cannot be written.
pub fn write_report<P: AsRef<Path>>(dir: P, report: &TipReport) -> EngineResult<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(report_file_name(report));

    fs::create_dir_all(dir).map_err(|e| EngineError::ReportWrite {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    fs::write(&path, render_report(report)).map_err(|e| EngineError::ReportWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    info!(run_id = %report.run_id, path = %path.display(), "Report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::TipRun;
    use crate::models::{CashDrawer, Period, Recipient, Roster};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_report() -> TipReport {
        let roster = Roster::new(vec![
            Recipient::new("Alice", Decimal::from(3)),
            Recipient::new("Bob", Decimal::from(1)),
        ])
        .unwrap();
        let period = Period {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
        };
        TipRun::new(CashDrawer::new([1, 0, 0, 0, 0, 0, 0, 0]), roster, period)
            .report_date(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap())
            .execute()
            .unwrap()
    }

    #[test]
    fn test_file_name_pads_dates() {
        assert_eq!(
            report_file_name(&sample_report()),
            "Report_20260120_20260105_20260118.txt"
        );
    }

    #[test]
    fn test_write_report_creates_file_with_rendered_text() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let path = write_report(dir.path(), &report).unwrap();
        assert_eq!(path, dir.path().join("Report_20260120_20260105_20260118.txt"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&report));
        assert!(written.contains("Alice gets 15.00 CAD in tips."));
    }

    #[test]
    fn test_write_report_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2026");

        let path = write_report(&nested, &sample_report()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_destination_returns_report_write() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be.
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let result = write_report(&blocker, &sample_report());
        assert!(matches!(result, Err(EngineError::ReportWrite { .. })));
    }
}
