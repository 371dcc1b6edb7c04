//! Diagnostic report parsing
//!
//! `chezmoi doctor` prints a line-oriented table: a `RESULT CHECK MESSAGE`
//! header followed by one row per check. The parser is lossy on purpose:
//! lines that do not fit the three-column shape are dropped silently and
//! callers fall back to showing the raw text when nothing parsed.

use serde::{Deserialize, Serialize};

/// One parsed diagnostic row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRow {
    /// Check outcome, e.g. `ok`, `warning`, `error`
    pub result: String,
    /// Check identifier
    pub check: String,
    /// Free-text detail, internal whitespace preserved
    pub message: String,
}

/// Coarse severity of a row, used for display coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Check passed
    Ok,
    /// Non-fatal problem
    Warning,
    /// Failing check
    Error,
    /// Anything else (informational rows)
    Info,
}

impl DoctorRow {
    /// Map the result token onto a severity bucket.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.result.as_str() {
            "ok" => Severity::Ok,
            "warning" | "warn" => Severity::Warning,
            "error" | "err" => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// Parse a diagnostic report into rows, preserving source order.
///
/// Never errors: empty input, garbage lines, and a missing header all
/// degrade to fewer (or zero) rows.
#[must_use]
pub fn parse_doctor_report(output: &str) -> Vec<DoctorRow> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("RESULT"))
        .filter_map(parse_row)
        .collect()
}

/// First token = result, second token = check, remainder = message.
/// Lines without all three parts are dropped.
fn parse_row(line: &str) -> Option<DoctorRow> {
    let result_end = line.find(char::is_whitespace)?;
    let (result, rest) = line.split_at(result_end);
    let rest = rest.trim_start();

    let check_end = rest.find(char::is_whitespace)?;
    let (check, message) = rest.split_at(check_end);

    Some(DoctorRow {
        result: result.to_string(),
        check: check.to_string(),
        message: message.trim_start().to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_round_trip_with_header() {
        let report = "RESULT CHECK MESSAGE\nok check-a some message here\nwarn check-b another one\n";
        let rows = parse_doctor_report(report);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            DoctorRow {
                result: "ok".to_string(),
                check: "check-a".to_string(),
                message: "some message here".to_string(),
            }
        );
        assert_eq!(
            rows[1],
            DoctorRow {
                result: "warn".to_string(),
                check: "check-b".to_string(),
                message: "another one".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_input_yields_empty() {
        assert!(parse_doctor_report("garbled\n").is_empty());
        assert!(parse_doctor_report("").is_empty());
        assert!(parse_doctor_report("\n\n\n").is_empty());
        // Two tokens with no trailing separator is not a full row.
        assert!(parse_doctor_report("ok check-a").is_empty());
    }

    #[test]
    fn test_header_only_yields_empty() {
        assert!(parse_doctor_report("RESULT CHECK MESSAGE\n").is_empty());
    }

    #[test]
    fn test_internal_whitespace_preserved_in_message() {
        let rows = parse_doctor_report("ok version v2.52.0, commit abc  built  today\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "v2.52.0, commit abc  built  today");
    }

    #[test]
    fn test_mixed_garbage_keeps_good_rows_in_order() {
        let report = "RESULT CHECK MESSAGE\nok first one\ngarbled\nerror second two\n";
        let rows = parse_doctor_report(report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].check, "first");
        assert_eq!(rows[1].check, "second");
    }

    #[test]
    fn test_severity_buckets() {
        let row = |result: &str| DoctorRow {
            result: result.to_string(),
            check: "c".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(row("ok").severity(), Severity::Ok);
        assert_eq!(row("warning").severity(), Severity::Warning);
        assert_eq!(row("warn").severity(), Severity::Warning);
        assert_eq!(row("error").severity(), Severity::Error);
        assert_eq!(row("err").severity(), Severity::Error);
        assert_eq!(row("info").severity(), Severity::Info);
        assert_eq!(row("skipped").severity(), Severity::Info);
    }
}
