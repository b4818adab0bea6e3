use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ContractResult;
use crate::results::{RunReport, CLASSIFICATION_KNOWN_ANOMALY};

pub fn write_report(results_dir: &Path, report: &RunReport) -> ContractResult<PathBuf> {
    let out_dir = results_dir.join(&report.context.label);
    fs::create_dir_all(&out_dir)?;
    let out_file = out_dir.join(format!("{}.json", report.context.target));
    fs::write(&out_file, serde_json::to_vec_pretty(report)?)?;
    Ok(out_file)
}

/// One line per case plus a totals line; failing lines carry the literal
/// expected and actual values.
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    for case in &report.cases {
        let verdict = if case.success {
            "PASS"
        } else if case.classification == CLASSIFICATION_KNOWN_ANOMALY {
            "ANOMALY"
        } else {
            "FAIL"
        };
        let status = case
            .status
            .map_or_else(|| "---".to_string(), |status| status.to_string());
        let _ = write!(out, "{verdict:<7} {status} {}/{}", case.target, case.case);
        if let Some(failure) = &case.failure {
            let _ = write!(out, ": {}", failure.message);
            if let (Some(expected), Some(actual)) = (&failure.expected, &failure.actual) {
                let _ = write!(out, " (expected {expected:?}, actual {actual:?})");
            }
        }
        out.push('\n');
        for note in &case.notes {
            let _ = writeln!(out, "        note: {note}");
        }
    }

    let failed = report.failed_count();
    let _ = write!(
        out,
        "{} passed, {failed} failed, {} total",
        report.cases.len() - failed,
        report.cases.len()
    );
    if let Some(latency) = &report.latency {
        let _ = write!(
            out,
            " (latency ms: min {:.1}, median {:.1}, max {:.1})",
            latency.min_ms, latency.median_ms, latency.max_ms
        );
    }
    out.push('\n');
    out
}
