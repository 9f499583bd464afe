//! `syllabus check`: run the curriculum consistency checks and print the report.

use anyhow::{anyhow, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use syllabus_check::{validate_paths, ReportSummary, Severity, ValidationReport};

use crate::config::Settings;

pub const CHECK_REPORT_VERSION: &str = "check_report_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReportV1 {
    pub version: String,
    pub generated_at_unix_secs: u64,
    pub lessons_dir: String,
    pub registry: String,
    pub passed: bool,
    pub summary: ReportSummary,
    #[serde(flatten)]
    pub report: ValidationReport,
}

impl CheckReportV1 {
    pub fn new(settings: &Settings, report: ValidationReport) -> Self {
        Self {
            version: CHECK_REPORT_VERSION.to_string(),
            generated_at_unix_secs: now_unix_secs(),
            lessons_dir: settings.lessons_dir.display().to_string(),
            registry: settings.registry.display().to_string(),
            passed: report.passed(),
            summary: report.summary(),
            report,
        }
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn cmd_check(settings: &Settings, out: Option<&Path>, format: &str, no_fail: bool) -> Result<()> {
    let report = validate_paths(
        &settings.lessons_dir,
        &settings.registry,
        &settings.load,
        &settings.check,
    );
    let report = CheckReportV1::new(settings, report);

    let format = format.trim().to_ascii_lowercase();
    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&report)?,
        "text" => render_check_report_text(&report),
        other => return Err(anyhow!("unknown --format `{other}` (expected json|text)")),
    };

    match out {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => print!("{rendered}"),
    }

    let summary = report.summary;
    if report.passed {
        eprintln!(
            "{} {} warning(s), {} note(s)",
            "ok".green().bold(),
            summary.warning_count,
            summary.note_count
        );
    } else {
        eprintln!("{} {} error(s)", "failed".red().bold(), summary.error_count);
    }

    if !report.passed && !no_fail {
        return Err(anyhow!(
            "curriculum validation failed with {} error(s)",
            summary.error_count
        ));
    }
    Ok(())
}

/// Plain-text rendering: one `=== Section ===` block per non-empty section, then the verdict.
pub fn render_check_report_text(r: &CheckReportV1) -> String {
    let mut out = String::new();
    for (severity, title) in [
        (Severity::Error, "Errors"),
        (Severity::Warning, "Warnings"),
        (Severity::Note, "Notes"),
    ] {
        let findings = r.report.section(severity);
        if findings.is_empty() {
            continue;
        }
        out.push_str(&format!("\n=== {title} ===\n"));
        for f in findings {
            out.push_str(&format!("- {}\n", f.message));
        }
    }

    if r.passed {
        out.push_str("\nCurriculum validation completed.\n");
    } else {
        out.push_str(&format!(
            "\nCurriculum validation failed with {} error(s).\n",
            r.summary.error_count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use syllabus_check::{CheckOptions, Finding, FindingCode};
    use syllabus_ingest::LoadOptions;

    fn settings() -> Settings {
        Settings {
            lessons_dir: PathBuf::from("lessons"),
            registry: PathBuf::from("curriculum.json"),
            load: LoadOptions::default(),
            check: CheckOptions::default(),
        }
    }

    #[test]
    fn text_lists_sections_in_severity_order() {
        let report = ValidationReport {
            errors: vec![Finding::new(FindingCode::UnknownConcept, "bad")],
            warnings: Vec::new(),
            notes: vec![Finding::new(FindingCode::UnreusedConcept, "fyi")],
        };
        let text = render_check_report_text(&CheckReportV1::new(&settings(), report));
        assert_eq!(
            text,
            "\n=== Errors ===\n- bad\n\n=== Notes ===\n- fyi\n\nCurriculum validation failed with 1 error(s).\n"
        );
    }

    #[test]
    fn clean_report_only_prints_the_verdict() {
        let text = render_check_report_text(&CheckReportV1::new(
            &settings(),
            ValidationReport::default(),
        ));
        assert_eq!(text, "\nCurriculum validation completed.\n");
    }

    #[test]
    fn json_flattens_the_three_sections() {
        let report = CheckReportV1::new(&settings(), ValidationReport::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["version"], CHECK_REPORT_VERSION);
        assert_eq!(json["passed"], true);
        assert!(json["errors"].as_array().unwrap().is_empty());
        assert!(json["warnings"].is_array());
        assert!(json["notes"].is_array());
        assert_eq!(json["summary"]["error_count"], 0);
    }
}
