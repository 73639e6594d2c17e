//! Output formatting for lint results.
//!
//! Two formats: pretty colored terminal output for humans, and JSON for
//! programmatic consumption.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::rules::Violation;

/// All violations found in one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Render reports as colored human-readable text.
pub fn render_pretty(reports: &[FileReport]) -> String {
    let mut out = String::new();
    let mut total = 0usize;

    for report in reports {
        if report.is_clean() {
            continue;
        }
        total += report.violations.len();
        out.push_str(&format!("{}\n", report.file.bold()));
        for v in &report.violations {
            out.push_str(&format!(
                "  {}:{} {} {}\n",
                report.file,
                v.line,
                v.rule.as_str().red(),
                v.message
            ));
        }
        out.push('\n');
    }

    if total == 0 {
        out.push_str(&format!("{}\n", "No mutation violations found".green()));
    } else {
        let files = reports.iter().filter(|r| !r.is_clean()).count();
        out.push_str(&format!(
            "{}\n",
            format!("{} violation(s) in {} file(s)", total, files).red()
        ));
    }

    out
}

/// Render reports as pretty-printed JSON.
pub fn render_json(reports: &[FileReport]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleKind;

    fn sample() -> Vec<FileReport> {
        vec![
            FileReport {
                file: "clean.js".into(),
                violations: vec![],
            },
            FileReport {
                file: "dirty.js".into(),
                violations: vec![Violation {
                    rule: RuleKind::Reassignment,
                    message: "Reassignment is disallowed".into(),
                    line: 3,
                }],
            },
        ]
    }

    #[test]
    fn pretty_output_counts_only_dirty_files() {
        colored::control::set_override(false);
        let text = render_pretty(&sample());
        assert!(text.contains("dirty.js:3"));
        assert!(!text.contains("clean.js:"));
        assert!(text.contains("1 violation(s) in 1 file(s)"));
    }

    #[test]
    fn pretty_output_reports_clean_run() {
        colored::control::set_override(false);
        let text = render_pretty(&[]);
        assert!(text.contains("No mutation violations found"));
    }

    #[test]
    fn json_output_round_trips() {
        let json = render_json(&sample()).unwrap();
        let parsed: Vec<FileReport> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].violations[0].rule, RuleKind::Reassignment);
        assert_eq!(parsed[1].violations[0].line, 3);
    }
}
