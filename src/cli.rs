//! Command handler functions for the undercov CLI.
//!
//! Handlers return their output as a `String`, making them easy to test
//! without capturing stdout.

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::ValueEnum;

use crate::config::{Limits, ReportOptions};
use crate::model::AnnotationBatch;
use crate::render::{
    BatchFormatter, GitHubFormatter, JsonFormatter, MarkdownFormatter, TextFormatter,
};
use crate::report::{self, ProcessOutcome};

/// Output style for rendered annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    Text,
    Markdown,
    Github,
    Json,
}

impl Style {
    fn formatter(self) -> &'static dyn BatchFormatter {
        match self {
            Style::Text => &TextFormatter,
            Style::Markdown => &MarkdownFormatter,
            Style::Github => &GitHubFormatter,
            Style::Json => &JsonFormatter,
        }
    }
}

/// Result of a `report` run.
#[derive(Debug)]
pub struct ReportRun {
    /// Rendered annotations.
    pub output: String,
    pub batch: AnnotationBatch,
    pub outcome: ProcessOutcome,
}

/// Process the report at `path` and render the resulting annotations.
pub fn cmd_report(
    path: &Path,
    options: &ReportOptions,
    limits: &Limits,
    style: Style,
) -> Result<ReportRun> {
    let mut batch = AnnotationBatch::new();
    let outcome = report::process(path, options, limits, &mut batch);
    let output = batch
        .format(style.formatter())
        .context("Failed to render annotations")?;
    Ok(ReportRun {
        output,
        batch,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    const FAILED: &str = "\
undercover: 👮 some methods have no test coverage! Please add specs for methods listed below
🚨 1) node `foo` type: instance method,
      loc: lib/a.rb:3:5, coverage: 0.0%
";

    fn write_report(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("undercover.txt");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_cmd_report_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, FAILED);
        let options = ReportOptions {
            in_line: true,
            ..Default::default()
        };

        let run = cmd_report(&path, &options, &Limits::default(), Style::Text).unwrap();

        assert!(run
            .output
            .contains("WARNING [lib/a.rb:3] Coverage reported 0 hits "));
        assert!(run.output.contains("loc: lib/a.rb:3:5, coverage: 0.0%"));
        assert!(run
            .output
            .contains("WARNING 1 reported issues with test coverage."));
        assert_eq!(run.batch.count(Severity::Warning), 2);
        assert!(matches!(run.outcome, ProcessOutcome::Inline(_)));
    }

    #[test]
    fn test_cmd_report_github_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let run = cmd_report(
            &path,
            &ReportOptions::default(),
            &Limits::default(),
            Style::Github,
        )
        .unwrap();

        assert_eq!(
            run.output,
            "::error::Undercover: coverage report cannot be found.\n"
        );
        assert!(run.batch.has_failures());
        assert_eq!(run.outcome, ProcessOutcome::MissingReport);
    }

    #[test]
    fn test_cmd_report_markdown_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "undercover: ✅ No coverage is missing in latest changes");

        let run = cmd_report(
            &path,
            &ReportOptions::default(),
            &Limits::default(),
            Style::Markdown,
        )
        .unwrap();

        assert!(run.output.contains("1 Messages"));
        assert!(run.output.contains("No coverage is missing"));
        assert!(!run.batch.has_failures());
        assert_eq!(run.outcome, ProcessOutcome::Clean);
    }

    #[test]
    fn test_cmd_report_json_danger() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, FAILED);
        let options = ReportOptions {
            report_danger: true,
            ..Default::default()
        };

        let run = cmd_report(&path, &options, &Limits::default(), Style::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&run.output).unwrap();
        assert_eq!(value["annotations"][0]["severity"], "failure");
        assert_eq!(value["annotations"][0]["sticky"], true);
        assert_eq!(run.outcome, ProcessOutcome::Consolidated(Severity::Failure));
    }
}
