//! Turning an undercover report into annotations.
//!
//! [`process`] validates the report, classifies it and then emits either a
//! single consolidated annotation or one annotation per `loc:` finding,
//! followed by a summary.

use std::borrow::Cow;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::artifact;
use crate::config::{Limits, ReportOptions, DEFAULT_PATH};
use crate::model::{CoverageFinding, ReportClassification, Severity};
use crate::parser::{self, LineParse};
use crate::sink::{Placement, ReportSink};

/// Phrase undercover prints when at least one method lacks coverage.
pub const GAPS_MARKER: &str = "some methods have no test coverage";

pub const REPORT_NOT_FOUND: &str = "Undercover: coverage report cannot be found.";

pub const TRUNCATION_SUFFIX: &str = " ... [Message Truncated]";

pub const FINDING_PREFIX: &str = "Coverage reported 0 hits ";

pub const CAP_REACHED_SUMMARY: &str = "The maximum number of in-line comments for 0 test coverage has been reached.\nFix the reported issues to see more.";

/// What [`process`] did with the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The report was absent, unreadable, or not a `.txt` file.
    MissingReport,
    /// No coverage gaps; the report was posted as a message.
    Clean,
    /// The whole report was posted as one annotation.
    Consolidated(Severity),
    /// Findings were posted one by one, followed by a summary.
    Inline(ScanOutcome),
}

/// How the inline scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every line was examined.
    Completed {
        reported: usize,
        malformed: Vec<String>,
    },
    /// The cap was hit; the remaining lines were not examined.
    Capped {
        reported: usize,
        malformed: Vec<String>,
    },
}

impl ScanOutcome {
    /// Number of findings that produced an annotation.
    #[must_use]
    pub fn reported(&self) -> usize {
        match self {
            ScanOutcome::Completed { reported, .. } | ScanOutcome::Capped { reported, .. } => {
                *reported
            }
        }
    }

    /// `loc:` lines that could not be parsed before the scan ended.
    #[must_use]
    pub fn malformed(&self) -> &[String] {
        match self {
            ScanOutcome::Completed { malformed, .. } | ScanOutcome::Capped { malformed, .. } => {
                malformed
            }
        }
    }

    /// Text of the trailing summary annotation.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            ScanOutcome::Completed { reported, .. } => {
                format!("{reported} reported issues with test coverage.")
            }
            ScanOutcome::Capped { .. } => CAP_REACHED_SUMMARY.to_string(),
        }
    }
}

/// Classify report text by the presence of [`GAPS_MARKER`].
#[must_use]
pub fn classify(content: &str) -> ReportClassification {
    if content.contains(GAPS_MARKER) {
        ReportClassification::HasGaps
    } else {
        ReportClassification::Clean
    }
}

/// Shorten `report` so it fits in a single review comment.
///
/// Text of at most `max_characters` characters is returned as is. Longer text
/// keeps its first `max_characters + 1` characters followed by
/// [`TRUNCATION_SUFFIX`]. Lengths are counted in characters, not bytes.
#[must_use]
pub fn cut_report(report: &str, max_characters: usize) -> Cow<'_, str> {
    if report.char_indices().nth(max_characters).is_none() {
        return Cow::Borrowed(report);
    }

    let end = report
        .char_indices()
        .nth(max_characters + 1)
        .map_or(report.len(), |(i, _)| i);
    Cow::Owned(format!("{}{TRUNCATION_SUFFIX}", &report[..end]))
}

/// Emit `message` as a failure when `report_danger` is set, else as a warning.
pub fn report_with_type(
    sink: &mut dyn ReportSink,
    report_danger: bool,
    message: &str,
    sticky: bool,
) -> Severity {
    if report_danger {
        sink.fail(message, Placement::sticky(sticky));
        Severity::Failure
    } else {
        sink.warn(message, Placement::sticky(sticky));
        Severity::Warning
    }
}

/// Walk `content` line by line, handing each parsed finding to `on_finding`
/// until `max_findings` have been handed out.
///
/// The cap is checked after each finding, so at least one finding is always
/// handed out when the report has any.
pub fn scan_findings(
    content: &str,
    max_findings: usize,
    mut on_finding: impl FnMut(&CoverageFinding),
) -> ScanOutcome {
    let mut reported = 0;
    let mut malformed = Vec::new();

    for line in content.lines() {
        match parser::parse_line(line) {
            LineParse::Skip => {}
            LineParse::Malformed(raw) => {
                warn!(line = %raw, "skipping unparseable location line");
                malformed.push(raw);
            }
            LineParse::Finding(finding) => {
                on_finding(&finding);
                reported += 1;
                if reported >= max_findings {
                    return ScanOutcome::Capped {
                        reported,
                        malformed,
                    };
                }
            }
        }
    }

    ScanOutcome::Completed {
        reported,
        malformed,
    }
}

/// Process the report at `path` and emit its annotations to `sink`.
///
/// A missing or invalid report never returns an error; it produces a single
/// failing annotation instead.
pub fn process(
    path: &Path,
    options: &ReportOptions,
    limits: &Limits,
    sink: &mut dyn ReportSink,
) -> ProcessOutcome {
    let report = match artifact::load(path, limits) {
        Ok(report) => report,
        Err(e) => {
            info!(path = %path.display(), error = %e, "undercover report unavailable");
            sink.fail(REPORT_NOT_FOUND, Placement::sticky(options.sticky));
            return ProcessOutcome::MissingReport;
        }
    };
    let content = report.content.as_str();

    if classify(content) == ReportClassification::Clean {
        debug!("report has no coverage gaps");
        let text = cut_report(content, limits.max_characters_per_message);
        sink.message(&text, options.sticky);
        return ProcessOutcome::Clean;
    }

    if !options.in_line {
        let text = cut_report(content, limits.max_characters_per_message);
        let severity = report_with_type(sink, options.report_danger, &text, options.sticky);
        return ProcessOutcome::Consolidated(severity);
    }

    let outcome = scan_findings(content, options.max_inline_comments, |finding| {
        let message = format!("{FINDING_PREFIX}{}", finding.raw);
        sink.warn(
            &message,
            Placement::at(finding.path.as_str(), finding.start_line, options.sticky),
        );
    });
    info!(
        reported = outcome.reported(),
        malformed = outcome.malformed().len(),
        capped = matches!(outcome, ScanOutcome::Capped { .. }),
        "inline scan finished"
    );

    report_with_type(
        sink,
        options.report_danger,
        &outcome.summary(),
        options.sticky,
    );
    ProcessOutcome::Inline(outcome)
}

/// [`process`] the report at [`DEFAULT_PATH`].
pub fn process_default(
    options: &ReportOptions,
    limits: &Limits,
    sink: &mut dyn ReportSink,
) -> ProcessOutcome {
    process(Path::new(DEFAULT_PATH), options, limits, sink)
}
