//! In-memory representation of an undercover report and the annotations
//! derived from it. Everything here lives for a single invocation.

use std::path::PathBuf;

use serde::Serialize;

/// The raw text of a validated report file.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub content: String,
}

/// One `loc: <path>:<start>:<end>` line from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageFinding {
    /// Source file path as written by undercover.
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    /// The report line the finding was parsed from, without its terminator.
    pub raw: String,
}

/// Whether the report flags any untested code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportClassification {
    Clean,
    HasGaps,
}

/// Annotation level, from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; never affects the check result.
    Message,
    Warning,
    /// Marks the overall check as failed.
    Failure,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Message => "message",
            Severity::Warning => "warning",
            Severity::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file and 1-based line an annotation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// A single annotation to surface on the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub severity: Severity,
    pub message: String,
    /// `None` for annotations on the review as a whole.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub sticky: bool,
}

/// Ordered annotations produced by one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationBatch {
    pub annotations: Vec<Annotation>,
}

impl AnnotationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Number of annotations at exactly `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }

    /// Messages at `severity`, in emission order.
    #[must_use]
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.annotations
            .iter()
            .filter(|a| a.severity == severity)
            .map(|a| a.message.as_str())
            .collect()
    }

    /// True when any annotation would fail the check.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count(Severity::Failure) > 0
    }
}

impl<'a> IntoIterator for &'a AnnotationBatch {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}
