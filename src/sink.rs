//! The reporting side channel a review host exposes.
//!
//! The processing logic only ever talks to a [`ReportSink`]. Hosts plug in
//! their own implementation; [`AnnotationBatch`] records everything emitted
//! so the result can be rendered or posted afterwards.

use crate::model::{Annotation, AnnotationBatch, Location, Severity};

/// Where and how an annotation is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Attach to a file and line instead of the review as a whole.
    pub location: Option<Location>,
    /// Persist the annotation across revisions of the same review.
    pub sticky: bool,
}

impl Placement {
    pub fn sticky(sticky: bool) -> Self {
        Self {
            location: None,
            sticky,
        }
    }

    pub fn at(file: impl Into<String>, line: u32, sticky: bool) -> Self {
        Self {
            location: Some(Location {
                file: file.into(),
                line,
            }),
            sticky,
        }
    }
}

/// The three reporting primitives of a review host.
pub trait ReportSink {
    /// Non-blocking annotation; does not fail the check.
    fn warn(&mut self, message: &str, placement: Placement);

    /// Annotation that marks the check as failed.
    fn fail(&mut self, message: &str, placement: Placement);

    /// Informational annotation on the review as a whole.
    fn message(&mut self, text: &str, sticky: bool);
}

impl AnnotationBatch {
    fn record(&mut self, severity: Severity, message: &str, placement: Placement) {
        self.push(Annotation {
            severity,
            message: message.to_string(),
            location: placement.location,
            sticky: placement.sticky,
        });
    }
}

impl ReportSink for AnnotationBatch {
    fn warn(&mut self, message: &str, placement: Placement) {
        self.record(Severity::Warning, message, placement);
    }

    fn fail(&mut self, message: &str, placement: Placement) {
        self.record(Severity::Failure, message, placement);
    }

    fn message(&mut self, text: &str, sticky: bool) {
        self.record(Severity::Message, text, Placement::sticky(sticky));
    }
}
