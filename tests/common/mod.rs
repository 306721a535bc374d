use std::path::{Path, PathBuf};

use undercov::config::{Limits, ReportOptions};
use undercov::model::AnnotationBatch;
use undercov::report::{self, ProcessOutcome};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Process `path` with default limits, collecting every annotation.
pub fn run(path: &Path, options: &ReportOptions) -> (AnnotationBatch, ProcessOutcome) {
    let mut batch = AnnotationBatch::new();
    let outcome = report::process(path, options, &Limits::default(), &mut batch);
    (batch, outcome)
}
