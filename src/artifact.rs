/// Validation and loading of undercover report files.
///
/// A report is valid when a file exists at the given path and its extension
/// is exactly `txt`. Anything else, including a file that exists but cannot
/// be read, is reported as [`UndercovError::ReportNotFound`].
use std::path::Path;

use tracing::debug;

use crate::config::Limits;
use crate::error::{Result, UndercovError};
use crate::model::ReportArtifact;

/// Check that `path` exists and carries the accepted extension.
pub fn is_valid(path: &Path, limits: &Limits) -> bool {
    path.exists() && has_valid_extension(path, limits)
}

fn has_valid_extension(path: &Path, limits: &Limits) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == limits.valid_extension)
}

/// Validate and read a report.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn load(path: &Path, limits: &Limits) -> Result<ReportArtifact> {
    if !is_valid(path, limits) {
        return Err(UndercovError::ReportNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read undercover report");

    Ok(ReportArtifact {
        path: path.to_path_buf(),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
