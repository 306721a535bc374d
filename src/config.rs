//! Limits and per-invocation options for processing an undercover report.

/// Report location used when no path is given.
pub const DEFAULT_PATH: &str = "coverage/undercover.txt";

/// Default cap on per-finding annotations.
pub const MAX_INLINE_COMMENTS: usize = 30;

/// Longest message body sent to the review platform before truncation.
/// The platform rejects comments above 65,536 characters.
pub const MAX_CHARACTERS_PER_MESSAGE: usize = 60_000;

/// The only accepted report extension, without the leading dot.
pub const VALID_EXTENSION: &str = "txt";

/// Fixed limits applied while processing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_characters_per_message: usize,
    pub valid_extension: String,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_characters_per_message: MAX_CHARACTERS_PER_MESSAGE,
            valid_extension: VALID_EXTENSION.to_string(),
        }
    }
}

/// Options recognised by [`crate::report::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Mark annotations as persistent across revisions.
    pub sticky: bool,
    /// Emit one annotation per finding instead of one consolidated message.
    pub in_line: bool,
    /// Emit failing annotations instead of warnings for the bulk paths.
    pub report_danger: bool,
    /// Per-finding annotations allowed before switching to a summary.
    pub max_inline_comments: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sticky: true,
            in_line: false,
            report_danger: false,
            max_inline_comments: MAX_INLINE_COMMENTS,
        }
    }
}
