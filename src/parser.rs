/// Recognition of `loc:` lines in an undercover report.
///
/// Undercover lists each untested method with a location line such as:
///
///   loc: lib/foo/bar.rb:12:15, coverage: 0.0%
///
/// Only the file path and the two line numbers are extracted. A line whose
/// trimmed form starts with `loc:` but does not match the pattern is kept as
/// [`LineParse::Malformed`] so the caller can decide what to do with it.
use std::sync::LazyLock;

use regex::Regex;

use crate::model::CoverageFinding;

pub const LOC_PREFIX: &str = "loc:";

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"loc:\s*([^:]+):(\d+):(\d+)").unwrap());

/// Result of looking at one report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineParse {
    /// Not a location line.
    Skip,
    Finding(CoverageFinding),
    /// Starts with `loc:` but the path or line numbers could not be read.
    Malformed(String),
}

/// True when the line, ignoring surrounding whitespace, starts with `loc:`.
#[must_use]
pub fn is_location_line(line: &str) -> bool {
    line.trim().starts_with(LOC_PREFIX)
}

/// Classify a single line. `line` must not include its terminator.
#[must_use]
pub fn parse_line(line: &str) -> LineParse {
    if !is_location_line(line) {
        return LineParse::Skip;
    }

    let Some(caps) = LOC_RE.captures(line) else {
        return LineParse::Malformed(line.to_string());
    };

    let start_line = caps[2].parse::<u32>();
    let end_line = caps[3].parse::<u32>();
    match (start_line, end_line) {
        (Ok(start_line), Ok(end_line)) => LineParse::Finding(CoverageFinding {
            path: caps[1].to_string(),
            start_line,
            end_line,
            raw: line.to_string(),
        }),
        _ => LineParse::Malformed(line.to_string()),
    }
}
