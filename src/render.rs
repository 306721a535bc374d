//! Output formatting for annotation batches.

use std::fmt::Write;

use crate::error::Result;
use crate::model::{Annotation, AnnotationBatch, Severity};

/// Trait for formatting an annotation batch.
pub trait BatchFormatter {
    /// Format the batch to a string.
    fn format(&self, batch: &AnnotationBatch) -> Result<String>;
}

impl AnnotationBatch {
    /// Format using a specific formatter.
    pub fn format(&self, formatter: &dyn BatchFormatter) -> Result<String> {
        formatter.format(self)
    }
}

/// One line per annotation, e.g. `WARNING [lib/a.rb:3] Coverage reported ...`.
pub struct TextFormatter;

impl BatchFormatter for TextFormatter {
    fn format(&self, batch: &AnnotationBatch) -> Result<String> {
        let mut out = String::new();
        for a in batch {
            let level = a.severity.as_str().to_uppercase();
            match &a.location {
                Some(loc) => {
                    writeln!(out, "{level} [{}:{}] {}", loc.file, loc.line, a.message).unwrap()
                }
                None => writeln!(out, "{level} {}", a.message).unwrap(),
            }
        }
        Ok(out)
    }
}

/// Danger-style Markdown: one table per severity, most severe first.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn section(md: &mut String, title: &str, icon: &str, annotations: &[&Annotation]) {
        if annotations.is_empty() {
            return;
        }
        let count = annotations.len();
        writeln!(md, "| | {count} {title} |").unwrap();
        md.push_str("|---|---|\n");
        for a in annotations {
            let message = escape_table_cell(&a.message);
            match &a.location {
                Some(loc) => writeln!(
                    md,
                    "| {icon} | `{}#L{}`: {message} |",
                    loc.file, loc.line
                )
                .unwrap(),
                None => writeln!(md, "| {icon} | {message} |").unwrap(),
            }
        }
        md.push('\n');
    }
}

impl BatchFormatter for MarkdownFormatter {
    fn format(&self, batch: &AnnotationBatch) -> Result<String> {
        let mut md = String::new();

        let fails = with_severity(batch, Severity::Failure);
        let warnings = with_severity(batch, Severity::Warning);
        let messages = with_severity(batch, Severity::Message);
        Self::section(&mut md, "Fails", ":no_entry_sign:", &fails);
        Self::section(&mut md, "Warnings", ":warning:", &warnings);
        Self::section(&mut md, "Messages", ":book:", &messages);

        md.push_str("<sub>Generated by undercov</sub>\n");
        Ok(md)
    }
}

fn with_severity(batch: &AnnotationBatch, severity: Severity) -> Vec<&Annotation> {
    batch.iter().filter(|a| a.severity == severity).collect()
}

/// Table cells cannot contain raw newlines or pipes.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

/// GitHub Actions workflow commands (`::warning file=..,line=..::message`).
pub struct GitHubFormatter;

impl BatchFormatter for GitHubFormatter {
    fn format(&self, batch: &AnnotationBatch) -> Result<String> {
        let mut out = String::new();
        for a in batch {
            let command = match a.severity {
                Severity::Failure => "error",
                Severity::Warning => "warning",
                Severity::Message => "notice",
            };
            let message = escape_data(&a.message);
            match &a.location {
                Some(loc) => writeln!(
                    out,
                    "::{command} file={},line={}::{message}",
                    escape_property(&loc.file),
                    loc.line
                )
                .unwrap(),
                None => writeln!(out, "::{command}::{message}").unwrap(),
            }
        }
        Ok(out)
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// The batch as pretty-printed JSON.
pub struct JsonFormatter;

impl BatchFormatter for JsonFormatter {
    fn format(&self, batch: &AnnotationBatch) -> Result<String> {
        let mut out = serde_json::to_string_pretty(batch)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Placement, ReportSink};

    fn sample() -> AnnotationBatch {
        let mut batch = AnnotationBatch::new();
        batch.warn(
            "Coverage reported 0 hits loc: lib/a.rb:3:5",
            Placement::at("lib/a.rb", 3, true),
        );
        batch.fail("1 reported issues with test coverage.", Placement::sticky(true));
        batch
    }

    #[test]
    fn test_format_text() {
        let out = sample().format(&TextFormatter).unwrap();
        assert_eq!(
            out,
            "WARNING [lib/a.rb:3] Coverage reported 0 hits loc: lib/a.rb:3:5\n\
             FAILURE 1 reported issues with test coverage.\n"
        );
    }

    #[test]
    fn test_format_markdown_sections() {
        let md = sample().format(&MarkdownFormatter).unwrap();
        let fails = md.find("1 Fails").unwrap();
        let warnings = md.find("1 Warnings").unwrap();
        assert!(fails < warnings);
        assert!(md.contains("`lib/a.rb#L3`"));
        assert!(!md.contains("Messages"));
        assert!(md.contains("Generated by undercov"));
    }

    #[test]
    fn test_format_markdown_escapes_newlines() {
        let mut batch = AnnotationBatch::new();
        batch.message("line one\nline | two", true);
        let md = batch.format(&MarkdownFormatter).unwrap();
        assert!(md.contains("line one<br>line \\| two"));
    }

    #[test]
    fn test_format_github_commands() {
        let out = sample().format(&GitHubFormatter).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "::warning file=lib/a.rb,line=3::Coverage reported 0 hits loc: lib/a.rb:3:5"
        );
        assert_eq!(lines[1], "::error::1 reported issues with test coverage.");
    }

    #[test]
    fn test_format_github_escapes() {
        let mut batch = AnnotationBatch::new();
        batch.message("100% done\nnext", false);
        batch.warn("x", Placement::at("C:\\a,b.rb", 1, false));
        let out = batch.format(&GitHubFormatter).unwrap();
        assert!(out.contains("::notice::100%25 done%0Anext"));
        assert!(out.contains("file=C%3A\\a%2Cb.rb,line=1"));
    }

    #[test]
    fn test_format_json() {
        let out = sample().format(&JsonFormatter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let annotations = value["annotations"].as_array().unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0]["severity"], "warning");
        assert_eq!(annotations[0]["location"]["line"], 3);
        assert!(annotations[1].get("location").is_none());
        assert_eq!(annotations[1]["severity"], "failure");
    }
}
