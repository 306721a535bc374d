use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, warn};

use undercov::cli::{self, Style};
use undercov::config::{Limits, ReportOptions, DEFAULT_PATH, MAX_INLINE_COMMENTS};
use undercov::github;
use undercov::render::MarkdownFormatter;

/// undercov — Surface undercover coverage-gap reports as review annotations.
#[derive(Parser)]
#[command(name = "undercov", version, about)]
struct Cli {
    /// Path to the undercover report.
    #[arg(env = "UNDERCOV_PATH", default_value = DEFAULT_PATH)]
    path: PathBuf,

    /// Do not mark annotations as persistent across revisions.
    #[arg(long, env = "UNDERCOV_NO_STICKY")]
    no_sticky: bool,

    /// Report each finding as an in-line annotation.
    #[arg(long, env = "UNDERCOV_IN_LINE")]
    in_line: bool,

    /// Report coverage gaps as failures instead of warnings.
    #[arg(long, env = "UNDERCOV_REPORT_DANGER")]
    report_danger: bool,

    /// Maximum number of in-line annotations before switching to a summary.
    #[arg(long, env = "UNDERCOV_MAX_INLINE_COMMENTS", default_value_t = MAX_INLINE_COMMENTS)]
    max_inline_comments: usize,

    /// Output style.
    #[arg(long, value_enum, env = "UNDERCOV_STYLE", default_value = "text")]
    style: Style,

    /// Also post the annotations as a comment on the current pull request.
    /// Requires GITHUB_TOKEN, GITHUB_REPOSITORY and GITHUB_REF.
    #[arg(long, env = "UNDERCOV_POST_COMMENT")]
    post_comment: bool,

    /// Exit successfully even when a failing annotation was produced.
    #[arg(long, env = "UNDERCOV_NO_FAIL")]
    no_fail: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ReportOptions {
        ReportOptions {
            sticky: !self.no_sticky,
            in_line: self.in_line,
            report_danger: self.report_danger,
            max_inline_comments: self.max_inline_comments,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let options = cli.options();
    let limits = Limits::default();
    let run = cli::cmd_report(&cli.path, &options, &limits, cli.style)?;
    print!("{}", run.output);
    info!(
        annotations = run.batch.len(),
        outcome = ?run.outcome,
        "report processed"
    );

    if cli.post_comment {
        let ctx = github::Context::from_env()?;
        let body = run
            .batch
            .format(&MarkdownFormatter)
            .context("Failed to render comment")?;
        ctx.post_comment(&body, options.sticky)?;
    }

    if run.batch.has_failures() && !cli.no_fail {
        warn!("failing annotation produced");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            _ => tracing_subscriber::EnvFilter::new("debug"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
