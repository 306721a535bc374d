//! GitHub API helpers for posting an annotation batch on a pull request.

use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use tracing::{debug, info};

const COMMENT_MARKER: &str = "<!-- undercov-comment -->";

/// Resolved GitHub Actions context, read from environment variables.
pub struct Context {
    token: String,
    repo: String,
    pr_number: u64,
}

impl Context {
    /// Build a context from standard GitHub Actions environment variables
    /// (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`, `GITHUB_REF`).
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .context("GITHUB_TOKEN environment variable is required")?;
        let repo = std::env::var("GITHUB_REPOSITORY")
            .context("GITHUB_REPOSITORY environment variable is required")?;
        let github_ref =
            std::env::var("GITHUB_REF").context("GITHUB_REF environment variable is required")?;
        let pr_number = pr_number_from_ref(&github_ref)
            .with_context(|| format!("could not determine PR number from '{github_ref}'"))?;
        Ok(Self {
            token,
            repo,
            pr_number,
        })
    }

    /// Post `body` on the pull request.
    ///
    /// A sticky comment replaces the previous undercov comment if there is
    /// one; otherwise a new comment is always created.
    pub fn post_comment(&self, body: &str, sticky: bool) -> Result<()> {
        let existing = if sticky {
            self.find_existing_comment()?
        } else {
            None
        };
        let body = if sticky {
            format!("{COMMENT_MARKER}\n{body}")
        } else {
            body.to_string()
        };

        match existing {
            Some(comment_id) => {
                let url = format!(
                    "https://api.github.com/repos/{}/issues/comments/{}",
                    self.repo, comment_id
                );
                debug!(comment_id, "updating sticky comment");
                send(ureq::patch(&url), &self.token, &body, "updating comment")?;
            }
            None => {
                let url = format!(
                    "https://api.github.com/repos/{}/issues/{}/comments",
                    self.repo, self.pr_number
                );
                send(ureq::post(&url), &self.token, &body, "creating comment")?;
            }
        }

        info!(repo = %self.repo, pr = self.pr_number, sticky, "comment posted");
        Ok(())
    }

    /// Find the previous sticky comment (by our hidden marker).
    fn find_existing_comment(&self) -> Result<Option<u64>> {
        let mut page = 1u32;
        loop {
            let url = format!(
                "https://api.github.com/repos/{}/issues/{}/comments?per_page=100&page={}",
                self.repo, self.pr_number, page
            );
            let resp = with_headers(ureq::get(&url), &self.token)
                .call()
                .context("Failed to list PR comments")?;

            let comments: Vec<Comment> =
                resp.into_json().context("Failed to parse comments JSON")?;
            if comments.is_empty() {
                return Ok(None);
            }
            if let Some(id) = find_marked(&comments) {
                return Ok(Some(id));
            }
            page += 1;
        }
    }
}

#[derive(Deserialize)]
struct Comment {
    id: u64,
    body: Option<String>,
}

fn find_marked(comments: &[Comment]) -> Option<u64> {
    comments
        .iter()
        .find(|c| c.body.as_deref().is_some_and(|b| b.contains(COMMENT_MARKER)))
        .map(|c| c.id)
}

/// Extract PR number from a ref such as `refs/pull/42/merge`.
fn pr_number_from_ref(github_ref: &str) -> Option<u64> {
    let parts: Vec<&str> = github_ref.split('/').collect();
    if parts.len() >= 3 && parts[0] == "refs" && parts[1] == "pull" {
        parts[2].parse().ok()
    } else {
        None
    }
}

fn with_headers(req: ureq::Request, token: &str) -> ureq::Request {
    req.set("Authorization", &format!("Bearer {}", token))
        .set("Accept", "application/vnd.github+json")
        .set("User-Agent", "undercov")
        .set("X-GitHub-Api-Version", "2022-11-28")
}

fn send(req: ureq::Request, token: &str, body: &str, action: &str) -> Result<()> {
    match with_headers(req, token).send_json(serde_json::json!({ "body": body })) {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            bail!("GitHub API error {} (HTTP {}): {}", action, code, body);
        }
        Err(e) => bail!("Failed {}: {}", action, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_number_from_ref() {
        assert_eq!(pr_number_from_ref("refs/pull/42/merge"), Some(42));
        assert_eq!(pr_number_from_ref("refs/heads/main"), None);
        assert_eq!(pr_number_from_ref("refs/pull/abc/merge"), None);
        assert_eq!(pr_number_from_ref(""), None);
    }

    #[test]
    fn test_find_marked() {
        let comments = vec![
            Comment {
                id: 1,
                body: Some("LGTM".to_string()),
            },
            Comment { id: 2, body: None },
            Comment {
                id: 3,
                body: Some(format!("{COMMENT_MARKER}\n| | 1 Warnings |")),
            },
        ];
        assert_eq!(find_marked(&comments), Some(3));
        assert_eq!(find_marked(&comments[..2]), None);
    }
}
