#![deny(missing_docs)]

//! # Publishing
//!
//! Commits the regenerated documentation and pushes it to a branch using the
//! GitHub Actions bot identity.

use crate::error::AppResult;
use crate::runner::{run_checked, CommandRunner};
use tracing::info;

/// Commit author name.
pub const BOT_NAME: &str = "github-actions[bot]";

/// Commit author email.
pub const BOT_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

/// What to publish and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Branch pushed to on `origin`.
    pub branch: String,
    /// Name of the insert file mentioned in the commit message.
    pub insert_file: String,
}

/// Result of a publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A commit was created and pushed.
    Pushed,
    /// The working tree had no changes; nothing was committed or pushed.
    NothingToCommit,
}

/// Commit message for an insert file.
pub fn commit_message(insert_file: &str) -> String {
    format!("Update OpenAPI documentation with {insert_file}")
}

/// Stages all changes, commits them and pushes to `origin/<branch>`.
pub fn publish<R: CommandRunner + ?Sized>(
    request: &PublishRequest,
    runner: &R,
) -> AppResult<PublishOutcome> {
    run_checked(runner, "git", &["config", "--global", "user.name", BOT_NAME])?;
    run_checked(runner, "git", &["config", "--global", "user.email", BOT_EMAIL])?;
    run_checked(runner, "git", &["add", "."])?;

    let status = run_checked(runner, "git", &["status", "--porcelain"])?;
    if String::from_utf8_lossy(&status.stdout).trim().is_empty() {
        info!("working tree clean, nothing to publish");
        return Ok(PublishOutcome::NothingToCommit);
    }

    let message = commit_message(&request.insert_file);
    run_checked(runner, "git", &["commit", "-m", message.as_str()])?;
    run_checked(runner, "git", &["push", "origin", request.branch.as_str()])?;

    info!(branch = %request.branch, %message, "published documentation");
    Ok(PublishOutcome::Pushed)
}
