//! Gate execution - effectful operations
//!
//! Takes the pure readiness evaluation and drives it against a forge: fetch
//! the PR and its operation log, refresh the author notification when the PR
//! is blocked, merge when it is ready.

use crate::config::RepoPolicy;
use crate::error::{Error, Result};
use crate::gate::evaluate::{all_labels_present, check_readiness};
use crate::platform::ForgeService;
use crate::types::{PrState, PullRequest};
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Matches a `/check-pr` command comment (whole line, case-insensitive)
static CHECK_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^/check-pr\s*$").expect("hardcoded regex is valid"));

/// Matches the bot's own notification comments, for stale-comment cleanup
static NOTIFICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@\S+, this pull request is not mergeable\.")
        .expect("hardcoded regex is valid")
});

fn notification(author: &str) -> String {
    format!("@{author}, this pull request is not mergeable.")
}

/// Options for a gate run
#[derive(Debug, Clone, Copy, Default)]
pub struct GateOptions {
    /// Run the cheap label-presence pre-check before fetching the operation
    /// log. Used on label-change events to avoid redundant fetches and
    /// duplicate notifications while labels are still being applied.
    pub precheck: bool,
}

/// Outcome of a gate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The PR passed every label policy and was merged
    Merged {
        /// SHA of the merge commit, when the forge reports one
        sha: Option<String>,
    },
    /// The PR is blocked; the readiness report was posted to the author
    Blocked(String),
    /// Nothing to do (PR not open, pre-check miss, or not a gate command)
    Skipped,
}

/// Evaluate a PR's label readiness without side effects.
///
/// Fetches the PR and its operation log and returns the readiness report;
/// an empty string means the PR is mergeable from a label standpoint.
pub async fn evaluate_pr(
    platform: &dyn ForgeService,
    pr_number: u64,
    policy: &RepoPolicy,
) -> Result<String> {
    let pr = platform.get_pull_request(pr_number).await?;
    let entries = platform.list_audit_log(pr_number).await?;
    Ok(check_readiness(&pr.label_set(), &entries, policy, Utc::now()))
}

/// Run the gate for a PR: merge it, or notify the author why not.
pub async fn run_gate(
    platform: &dyn ForgeService,
    pr_number: u64,
    policy: &RepoPolicy,
    options: GateOptions,
) -> Result<GateOutcome> {
    let pr = platform.get_pull_request(pr_number).await?;

    if pr.state != PrState::Open {
        debug!(pr_number, state = %pr.state, "skipping non-open PR");
        return Ok(GateOutcome::Skipped);
    }

    gate_pr(platform, &pr, policy, options.precheck).await
}

/// Handle a PR comment that may carry the `/check-pr` command.
///
/// Comments that do not match the command are skipped. A PR the forge
/// reports as conflicting gets a conflict notification instead of a label
/// evaluation, since the merge could not proceed either way.
pub async fn handle_check_command(
    platform: &dyn ForgeService,
    pr_number: u64,
    comment_body: &str,
    policy: &RepoPolicy,
) -> Result<GateOutcome> {
    if !CHECK_PR_RE.is_match(comment_body) {
        return Ok(GateOutcome::Skipped);
    }

    let pr = platform.get_pull_request(pr_number).await?;

    if pr.state != PrState::Open {
        debug!(pr_number, state = %pr.state, "skipping non-open PR");
        return Ok(GateOutcome::Skipped);
    }

    if pr.mergeable == Some(false) {
        let report = "it conflicts with the target branch".to_string();
        let body = format!(
            "{} Because {report}.",
            notification(&pr.author)
        );
        post_notification(platform, pr_number, &body).await?;
        return Ok(GateOutcome::Blocked(report));
    }

    gate_pr(platform, &pr, policy, false).await
}

async fn gate_pr(
    platform: &dyn ForgeService,
    pr: &PullRequest,
    policy: &RepoPolicy,
    precheck: bool,
) -> Result<GateOutcome> {
    let labels = pr.label_set();

    // On label-change events the full evaluation (and its comment side
    // effects) only runs once the labels are at least plausibly complete.
    if precheck && !all_labels_present(&labels, policy) {
        debug!(pr_number = pr.number, "pre-check failed, labels not in place yet");
        return Ok(GateOutcome::Skipped);
    }

    let entries = platform.list_audit_log(pr.number).await?;
    let report = check_readiness(&labels, &entries, policy, Utc::now());

    if !report.is_empty() {
        info!(pr_number = pr.number, "PR blocked by label policy");
        let body = format!("{}\n\n{report}", notification(&pr.author));
        post_notification(platform, pr.number, &body).await?;
        return Ok(GateOutcome::Blocked(report));
    }

    let method = policy.merge_method_for(&pr.base_ref);
    info!(pr_number = pr.number, %method, "label policies satisfied, merging");

    let result = platform.merge_pr(pr.number, method).await?;
    if result.merged {
        Ok(GateOutcome::Merged { sha: result.sha })
    } else {
        Err(Error::Platform(format!(
            "merge was not performed: {}",
            result.message.unwrap_or_default()
        )))
    }
}

/// Post a notification comment, replacing any stale ones from earlier runs
async fn post_notification(
    platform: &dyn ForgeService,
    pr_number: u64,
    body: &str,
) -> Result<()> {
    delete_stale_notifications(platform, pr_number).await;
    platform.create_pr_comment(pr_number, body).await
}

/// Best-effort cleanup of earlier notification comments.
///
/// Failures here are logged and swallowed: a stale comment is annoying, a
/// failed gate run over cleanup would be worse.
async fn delete_stale_notifications(platform: &dyn ForgeService, pr_number: u64) {
    let comments = match platform.list_pr_comments(pr_number).await {
        Ok(comments) => comments,
        Err(e) => {
            warn!(pr_number, error = %e, "failed to list comments for cleanup");
            return;
        }
    };

    for comment in comments {
        if !NOTIFICATION_RE.is_match(&comment.body) {
            continue;
        }
        if let Err(e) = platform.delete_pr_comment(comment.id).await {
            warn!(pr_number, comment_id = comment.id, error = %e, "failed to delete stale notification");
        }
    }
}
