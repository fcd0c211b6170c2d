//! Forge services
//!
//! Abstracts the forge API behind the [`ForgeService`] trait so the gate
//! logic is independent of any particular forge. The trait covers exactly
//! what a gate run needs: the PR itself, its operation log, the comment
//! lifecycle for notifications, and the merge call.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{AuditEntry, MergeMethod, MergeResult, PrComment, PullRequest};
use async_trait::async_trait;

/// Forge/repository coordinates for a service instance
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for the public forge)
    pub host: Option<String>,
}

/// Forge service trait for the operations a gate run needs
///
/// Transport failures are propagated as errors; the gate does not retry.
#[async_trait]
pub trait ForgeService: Send + Sync {
    /// Fetch the PR state the gate needs (author, base, state, labels)
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest>;

    /// Fetch the PR's operation log (label add/remove events)
    async fn list_audit_log(&self, pr_number: u64) -> Result<Vec<AuditEntry>>;

    /// List comments on a PR
    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Delete a comment by ID
    async fn delete_pr_comment(&self, comment_id: u64) -> Result<()>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Get the forge configuration
    fn config(&self) -> &ForgeConfig;
}
