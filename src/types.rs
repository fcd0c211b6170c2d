//! Core types for label-tide

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One event from the forge's operation log for a pull request
///
/// Entries are externally sourced and never mutated by the engine. The
/// `content` is free text; label correlation is a substring match against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    /// Free-text description of the action (must mention the label name)
    pub content: String,
    /// Timestamp of the action, RFC 3339 (kept raw; parsed at resolution time)
    pub created_at: String,
    /// Login of the user who performed the action, if known
    pub actor: Option<String>,
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// The subset of pull request state the gate needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Login of the PR author (notified when the gate blocks)
    pub author: String,
    /// Base branch name (selects the merge method)
    pub base_ref: String,
    /// Current state of the PR
    pub state: PrState,
    /// Names of labels currently on the PR
    pub labels: Vec<String>,
    /// Whether the forge considers the PR mergeable (`None` = still computing)
    pub mergeable: Option<bool>,
}

impl PullRequest {
    /// The current labels as a set, for policy evaluation
    pub fn label_set(&self) -> HashSet<String> {
        self.labels.iter().cloned().collect()
    }
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Login of the comment author
    pub author: String,
    /// Comment body text
    pub body: String,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
