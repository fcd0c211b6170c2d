//! Shared fixtures for label-tide tests

#![allow(dead_code)]

pub mod mock_forge;

use label_tide::config::{ForbiddenLabel, RepoPolicy, RequiredLabel};
use label_tide::types::{AuditEntry, PrState, PullRequest};
use std::collections::{HashMap, HashSet};

/// Build an operation-log entry
pub fn entry(content: &str, created_at: &str, actor: Option<&str>) -> AuditEntry {
    AuditEntry {
        content: content.to_string(),
        created_at: created_at.to_string(),
        actor: actor.map(String::from),
    }
}

/// Build a required-label policy with only the missing tip configured
pub fn required(name: &str, tip_if_missing: &str) -> RequiredLabel {
    RequiredLabel {
        name: name.to_string(),
        tip_if_missing: tip_if_missing.to_string(),
        owner: None,
        tip_if_added_by_others: None,
        active_hours: None,
        tip_if_expired: None,
    }
}

/// Build a forbidden-label policy
pub fn forbidden(name: &str, tip_if_present: &str) -> ForbiddenLabel {
    ForbiddenLabel {
        name: name.to_string(),
        tip_if_present: tip_if_present.to_string(),
    }
}

/// Build a repo policy with default merge method
pub fn policy(labels: Vec<RequiredLabel>, forbidden_labels: Vec<ForbiddenLabel>) -> RepoPolicy {
    RepoPolicy {
        repos: vec!["openeuler/kernel".to_string()],
        merge_method: Some(label_tide::types::MergeMethod::Merge),
        branch_merge_method: HashMap::new(),
        labels,
        forbidden_labels,
    }
}

/// Build a label set from names
pub fn label_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(ToString::to_string).collect()
}

/// Build an open PR fixture with the given labels
pub fn open_pr(number: u64, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        author: "contributor".to_string(),
        base_ref: "main".to_string(),
        state: PrState::Open,
        labels: labels.iter().map(ToString::to_string).collect(),
        mergeable: Some(true),
    }
}
