//! Mock forge service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use label_tide::error::{Error, Result};
use label_tide::platform::{ForgeConfig, ForgeService};
use label_tide::types::{AuditEntry, MergeMethod, MergeResult, PrComment, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Simple mock forge service for testing
///
/// Features:
/// - Configurable PRs, operation logs, comments, and merge responses
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockForgeService {
    config: ForgeConfig,
    next_comment_id: AtomicU64,
    pull_requests: Mutex<HashMap<u64, PullRequest>>,
    audit_logs: Mutex<HashMap<u64, Vec<AuditEntry>>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    get_pr_calls: Mutex<Vec<u64>>,
    list_audit_calls: Mutex<Vec<u64>>,
    list_comments_calls: Mutex<Vec<u64>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    delete_comment_calls: Mutex<Vec<u64>>,
    merge_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list_audit: Mutex<Option<String>>,
    error_on_list_comments: Mutex<Option<String>>,
    error_on_delete_comment: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
}

impl Default for MockForgeService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForgeService {
    /// Create a new mock for a fixed test repository
    pub fn new() -> Self {
        Self {
            config: ForgeConfig {
                owner: "openeuler".to_string(),
                repo: "kernel".to_string(),
                host: None,
            },
            next_comment_id: AtomicU64::new(1),
            pull_requests: Mutex::new(HashMap::new()),
            audit_logs: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_audit_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            delete_comment_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_list_audit: Mutex::new(None),
            error_on_list_comments: Mutex::new(None),
            error_on_delete_comment: Mutex::new(None),
            error_on_merge: Mutex::new(None),
        }
    }

    // === Fixture setup ===

    /// Register a PR the mock will serve
    pub fn set_pull_request(&self, pr: PullRequest) {
        self.pull_requests.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the operation log for a PR
    pub fn set_audit_log(&self, pr_number: u64, entries: Vec<AuditEntry>) {
        self.audit_logs.lock().unwrap().insert(pr_number, entries);
    }

    /// Seed an existing comment on a PR
    pub fn add_comment(&self, pr_number: u64, author: &str, body: &str) -> u64 {
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.comments.lock().unwrap().entry(pr_number).or_default().push(PrComment {
            id,
            author: author.to_string(),
            body: body.to_string(),
        });
        id
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, response: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, response);
    }

    // === Error injection ===

    /// Make `list_audit_log` return an error
    pub fn fail_list_audit(&self, msg: &str) {
        *self.error_on_list_audit.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_pr_comments` return an error
    pub fn fail_list_comments(&self, msg: &str) {
        *self.error_on_list_comments.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `delete_pr_comment` return an error
    pub fn fail_delete_comment(&self, msg: &str) {
        *self.error_on_delete_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    /// Number of `list_audit_log` calls made
    pub fn audit_fetch_count(&self) -> usize {
        self.list_audit_calls.lock().unwrap().len()
    }

    /// All comment bodies created so far
    pub fn created_comments(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// IDs of deleted comments
    pub fn deleted_comments(&self) -> Vec<u64> {
        self.delete_comment_calls.lock().unwrap().clone()
    }

    /// All merge calls made so far
    pub fn merge_calls(&self) -> Vec<MergePrCall> {
        self.merge_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForgeService for MockForgeService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);
        self.pull_requests
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no such PR: {pr_number}")))
    }

    async fn list_audit_log(&self, pr_number: u64) -> Result<Vec<AuditEntry>> {
        self.list_audit_calls.lock().unwrap().push(pr_number);
        if let Some(msg) = self.error_on_list_audit.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .audit_logs
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        self.list_comments_calls.lock().unwrap().push(pr_number);
        if let Some(msg) = self.error_on_list_comments.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls.lock().unwrap().push(CreateCommentCall {
            pr_number,
            body: body.to_string(),
        });
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.comments.lock().unwrap().entry(pr_number).or_default().push(PrComment {
            id,
            author: "label-tide".to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn delete_pr_comment(&self, comment_id: u64) -> Result<()> {
        self.delete_comment_calls.lock().unwrap().push(comment_id);
        if let Some(msg) = self.error_on_delete_comment.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        for comments in self.comments.lock().unwrap().values_mut() {
            comments.retain(|c| c.id != comment_id);
        }
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.merge_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });
        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some("abc123".to_string()),
                message: None,
            }))
    }

    fn config(&self) -> &ForgeConfig {
        &self.config
    }
}
