//! GitHub forge service implementation

use crate::error::{Error, Result};
use crate::platform::{ForgeConfig, ForgeService};
use crate::types::{AuditEntry, MergeMethod, MergeResult, PrComment, PrState, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

// Timeline API response types (raw REST; octocrab has no typed timeline yet)

#[derive(Deserialize)]
struct TimelineEvent {
    event: String,
    #[serde(default)]
    label: Option<TimelineLabel>,
    #[serde(default)]
    actor: Option<TimelineActor>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct TimelineLabel {
    name: String,
}

#[derive(Deserialize)]
struct TimelineActor {
    login: String,
}

/// Timeline page size; a short page marks the end of the log
const TIMELINE_PAGE_SIZE: usize = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: ForgeConfig,
    /// Token for raw HTTP requests (timeline API)
    token: String,
    /// HTTP client for raw requests (timeline API)
    http_client: Client,
    /// API base URL for raw requests
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_base = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            base_url
        } else {
            "https://api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("label-tide")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: ForgeConfig { owner, repo, host },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Construct a service pointed at an arbitrary API base (mock server)
    #[cfg(test)]
    fn with_api_base(token: &str, owner: &str, repo: &str, api_base: String) -> Self {
        Self {
            client: Octocrab::default(),
            config: ForgeConfig {
                owner: owner.to_string(),
                repo: repo.to_string(),
                host: None,
            },
            token: token.to_string(),
            http_client: Client::new(),
            api_base,
        }
    }
}

/// Render a timeline label event as operation-log text.
///
/// The engine correlates labels with entries by substring, so the rendered
/// text must contain the label name verbatim.
fn entry_from_event(event: &TimelineEvent) -> Option<AuditEntry> {
    let verb = match event.event.as_str() {
        "labeled" => "add",
        "unlabeled" => "remove",
        _ => return None,
    };
    let label = event.label.as_ref()?;

    Some(AuditEntry {
        content: format!("{verb} the {} label", label.name),
        created_at: event.created_at.clone().unwrap_or_default(),
        actor: event.actor.as_ref().map(|a| a.login.clone()),
    })
}

#[async_trait]
impl ForgeService for GitHubService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting pull request");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let state = match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => {
                PrState::Merged
            }
            // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
            Some(_) | None => PrState::Closed,
        };

        let result = PullRequest {
            number: pr.number,
            author: pr.user.as_ref().map(|u| u.login.clone()).unwrap_or_default(),
            base_ref: pr.base.ref_field.clone(),
            state,
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|l| l.name)
                .collect(),
            mergeable: pr.mergeable,
        };

        debug!(pr_number, state = %result.state, labels = result.labels.len(), "got pull request");
        Ok(result)
    }

    async fn list_audit_log(&self, pr_number: u64) -> Result<Vec<AuditEntry>> {
        debug!(pr_number, "listing PR operation log");

        // The timeline is paginated oldest-first; the most recent label
        // events live on the last page, so every page must be fetched.
        let mut entries = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues/{}/timeline?per_page={TIMELINE_PAGE_SIZE}&page={page}",
                self.api_base, self.config.owner, self.config.repo, pr_number
            );

            let response = self
                .http_client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", "2022-11-28")
                .send()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to fetch timeline: {e}")))?;

            if !response.status().is_success() {
                return Err(Error::GitHubApi(format!(
                    "timeline request failed with status {}",
                    response.status()
                )));
            }

            let events: Vec<TimelineEvent> = response
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse timeline: {e}")))?;

            let fetched = events.len();
            entries.extend(events.iter().filter_map(entry_from_event));

            // A short page is the last one
            if fetched < TIMELINE_PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!(pr_number, count = entries.len(), pages = page, "listed PR operation log");
        Ok(entries)
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        debug!(pr_number, "listing PR comments");
        let comments = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_comments(pr_number)
            .send()
            .await?;

        let result: Vec<PrComment> = comments
            .items
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                author: c.user.login,
                body: c.body.unwrap_or_default(),
            })
            .collect();
        debug!(pr_number, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn delete_pr_comment(&self, comment_id: u64) -> Result<()> {
        debug!(comment_id, "deleting PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .delete_comment(octocrab::models::CommentId(comment_id))
            .await?;
        debug!(comment_id, "deleted PR comment");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn config(&self) -> &ForgeConfig {
        &self.config
    }
}
