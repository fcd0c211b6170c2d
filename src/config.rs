//! Gate configuration: per-repository label policies and merge methods.
//!
//! Configuration is loaded once from a TOML file, defaulted, validated, and
//! then held read-only for the lifetime of the process. The evaluation engine
//! receives an explicit `&RepoPolicy`; there is no process-wide mutable state.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A label that must be present (and validly applied) for a PR to merge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredLabel {
    /// Label name
    pub name: String,
    /// Tip shown when the label is absent
    pub tip_if_missing: String,
    /// If set, only this login may validly apply the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Tip shown when the label was applied by someone other than `owner`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_if_added_by_others: Option<String>,
    /// If set, the label expires this many hours after its application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_hours: Option<u32>,
    /// Tip shown when the label has expired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_if_expired: Option<String>,
}

impl RequiredLabel {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("required label: missing name".to_string()));
        }
        if self.tip_if_missing.is_empty() {
            return Err(Error::Config(format!(
                "required label {}: missing tip_if_missing",
                self.name
            )));
        }
        if self.owner.is_some() && self.tip_if_added_by_others.as_deref().unwrap_or("").is_empty() {
            return Err(Error::Config(format!(
                "required label {}: tip_if_added_by_others must be set when owner is set",
                self.name
            )));
        }
        match self.active_hours {
            Some(0) => {
                return Err(Error::Config(format!(
                    "required label {}: active_hours must be positive",
                    self.name
                )));
            }
            Some(_) if self.tip_if_expired.as_deref().unwrap_or("").is_empty() => {
                return Err(Error::Config(format!(
                    "required label {}: tip_if_expired must be set when active_hours is set",
                    self.name
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether an application at `applied_at` has expired by `now`.
    ///
    /// The boundary is strict: a label applied exactly `active_hours` hours
    /// before `now` is still active.
    pub fn is_expired(&self, applied_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.active_hours {
            Some(hours) => applied_at + Duration::hours(i64::from(hours)) < now,
            None => false,
        }
    }

    /// Whether `actor` violates the ownership rule (owner set and not `actor`)
    pub fn added_by_others(&self, actor: &str) -> bool {
        self.owner.as_deref().is_some_and(|owner| owner != actor)
    }
}

/// A label whose presence alone blocks merging
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForbiddenLabel {
    /// Label name
    pub name: String,
    /// Tip shown when the label is present
    pub tip_if_present: String,
}

impl ForbiddenLabel {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("forbidden label: missing name".to_string()));
        }
        if self.tip_if_present.is_empty() {
            return Err(Error::Config(format!(
                "forbidden label {}: missing tip_if_present",
                self.name
            )));
        }
        Ok(())
    }
}

/// Policy set for one or more repositories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoPolicy {
    /// Repositories this policy applies to: `org` or `org/repo` entries
    #[serde(default)]
    pub repos: Vec<String>,
    /// Default merge method; filled with `merge` by [`GateConfig::set_default`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<MergeMethod>,
    /// Per-branch merge method overrides
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub branch_merge_method: HashMap<String, MergeMethod>,
    /// Labels a PR must have to be merged (evaluated in declared order)
    #[serde(default)]
    pub labels: Vec<RequiredLabel>,
    /// Labels a PR must not have to be merged
    #[serde(default)]
    pub forbidden_labels: Vec<ForbiddenLabel>,
}

impl RepoPolicy {
    fn set_default(&mut self) {
        if self.merge_method.is_none() {
            self.merge_method = Some(MergeMethod::Merge);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.repos.is_empty() {
            return Err(Error::Config("policy: missing repos".to_string()));
        }
        if self.labels.is_empty() {
            return Err(Error::Config("policy: missing labels".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for label in &self.labels {
            label.validate()?;
            if !seen.insert(label.name.as_str()) {
                return Err(Error::Config(format!(
                    "policy: duplicate required label {}",
                    label.name
                )));
            }
        }
        for label in &self.forbidden_labels {
            label.validate()?;
        }
        Ok(())
    }

    /// Resolve the merge method for a base branch.
    ///
    /// Returns the branch-specific override if one is configured, otherwise
    /// the policy default (`merge` when no default was set).
    pub fn merge_method_for(&self, branch: &str) -> MergeMethod {
        self.branch_merge_method
            .get(branch)
            .copied()
            .or(self.merge_method)
            .unwrap_or_default()
    }

    fn matches_repo(&self, full_name: &str) -> bool {
        self.repos.iter().any(|r| r == full_name)
    }

    fn matches_org(&self, org: &str) -> bool {
        self.repos.iter().any(|r| r == org)
    }
}

/// Top-level gate configuration: an ordered list of repository policies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Repository policies, most specific match wins
    #[serde(default)]
    pub policies: Vec<RepoPolicy>,
}

impl GateConfig {
    /// Load configuration from a TOML file, applying defaults and validating
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

        config.set_default();
        config.validate()?;
        Ok(config)
    }

    /// Fill absent defaults (merge method defaults to `merge`)
    pub fn set_default(&mut self) {
        for policy in &mut self.policies {
            policy.set_default();
        }
    }

    /// Validate every contained policy; the config must not be used on error
    pub fn validate(&self) -> Result<()> {
        for policy in &self.policies {
            policy.validate()?;
        }
        Ok(())
    }

    /// Find the policy for a repository.
    ///
    /// An exact `org/repo` entry beats an org-wide entry; within the same
    /// specificity the first declared policy wins.
    pub fn policy_for(&self, org: &str, repo: &str) -> Option<&RepoPolicy> {
        let full_name = format!("{org}/{repo}");

        self.policies
            .iter()
            .find(|p| p.matches_repo(&full_name))
            .or_else(|| self.policies.iter().find(|p| p.matches_org(org)))
    }
}
