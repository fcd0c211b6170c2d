//! Resolving label application events from a PR's operation log.
//!
//! The operation log is free text, so a label is correlated with an entry by
//! a case-sensitive substring test against the entry content. This matches
//! the upstream forge semantics; see the crate docs for the known ambiguity
//! when one label name is a substring of another's log text.

use crate::types::AuditEntry;
use chrono::{DateTime, Utc};
use tracing::warn;

/// The most recent attributable application event for a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEvent {
    /// The label the event refers to
    pub label: String,
    /// Login of the user who performed the action
    pub actor: String,
    /// When the action happened
    pub applied_at: DateTime<Utc>,
}

/// Find the latest operation-log entry that mentions `label`.
///
/// Entries whose timestamp fails to parse as RFC 3339 are skipped with a
/// diagnostic; they never abort resolution. Among the remaining matches the
/// maximum timestamp wins, and only a strictly later timestamp replaces the
/// incumbent, so equal timestamps deterministically keep the first-seen entry.
///
/// Returns `None` when no entry matches, or when the winning entry has no
/// actor login (authorship cannot be established).
pub fn resolve_latest(entries: &[AuditEntry], label: &str) -> Option<LabelEvent> {
    let mut latest: Option<(usize, DateTime<Utc>)> = None;

    for (index, entry) in entries.iter().enumerate() {
        if !entry.content.contains(label) {
            continue;
        }

        let at = match DateTime::parse_from_rfc3339(&entry.created_at) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                warn!(
                    created_at = %entry.created_at,
                    error = %e,
                    "skipping operation log entry with unparseable timestamp"
                );
                continue;
            }
        };

        match latest {
            Some((_, best)) if at <= best => {}
            _ => latest = Some((index, at)),
        }
    }

    let (index, applied_at) = latest?;
    let actor = entries[index].actor.as_deref().filter(|a| !a.is_empty())?;

    Some(LabelEvent {
        label: label.to_string(),
        actor: actor.to_string(),
        applied_at,
    })
}
