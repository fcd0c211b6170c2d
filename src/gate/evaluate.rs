//! Label readiness evaluation - pure functions, no I/O
//!
//! All inputs (labels, operation log, policy, current time) are passed in,
//! so every rule here is deterministic and unit testable. The caller is
//! responsible for fetching the label set and operation log.

use crate::audit::resolve_latest;
use crate::config::{ForbiddenLabel, RepoPolicy, RequiredLabel};
use crate::types::AuditEntry;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Fixed diagnostic for a label whose application cannot be attributed.
///
/// This signals a gap in the audit trail, not a configured policy violation,
/// so it is distinct from the per-label tips.
pub const MISSING_OPERATION_LOG_TIP: &str =
    "the corresponding operation log is missing; please remove the label and add it again";

/// Fast pre-check: every required label present, no forbidden label present.
///
/// Ignores the operation log entirely, so it may pass PRs that the full
/// evaluation would still reject on expiry or ownership grounds. Use it to
/// avoid an operation-log fetch when labels obviously do not line up; never
/// as the final merge decision.
pub fn all_labels_present(labels: &HashSet<String>, policy: &RepoPolicy) -> bool {
    policy.labels.iter().all(|l| labels.contains(&l.name))
        && !policy
            .forbidden_labels
            .iter()
            .any(|l| labels.contains(&l.name))
}

/// Check one required label; returns the violation tip, or `None` if satisfied.
///
/// The expiry and ownership tips are guaranteed non-empty by configuration
/// validation whenever the corresponding rule is configured.
fn check_required_label(
    label: &RequiredLabel,
    labels: &HashSet<String>,
    entries: &[AuditEntry],
    now: DateTime<Utc>,
) -> Option<String> {
    if !labels.contains(&label.name) {
        return Some(label.tip_if_missing.clone());
    }

    let Some(event) = resolve_latest(entries, &label.name) else {
        return Some(MISSING_OPERATION_LOG_TIP.to_string());
    };

    if label.is_expired(event.applied_at, now) {
        return label.tip_if_expired.clone();
    }

    if label.added_by_others(&event.actor) {
        return label.tip_if_added_by_others.clone();
    }

    None
}

/// Evaluate the required-label policies, in declared order.
///
/// Returns an empty string when every policy is satisfied; otherwise a
/// report with one `"<label>: <tip>"` line per violation.
pub fn evaluate_required(
    labels: &HashSet<String>,
    entries: &[AuditEntry],
    required: &[RequiredLabel],
    now: DateTime<Utc>,
) -> String {
    let violations: Vec<String> = required
        .iter()
        .filter_map(|label| {
            check_required_label(label, labels, entries, now)
                .map(|tip| format!("{}: {tip}", label.name))
        })
        .collect();

    if violations.is_empty() {
        return String::new();
    }

    let noun = if violations.len() > 1 {
        "labels are"
    } else {
        "label is"
    };

    format!(
        "**The following {noun} not ready**.\n\n{}",
        violations.join("\n\n")
    )
}

/// Evaluate the forbidden-label policies, in declared order.
///
/// Returns an empty string when no forbidden label is present.
pub fn evaluate_forbidden(labels: &HashSet<String>, forbidden: &[ForbiddenLabel]) -> String {
    let violations: Vec<String> = forbidden
        .iter()
        .filter(|label| labels.contains(&label.name))
        .map(|label| format!("{}: {}", label.name, label.tip_if_present))
        .collect();

    if violations.is_empty() {
        return String::new();
    }

    let noun = if violations.len() > 1 {
        "labels exist"
    } else {
        "label exists"
    };

    format!(
        "**The following {noun}**.\n\n{}",
        violations.join("\n\n")
    )
}

/// Produce the full readiness report for a PR.
///
/// Combines required-label and forbidden-label evaluation. An empty string
/// means the PR is mergeable from a label standpoint; this is the sole
/// externally consumed decision point.
pub fn check_readiness(
    labels: &HashSet<String>,
    entries: &[AuditEntry],
    policy: &RepoPolicy,
    now: DateTime<Utc>,
) -> String {
    let required = evaluate_required(labels, entries, &policy.labels, now);
    let forbidden = evaluate_forbidden(labels, &policy.forbidden_labels);

    if !required.is_empty() && !forbidden.is_empty() {
        return format!("{required}\n\n{forbidden}");
    }

    required + &forbidden
}
