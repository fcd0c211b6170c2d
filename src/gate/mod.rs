//! The merge gate: pure label-policy evaluation plus effectful execution
//!
//! [`evaluate`] contains the pure engine: given the current label set, the
//! operation log, and a policy, it produces the readiness report. An empty
//! report is the only green light.
//!
//! [`execute`] drives a full gate run against a forge: it fetches the PR and
//! its operation log, posts or refreshes the author notification when the PR
//! is blocked, and merges when it is ready.

pub mod evaluate;
pub mod execute;

pub use evaluate::{all_labels_present, check_readiness, evaluate_forbidden, evaluate_required};
pub use execute::{GateOptions, GateOutcome, evaluate_pr, handle_check_command, run_gate};
