//! label-tide: a label-policy merge gate for pull requests
//!
//! A pull request may be merged automatically only when every configured
//! required label is present, correctly attributed, and unexpired, and no
//! forbidden label is present. Evidence of *who* applied a label and *when*
//! comes from the forge's operation log for the PR.
//!
//! The crate splits into a pure evaluation core and an effectful shell:
//!
//! - [`audit`] resolves a label's most recent application event from the
//!   operation log.
//! - [`gate::evaluate`] applies per-label policies and produces the
//!   readiness report (pure, no I/O).
//! - [`gate::execute`] drives a full gate run against a forge: notify the
//!   author when blocked, merge when ready.
//! - [`config`] holds the validated per-repository policy configuration.
//! - [`platform`] abstracts the forge API behind the [`platform::ForgeService`]
//!   trait, with a GitHub implementation.

pub mod audit;
pub mod config;
pub mod error;
pub mod gate;
pub mod platform;
pub mod types;
