//! tide: evaluate and merge pull requests gated by label policy

use anyhow::{Context, Result};
use label_tide::error::Error;
use clap::{Parser, Subcommand};
use label_tide::config::GateConfig;
use label_tide::gate::{GateOptions, GateOutcome, evaluate_pr, run_gate};
use label_tide::platform::GitHubService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tide", version, about = "Label-policy merge gate for pull requests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a pull request and merge it if every label policy passes
    Check {
        /// Repository owner (user or organization)
        #[arg(long)]
        owner: String,
        /// Repository name
        #[arg(long)]
        repo: String,
        /// Pull request number
        #[arg(long)]
        pr: u64,
        /// Path to the gate configuration file
        #[arg(long, default_value = "tide.toml")]
        config: PathBuf,
        /// Custom GitHub Enterprise host (defaults to github.com)
        #[arg(long)]
        host: Option<String>,
        /// Print the readiness report without commenting or merging
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a gate configuration file
    Validate {
        /// Path to the gate configuration file
        #[arg(long, default_value = "tide.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { config } => {
            GateConfig::load(&config)?;
            println!("{} is valid", config.display());
            Ok(())
        }
        Command::Check {
            owner,
            repo,
            pr,
            config,
            host,
            dry_run,
        } => check(owner, repo, pr, &config, host, dry_run).await,
    }
}

async fn check(
    owner: String,
    repo: String,
    pr: u64,
    config_path: &std::path::Path,
    host: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let config = GateConfig::load(config_path)?;
    let Some(policy) = config.policy_for(&owner, &repo) else {
        return Err(Error::RepoNotConfigured(format!("{owner}/{repo}")).into());
    };

    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is not set")?;
    let platform = GitHubService::new(&token, owner, repo, host)?;

    if dry_run {
        let report = evaluate_pr(&platform, pr, policy).await?;
        if report.is_empty() {
            println!("PR #{pr} is mergeable: every label policy passes");
        } else {
            println!("PR #{pr} is not mergeable:\n\n{report}");
        }
        return Ok(());
    }

    match run_gate(&platform, pr, policy, GateOptions::default()).await? {
        GateOutcome::Merged { sha } => {
            println!("PR #{pr} merged: {}", sha.as_deref().unwrap_or("(no sha)"));
        }
        GateOutcome::Blocked(report) => {
            println!("PR #{pr} is not mergeable, author notified:\n\n{report}");
        }
        GateOutcome::Skipped => {
            println!("PR #{pr} skipped (not open)");
        }
    }

    Ok(())
}
