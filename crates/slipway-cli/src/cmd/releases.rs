use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use slipway_core::config::{DeployConfig, DEFAULT_RETAIN_RELEASES};
use slipway_core::exec::{Executor, LocalExecutor};
use slipway_core::{paths, release};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ReleasesSubcommand {
    /// List release directories, oldest first
    List {
        /// Operate on a local directory instead of the configured host
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Roll the live link forward to the newest release
    Roll {
        /// Operate on a local directory instead of the configured host
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Delete old releases beyond the retention count
    Prune {
        /// Operate on a local directory instead of the configured host
        #[arg(long)]
        dir: Option<PathBuf>,

        /// How many matching entries to keep (default: retain_releases)
        #[arg(long)]
        keep: Option<usize>,

        /// Regex restricting which entry names are eligible for deletion
        #[arg(long)]
        pattern: Option<String>,

        /// Show what would be removed without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ReleasesSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReleasesSubcommand::List { dir } => list(root, dir, json),
        ReleasesSubcommand::Roll { dir } => roll(root, dir, json),
        ReleasesSubcommand::Prune {
            dir,
            keep,
            pattern,
            dry_run,
        } => prune(root, dir, keep, pattern.as_deref(), dry_run, json),
    }
}

/// `--dir` switches to a local scratch directory; otherwise the deployment
/// directory on the configured host is the target.
fn target(
    root: &Path,
    dir: Option<PathBuf>,
) -> anyhow::Result<(Box<dyn Executor>, PathBuf, usize)> {
    if let Some(dir) = dir {
        return Ok((Box::new(LocalExecutor), dir, DEFAULT_RETAIN_RELEASES));
    }
    let cfg = DeployConfig::load(root).context("failed to load slipway.yaml")?;
    let retain = cfg.retain_releases;
    let deployment_dir = cfg.deployment_dir();
    let exec = super::remote_executor(&cfg)?;
    Ok((Box::new(exec), deployment_dir, retain))
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (exec, dir, _) = target(root, dir)?;
    let releases = release::list_releases(exec.as_ref(), &dir)?;
    let live = release::current_target(exec.as_ref(), &dir)?;

    if json {
        return print_json(&serde_json::json!({
            "releases": releases,
            "live": live,
        }));
    }

    if releases.is_empty() {
        println!("No releases in {}", dir.display());
        return Ok(());
    }
    for name in &releases {
        let marker = if live.as_deref() == Some(name.as_str()) {
            " (live)"
        } else {
            ""
        };
        println!("{name}{marker}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

fn roll(root: &Path, dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (exec, dir, _) = target(root, dir)?;
    let previous = release::advance(exec.as_ref(), &dir)?;
    let live = release::current_target(exec.as_ref(), &dir)?;

    if json {
        return print_json(&serde_json::json!({
            "live": live,
            "previous": previous,
        }));
    }

    match (live, previous) {
        (Some(live), Some(prev)) if live == prev => println!("live already points at {live}"),
        (Some(live), Some(prev)) => println!("live now points at {live} (was {prev})"),
        (Some(live), None) => println!("live now points at {live}"),
        (None, _) => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// prune
// ---------------------------------------------------------------------------

fn prune(
    root: &Path,
    dir: Option<PathBuf>,
    keep: Option<usize>,
    pattern: Option<&str>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (exec, dir, retain) = target(root, dir)?;
    let keep = keep.unwrap_or(retain);
    let pattern = pattern.unwrap_or(paths::RELEASE_PATTERN);

    if dry_run {
        let plan = release::plan_prune(exec.as_ref(), &dir, pattern, keep)?;
        if json {
            return print_json(&serde_json::json!({
                "kept": plan.kept,
                "would_remove": plan.doomed,
            }));
        }
        if plan.doomed.is_empty() {
            println!("Nothing to remove.");
        } else {
            for name in &plan.doomed {
                println!("would remove {name}");
            }
        }
        return Ok(());
    }

    let removed = release::prune(exec.as_ref(), &dir, pattern, keep)?;
    if json {
        return print_json(&serde_json::json!({ "removed": removed }));
    }
    println!("Removed {removed} release(s).");
    Ok(())
}
