//! Release rotation: timestamped release directories, the `live` symlink,
//! and retention pruning.
//!
//! All filesystem access goes through an [`Executor`] with shell primitives
//! (`ls`, `test`, `readlink`, `ln`, `mv -T`, `rm -rf`), so the same code
//! rotates releases on a production host and in a local scratch directory.
//! Selection and retention logic stays on this side of the wire.

use crate::error::{Result, SlipwayError};
use crate::exec::{quote, quote_path, Executor};
use crate::paths;
use regex::Regex;
use std::path::Path;
use tracing::{info, warn};

pub const LIVE_LINK: &str = "live";

/// Staging name for the rename-based swap in `advance`.
const STAGING_LINK: &str = ".live.tmp";

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

fn list_entries(exec: &dyn Executor, dir: &Path) -> Result<Vec<String>> {
    let out = exec.run_checked(&format!("ls -1 {}", quote_path(dir)))?;
    Ok(out
        .stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Entries of `dir` following the release naming convention, oldest first.
pub fn list_releases(exec: &dyn Executor, dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = list_entries(exec, dir)?
        .into_iter()
        .filter(|n| paths::is_release_name(n))
        .collect();
    names.sort();
    Ok(names)
}

/// The release the `live` link currently names, or `None` when the link is
/// absent. A `live` that exists but is not a symlink is an error: it means
/// somebody put a real file or directory where the pointer belongs.
pub fn current_target(exec: &dyn Executor, dir: &Path) -> Result<Option<String>> {
    let link = dir.join(LIVE_LINK);
    let is_link = exec.run(&format!("test -L {}", quote_path(&link)))?;
    if !is_link.success() {
        let exists = exec.run(&format!("test -e {}", quote_path(&link)))?;
        if exists.success() {
            return Err(SlipwayError::InvalidLiveLink(link));
        }
        return Ok(None);
    }
    let out = exec.run_checked(&format!("readlink {}", quote_path(&link)))?;
    Ok(Some(out.line().to_string()))
}

// ---------------------------------------------------------------------------
// advance
// ---------------------------------------------------------------------------

/// Point `live` at the newest release in `dir`. Returns the previous target,
/// or `None` when no `live` link existed yet.
///
/// The swap is rename-based: the new link is created under a staging name
/// and then renamed over `live` with `mv -T`, which is `rename(2)` on the
/// target host. `live` is never absent mid-swap.
pub fn advance(exec: &dyn Executor, dir: &Path) -> Result<Option<String>> {
    let releases = list_releases(exec, dir)?;
    let Some(newest) = releases.last() else {
        return Err(SlipwayError::NoReleases(dir.to_path_buf()));
    };

    let previous = current_target(exec, dir)?;

    let staging = dir.join(STAGING_LINK);
    let live = dir.join(LIVE_LINK);
    // A stale staging link from an interrupted advance must not trip ln.
    exec.run_checked(&format!("rm -f {}", quote_path(&staging)))?;
    exec.run_checked(&format!("ln -s {} {}", quote(newest), quote_path(&staging)))?;
    exec.run_checked(&format!(
        "mv -T {} {}",
        quote_path(&staging),
        quote_path(&live)
    ))?;

    match &previous {
        Some(prev) if prev == newest => info!("live link already points at {newest}"),
        Some(prev) => info!("live link rolled forward to {newest} (was {prev})"),
        None => info!("live link created, pointing at {newest}"),
    }
    Ok(previous)
}

// ---------------------------------------------------------------------------
// prune
// ---------------------------------------------------------------------------

/// The kept/removed partition `prune` would act on.
#[derive(Debug)]
pub struct PrunePlan {
    pub kept: Vec<String>,
    pub doomed: Vec<String>,
}

/// Compute which entries of `dir` matching `pattern` fall outside the
/// `max_entries` most recent, without deleting anything.
///
/// The entry named `live` and the release `live` currently resolves to are
/// never candidates, whatever their age rank.
pub fn plan_prune(
    exec: &dyn Executor,
    dir: &Path,
    pattern: &str,
    max_entries: usize,
) -> Result<PrunePlan> {
    let re = Regex::new(pattern)?;
    let mut matching: Vec<String> = list_entries(exec, dir)?
        .into_iter()
        .filter(|n| n != LIVE_LINK && re.is_match(n))
        .collect();
    // Newest first, so retention keeps the head of the list.
    matching.sort_by(|a, b| b.cmp(a));

    let live_target = current_target(exec, dir)?;

    let mut kept = Vec::new();
    let mut doomed = Vec::new();
    for (rank, name) in matching.into_iter().enumerate() {
        let is_live = live_target.as_deref() == Some(name.as_str());
        if rank < max_entries || is_live {
            kept.push(name);
        } else {
            doomed.push(name);
        }
    }
    Ok(PrunePlan { kept, doomed })
}

/// Delete all but the `max_entries` newest entries matching `pattern` in
/// `dir`. Returns the number of entries actually removed.
///
/// Removal is best-effort: a failure on one entry is logged and the rest are
/// still attempted. Only the listing step (and an invalid pattern) can fail
/// the operation as a whole.
pub fn prune(
    exec: &dyn Executor,
    dir: &Path,
    pattern: &str,
    max_entries: usize,
) -> Result<usize> {
    let plan = plan_prune(exec, dir, pattern, max_entries)?;
    info!(
        "pruning {} to at most {max_entries} entries matching {pattern}",
        dir.display()
    );

    let mut removed = 0;
    for name in &plan.doomed {
        let path = dir.join(name);
        match exec.run(&format!("rm -rf -- {}", quote_path(&path))) {
            Ok(out) if out.success() => removed += 1,
            Ok(out) => warn!(
                "failed to remove {} (exit {:?})",
                path.display(),
                out.code
            ),
            Err(e) => warn!("failed to remove {}: {e}", path.display()),
        }
    }
    if removed > 0 {
        info!("removed {removed} old release(s) from {}", dir.display());
    }
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
