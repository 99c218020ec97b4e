use crate::error::{Result, SlipwayError};
use crate::exec::{dir_exists, quote, quote_path, require_command, Executor};
use std::path::Path;
use tracing::info;

/// Clone `repo` into `dest`, creating `dest` first when it does not exist.
pub fn clone(exec: &dyn Executor, repo: &str, dest: &Path) -> Result<()> {
    require_command(exec, "git")?;
    info!("cloning {repo} into {}", dest.display());
    if !dir_exists(exec, dest)? {
        exec.run_checked(&format!("mkdir -p {}", quote_path(dest)))?;
    }
    exec.run_checked(&format!("git clone {} {}", quote(repo), quote_path(dest)))?;
    info!("repository cloned");
    Ok(())
}

/// Pull the checkout at `dest`. A missing checkout aborts the run.
pub fn update(exec: &dyn Executor, dest: &Path) -> Result<()> {
    require_command(exec, "git")?;
    if !dir_exists(exec, dest)? {
        return Err(SlipwayError::MissingPath(dest.to_path_buf()));
    }
    info!("updating repository in {}", dest.display());
    exec.run_checked(&format!("cd {} && git pull", quote_path(dest)))?;
    info!("repository updated");
    Ok(())
}

pub fn init_submodules(exec: &dyn Executor, root: &Path) -> Result<()> {
    require_command(exec, "git")?;
    info!("initialising git submodules");
    exec.run_checked(&format!(
        "cd {} && git submodule update --init",
        quote_path(root)
    ))?;
    info!("submodules initialised");
    Ok(())
}
