//! The named task pipelines: fixed step sequences over one configuration
//! and one executor. The first fatal error aborts the run and leaves the
//! host in whatever partial state it reached; there is no rollback. A new
//! release only becomes `live` after every preparation step has succeeded.

use crate::config::DeployConfig;
use crate::error::Result;
use crate::exec::Executor;
use crate::paths;
use crate::release;
use crate::steps::{assets, database, django, pyenv, services, vcs};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Deploy a fresh timestamped release to the production host, roll the
/// `live` link forward, restart services, and prune old releases.
pub fn deploy(cfg: &DeployConfig, exec: &dyn Executor, now: DateTime<Utc>) -> Result<()> {
    let repo = cfg.repo()?;
    let deployment_dir = cfg.deployment_dir();
    let layout = cfg.layout(deployment_dir.join(paths::release_stamp(now)));
    info!("deploying {} to {}", cfg.project, exec.target());

    vcs::clone(exec, repo, &layout.root)?;
    vcs::init_submodules(exec, &layout.root)?;
    pyenv::create_virtualenv(exec, &layout.venv_dir)?;
    if let Some(patch) = &cfg.pil_patch {
        pyenv::install_patched_imaging(
            exec,
            &layout.venv_dir,
            &layout.requirements,
            &layout.root.join(patch),
        )?;
    }
    pyenv::install_dependencies(exec, &layout.venv_dir, &layout.requirements)?;
    assets::compile_stylesheets(exec, &layout.venv_dir, &layout.root)?;

    // From here on the live site is affected.
    let settings = Some(cfg.production_settings.as_str());
    django::sync_and_migrate(exec, &layout.venv_dir, &layout.project_dir, settings)?;
    if let Some(fixture) = &cfg.fixture {
        django::load_fixture(exec, &layout.venv_dir, &layout.project_dir, fixture)?;
    }
    django::publish_static(exec, &layout.venv_dir, &layout.project_dir, settings)?;

    release::advance(exec, &deployment_dir)?;
    services::restart(exec)?;

    // Best-effort cleanup: an old release we fail to delete is not worth
    // failing a deployment that already went live.
    if let Err(e) = release::prune(
        exec,
        &deployment_dir,
        paths::RELEASE_PATTERN,
        cfg.retain_releases,
    ) {
        warn!("pruning old releases failed: {e}");
    }

    info!("deployment finished");
    Ok(())
}

/// Update the current live release in place: pull, recompile assets,
/// migrate, republish, restart. No rotation, no pruning.
pub fn in_place_deploy(cfg: &DeployConfig, exec: &dyn Executor) -> Result<()> {
    let layout = cfg.layout(cfg.deployment_dir().join(release::LIVE_LINK));
    info!("updating live release of {} on {}", cfg.project, exec.target());

    vcs::update(exec, &layout.root)?;
    assets::compile_stylesheets(exec, &layout.venv_dir, &layout.root)?;

    let settings = Some(cfg.production_settings.as_str());
    django::sync_and_migrate(exec, &layout.venv_dir, &layout.project_dir, settings)?;
    django::publish_static(exec, &layout.venv_dir, &layout.project_dir, settings)?;

    services::restart(exec)?;
    info!("in-place deployment finished");
    Ok(())
}

/// Build a local development environment in the checkout at `root`.
pub fn build(cfg: &DeployConfig, exec: &dyn Executor, root: &Path) -> Result<()> {
    let layout = cfg.layout(root);
    info!("building development environment in {}", root.display());

    pyenv::create_virtualenv(exec, &layout.venv_dir)?;
    pyenv::install_dependencies(exec, &layout.venv_dir, &layout.requirements)?;
    vcs::init_submodules(exec, &layout.root)?;
    django::sync_and_migrate(exec, &layout.venv_dir, &layout.project_dir, None)?;
    if let Some(fixture) = &cfg.fixture {
        django::load_fixture(exec, &layout.venv_dir, &layout.project_dir, fixture)?;
    }

    info!("build finished");
    Ok(())
}

/// Run the framework dev server in the checkout at `root`.
pub fn runserver(
    cfg: &DeployConfig,
    exec: &dyn Executor,
    root: &Path,
    settings: Option<&str>,
) -> Result<()> {
    let layout = cfg.layout(root);
    django::run_dev_server(exec, &layout.venv_dir, &layout.project_dir, settings)
}

/// Dump, compress, and store the production database from the live release.
pub fn backup_db(cfg: &DeployConfig, exec: &dyn Executor, now: DateTime<Utc>) -> Result<PathBuf> {
    let layout = cfg.layout(cfg.deployment_dir().join(release::LIVE_LINK));
    database::backup(
        exec,
        &layout.venv_dir,
        &layout.project_dir,
        &cfg.production_settings,
        &cfg.project,
        Path::new(&cfg.database_backup_dir),
        now,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
