//! Management-command steps. Each runs `manage.py` from the checkout under
//! the virtualenv activation prefix, with an optional `--settings` override
//! for production runs.

use super::venv_prefix;
use crate::error::{Result, SlipwayError};
use crate::exec::{path_exists, quote_path, Executor};
use std::path::Path;
use tracing::info;

fn manage(venv: &Path, project_dir: &Path, args: &str, settings: Option<&str>) -> String {
    let settings_flag = settings
        .map(|m| format!(" --settings={m}"))
        .unwrap_or_default();
    format!(
        "{}{} {args}{settings_flag}",
        venv_prefix(venv),
        quote_path(&project_dir.join("manage.py"))
    )
}

pub fn sync_and_migrate(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    settings: Option<&str>,
) -> Result<()> {
    info!("running syncdb with --migrate");
    exec.run_checked(&manage(venv, project_dir, "syncdb --migrate --noinput", settings))?;
    info!("database synced");
    Ok(())
}

pub fn load_fixture(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    fixture: &str,
) -> Result<()> {
    let full_path = project_dir.join(fixture);
    if !path_exists(exec, &full_path)? {
        return Err(SlipwayError::MissingPath(full_path));
    }
    info!("loading fixture {}", full_path.display());
    exec.run_checked(&manage(
        venv,
        project_dir,
        &format!("loaddata {}", quote_path(&full_path)),
        None,
    ))?;
    info!("fixture loaded");
    Ok(())
}

pub fn publish_static(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    settings: Option<&str>,
) -> Result<()> {
    info!("collecting static content");
    exec.run_checked(&manage(venv, project_dir, "collectstatic --noinput", settings))?;
    info!("static content published");
    Ok(())
}

/// Foreground dev server; blocks until the operator stops it.
pub fn run_dev_server(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    settings: Option<&str>,
) -> Result<()> {
    info!("starting dev server");
    exec.run_interactive(&manage(venv, project_dir, "runserver", settings))
}
