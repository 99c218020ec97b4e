use super::venv_prefix;
use crate::error::Result;
use crate::exec::{quote, quote_path, Executor};
use crate::paths;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read one credential out of the production settings module. A single
/// printed line is the whole contract with the remote python.
fn read_database_setting(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    settings: &str,
    key: &str,
) -> Result<String> {
    let command = format!(
        "cd {} && {}python -c 'import {settings}; \
         print({settings}.DATABASES[\"default\"][\"{key}\"])'",
        quote_path(project_dir),
        venv_prefix(venv),
    );
    Ok(exec.run_checked(&command)?.line().to_string())
}

/// Dump the production database to `/tmp`, compress it, and move it into
/// `dest` (created with sudo when missing). Returns the final backup path.
pub fn backup(
    exec: &dyn Executor,
    venv: &Path,
    project_dir: &Path,
    settings: &str,
    project: &str,
    dest: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let db_user = read_database_setting(exec, venv, project_dir, settings, "USER")?;
    let db_password = read_database_setting(exec, venv, project_dir, settings, "PASSWORD")?;
    let db_name = read_database_setting(exec, venv, project_dir, settings, "NAME")?;

    let dump_file = format!("{project}-prod-{}.sql", paths::release_stamp(now));
    let tmp_dump = Path::new("/tmp").join(&dump_file);

    info!("backing up database {db_name} to {}", tmp_dump.display());
    // unset HISTFILE keeps the password out of remote shell history
    exec.run_checked(&format!(
        "unset HISTFILE && mysqldump -u {} -p{} {} > {}",
        quote(&db_user),
        quote(&db_password),
        quote(&db_name),
        quote_path(&tmp_dump)
    ))?;

    info!("compressing database backup");
    exec.run_checked(&format!("bzip2 {}", quote_path(&tmp_dump)))?;
    let compressed = tmp_dump.with_extension("sql.bz2");

    info!("moving backup to {}", dest.display());
    let probe = exec.run(&format!("sudo test -d {}", quote_path(dest)))?;
    if !probe.success() {
        exec.run_checked(&format!("sudo mkdir -p {}", quote_path(dest)))?;
    }
    exec.run_checked(&format!(
        "sudo mv {} {}",
        quote_path(&compressed),
        quote_path(dest)
    ))?;

    let final_path = dest.join(format!("{dump_file}.bz2"));
    info!("database backup stored at {}", final_path.display());
    Ok(final_path)
}
