use super::venv_prefix;
use crate::error::Result;
use crate::exec::{path_exists, quote, quote_path, require_command, Executor};
use std::path::Path;
use tracing::info;

/// Create the virtualenv at `venv` unless one is already there.
pub fn create_virtualenv(exec: &dyn Executor, venv: &Path) -> Result<()> {
    require_command(exec, "virtualenv")?;
    if path_exists(exec, &venv.join("bin/activate"))? {
        info!("virtualenv already exists at {}", venv.display());
        return Ok(());
    }
    info!("creating virtualenv at {}", venv.display());
    exec.run_checked(&format!("mkdir -p {}", quote_path(venv)))?;
    exec.run_checked(&format!(
        "virtualenv --no-site-packages {}",
        quote_path(venv)
    ))?;
    info!("virtualenv created");
    Ok(())
}

pub fn install_dependencies(exec: &dyn Executor, venv: &Path, requirements: &Path) -> Result<()> {
    info!("installing dependencies with pip");
    exec.run_checked(&format!(
        "{}pip install -r {}",
        venv_prefix(venv),
        quote_path(requirements)
    ))?;
    info!("dependencies installed");
    Ok(())
}

/// Install the imaging library outside pip's normal flow, patching its
/// setup.py in between so JPEG and PNG support are compiled in.
///
/// Skipped when the requirements file does not mention PIL; the grep's
/// non-zero exit is the probe, not a failure.
pub fn install_patched_imaging(
    exec: &dyn Executor,
    venv: &Path,
    requirements: &Path,
    patch: &Path,
) -> Result<()> {
    let probe = exec.run(&format!("grep PIL {}", quote_path(requirements)))?;
    if !probe.success() {
        info!("PIL not in requirements, skipping imaging patch");
        return Ok(());
    }
    let pinned = probe.line().to_string();
    info!("installing and patching {pinned}");
    let prefix = venv_prefix(venv);
    exec.run_checked(&format!("{prefix}pip install -I {} --no-install", quote(&pinned)))?;
    exec.run_checked(&format!(
        "{prefix}patch --unified {} {}",
        quote_path(&venv.join("build/PIL/setup.py")),
        quote_path(patch)
    ))?;
    exec.run_checked(&format!("{prefix}pip install -I {} --no-download", quote(&pinned)))?;
    info!("imaging library patched and installed");
    Ok(())
}
