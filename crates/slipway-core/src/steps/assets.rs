use super::venv_prefix;
use crate::error::Result;
use crate::exec::{path_exists, quote_path, Executor};
use std::path::Path;
use tracing::info;

/// Compile LESS stylesheets to CSS with the checkout's own `plessc.py`.
/// Projects without one skip the step.
pub fn compile_stylesheets(exec: &dyn Executor, venv: &Path, root: &Path) -> Result<()> {
    if !path_exists(exec, &root.join("plessc.py"))? {
        info!("plessc.py not found, skipping stylesheet compilation");
        return Ok(());
    }
    info!("compiling stylesheets");
    exec.run_checked(&format!(
        "cd {} && {}./plessc.py",
        quote_path(root),
        venv_prefix(venv)
    ))?;
    info!("stylesheets compiled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::FakeExecutor;

    #[test]
    fn compiles_when_script_present() {
        let exec = FakeExecutor::new();
        compile_stylesheets(&exec, Path::new("/r/env"), Path::new("/r")).unwrap();
        assert!(exec.issued("cd /r && . /r/env/bin/activate && ./plessc.py"));
    }

    #[test]
    fn skips_without_script() {
        let exec = FakeExecutor::new().on("test -e /r/plessc.py", 1, "");
        compile_stylesheets(&exec, Path::new("/r/env"), Path::new("/r")).unwrap();
        assert!(!exec.issued("./plessc.py"));
    }
}
