//! Discrete deployment steps the task pipelines compose.
//!
//! Every step is a function of (configuration values, executor) that wraps
//! one external collaborator: git, virtualenv, pip, the framework's
//! management commands, mysqldump, supervisorctl. Steps log a status line on
//! start and success and return `Err` on the first fatal command failure.

pub mod assets;
pub mod database;
pub mod django;
pub mod pyenv;
pub mod services;
pub mod vcs;

use crate::exec::quote_path;
use std::path::Path;

/// Prefix that activates the virtualenv for the rest of a command line.
pub(crate) fn venv_prefix(venv: &Path) -> String {
    format!(". {} && ", quote_path(&venv.join("bin/activate")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venv_prefix_points_at_activate() {
        assert_eq!(venv_prefix(Path::new("/srv/env")), ". /srv/env/bin/activate && ");
    }
}
