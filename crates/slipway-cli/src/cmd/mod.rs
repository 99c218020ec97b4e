pub mod backup;
pub mod build;
pub mod config;
pub mod deploy;
pub mod init;
pub mod releases;
pub mod runserver;

use slipway_core::config::DeployConfig;
use slipway_core::exec::SshExecutor;

/// Executor for the production host named in the config.
pub(crate) fn remote_executor(cfg: &DeployConfig) -> anyhow::Result<SshExecutor> {
    let host = cfg.host()?;
    Ok(SshExecutor::new(&cfg.user, host)?)
}
